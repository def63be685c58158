//! Small string-to-string stores for state that outlives a single read,
//! like the last chapter someone opened.
//!
//! [`FileStore`] is the persistent one. Each origin gets its own JSON file
//! in the store directory, so two origins never see each other's keys:
//!
//! ```no_run
//! # use camino::Utf8Path;
//! # use zip_chapters::storage::*;
//! let mut store = FileStore::open(Utf8Path::new("state"), "https://reader.example")?;
//! store.save("last-chapter", "chapter12")?;
//! assert_eq!(store.get("last-chapter")?.as_deref(), Some("chapter12"));
//! # Ok::<(), zip_chapters::result::ChapterError>(())
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use log::*;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tempfile::NamedTempFile;

use crate::result::*;

/// Saves and looks up text values by key.
pub trait KeyValueStore {
    /// Stores `value` under `key`, replacing whatever was there.
    fn save(&mut self, key: &str, value: &str) -> ChapterResult<()>;

    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> ChapterResult<Option<String>>;
}

/// A store that lives and dies with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&mut self, key: &str, value: &str) -> ChapterResult<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn get(&self, key: &str) -> ChapterResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }
}

/// A store persisted to `<dir>/<origin>.json`.
///
/// Nothing is cached: every `get` reads the file and every `save`
/// re-reads it, changes one key, and writes it back,
/// so any number of handles on the same origin see each other's saves.
#[derive(Debug)]
pub struct FileStore {
    path: Utf8PathBuf,
}

impl FileStore {
    /// Opens the store for `origin` in `dir`, creating `dir` if needed.
    ///
    /// The store file itself isn't created until the first save,
    /// but an existing one must parse.
    pub fn open<P: AsRef<Utf8Path>>(dir: P, origin: &str) -> ChapterResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        // Percent-encoding keeps distinct origins from mapping to the same file.
        let file_name = format!("{}.json", utf8_percent_encode(origin, NON_ALPHANUMERIC));
        let store = Self {
            path: dir.join(file_name),
        };
        let keys = store.load()?.len();
        debug!("Opened {} ({} keys)", store.path, keys);
        Ok(store)
    }

    /// The file backing this store
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn load(&self) -> ChapterResult<BTreeMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| ChapterError::CorruptStore {
                    path: self.path.clone(),
                    source,
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("No store at {} yet", self.path);
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, values: &BTreeMap<String, String>) -> ChapterResult<()> {
        // Write beside the destination so the rename can't cross file systems.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut temp, values).map_err(io::Error::from)?;
        temp.flush()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        trace!("Wrote {} keys to {}", values.len(), self.path);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn save(&mut self, key: &str, value: &str) -> ChapterResult<()> {
        let mut values = self.load()?;
        values.insert(key.to_owned(), value.to_owned());
        self.write(&values)
    }

    fn get(&self, key: &str) -> ChapterResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }
}
