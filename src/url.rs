//! Object URLs: short strings that stand in for a buffer of bytes
//! until they're revoked.

use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::*;
use piz::read::FileMetadata;
use piz::ZipArchive;

use crate::result::*;

/// Something that can hold onto bytes and hand back a URL for them.
pub trait ObjectUrlRegistry {
    /// Takes ownership of `bytes`, returning a URL that refers to them.
    fn register(&self, bytes: Vec<u8>) -> String;
}

/// Decompresses `entry` and registers its contents with `registry`.
///
/// The URL stays valid until the caller revokes it.
pub fn create_url<R: ObjectUrlRegistry + ?Sized>(
    archive: &ZipArchive,
    entry: &FileMetadata,
    registry: &R,
) -> ChapterResult<String> {
    let mut reader = archive.read(entry)?;
    let mut bytes = Vec::with_capacity(entry.size);
    // The CRC is checked when the reader hits EOF.
    reader.read_to_end(&mut bytes)?;
    let url = registry.register(bytes);
    debug!("{} -> {}", entry.path, url);
    Ok(url)
}

/// An in-process [`ObjectUrlRegistry`] handing out `blob:<origin>/<id>` URLs.
#[derive(Debug)]
pub struct BlobRegistry {
    origin: String,
    next_id: AtomicU64,
    blobs: Mutex<HashMap<String, Arc<[u8]>>>,
}

impl BlobRegistry {
    pub fn new<S: Into<String>>(origin: S) -> Self {
        Self {
            origin: origin.into(),
            next_id: AtomicU64::new(0),
            blobs: Mutex::new(HashMap::new()),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the bytes behind `url`, if it's still registered.
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.blobs().get(url).cloned()
    }

    /// Releases `url`. Returns false if it wasn't registered.
    pub fn revoke(&self, url: &str) -> bool {
        let removed = self.blobs().remove(url).is_some();
        if !removed {
            warn!("Revoking unknown object URL {}", url);
        }
        removed
    }

    /// The number of URLs currently registered
    pub fn len(&self) -> usize {
        self.blobs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs().is_empty()
    }

    fn blobs(&self) -> MutexGuard<'_, HashMap<String, Arc<[u8]>>> {
        // The map is never left half-updated, so a panic elsewhere is no reason to stop.
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectUrlRegistry for BlobRegistry {
    fn register(&self, bytes: Vec<u8>) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("blob:{}/{:016x}", self.origin, id);
        trace!("Registering {} bytes as {}", bytes.len(), url);
        self.blobs().insert(url.clone(), bytes.into());
        url
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn register_resolve_revoke() {
        let registry = BlobRegistry::new("https://reader.example");
        assert!(registry.is_empty());

        let url = registry.register(b"page one".to_vec());
        assert!(url.starts_with("blob:https://reader.example/"));
        assert_eq!(&*registry.resolve(&url).unwrap(), b"page one");
        assert_eq!(registry.len(), 1);

        assert!(registry.revoke(&url));
        assert!(registry.resolve(&url).is_none());
        assert!(!registry.revoke(&url));
        assert!(registry.is_empty());
    }

    #[test]
    fn urls_are_unique() {
        let registry = BlobRegistry::new("null");
        let a = registry.register(b"same".to_vec());
        let b = registry.register(b"same".to_vec());
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        registry.revoke(&a);
        assert_eq!(&*registry.resolve(&b).unwrap(), b"same");
    }

    #[test]
    fn unknown_url() {
        let registry = BlobRegistry::new("null");
        assert!(registry.resolve("blob:null/nope").is_none());
    }
}
