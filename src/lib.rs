//! zip-chapters reads chapter-organized ZIP archives, like scanned comics
//! laid out as `volume/part/chapterN/pageM.png`,
//! and puts their pages in reading order:
//!
//! ```no_run
//! # use std::fs;
//! # use piz::ZipArchive;
//! # use zip_chapters::*;
//! let bytes = fs::read("volume.zip")?;
//! let archive = ZipArchive::new(&bytes)?;
//!
//! // Chapters come back ordered by the number in their name
//! // (chapter2 before chapter10), and so do the pages in each.
//! // An archive with no entries at all gives us `None`.
//! let chapters = decompress_and_sort(&archive)?.unwrap_or_default();
//!
//! // Pages can be handed out as object URLs,
//! // which stay good until they're revoked.
//! let registry = BlobRegistry::new("https://reader.example");
//! let first_page = chapters[0].entries[0];
//! let url = create_url(&archive, first_page, &registry)?;
//! let bytes = registry.resolve(&url).unwrap();
//! registry.revoke(&url);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Reading the archive itself is left to [piz](https://docs.rs/piz).
//! Its readers are `Send`, so pages can be decompressed in parallel
//! if the caller wants.
//!
//! Separately, [`storage`] keeps small bits of text (say, where someone left
//! off) in a [`KeyValueStore`]. [`FileStore`] persists them per origin
//! across runs; [`MemoryStore`] forgets them when dropped.

pub mod chapters;
pub mod path;
pub mod result;
pub mod storage;
pub mod url;

pub use chapters::{decompress_and_sort, group_and_sort, ArchiveEntry, Chapter};
pub use result::{ChapterError, ChapterResult};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use url::{create_url, BlobRegistry, ObjectUrlRegistry};
