//! Organizes an archive's entries into numerically-ordered chapters.
//!
//! Archives are expected to be laid out as `root/part/chapter/page`:
//!
//! ```text
//! volume/scans/chapter1/page1.png
//! volume/scans/chapter1/page2.png
//! ...
//! volume/scans/chapter10/page1.png
//! ```
//!
//! Chapters are ordered by the first number in their name,
//! and pages within a chapter by the first number in theirs,
//! so `chapter2` comes before `chapter10` and `page9` before `page10`.

use std::collections::BTreeMap;

use log::*;
use piz::read::FileMetadata;
use piz::ZipArchive;

use crate::path::{self, NumericKey, CHAPTER_SEGMENT, PAGE_SEGMENT};
use crate::result::*;

/// Something in an archive with a `/`-separated name.
pub trait ArchiveEntry {
    /// The entry's full path in the archive
    fn name(&self) -> &str;

    /// Returns true if the entry is a directory rather than a file
    fn is_dir(&self) -> bool {
        self.name().ends_with('/')
    }
}

impl ArchiveEntry for FileMetadata<'_> {
    fn name(&self) -> &str {
        self.path.as_str()
    }

    fn is_dir(&self) -> bool {
        FileMetadata::is_dir(self)
    }
}

/// A chapter: its label (the entry's third path segment)
/// and its pages, in order.
#[derive(Debug)]
pub struct Chapter<'a, E> {
    pub label: &'a str,
    pub entries: Vec<&'a E>,
}

impl<'a, E> Chapter<'a, E> {
    /// The number the chapter is ordered by
    pub fn number(&self) -> Option<NumericKey<'a>> {
        NumericKey::first_in(self.label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Groups and orders the entries of a ZIP archive.
///
/// Returns `None` if the archive has no entries at all.
///
/// ```no_run
/// # use std::fs;
/// # use piz::ZipArchive;
/// # use zip_chapters::chapters::*;
/// let bytes = fs::read("volume.zip")?;
/// let archive = ZipArchive::new(&bytes)?;
/// for chapter in decompress_and_sort(&archive)?.unwrap_or_default() {
///     println!("{}: {} pages", chapter.label, chapter.len());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decompress_and_sort<'a>(
    archive: &'a ZipArchive<'a>,
) -> ChapterResult<Option<Vec<Chapter<'a, FileMetadata<'a>>>>> {
    let entries = archive.entries();
    if entries.is_empty() {
        debug!("Archive has no entries");
        return Ok(None);
    }
    group_and_sort(entries).map(Some)
}

/// Groups `entries` into chapters by their third path segment,
/// then orders the chapters and the pages within each.
///
/// Directory entries are skipped. Every other entry needs a fourth path
/// segment, and both its chapter and page segments need a number in them,
/// or this fails with [`ChapterError::MissingSegment`] or
/// [`ChapterError::NoSortKey`].
pub fn group_and_sort<E: ArchiveEntry>(entries: &[E]) -> ChapterResult<Vec<Chapter<'_, E>>> {
    let mut groups: BTreeMap<&str, Vec<(NumericKey, &E)>> = BTreeMap::new();

    for entry in entries {
        let name = entry.name();
        if entry.is_dir() {
            trace!("Skipping directory {}", name);
            continue;
        }
        let label = path::segment(name, CHAPTER_SEGMENT)?;
        let page = path::sort_key(name, path::segment(name, PAGE_SEGMENT)?)?;
        trace!("{} -> chapter {:?}, page {:?}", name, label, page);
        groups.entry(label).or_default().push((page, entry));
    }

    let mut chapters = groups
        .into_iter()
        .map(|(label, mut pages)| -> ChapterResult<_> {
            let number = NumericKey::first_in(label).ok_or_else(|| ChapterError::NoSortKey {
                path: pages[0].1.name().to_owned(),
                segment: label.to_owned(),
            })?;
            // Stable, so equal page numbers keep archive order.
            pages.sort_by(|a, b| a.0.cmp(&b.0));
            let chapter = Chapter {
                label,
                entries: pages.into_iter().map(|(_, entry)| entry).collect(),
            };
            Ok((number, chapter))
        })
        .collect::<ChapterResult<Vec<_>>>()?;
    chapters.sort_by(|a, b| a.0.cmp(&b.0));

    debug!(
        "Sorted {} entries into {} chapters",
        entries.len(),
        chapters.len()
    );
    Ok(chapters.into_iter().map(|(_, chapter)| chapter).collect())
}
