//! Error types and the related `Result<T>`

use camino::Utf8PathBuf;
use piz::result::ZipError;
use thiserror::Error;

pub type ChapterResult<T> = Result<T, ChapterError>;

#[derive(Debug, Error)]
pub enum ChapterError {
    /// The archive couldn't be read
    #[error("Zip error: {0}")]
    Zip(#[from] ZipError),

    /// An error from underlying I/O
    #[error("I/O Error")]
    Io(#[from] std::io::Error),

    /// An entry's path is too shallow to hold the segment we group or sort by.
    #[error("{path} has no path segment {index}")]
    MissingSegment { path: String, index: usize },

    /// A chapter label or page name contained no digits to sort by.
    #[error("No number to sort by in {segment:?} (from {path})")]
    NoSortKey { path: String, segment: String },

    /// A key-value store file exists but isn't a JSON object of strings.
    #[error("Couldn't parse store file {path}")]
    CorruptStore {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
