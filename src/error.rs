//! Error types for lectern operations.

use thiserror::Error;

/// Shape violations found while validating a corpus document.
///
/// Every variant carries the position of the offending entry so callers
/// can point at the exact book, field, or chapter in the source document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("expected a top-level array of books")]
    TopLevelNotArray,

    #[error("book #{book}: expected an object")]
    BookNotObject { book: usize },

    #[error("book #{book}: missing or empty \"{field}\"")]
    MissingField { book: usize, field: &'static str },

    #[error("book #{book}: duplicate abbrev {abbrev:?}")]
    DuplicateAbbrev { book: usize, abbrev: String },

    #[error("book #{book} ({name:?}): \"chapters\" is not an array")]
    ChaptersNotArray { book: usize, name: String },

    #[error("book #{book} ({name:?}) chapter #{chapter}: expected an array of verses")]
    ChapterNotArray {
        book: usize,
        name: String,
        chapter: usize,
    },
}

/// Errors that can occur while loading, packing, or reading a corpus.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid corpus: {0}")]
    Schema(#[from] SchemaError),

    #[error("book #{book} chapter #{chapter} verse #{verse}: {ch:?} has no Latin-1 encoding")]
    Encoding {
        book: usize,
        chapter: usize,
        verse: usize,
        ch: char,
    },

    #[error("pack capacity exceeded: {field} = {value}")]
    CapacityExceeded { field: &'static str, value: u64 },

    #[error("verse offsets not monotonically increasing at entry {index}")]
    OffsetsNotMonotonic { index: usize },

    #[error("invalid pack: {0}")]
    InvalidPack(String),
}

pub type Result<T> = std::result::Result<T, Error>;
