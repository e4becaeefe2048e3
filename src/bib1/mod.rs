//! BIB1 random-access pack format.
//!
//! A packed corpus is two artifacts: a text blob and an index. The blob is
//! every verse's Latin-1 bytes followed by one NUL, in canonical order. The
//! index is a fixed little-endian layout small enough for a constrained
//! reader to keep resident and walk without a parser:
//!
//! ```text
//! offset  0: magic "BIB1"
//! offset  4: u16 version (currently 1)
//! offset  6: u16 book count
//! offset  8: u32 total chapter count
//! offset 12: u32 total verse count
//! offset 16: u32 text blob size in bytes
//! then: book records    [u32 first_chapter, u16 chapter_count, u16 reserved] x books
//! then: chapter records [u32 first_verse,   u16 verse_count,   u16 reserved] x chapters
//! then: verse offsets   [u32 blob_offset] x verses
//! ```
//!
//! Chapter records are indexed globally: a book's record gives the index of
//! its first chapter record, and that in turn gives the index of its first
//! verse offset. Verse offsets increase strictly, so a verse's bytes run
//! from its offset to the next NUL.

mod reader;
mod writer;

pub use reader::PackIndex;
pub use writer::{Pack, PackStats, pack};

/// Index file magic tag.
pub const MAGIC: [u8; 4] = *b"BIB1";

/// Format version written and accepted.
pub const VERSION: u16 = 1;

/// Fixed header size in bytes.
pub const HEADER_SIZE: usize = 20;

/// Size of one book record in bytes.
pub const BOOK_ENTRY_SIZE: usize = 8;

/// Size of one chapter record in bytes.
pub const CHAPTER_ENTRY_SIZE: usize = 8;

/// Size of one verse offset entry in bytes.
pub const VERSE_ENTRY_SIZE: usize = 4;
