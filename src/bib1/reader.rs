//! BIB1 pack index parsing and random-access verse lookup.
//!
//! Performs the same checks a constrained reader runs before trusting an
//! index: magic, version, and the exact file size the header counts imply.
//! Offsets are additionally verified to increase strictly and stay inside
//! the declared blob size, so lookups can index without rechecking.

use memchr::memchr;

use crate::error::{Error, Result};

use super::{BOOK_ENTRY_SIZE, CHAPTER_ENTRY_SIZE, HEADER_SIZE, MAGIC, VERSE_ENTRY_SIZE, VERSION};

/// Parsed view of a BIB1 index.
#[derive(Debug, Clone)]
pub struct PackIndex {
    version: u16,
    text_size: u32,
    books: Vec<BookRecord>,
    chapters: Vec<ChapterRecord>,
    offsets: Vec<u32>,
}

#[derive(Debug, Clone, Copy)]
struct BookRecord {
    first_chapter: u32,
    chapter_count: u16,
}

#[derive(Debug, Clone, Copy)]
struct ChapterRecord {
    first_verse: u32,
    verse_count: u16,
}

impl PackIndex {
    /// Parse and validate an index file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use lectern::PackIndex;
    ///
    /// let data = std::fs::read("cd/BIBLE.IDX")?;
    /// let index = PackIndex::parse(&data)?;
    /// println!("{} books", index.book_count());
    /// # Ok::<(), lectern::Error>(())
    /// ```
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::InvalidPack(format!(
                "truncated header: {} bytes",
                data.len()
            )));
        }
        if data[0..4] != MAGIC {
            return Err(Error::InvalidPack("bad magic".to_string()));
        }

        let version = read_u16_le(data, 4);
        if version != VERSION {
            return Err(Error::InvalidPack(format!(
                "unsupported version {version}"
            )));
        }

        let book_count = read_u16_le(data, 6) as usize;
        let chapter_count = read_u32_le(data, 8) as usize;
        let verse_count = read_u32_le(data, 12) as usize;
        let text_size = read_u32_le(data, 16);

        let expected = HEADER_SIZE
            + book_count * BOOK_ENTRY_SIZE
            + chapter_count * CHAPTER_ENTRY_SIZE
            + verse_count * VERSE_ENTRY_SIZE;
        if data.len() != expected {
            return Err(Error::InvalidPack(format!(
                "size mismatch: {} bytes on disk, header implies {expected}",
                data.len()
            )));
        }

        let mut pos = HEADER_SIZE;

        let mut books = Vec::with_capacity(book_count);
        for _ in 0..book_count {
            books.push(BookRecord {
                first_chapter: read_u32_le(data, pos),
                chapter_count: read_u16_le(data, pos + 4),
            });
            pos += BOOK_ENTRY_SIZE;
        }

        let mut chapters = Vec::with_capacity(chapter_count);
        for _ in 0..chapter_count {
            chapters.push(ChapterRecord {
                first_verse: read_u32_le(data, pos),
                verse_count: read_u16_le(data, pos + 4),
            });
            pos += CHAPTER_ENTRY_SIZE;
        }

        let mut offsets = Vec::with_capacity(verse_count);
        for _ in 0..verse_count {
            offsets.push(read_u32_le(data, pos));
            pos += VERSE_ENTRY_SIZE;
        }

        for (i, pair) in offsets.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(Error::InvalidPack(format!(
                    "offsets not monotonic at entry {}",
                    i + 1
                )));
            }
        }
        if let Some(&last) = offsets.last()
            && last >= text_size
        {
            return Err(Error::InvalidPack(format!(
                "offset {last} beyond text size {text_size}"
            )));
        }

        Ok(Self {
            version,
            text_size,
            books,
            chapters,
            offsets,
        })
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Total chapters across all books.
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Total verses across all books.
    pub fn verse_count(&self) -> usize {
        self.offsets.len()
    }

    /// Declared size of the companion text blob in bytes.
    pub fn text_size(&self) -> u32 {
        self.text_size
    }

    /// Global index of `book`'s first chapter record.
    pub fn book_first_chapter(&self, book: usize) -> Option<u32> {
        self.books.get(book).map(|r| r.first_chapter)
    }

    /// Number of chapters in `book`.
    pub fn book_chapter_count(&self, book: usize) -> Option<u16> {
        self.books.get(book).map(|r| r.chapter_count)
    }

    /// Global index of the first verse of global chapter `chapter`.
    pub fn chapter_first_verse(&self, chapter: usize) -> Option<u32> {
        self.chapters.get(chapter).map(|r| r.first_verse)
    }

    /// Number of verses in global chapter `chapter`.
    pub fn chapter_verse_count(&self, chapter: usize) -> Option<u16> {
        self.chapters.get(chapter).map(|r| r.verse_count)
    }

    /// Blob offset of global verse `verse`.
    pub fn verse_offset(&self, verse: usize) -> Option<u32> {
        self.offsets.get(verse).copied()
    }

    /// Resolve (book, local chapter, local verse) to a global verse index.
    ///
    /// All arguments are 0-based; the chapter is local to the book and the
    /// verse local to the chapter. Returns `None` when any step is out of
    /// range.
    pub fn locate(&self, book: usize, chapter: usize, verse: usize) -> Option<usize> {
        let book_record = self.books.get(book)?;
        if chapter >= book_record.chapter_count as usize {
            return None;
        }
        let chapter_record = self.chapters.get(book_record.first_chapter as usize + chapter)?;
        if verse >= chapter_record.verse_count as usize {
            return None;
        }
        Some(chapter_record.first_verse as usize + verse)
    }

    /// Read one verse's text out of the companion blob.
    ///
    /// The blob must be exactly the size the header declares. The record
    /// runs from the verse's offset to the next NUL and decodes as strict
    /// Latin-1.
    pub fn verse_text(&self, blob: &[u8], book: usize, chapter: usize, verse: usize) -> Result<String> {
        if blob.len() != self.text_size as usize {
            return Err(Error::InvalidPack(format!(
                "blob is {} bytes, header declares {}",
                blob.len(),
                self.text_size
            )));
        }
        let global = self.locate(book, chapter, verse).ok_or_else(|| {
            Error::InvalidPack(format!("verse ({book},{chapter},{verse}) out of range"))
        })?;
        let offset = self
            .offsets
            .get(global)
            .copied()
            .ok_or_else(|| Error::InvalidPack(format!("no offset for verse entry {global}")))?;

        let tail = &blob[offset as usize..];
        let end = memchr(0, tail)
            .ok_or_else(|| Error::InvalidPack("unterminated verse record".to_string()))?;
        Ok(decode_latin1(&tail[..end]))
    }
}

/// Decode strict Latin-1: every byte is its own scalar value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

// --- Byte reading helpers ---

#[inline]
fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

#[inline]
fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

// ============================================================================
// Tests
// ============================================================================
