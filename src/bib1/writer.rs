//! BIB1 pack writer: corpus model in, index plus text blob out.

use std::fs;
use std::path::Path;

use crate::corpus::Corpus;
use crate::error::{Error, Result};

use super::{BOOK_ENTRY_SIZE, CHAPTER_ENTRY_SIZE, HEADER_SIZE, MAGIC, VERSE_ENTRY_SIZE, VERSION};

/// A packed corpus, ready to write or parse back.
#[derive(Debug, Clone)]
pub struct Pack {
    /// The index artifact (header + tables).
    pub index: Vec<u8>,
    /// The text blob artifact (NUL-terminated Latin-1 verse records).
    pub text: Vec<u8>,
    stats: PackStats,
}

/// Cardinalities and sizes of a finished pack, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackStats {
    pub books: usize,
    pub chapters: usize,
    pub verses: usize,
    pub text_bytes: usize,
    pub index_bytes: usize,
    /// Longest verse record in the blob, NUL included.
    pub max_verse_bytes: usize,
}

impl Pack {
    pub fn stats(&self) -> PackStats {
        self.stats
    }

    /// Write both artifacts into `dir`, creating it if needed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use lectern::{load_path, pack};
    ///
    /// let corpus = load_path("corpus.json")?;
    /// let packed = pack(&corpus)?;
    /// packed.write_to_dir("cd", "BIBLE.BIN", "BIBLE.IDX")?;
    /// # Ok::<(), lectern::Error>(())
    /// ```
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P, bin_name: &str, idx_name: &str) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        fs::write(dir.join(bin_name), &self.text)?;
        fs::write(dir.join(idx_name), &self.index)?;
        Ok(())
    }
}

/// Pack a corpus for random access.
///
/// Walks the corpus in canonical order. Each verse's blob offset is
/// recorded before its bytes go out, then the Latin-1 text and one NUL
/// terminator are appended, so verse `i` reads back as the bytes from
/// `offsets[i]` to the next NUL. Book and chapter records accumulate the
/// running first-chapter and first-verse indices as the walk proceeds.
///
/// Fails with [`Error::Encoding`] on any character outside Latin-1 and
/// with [`Error::CapacityExceeded`] when a count or offset overflows its
/// fixed-width field.
pub fn pack(corpus: &Corpus) -> Result<Pack> {
    let mut text = Vec::new();
    let mut book_records: Vec<(u32, u16)> = Vec::with_capacity(corpus.book_count());
    let mut chapter_records: Vec<(u32, u16)> = Vec::new();
    let mut verse_offsets: Vec<u32> = Vec::new();
    let mut max_verse_bytes = 0usize;

    for (b, book) in corpus.books.iter().enumerate() {
        let first_chapter = cast_u32(chapter_records.len(), "first chapter index")?;
        let chapter_count = cast_u16(book.chapter_count(), "chapters in book")?;

        for (c, chapter) in book.chapters.iter().enumerate() {
            let first_verse = cast_u32(verse_offsets.len(), "first verse index")?;
            let verse_count = cast_u16(chapter.verse_count(), "verses in chapter")?;

            for (v, verse) in chapter.verses.iter().enumerate() {
                verse_offsets.push(cast_u32(text.len(), "text offset")?);
                let start = text.len();
                encode_verse(verse, b, c, v, &mut text)?;
                text.push(0);
                max_verse_bytes = max_verse_bytes.max(text.len() - start);
            }

            chapter_records.push((first_verse, verse_count));
        }

        book_records.push((first_chapter, chapter_count));
    }

    check_offsets(&verse_offsets)?;

    let book_count = cast_u16(book_records.len(), "book count")?;
    let chapter_count = cast_u32(chapter_records.len(), "chapter count")?;
    let verse_count = cast_u32(verse_offsets.len(), "verse count")?;
    let text_size = cast_u32(text.len(), "text size")?;

    let index_size = HEADER_SIZE
        + book_records.len() * BOOK_ENTRY_SIZE
        + chapter_records.len() * CHAPTER_ENTRY_SIZE
        + verse_offsets.len() * VERSE_ENTRY_SIZE;
    let mut index = Vec::with_capacity(index_size);

    // Header
    index.extend_from_slice(&MAGIC);
    index.extend_from_slice(&VERSION.to_le_bytes());
    index.extend_from_slice(&book_count.to_le_bytes());
    index.extend_from_slice(&chapter_count.to_le_bytes());
    index.extend_from_slice(&verse_count.to_le_bytes());
    index.extend_from_slice(&text_size.to_le_bytes());

    // Book records
    for (first_chapter, chapter_count) in &book_records {
        index.extend_from_slice(&first_chapter.to_le_bytes());
        index.extend_from_slice(&chapter_count.to_le_bytes());
        index.extend_from_slice(&0u16.to_le_bytes());
    }

    // Chapter records
    for (first_verse, verse_count) in &chapter_records {
        index.extend_from_slice(&first_verse.to_le_bytes());
        index.extend_from_slice(&verse_count.to_le_bytes());
        index.extend_from_slice(&0u16.to_le_bytes());
    }

    // Verse offsets
    for offset in &verse_offsets {
        index.extend_from_slice(&offset.to_le_bytes());
    }

    debug_assert_eq!(index.len(), index_size);

    let stats = PackStats {
        books: book_records.len(),
        chapters: chapter_records.len(),
        verses: verse_offsets.len(),
        text_bytes: text.len(),
        index_bytes: index.len(),
        max_verse_bytes,
    };
    Ok(Pack { index, text, stats })
}

/// Append one verse's Latin-1 bytes, mapping CR and LF to spaces.
///
/// Encoding is strict: a character above U+00FF fails with the verse's
/// position rather than writing a lossy substitute.
fn encode_verse(
    verse: &str,
    book: usize,
    chapter: usize,
    verse_index: usize,
    out: &mut Vec<u8>,
) -> Result<()> {
    for ch in verse.chars() {
        let ch = if ch == '\r' || ch == '\n' { ' ' } else { ch };
        let code = ch as u32;
        if code > 0xFF {
            return Err(Error::Encoding {
                book,
                chapter,
                verse: verse_index,
                ch,
            });
        }
        out.push(code as u8);
    }
    Ok(())
}

/// Verify that verse offsets increase strictly.
///
/// Every record carries at least its NUL terminator, so a correct walk can
/// never violate this; the check guards the format invariant the reader
/// depends on.
fn check_offsets(offsets: &[u32]) -> Result<()> {
    for (i, pair) in offsets.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(Error::OffsetsNotMonotonic { index: i + 1 });
        }
    }
    Ok(())
}

fn cast_u16(value: usize, field: &'static str) -> Result<u16> {
    u16::try_from(value).map_err(|_| Error::CapacityExceeded {
        field,
        value: value as u64,
    })
}

fn cast_u32(value: usize, field: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::CapacityExceeded {
        field,
        value: value as u64,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Book, Chapter};

    fn single_book(verses: &[&str]) -> Corpus {
        Corpus::new(vec![Book::new(
            "Gênesis",
            "gn",
            vec![Chapter::new(verses.iter().map(|v| v.to_string()).collect())],
        )])
    }

    #[test]
    fn test_header_layout() {
        let pack = pack(&single_book(&["No princípio", "criou Deus"])).unwrap();
        let index = &pack.index;

        assert_eq!(&index[0..4], b"BIB1");
        assert_eq!(u16::from_le_bytes([index[4], index[5]]), 1);
        assert_eq!(u16::from_le_bytes([index[6], index[7]]), 1); // books
        assert_eq!(
            u32::from_le_bytes([index[8], index[9], index[10], index[11]]),
            1 // chapters
        );
        assert_eq!(
            u32::from_le_bytes([index[12], index[13], index[14], index[15]]),
            2 // verses
        );
        let text_size = u32::from_le_bytes([index[16], index[17], index[18], index[19]]);
        assert_eq!(text_size as usize, pack.text.len());
    }

    #[test]
    fn test_offsets_follow_record_lengths() {
        let pack = pack(&single_book(&["abc", "de"])).unwrap();
        // First offset 0, second offset len("abc") + NUL = 4
        let offsets_at = HEADER_SIZE + BOOK_ENTRY_SIZE + CHAPTER_ENTRY_SIZE;
        let first = u32::from_le_bytes([
            pack.index[offsets_at],
            pack.index[offsets_at + 1],
            pack.index[offsets_at + 2],
            pack.index[offsets_at + 3],
        ]);
        let second = u32::from_le_bytes([
            pack.index[offsets_at + 4],
            pack.index[offsets_at + 5],
            pack.index[offsets_at + 6],
            pack.index[offsets_at + 7],
        ]);
        assert_eq!(first, 0);
        assert_eq!(second, 4);
        assert_eq!(pack.text, b"abc\0de\0");
    }

    #[test]
    fn test_index_size_matches_counts() {
        let corpus = Corpus::new(vec![
            Book::new("A", "a", vec![Chapter::new(vec!["x".into()]); 3]),
            Book::new("B", "b", vec![Chapter::new(vec!["y".into(), "z".into()]); 2]),
        ]);
        let pack = pack(&corpus).unwrap();
        let stats = pack.stats();
        assert_eq!(stats.books, 2);
        assert_eq!(stats.chapters, 5);
        assert_eq!(stats.verses, 7);
        assert_eq!(
            pack.index.len(),
            HEADER_SIZE + 2 * BOOK_ENTRY_SIZE + 5 * CHAPTER_ENTRY_SIZE + 7 * VERSE_ENTRY_SIZE
        );
    }

    #[test]
    fn test_latin1_bytes_and_newline_normalization() {
        let pack = pack(&single_book(&["céu\né", "a\r\nb"])).unwrap();
        // é = 0xE9, ç does not appear; newline becomes space
        assert_eq!(pack.text, b"c\xE9u \xE9\0a  b\0");
    }

    #[test]
    fn test_non_latin1_fails_with_position() {
        let corpus = Corpus::new(vec![Book::new(
            "Atos",
            "at",
            vec![
                Chapter::new(vec!["ok".into()]),
                Chapter::new(vec!["ok".into(), "grego: αβγ".into()]),
            ],
        )]);
        let err = pack(&corpus).unwrap_err();
        match err {
            Error::Encoding {
                book,
                chapter,
                verse,
                ch,
            } => {
                assert_eq!((book, chapter, verse), (0, 1, 1));
                assert_eq!(ch, 'α');
            }
            other => panic!("expected Encoding error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_verse_is_one_nul() {
        let pack = pack(&single_book(&["", "x"])).unwrap();
        assert_eq!(pack.text, b"\0x\0");
        assert_eq!(pack.stats().max_verse_bytes, 2);
    }

    #[test]
    fn test_verse_count_capacity() {
        // 70 000 verses in one chapter overflows the u16 verse count
        let verses = vec![String::new(); 70_000];
        let corpus = Corpus::new(vec![Book::new("X", "x", vec![Chapter::new(verses)])]);
        let err = pack(&corpus).unwrap_err();
        assert!(matches!(
            err,
            Error::CapacityExceeded {
                field: "verses in chapter",
                ..
            }
        ));
    }

    #[test]
    fn test_check_offsets_rejects_regression() {
        assert!(check_offsets(&[0, 4, 9]).is_ok());
        let err = check_offsets(&[0, 4, 4]).unwrap_err();
        assert!(matches!(err, Error::OffsetsNotMonotonic { index: 2 }));
    }

    #[test]
    fn test_empty_corpus_packs_to_bare_header() {
        let pack = pack(&Corpus::default()).unwrap();
        assert_eq!(pack.index.len(), HEADER_SIZE);
        assert!(pack.text.is_empty());
        assert_eq!(pack.stats().max_verse_bytes, 0);
    }
}
