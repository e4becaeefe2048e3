//! Core data model for verse-structured corpora.
//!
//! A corpus is an ordered collection of books, each book an ordered list
//! of chapters, each chapter an ordered list of verse strings. The model
//! is plain data: the loader builds it once from a validated document and
//! everything downstream (wrapping, search, packing, navigation) reads it
//! without mutating it.

mod loader;
pub mod sanitize;

pub use loader::{load_path, load_str, load_value, read_document};

/// An entire corpus in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pub books: Vec<Book>,
}

/// One book: display name, lookup abbreviation, and its chapters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub name: String,
    pub abbrev: String,
    pub chapters: Vec<Chapter>,
}

/// One chapter's verses, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chapter {
    pub verses: Vec<String>,
}

/// A (book, chapter, verse) position within a corpus. All indices 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub book: usize,
    pub chapter: usize,
    pub verse: usize,
}

impl Corpus {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Total chapters across all books.
    pub fn chapter_count(&self) -> usize {
        self.books.iter().map(|b| b.chapters.len()).sum()
    }

    /// Total verses across all books.
    pub fn verse_count(&self) -> usize {
        self.books
            .iter()
            .flat_map(|b| b.chapters.iter())
            .map(|c| c.verses.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn book(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    /// Find a book by its abbreviation (exact match).
    pub fn book_by_abbrev(&self, abbrev: &str) -> Option<(usize, &Book)> {
        self.books
            .iter()
            .enumerate()
            .find(|(_, book)| book.abbrev == abbrev)
    }

    pub fn chapter(&self, book: usize, chapter: usize) -> Option<&Chapter> {
        self.book(book)?.chapters.get(chapter)
    }

    pub fn verse(&self, book: usize, chapter: usize, verse: usize) -> Option<&str> {
        self.chapter(book, chapter)?.verse(verse)
    }

    /// Human-readable reference, 1-based as displayed: `"Gênesis 3:16"`.
    ///
    /// Unknown book indices format as an empty string.
    pub fn format_reference(&self, reference: Reference) -> String {
        match self.book(reference.book) {
            Some(book) => format!(
                "{} {}:{}",
                book.name,
                reference.chapter + 1,
                reference.verse + 1
            ),
            None => String::new(),
        }
    }
}

impl Book {
    pub fn new(name: impl Into<String>, abbrev: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        Self {
            name: name.into(),
            abbrev: abbrev.into(),
            chapters,
        }
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }
}

impl Chapter {
    pub fn new(verses: Vec<String>) -> Self {
        Self { verses }
    }

    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }

    pub fn verse(&self, index: usize) -> Option<&str> {
        self.verses.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

impl From<Vec<String>> for Chapter {
    fn from(verses: Vec<String>) -> Self {
        Self { verses }
    }
}

// ============================================================================
// Tests
// ============================================================================
