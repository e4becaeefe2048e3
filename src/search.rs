//! Full-text search over a corpus.
//!
//! Literal, case-insensitive substring matching in corpus order. Folding
//! is full Unicode lowercasing on both sides so accented text matches the
//! way it reads ("CORAÇÃO" finds "coração"); ASCII-only folding would miss
//! every accented uppercase letter in the corpus. The scan is linear over
//! all verses, with the needle precompiled once.

use memchr::memmem;

use crate::corpus::Corpus;

/// Location of one search match. All indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub book: usize,
    pub chapter: usize,
    pub verse: usize,
}

/// Find every verse containing `query` as a case-insensitive substring.
///
/// Hits come back in canonical corpus order: by book, then chapter, then
/// verse. A query that is empty after trimming yields no hits.
pub fn search(corpus: &Corpus, query: &str) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    if query.trim().is_empty() {
        return hits;
    }

    let needle = fold(query);
    let finder = memmem::Finder::new(needle.as_bytes());
    let mut haystack = String::new();

    for (b, book) in corpus.books.iter().enumerate() {
        for (c, chapter) in book.chapters.iter().enumerate() {
            for (v, verse) in chapter.verses.iter().enumerate() {
                haystack.clear();
                fold_into(verse, &mut haystack);
                if finder.find(haystack.as_bytes()).is_some() {
                    hits.push(SearchHit {
                        book: b,
                        chapter: c,
                        verse: v,
                    });
                }
            }
        }
    }

    hits
}

/// Case-fold text for matching.
fn fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    fold_into(text, &mut out);
    out
}

fn fold_into(text: &str, out: &mut String) {
    out.extend(text.chars().flat_map(char::to_lowercase));
}

// ============================================================================
// Tests
// ============================================================================
