//! Corpus document loading and validation.
//!
//! The input is a JSON array of book objects:
//!
//! ```json
//! [{"name": "Gênesis", "abbrev": "gn", "chapters": [["verse", ...], ...]}, ...]
//! ```
//!
//! Validation is an explicit walk over the parsed value. Field shapes are
//! checked one by one and failures name the offending book or chapter by
//! position; nothing is derived or assumed from serde annotations.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;

use crate::corpus::{Book, Chapter, Corpus};
use crate::error::{Result, SchemaError};

/// Load a corpus from a document file on disk.
///
/// Decodes, parses, and validates in one step. See [`read_document`] for
/// the encoding rules and [`load_value`] for the validation rules.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let document = read_document(path)?;
    Ok(load_value(&document)?)
}

/// Parse and validate a corpus from JSON text.
///
/// A leading U+FEFF is stripped before parsing so text read from
/// BOM-prefixed files round-trips.
pub fn load_str(text: &str) -> Result<Corpus> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let document: Value = serde_json::from_str(text)?;
    Ok(load_value(&document)?)
}

/// Read and parse a document file without validating its shape.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. Falls back to Windows-1252 (common in old scripture dumps)
///
/// Used directly by tools that operate on the raw document, like the
/// sanitizer; [`load_path`] builds on it.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Value> {
    let bytes = std::fs::read(path)?;
    let text = decode_document(&bytes);
    Ok(serde_json::from_str(&text)?)
}

/// Decode document bytes to text.
fn decode_document(bytes: &[u8]) -> Cow<'_, str> {
    // Try UTF-8 first (handles BOM automatically)
    let (text, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return text;
    }

    // Fallback: Windows-1252 (superset of ISO-8859-1)
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text
}

/// Validate a parsed document and build the corpus model.
///
/// Checks, in order, for each book entry:
/// - the entry is an object
/// - `name` and `abbrev` are non-empty after trimming
/// - `abbrev` has not been seen before
/// - `chapters` is an array of arrays
///
/// Verse values are coerced to text (see [`coerce_text`]); a book with
/// zero chapters or a chapter with zero verses is accepted as-is.
pub fn load_value(document: &Value) -> std::result::Result<Corpus, SchemaError> {
    let entries = document.as_array().ok_or(SchemaError::TopLevelNotArray)?;

    let mut books = Vec::with_capacity(entries.len());
    let mut seen_abbrevs: HashSet<String> = HashSet::with_capacity(entries.len());

    for (b, entry) in entries.iter().enumerate() {
        let object = entry
            .as_object()
            .ok_or(SchemaError::BookNotObject { book: b })?;

        let name = object
            .get("name")
            .map(coerce_text)
            .unwrap_or_default()
            .trim()
            .to_string();
        if name.is_empty() {
            return Err(SchemaError::MissingField {
                book: b,
                field: "name",
            });
        }

        let abbrev = object
            .get("abbrev")
            .map(coerce_text)
            .unwrap_or_default()
            .trim()
            .to_string();
        if abbrev.is_empty() {
            return Err(SchemaError::MissingField {
                book: b,
                field: "abbrev",
            });
        }

        let chapter_values = object
            .get("chapters")
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaError::ChaptersNotArray {
                book: b,
                name: name.clone(),
            })?;

        let mut chapters = Vec::with_capacity(chapter_values.len());
        for (c, chapter_value) in chapter_values.iter().enumerate() {
            let verse_values =
                chapter_value
                    .as_array()
                    .ok_or_else(|| SchemaError::ChapterNotArray {
                        book: b,
                        name: name.clone(),
                        chapter: c,
                    })?;
            chapters.push(Chapter::new(verse_values.iter().map(coerce_text).collect()));
        }

        if !seen_abbrevs.insert(abbrev.clone()) {
            return Err(SchemaError::DuplicateAbbrev { book: b, abbrev });
        }

        books.push(Book::new(name, abbrev, chapters));
    }

    Ok(Corpus::new(books))
}

/// Coerce a JSON leaf to text.
///
/// Strings pass through unchanged. Numbers and booleans keep their JSON
/// spelling, `null` becomes the empty string. Containers fall back to
/// compact JSON; real documents never hit that branch but the loader must
/// not lose data when they do.
fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
