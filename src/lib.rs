//! # lectern
//!
//! Indexing, pagination, search, and random-access packing for
//! verse-structured text corpora (book → chapter → verse).
//!
//! ## Features
//!
//! - Load and validate JSON corpus documents with positional error reports
//! - Wrap chapters into numbered display lines with a verse-line index
//! - Case-insensitive full-text search in corpus order
//! - Pack a corpus into the compact BIB1 index + text blob for
//!   random-access readers, and parse packs back
//! - Drive list/reader/search navigation with a pure state machine
//!
//! ## Quick Start
//!
//! ```
//! use lectern::{load_str, pack, search, wrap_chapter};
//!
//! let corpus = load_str(
//!     r#"[{"name": "Gênesis", "abbrev": "gn",
//!         "chapters": [["No princípio criou Deus os céus e a terra.",
//!                       "E disse Deus: Haja luz; e houve luz."]]}]"#,
//! ).unwrap();
//!
//! // Numbered display lines at 40 columns
//! let layout = wrap_chapter(corpus.chapter(0, 0).unwrap(), 40);
//! assert!(layout.lines()[0].starts_with("  1 "));
//!
//! // Search hits come back in corpus order
//! let hits = search(&corpus, "LUZ");
//! assert_eq!((hits[0].chapter, hits[0].verse), (0, 1));
//!
//! // Pack for random access and read a verse straight back
//! let packed = pack(&corpus).unwrap();
//! let index = lectern::PackIndex::parse(&packed.index).unwrap();
//! let verse = index.verse_text(&packed.text, 0, 0, 1).unwrap();
//! assert!(verse.starts_with("E disse"));
//! ```
//!
//! ## Navigating
//!
//! [`NavState`] holds the whole reading session: which view is active,
//! every cursor, the wrapped layout, and the latest search results. Feed
//! it [`Event`]s and redraw from its accessors:
//!
//! ```
//! use lectern::{Event, NavState, View, load_str};
//!
//! let corpus = load_str(
//!     r#"[{"name": "Salmos", "abbrev": "sl", "chapters": [["Bem-aventurado o homem."]]}]"#,
//! ).unwrap();
//! let mut nav = NavState::new(&corpus, 80, 24);
//! nav.handle(Event::Select);
//! nav.handle(Event::Select);
//! assert_eq!(nav.view(), View::Reader);
//! ```

pub mod bib1;
pub mod corpus;
pub mod error;
pub mod nav;
pub mod search;
pub mod wrap;

pub use bib1::{Pack, PackIndex, PackStats, pack};
pub use corpus::{Book, Chapter, Corpus, Reference, load_path, load_str, load_value};
pub use error::{Error, Result, SchemaError};
pub use nav::{Event, NavState, View, Viewport};
pub use search::{SearchHit, search};
pub use wrap::{ChapterLayout, wrap_chapter};
