//! End-to-end navigation sessions over the sample fixture: load, browse,
//! search, jump, and reflow exactly as a render loop would drive it.

use lectern::{Event, NavState, Reference, View, load_path};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> String {
    format!("{FIXTURES_DIR}/{name}")
}

// ============================================================================
// Browsing
// ============================================================================

#[test]
fn test_browse_session_to_status_line() {
    let corpus = load_path(fixture_path("almeida_sample.json")).unwrap();
    let mut nav = NavState::new(&corpus, 60, 20);

    nav.handle(Event::Down);
    nav.handle(Event::Down);
    nav.handle(Event::Select); // Salmos
    assert_eq!(nav.view(), View::Chapters);

    nav.handle(Event::Down);
    nav.handle(Event::Select); // chapter 2
    assert_eq!(nav.view(), View::Reader);
    assert_eq!(nav.current_book(), 2);
    assert_eq!(nav.current_chapter(), 1);

    assert_eq!(corpus.format_reference(nav.top_reference()), "Salmos 2:1");
    assert!(nav.visible_lines()[0].starts_with("  1 Por que"));
}

#[test]
fn test_reader_lines_carry_numbers_and_indent() {
    let corpus = load_path(fixture_path("almeida_sample.json")).unwrap();
    let mut nav = NavState::new(&corpus, 30, 8);
    nav.handle(Event::Select);
    nav.handle(Event::Select); // Gênesis 1 at 28 columns

    let lines = nav.layout().lines();
    assert_eq!(lines[0], "  1 No princípio criou Deus");
    assert_eq!(lines[1], "    os céus e a terra.");
    assert_eq!(nav.layout().verse_count(), 4);
    assert_eq!(nav.layout().verse_starts(), &[0, 2, 8, 10]);
}

// ============================================================================
// Go to verse
// ============================================================================

#[test]
fn test_goto_verse_in_fixture_chapter() {
    let corpus = load_path(fixture_path("almeida_sample.json")).unwrap();
    let mut nav = NavState::new(&corpus, 30, 8);
    nav.handle(Event::Select);
    nav.handle(Event::Select);

    // Verse 3 starts on line 8 of 14; 5 rows visible, so max scroll is 9
    nav.handle(Event::GotoVerse(3));
    assert_eq!(nav.scroll(), 8);
    assert_eq!(nav.top_reference().verse, 2);
    assert_eq!(nav.visible_lines()[0], "  3 E disse Deus: Haja luz;");

    // The last verse's line is past the last full page and clamps
    nav.handle(Event::GotoVerse(4));
    assert_eq!(nav.scroll(), 9);
}

// ============================================================================
// Search sessions
// ============================================================================

#[test]
fn test_search_folds_case_and_accents() {
    let corpus = load_path(fixture_path("almeida_sample.json")).unwrap();
    let mut nav = NavState::new(&corpus, 60, 20);

    nav.handle(Event::Search("NÃO".to_string()));
    assert_eq!(nav.view(), View::Search);
    let hits = nav.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!((hits[0].book, hits[0].chapter, hits[0].verse), (2, 0, 0));

    // A second query from the results view replaces them
    nav.handle(Event::Search("senhor".to_string()));
    let hits = nav.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!((hits[0].book, hits[0].chapter, hits[0].verse), (2, 1, 1));
    assert_eq!(nav.last_query(), Some("senhor"));

    // Cancel returns to where the first search started
    nav.handle(Event::Back);
    assert_eq!(nav.view(), View::Books);
}

#[test]
fn test_search_select_jumps_to_verse_line() {
    let corpus = load_path(fixture_path("almeida_sample.json")).unwrap();
    let mut nav = NavState::new(&corpus, 30, 8);

    nav.handle(Event::Search("luz".to_string()));
    let hits = nav.hits();
    assert_eq!(hits.len(), 2);
    assert_eq!((hits[0].book, hits[0].chapter, hits[0].verse), (0, 0, 2));
    assert_eq!((hits[1].book, hits[1].chapter, hits[1].verse), (0, 0, 3));

    let reference = Reference {
        book: hits[0].book,
        chapter: hits[0].chapter,
        verse: hits[0].verse,
    };
    assert_eq!(corpus.format_reference(reference), "Gênesis 1:3");

    nav.handle(Event::Select);
    assert_eq!(nav.view(), View::Reader);
    assert_eq!(nav.scroll(), nav.layout().line_for_verse(2).unwrap());
    assert_eq!(nav.top_reference().verse, 2);
}

// ============================================================================
// Reflow
// ============================================================================

#[test]
fn test_resize_reflows_current_chapter() {
    let corpus = load_path(fixture_path("almeida_sample.json")).unwrap();
    let mut nav = NavState::new(&corpus, 60, 20);
    nav.handle(Event::Select);
    nav.handle(Event::Select);
    let wide = nav.layout().line_count();

    nav.handle(Event::Resize(30, 8));
    assert_eq!(nav.layout().width(), 28);
    assert_eq!(nav.layout().line_count(), 14);
    assert!(nav.layout().line_count() > wide);
    assert!(nav.scroll() <= nav.layout().line_count());

    // Same text, same verse count, new geometry
    assert_eq!(nav.layout().verse_count(), 4);
}
