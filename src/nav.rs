//! Navigation state for reading a corpus interactively.
//!
//! The render loop owns the terminal; this module owns everything else:
//! the active view, every cursor and scroll position, the wrapped layout
//! of the current chapter, and the latest search results. Events go in,
//! clamped state comes out, and the caller redraws from the accessors.
//!
//! Layouts are rebuilt whole whenever the chapter or the viewport changes;
//! nothing is patched incrementally. Cursors are re-clamped on every event
//! so a resize can never leave a selection pointing past the end of a list.

use crate::corpus::{Book, Corpus, Reference};
use crate::search::{SearchHit, search};
use crate::wrap::{ChapterLayout, wrap_chapter};

/// The active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Book list.
    Books,
    /// Chapter list of the selected book.
    Chapters,
    /// Wrapped chapter text.
    Reader,
    /// Search results.
    Search,
}

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Rows available to lists and the reader body (everything but the
    /// header and status chrome).
    pub fn page_rows(&self) -> usize {
        self.height.saturating_sub(3).max(1)
    }

    /// Rows available to the search result list, which also shows the
    /// query line.
    pub fn search_rows(&self) -> usize {
        self.height.saturating_sub(4).max(1)
    }

    /// Columns the reader wraps text into.
    pub fn content_width(&self) -> usize {
        self.width.saturating_sub(2).max(10)
    }
}

/// Input events fed by the render loop.
///
/// Text entry (the search prompt, the go-to-verse prompt) happens outside
/// this state machine; the finished input arrives as a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    /// Previous chapter of the current book (reader only).
    PrevChapter,
    /// Next chapter of the current book (reader only).
    NextChapter,
    /// Activate the selection (enter a book, a chapter, or a search hit).
    Select,
    /// Leave the current view; cancels the search view.
    Back,
    /// Jump to a verse by its displayed 1-based number (reader only).
    GotoVerse(usize),
    /// Run a search and show the results.
    Search(String),
    /// The terminal was resized.
    Resize(usize, usize),
}

/// Navigation state machine over a loaded corpus.
pub struct NavState<'a> {
    corpus: &'a Corpus,
    view: View,
    viewport: Viewport,

    book_cursor: usize,
    book_top: usize,
    chapter_cursor: usize,
    chapter_top: usize,

    current_book: usize,
    current_chapter: usize,
    scroll: usize,
    layout: ChapterLayout,

    hits: Vec<SearchHit>,
    hit_cursor: usize,
    hit_top: usize,
    last_query: Option<String>,
    search_return: View,
}

impl<'a> NavState<'a> {
    /// Create the state machine, starting in the book list.
    ///
    /// The layout for the first chapter is built eagerly so the reader is
    /// valid from the first frame; an empty corpus gets an empty layout.
    pub fn new(corpus: &'a Corpus, width: usize, height: usize) -> Self {
        let mut state = Self {
            corpus,
            view: View::Books,
            viewport: Viewport::new(width, height),
            book_cursor: 0,
            book_top: 0,
            chapter_cursor: 0,
            chapter_top: 0,
            current_book: 0,
            current_chapter: 0,
            scroll: 0,
            layout: ChapterLayout::empty(),
            hits: Vec::new(),
            hit_cursor: 0,
            hit_top: 0,
            last_query: None,
            search_return: View::Books,
        };
        state.rebuild();
        state
    }

    /// Apply one event.
    ///
    /// Invalid requests (a verse number out of range, a blank query, a
    /// movement past a list end) leave the state unchanged rather than
    /// failing.
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Resize(width, height) => self.resize(width, height),
            Event::Search(query) => self.submit_search(&query),
            event => match self.view {
                View::Books => self.on_books(event),
                View::Chapters => self.on_chapters(event),
                View::Reader => self.on_reader(event),
                View::Search => self.on_search(event),
            },
        }
    }

    // --- Accessors ---

    pub fn view(&self) -> View {
        self.view
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn book_cursor(&self) -> usize {
        self.book_cursor
    }

    /// First visible row of the book list.
    pub fn book_top(&self) -> usize {
        self.book_top
    }

    pub fn chapter_cursor(&self) -> usize {
        self.chapter_cursor
    }

    /// First visible row of the chapter list.
    pub fn chapter_top(&self) -> usize {
        self.chapter_top
    }

    /// Book shown in the reader.
    pub fn current_book(&self) -> usize {
        self.current_book
    }

    /// Chapter shown in the reader (local to the current book).
    pub fn current_chapter(&self) -> usize {
        self.current_chapter
    }

    /// First visible display line of the reader.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Wrapped layout of the current chapter at the current width.
    pub fn layout(&self) -> &ChapterLayout {
        &self.layout
    }

    /// The slice of display lines currently on screen.
    pub fn visible_lines(&self) -> &[String] {
        let start = self.scroll.min(self.layout.line_count());
        let end = (start + self.viewport.page_rows()).min(self.layout.line_count());
        &self.layout.lines()[start..end]
    }

    /// The reference of the verse at the top of the reader viewport, for
    /// the status line.
    pub fn top_reference(&self) -> Reference {
        Reference {
            book: self.current_book,
            chapter: self.current_chapter,
            verse: self.layout.verse_at_line(self.scroll),
        }
    }

    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    pub fn hit_cursor(&self) -> usize {
        self.hit_cursor
    }

    /// First visible row of the search result list.
    pub fn hit_top(&self) -> usize {
        self.hit_top
    }

    /// The most recent non-empty query, if any.
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    // --- Event handling per view ---

    fn on_books(&mut self, event: Event) {
        let count = self.corpus.book_count();
        let last = count.saturating_sub(1);
        let rows = self.viewport.page_rows();
        match event {
            Event::Up => self.book_cursor = self.book_cursor.saturating_sub(1),
            Event::Down => self.book_cursor = (self.book_cursor + 1).min(last),
            Event::PageUp => self.book_cursor = self.book_cursor.saturating_sub(rows),
            Event::PageDown => self.book_cursor = (self.book_cursor + rows).min(last),
            Event::Select => {
                if count > 0 {
                    self.current_book = self.book_cursor;
                    self.chapter_cursor = 0;
                    self.chapter_top = 0;
                    self.view = View::Chapters;
                }
            }
            _ => {}
        }
        follow_cursor(self.book_cursor, &mut self.book_top, count, rows);
    }

    fn on_chapters(&mut self, event: Event) {
        let count = self.current_chapter_count();
        let last = count.saturating_sub(1);
        let rows = self.viewport.page_rows();
        match event {
            Event::Up => self.chapter_cursor = self.chapter_cursor.saturating_sub(1),
            Event::Down => self.chapter_cursor = (self.chapter_cursor + 1).min(last),
            Event::PageUp => self.chapter_cursor = self.chapter_cursor.saturating_sub(rows),
            Event::PageDown => self.chapter_cursor = (self.chapter_cursor + rows).min(last),
            Event::Select => {
                if count > 0 {
                    self.current_chapter = self.chapter_cursor;
                    self.scroll = 0;
                    self.rebuild();
                    self.view = View::Reader;
                }
            }
            Event::Back => self.view = View::Books,
            _ => {}
        }
        follow_cursor(self.chapter_cursor, &mut self.chapter_top, count, rows);
    }

    fn on_reader(&mut self, event: Event) {
        let rows = self.viewport.page_rows();
        match event {
            Event::Up => self.scroll = self.scroll.saturating_sub(1),
            Event::Down => self.scroll = (self.scroll + 1).min(self.max_scroll()),
            Event::PageUp => self.scroll = self.scroll.saturating_sub(rows),
            Event::PageDown => self.scroll = (self.scroll + rows).min(self.max_scroll()),
            Event::Home => self.scroll = 0,
            Event::End => self.scroll = self.max_scroll(),
            Event::PrevChapter => {
                if self.current_chapter > 0 {
                    self.current_chapter -= 1;
                    self.scroll = 0;
                    self.rebuild();
                }
            }
            Event::NextChapter => {
                if self.current_chapter + 1 < self.current_chapter_count() {
                    self.current_chapter += 1;
                    self.scroll = 0;
                    self.rebuild();
                }
            }
            Event::GotoVerse(number) => {
                if let Some(line) = number
                    .checked_sub(1)
                    .and_then(|verse| self.layout.line_for_verse(verse))
                {
                    self.scroll = line.min(self.max_scroll());
                }
            }
            Event::Back => {
                // Reopen the chapter list with the current chapter centered.
                self.chapter_cursor = self.current_chapter;
                self.chapter_top = self.current_chapter.saturating_sub(rows / 2);
                let count = self.current_chapter_count();
                follow_cursor(self.chapter_cursor, &mut self.chapter_top, count, rows);
                self.view = View::Chapters;
            }
            _ => {}
        }
    }

    fn on_search(&mut self, event: Event) {
        let count = self.hits.len();
        let last = count.saturating_sub(1);
        let rows = self.viewport.search_rows();
        match event {
            Event::Up => self.hit_cursor = self.hit_cursor.saturating_sub(1),
            Event::Down => self.hit_cursor = (self.hit_cursor + 1).min(last),
            Event::PageUp => self.hit_cursor = self.hit_cursor.saturating_sub(rows),
            Event::PageDown => self.hit_cursor = (self.hit_cursor + rows).min(last),
            Event::Select => {
                if let Some(&hit) = self.hits.get(self.hit_cursor) {
                    self.current_book = hit.book;
                    self.current_chapter = hit.chapter;
                    self.rebuild();
                    if let Some(line) = self.layout.line_for_verse(hit.verse) {
                        self.scroll = line.min(self.max_scroll());
                    }
                    self.view = View::Reader;
                }
            }
            Event::Back => {
                self.view = self.search_return;
                if self.view == View::Reader {
                    self.rebuild();
                }
            }
            _ => {}
        }
        follow_cursor(self.hit_cursor, &mut self.hit_top, count, rows);
    }

    fn submit_search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.hits = search(self.corpus, query);
        self.hit_cursor = 0;
        self.hit_top = 0;
        self.last_query = Some(query.to_string());
        if self.view != View::Search {
            self.search_return = self.view;
        }
        self.view = View::Search;
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.viewport = Viewport::new(width, height);
        self.rebuild();
        self.clamp_cursors();
    }

    /// Rebuild the reader layout for the current chapter and width, then
    /// re-clamp the scroll position against the new line count.
    fn rebuild(&mut self) {
        let width = self.viewport.content_width();
        self.layout = match self.corpus.chapter(self.current_book, self.current_chapter) {
            Some(chapter) => wrap_chapter(chapter, width),
            None => ChapterLayout::empty(),
        };
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn max_scroll(&self) -> usize {
        self.layout
            .line_count()
            .saturating_sub(self.viewport.page_rows())
    }

    fn clamp_cursors(&mut self) {
        let books = self.corpus.book_count();
        let chapters = self.current_chapter_count();
        let rows = self.viewport.page_rows();

        self.book_cursor = self.book_cursor.min(books.saturating_sub(1));
        follow_cursor(self.book_cursor, &mut self.book_top, books, rows);

        self.chapter_cursor = self.chapter_cursor.min(chapters.saturating_sub(1));
        follow_cursor(self.chapter_cursor, &mut self.chapter_top, chapters, rows);

        self.hit_cursor = self.hit_cursor.min(self.hits.len().saturating_sub(1));
        follow_cursor(
            self.hit_cursor,
            &mut self.hit_top,
            self.hits.len(),
            self.viewport.search_rows(),
        );
    }

    fn current_chapter_count(&self) -> usize {
        self.corpus
            .book(self.current_book)
            .map_or(0, Book::chapter_count)
    }
}

/// Keep a list window positioned so `cursor` stays visible.
///
/// The window top is first clamped against the list length, then pulled
/// up or pushed down until the cursor row falls inside it. `rows` must be
/// at least 1.
fn follow_cursor(cursor: usize, top: &mut usize, len: usize, rows: usize) {
    *top = (*top).min(len.saturating_sub(rows));
    if cursor < *top {
        *top = cursor;
    } else if cursor >= *top + rows {
        *top = cursor + 1 - rows;
    }
}

// ============================================================================
// Tests
// ============================================================================
