//! Line wrapping and the verse-line index.
//!
//! Turns one chapter into fixed-width display lines. Each verse starts
//! with a right-aligned number in a four-column prefix and continues on
//! space-indented lines; the wrap itself is greedy word wrap that never
//! splits a word. The first display line of every verse is recorded in a
//! [`ChapterLayout`], which supports both jump-to-verse and the reverse
//! "which verse is this line in" lookup.
//!
//! Widths count characters, not bytes: the corpus is accented Latin text
//! and a `é` occupies one terminal cell.

use crate::corpus::Chapter;

/// Display lines and the verse-line index for one chapter at one width.
///
/// Layouts are immutable. Whenever the chapter or the available width
/// changes, callers build a fresh layout; nothing is patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterLayout {
    lines: Vec<String>,
    verse_starts: Vec<usize>,
    width: usize,
}

impl ChapterLayout {
    /// A layout with no verses and no lines.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All display lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of verses in the wrapped chapter.
    pub fn verse_count(&self) -> usize {
        self.verse_starts.len()
    }

    /// First display line of each verse. Strictly increasing, since every
    /// verse produces at least one line.
    pub fn verse_starts(&self) -> &[usize] {
        &self.verse_starts
    }

    /// The width this layout was wrapped at.
    pub fn width(&self) -> usize {
        self.width
    }

    /// First display line of `verse`, or `None` if out of range.
    pub fn line_for_verse(&self, verse: usize) -> Option<usize> {
        self.verse_starts.get(verse).copied()
    }

    /// The verse shown at display line `line`: the greatest verse whose
    /// first line is at or before `line`.
    ///
    /// Total over all inputs. Lines past the last verse start resolve to
    /// the last verse; an empty layout resolves to verse 0.
    pub fn verse_at_line(&self, line: usize) -> usize {
        if self.verse_starts.is_empty() {
            return 0;
        }
        let mut lo: isize = 0;
        let mut hi: isize = self.verse_starts.len() as isize - 1;
        let mut best: usize = 0;
        while lo <= hi {
            let mid = (lo + hi) / 2;
            if self.verse_starts[mid as usize] <= line {
                best = mid as usize;
                lo = mid + 1;
            } else {
                hi = mid - 1;
            }
        }
        best
    }
}

/// Wrap a chapter's verses into display lines at `width` columns.
pub fn wrap_chapter(chapter: &Chapter, width: usize) -> ChapterLayout {
    let mut lines = Vec::new();
    let mut verse_starts = Vec::with_capacity(chapter.verse_count());

    for (i, verse) in chapter.verses.iter().enumerate() {
        verse_starts.push(lines.len());
        wrap_verse(i + 1, verse, width, &mut lines);
    }

    ChapterLayout {
        lines,
        verse_starts,
        width,
    }
}

/// Wrap one verse, appending its display lines.
///
/// The first line carries `"{number:>3} "`; continuations are indented by
/// the same number of columns. The prefix always keeps its columns, so at
/// degenerate widths lines overflow rather than losing the verse number.
/// An empty verse still emits its prefix line.
fn wrap_verse(number: usize, text: &str, width: usize, out: &mut Vec<String>) {
    let prefix = format!("{number:>3} ");
    let indent = " ".repeat(prefix.len());
    let available = width.saturating_sub(prefix.len()).max(1);

    for (i, part) in wrap_text(text, available).into_iter().enumerate() {
        if i == 0 {
            out.push(format!("{prefix}{part}"));
        } else {
            out.push(format!("{indent}{part}"));
        }
    }
}

/// Greedy word wrap of `text` into lines of at most `width` characters.
///
/// Rules:
/// - breaks happen only at whitespace; a word longer than `width` goes
///   alone on its own overflowing line, never split
/// - whitespace runs between words on the same line are preserved
/// - whitespace falling on a line boundary is dropped
/// - always yields at least one line; blank text yields one empty line
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for (is_space, run) in runs(text) {
        let run_len = run.chars().count();
        if is_space {
            // Whitespace never opens a line; a trailing run is trimmed
            // when the line is flushed.
            if line_len > 0 {
                line.push_str(run);
                line_len += run_len;
            }
        } else {
            if line_len > 0 && line_len + run_len > width {
                lines.push(line.trim_end().to_string());
                line.clear();
                line_len = 0;
            }
            line.push_str(run);
            line_len += run_len;
        }
    }

    let tail = line.trim_end();
    if !tail.is_empty() {
        lines.push(tail.to_string());
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Split text into maximal runs of whitespace and non-whitespace.
fn runs(text: &str) -> impl Iterator<Item = (bool, &str)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|&(_, c)| c.is_whitespace() != is_space)
            .map_or(rest.len(), |(i, _)| i);
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some((is_space, run))
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chapter(verses: &[&str]) -> Chapter {
        Chapter::new(verses.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_prefix_and_continuation_indent() {
        let layout = wrap_chapter(&chapter(&["No princípio criou Deus os céus."]), 20);
        assert_eq!(layout.lines()[0], "  1 No princípio");
        assert_eq!(layout.lines()[1], "    criou Deus os");
        assert_eq!(layout.lines()[2], "    céus.");
        // Every line fits the requested width
        for line in layout.lines() {
            assert!(line.chars().count() <= 20);
        }
    }

    #[test]
    fn test_scenario_two_verses_width_20() {
        let layout = wrap_chapter(
            &chapter(&[
                "No princípio criou Deus os céus e a terra.",
                "E a terra era sem forma e vazia.",
            ]),
            20,
        );
        assert_eq!(layout.verse_starts(), &[0, 3]);
        assert!(layout.lines()[3].starts_with("  2 "));
        assert_eq!(layout.verse_at_line(0), 0);
        assert_eq!(layout.verse_at_line(2), 0);
        assert_eq!(layout.verse_at_line(3), 1);
        assert_eq!(layout.verse_at_line(99), 1);
    }

    #[test]
    fn test_verse_number_alignment() {
        let verses: Vec<String> = (0..120).map(|i| format!("verso {i}")).collect();
        let layout = wrap_chapter(&Chapter::new(verses), 40);
        let line_1 = &layout.lines()[layout.line_for_verse(0).unwrap()];
        let line_10 = &layout.lines()[layout.line_for_verse(9).unwrap()];
        let line_100 = &layout.lines()[layout.line_for_verse(99).unwrap()];
        assert!(line_1.starts_with("  1 "));
        assert!(line_10.starts_with(" 10 "));
        assert!(line_100.starts_with("100 "));
    }

    #[test]
    fn test_long_word_goes_alone_unsplit() {
        let layout = wrap_chapter(&chapter(&["eis Maer-Salal-Hás-Baz aqui"]), 12);
        // available = 8; the long word overflows on its own line
        assert_eq!(layout.lines()[0], "  1 eis");
        assert_eq!(layout.lines()[1], "    Maer-Salal-Hás-Baz");
        assert_eq!(layout.lines()[2], "    aqui");
    }

    #[test]
    fn test_interior_whitespace_preserved() {
        let layout = wrap_chapter(&chapter(&["a  b"]), 20);
        assert_eq!(layout.lines(), &["  1 a  b".to_string()]);
    }

    #[test]
    fn test_boundary_whitespace_dropped() {
        // "aa bb" at available=2 breaks between the words; the separating
        // space must not leak onto either line.
        let layout = wrap_chapter(&chapter(&["aa bb"]), 6);
        assert_eq!(layout.lines(), &["  1 aa".to_string(), "    bb".to_string()]);
    }

    #[test]
    fn test_empty_verse_keeps_prefix_line() {
        let layout = wrap_chapter(&chapter(&["", "  ", "x"]), 20);
        assert_eq!(layout.lines()[0], "  1 ");
        assert_eq!(layout.lines()[1], "  2 ");
        assert_eq!(layout.lines()[2], "  3 x");
        assert_eq!(layout.verse_starts(), &[0, 1, 2]);
    }

    #[test]
    fn test_degenerate_width() {
        // Width smaller than the prefix still leaves one column of text.
        let layout = wrap_chapter(&chapter(&["a b"]), 2);
        assert_eq!(layout.lines(), &["  1 a".to_string(), "    b".to_string()]);
    }

    #[test]
    fn test_widths_count_chars_not_bytes() {
        // "céu" is 4 bytes but 3 chars; three of them fit in 11 columns.
        let layout = wrap_chapter(&chapter(&["céu céu céu"]), 15);
        assert_eq!(layout.lines(), &["  1 céu céu céu".to_string()]);
    }

    #[test]
    fn test_empty_chapter() {
        let layout = wrap_chapter(&chapter(&[]), 20);
        assert_eq!(layout.line_count(), 0);
        assert_eq!(layout.verse_count(), 0);
        assert_eq!(layout.verse_at_line(5), 0);
        assert_eq!(layout.line_for_verse(0), None);
    }

    #[test]
    fn test_verse_at_line_between_starts() {
        let mut layout = wrap_chapter(
            &chapter(&["um dois três quatro cinco seis sete", "oito", "nove dez"]),
            16,
        );
        // starts: verse 0 wraps to multiple lines, so starts are spread out
        let starts = layout.verse_starts().to_vec();
        assert_eq!(starts[0], 0);
        for (verse, &start) in starts.iter().enumerate() {
            assert_eq!(layout.verse_at_line(start), verse);
            if start > 0 {
                assert_eq!(layout.verse_at_line(start - 1), verse - 1);
            }
        }
        layout = wrap_chapter(&chapter(&["só um"]), 16);
        assert_eq!(layout.verse_at_line(0), 0);
    }

    proptest! {
        #[test]
        fn prop_layout_invariants(
            verses in proptest::collection::vec(" ?[a-zà-ú]{0,12}( [a-zà-ú]{1,12}){0,8} ?", 0..20),
            width in 1usize..60
        ) {
            let layout = wrap_chapter(&Chapter::new(verses.clone()), width);

            // One start per verse, strictly increasing.
            prop_assert_eq!(layout.verse_count(), verses.len());
            for pair in layout.verse_starts().windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }

            // Every verse begins with its right-aligned number.
            for (i, &start) in layout.verse_starts().iter().enumerate() {
                let expected = format!("{:>3} ", i + 1);
                prop_assert!(layout.lines()[start].starts_with(&expected));
            }

            // The reverse lookup agrees with the forward index.
            for (i, &start) in layout.verse_starts().iter().enumerate() {
                prop_assert_eq!(layout.verse_at_line(start), i);
            }
        }

        #[test]
        fn prop_wrap_preserves_words(text in "[a-z]{1,20}( [a-z]{1,20}){0,10}", width in 1usize..40) {
            let wrapped = wrap_text(&text, width);
            let rejoined: Vec<&str> = wrapped
                .iter()
                .flat_map(|line| line.split_whitespace())
                .collect();
            let original: Vec<&str> = text.split_whitespace().collect();
            prop_assert_eq!(rejoined, original);
        }
    }
}
