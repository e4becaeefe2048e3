//! Control-character repair for corpus documents.
//!
//! Source dumps that went through a Windows-1252 round-trip carry a small
//! set of C1 control bytes spliced into words (0x85, 0x96, 0x97, 0x9E) plus
//! literal newlines inside verses. The repair table below substitutes every
//! known pattern; [`find_control_chars`] then reports anything that remains
//! so a damaged document never reaches the packer unnoticed.

use std::fmt;

use serde_json::Value;

/// Counts of each substitution class applied by [`sanitize_value`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixStats {
    /// Literal newlines replaced by spaces.
    pub newline_to_space: usize,
    /// U+0096 replaced by a hyphen.
    pub dash_en: usize,
    /// U+0097 replaced by a spaced hyphen.
    pub dash_em: usize,
    /// `E` + U+009E replaced by `Ê`.
    pub circumflex_upper: usize,
    /// `e` + U+009E replaced by `ê`.
    pub circumflex_lower: usize,
    /// `i` + U+0085 replaced by `í`.
    pub acute_i: usize,
    /// Strings that changed at all.
    pub strings_changed: usize,
}

impl FixStats {
    /// Total individual substitutions across all classes.
    pub fn total_replacements(&self) -> usize {
        self.newline_to_space
            + self.dash_en
            + self.dash_em
            + self.circumflex_upper
            + self.circumflex_lower
            + self.acute_i
    }
}

/// The repair table, applied in order.
///
/// Newlines go first so a control character next to a line break is seen
/// in its repaired context by the later patterns.
const REPAIRS: [(&str, &str); 6] = [
    ("\n", " "),
    ("\u{96}", "-"),
    ("\u{97}", " - "),
    ("E\u{9e}", "Ê"),
    ("e\u{9e}", "ê"),
    ("i\u{85}", "í"),
];

/// Apply the repair table to one string.
pub fn sanitize_text(text: &str, stats: &mut FixStats) -> String {
    let mut result = text.to_string();
    let mut changed = false;

    for (index, (pattern, replacement)) in REPAIRS.iter().enumerate() {
        let count = result.matches(pattern).count();
        if count == 0 {
            continue;
        }
        result = result.replace(pattern, replacement);
        changed = true;
        match index {
            0 => stats.newline_to_space += count,
            1 => stats.dash_en += count,
            2 => stats.dash_em += count,
            3 => stats.circumflex_upper += count,
            4 => stats.circumflex_lower += count,
            _ => stats.acute_i += count,
        }
    }

    if changed {
        stats.strings_changed += 1;
    }
    result
}

/// Recursively sanitize every string in a JSON document in place.
pub fn sanitize_value(document: &mut Value) -> FixStats {
    let mut stats = FixStats::default();
    sanitize_recursive(document, &mut stats);
    stats
}

fn sanitize_recursive(value: &mut Value, stats: &mut FixStats) {
    match value {
        Value::String(s) => {
            let repaired = sanitize_text(s, stats);
            if repaired != *s {
                *s = repaired;
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                sanitize_recursive(item, stats);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                sanitize_recursive(item, stats);
            }
        }
        _ => {}
    }
}

/// One control character found in a document string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlCharHit {
    /// JSONPath-style location of the containing string, e.g.
    /// `$[0].chapters[2][15]`.
    pub path: String,
    /// Character position within the string.
    pub index: usize,
    /// The offending codepoint.
    pub codepoint: u32,
}

impl fmt::Display for ControlCharHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]=U+{:04X}", self.path, self.index, self.codepoint)
    }
}

/// Scan a document for control characters.
///
/// A control character is any codepoint below U+0020 or in U+007F..=U+009F.
/// Hits are returned in document order with their JSONPath-style location.
pub fn find_control_chars(document: &Value) -> Vec<ControlCharHit> {
    let mut hits = Vec::new();
    scan_value(document, "$", &mut hits);
    hits
}

fn is_control(c: char) -> bool {
    let cp = c as u32;
    cp < 0x20 || (0x7F..=0x9F).contains(&cp)
}

fn scan_value(value: &Value, path: &str, hits: &mut Vec<ControlCharHit>) {
    match value {
        Value::String(s) => {
            for (index, c) in s.chars().enumerate() {
                if is_control(c) {
                    hits.push(ControlCharHit {
                        path: path.to_string(),
                        index,
                        codepoint: c as u32,
                    });
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                scan_value(item, &format!("{path}[{i}]"), hits);
            }
        }
        Value::Object(map) => {
            for (key, item) in map.iter() {
                scan_value(item, &format!("{path}.{key}"), hits);
            }
        }
        _ => {}
    }
}

// ============================================================================
// Tests
// ============================================================================
