use aho_corasick::AhoCorasick;
use std::sync::OnceLock;

pub const OPEN_MARKER: &str = "<college_recommendation>";
pub const CLOSE_MARKER: &str = "</college_recommendation>";

fn marker_automaton() -> &'static AhoCorasick {
    static AUTOMATON: OnceLock<AhoCorasick> = OnceLock::new();
    AUTOMATON.get_or_init(|| {
        AhoCorasick::new([OPEN_MARKER, CLOSE_MARKER]).expect("marker patterns are valid")
    })
}

/// Counts of (open, close) markers in one linear pass.
pub fn marker_counts(text: &str) -> (usize, usize) {
    let mut opens = 0;
    let mut closes = 0;
    for mat in marker_automaton().find_iter(text) {
        match mat.pattern().as_usize() {
            0 => opens += 1,
            _ => closes += 1,
        }
    }
    (opens, closes)
}

/// True when an opening marker has arrived without its matching close.
/// More closes than opens is malformed input and clamps to false, so the
/// caller falls back to showing content instead of waiting forever.
pub fn has_unterminated_block(text: &str) -> bool {
    let (opens, closes) = marker_counts(text);
    opens > closes
}

pub fn contains_marker(text: &str) -> bool {
    marker_automaton().is_match(text)
}

/// Byte offset where a trailing, still-incomplete opening marker begins.
/// Any suffix of `text` that is a strict prefix of the opening marker counts,
/// so a half-typed tag can be cut off before display.
pub fn partial_open_prefix(text: &str) -> Option<usize> {
    for len in (1..OPEN_MARKER.len()).rev() {
        if text.ends_with(&OPEN_MARKER[..len]) {
            return Some(text.len() - len);
        }
    }
    None
}
