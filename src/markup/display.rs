use super::block::{RecommendationBlock, FIELD_NAMES};
use super::extract::extract;
use super::scanner::{
    contains_marker, has_unterminated_block, partial_open_prefix, CLOSE_MARKER, OPEN_MARKER,
};

/// What the UI should show for the current buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    /// No recognized markup anywhere; show the buffer verbatim.
    Prose(String),
    /// A block is still streaming in. `visible` is the prose that is safe to
    /// show; the caller renders a generating-recommendations placeholder
    /// after it. `blocks` are the spans already completed earlier in the same
    /// buffer, so finished cards never disappear while the next one types.
    Working {
        visible: String,
        blocks: Vec<RecommendationBlock>,
    },
    /// Every block in the buffer is terminated, or streaming is over.
    Rendered {
        prose: String,
        blocks: Vec<RecommendationBlock>,
    },
}

/// Pure reducer from (buffer, is_streaming) to a display state. Evaluated on
/// every delta; extraction of a given span is deterministic, so a block shown
/// once stays byte-identical on later evaluations.
pub fn render(buffer: &str, is_streaming: bool) -> DisplayState {
    let has_partial_prefix = partial_open_prefix(buffer).is_some();
    if !contains_marker(buffer) && !has_partial_prefix {
        return DisplayState::Prose(buffer.to_string());
    }

    if is_streaming && (has_unterminated_block(buffer) || has_partial_prefix) {
        let extraction = extract(buffer);
        let mut visible = extraction.remainder;
        if let Some(open_at) = visible.find(OPEN_MARKER) {
            visible.truncate(open_at);
        } else if let Some(prefix_at) = partial_open_prefix(&visible) {
            visible.truncate(prefix_at);
        }
        let visible = visible.trim_end().to_string();
        return DisplayState::Working {
            visible,
            blocks: extraction.blocks,
        };
    }

    let extraction = extract(buffer);
    DisplayState::Rendered {
        prose: strip_markup(&extraction.remainder),
        blocks: extraction.blocks,
    }
}

/// Last-resort cleanup for malformed or truncated markup: removes block
/// markers, known field tags, and a trailing half-typed marker. Fails open
/// toward showing the surrounding text.
fn strip_markup(text: &str) -> String {
    let mut cleaned = text.replace(OPEN_MARKER, "").replace(CLOSE_MARKER, "");
    for field in FIELD_NAMES {
        cleaned = remove_tag_ci(&cleaned, &format!("<{field}>"));
        cleaned = remove_tag_ci(&cleaned, &format!("</{field}>"));
    }
    if let Some(prefix_at) = partial_open_prefix(&cleaned) {
        cleaned.truncate(prefix_at);
    }
    cleaned.trim().to_string()
}

// `tag` must be lowercase; occurrences are matched ignoring ASCII case.
fn remove_tag_ci(text: &str, tag: &str) -> String {
    let lowered = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some(found) = lowered[cursor..].find(tag) {
        let at = cursor + found;
        out.push_str(&text[cursor..at]);
        cursor = at + tag.len();
    }
    out.push_str(&text[cursor..]);
    out
}
