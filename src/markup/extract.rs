use super::block::{RecommendationBlock, FIELD_NAMES};
use super::scanner::{CLOSE_MARKER, OPEN_MARKER};

/// Result of one extraction pass: the typed blocks plus the prose left over
/// once their spans are removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub blocks: Vec<RecommendationBlock>,
    pub remainder: String,
}

/// Pulls every complete recommendation span out of `text`, left to right,
/// first-match-wins. An open marker without a matching close is still
/// streaming; its span is left in the remainder untouched for the display
/// reducer to handle. Blocks without a non-empty `name` are dropped.
///
/// Extraction is idempotent: running it again on the remainder yields no
/// blocks and the same prose.
pub fn extract(text: &str) -> Extraction {
    let mut blocks = Vec::new();
    let mut remainder = String::new();
    let mut rest = text;

    loop {
        let Some(open_at) = rest.find(OPEN_MARKER) else {
            push_prose_piece(&mut remainder, rest);
            break;
        };
        let inner_start = open_at + OPEN_MARKER.len();
        let Some(close_at) = rest[inner_start..].find(CLOSE_MARKER) else {
            push_prose_piece(&mut remainder, rest);
            break;
        };

        push_prose_piece(&mut remainder, &rest[..open_at]);
        if let Some(block) = parse_block(&rest[inner_start..inner_start + close_at]) {
            blocks.push(block);
        }
        rest = &rest[inner_start + close_at + CLOSE_MARKER.len()..];
    }

    Extraction {
        blocks,
        remainder: remainder.trim().to_string(),
    }
}

// Removing a span leaves two whitespace edges behind; collapse the seam so
// prose reads "before after" rather than "before  after".
fn push_prose_piece(remainder: &mut String, piece: &str) {
    if piece.is_empty() {
        return;
    }
    if remainder.ends_with(char::is_whitespace) {
        remainder.push_str(piece.trim_start());
    } else {
        remainder.push_str(piece);
    }
}

fn parse_block(span: &str) -> Option<RecommendationBlock> {
    // Tags are ASCII and matched case-insensitively; lowercasing preserves
    // byte offsets so values can be sliced from the original span.
    let lowered = span.to_ascii_lowercase();
    let mut block = RecommendationBlock::default();

    for field in FIELD_NAMES {
        let open_tag = format!("<{field}>");
        let close_tag = format!("</{field}>");
        let Some(tag_at) = lowered.find(&open_tag) else {
            continue;
        };
        let value_start = tag_at + open_tag.len();
        let Some(value_len) = lowered[value_start..].find(&close_tag) else {
            continue;
        };
        let value = span[value_start..value_start + value_len].trim();
        if !value.is_empty() {
            block.set_field(field, value.to_string());
        }
    }

    if block.name.is_empty() {
        None
    } else {
        Some(block)
    }
}
