mod block;
mod display;
mod extract;
mod scanner;

pub use block::{RecommendationBlock, FIELD_NAMES};
pub use display::{render, DisplayState};
pub use extract::{extract, Extraction};
pub use scanner::{
    contains_marker, has_unterminated_block, marker_counts, partial_open_prefix, CLOSE_MARKER,
    OPEN_MARKER,
};
