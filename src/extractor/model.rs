use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_BODY_CHARS: usize = 1000;
pub const MAX_IMAGES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtractedArticle {
    pub title: String,
    pub body: String,
    /// Absolute image URLs in document order.
    pub images: Vec<String>,
}

impl ExtractedArticle {
    /// Applies the hard size limits. Truncation is by character, not byte,
    /// and adds no ellipsis.
    pub fn new(title: &str, body: &str, mut images: Vec<String>) -> Self {
        images.truncate(MAX_IMAGES);
        Self {
            title: truncate_chars(title, MAX_TITLE_CHARS),
            body: truncate_chars(body, MAX_BODY_CHARS),
            images,
        }
    }
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Single-line text: every whitespace run becomes one space.
pub fn collapse_inline(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
