//! Positioned text blocks.

use super::Rect;

/// A contiguous run of text together with its bounding rectangle.
///
/// Blocks are produced once per page by a [`PageSource`](crate::parser::PageSource)
/// and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Bounding box in page space
    pub bbox: Rect,
    /// Raw text, possibly with line breaks inserted by the extractor
    pub text: String,
}

impl TextBlock {
    /// Create a block from its edges and text.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32, text: impl Into<String>) -> Self {
        Self {
            bbox: Rect::new(left, top, right, bottom),
            text: text.into(),
        }
    }

    /// Horizontal position used for reading order and spacing: the left edge.
    pub fn x(&self) -> f32 {
        self.bbox.left
    }

    /// The text with every embedded line break removed.
    pub fn cleaned_text(&self) -> String {
        self.text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
    }
}
