//! PDF access: page text blocks and annotation rectangles.

mod annots;
mod backend;
mod content;

pub use backend::{decode_text_simple, LopdfSource, PageSource};
