//! Geometry and content types shared by the parser and the layout core.
//!
//! All coordinates are in page space: origin at the top-left corner of the
//! page's media box, x to the right, y downward, in PDF points.

mod block;
mod rect;
mod zone;

pub use block::TextBlock;
pub use rect::Rect;
pub use zone::{Zone, ZoneSet};
