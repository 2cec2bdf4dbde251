//! Reading-order reconstruction for vertical Japanese text.
//!
//! The pieces run in this order for every zone of every page:
//!
//! 1. [`filter::select_and_order`] keeps the blocks inside the zone, right to left;
//! 2. [`leading::DocumentLeading`] fixes the document line spacing once;
//! 3. [`breaks::emit`] writes the text with inferred line and paragraph breaks.
//!
//! [`tracker::ZoneTracker`] decides which zones apply to each page.

pub mod breaks;
pub mod filter;
pub mod leading;
pub mod tracker;

pub use breaks::{emit, BreakRules, FULL_STOP};
pub use filter::select_and_order;
pub use leading::DocumentLeading;
pub use tracker::ZoneTracker;
