//! Output stream rendering.

pub mod segment;

pub use segment::{segments_to_string, Segment, SegmentSink, TextSink};
