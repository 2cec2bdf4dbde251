//! Output stream elements and the sinks that consume them.
//!
//! The layout core never formats text itself: it pushes [`Segment`]s into a
//! [`SegmentSink`]. [`TextSink`] renders them to the plain-text output format,
//! while a `Vec<Segment>` simply records them, which is what the tests use.
//!
//! # Example
//!
//! ```
//! use tategaki::render::{Segment, SegmentSink, TextSink};
//!
//! let mut sink = TextSink::new(Vec::new());
//! sink.write_segment(Segment::PageMarker(1)).unwrap();
//! sink.write_segment(Segment::Text("吾輩は猫である。".into())).unwrap();
//! sink.write_segment(Segment::LineBreak).unwrap();
//! let bytes = sink.finish().unwrap();
//! assert_eq!(String::from_utf8(bytes).unwrap(), "\n***Page 1:\n吾輩は猫である。\n");
//! ```

use std::fmt;
use std::io::Write;

use crate::error::Result;

/// One element of the append-only output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Start of a page (1-indexed page number).
    PageMarker(u32),

    /// Cleaned text of one block.
    Text(String),

    /// End of a sentence.
    LineBreak,

    /// Blank line separating paragraphs, also written after vertical zones.
    ParagraphBreak,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::PageMarker(number) => write!(f, "\n***Page {}:\n", number),
            Segment::Text(text) => f.write_str(text),
            Segment::LineBreak => f.write_str("\n"),
            Segment::ParagraphBreak => f.write_str("\n\n"),
        }
    }
}

/// Destination of the output stream.
pub trait SegmentSink {
    /// Append one segment.
    fn write_segment(&mut self, segment: Segment) -> Result<()>;
}

impl SegmentSink for Vec<Segment> {
    fn write_segment(&mut self, segment: Segment) -> Result<()> {
        self.push(segment);
        Ok(())
    }
}

impl<S: SegmentSink + ?Sized> SegmentSink for &mut S {
    fn write_segment(&mut self, segment: Segment) -> Result<()> {
        (**self).write_segment(segment)
    }
}

/// Renders segments as UTF-8 text into any writer.
#[derive(Debug)]
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> SegmentSink for TextSink<W> {
    fn write_segment(&mut self, segment: Segment) -> Result<()> {
        write!(self.writer, "{}", segment)?;
        Ok(())
    }
}

/// Render a recorded segment stream to a string.
pub fn segments_to_string(segments: &[Segment]) -> String {
    segments.iter().map(ToString::to_string).collect()
}
