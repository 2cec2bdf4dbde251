//! Line and paragraph break inference.
//!
//! Breaks are inferred purely from geometry and punctuation:
//!
//! - a gap between consecutive columns wider than the document leading starts
//!   a new paragraph;
//! - a block whose text ends with a sentence terminator is followed by a
//!   line break;
//! - a portrait zone (a title or caption) is followed by a paragraph break.

use crate::error::Result;
use crate::model::{TextBlock, Zone};
use crate::render::{Segment, SegmentSink};

/// The Japanese full stop.
pub const FULL_STOP: char = '。';

/// Parameters of the break decision for one zone.
#[derive(Debug, Clone, Copy)]
pub struct BreakRules<'a> {
    /// Spacing above which a paragraph break is emitted.
    pub leading: f32,
    /// Characters that end a sentence.
    pub terminators: &'a [char],
}

impl<'a> BreakRules<'a> {
    pub fn new(leading: f32, terminators: &'a [char]) -> Self {
        Self {
            leading,
            terminators,
        }
    }

    /// Whether moving from a column at `previous_x` to one at `current_x`
    /// crosses a paragraph boundary. Equal spacing does not.
    pub fn paragraph_break_between(&self, previous_x: f32, current_x: f32) -> bool {
        previous_x - current_x > self.leading
    }

    /// Whether `text` ends with a sentence terminator. Empty text never does.
    pub fn ends_sentence(&self, text: &str) -> bool {
        text.chars()
            .last()
            .is_some_and(|c| self.terminators.contains(&c))
    }
}

/// Write the blocks of one zone, with inferred breaks, into `sink`.
///
/// `blocks` must already be in reading order. Spacing is only measured
/// between consecutive blocks, so nothing is ever emitted before the first
/// block, whatever the leading. Returns the number of blocks written; an empty slice
/// writes nothing at all.
pub fn emit<S: SegmentSink + ?Sized>(
    blocks: &[&TextBlock],
    zone: &Zone,
    rules: &BreakRules<'_>,
    sink: &mut S,
) -> Result<usize> {
    let Some(first) = blocks.first() else {
        return Ok(0);
    };

    let mut previous_x = first.x();
    for (i, block) in blocks.iter().enumerate() {
        let current_x = block.x();
        if i > 0 && rules.paragraph_break_between(previous_x, current_x) {
            log::trace!(
                "Paragraph break: spacing {:.2} > leading {:.2}",
                previous_x - current_x,
                rules.leading
            );
            sink.write_segment(Segment::ParagraphBreak)?;
        }
        previous_x = current_x;

        let text = block.cleaned_text();
        let sentence_end = rules.ends_sentence(&text);
        sink.write_segment(Segment::Text(text))?;
        if sentence_end {
            sink.write_segment(Segment::LineBreak)?;
        }
    }

    if zone.is_vertical() {
        sink.write_segment(Segment::ParagraphBreak)?;
    }

    Ok(blocks.len())
}
