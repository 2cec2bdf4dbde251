//! Line spacing ("leading") estimation.
//!
//! The estimate is the gap between the last two columns of the first zone
//! that has at least three blocks, kept for the rest of the document.
//! Documents that change line spacing midway get a wrong estimate for the
//! later zones.

use crate::model::TextBlock;

/// Inflation applied to the measured gap to absorb jitter in block positions.
pub const DEFAULT_TOLERANCE: f32 = 0.05;

/// Fewer blocks than this and the zone is likely a heading or a fragment.
const MIN_BLOCKS: usize = 3;

/// Estimate the leading of a zone from its ordered blocks.
///
/// Returns `0.0` (unknown) for fewer than three blocks. Otherwise returns the
/// horizontal gap between the second-to-last and the last block, inflated by
/// `tolerance`.
pub fn estimate(ordered: &[&TextBlock], tolerance: f32) -> f32 {
    if ordered.len() < MIN_BLOCKS {
        return 0.0;
    }

    let last = ordered[ordered.len() - 1];
    let penultimate = ordered[ordered.len() - 2];
    let spacing = penultimate.x() - last.x();
    spacing + spacing * tolerance
}

/// Document-wide leading, established once and then frozen.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentLeading {
    value: f32,
}

impl DocumentLeading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value; `0.0` while unknown.
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_known(&self) -> bool {
        self.value != 0.0
    }

    /// Estimate from `ordered` if no leading is known yet and return the
    /// value to use for this zone.
    pub fn resolve(&mut self, ordered: &[&TextBlock], tolerance: f32) -> f32 {
        if !self.is_known() {
            self.value = estimate(ordered, tolerance);
            if self.is_known() {
                log::debug!("Document leading established at {:.2}", self.value);
            }
        }
        self.value
    }
}
