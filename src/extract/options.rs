//! Extraction options and configuration.

use crate::layout::leading::DEFAULT_TOLERANCE;
use crate::layout::tracker::DEFAULT_MIN_UPDATE;
use crate::layout::FULL_STOP;

/// Options for zone text extraction.
///
/// The defaults reproduce the plain-text output format exactly; every knob
/// exists for callers who need to adapt the heuristics to a particular
/// typesetting.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Write a `***Page N:` marker before each page
    pub page_markers: bool,

    /// Inflation applied to the measured line gap (0.05 = 5%)
    pub leading_tolerance: f32,

    /// Characters that end a sentence and trigger a line break
    pub sentence_terminators: Vec<char>,

    /// Minimum number of annotations on a page to replace the active zones
    pub min_zone_update: usize,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable page markers.
    pub fn with_page_markers(mut self, enabled: bool) -> Self {
        self.page_markers = enabled;
        self
    }

    /// Omit page markers.
    pub fn without_page_markers(self) -> Self {
        self.with_page_markers(false)
    }

    /// Set the leading tolerance. Negative values are clamped to zero.
    pub fn with_leading_tolerance(mut self, tolerance: f32) -> Self {
        self.leading_tolerance = tolerance.max(0.0);
        self
    }

    /// Replace the sentence terminators.
    pub fn with_sentence_terminators(mut self, terminators: impl IntoIterator<Item = char>) -> Self {
        self.sentence_terminators = terminators.into_iter().collect();
        self
    }

    /// Set the minimum zone count that replaces the active zones.
    pub fn with_min_zone_update(mut self, min: usize) -> Self {
        self.min_zone_update = min;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            page_markers: true,
            leading_tolerance: DEFAULT_TOLERANCE,
            sentence_terminators: vec![FULL_STOP],
            min_zone_update: DEFAULT_MIN_UPDATE,
        }
    }
}
