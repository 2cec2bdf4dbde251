//! Page and document extraction.
//!
//! [`Extractor`] owns the per-document state (active zones and the document
//! leading) and threads it through the pages in order. Pages must be fed
//! sequentially: the zones and the leading found on one page apply to every
//! later page.

mod options;

pub use options::ExtractOptions;

use std::fmt;

use crate::error::Result;
use crate::layout::{self, BreakRules, DocumentLeading, ZoneTracker};
use crate::parser::PageSource;
use crate::render::{Segment, SegmentSink};

/// State carried from page to page within one document.
#[derive(Debug, Clone, Default)]
pub struct ExtractionContext {
    /// Zones currently in effect.
    pub zones: ZoneTracker,
    /// Document leading, frozen once known.
    pub leading: DocumentLeading,
}

impl ExtractionContext {
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            zones: ZoneTracker::new(options.min_zone_update),
            leading: DocumentLeading::new(),
        }
    }
}

/// Counters collected while extracting a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionStats {
    /// Pages visited
    pub pages: usize,
    /// Zones that produced output
    pub zones_written: usize,
    /// Zones skipped because no block was inside them
    pub zones_empty: usize,
    /// Blocks written
    pub blocks_written: usize,
    /// Document leading at the end of the run (0 if never established)
    pub leading: f32,
}

impl fmt::Display for ExtractionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages, {} zones ({} empty), {} blocks, leading {:.2}",
            self.pages, self.zones_written, self.zones_empty, self.blocks_written, self.leading
        )
    }
}

/// Drives pages of a [`PageSource`] into a [`SegmentSink`].
///
/// # Example
///
/// ```no_run
/// use tategaki::extract::{ExtractOptions, Extractor};
/// use tategaki::parser::LopdfSource;
///
/// let source = LopdfSource::open("novel.pdf")?;
/// let mut segments: Vec<tategaki::Segment> = Vec::new();
/// let stats = Extractor::new(ExtractOptions::default()).extract_document(&source, &mut segments)?;
/// println!("{}", stats);
/// # Ok::<(), tategaki::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    options: ExtractOptions,
    context: ExtractionContext,
    stats: ExtractionStats,
}

impl Extractor {
    /// Create an extractor with a fresh document context.
    pub fn new(options: ExtractOptions) -> Self {
        let context = ExtractionContext::new(&options);
        Self {
            options,
            context,
            stats: ExtractionStats::default(),
        }
    }

    pub fn context(&self) -> &ExtractionContext {
        &self.context
    }

    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// Extract one page (0-based `index`) into `sink`.
    pub fn extract_page<P, S>(&mut self, source: &P, index: usize, sink: &mut S) -> Result<()>
    where
        P: PageSource + ?Sized,
        S: SegmentSink + ?Sized,
    {
        let page_number = index as u32 + 1;
        if self.options.page_markers {
            sink.write_segment(Segment::PageMarker(page_number))?;
        }

        let candidates = source.annotation_rects(index)?;
        let blocks = source.raw_blocks(index)?;
        let zones = self.context.zones.observe(candidates);
        log::debug!(
            "Page {}: {} blocks, {} active zones",
            page_number,
            blocks.len(),
            zones.len()
        );

        for zone in zones {
            let ordered = layout::select_and_order(&blocks, zone);
            if ordered.is_empty() {
                log::debug!("Page {}: zone {:?} holds no blocks", page_number, zone.bbox);
                self.stats.zones_empty += 1;
                continue;
            }

            let leading = self
                .context
                .leading
                .resolve(&ordered, self.options.leading_tolerance);
            let rules = BreakRules::new(leading, &self.options.sentence_terminators);
            self.stats.blocks_written += layout::emit(&ordered, zone, &rules, sink)?;
            self.stats.zones_written += 1;
        }

        self.stats.pages += 1;
        self.stats.leading = self.context.leading.value();
        Ok(())
    }

    /// Extract every page of `source` in order.
    pub fn extract_document<P, S>(&mut self, source: &P, sink: &mut S) -> Result<ExtractionStats>
    where
        P: PageSource + ?Sized,
        S: SegmentSink + ?Sized,
    {
        let page_count = source.page_count();
        log::debug!("Extracting {} pages", page_count);

        for index in 0..page_count {
            self.extract_page(source, index, sink)?;
        }

        log::info!("Extraction finished: {}", self.stats);
        Ok(self.stats.clone())
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}
