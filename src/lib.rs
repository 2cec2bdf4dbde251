//! # tategaki
//!
//! Plain-text extraction from Japanese vertical-writing PDFs.
//!
//! Vertically typeset pages are read right to left, one column at a time.
//! The reading regions of a page ("zones") are given by the rectangles of
//! its markup annotations; text blocks inside each zone are ordered right to
//! left, and line and paragraph breaks are reconstructed from sentence
//! endings and the gap between columns.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> tategaki::Result<()> {
//!     let stats = tategaki::extract_file("novel.pdf", "novel.txt")?;
//!     println!("{}", stats);
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`parser`]: PDF access behind the [`PageSource`] trait
//! - [`layout`]: zone filtering, leading estimation, break classification
//! - [`extract`]: the page and document drivers
//! - [`render`]: output segments and sinks

pub mod detect;
pub mod error;
pub mod extract;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

pub use detect::{is_pdf_bytes, pdf_version_from_bytes, pdf_version_from_path};
pub use error::{Error, Result};
pub use extract::{ExtractOptions, ExtractionStats, Extractor};
pub use model::{Rect, TextBlock, Zone, ZoneSet};
pub use parser::{LopdfSource, PageSource};
pub use render::{Segment, SegmentSink, TextSink};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Extract the zone text of `input` into the file at `output`.
///
/// The output file is created (or truncated) only after the PDF opened
/// successfully. Page markers are written for every page.
///
/// # Example
///
/// ```no_run
/// use tategaki::extract_file;
///
/// let stats = extract_file("novel.pdf", "novel.txt").unwrap();
/// println!("Pages: {}", stats.pages);
/// ```
pub fn extract_file<P, Q>(input: P, output: Q) -> Result<ExtractionStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    extract_file_with_options(input, output, ExtractOptions::default())
}

/// Extract the zone text of `input` into `output` with custom options.
///
/// # Example
///
/// ```no_run
/// use tategaki::{extract_file_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new()
///     .without_page_markers()
///     .with_sentence_terminators(['。', '！', '？']);
/// extract_file_with_options("novel.pdf", "novel.txt", options).unwrap();
/// ```
pub fn extract_file_with_options<P, Q>(
    input: P,
    output: Q,
    options: ExtractOptions,
) -> Result<ExtractionStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source = LopdfSource::open(input)?;
    let file = File::create(output.as_ref())?;
    let mut sink = TextSink::new(BufWriter::new(file));

    let stats = Extractor::new(options).extract_document(&source, &mut sink)?;
    sink.finish()?;

    log::debug!("Wrote {}", output.as_ref().display());
    Ok(stats)
}

/// Extract the zone text of a PDF file into a string.
///
/// # Example
///
/// ```no_run
/// let text = tategaki::extract_text("novel.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let source = LopdfSource::open(path)?;
    extract_source(&source, ExtractOptions::default())
}

/// Extract the zone text of an in-memory PDF into a string.
pub fn extract_bytes(data: &[u8]) -> Result<String> {
    let source = LopdfSource::from_bytes(data)?;
    extract_source(&source, ExtractOptions::default())
}

/// Extract any [`PageSource`] into a string.
pub fn extract_source<P: PageSource + ?Sized>(source: &P, options: ExtractOptions) -> Result<String> {
    let mut segments: Vec<Segment> = Vec::new();
    Extractor::new(options).extract_document(source, &mut segments)?;
    Ok(render::segments_to_string(&segments))
}
