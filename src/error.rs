//! Error types for tategaki.

use std::io;
use thiserror::Error;

/// Result type alias for tategaki operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting zone text from a PDF.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the PDF or writing the output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error interpreting a page content stream.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error reading the annotations of a page.
    #[error("Annotation error: {0}")]
    Annotation(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
