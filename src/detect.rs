//! PDF header sniffing.
//!
//! Rejects inputs that are obviously not PDF before lopdf gets to see them,
//! so that a wrong path produces a clear `UnknownFormat` instead of a parser
//! error deep inside the xref table.
//!
//! Up to [`HEADER_SEARCH_LEN`] bytes of junk may precede the header.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// Length of a version string such as "1.7".
const VERSION_LEN: usize = 3;
/// Junk bytes tolerated before the `%PDF-` marker.
pub const HEADER_SEARCH_LEN: usize = 1024;
/// Bytes read from the start of a file when sniffing.
const HEADER_LEN: usize = HEADER_SEARCH_LEN + PDF_MAGIC.len() + VERSION_LEN;

/// Read the header of the file at `path` and return its PDF version.
///
/// ```no_run
/// let version = tategaki::detect::pdf_version_from_path("scan.pdf").unwrap();
/// assert!(version.starts_with('1') || version.starts_with('2'));
/// ```
pub fn pdf_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    pdf_version_from_bytes(&header)
}

/// Return the PDF version announced by the header of `data`.
pub fn pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    pdf_header(data).map(|(_, version)| version)
}

/// Locate the PDF header in `data`.
///
/// Returns the offset of the `%PDF-` marker together with the version it
/// announces. The marker must start within the first [`HEADER_SEARCH_LEN`]
/// bytes.
pub fn pdf_header(data: &[u8]) -> Result<(usize, String)> {
    let window = &data[..data.len().min(HEADER_SEARCH_LEN + PDF_MAGIC.len())];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let start = offset + PDF_MAGIC.len();
    let Some(raw) = data.get(start..start + VERSION_LEN) else {
        return Err(Error::UnknownFormat);
    };
    let version = String::from_utf8_lossy(raw).to_string();
    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok((offset, version))
}

/// Check if bytes start with a usable PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    pdf_version_from_bytes(data).is_ok()
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == VERSION_LEN
        && matches!(bytes[0], b'1' | b'2')
        && bytes[1] == b'.'
        && bytes[2].is_ascii_digit()
}
