//! PDF backend abstraction layer.
//!
//! The layout core only needs three things from a PDF: how many pages it has,
//! the positioned text blocks of a page, and the annotation rectangles of a
//! page. [`PageSource`] captures exactly that, so the concrete PDF library
//! (lopdf) stays isolated in [`LopdfSource`].

use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::pdf_header;
use crate::error::{Error, Result};
use crate::model::{Rect, TextBlock, Zone};

use super::annots;
use super::content::{group_runs, ContentInterpreter};

/// Abstract interface for page-level PDF access.
///
/// Page indices are 0-based. Block order is unspecified; the layout core
/// re-orders blocks itself.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Text blocks of the page with their bounding boxes.
    fn raw_blocks(&self, index: usize) -> Result<Vec<TextBlock>>;

    /// Rectangles of the markup annotations on the page; empty if none.
    fn annotation_rects(&self, index: usize) -> Result<Vec<Zone>>;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // Try UTF-16BE first (BOM marker)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Maps PDF user space onto page space (top-left origin, y downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PageSpace {
    origin_x: f32,
    top_y: f32,
}

impl PageSpace {
    /// Build from a media box given as `[llx, lly, urx, ury]` in any corner order.
    pub fn from_media_box(media_box: [f32; 4]) -> Self {
        let [x0, y0, x1, y1] = media_box;
        Self {
            origin_x: x0.min(x1),
            top_y: y0.max(y1),
        }
    }

    pub fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.origin_x, self.top_y - y)
    }

    /// Page-space rectangle spanned by two user-space corners.
    pub fn rect(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Rect {
        let (ax, ay) = self.point(x0, y0);
        let (bx, by) = self.point(x1, y1);
        Rect::from_corners(ax, ay, bx, by)
    }
}

/// US Letter, used when a page has no usable media box.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];
/// Bound on /Parent hops when looking up inherited attributes.
pub(crate) const MAX_INHERITANCE_DEPTH: usize = 32;

/// Concrete [`PageSource`] backed by `lopdf::Document`.
///
/// The document is released when the source is dropped.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening {}", path.display());
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load from an in-memory byte slice.
    ///
    /// Bytes before the `%PDF-` header are skipped; offsets in the file are
    /// taken relative to the header.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let (offset, version) = pdf_header(data)?;
        if offset > 0 {
            log::warn!("Skipping {} bytes before the PDF header", offset);
        }
        log::debug!("PDF {}", version);

        let doc = LopdfDocument::load_mem(&data[offset..])?;
        Ok(Self::from_document(doc))
    }

    /// Load from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text extraction may fail");
        }
        let pages = doc.get_pages().into_values().collect();
        Self { doc, pages }
    }

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.pages
            .get(index)
            .copied()
            .ok_or(Error::PageOutOfRange(index as u32 + 1, self.pages.len() as u32))
    }

    /// Page space of a page, from its own or an inherited /MediaBox.
    pub(crate) fn page_space(&self, page_id: ObjectId) -> PageSpace {
        let mut current = Some(page_id);
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Some(id) = current else { break };
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };
            if let Some(media_box) = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|obj| resolve(&self.doc, obj).ok())
                .and_then(number_quad)
            {
                return PageSpace::from_media_box(media_box);
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }
        PageSpace::from_media_box(DEFAULT_MEDIA_BOX)
    }

    /// Get page content stream.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content has no text.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Stream(s) => Ok(stream_data(s)),
                Object::Array(arr) => self.concat_streams(arr),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => self.concat_streams(arr),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, parts: &[Object]) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        for obj in parts {
            if let Object::Stream(s) = resolve(&self.doc, obj)? {
                content.extend_from_slice(&stream_data(s));
                content.push(b' ');
            }
        }
        Ok(content)
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn raw_blocks(&self, index: usize) -> Result<Vec<TextBlock>> {
        let page_id = self.page_id(index)?;
        let content = self.page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }

        let interpreter = ContentInterpreter::new(&self.doc, page_id, self.page_space(page_id))?;
        let runs = interpreter.runs(&content).map_err(|e| match e {
            Error::TextExtract(msg) => Error::TextExtract(format!("Page {}: {}", index + 1, msg)),
            other => other,
        })?;
        Ok(group_runs(runs))
    }

    fn annotation_rects(&self, index: usize) -> Result<Vec<Zone>> {
        let page_id = self.page_id(index)?;
        annots::annotation_rects(&self.doc, page_id, self.page_space(page_id))
    }
}

/// Stream bytes with filters applied; unfiltered streams are returned as is.
pub(crate) fn stream_data(stream: &lopdf::Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

/// Follow a reference to the object it points at.
pub(crate) fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// Read a PDF rectangle array (`[a b c d]`) as four numbers.
pub(crate) fn number_quad(obj: &Object) -> Option<[f32; 4]> {
    let array = obj.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut out = [0.0; 4];
    for (slot, value) in out.iter_mut().zip(array) {
        *slot = value.as_float().ok()?;
    }
    Some(out)
}
