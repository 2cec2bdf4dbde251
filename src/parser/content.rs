//! Content stream interpretation.
//!
//! Walks the text operators of a page and produces positioned text runs,
//! then merges runs that continue the same column (vertical writing) or the
//! same baseline (horizontal writing) into [`TextBlock`]s.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{Rect, TextBlock};

use super::backend::{resolve, stream_data, PageSpace, MAX_INHERITANCE_DEPTH};

/// Share of an em below the baseline covered by a horizontal glyph.
const DESCENT: f32 = 0.2;
/// Share of an em above the baseline covered by a horizontal glyph.
const ASCENT: f32 = 0.8;

/// A run of text shown by one text-showing operator, in page space.
#[derive(Debug, Clone)]
pub(crate) struct TextRun {
    pub bbox: Rect,
    pub text: String,
    pub font_size: f32,
    pub vertical: bool,
}

/// Text state of the interpreter.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    // Start of the current line, as set by Td/TD/Tm/T*.
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    /// Move to the start of the next line offset by (tx, ty) from the current one.
    fn next_line_offset(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.next_line_offset(0.0, -self.leading);
    }

    /// Advance the text position (not the line start) in text space.
    fn advance(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Current transformation matrix `[a b c d e f]`, mapping form or text
/// space into default user space.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let mut m = [0.0; 6];
        for (slot, value) in m.iter_mut().zip(operands) {
            *slot = get_number(value)?;
        }
        Some(Matrix(m))
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        let [a, b, c, d, e, f] = self.0;
        let [oa, ob, oc, od, oe, of] = other.0;
        Matrix([
            a * oa + b * oc,
            a * ob + b * od,
            c * oa + d * oc,
            c * ob + d * od,
            e * oa + f * oc + oe,
            e * ob + f * od + of,
        ])
    }

    fn apply(&self, (x, y): (f32, f32)) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    /// Uniform scale factor of the matrix.
    fn scale(&self) -> f32 {
        let [a, b, c, d, _, _] = self.0;
        (a * d - b * c).abs().sqrt()
    }
}

type FontMap<'a> = BTreeMap<Vec<u8>, &'a Dictionary>;

/// Nesting limit for form XObjects, which may reference each other.
const MAX_FORM_DEPTH: usize = 8;

/// Resources in effect for one content stream.
struct Resources<'a> {
    fonts: FontMap<'a>,
    xobjects: Option<&'a Dictionary>,
}

/// Interprets the content stream of one page.
pub(crate) struct ContentInterpreter<'a> {
    doc: &'a LopdfDocument,
    resources: Resources<'a>,
    space: PageSpace,
}

impl<'a> ContentInterpreter<'a> {
    pub fn new(doc: &'a LopdfDocument, page_id: ObjectId, space: PageSpace) -> Result<Self> {
        let fonts = doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let xobjects = page_resources(doc, page_id).and_then(|r| sub_dict(doc, r, b"XObject"));
        Ok(Self {
            doc,
            resources: Resources { fonts, xobjects },
            space,
        })
    }

    /// Decode `content` and return its text runs in content order.
    pub fn runs(&self, content: &[u8]) -> Result<Vec<TextRun>> {
        let mut runs = Vec::new();
        self.interpret(content, &self.resources, Matrix::IDENTITY, 0, &mut runs)?;
        Ok(runs)
    }

    fn interpret(
        &self,
        content: &[u8],
        resources: &Resources<'a>,
        base: Matrix,
        depth: usize,
        runs: &mut Vec<TextRun>,
    ) -> Result<()> {
        let content = lopdf::content::Content::decode(content)
            .map_err(|e| Error::TextExtract(e.to_string()))?;

        let mut font_name: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut vertical = false;
        let mut matrix = TextMatrix::default();
        let mut in_text_object = false;
        let mut ctm = base;
        let mut saved: Vec<Matrix> = Vec::new();

        for op in content.operations {
            match op.operator.as_str() {
                "q" => saved.push(ctm),
                "Q" => {
                    if let Some(previous) = saved.pop() {
                        ctm = previous;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(&op.operands) {
                        ctm = m.then(&ctm);
                    }
                }
                "Do" => {
                    if let Some(Object::Name(name)) = op.operands.first() {
                        self.enter_form(name, resources, ctm, depth, runs)?;
                    }
                }
                "BT" => {
                    in_text_object = true;
                    let leading = matrix.leading;
                    matrix = TextMatrix::default();
                    matrix.leading = leading;
                }
                "ET" => {
                    in_text_object = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            font_name = name.clone();
                            vertical = is_vertical_font(&resources.fonts, name);
                        }
                        font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(tl) = op.operands.first().and_then(get_number) {
                        matrix.leading = tl;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            matrix.leading = -ty;
                        }
                        matrix.next_line_offset(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => matrix.next_line(),
                "Tj" | "'" | "\"" | "TJ" if in_text_object => {
                    if op.operator != "Tj" && op.operator != "TJ" {
                        matrix.next_line();
                    }
                    let shown = match op.operator.as_str() {
                        "\"" => op.operands.get(2),
                        _ => op.operands.first(),
                    };
                    let Some(shown) = shown else { continue };

                    let start = ctm.apply(matrix.position());
                    let scale = matrix.scale() * ctm.scale();
                    let text = self.show(
                        shown,
                        &resources.fonts,
                        &font_name,
                        font_size,
                        vertical,
                        &mut matrix,
                    );
                    if text.trim().is_empty() {
                        continue;
                    }
                    let end = ctm.apply(matrix.position());
                    runs.push(self.place(text, start, end, font_size * scale, vertical));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Interpret the form XObject `name` under `ctm`. Image XObjects and
    /// unknown names are ignored.
    fn enter_form(
        &self,
        name: &[u8],
        resources: &Resources<'a>,
        ctm: Matrix,
        depth: usize,
        runs: &mut Vec<TextRun>,
    ) -> Result<()> {
        if depth >= MAX_FORM_DEPTH {
            log::warn!("Form XObjects nested deeper than {}; skipping", MAX_FORM_DEPTH);
            return Ok(());
        }
        let Some(stream) = resources
            .xobjects
            .and_then(|x| x.get(name).ok())
            .and_then(|obj| resolve(self.doc, obj).ok())
            .and_then(|obj| obj.as_stream().ok())
        else {
            return Ok(());
        };
        let is_form = stream
            .dict
            .get(b"Subtype")
            .and_then(Object::as_name)
            .is_ok_and(|s| s == b"Form");
        if !is_form {
            return Ok(());
        }

        let form_matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|obj| resolve(self.doc, obj).ok())
            .and_then(|obj| obj.as_array().ok())
            .and_then(|items| Matrix::from_operands(items))
            .unwrap_or(Matrix::IDENTITY);

        // Forms without their own resources use the ones of their caller.
        let own = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|obj| resolve(self.doc, obj).ok())
            .and_then(|obj| obj.as_dict().ok());
        let form_resources = match own {
            Some(dict) => Resources {
                fonts: fonts_of(self.doc, dict),
                xobjects: sub_dict(self.doc, dict, b"XObject"),
            },
            None => Resources {
                fonts: resources.fonts.clone(),
                xobjects: resources.xobjects,
            },
        };

        log::trace!("Entering form XObject {}", String::from_utf8_lossy(name));
        self.interpret(
            &stream_data(stream),
            &form_resources,
            form_matrix.then(&ctm),
            depth + 1,
            runs,
        )
    }

    /// Decode the operand of a text-showing operator and advance the matrix
    /// past it.
    fn show(
        &self,
        operand: &Object,
        fonts: &FontMap<'a>,
        font_name: &[u8],
        font_size: f32,
        vertical: bool,
        matrix: &mut TextMatrix,
    ) -> String {
        let mut shown = String::new();
        match operand {
            Object::String(bytes, _) => {
                let text = self.decode(fonts, font_name, bytes);
                advance_glyphs(&text, font_size, vertical, matrix);
                shown.push_str(&text);
            }
            Object::Array(items) => {
                for item in items {
                    match item {
                        Object::String(bytes, _) => {
                            let text = self.decode(fonts, font_name, bytes);
                            advance_glyphs(&text, font_size, vertical, matrix);
                            shown.push_str(&text);
                        }
                        other => {
                            // Adjustments are in thousandths of an em and
                            // move against the writing direction.
                            if let Some(n) = get_number(other) {
                                let offset = -n / 1000.0 * font_size;
                                if vertical {
                                    matrix.advance(0.0, offset);
                                } else {
                                    matrix.advance(offset, 0.0);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
        shown
    }

    fn decode(&self, fonts: &FontMap<'a>, font_name: &[u8], bytes: &[u8]) -> String {
        let encoding = fonts
            .get(font_name)
            .and_then(|f| f.get_font_encoding(self.doc).ok());

        if let Some(ref enc) = encoding {
            if let Ok(text) = LopdfDocument::decode_text(enc, bytes) {
                return text;
            }
        }
        log::trace!(
            "Falling back to simple decoding for font {}",
            String::from_utf8_lossy(font_name)
        );
        super::backend::decode_text_simple(bytes)
    }

    /// Build the page-space rectangle of a run from its start and end points
    /// in user space.
    fn place(
        &self,
        text: String,
        start: (f32, f32),
        end: (f32, f32),
        size: f32,
        vertical: bool,
    ) -> TextRun {
        let (x0, y0, x1, y1) = if vertical {
            // Vertical origins sit at the top centre of each glyph.
            let half = size / 2.0;
            let bottom = if end.1 <= start.1 {
                end.1.min(start.1 - size)
            } else {
                end.1.max(start.1 + size)
            };
            (start.0 - half, start.1, start.0 + half, bottom)
        } else {
            let right = end.0.max(start.0 + size * 0.5);
            (start.0, start.1 - size * DESCENT, right, start.1 + size * ASCENT)
        };

        TextRun {
            bbox: self.space.rect(x0, y0, x1, y1),
            text,
            font_size: size,
            vertical,
        }
    }
}

/// Fonts using a vertical CMap (`Identity-V`, `UniJIS-UCS2-V`, ...) write
/// top to bottom.
fn is_vertical_font(fonts: &FontMap<'_>, font_name: &[u8]) -> bool {
    fonts
        .get(font_name)
        .and_then(|f| f.get(b"Encoding").ok())
        .and_then(|o| o.as_name().ok())
        .is_some_and(|name| name.ends_with(b"-V"))
}

/// The `/Resources` of a page, inherited through `/Parent` if needed.
fn page_resources(doc: &LopdfDocument, page_id: ObjectId) -> Option<&Dictionary> {
    let mut current = Some(page_id);
    for _ in 0..MAX_INHERITANCE_DEPTH {
        let dict = doc.get_dictionary(current?).ok()?;
        if let Some(resources) = sub_dict(doc, dict, b"Resources") {
            return Some(resources);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// A dictionary-valued entry of `dict`, following a reference.
fn sub_dict<'a>(doc: &'a LopdfDocument, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Dictionary> {
    let obj = dict.get(key).ok()?;
    resolve(doc, obj).ok()?.as_dict().ok()
}

/// Font dictionaries listed in a resource dictionary.
fn fonts_of<'a>(doc: &'a LopdfDocument, resources: &'a Dictionary) -> FontMap<'a> {
    let Some(fonts) = sub_dict(doc, resources, b"Font") else {
        return FontMap::new();
    };
    fonts
        .iter()
        .filter_map(|(name, obj)| {
            let font = resolve(doc, obj).ok()?.as_dict().ok()?;
            Some((name.clone(), font))
        })
        .collect()
}

/// Advance past `text` assuming full-width CJK glyphs and half-width others.
fn advance_glyphs(text: &str, font_size: f32, vertical: bool, matrix: &mut TextMatrix) {
    if vertical {
        let count = text.chars().count() as f32;
        matrix.advance(0.0, -count * font_size);
    } else {
        let ems: f32 = text
            .chars()
            .map(|c| if is_full_width(c) { 1.0 } else { 0.5 })
            .sum();
        matrix.advance(ems * font_size, 0.0);
    }
}

/// Merge consecutive runs into blocks.
///
/// A vertical run joins the current block when it sits in the same column and
/// starts at most one em below it; a horizontal run joins when it shares the
/// baseline and starts at most one em to the right.
pub(crate) fn group_runs(runs: Vec<TextRun>) -> Vec<TextBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<TextRun> = None;

    for run in runs {
        match current.as_mut() {
            Some(block) if continues(block, &run) => {
                block.bbox = block.bbox.union(&run.bbox);
                block.text.push_str(&run.text);
            }
            _ => {
                if let Some(done) = current.take() {
                    blocks.push(TextBlock {
                        bbox: done.bbox,
                        text: done.text,
                    });
                }
                current = Some(run);
            }
        }
    }

    if let Some(done) = current {
        blocks.push(TextBlock {
            bbox: done.bbox,
            text: done.text,
        });
    }
    blocks
}

fn continues(block: &TextRun, run: &TextRun) -> bool {
    if block.vertical != run.vertical {
        return false;
    }
    let size = block.font_size.max(run.font_size);
    if block.vertical {
        let block_center = (block.bbox.left + block.bbox.right) / 2.0;
        let run_center = (run.bbox.left + run.bbox.right) / 2.0;
        (block_center - run_center).abs() <= size * 0.5
            && run.bbox.top >= block.bbox.top
            && run.bbox.top - block.bbox.bottom <= size
    } else {
        (block.bbox.bottom - run.bbox.bottom).abs() <= size * 0.5
            && run.bbox.left >= block.bbox.left
            && run.bbox.left - block.bbox.right <= size
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Characters that occupy a full em: CJK ideographs, kana, CJK punctuation
/// and the full-width forms block.
fn is_full_width(c: char) -> bool {
    let code = c as u32;

    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
    // Halfwidth and Fullwidth Forms (full-width half only)
    || (0xFF01..=0xFF60).contains(&code)
}
