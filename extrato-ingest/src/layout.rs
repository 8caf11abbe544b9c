//! Positioned text runs from PDF content streams.
//!
//! Walks each page's decoded operators with `lopdf`, tracking the text and
//! graphics matrices, and records where every show-text operator lands.
//! Strings are decoded through the selected font's `/ToUnicode` map or
//! named `/Encoding` when lopdf can read it. Widths are estimated from glyph
//! count; no font metrics are read.

use std::collections::BTreeMap;

use lopdf::content::Operation;
use lopdf::{Dictionary, Document, Encoding, Object, ObjectId};
use tracing::debug;

use crate::error::Result;

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_EM: f32 = 0.5;

/// Baselines closer than this (in points) belong to the same visual line.
const LINE_TOLERANCE: f32 = 2.0;

/// `TJ` adjustments below this (thousandths of an em) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = -200.0;

type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// A string drawn by one show-text operator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    /// Effective size in user space.
    pub font_size: f32,
    pub text: String,
}

impl TextRun {
    pub fn width(&self) -> f32 {
        self.text.chars().count() as f32 * self.font_size * GLYPH_WIDTH_EM
    }

    pub fn x_end(&self) -> f32 {
        self.x + self.width()
    }
}

/// All text runs of one page, in content-stream order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page_number: u32,
    pub runs: Vec<TextRun>,
}

impl PageLayout {
    /// Group runs into visual lines, top to bottom, each sorted left to right.
    pub fn lines(&self) -> Vec<Vec<TextRun>> {
        let mut runs = self.runs.clone();
        runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

        let mut lines: Vec<Vec<TextRun>> = Vec::new();
        let mut line_y = f32::NAN;
        for run in runs {
            match lines.last_mut() {
                Some(line) if (run.y - line_y).abs() <= LINE_TOLERANCE => line.push(run),
                _ => {
                    line_y = run.y;
                    lines.push(vec![run]);
                }
            }
        }

        for line in &mut lines {
            line.sort_by(|a, b| a.x.total_cmp(&b.x));
        }
        lines
    }
}

/// Read the positioned text of every page, in page order.
pub fn read_page_layouts(doc: &Document) -> Result<Vec<PageLayout>> {
    let mut pages = Vec::new();
    for (page_number, page_id) in doc.get_pages() {
        let content = doc.get_and_decode_page_content(page_id)?;
        let encodings = page_encodings(doc, page_id);
        let runs = text_runs(&content.operations, &encodings);
        debug!(page = page_number, runs = runs.len(), "read page layout");
        pages.push(PageLayout { page_number, runs });
    }
    Ok(pages)
}

/// Font resource name to text encoding.
type FontEncodings<'a> = BTreeMap<Vec<u8>, Encoding<'a>>;

/// Encodings of the fonts a page can select with `Tf`.
///
/// Fonts with neither `/ToUnicode` nor a named `/Encoding`, and fonts lopdf
/// cannot read a map from, are left out; their strings decode as
/// [`decode_pdf_string`].
fn page_encodings(doc: &Document, page_id: ObjectId) -> FontEncodings<'_> {
    let fonts = match doc.get_page_fonts(page_id) {
        Ok(fonts) => fonts,
        Err(err) => {
            debug!(?page_id, %err, "page fonts unreadable");
            return BTreeMap::new();
        }
    };
    fonts
        .into_iter()
        .filter(|(_, font)| declares_encoding(font))
        .filter_map(|(name, font)| match font.get_font_encoding(doc) {
            Ok(encoding) => Some((name, encoding)),
            Err(err) => {
                debug!(font = %String::from_utf8_lossy(&name), %err, "font encoding unreadable");
                None
            }
        })
        .collect()
}

fn declares_encoding(font: &Dictionary) -> bool {
    font.type_is(b"Font")
        && (font.has(b"ToUnicode") || font.get(b"Encoding").and_then(Object::as_name).is_ok())
}

#[derive(Debug, Clone, Copy)]
struct TextState {
    ctm: Matrix,
    tm: Matrix,
    tlm: Matrix,
    font_size: f32,
    leading: f32,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: IDENTITY,
            tm: IDENTITY,
            tlm: IDENTITY,
            font_size: 0.0,
            leading: 0.0,
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = multiply(translate(tx, ty), self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    /// Record a run at the current position and advance past it.
    fn show(&mut self, text: String, runs: &mut Vec<TextRun>) {
        let rendering = multiply(self.tm, self.ctm);
        let scale = (rendering[2] * rendering[2] + rendering[3] * rendering[3]).sqrt();
        let advance = text.chars().count() as f32 * self.font_size * GLYPH_WIDTH_EM;

        if !text.trim().is_empty() {
            runs.push(TextRun {
                x: rendering[4],
                y: rendering[5],
                font_size: self.font_size * scale,
                text: text.trim().to_string(),
            });
        }
        self.tm = multiply(translate(advance, 0.0), self.tm);
    }
}

fn text_runs(operations: &[Operation], encodings: &FontEncodings<'_>) -> Vec<TextRun> {
    let mut state = TextState::new();
    let mut saved: Vec<Matrix> = Vec::new();
    let mut runs = Vec::new();
    let mut encoding = None;

    for op in operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => saved.push(state.ctm),
            "Q" => {
                if let Some(ctm) = saved.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = matrix(operands) {
                    state.ctm = multiply(m, state.ctm);
                }
            }
            "BT" => {
                state.tm = IDENTITY;
                state.tlm = IDENTITY;
            }
            "Tf" => {
                encoding = operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| encodings.get(name));
                if let Some(size) = operands.get(1).and_then(number) {
                    state.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(number),
                    operands.get(1).and_then(number),
                ) {
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix(operands) {
                    state.tm = m;
                    state.tlm = m;
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if let Some(text) = operands.first().and_then(|s| string_operand(s, encoding)) {
                    state.show(text, &mut runs);
                }
            }
            "'" => {
                state.next_line();
                if let Some(text) = operands.first().and_then(|s| string_operand(s, encoding)) {
                    state.show(text, &mut runs);
                }
            }
            "\"" => {
                state.next_line();
                if let Some(text) = operands.get(2).and_then(|s| string_operand(s, encoding)) {
                    state.show(text, &mut runs);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    state.show(join_tj_array(items, encoding), &mut runs);
                }
            }
            _ => {}
        }
    }

    runs
}

fn join_tj_array(items: &[Object], encoding: Option<&Encoding<'_>>) -> String {
    let mut text = String::new();
    for item in items {
        if let Some(s) = string_operand(item, encoding) {
            text.push_str(&s);
        } else if let Some(adjust) = number(item) {
            if adjust < TJ_SPACE_THRESHOLD && !text.ends_with(' ') {
                text.push(' ');
            }
        }
    }
    text
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn matrix(operands: &[Object]) -> Option<Matrix> {
    if operands.len() != 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, obj) in m.iter_mut().zip(operands) {
        *slot = number(obj)?;
    }
    Some(m)
}

fn string_operand(obj: &Object, encoding: Option<&Encoding<'_>>) -> Option<String> {
    let Object::String(bytes, _) = obj else {
        return None;
    };
    let decoded = encoding.and_then(|enc| Document::decode_text(enc, bytes).ok());
    Some(decoded.unwrap_or_else(|| decode_pdf_string(bytes)))
}

/// UTF-16BE when the string carries a byte-order mark, Latin-1 otherwise.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn translate(tx: f32, ty: f32) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

/// `m × n` for PDF row-vector matrices `[a b c d e f]`.
fn multiply(m: Matrix, n: Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}
