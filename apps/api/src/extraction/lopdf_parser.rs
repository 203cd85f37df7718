//! Structure parser backed by `lopdf`.
//!
//! Walks each page's content stream and groups text-showing operators into
//! fragments. Fragment boundaries are `BT`/`ET` and the text-positioning
//! operators; each `Tj`, `'`, `"` or `TJ` becomes one run. String bytes are
//! decoded through the encoding of the font selected by `Tf` (ToUnicode map
//! first, then the font's `/Encoding`).

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::extraction::structure::{
    Page, ParsedDocument, ParserError, PdfStructureParser, TextFragment, TextRun,
};

/// `TJ` adjustments at or below this (thousandths of an em) read as a word gap.
const WORD_GAP_THRESHOLD: f64 = -250.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfParser;

#[async_trait]
impl PdfStructureParser for LopdfParser {
    async fn parse(&self, bytes: Bytes) -> Result<ParsedDocument, ParserError> {
        // lopdf is synchronous; a panic inside it surfaces as a JoinError.
        tokio::task::spawn_blocking(move || parse_document(&bytes))
            .await
            .map_err(|e| ParserError(format!("parser task aborted: {e}")))?
    }
}

/// Parses a PDF buffer into the page → fragment → run tree.
pub fn parse_document(bytes: &[u8]) -> Result<ParsedDocument, ParserError> {
    let doc = Document::load_mem(bytes).map_err(|e| ParserError(e.to_string()))?;

    let pages = doc
        .get_pages()
        .into_iter()
        .map(|(page_number, page_id)| {
            let operations = match page_operations(&doc, page_id) {
                Ok(ops) => ops,
                Err(e) => {
                    warn!("Skipping unreadable content on page {page_number}: {e}");
                    return Page::default();
                }
            };
            let fragments = page_fragments(&doc, page_id, &operations);
            debug!("Page {page_number}: {} text fragments", fragments.len());
            Page {
                fragments: Some(fragments),
            }
        })
        .collect();

    Ok(ParsedDocument { pages: Some(pages) })
}

fn page_operations(doc: &Document, page_id: ObjectId) -> lopdf::Result<Vec<Operation>> {
    let raw = doc.get_page_content(page_id)?;
    Ok(Content::decode(&raw)?.operations)
}

/// Resolves the page's font encodings once, then walks its operations.
fn page_fragments(doc: &Document, page_id: ObjectId, operations: &[Operation]) -> Vec<TextFragment> {
    let encodings: BTreeMap<Vec<u8>, _> = doc
        .get_page_fonts(page_id)
        .map(|fonts| {
            fonts
                .into_iter()
                .filter_map(|(name, font)| match font.get_font_encoding(doc) {
                    Ok(encoding) => Some((name, encoding)),
                    Err(e) => {
                        let name = String::from_utf8_lossy(&name);
                        debug!("No usable encoding for font {name}: {e}");
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    collect_fragments(operations, |font: Option<&[u8]>, bytes: &[u8]| {
        font.and_then(|name| encodings.get(name))
            .and_then(|encoding| Document::decode_text(encoding, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    })
}

/// Groups text operators into fragments. `decode` turns string bytes into
/// text given the resource name of the current font.
fn collect_fragments<F>(operations: &[Operation], decode: F) -> Vec<TextFragment>
where
    F: Fn(Option<&[u8]>, &[u8]) -> String,
{
    let mut fragments = Vec::new();
    let mut runs: Vec<TextRun> = Vec::new();
    let mut font: Option<Vec<u8>> = None;

    for op in operations {
        // Tf is text state and survives BT/ET.
        if op.operator == "Tf" {
            if let Some(Object::Name(name)) = op.operands.first() {
                font = Some(name.clone());
            }
            continue;
        }

        let decode_bytes = |bytes: &[u8]| decode(font.as_deref(), bytes);
        match op.operator.as_str() {
            "BT" | "ET" | "Td" | "TD" | "Tm" | "T*" => flush(&mut fragments, &mut runs),
            "Tj" => push_run(&mut runs, op.operands.first().map(|o| string_operand(o, &decode_bytes))),
            // ' and " move to the next line before showing text.
            "'" => {
                flush(&mut fragments, &mut runs);
                push_run(&mut runs, op.operands.first().map(|o| string_operand(o, &decode_bytes)));
            }
            "\"" => {
                flush(&mut fragments, &mut runs);
                push_run(&mut runs, op.operands.get(2).map(|o| string_operand(o, &decode_bytes)));
            }
            "TJ" => push_run(&mut runs, op.operands.first().map(|o| array_operand(o, &decode_bytes))),
            _ => {}
        }
    }
    flush(&mut fragments, &mut runs);

    fragments
}

fn flush(fragments: &mut Vec<TextFragment>, runs: &mut Vec<TextRun>) {
    if !runs.is_empty() {
        fragments.push(TextFragment {
            runs: Some(std::mem::take(runs)),
        });
    }
}

fn push_run(runs: &mut Vec<TextRun>, text: Option<String>) {
    let Some(text) = text else {
        return;
    };
    // Line breaks and tabs read as spaces; other ASCII controls (NUL padding
    // from undecodable two-byte codes) are dropped.
    let text: String = text
        .chars()
        .filter_map(|c| match c {
            '\t' | '\n' | '\r' => Some(' '),
            c if c.is_ascii_control() => None,
            c => Some(c),
        })
        .collect();
    if !text.trim().is_empty() {
        runs.push(TextRun::from_plain(&text));
    }
}

fn string_operand(obj: &Object, decode: &dyn Fn(&[u8]) -> String) -> String {
    match obj {
        Object::String(bytes, _) => decode(bytes),
        _ => String::new(),
    }
}

fn array_operand(obj: &Object, decode: &dyn Fn(&[u8]) -> String) -> String {
    let Object::Array(items) = obj else {
        return String::new();
    };

    let mut text = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => text.push_str(&decode(bytes)),
            Object::Integer(n) => push_gap(&mut text, *n as f64),
            Object::Real(n) => push_gap(&mut text, f64::from(*n)),
            _ => {}
        }
    }
    text
}

fn push_gap(text: &mut String, adjustment: f64) {
    if adjustment <= WORD_GAP_THRESHOLD && !text.is_empty() && !text.ends_with(' ') {
        text.push(' ');
    }
}

/// Fallback when the current font has no usable encoding: UTF-16BE when the
/// string carries the `FE FF` mark, then UTF-8, then Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
