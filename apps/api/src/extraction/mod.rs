//! Text Extractor — turns raw PDF bytes into one normalized text string.
//!
//! The parser backend is pluggable (`PdfStructureParser`); this module only
//! folds the page → fragment → run tree it returns.

pub mod lopdf_parser;
pub mod structure;

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::extraction::structure::{ParsedDocument, PdfStructureParser};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid PDF file: empty buffer")]
    InvalidInput,

    #[error("PDF parsing failed: {0}")]
    ParserFailure(String),

    #[error("No text could be extracted from the PDF")]
    NoTextExtracted,

    #[error("Text extraction failed: {0}")]
    DecodeFailure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub normalized_text: String,
    pub page_count: usize,
}

#[derive(Clone)]
pub struct TextExtractor {
    parser: Arc<dyn PdfStructureParser>,
}

impl TextExtractor {
    pub fn new(parser: Arc<dyn PdfStructureParser>) -> Self {
        Self { parser }
    }

    pub async fn extract(&self, bytes: Bytes) -> Result<ExtractionResult, ExtractionError> {
        if bytes.is_empty() {
            return Err(ExtractionError::InvalidInput);
        }

        info!("Extracting text from PDF ({} bytes)", bytes.len());

        let document = self
            .parser
            .parse(bytes)
            .await
            .map_err(|e| ExtractionError::ParserFailure(e.0))?;

        let result = normalize(&document)?;

        info!(
            "Extracted {} characters from {} pages",
            result.normalized_text.chars().count(),
            result.page_count
        );

        Ok(result)
    }
}

/// Folds the parsed tree into `{ normalized_text, page_count }`.
///
/// Every decoded run is followed by one space and every page by `"\n\n"`,
/// whether or not it produced text. The result is trimmed at both ends.
pub fn normalize(document: &ParsedDocument) -> Result<ExtractionResult, ExtractionError> {
    let Some(pages) = document.pages.as_deref() else {
        return Err(ExtractionError::NoTextExtracted);
    };

    let mut text = String::new();
    for page in pages {
        if let Some(fragments) = page.fragments.as_deref() {
            for fragment in fragments {
                let Some(runs) = fragment.runs.as_deref() else {
                    continue;
                };
                for run in runs {
                    let Some(encoded) = run.text.as_deref().filter(|t| !t.is_empty()) else {
                        continue;
                    };
                    text.push_str(&decode_run(encoded)?);
                    text.push(' ');
                }
            }
        }
        text.push_str("\n\n");
    }

    let normalized_text = text.trim();
    if normalized_text.is_empty() {
        return Err(ExtractionError::NoTextExtracted);
    }

    Ok(ExtractionResult {
        normalized_text: normalized_text.to_string(),
        page_count: pages.len(),
    })
}

/// Percent-decodes one run. Every `%` must start a two-hex-digit escape and
/// the decoded bytes must be UTF-8.
fn decode_run(encoded: &str) -> Result<String, ExtractionError> {
    let bytes = encoded.as_bytes();
    for (i, _) in encoded.match_indices('%') {
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(ExtractionError::DecodeFailure(format!(
                "malformed percent escape at byte {i} in {encoded:?}"
            )));
        }
    }
    urlencoding::decode(encoded)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ExtractionError::DecodeFailure(e.to_string()))
}
