//! The page → fragment → run tree produced by a PDF structure parser.
//!
//! Field names follow the parser's JSON wire form (`Pages` / `Texts` / `R` / `T`)
//! so fixtures can be written as plain JSON. Every level is optional: a document
//! may carry no page list, a page may carry no fragments, a fragment no runs.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ParserError(pub String);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    #[serde(rename = "Pages", default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<Page>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "Texts", default, skip_serializing_if = "Option::is_none")]
    pub fragments: Option<Vec<TextFragment>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextFragment {
    #[serde(rename = "R", default, skip_serializing_if = "Option::is_none")]
    pub runs: Option<Vec<TextRun>>,
}

/// Smallest text-bearing unit. `text` is percent-encoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(rename = "T", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TextRun {
    /// Builds a run from plain text, percent-encoding it.
    pub fn from_plain(text: &str) -> Self {
        Self {
            text: Some(urlencoding::encode(text).into_owned()),
        }
    }
}

/// A PDF structure parser. One call yields exactly one outcome.
///
/// Carried in `AppState` as `Arc<dyn PdfStructureParser>`.
#[async_trait]
pub trait PdfStructureParser: Send + Sync {
    async fn parse(&self, bytes: Bytes) -> Result<ParsedDocument, ParserError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_document_deserializes_wire_form() {
        let json = r#"{
            "Pages": [
                {"Texts": [{"R": [{"T": "Jane%20Doe"}]}]},
                {"Texts": []},
                {}
            ]
        }"#;

        let doc: ParsedDocument = serde_json::from_str(json).unwrap();
        let pages = doc.pages.unwrap();
        assert_eq!(pages.len(), 3);
        let runs = pages[0].fragments.as_ref().unwrap()[0].runs.as_ref().unwrap();
        assert_eq!(runs[0].text.as_deref(), Some("Jane%20Doe"));
        assert!(pages[1].fragments.as_ref().unwrap().is_empty());
        assert!(pages[2].fragments.is_none());
    }

    #[test]
    fn test_missing_pages_key_is_none() {
        let doc: ParsedDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.pages.is_none());
    }

    #[test]
    fn test_run_from_plain_is_percent_encoded() {
        let run = TextRun::from_plain("C++ & Rust");
        assert_eq!(run.text.as_deref(), Some("C%2B%2B%20%26%20Rust"));
    }
}
