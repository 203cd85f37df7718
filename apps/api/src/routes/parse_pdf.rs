//! POST /api/parse-pdf — upload → extract → structure.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{field, info, info_span, Instrument, Span};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::StructuredResume;
use crate::state::AppState;
use crate::structuring::structure_resume;

/// Multipart field carrying the PDF.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ParsePdfResponse {
    pub success: bool,
    pub data: StructuredResume,
}

struct Upload {
    file_name: Option<String>,
    bytes: Bytes,
}

/// POST /api/parse-pdf
///
/// Reads the `file` field fully into memory, extracts its text, then asks the
/// model to structure it. The steps run strictly in sequence.
pub async fn handle_parse_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ParsePdfResponse>, AppError> {
    let span = info_span!("parse_pdf", request_id = %Uuid::new_v4(), file_name = field::Empty);

    async move {
        let upload = read_upload(multipart?).await?.ok_or(AppError::MissingFile)?;
        if let Some(name) = &upload.file_name {
            Span::current().record("file_name", name.as_str());
        }

        let extracted = state.extractor.extract(upload.bytes).await?;
        let resume = structure_resume(&extracted.normalized_text, state.structurer.as_ref()).await?;

        info!(
            "Structured resume with {} experience entries and {} skills",
            resume.experience.len(),
            resume.skills.len()
        );

        Ok::<_, AppError>(Json(ParsePdfResponse {
            success: true,
            data: resume,
        }))
    }
    .instrument(span)
    .await
}

/// Returns the first `file` field, or `None` when the form has none.
async fn read_upload(mut multipart: Multipart) -> Result<Option<Upload>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await?;
        return Ok(Some(Upload { file_name, bytes }));
    }
    Ok(None)
}
