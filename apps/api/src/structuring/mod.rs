//! Structuring — reshapes extracted resume text into a `StructuredResume`.
//!
//! The model call sits behind `ResumeStructurer`; `AppState` holds an
//! `Arc<dyn ResumeStructurer>` so tests can swap in a canned backend.
//! All LLM calls go through llm_client — no direct provider calls here.

pub mod prompts;
pub mod schema;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError, OutputSchema};
use crate::models::resume::StructuredResume;
use crate::structuring::prompts::RESUME_PARSE_SYSTEM;
use crate::structuring::schema::RESUME_SCHEMA;

/// Sends `(system_prompt, user_text, output_schema)` to a model and returns
/// its schema-constrained JSON.
#[async_trait]
pub trait ResumeStructurer: Send + Sync {
    async fn structure(
        &self,
        system_prompt: &str,
        user_text: &str,
        schema: &OutputSchema,
    ) -> Result<Value, LlmError>;
}

/// Production structurer backed by the hosted model.
pub struct LlmResumeStructurer {
    llm: LlmClient,
}

impl LlmResumeStructurer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeStructurer for LlmResumeStructurer {
    async fn structure(
        &self,
        system_prompt: &str,
        user_text: &str,
        schema: &OutputSchema,
    ) -> Result<Value, LlmError> {
        self.llm
            .call_structured(system_prompt, user_text, schema)
            .await
    }
}

/// Structures extracted resume text with the fixed prompt and schema.
/// The model's answer is only shape-checked, never corrected.
pub async fn structure_resume(
    text: &str,
    structurer: &dyn ResumeStructurer,
) -> Result<StructuredResume, AppError> {
    let value = structurer
        .structure(RESUME_PARSE_SYSTEM, text, &RESUME_SCHEMA)
        .await
        .map_err(|e| AppError::Llm(format!("Resume structuring failed: {e}")))?;

    debug!("Structured resume: {value}");

    serde_json::from_value(value)
        .map_err(|e| AppError::Llm(format!("Model output does not match the resume schema: {e}")))
}
