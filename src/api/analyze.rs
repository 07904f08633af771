//! `POST /api/analyze`: multipart upload or inline text → classification.

use axum::Json;
use axum::extract::{Multipart, State};
use tracing::info;
use uuid::Uuid;

use super::AppState;
use super::error::ApiError;
use crate::classifier::ClassificationResult;
use crate::error::InputError;
use crate::extract::{RawEmail, extract_text};

/// Characters of cleaned text included in the request log.
const LOG_PREVIEW_CHARS: usize = 100;

/// A file part of the form.
#[derive(Debug)]
pub(crate) struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// The two optional inputs of the analyze form.
#[derive(Debug, Default)]
pub(crate) struct AnalyzeForm {
    pub file: Option<UploadedFile>,
    pub email_text: Option<String>,
}

/// Exactly one validated input.
#[derive(Debug)]
pub(crate) enum EmailInput {
    File(UploadedFile),
    Text(String),
}

impl AnalyzeForm {
    /// Read the `file` and `email_text` parts. Unknown parts are skipped.
    ///
    /// An empty text part, or a file part with neither name nor bytes (what
    /// browsers send when no file was picked), counts as absent.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("file") => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    if filename.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.file = Some(UploadedFile {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
                Some("email_text") => {
                    let text = field.text().await?;
                    if !text.is_empty() {
                        form.email_text = Some(text);
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    /// Require exactly one of file or text.
    pub fn into_input(self) -> Result<EmailInput, InputError> {
        match (self.file, self.email_text) {
            (Some(_), Some(_)) => Err(InputError::BothInputs),
            (Some(file), None) => Ok(EmailInput::File(file)),
            (None, Some(text)) => Ok(EmailInput::Text(text)),
            (None, None) => Err(InputError::NoContent),
        }
    }
}

pub(crate) async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ClassificationResult>, ApiError> {
    let request_id = Uuid::new_v4();
    let input = AnalyzeForm::read(multipart).await?.into_input()?;

    let (source, content) = match input {
        EmailInput::Text(text) => ("text", text),
        EmailInput::File(file) => {
            let raw = RawEmail::from_upload(&file.filename, file.bytes)?;
            let text = tokio::task::spawn_blocking(move || extract_text(&raw))
                .await
                .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))??;
            ("file", text)
        }
    };

    if content.trim().is_empty() {
        return Err(InputError::EmptyContent.into());
    }

    let cleaned = state.normalizer.clean_text(&content);
    let preview: String = cleaned.chars().take(LOG_PREVIEW_CHARS).collect();
    info!(
        %request_id,
        source,
        chars = content.chars().count(),
        preview = %preview,
        "Analyzing email"
    );

    let result = state.gateway.classify(&cleaned).await;
    info!(
        %request_id,
        category = %result.category,
        confidence = result.confidence,
        "Email classified"
    );

    Ok(Json(result))
}
