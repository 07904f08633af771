//! Mapping of service errors to HTTP responses.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use crate::error::{ExtractionError, InputError};

/// Body of every 500 response. Details stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno ao processar o e-mail.";

/// Error returned by the API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        body_rejection(e.status(), e.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        body_rejection(e.status(), e.body_text())
    }
}

/// A body the extractor refused: over the size limit, or unreadable.
fn body_rejection(status: StatusCode, detail: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::Input(InputError::TooLarge)
    } else {
        ApiError::Input(InputError::Malformed(detail))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Input(InputError::TooLarge) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Input(_) | Self::Extraction(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(detail) => {
                error!(error = %detail, "Request failed with internal error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => {
                warn!(error = %other, "Request rejected");
                other.to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
