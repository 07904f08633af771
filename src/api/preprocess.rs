//! `POST /api/preprocess`: expose the normalizer for inspection.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiError;
use crate::nlp::{DEFAULT_TOP_KEYWORDS, Language, NormalizerConfig};

/// Unset options take the `NormalizerConfig` defaults; the language
/// defaults to the configured one.
#[derive(Debug, Deserialize)]
pub(crate) struct PreprocessRequest {
    text: String,
    #[serde(default)]
    remove_stopwords: Option<bool>,
    #[serde(default)]
    apply_stemming: Option<bool>,
    #[serde(default)]
    normalize_case: Option<bool>,
    #[serde(default)]
    language: Option<Language>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PreprocessResponse {
    cleaned: String,
    processed: String,
    keywords: Vec<String>,
}

impl PreprocessRequest {
    fn normalizer_config(&self, default_language: Language) -> NormalizerConfig {
        let defaults = NormalizerConfig::default();
        NormalizerConfig {
            remove_stopwords: self.remove_stopwords.unwrap_or(defaults.remove_stopwords),
            apply_stemming: self.apply_stemming.unwrap_or(defaults.apply_stemming),
            normalize_case: self.normalize_case.unwrap_or(defaults.normalize_case),
            language: self.language.unwrap_or(default_language),
        }
    }
}

pub(crate) async fn preprocess(
    State(state): State<AppState>,
    payload: Result<Json<PreprocessRequest>, JsonRejection>,
) -> Result<Json<PreprocessResponse>, ApiError> {
    let Json(request) = payload?;
    let normalizer = &state.normalizer;
    let config = request.normalizer_config(normalizer.language());

    Ok(Json(PreprocessResponse {
        cleaned: normalizer.clean_text(&request.text),
        processed: normalizer.process_email(&request.text, &config),
        keywords: normalizer.extract_keywords(&request.text, config.language, DEFAULT_TOP_KEYWORDS),
    }))
}
