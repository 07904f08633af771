//! Configuration types.
//!
//! Everything is resolved once at process start from environment variables.
//! There is no hot reload.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::nlp::{Language, LinguisticsKind};

/// Default chat model for the remote classifier.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default base URL of the OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Skip the remote service and always use the keyword classifier.
    pub use_mock_ai: bool,
    /// Credential for the remote classifier. Required unless `use_mock_ai`.
    pub api_key: Option<SecretString>,
    /// Chat model name.
    pub model: String,
    /// Base URL of the chat-completions API.
    pub base_url: String,
    /// Upper bound on a single remote classification call.
    pub classifier_timeout: Duration,
    /// HTTP listen port.
    pub port: u16,
    /// Directory holding `index.html` and the frontend assets.
    pub static_dir: PathBuf,
    /// Which linguistic backend the normalizer uses.
    pub nlp_backend: LinguisticsKind,
    /// Default language for keyword extraction and preprocessing.
    pub nlp_language: Language,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            use_mock_ai: false,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            classifier_timeout: Duration::from_secs(30),
            port: 8000,
            static_dir: PathBuf::from("app/static"),
            nlp_backend: LinguisticsKind::Full,
            nlp_language: Language::Portuguese,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let use_mock_ai = get("USE_MOCK_AI")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.use_mock_ai);

        let classifier_timeout = match get("CLASSIFIER_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = parse_value("CLASSIFIER_TIMEOUT_SECS", &raw)?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "CLASSIFIER_TIMEOUT_SECS".into(),
                        message: "must be greater than zero".into(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.classifier_timeout,
        };

        let port = match get("EMAIL_CLASSIFIER_PORT") {
            Some(raw) => parse_value("EMAIL_CLASSIFIER_PORT", &raw)?,
            None => defaults.port,
        };

        let nlp_backend = match get("NLP_BACKEND") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "NLP_BACKEND".into(),
                message,
            })?,
            None => defaults.nlp_backend,
        };

        let nlp_language = match get("NLP_LANGUAGE") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "NLP_LANGUAGE".into(),
                message,
            })?,
            None => defaults.nlp_language,
        };

        Ok(Self {
            use_mock_ai,
            api_key: get("OPENAI_API_KEY").map(SecretString::from),
            model: get("OPENAI_MODEL").unwrap_or(defaults.model),
            base_url: get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            classifier_timeout,
            port,
            static_dir: get("EMAIL_CLASSIFIER_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            nlp_backend,
            nlp_language,
        })
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{raw:?}: {e}"),
    })
}
