//! Error types for the email classifier.

use std::time::Duration;

/// Startup errors: anything that stops the classifier from being built.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Configuration-related errors.
///
/// These are operator mistakes, not transient failures: the service refuses
/// to start instead of silently degrading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
///
/// Every variant is recoverable from the caller's point of view: the
/// classifier gateway replaces the remote answer with the keyword fallback.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Provider {provider} timed out after {after:?}")]
    Timeout { provider: String, after: Duration },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors turning uploaded bytes into plain text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Unsupported file format. Please upload .txt or .pdf")]
    UnsupportedFormat { filename: Option<String> },

    #[error("Error reading PDF: {0}")]
    Pdf(String),
}

/// Client-side input errors, surfaced directly as 4xx.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Envie um arquivo OU informe o texto do e-mail.")]
    NoContent,

    #[error("Envie apenas uma entrada: arquivo OU texto.")]
    BothInputs,

    #[error("O conteúdo do e-mail está vazio.")]
    EmptyContent,

    #[error("O e-mail excede o tamanho máximo permitido.")]
    TooLarge,

    #[error("Malformed request: {0}")]
    Malformed(String),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
