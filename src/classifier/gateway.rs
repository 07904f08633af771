//! Classifier gateway: remote LLM classification with keyword fallback.
//!
//! Flow:
//! 1. Mock mode → keyword classifier, no network
//! 2. Remote mode → LLM call (bounded by a timeout) → JSON extraction →
//!    validation
//! 3. Any remote failure → logged, keyword classifier result returned
//!
//! A missing credential is not a remote failure: it is rejected when the
//! gateway is built, before the service accepts traffic.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::fallback::mock_classify;
use super::{Category, ClassificationResult};
use crate::config::AppConfig;
use crate::error::{ConfigError, Error, LlmError};
use crate::llm::{CompletionRequest, LlmConfig, LlmProvider, create_provider};

/// Max tokens for the classification call.
const CLASSIFY_MAX_TOKENS: u32 = 512;

/// Temperature for classification (deterministic-ish).
const CLASSIFY_TEMPERATURE: f32 = 0.2;

/// Provider label used in validation errors.
const REMOTE_LABEL: &str = "classifier";

/// Remote LLM classifier. Either succeeds with a validated result or reports
/// why it could not; it never falls back by itself.
pub struct RemoteClassifier {
    llm: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl RemoteClassifier {
    pub fn new(llm: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    /// Model used for classification.
    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Ask the LLM to classify `text`.
    pub async fn try_remote(&self, text: &str) -> Result<ClassificationResult, LlmError> {
        let request = CompletionRequest::new(build_system_prompt(), text)
            .with_temperature(CLASSIFY_TEMPERATURE)
            .with_max_tokens(CLASSIFY_MAX_TOKENS)
            .with_json_response();

        let response = tokio::time::timeout(self.timeout, self.llm.complete(request))
            .await
            .map_err(|_| LlmError::Timeout {
                provider: self.llm.model_name().to_string(),
                after: self.timeout,
            })??;

        debug!(
            model = self.llm.model_name(),
            output_tokens = response.output_tokens,
            "Classification response received"
        );

        parse_classification_response(&response.content)
    }
}

/// How the gateway classifies.
enum ClassifierMode {
    Mock,
    Remote(RemoteClassifier),
}

/// Entry point for classification. Built once at startup and shared.
pub struct ClassifierGateway {
    mode: ClassifierMode,
}

impl ClassifierGateway {
    /// Gateway that never leaves the process.
    pub fn mock() -> Self {
        Self {
            mode: ClassifierMode::Mock,
        }
    }

    /// Gateway backed by a remote provider.
    pub fn remote(llm: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            mode: ClassifierMode::Remote(RemoteClassifier::new(llm, timeout)),
        }
    }

    /// Build the gateway from service configuration.
    ///
    /// Fails with [`ConfigError::MissingRequired`] when mock mode is off and
    /// no API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        if config.use_mock_ai {
            info!("Classifier running in mock mode (USE_MOCK_AI=true)");
            return Ok(Self::mock());
        }

        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "OPENAI_API_KEY".into(),
                hint: "Set OPENAI_API_KEY or enable USE_MOCK_AI=true".into(),
            })?;

        let llm = create_provider(&LlmConfig {
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        })?;

        Ok(Self::remote(llm, config.classifier_timeout))
    }

    /// Whether the remote service is bypassed.
    pub fn is_mock(&self) -> bool {
        matches!(self.mode, ClassifierMode::Mock)
    }

    /// Classify `text`. Never fails.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        match &self.mode {
            ClassifierMode::Mock => mock_classify(text),
            ClassifierMode::Remote(remote) => match remote.try_remote(text).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(
                        model = remote.model_name(),
                        error = %e,
                        "Remote classification failed, using keyword fallback"
                    );
                    mock_classify(text)
                }
            },
        }
    }
}

// ── Prompt construction ─────────────────────────────────────────────

/// Build the classification system prompt.
fn build_system_prompt() -> String {
    "You are a professional email assistant API.\n\
     Classify the email as Productive or Improductive and generate a professional response.\n\n\
     Categories:\n\
     - \"Productive\": requires action or a reply (support requests, status updates, questions, \
     invoices, deadlines, meetings).\n\
     - \"Improductive\": needs no action (greetings, thanks, congratulations, small talk).\n\n\
     Respond with ONLY a JSON object:\n\
     {\"category\": \"Productive\" | \"Improductive\", \"confidence\": 0.0-1.0, \
     \"summary\": \"...\", \"suggested_response\": \"...\"}\n\n\
     Rules:\n\
     - The summary is one sentence\n\
     - The suggested response is in the same language as the email\n\
     - Placeholders such as [EMAIL] or [PHONE] stand for redacted data; never invent it"
        .to_string()
}

// ── Response parsing ────────────────────────────────────────────────

/// Raw remote classification before validation.
#[derive(Debug, Deserialize)]
struct RemoteClassification {
    category: String,
    confidence: f64,
    summary: String,
    suggested_response: String,
}

/// Parse and validate the LLM output.
fn parse_classification_response(raw: &str) -> Result<ClassificationResult, LlmError> {
    let parsed: RemoteClassification =
        serde_json::from_str(json_payload(raw)).map_err(|e| invalid(format!("JSON parse error: {e}")))?;

    let category = Category::from_wire(&parsed.category)
        .ok_or_else(|| invalid(format!("unknown category: '{}'", parsed.category)))?;

    if !parsed.confidence.is_finite() {
        return Err(invalid("confidence is not a finite number".into()));
    }

    Ok(ClassificationResult {
        category,
        confidence: parsed.confidence.clamp(0.0, 1.0),
        summary: parsed.summary,
        suggested_response: parsed.suggested_response,
    })
}

fn invalid(reason: String) -> LlmError {
    LlmError::InvalidResponse {
        provider: REMOTE_LABEL.to_string(),
        reason,
    }
}

/// Slice from the first `{` to the last `}`.
///
/// JSON mode guarantees an object, but some compatible servers still fence
/// it in markdown or add a sentence around it. Anything without braces is
/// returned as is and left to the JSON parser to reject.
fn json_payload(raw: &str) -> &str {
    let raw = raw.trim();
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => &raw[start..=end],
        _ => raw,
    }
}
