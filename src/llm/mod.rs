//! LLM integration for the classifier.
//!
//! Uses the rig-core crate for HTTP transport against any OpenAI-compatible
//! chat-completions API, and the `RigAdapter` to bridge rig's
//! `CompletionModel` trait to our `LlmProvider` trait. Tests substitute
//! their own `LlmProvider` stubs.

pub mod provider;
mod rig_adapter;

pub use provider::*;
pub use rig_adapter::RigAdapter;

use std::sync::Arc;

use rig::client::CompletionClient;
use secrecy::ExposeSecret;

use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub base_url: String,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    use rig::providers::openai;

    let client: openai::Client = openai::Client::builder()
        .api_key(config.api_key.expose_secret())
        .base_url(&config.base_url)
        .build()
        .map_err(|e| LlmError::RequestFailed {
            provider: "openai".to_string(),
            reason: format!("Failed to create OpenAI client: {}", e),
        })?;

    // Chat completions rather than the Responses API, so any compatible
    // server works.
    let model = client.completions_api().completion_model(&config.model);
    tracing::info!(
        "Using OpenAI-compatible API at {} (model: {})",
        config.base_url,
        config.model
    );
    Ok(Arc::new(RigAdapter::new(model, &config.model)))
}
