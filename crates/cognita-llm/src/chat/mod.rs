//! Reasoning-service providers

pub mod ollama;
pub mod openai;

pub use ollama::OllamaChatProvider;
pub use openai::OpenAIChatProvider;

use cognita_config::{ChatConfig, LlmProviderType};
use cognita_core::traits::{LlmError, LlmResult, ReasoningService};
use std::sync::Arc;
use tracing::info;

/// Create a reasoning service from configuration
///
/// The hosted OpenAI endpoint needs an API key. A custom OpenAI-compatible
/// endpoint may run without one.
pub fn create_reasoning_service(config: &ChatConfig) -> LlmResult<Arc<dyn ReasoningService>> {
    let service: Arc<dyn ReasoningService> = match config.provider {
        LlmProviderType::Ollama => Arc::new(OllamaChatProvider::new(
            config.llm_endpoint(),
            config.chat_model(),
            config.timeout_secs(),
        )),
        LlmProviderType::OpenAI => {
            if config.api_key.is_none() && config.endpoint.is_none() {
                return Err(LlmError::ConfigError(
                    "no API key configured; set chat.api_key, COGNITA_API_KEY or OPENAI_API_KEY"
                        .to_string(),
                ));
            }
            Arc::new(OpenAIChatProvider::new(
                config.api_key.clone(),
                Some(config.llm_endpoint()),
                config.chat_model(),
                config.timeout_secs(),
            ))
        }
    };

    info!(
        provider = service.provider_name(),
        model = service.model(),
        "Reasoning service ready"
    );
    Ok(service)
}
