//! Reasoning service abstraction
//!
//! Core defines the interface, `cognita-llm` provides HTTP implementations.
//! The service is stateless request/response: one system instruction, one
//! user text, raw text back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for reasoning service calls
pub type LlmResult<T> = Result<T, LlmError>;

/// Reasoning service errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum LlmError {
    /// Transport failure or timeout
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success status or unparseable envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider could not be constructed from configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// One chat-style request to the reasoning service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningRequest {
    pub system_instruction: String,
    pub user_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ReasoningRequest {
    pub fn new(system_instruction: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            user_text: user_text.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Issue a single request and return the assistant's raw text
    async fn complete(&self, request: ReasoningRequest) -> LlmResult<String>;

    fn provider_name(&self) -> &str;

    fn model(&self) -> &str;
}
