//! Reasoning service configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::defaults;

/// Which HTTP API the reasoning service speaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// OpenAI `/chat/completions` or any compatible server
    #[default]
    #[serde(alias = "openai-compatible")]
    OpenAI,
    Ollama,
}

impl fmt::Display for LlmProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProviderType::OpenAI => f.write_str("openai"),
            LlmProviderType::Ollama => f.write_str("ollama"),
        }
    }
}

impl FromStr for LlmProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "openai-compatible" => Ok(LlmProviderType::OpenAI),
            "ollama" => Ok(LlmProviderType::Ollama),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// `[chat]` section. Unset fields fall back to provider-specific defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub provider: LlmProviderType,
    pub model: Option<String>,
    /// Base URL; `/chat/completions` or `/api/chat` is appended by the provider
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// 0.0 - 2.0
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl ChatConfig {
    /// Endpoint, using the provider default if not specified
    pub fn llm_endpoint(&self) -> String {
        self.endpoint.clone().unwrap_or_else(|| match self.provider {
            LlmProviderType::OpenAI => defaults::DEFAULT_OPENAI_ENDPOINT.to_string(),
            LlmProviderType::Ollama => defaults::DEFAULT_OLLAMA_ENDPOINT.to_string(),
        })
    }

    pub fn chat_model(&self) -> String {
        self.model.clone().unwrap_or_else(|| match self.provider {
            LlmProviderType::OpenAI => defaults::DEFAULT_OPENAI_MODEL.to_string(),
            LlmProviderType::Ollama => defaults::DEFAULT_OLLAMA_MODEL.to_string(),
        })
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(defaults::DEFAULT_TEMPERATURE)
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(defaults::DEFAULT_MAX_TOKENS)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(defaults::DEFAULT_TIMEOUT_SECS)
    }
}
