//! Layered configuration loading

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::components::{ChatConfig, ExtractionConfig, LlmProviderType, LoggingConfig, StorageConfig};
use crate::defaults;
use crate::error::{ConfigError, ConfigResult};

pub const ENV_CHAT_PROVIDER: &str = "COGNITA_CHAT_PROVIDER";
pub const ENV_CHAT_MODEL: &str = "COGNITA_CHAT_MODEL";
pub const ENV_CHAT_ENDPOINT: &str = "COGNITA_CHAT_ENDPOINT";
pub const ENV_API_KEY: &str = "COGNITA_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_DATA_FILE: &str = "COGNITA_DATA_FILE";
pub const ENV_LOG: &str = "COGNITA_LOG";

const EXAMPLE_CONFIG: &str = r#"# Cognita configuration

[chat]
# "openai" (any OpenAI-compatible server) or "ollama"
provider = "openai"
model = "gpt-4o-mini"
endpoint = "https://api.openai.com/v1"
# api_key = "sk-..."   # or set COGNITA_API_KEY / OPENAI_API_KEY
temperature = 0.1
max_tokens = 1000
timeout_secs = 60

[extraction]
# Block text beyond this many characters is not sent
max_input_chars = 1000
# Confidence recorded for every extracted unit
unit_confidence = 0.8

[storage]
# data_file = "/home/me/.local/share/cognita/knowledge.json"
# text_root = "/home/me/notes"

[logging]
level = "info"
"#;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chat: ChatConfig,
    pub extraction: ExtractionConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Command-line values, the highest-priority layer
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub provider: Option<LlmProviderType>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub data_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load with precedence `defaults < file < env < overrides`.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> ConfigResult<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env();
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// `<config dir>/cognita/config.toml`
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(defaults::APP_DIR).join(defaults::CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoPlatformDir("config"))
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = lookup(ENV_CHAT_PROVIDER).and_then(|p| p.parse().ok()) {
            self.chat.provider = provider;
        }
        if let Some(model) = lookup(ENV_CHAT_MODEL) {
            self.chat.model = Some(model);
        }
        if let Some(endpoint) = lookup(ENV_CHAT_ENDPOINT) {
            self.chat.endpoint = Some(endpoint);
        }
        if let Some(key) = lookup(ENV_API_KEY).or_else(|| lookup(ENV_OPENAI_API_KEY)) {
            self.chat.api_key = Some(key);
        }
        if let Some(path) = lookup(ENV_DATA_FILE) {
            self.storage.data_file = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.logging.level = level;
        }
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(provider) = overrides.provider {
            self.chat.provider = provider;
        }
        if let Some(model) = &overrides.model {
            self.chat.model = Some(model.clone());
        }
        if let Some(endpoint) = &overrides.endpoint {
            self.chat.endpoint = Some(endpoint.clone());
        }
        if let Some(path) = &overrides.data_file {
            self.storage.data_file = Some(path.clone());
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let temperature = self.chat.temperature();
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid(format!(
                "chat.temperature must be between 0.0 and 2.0, got {temperature}"
            )));
        }
        if self.chat.max_tokens() == 0 {
            return Err(ConfigError::Invalid(
                "chat.max_tokens must be positive".to_string(),
            ));
        }
        if self.extraction.max_input_chars == 0 {
            return Err(ConfigError::Invalid(
                "extraction.max_input_chars must be positive".to_string(),
            ));
        }
        let confidence = self.extraction.unit_confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ConfigError::Invalid(format!(
                "extraction.unit_confidence must be between 0 and 1, got {confidence}"
            )));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Commented example configuration
    pub fn example() -> &'static str {
        EXAMPLE_CONFIG
    }

    /// Write the example configuration, refusing to overwrite an existing file
    pub fn write_example(path: &Path) -> ConfigResult<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if path.exists() {
            return Err(ConfigError::Invalid(format!(
                "{} already exists",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, EXAMPLE_CONFIG).map_err(io_err)
    }
}
