//! Default values shared by the config components

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Extraction wants near-deterministic output
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Block text beyond this is cut before it reaches the reasoning service
pub const DEFAULT_MAX_INPUT_CHARS: usize = 1000;
/// Confidence assigned to every extracted unit
pub const DEFAULT_UNIT_CONFIDENCE: f64 = 0.8;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const APP_DIR: &str = "cognita";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATA_FILE_NAME: &str = "knowledge.json";
