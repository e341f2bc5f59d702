//! Extraction tuning

use serde::{Deserialize, Serialize};

use crate::defaults;

/// `[extraction]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub max_input_chars: usize,
    pub unit_confidence: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_input_chars: defaults::DEFAULT_MAX_INPUT_CHARS,
            unit_confidence: defaults::DEFAULT_UNIT_CONFIDENCE,
        }
    }
}
