//! Extraction Client
//!
//! One reasoning request per block. The model is asked to frame a JSON
//! payload between fixed markers:
//!
//! ```text
//! <BEGIN_KNOWLEDGE_JSON>
//! {"atoms": [{"title": "...", "kind": "concept", "description": "..."}]}
//! <END_KNOWLEDGE_JSON>
//! ```
//!
//! Anything outside the markers is ignored. Atoms without a title or with a
//! kind outside [`UnitKind::ALL`] are dropped.

use async_trait::async_trait;
use cognita_config::{ChatConfig, ExtractionConfig};
use cognita_core::traits::{AtomExtractor, ExtractionError, ReasoningRequest, ReasoningService};
use cognita_core::types::{Atom, BlockKind, UnitKind};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const BEGIN_MARKER: &str = "<BEGIN_KNOWLEDGE_JSON>";
pub const END_MARKER: &str = "<END_KNOWLEDGE_JSON>";

const DEFAULT_MAX_INPUT_CHARS: usize = 1000;
const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_MAX_TOKENS: u32 = 1000;

pub struct ExtractionClient {
    service: Arc<dyn ReasoningService>,
    max_input_chars: usize,
    temperature: f32,
    max_tokens: u32,
}

impl ExtractionClient {
    pub fn new(service: Arc<dyn ReasoningService>) -> Self {
        Self {
            service,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn from_config(
        service: Arc<dyn ReasoningService>,
        chat: &ChatConfig,
        extraction: &ExtractionConfig,
    ) -> Self {
        Self::new(service)
            .with_max_input_chars(extraction.max_input_chars)
            .with_temperature(chat.temperature())
            .with_max_tokens(chat.max_tokens())
    }

    #[must_use]
    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_request(&self, text: &str, block_kind: BlockKind) -> ReasoningRequest {
        let user_text = format!("Text: \"{}\"", truncate_chars(text, self.max_input_chars));
        ReasoningRequest::new(system_instruction(block_kind), user_text)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}

fn system_instruction(block_kind: BlockKind) -> String {
    let kinds = UnitKind::ALL
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join("|");
    format!(
        "You are a knowledge analyst. Analyze the text and reply with JSON only.\n\
         Block type: {block_kind}.\n\
         Identify 1-3 knowledge atoms ({kinds}).\n\
         Format:\n\
         {BEGIN_MARKER}\n\
         {{ \"atoms\": [{{ \"title\": \"...\", \"kind\": \"{kinds}\", \"description\": \"...\" }}] }}\n\
         {END_MARKER}"
    )
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

#[derive(Debug, Deserialize)]
struct AtomsPayload {
    #[serde(default)]
    atoms: Option<Vec<RawAtom>>,
}

#[derive(Debug, Deserialize)]
struct RawAtom {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "type")]
    kind: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Pull the atoms out of a raw model reply
pub fn parse_atoms_response(raw: &str) -> Result<Vec<Atom>, ExtractionError> {
    let begin = raw.find(BEGIN_MARKER).ok_or(ExtractionError::MissingMarkers)?;
    let body_start = begin + BEGIN_MARKER.len();
    let body_len = raw[body_start..]
        .find(END_MARKER)
        .ok_or(ExtractionError::MissingMarkers)?;
    let body = raw[body_start..body_start + body_len].trim();

    let payload: AtomsPayload = serde_json::from_str(body)
        .map_err(|e| ExtractionError::MalformedPayload(e.to_string()))?;

    let atoms = payload
        .atoms
        .unwrap_or_default()
        .into_iter()
        .filter_map(|raw_atom| {
            let title = raw_atom.title.unwrap_or_default().trim().to_string();
            if title.is_empty() {
                debug!("Dropping atom without a title");
                return None;
            }
            let kind_text = raw_atom.kind.unwrap_or_default();
            let kind = match kind_text.parse::<UnitKind>() {
                Ok(kind) => kind,
                Err(_) => {
                    debug!(title = %title, kind = %kind_text, "Dropping atom with unknown kind");
                    return None;
                }
            };
            let description = raw_atom.description.unwrap_or_default().trim().to_string();
            Some(Atom::new(title, kind, description))
        })
        .collect();

    Ok(atoms)
}

#[async_trait]
impl AtomExtractor for ExtractionClient {
    async fn extract(
        &self,
        text: &str,
        block_kind: BlockKind,
    ) -> Result<Vec<Atom>, ExtractionError> {
        let request = self.build_request(text, block_kind);
        let raw = self.service.complete(request).await?;
        debug!(
            provider = self.service.provider_name(),
            block_kind = %block_kind,
            reply_chars = raw.len(),
            "Extraction reply received"
        );
        parse_atoms_response(&raw)
    }
}
