//! Atom extraction abstraction

use async_trait::async_trait;
use thiserror::Error;

use super::llm::LlmError;
use crate::types::{Atom, BlockKind};

/// Block-local extraction failure
///
/// Never fatal: the orchestrator counts it and carries on with zero atoms
/// for the block.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    /// Network, timeout or non-success status from the reasoning service
    #[error("reasoning service failed: {0}")]
    Service(#[from] LlmError),

    /// The response did not contain the begin/end marker pair
    #[error("response is missing the payload markers")]
    MissingMarkers,

    /// The text between the markers is not a valid atoms payload
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Turns one block of text into knowledge atoms
#[async_trait]
pub trait AtomExtractor: Send + Sync {
    async fn extract(&self, text: &str, block_kind: BlockKind)
        -> Result<Vec<Atom>, ExtractionError>;
}
