//! Pipeline errors

use cognita_core::{CoreError, DocumentId};
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing entity or a store failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Processing stopped between blocks; the document stays `raw`
    #[error("processing of {document_id} cancelled after {blocks_processed} blocks")]
    Cancelled {
        document_id: DocumentId,
        blocks_processed: usize,
    },
}

impl PipelineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PipelineError::Core(e) if e.is_not_found())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PipelineError::Cancelled { .. })
    }
}
