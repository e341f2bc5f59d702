//! Raw-text source abstraction

use async_trait::async_trait;

use crate::error::CoreResult;

/// Provides the raw text behind a document's `source_ref`
///
/// `Ok(None)` means the reference resolves to nothing; the orchestrator
/// turns that into a `NotFound` error.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn get_document_text(&self, source_ref: &str) -> CoreResult<Option<String>>;
}
