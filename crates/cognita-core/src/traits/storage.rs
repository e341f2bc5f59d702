//! Repository traits, one per entity collection
//!
//! The core never talks to a concrete database. The orchestrator is handed
//! implementations of these traits (in-memory for tests, a JSON snapshot
//! file for the CLI) and every mutating call is expected to be durable by
//! the time it returns.
//!
//! `put` is always an upsert keyed by the entity id.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{
    Document, DocumentId, KnowledgeUnit, SemanticBlock, UnitId, UnitIdentity,
    UserKnowledgeState,
};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_document(&self, id: &DocumentId) -> CoreResult<Option<Document>>;

    async fn put_document(&self, document: Document) -> CoreResult<()>;

    /// All documents, in insertion order
    async fn list_documents(&self) -> CoreResult<Vec<Document>>;
}

#[async_trait]
pub trait BlockStore: Send + Sync {
    async fn put_block(&self, block: SemanticBlock) -> CoreResult<()>;

    /// Blocks of one document, in insertion order
    async fn blocks_for_document(&self, document_id: &DocumentId)
        -> CoreResult<Vec<SemanticBlock>>;
}

#[async_trait]
pub trait UnitStore: Send + Sync {
    async fn get_unit(&self, id: &UnitId) -> CoreResult<Option<KnowledgeUnit>>;

    /// Look a unit up by its deduplication identity
    async fn find_unit(&self, identity: &UnitIdentity) -> CoreResult<Option<KnowledgeUnit>>;

    async fn put_unit(&self, unit: KnowledgeUnit) -> CoreResult<()>;

    /// All units, in insertion order
    async fn list_units(&self) -> CoreResult<Vec<KnowledgeUnit>>;

    async fn count_units(&self) -> CoreResult<usize> {
        Ok(self.list_units().await?.len())
    }
}

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn state_for_unit(&self, unit_id: &UnitId) -> CoreResult<Option<UserKnowledgeState>>;

    async fn put_state(&self, state: UserKnowledgeState) -> CoreResult<()>;

    /// All states, in insertion order
    async fn list_states(&self) -> CoreResult<Vec<UserKnowledgeState>>;
}

/// Convenience bound for a backend that stores every collection
pub trait KnowledgeStore: DocumentStore + BlockStore + UnitStore + StateStore {}

impl<T> KnowledgeStore for T where T: DocumentStore + BlockStore + UnitStore + StateStore {}
