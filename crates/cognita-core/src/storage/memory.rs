//! In-memory store implementing every repository trait

use async_trait::async_trait;
use parking_lot::RwLock;

use super::KnowledgeSnapshot;
use crate::error::CoreResult;
use crate::traits::{BlockStore, DocumentStore, StateStore, UnitStore};
use crate::types::{
    Document, DocumentId, KnowledgeUnit, SemanticBlock, UnitId, UnitIdentity,
    UserKnowledgeState,
};

/// Volatile store, used in tests and as the cache behind
/// [`JsonFileStore`](super::JsonFileStore)
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<KnowledgeSnapshot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously saved data
    pub fn from_snapshot(snapshot: KnowledgeSnapshot) -> Self {
        Self {
            data: RwLock::new(snapshot),
        }
    }

    /// Copy of everything currently stored
    pub fn snapshot(&self) -> KnowledgeSnapshot {
        self.data.read().clone()
    }

    /// Swap in a complete snapshot
    pub fn replace(&self, snapshot: KnowledgeSnapshot) {
        *self.data.write() = snapshot;
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_document(&self, id: &DocumentId) -> CoreResult<Option<Document>> {
        Ok(self.data.read().document(id).cloned())
    }

    async fn put_document(&self, document: Document) -> CoreResult<()> {
        self.data.write().upsert_document(document);
        Ok(())
    }

    async fn list_documents(&self) -> CoreResult<Vec<Document>> {
        Ok(self.data.read().documents.clone())
    }
}

#[async_trait]
impl BlockStore for InMemoryStore {
    async fn put_block(&self, block: SemanticBlock) -> CoreResult<()> {
        self.data.write().upsert_block(block);
        Ok(())
    }

    async fn blocks_for_document(
        &self,
        document_id: &DocumentId,
    ) -> CoreResult<Vec<SemanticBlock>> {
        Ok(self.data.read().blocks_for_document(document_id))
    }
}

#[async_trait]
impl UnitStore for InMemoryStore {
    async fn get_unit(&self, id: &UnitId) -> CoreResult<Option<KnowledgeUnit>> {
        Ok(self.data.read().unit(id).cloned())
    }

    async fn find_unit(&self, identity: &UnitIdentity) -> CoreResult<Option<KnowledgeUnit>> {
        Ok(self.data.read().unit_by_identity(identity).cloned())
    }

    async fn put_unit(&self, unit: KnowledgeUnit) -> CoreResult<()> {
        self.data.write().upsert_unit(unit);
        Ok(())
    }

    async fn list_units(&self) -> CoreResult<Vec<KnowledgeUnit>> {
        Ok(self.data.read().knowledge_units.clone())
    }

    async fn count_units(&self) -> CoreResult<usize> {
        Ok(self.data.read().knowledge_units.len())
    }
}

#[async_trait]
impl StateStore for InMemoryStore {
    async fn state_for_unit(&self, unit_id: &UnitId) -> CoreResult<Option<UserKnowledgeState>> {
        Ok(self.data.read().state_for_unit(unit_id).cloned())
    }

    async fn put_state(&self, state: UserKnowledgeState) -> CoreResult<()> {
        self.data.write().upsert_state(state);
        Ok(())
    }

    async fn list_states(&self) -> CoreResult<Vec<UserKnowledgeState>> {
        Ok(self.data.read().user_knowledge_states.clone())
    }
}
