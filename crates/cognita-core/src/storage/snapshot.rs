//! Serializable snapshot of every collection
//!
//! This is the on-disk shape of the JSON store and the in-memory shape of
//! [`InMemoryStore`](super::InMemoryStore). Collections are kept as vectors
//! so iteration follows insertion order. Missing collections default to
//! empty on load.

use serde::{Deserialize, Serialize};

use crate::types::{
    Document, DocumentId, KnowledgeUnit, SemanticBlock, UnitId, UnitIdentity,
    UserKnowledgeState,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSnapshot {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub semantic_blocks: Vec<SemanticBlock>,
    #[serde(default)]
    pub knowledge_units: Vec<KnowledgeUnit>,
    #[serde(default)]
    pub user_knowledge_states: Vec<UserKnowledgeState>,
}

/// Replace the element matching `same` or append it
fn upsert_by<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T, &T) -> bool) {
    match items.iter_mut().find(|existing| same(existing, &item)) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

impl KnowledgeSnapshot {
    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == id)
    }

    pub fn upsert_document(&mut self, document: Document) {
        upsert_by(&mut self.documents, document, |a, b| a.id == b.id);
    }

    pub fn upsert_block(&mut self, block: SemanticBlock) {
        upsert_by(&mut self.semantic_blocks, block, |a, b| a.id == b.id);
    }

    pub fn blocks_for_document(&self, document_id: &DocumentId) -> Vec<SemanticBlock> {
        self.semantic_blocks
            .iter()
            .filter(|b| &b.document_id == document_id)
            .cloned()
            .collect()
    }

    pub fn unit(&self, id: &UnitId) -> Option<&KnowledgeUnit> {
        self.knowledge_units.iter().find(|u| &u.id == id)
    }

    pub fn unit_by_identity(&self, identity: &UnitIdentity) -> Option<&KnowledgeUnit> {
        self.knowledge_units
            .iter()
            .find(|u| &u.identity() == identity)
    }

    pub fn upsert_unit(&mut self, unit: KnowledgeUnit) {
        upsert_by(&mut self.knowledge_units, unit, |a, b| a.id == b.id);
    }

    pub fn state_for_unit(&self, unit_id: &UnitId) -> Option<&UserKnowledgeState> {
        self.user_knowledge_states
            .iter()
            .find(|s| &s.unit_id == unit_id)
    }

    /// States are keyed by unit: at most one state per unit is ever stored
    pub fn upsert_state(&mut self, state: UserKnowledgeState) {
        upsert_by(&mut self.user_knowledge_states, state, |a, b| {
            a.unit_id == b.unit_id
        });
    }
}
