//! Write-through JSON snapshot store
//!
//! All collections live in one JSON document. Reads are served from memory.
//! Every mutating call writes the updated snapshot (temp file + rename) and
//! only then swaps it into memory, so a failed write leaves the store
//! exactly as it was.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::{InMemoryStore, KnowledgeSnapshot};
use crate::error::{CoreError, CoreResult};
use crate::traits::{BlockStore, DocumentStore, StateStore, UnitStore};
use crate::types::{
    Document, DocumentId, KnowledgeUnit, SemanticBlock, UnitId, UnitIdentity,
    UserKnowledgeState,
};

pub struct JsonFileStore {
    path: PathBuf,
    cache: InMemoryStore,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let snapshot = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => KnowledgeSnapshot::default(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                CoreError::Serialization(format!("failed to load {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot on disk, starting empty");
                KnowledgeSnapshot::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            cache: InMemoryStore::from_snapshot(snapshot),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of everything currently stored
    pub fn snapshot(&self) -> KnowledgeSnapshot {
        self.cache.snapshot()
    }

    /// Apply `change` to a copy of the data, write it, then publish it
    async fn commit(
        &self,
        change: impl FnOnce(&mut KnowledgeSnapshot) + Send,
    ) -> CoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut next = self.cache.snapshot();
        change(&mut next);
        self.write_snapshot(&next).await?;
        self.cache.replace(next);
        Ok(())
    }

    async fn write_snapshot(&self, snapshot: &KnowledgeSnapshot) -> CoreResult<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = json.len(), "Snapshot written");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get_document(&self, id: &DocumentId) -> CoreResult<Option<Document>> {
        self.cache.get_document(id).await
    }

    async fn put_document(&self, document: Document) -> CoreResult<()> {
        self.commit(|data| data.upsert_document(document)).await
    }

    async fn list_documents(&self) -> CoreResult<Vec<Document>> {
        self.cache.list_documents().await
    }
}

#[async_trait]
impl BlockStore for JsonFileStore {
    async fn put_block(&self, block: SemanticBlock) -> CoreResult<()> {
        self.commit(|data| data.upsert_block(block)).await
    }

    async fn blocks_for_document(
        &self,
        document_id: &DocumentId,
    ) -> CoreResult<Vec<SemanticBlock>> {
        self.cache.blocks_for_document(document_id).await
    }
}

#[async_trait]
impl UnitStore for JsonFileStore {
    async fn get_unit(&self, id: &UnitId) -> CoreResult<Option<KnowledgeUnit>> {
        self.cache.get_unit(id).await
    }

    async fn find_unit(&self, identity: &UnitIdentity) -> CoreResult<Option<KnowledgeUnit>> {
        self.cache.find_unit(identity).await
    }

    async fn put_unit(&self, unit: KnowledgeUnit) -> CoreResult<()> {
        self.commit(|data| data.upsert_unit(unit)).await
    }

    async fn list_units(&self) -> CoreResult<Vec<KnowledgeUnit>> {
        self.cache.list_units().await
    }

    async fn count_units(&self) -> CoreResult<usize> {
        self.cache.count_units().await
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn state_for_unit(&self, unit_id: &UnitId) -> CoreResult<Option<UserKnowledgeState>> {
        self.cache.state_for_unit(unit_id).await
    }

    async fn put_state(&self, state: UserKnowledgeState) -> CoreResult<()> {
        self.commit(|data| data.upsert_state(state)).await
    }

    async fn list_states(&self) -> CoreResult<Vec<UserKnowledgeState>> {
        self.cache.list_states().await
    }
}
