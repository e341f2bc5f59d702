//! Knowledge Base
//!
//! Canonical store of deduplicated knowledge units. A unit's identity is its
//! normalized title plus kind; repeat sightings of the same identity are
//! merged into the existing unit instead of creating a new one.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::learner::LearnerStateTracker;
use crate::traits::UnitStore;
use crate::types::{
    Atom, BlockId, IdGenerator, KnowledgeUnit, UnitId, UnitIdentity, UnitKind,
};

/// Result of [`KnowledgeBase::upsert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub unit_id: UnitId,
    /// `true` if a new unit (and its learner state) was created
    pub created: bool,
}

pub struct KnowledgeBase {
    units: Arc<dyn UnitStore>,
    tracker: Arc<LearnerStateTracker>,
    ids: Arc<dyn IdGenerator>,
    // find-then-create must be atomic or two sightings could both create
    upsert_lock: Mutex<()>,
}

impl KnowledgeBase {
    pub fn new(
        units: Arc<dyn UnitStore>,
        tracker: Arc<LearnerStateTracker>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            units,
            tracker,
            ids,
            upsert_lock: Mutex::new(()),
        }
    }

    pub fn tracker(&self) -> &Arc<LearnerStateTracker> {
        &self.tracker
    }

    /// Insert or merge an atom seen in `block_id`.
    ///
    /// New units get a fresh learner state before this returns. Existing
    /// units take the non-empty description, gain the block as a source
    /// and keep the higher confidence; a merged unit that lacks a state
    /// gets one.
    pub async fn upsert(
        &self,
        atom: &Atom,
        block_id: &BlockId,
        confidence: f64,
    ) -> CoreResult<UpsertOutcome> {
        let title = atom.title.trim();
        if title.is_empty() {
            return Err(CoreError::InvalidInput(
                "knowledge unit title must not be empty".to_string(),
            ));
        }
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };

        let _guard = self.upsert_lock.lock().await;

        if let Some(mut unit) = self.units.find_unit(&atom.identity()).await? {
            unit.merge_sighting(&atom.description, block_id, confidence);
            let unit_id = unit.id.clone();
            self.units.put_unit(unit).await?;
            // an earlier create may have stored the unit but failed on its state
            if self.tracker.state_for(&unit_id).await?.is_none() {
                warn!(unit_id = %unit_id, "Unit had no knowledge state, creating one");
                self.tracker.initialize(&unit_id).await?;
            }
            debug!(unit_id = %unit_id, block_id = %block_id, "Merged sighting into unit");
            return Ok(UpsertOutcome {
                unit_id,
                created: false,
            });
        }

        let unit = KnowledgeUnit {
            id: UnitId::generate(self.ids.as_ref()),
            title: title.to_string(),
            kind: atom.kind,
            description: atom.description.trim().to_string(),
            source_block_ids: vec![block_id.clone()],
            confidence,
        };
        let unit_id = unit.id.clone();
        self.units.put_unit(unit).await?;
        self.tracker.initialize(&unit_id).await?;

        info!(unit_id = %unit_id, title = %title, kind = %atom.kind, "Created knowledge unit");
        Ok(UpsertOutcome {
            unit_id,
            created: true,
        })
    }

    pub async fn get(&self, unit_id: &UnitId) -> CoreResult<Option<KnowledgeUnit>> {
        self.units.get_unit(unit_id).await
    }

    pub async fn list(&self) -> CoreResult<Vec<KnowledgeUnit>> {
        self.units.list_units().await
    }

    /// Look a unit up by title (case and surrounding whitespace ignored) and kind
    pub async fn find(&self, title: &str, kind: UnitKind) -> CoreResult<Option<KnowledgeUnit>> {
        self.units.find_unit(&UnitIdentity::new(title, kind)).await
    }

    /// Units sourced from at least one of the given blocks, in store order
    pub async fn units_for_blocks(&self, blocks: &[BlockId]) -> CoreResult<Vec<KnowledgeUnit>> {
        let units = self.units.list_units().await?;
        Ok(units
            .into_iter()
            .filter(|unit| unit.sourced_from_any(blocks))
            .collect())
    }
}
