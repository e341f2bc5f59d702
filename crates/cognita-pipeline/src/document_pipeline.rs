//! Document Pipeline Orchestrator
//!
//! ## Processing phases
//!
//! 1. **Load**: document record and its raw text (`NotFound` if either is missing)
//! 2. **Segment**: split the text into blocks and persist them, reusing blocks
//!    from an earlier run with the same kind and range
//! 3. **Extract + Upsert**: one extraction call per block, in order; every atom
//!    goes through the knowledge base
//! 4. **Finish**: mark the document processed
//!
//! Extraction failures are block-scoped: the block contributes zero atoms and
//! is counted in [`ProcessingSummary::failed_blocks`]. Cancellation is checked
//! before each block; a cancelled run leaves the document `raw` and can be
//! re-run safely.

use cognita_core::traits::{AtomExtractor, BlockStore, DocumentStore, KnowledgeStore, TextSource};
use cognita_core::types::{
    AvatarStats, BlockId, Document, DocumentId, IdGenerator, KnowledgeStatus, LearningAction,
    SemanticBlock, UnitId, UnitKind, UserKnowledgeState,
};
use cognita_core::{CoreError, KnowledgeBase, LearnerStateTracker};
use cognita_parser::{excerpt, segment, DEFAULT_EXCERPT_CHARS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, PipelineResult};

/// Confidence recorded for units found by the extractor
pub const DEFAULT_UNIT_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub unit_confidence: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            unit_confidence: DEFAULT_UNIT_CONFIDENCE,
        }
    }
}

/// Outcome of one `process_document` run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    /// Blocks visited, including those whose extraction failed
    pub blocks_processed: usize,
    /// Upserts performed (new units plus merges into existing ones)
    pub units_created_or_updated: usize,
    pub units_created: usize,
    pub failed_blocks: usize,
}

/// A unit to quiz on, with the learner's current standing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    pub unit_id: UnitId,
    pub title: String,
    pub kind: UnitKind,
    pub description: String,
    pub status: KnowledgeStatus,
    pub level: f64,
}

pub struct DocumentPipeline {
    documents: Arc<dyn DocumentStore>,
    blocks: Arc<dyn BlockStore>,
    knowledge: Arc<KnowledgeBase>,
    text_source: Arc<dyn TextSource>,
    extractor: Arc<dyn AtomExtractor>,
    ids: Arc<dyn IdGenerator>,
    config: PipelineConfig,
}

impl DocumentPipeline {
    /// Create a pipeline with dependencies (uses default config)
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        blocks: Arc<dyn BlockStore>,
        knowledge: Arc<KnowledgeBase>,
        text_source: Arc<dyn TextSource>,
        extractor: Arc<dyn AtomExtractor>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self::with_config(
            documents,
            blocks,
            knowledge,
            text_source,
            extractor,
            ids,
            PipelineConfig::default(),
        )
    }

    pub fn with_config(
        documents: Arc<dyn DocumentStore>,
        blocks: Arc<dyn BlockStore>,
        knowledge: Arc<KnowledgeBase>,
        text_source: Arc<dyn TextSource>,
        extractor: Arc<dyn AtomExtractor>,
        ids: Arc<dyn IdGenerator>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            documents,
            blocks,
            knowledge,
            text_source,
            extractor,
            ids,
            config,
        }
    }

    /// Wire every repository to one store and build the knowledge base and
    /// tracker on top of it
    pub fn from_store<S>(
        store: Arc<S>,
        text_source: Arc<dyn TextSource>,
        extractor: Arc<dyn AtomExtractor>,
        ids: Arc<dyn IdGenerator>,
        config: PipelineConfig,
    ) -> Self
    where
        S: KnowledgeStore + 'static,
    {
        let tracker = Arc::new(LearnerStateTracker::new(
            store.clone(),
            store.clone(),
            ids.clone(),
        ));
        let knowledge = Arc::new(KnowledgeBase::new(store.clone(), tracker, ids.clone()));
        Self::with_config(
            store.clone(),
            store,
            knowledge,
            text_source,
            extractor,
            ids,
            config,
        )
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge
    }

    fn tracker(&self) -> &Arc<LearnerStateTracker> {
        self.knowledge.tracker()
    }

    /// Register a text source as a new `raw` document
    pub async fn register_document(
        &self,
        name: impl Into<String>,
        source_ref: impl Into<String>,
    ) -> PipelineResult<Document> {
        let document = Document::new(
            DocumentId::generate(self.ids.as_ref()),
            name,
            source_ref,
        );
        self.documents.put_document(document.clone()).await?;
        info!(document_id = %document.id, source_ref = %document.source_ref, "Registered document");
        Ok(document)
    }

    pub async fn list_documents(&self) -> PipelineResult<Vec<Document>> {
        Ok(self.documents.list_documents().await?)
    }

    pub async fn process_document(&self, document_id: &DocumentId) -> PipelineResult<ProcessingSummary> {
        self.process_document_with_cancel(document_id, &CancellationToken::new())
            .await
    }

    /// Run the full pipeline over one document, stopping between blocks if
    /// `cancel` fires
    pub async fn process_document_with_cancel(
        &self,
        document_id: &DocumentId,
        cancel: &CancellationToken,
    ) -> PipelineResult<ProcessingSummary> {
        let start = std::time::Instant::now();

        // Load
        let mut document = self.load_document(document_id).await?;
        let text = self
            .text_source
            .get_document_text(&document.source_ref)
            .await?
            .ok_or_else(|| CoreError::not_found("document text", &document.source_ref))?;
        info!(document_id = %document_id, chars = text.chars().count(), "Processing document");

        // Segment
        let blocks = self.persist_blocks(document_id, &text).await?;
        debug!(document_id = %document_id, blocks = blocks.len(), "Segmented document");

        // Extract + Upsert
        let mut summary = ProcessingSummary::default();
        for (block, block_text) in &blocks {
            if cancel.is_cancelled() {
                warn!(
                    document_id = %document_id,
                    blocks_processed = summary.blocks_processed,
                    "Processing cancelled, document left raw"
                );
                return Err(PipelineError::Cancelled {
                    document_id: document_id.clone(),
                    blocks_processed: summary.blocks_processed,
                });
            }

            summary.blocks_processed += 1;
            let atoms = match self.extractor.extract(block_text, block.kind).await {
                Ok(atoms) => atoms,
                Err(e) => {
                    warn!(block_id = %block.id, error = %e, "Extraction failed, skipping block");
                    summary.failed_blocks += 1;
                    continue;
                }
            };

            for atom in &atoms {
                match self
                    .knowledge
                    .upsert(atom, &block.id, self.config.unit_confidence)
                    .await
                {
                    Ok(outcome) => {
                        summary.units_created_or_updated += 1;
                        if outcome.created {
                            summary.units_created += 1;
                        }
                    }
                    Err(CoreError::InvalidInput(reason)) => {
                        warn!(block_id = %block.id, %reason, "Skipping invalid atom");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            debug!(block_id = %block.id, atoms = atoms.len(), "Block processed");
        }

        // Finish
        document.mark_processed();
        self.documents.put_document(document).await?;

        info!(
            document_id = %document_id,
            blocks = summary.blocks_processed,
            units = summary.units_created_or_updated,
            created = summary.units_created,
            failed = summary.failed_blocks,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Document processed"
        );
        Ok(summary)
    }

    async fn load_document(&self, document_id: &DocumentId) -> PipelineResult<Document> {
        self.documents
            .get_document(document_id)
            .await?
            .ok_or_else(|| CoreError::not_found("document", document_id).into())
    }

    /// Persist the document's blocks, reusing identical ones from earlier runs
    async fn persist_blocks(
        &self,
        document_id: &DocumentId,
        text: &str,
    ) -> PipelineResult<Vec<(SemanticBlock, String)>> {
        let existing = self.blocks.blocks_for_document(document_id).await?;
        let mut blocks = Vec::new();

        for seg in segment(text) {
            let reused = existing
                .iter()
                .find(|b| b.same_span(document_id, seg.kind, seg.range))
                .cloned();

            let block = match reused {
                Some(block) => block,
                None => {
                    let block = SemanticBlock {
                        id: BlockId::generate(self.ids.as_ref()),
                        document_id: document_id.clone(),
                        kind: seg.kind,
                        range: seg.range,
                        excerpt: excerpt(&seg.text, DEFAULT_EXCERPT_CHARS),
                    };
                    self.blocks.put_block(block.clone()).await?;
                    block
                }
            };
            blocks.push((block, seg.text));
        }

        Ok(blocks)
    }

    /// Units sourced from the document's blocks, minus ignored ones
    pub async fn get_quiz_set(&self, document_id: &DocumentId) -> PipelineResult<Vec<QuizItem>> {
        self.load_document(document_id).await?;

        let block_ids: Vec<BlockId> = self
            .blocks
            .blocks_for_document(document_id)
            .await?
            .into_iter()
            .map(|b| b.id)
            .collect();
        let units = self.knowledge.units_for_blocks(&block_ids).await?;

        let mut items = Vec::with_capacity(units.len());
        for unit in units {
            let (status, level) = match self.tracker().state_for(&unit.id).await? {
                Some(state) => (state.status, state.level),
                None => (KnowledgeStatus::Unknown, 0.0),
            };
            if status == KnowledgeStatus::Ignored {
                continue;
            }
            items.push(QuizItem {
                unit_id: unit.id,
                title: unit.title,
                kind: unit.kind,
                description: unit.description,
                status,
                level,
            });
        }

        debug!(document_id = %document_id, items = items.len(), "Built quiz set");
        Ok(items)
    }

    pub async fn record_quiz_answer(
        &self,
        unit_id: &UnitId,
        correct: bool,
    ) -> PipelineResult<UserKnowledgeState> {
        self.record_action(unit_id, LearningAction::from_quiz(correct), None)
            .await
    }

    pub async fn record_action(
        &self,
        unit_id: &UnitId,
        action: LearningAction,
        explicit_level: Option<f64>,
    ) -> PipelineResult<UserKnowledgeState> {
        Ok(self.tracker().apply(unit_id, action, explicit_level).await?)
    }

    pub async fn mute(&self, unit_id: &UnitId) -> PipelineResult<UserKnowledgeState> {
        Ok(self.tracker().mute(unit_id).await?)
    }

    pub async fn ignore(&self, unit_id: &UnitId) -> PipelineResult<UserKnowledgeState> {
        Ok(self.tracker().ignore(unit_id).await?)
    }

    pub async fn restore(&self, unit_id: &UnitId) -> PipelineResult<UserKnowledgeState> {
        Ok(self.tracker().restore(unit_id).await?)
    }

    pub async fn get_avatar_stats(&self) -> PipelineResult<AvatarStats> {
        Ok(self.tracker().avatar_stats().await?)
    }
}
