//! Integration tests for DocumentPipeline
//!
//! End-to-end runs over in-memory stores with a scripted extractor, plus one
//! run over the JSON file store and filesystem text source.

mod common;

use async_trait::async_trait;
use cognita_core::storage::{FsTextSource, InMemoryStore, JsonFileStore};
use cognita_core::test_support::ScriptedExtractor;
use cognita_core::traits::{BlockStore, DocumentStore, StateStore, UnitStore};
use cognita_core::{
    BlockKind, CoreError, CoreResult, Document, DocumentId, DocumentStatus,
    IdGenerator, KnowledgeStatus, KnowledgeUnit, LearningAction, SemanticBlock,
    SequentialIdGenerator, UnitId, UnitIdentity, UnitKind, UserKnowledgeState,
};
use cognita_pipeline::{DocumentPipeline, PipelineConfig, PipelineError, ProcessingSummary};
use common::*;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

async fn registered(h: &Harness) -> Document {
    h.texts.insert("bio.md", SAMPLE_TEXT);
    h.pipeline
        .register_document("Biology", "bio.md")
        .await
        .unwrap()
}

// ============================================================================
// Processing
// ============================================================================

#[tokio::test]
async fn test_process_document_end_to_end() {
    let h = harness(photosynthesis_extractor());
    let doc = registered(&h).await;
    assert_eq!(doc.status, DocumentStatus::Raw);

    let summary = h.pipeline.process_document(&doc.id).await.unwrap();
    assert_eq!(
        summary,
        ProcessingSummary {
            blocks_processed: 2,
            units_created_or_updated: 3,
            units_created: 2,
            failed_blocks: 0,
        }
    );

    let blocks = h.store.blocks_for_document(&doc.id).await.unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].kind, BlockKind::Header);
    assert_eq!(blocks[0].excerpt, HEADER_BLOCK);
    assert_eq!(blocks[1].kind, BlockKind::Paragraph);

    let unit = h
        .store
        .find_unit(&UnitIdentity::new("photosynthesis", UnitKind::Concept))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        unit.source_block_ids,
        vec![blocks[0].id.clone(), blocks[1].id.clone()]
    );
    assert_eq!(unit.description, "Plants turn light into sugar");
    assert_eq!(unit.confidence, 0.8);

    assert_eq!(h.store.list_states().await.unwrap().len(), 2);
    let stored = h.store.get_document(&doc.id).await.unwrap().unwrap();
    assert!(stored.is_processed());

    assert_eq!(h.extractor.seen_texts(), vec![HEADER_BLOCK, PARAGRAPH_BLOCK]);
    assert_eq!(
        h.extractor.seen_kinds(),
        vec![BlockKind::Header, BlockKind::Paragraph]
    );
}

#[tokio::test]
async fn test_reprocessing_is_idempotent() {
    let h = harness(photosynthesis_extractor());
    let doc = registered(&h).await;

    h.pipeline.process_document(&doc.id).await.unwrap();
    let blocks_before = h.store.blocks_for_document(&doc.id).await.unwrap();

    let second = h.pipeline.process_document(&doc.id).await.unwrap();
    assert_eq!(second.units_created, 0);
    assert_eq!(second.units_created_or_updated, 3);

    let blocks_after = h.store.blocks_for_document(&doc.id).await.unwrap();
    assert_eq!(blocks_before, blocks_after);
    assert_eq!(h.store.list_units().await.unwrap().len(), 2);
    assert_eq!(h.store.list_states().await.unwrap().len(), 2);

    for unit in h.store.list_units().await.unwrap() {
        let mut ids = unit.source_block_ids.clone();
        ids.dedup();
        assert_eq!(ids, unit.source_block_ids);
    }
}

#[tokio::test]
async fn test_extraction_failure_is_block_scoped() {
    let extractor = photosynthesis_extractor().failing_on(HEADER_BLOCK);
    let h = harness(extractor);
    let doc = registered(&h).await;

    let summary = h.pipeline.process_document(&doc.id).await.unwrap();
    assert_eq!(summary.blocks_processed, 2);
    assert_eq!(summary.failed_blocks, 1);
    assert_eq!(summary.units_created, 2);

    let stored = h.store.get_document(&doc.id).await.unwrap().unwrap();
    assert!(stored.is_processed());
}

#[tokio::test]
async fn test_every_block_failing_still_returns_summary() {
    let h = harness(ScriptedExtractor::new().failing_always());
    let doc = registered(&h).await;

    let summary = h.pipeline.process_document(&doc.id).await.unwrap();
    assert_eq!(summary.blocks_processed, 2);
    assert_eq!(summary.failed_blocks, 2);
    assert_eq!(summary.units_created_or_updated, 0);
    assert!(h.store.list_units().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_document_is_processed_with_no_blocks() {
    let h = harness(ScriptedExtractor::new());
    h.texts.insert("empty.md", "\n\n");
    let doc = h
        .pipeline
        .register_document("Empty", "empty.md")
        .await
        .unwrap();

    let summary = h.pipeline.process_document(&doc.id).await.unwrap();
    assert_eq!(summary, ProcessingSummary::default());
    assert!(h
        .store
        .get_document(&doc.id)
        .await
        .unwrap()
        .unwrap()
        .is_processed());
}

#[tokio::test]
async fn test_missing_document_and_text_are_not_found() {
    let h = harness(ScriptedExtractor::new());

    let err = h
        .pipeline
        .process_document(&DocumentId::new("doc_missing"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let doc = h
        .pipeline
        .register_document("Ghost", "nowhere.md")
        .await
        .unwrap();
    let err = h.pipeline.process_document(&doc.id).await.unwrap_err();
    assert!(err.is_not_found());

    let stored = h.store.get_document(&doc.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DocumentStatus::Raw);
    assert_eq!(h.extractor.stats().calls, 0);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancelled_before_first_block() {
    let h = harness(photosynthesis_extractor());
    let doc = registered(&h).await;

    let token = CancellationToken::new();
    token.cancel();

    let err = h
        .pipeline
        .process_document_with_cancel(&doc.id, &token)
        .await
        .unwrap_err();
    match err {
        PipelineError::Cancelled {
            document_id,
            blocks_processed,
        } => {
            assert_eq!(document_id, doc.id);
            assert_eq!(blocks_processed, 0);
        }
        other => panic!("expected Cancelled, got {other:?}"),
    }
    assert_eq!(h.extractor.stats().calls, 0);
}

#[tokio::test]
async fn test_cancelled_mid_run_can_be_rerun() {
    let token = CancellationToken::new();
    let trigger = token.clone();
    let extractor = photosynthesis_extractor().on_call(move |call| {
        if call == 1 {
            trigger.cancel();
        }
    });
    let h = harness(extractor);
    let doc = registered(&h).await;

    let err = h
        .pipeline
        .process_document_with_cancel(&doc.id, &token)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
    assert!(matches!(
        err,
        PipelineError::Cancelled {
            blocks_processed: 1,
            ..
        }
    ));

    let stored = h.store.get_document(&doc.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DocumentStatus::Raw);
    assert_eq!(h.store.list_units().await.unwrap().len(), 1);

    let summary = h.pipeline.process_document(&doc.id).await.unwrap();
    assert_eq!(summary.blocks_processed, 2);
    assert_eq!(summary.units_created, 1);
    assert_eq!(h.store.list_units().await.unwrap().len(), 2);
    assert_eq!(h.store.list_states().await.unwrap().len(), 2);
}

// ============================================================================
// Quiz and learner actions
// ============================================================================

#[tokio::test]
async fn test_quiz_set_excludes_ignored_units() {
    let h = harness(photosynthesis_extractor());
    let doc = registered(&h).await;
    h.pipeline.process_document(&doc.id).await.unwrap();

    let quiz = h.pipeline.get_quiz_set(&doc.id).await.unwrap();
    assert_eq!(quiz.len(), 2);
    assert!(quiz.iter().all(|item| item.status == KnowledgeStatus::Unknown));

    let ignored = quiz[0].unit_id.clone();
    let muted = quiz[1].unit_id.clone();
    h.pipeline.ignore(&ignored).await.unwrap();
    h.pipeline.mute(&muted).await.unwrap();

    let quiz = h.pipeline.get_quiz_set(&doc.id).await.unwrap();
    assert_eq!(quiz.len(), 1);
    assert_eq!(quiz[0].unit_id, muted);
    assert_eq!(quiz[0].status, KnowledgeStatus::Muted);

    h.pipeline.restore(&ignored).await.unwrap();
    assert_eq!(h.pipeline.get_quiz_set(&doc.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_quiz_set_only_covers_the_document() {
    let h = harness(
        photosynthesis_extractor().with_atoms("Mitosis splits cells.", vec![concept("Mitosis", "")]),
    );
    let biology = registered(&h).await;
    h.texts.insert("cells.md", "Mitosis splits cells.");
    let cells = h
        .pipeline
        .register_document("Cells", "cells.md")
        .await
        .unwrap();

    h.pipeline.process_document(&biology.id).await.unwrap();
    h.pipeline.process_document(&cells.id).await.unwrap();

    let quiz = h.pipeline.get_quiz_set(&cells.id).await.unwrap();
    let titles: Vec<&str> = quiz.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(titles, vec!["Mitosis"]);

    let err = h
        .pipeline
        .get_quiz_set(&DocumentId::new("doc_missing"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_quiz_answers_drive_state() {
    let h = harness(photosynthesis_extractor());
    let doc = registered(&h).await;
    h.pipeline.process_document(&doc.id).await.unwrap();
    let unit_id = h.pipeline.get_quiz_set(&doc.id).await.unwrap()[0]
        .unit_id
        .clone();

    h.pipeline
        .record_action(&unit_id, LearningAction::Read, None)
        .await
        .unwrap();
    h.pipeline.record_quiz_answer(&unit_id, true).await.unwrap();
    let state = h.pipeline.record_quiz_answer(&unit_id, true).await.unwrap();
    assert_eq!(state.level, 0.4);
    assert_eq!(state.status, KnowledgeStatus::Learning);

    let state = h.pipeline.record_quiz_answer(&unit_id, false).await.unwrap();
    assert_eq!(state.level, 0.35);

    let err = h
        .pipeline
        .record_quiz_answer(&UnitId::new("unit_missing"), true)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_avatar_stats() {
    let h = harness(photosynthesis_extractor());
    let doc = registered(&h).await;
    h.pipeline.process_document(&doc.id).await.unwrap();

    let empty = h.pipeline.get_avatar_stats().await.unwrap();
    assert_eq!(empty.total_units, 2);
    assert_eq!(empty.mastered_units, 0);
    assert_eq!(empty.average_level, 0.0);

    let unit_id = h.pipeline.get_quiz_set(&doc.id).await.unwrap()[0]
        .unit_id
        .clone();
    h.pipeline
        .record_action(&unit_id, LearningAction::Mastered, None)
        .await
        .unwrap();

    let stats = h.pipeline.get_avatar_stats().await.unwrap();
    assert_eq!(stats.mastered_units, 1);
    assert_eq!(stats.average_level, 0.5);
}

// ============================================================================
// Store failures
// ============================================================================

/// Store whose unit writes always fail
struct ReadOnlyUnits {
    inner: InMemoryStore,
}

#[async_trait]
impl DocumentStore for ReadOnlyUnits {
    async fn get_document(&self, id: &DocumentId) -> CoreResult<Option<Document>> {
        self.inner.get_document(id).await
    }
    async fn put_document(&self, document: Document) -> CoreResult<()> {
        self.inner.put_document(document).await
    }
    async fn list_documents(&self) -> CoreResult<Vec<Document>> {
        self.inner.list_documents().await
    }
}

#[async_trait]
impl BlockStore for ReadOnlyUnits {
    async fn put_block(&self, block: SemanticBlock) -> CoreResult<()> {
        self.inner.put_block(block).await
    }
    async fn blocks_for_document(&self, id: &DocumentId) -> CoreResult<Vec<SemanticBlock>> {
        self.inner.blocks_for_document(id).await
    }
}

#[async_trait]
impl UnitStore for ReadOnlyUnits {
    async fn get_unit(&self, id: &UnitId) -> CoreResult<Option<KnowledgeUnit>> {
        self.inner.get_unit(id).await
    }
    async fn find_unit(&self, identity: &UnitIdentity) -> CoreResult<Option<KnowledgeUnit>> {
        self.inner.find_unit(identity).await
    }
    async fn put_unit(&self, _unit: KnowledgeUnit) -> CoreResult<()> {
        Err(CoreError::Storage("disk full".to_string()))
    }
    async fn list_units(&self) -> CoreResult<Vec<KnowledgeUnit>> {
        self.inner.list_units().await
    }
}

#[async_trait]
impl StateStore for ReadOnlyUnits {
    async fn state_for_unit(&self, unit_id: &UnitId) -> CoreResult<Option<UserKnowledgeState>> {
        self.inner.state_for_unit(unit_id).await
    }
    async fn put_state(&self, state: UserKnowledgeState) -> CoreResult<()> {
        self.inner.put_state(state).await
    }
    async fn list_states(&self) -> CoreResult<Vec<UserKnowledgeState>> {
        self.inner.list_states().await
    }
}

#[tokio::test]
async fn test_store_failure_aborts_processing() {
    let store = Arc::new(ReadOnlyUnits {
        inner: InMemoryStore::new(),
    });
    let texts = Arc::new(cognita_core::storage::InMemoryTextSource::new());
    texts.insert("bio.md", SAMPLE_TEXT);
    let pipeline = DocumentPipeline::from_store(
        store.clone(),
        texts,
        Arc::new(photosynthesis_extractor()),
        Arc::new(SequentialIdGenerator::new()),
        PipelineConfig::default(),
    );

    let doc = pipeline.register_document("Biology", "bio.md").await.unwrap();
    let err = pipeline.process_document(&doc.id).await.unwrap_err();
    assert!(matches!(err, PipelineError::Core(CoreError::Storage(_))));

    let stored = store.get_document(&doc.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DocumentStatus::Raw);
}

// ============================================================================
// Persistent stack
// ============================================================================

#[tokio::test]
async fn test_json_store_and_filesystem_source() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes");
    std::fs::create_dir_all(&notes).unwrap();
    std::fs::write(notes.join("bio.md"), SAMPLE_TEXT).unwrap();
    let data_file = dir.path().join("data").join("knowledge.json");

    let doc_id = {
        let store = Arc::new(JsonFileStore::open(&data_file).await.unwrap());
        let ids: Arc<dyn IdGenerator> = Arc::new(SequentialIdGenerator::new());
        let pipeline = DocumentPipeline::from_store(
            store,
            Arc::new(FsTextSource::new().with_root(&notes)),
            Arc::new(photosynthesis_extractor()),
            ids,
            PipelineConfig {
                unit_confidence: 0.6,
            },
        );
        let doc = pipeline.register_document("Biology", "bio.md").await.unwrap();
        pipeline.process_document(&doc.id).await.unwrap();
        doc.id
    };

    let reopened = JsonFileStore::open(&data_file).await.unwrap();
    let doc = reopened.get_document(&doc_id).await.unwrap().unwrap();
    assert!(doc.is_processed());
    let units = reopened.list_units().await.unwrap();
    assert_eq!(units.len(), 2);
    assert!(units.iter().all(|u| u.confidence == 0.6));
    assert_eq!(reopened.list_states().await.unwrap().len(), 2);
}
