//! Common test utilities for pipeline tests.

#![allow(dead_code)]

use cognita_core::storage::{InMemoryStore, InMemoryTextSource};
use cognita_core::test_support::ScriptedExtractor;
use cognita_core::{Atom, IdGenerator, SequentialIdGenerator, UnitKind};
use cognita_pipeline::{DocumentPipeline, PipelineConfig};
use std::sync::Arc;

pub const SAMPLE_TEXT: &str = "# Title\nBody line.\n\nSecond paragraph.";
pub const HEADER_BLOCK: &str = "# Title\nBody line.";
pub const PARAGRAPH_BLOCK: &str = "Second paragraph.";

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub texts: Arc<InMemoryTextSource>,
    pub extractor: ScriptedExtractor,
    pub pipeline: DocumentPipeline,
}

pub fn harness(extractor: ScriptedExtractor) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let texts = Arc::new(InMemoryTextSource::new());
    let ids: Arc<dyn IdGenerator> = Arc::new(SequentialIdGenerator::new());
    let pipeline = DocumentPipeline::from_store(
        store.clone(),
        texts.clone(),
        Arc::new(extractor.clone()),
        ids,
        PipelineConfig::default(),
    );
    Harness {
        store,
        texts,
        extractor,
        pipeline,
    }
}

pub fn concept(title: &str, description: &str) -> Atom {
    Atom::new(title, UnitKind::Concept, description)
}

/// Extractor that finds "Photosynthesis" in both blocks of [`SAMPLE_TEXT`],
/// spelled differently each time
pub fn photosynthesis_extractor() -> ScriptedExtractor {
    ScriptedExtractor::new()
        .with_atoms(
            HEADER_BLOCK,
            vec![concept("Photosynthesis", "Plants turn light into sugar")],
        )
        .with_atoms(
            PARAGRAPH_BLOCK,
            vec![
                concept("photosynthesis", ""),
                Atom::new("Chlorophyll is green", UnitKind::Fact, "Absorbs red and blue"),
            ],
        )
}
