//! Pipeline Orchestration Layer
//!
//! Composes the Cognita building blocks into the operations a front end
//! needs:
//!
//! ```text
//! DocumentPipeline
//!   ├─> TextSource        raw text for a document
//!   ├─> cognita-parser    text → semantic blocks
//!   ├─> AtomExtractor     block → knowledge atoms
//!   ├─> KnowledgeBase     atoms → deduplicated units (+ initial learner state)
//!   └─> LearnerStateTracker  quiz answers and user actions
//! ```
//!
//! Infrastructure crates do not orchestrate; this crate does.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cognita_pipeline::{DocumentPipeline, PipelineConfig};
//!
//! let pipeline = DocumentPipeline::from_store(store, text_source, extractor, ids, PipelineConfig::default());
//! let document = pipeline.register_document("Biology", "notes/biology.md").await?;
//! let summary = pipeline.process_document(&document.id).await?;
//! ```

pub mod document_pipeline;
pub mod error;

pub use document_pipeline::{DocumentPipeline, PipelineConfig, ProcessingSummary, QuizItem};
pub use error::{PipelineError, PipelineResult};
