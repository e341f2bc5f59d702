//! Core traits (abstractions for dependency inversion)
//!
//! Core defines the seams, infrastructure crates implement them:
//! - storage: [`DocumentStore`], [`BlockStore`], [`UnitStore`], [`StateStore`]
//! - raw text: [`TextSource`]
//! - reasoning service: [`ReasoningService`] (implemented in `cognita-llm`)
//! - extraction: [`AtomExtractor`] (implemented in `cognita-llm`)

pub mod extraction;
pub mod llm;
pub mod source;
pub mod storage;

pub use extraction::{AtomExtractor, ExtractionError};
pub use llm::{LlmError, LlmResult, ReasoningRequest, ReasoningService};
pub use source::TextSource;
pub use storage::{BlockStore, DocumentStore, KnowledgeStore, StateStore, UnitStore};
