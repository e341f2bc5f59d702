//! Cognita core
//!
//! Domain model and the two stateful services of the knowledge pipeline:
//! the [`KnowledgeBase`] (deduplicated knowledge units) and the
//! [`LearnerStateTracker`] (per-unit mastery). Persistence, raw text access
//! and language-model calls sit behind traits so infrastructure crates can
//! plug in their own implementations.

pub mod error;
pub mod knowledge;
pub mod learner;
pub mod storage;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
pub mod traits;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use knowledge::{KnowledgeBase, UpsertOutcome};
pub use learner::{clamp_level, transition, LearnerStateTracker, StatusOverride};

// Re-export core traits (abstractions for dependency inversion)
pub use traits::{
    AtomExtractor, BlockStore, DocumentStore, ExtractionError, KnowledgeStore, LlmError,
    LlmResult, ReasoningRequest, ReasoningService, StateStore, TextSource, UnitStore,
};

pub use types::{
    Atom, AvatarStats, BlockId, BlockKind, Document, DocumentId, DocumentStatus, HistoryAction,
    HistoryEntry, IdGenerator, KnowledgeStatus, KnowledgeUnit, LearningAction, SemanticBlock,
    SequentialIdGenerator, StateId, TextRange, UnitId, UnitIdentity, UnitKind,
    UserKnowledgeState, UuidIdGenerator,
};
