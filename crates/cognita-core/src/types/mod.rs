//! Domain types shared by every Cognita crate

pub mod document;
pub mod ids;
pub mod knowledge;
pub mod learner;

pub use document::{BlockKind, Document, DocumentStatus, SemanticBlock, TextRange};
pub use ids::{
    BlockId, DocumentId, IdGenerator, SequentialIdGenerator, StateId, UnitId, UuidIdGenerator,
};
pub use knowledge::{normalize_title, Atom, KnowledgeUnit, UnitIdentity, UnitKind};
pub use learner::{
    AvatarStats, HistoryAction, HistoryEntry, KnowledgeStatus, LearningAction,
    UserKnowledgeState,
};
