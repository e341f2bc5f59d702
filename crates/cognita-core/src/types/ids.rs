//! Strongly typed identifiers and id generation
//!
//! Every entity id is a newtype over `String` so a `BlockId` can never be
//! passed where a `UnitId` is expected. Ids are minted by an injected
//! [`IdGenerator`]; tests use [`SequentialIdGenerator`] for deterministic
//! output, persistent stores use [`UuidIdGenerator`] so ids stay unique across
//! process restarts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix used when minting new ids of this kind
            pub const PREFIX: &'static str = $prefix;

            /// Wrap an existing id string
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Mint a fresh id from the generator
            pub fn generate(ids: &dyn IdGenerator) -> Self {
                Self(ids.next_id(Self::PREFIX))
            }

            /// Borrow the raw id string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a registered [`Document`](super::Document)
    DocumentId,
    "doc"
);
define_id!(
    /// Identifier of a [`SemanticBlock`](super::SemanticBlock)
    BlockId,
    "sb"
);
define_id!(
    /// Identifier of a [`KnowledgeUnit`](super::KnowledgeUnit)
    UnitId,
    "unit"
);
define_id!(
    /// Identifier of a [`UserKnowledgeState`](super::UserKnowledgeState)
    StateId,
    "uks"
);

/// Strategy for minting entity ids
pub trait IdGenerator: Send + Sync {
    /// Produce a new id string starting with `prefix`
    fn next_id(&self, prefix: &str) -> String;
}

/// Monotonic counter ids (`unit_1`, `unit_2`, ...)
///
/// Deterministic, which makes it the generator of choice in tests. The
/// counter is shared across prefixes and lives only in memory.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator starting at 1
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}_{}", prefix, n)
    }
}

/// Random v4 UUID ids (`unit_6f1c...`)
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
    }
}
