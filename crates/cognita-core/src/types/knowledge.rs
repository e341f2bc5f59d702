//! Knowledge units and the atoms they are built from

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{BlockId, UnitId};

/// What sort of knowledge a unit captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Concept,
    Fact,
    Procedure,
    Relation,
    Example,
}

impl UnitKind {
    pub const ALL: [UnitKind; 5] = [
        UnitKind::Concept,
        UnitKind::Fact,
        UnitKind::Procedure,
        UnitKind::Relation,
        UnitKind::Example,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Concept => "concept",
            UnitKind::Fact => "fact",
            UnitKind::Procedure => "procedure",
            UnitKind::Relation => "relation",
            UnitKind::Example => "example",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitKind {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        UnitKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown unit kind: {}", s))
    }
}

/// A single extracted candidate before deduplication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub title: String,
    pub kind: UnitKind,
    #[serde(default)]
    pub description: String,
}

impl Atom {
    pub fn new(title: impl Into<String>, kind: UnitKind, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            description: description.into(),
        }
    }

    /// Deduplication identity of this atom
    pub fn identity(&self) -> UnitIdentity {
        UnitIdentity::new(&self.title, self.kind)
    }
}

/// Deduplication key: trimmed, case-folded title plus kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitIdentity {
    title: String,
    kind: UnitKind,
}

impl UnitIdentity {
    pub fn new(title: &str, kind: UnitKind) -> Self {
        Self {
            title: normalize_title(title),
            kind,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }
}

/// Trim + case-fold
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Canonical, deduplicated piece of knowledge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeUnit {
    pub id: UnitId,
    pub title: String,
    pub kind: UnitKind,
    #[serde(default)]
    pub description: String,
    /// Blocks that contributed this unit, in discovery order, no duplicates
    #[serde(default)]
    pub source_block_ids: Vec<BlockId>,
    #[serde(default)]
    pub confidence: f64,
}

impl KnowledgeUnit {
    pub fn identity(&self) -> UnitIdentity {
        UnitIdentity::new(&self.title, self.kind)
    }

    /// Whether the unit was seen in any of the given blocks
    pub fn sourced_from_any(&self, blocks: &[BlockId]) -> bool {
        self.source_block_ids.iter().any(|id| blocks.contains(id))
    }

    /// Merge a repeat sighting into this unit.
    ///
    /// - description is replaced only by a non-empty one
    /// - the block id is appended if not already present
    /// - confidence becomes the max of old and new
    pub fn merge_sighting(&mut self, description: &str, block_id: &BlockId, confidence: f64) {
        let description = description.trim();
        if !description.is_empty() {
            self.description = description.to_string();
        }
        if !self.source_block_ids.contains(block_id) {
            self.source_block_ids.push(block_id.clone());
        }
        self.confidence = self.confidence.max(confidence);
    }
}
