//! Documents and the semantic blocks they are segmented into

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BlockId, DocumentId};

/// Processing status of a document
///
/// Moves only forward: `Raw` until a processing run completes, then
/// `Processed` for good.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Registered, never fully processed
    #[default]
    Raw,
    /// At least one processing run finished
    Processed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentStatus::Raw => f.write_str("raw"),
            DocumentStatus::Processed => f.write_str("processed"),
        }
    }
}

/// A registered text source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    /// Opaque reference resolved by the text source (a path for `FsTextSource`)
    pub source_ref: String,
    #[serde(default)]
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Create a new raw document
    pub fn new(id: DocumentId, name: impl Into<String>, source_ref: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            source_ref: source_ref.into(),
            status: DocumentStatus::Raw,
            created_at: Utc::now(),
        }
    }

    /// Mark the document processed. Never moves back to raw.
    pub fn mark_processed(&mut self) {
        self.status = DocumentStatus::Processed;
    }

    pub fn is_processed(&self) -> bool {
        self.status == DocumentStatus::Processed
    }
}

/// Kind of a semantic block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Starts with a `#` heading line
    Header,
    /// Plain run of non-blank lines
    Paragraph,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Header => "header",
            BlockKind::Paragraph => "paragraph",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open character interval `[start, end)` into a document's raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of characters covered
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the two ranges share at least one character
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A contiguous span of a document treated as one extraction unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticBlock {
    pub id: BlockId,
    pub document_id: DocumentId,
    pub kind: BlockKind,
    pub range: TextRange,
    /// Bounded preview of the block text
    pub excerpt: String,
}

impl SemanticBlock {
    /// Whether this block covers the same span of the same document
    pub fn same_span(&self, document_id: &DocumentId, kind: BlockKind, range: TextRange) -> bool {
        &self.document_id == document_id && self.kind == kind && self.range == range
    }
}
