//! Human-readable and JSON output

use anyhow::Result;
use cognita_core::types::{AvatarStats, Document, UserKnowledgeState};
use cognita_parser::Segment;
use cognita_pipeline::{ProcessingSummary, QuizItem};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as pretty JSON, or the text `human` renders for it
    pub fn emit<T: Serialize + ?Sized>(
        &self,
        value: &T,
        human: impl FnOnce(&T) -> String,
    ) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", human(value));
        }
        Ok(())
    }
}

pub fn format_document(doc: &Document) -> String {
    format!(
        "{}  {:<9}  {}  ({})",
        doc.id,
        doc.status.to_string(),
        doc.name,
        doc.source_ref
    )
}

pub fn format_documents(docs: &[Document]) -> String {
    if docs.is_empty() {
        return "No documents registered.".to_string();
    }
    docs.iter().map(format_document).collect::<Vec<_>>().join("\n")
}

pub fn format_segments(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "No blocks.".to_string();
    }
    segments
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            format!(
                "[{}] {:<9} {}..{}  {}",
                i + 1,
                seg.kind.to_string(),
                seg.range.start,
                seg.range.end,
                cognita_parser::excerpt(&seg.text, 60).replace('\n', " ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_summary(summary: &ProcessingSummary) -> String {
    format!(
        "Processed {} blocks: {} units created or updated ({} new), {} blocks failed",
        summary.blocks_processed,
        summary.units_created_or_updated,
        summary.units_created,
        summary.failed_blocks
    )
}

pub fn format_quiz(items: &[QuizItem]) -> String {
    if items.is_empty() {
        return "Nothing to quiz on.".to_string();
    }
    items
        .iter()
        .map(|item| {
            let mut line = format!(
                "{}  [{}] {}  ({}, {:.2})",
                item.unit_id, item.kind, item.title, item.status, item.level
            );
            if !item.description.is_empty() {
                line.push_str("\n    ");
                line.push_str(&item.description);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_state(state: &UserKnowledgeState) -> String {
    format!("{}: {} ({:.2})", state.unit_id, state.status, state.level)
}

pub fn format_stats(stats: &AvatarStats) -> String {
    format!(
        "Units: {}\nMastered: {}\nAverage level: {:.2}",
        stats.total_units, stats.mastered_units, stats.average_level
    )
}
