use anyhow::Result;
use cognita_core::types::{DocumentId, LearningAction, UnitId};

use crate::context::AppContext;
use crate::output::{self, Output};

pub async fn quiz(ctx: &AppContext, document_id: &str, out: Output) -> Result<()> {
    let items = ctx
        .pipeline
        .get_quiz_set(&DocumentId::new(document_id))
        .await?;
    out.emit(items.as_slice(), output::format_quiz)
}

pub async fn answer(ctx: &AppContext, unit_id: &str, correct: bool, out: Output) -> Result<()> {
    let state = ctx
        .pipeline
        .record_quiz_answer(&UnitId::new(unit_id), correct)
        .await?;
    out.emit(&state, output::format_state)
}

pub async fn mark(
    ctx: &AppContext,
    unit_id: &str,
    action: LearningAction,
    level: Option<f64>,
    out: Output,
) -> Result<()> {
    let state = ctx
        .pipeline
        .record_action(&UnitId::new(unit_id), action, level)
        .await?;
    out.emit(&state, output::format_state)
}

pub async fn mute(ctx: &AppContext, unit_id: &str, out: Output) -> Result<()> {
    let state = ctx.pipeline.mute(&UnitId::new(unit_id)).await?;
    out.emit(&state, output::format_state)
}

pub async fn ignore(ctx: &AppContext, unit_id: &str, out: Output) -> Result<()> {
    let state = ctx.pipeline.ignore(&UnitId::new(unit_id)).await?;
    out.emit(&state, output::format_state)
}

pub async fn restore(ctx: &AppContext, unit_id: &str, out: Output) -> Result<()> {
    let state = ctx.pipeline.restore(&UnitId::new(unit_id)).await?;
    out.emit(&state, output::format_state)
}

pub async fn stats(ctx: &AppContext, out: Output) -> Result<()> {
    let stats = ctx.pipeline.get_avatar_stats().await?;
    out.emit(&stats, output::format_stats)
}
