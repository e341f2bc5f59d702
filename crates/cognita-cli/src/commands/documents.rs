use anyhow::{bail, Context, Result};
use cognita_core::types::{Document, DocumentId};
use cognita_pipeline::ProcessingSummary;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::context::AppContext;
use crate::output::{self, Output};

/// Register a file as a new document.
///
/// Relative paths are kept as given when a text root is configured so the
/// store stays portable with that root; otherwise the path is made absolute.
pub async fn add(
    ctx: &AppContext,
    path: &Path,
    name: Option<String>,
    out: Output,
) -> Result<Document> {
    let source_ref = match &ctx.config.storage.text_root {
        Some(root) if path.is_relative() => {
            ensure_file(&root.join(path)).await?;
            path.to_string_lossy().into_owned()
        }
        _ => {
            ensure_file(path).await?;
            tokio::fs::canonicalize(path)
                .await
                .with_context(|| format!("cannot resolve {}", path.display()))?
                .to_string_lossy()
                .into_owned()
        }
    };

    let name = name.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_ref.clone())
    });

    let document = ctx.pipeline.register_document(name, source_ref).await?;
    out.emit(&document, output::format_document)?;
    Ok(document)
}

async fn ensure_file(path: &Path) -> Result<()> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a file", path.display());
    }
    Ok(())
}

pub async fn list(ctx: &AppContext, out: Output) -> Result<()> {
    let documents = ctx.pipeline.list_documents().await?;
    out.emit(documents.as_slice(), output::format_documents)
}

/// Process one document; Ctrl-C stops the run between blocks
pub async fn process(
    ctx: &AppContext,
    document_id: &str,
    out: Output,
) -> Result<ProcessingSummary> {
    let document_id = DocumentId::new(document_id);
    let cancel = CancellationToken::new();

    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping after the current block");
                cancel.cancel();
            }
        })
    };

    let result = ctx
        .pipeline
        .process_document_with_cancel(&document_id, &cancel)
        .await;
    watcher.abort();

    let summary = result?;
    out.emit(&summary, output::format_summary)?;
    Ok(summary)
}
