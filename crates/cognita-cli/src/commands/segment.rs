use anyhow::{Context, Result};
use std::path::Path;

use crate::output::{self, Output};

/// Preview segmentation of a file without registering it
pub async fn execute(path: &Path, out: Output) -> Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let segments = cognita_parser::segment(&text);
    out.emit(segments.as_slice(), output::format_segments)
}
