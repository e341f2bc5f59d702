//! Text source implementations

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::traits::TextSource;

/// Largest file [`FsTextSource`] will read
pub const DEFAULT_MAX_SOURCE_BYTES: u64 = 2 * 1024 * 1024;

/// Text kept in a map, keyed by source reference
#[derive(Debug, Default)]
pub struct InMemoryTextSource {
    texts: RwLock<HashMap<String, String>>,
}

impl InMemoryTextSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the text behind `source_ref`
    pub fn insert(&self, source_ref: impl Into<String>, text: impl Into<String>) {
        self.texts.write().insert(source_ref.into(), text.into());
    }

    pub fn remove(&self, source_ref: &str) {
        self.texts.write().remove(source_ref);
    }
}

#[async_trait]
impl TextSource for InMemoryTextSource {
    async fn get_document_text(&self, source_ref: &str) -> CoreResult<Option<String>> {
        Ok(self.texts.read().get(source_ref).cloned())
    }
}

/// Reads documents from the filesystem
///
/// Relative references are resolved against `root` when one is set.
#[derive(Debug, Clone)]
pub struct FsTextSource {
    root: Option<PathBuf>,
    max_bytes: u64,
}

impl Default for FsTextSource {
    fn default() -> Self {
        Self {
            root: None,
            max_bytes: DEFAULT_MAX_SOURCE_BYTES,
        }
    }
}

impl FsTextSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn resolve(&self, source_ref: &str) -> PathBuf {
        let path = Path::new(source_ref);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl TextSource for FsTextSource {
    async fn get_document_text(&self, source_ref: &str) -> CoreResult<Option<String>> {
        let path = self.resolve(source_ref);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Source file missing");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if !metadata.is_file() {
            return Ok(None);
        }

        if metadata.len() > self.max_bytes {
            return Err(CoreError::InvalidInput(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                metadata.len(),
                self.max_bytes
            )));
        }

        let text = tokio::fs::read_to_string(&path).await?;
        Ok(Some(text))
    }
}
