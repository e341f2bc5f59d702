//! Application wiring: config in, ready-to-use pipeline out

use anyhow::{Context, Result};
use async_trait::async_trait;
use cognita_config::Config;
use cognita_core::storage::{FsTextSource, JsonFileStore};
use cognita_core::traits::{AtomExtractor, ExtractionError, LlmError, TextSource};
use cognita_core::types::{Atom, BlockKind, IdGenerator, UuidIdGenerator};
use cognita_llm::{create_reasoning_service, ExtractionClient};
use cognita_pipeline::{DocumentPipeline, PipelineConfig};
use std::sync::Arc;
use tracing::debug;

/// Stand-in extractor for commands that never call the reasoning service.
///
/// Lets `quiz`, `stats` and friends run without an API key.
struct OfflineExtractor;

#[async_trait]
impl AtomExtractor for OfflineExtractor {
    async fn extract(&self, _text: &str, _kind: BlockKind) -> Result<Vec<Atom>, ExtractionError> {
        Err(ExtractionError::Service(LlmError::ConfigError(
            "reasoning service is not configured for this command".to_string(),
        )))
    }
}

pub struct AppContext {
    pub config: Config,
    pub pipeline: DocumentPipeline,
}

impl AppContext {
    /// Open the knowledge store; the reasoning service is only built when
    /// `with_extractor` is set
    pub async fn open(config: Config, with_extractor: bool) -> Result<Self> {
        let data_file = config.storage.data_file()?;
        debug!(path = %data_file.display(), "Opening knowledge store");
        let store = Arc::new(
            JsonFileStore::open(data_file.clone())
                .await
                .with_context(|| format!("failed to open {}", data_file.display()))?,
        );

        let extractor: Arc<dyn AtomExtractor> = if with_extractor {
            let service = create_reasoning_service(&config.chat)
                .context("failed to set up the reasoning service")?;
            debug!(
                provider = service.provider_name(),
                model = service.model(),
                "Reasoning service ready"
            );
            Arc::new(ExtractionClient::from_config(
                service,
                &config.chat,
                &config.extraction,
            ))
        } else {
            Arc::new(OfflineExtractor)
        };

        let text_source: Arc<dyn TextSource> = Arc::new(match &config.storage.text_root {
            Some(root) => FsTextSource::new().with_root(root),
            None => FsTextSource::new(),
        });
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidIdGenerator);
        let pipeline_config = PipelineConfig {
            unit_confidence: config.extraction.unit_confidence,
        };

        let pipeline =
            DocumentPipeline::from_store(store, text_source, extractor, ids, pipeline_config);
        Ok(Self { config, pipeline })
    }
}
