//! Commands against a temporary store, without a reasoning service

use cognita_cli::commands::{documents, learning};
use cognita_cli::context::AppContext;
use cognita_cli::output::Output;
use cognita_config::Config;
use cognita_core::types::DocumentStatus;
use std::path::Path;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.data_file = Some(dir.path().join("knowledge.json"));
    config.storage.text_root = Some(dir.path().to_path_buf());
    config
}

fn write_notes(dir: &TempDir) {
    std::fs::write(
        dir.path().join("notes.md"),
        "# Photosynthesis\nPlants make sugar.\n\nChlorophyll absorbs light.\n",
    )
    .unwrap();
}

#[tokio::test]
async fn test_add_persists_document() {
    let dir = TempDir::new().unwrap();
    write_notes(&dir);

    let ctx = AppContext::open(config_in(&dir), false).await.unwrap();
    let doc = documents::add(&ctx, Path::new("notes.md"), None, Output::new(true))
        .await
        .unwrap();
    assert_eq!(doc.name, "notes");
    assert_eq!(doc.source_ref, "notes.md");
    assert_eq!(doc.status, DocumentStatus::Raw);

    let reopened = AppContext::open(config_in(&dir), false).await.unwrap();
    let docs = reopened.pipeline.list_documents().await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, doc.id);
}

#[tokio::test]
async fn test_add_rejects_missing_file() {
    let dir = TempDir::new().unwrap();
    let ctx = AppContext::open(config_in(&dir), false).await.unwrap();

    let result = documents::add(
        &ctx,
        Path::new("absent.md"),
        Some("x".into()),
        Output::default(),
    )
    .await;
    assert!(result.is_err());
    assert!(ctx.pipeline.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_rejects_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("notes")).unwrap();
    let ctx = AppContext::open(config_in(&dir), false).await.unwrap();

    let result = documents::add(&ctx, Path::new("notes"), None, Output::default()).await;
    assert!(result.is_err());
    assert!(ctx.pipeline.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_absolute_path_is_canonicalized() {
    let dir = TempDir::new().unwrap();
    write_notes(&dir);
    let mut config = config_in(&dir);
    config.storage.text_root = None;
    let ctx = AppContext::open(config, false).await.unwrap();

    let doc = documents::add(
        &ctx,
        &dir.path().join(".").join("notes.md"),
        Some("Notes".to_string()),
        Output::default(),
    )
    .await
    .unwrap();
    let expected = std::fs::canonicalize(dir.path().join("notes.md")).unwrap();
    assert_eq!(doc.source_ref, expected.to_string_lossy());
    assert_eq!(doc.name, "Notes");
}

#[tokio::test]
async fn test_offline_process_fails_every_block() {
    let dir = TempDir::new().unwrap();
    write_notes(&dir);

    let ctx = AppContext::open(config_in(&dir), false).await.unwrap();
    let doc = documents::add(&ctx, Path::new("notes.md"), None, Output::default())
        .await
        .unwrap();
    let summary = documents::process(&ctx, doc.id.as_str(), Output::default())
        .await
        .unwrap();

    assert_eq!(summary.blocks_processed, 2);
    assert_eq!(summary.failed_blocks, 2);
    assert_eq!(summary.units_created, 0);

    learning::quiz(&ctx, doc.id.as_str(), Output::default())
        .await
        .unwrap();
    learning::stats(&ctx, Output::new(true)).await.unwrap();
}

#[tokio::test]
async fn test_unknown_ids_are_errors() {
    let dir = TempDir::new().unwrap();
    let ctx = AppContext::open(config_in(&dir), false).await.unwrap();

    assert!(learning::quiz(&ctx, "doc_missing", Output::default()).await.is_err());
    assert!(learning::answer(&ctx, "unit_missing", true, Output::default())
        .await
        .is_err());
    assert!(learning::mute(&ctx, "unit_missing", Output::default()).await.is_err());
}
