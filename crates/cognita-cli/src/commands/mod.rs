pub mod documents;
pub mod init_config;
pub mod learning;
pub mod segment;

use anyhow::Result;
use cognita_config::Config;
use std::path::Path;

use crate::cli::Commands;
use crate::context::AppContext;
use crate::output::Output;

/// Dispatch a parsed command.
///
/// Only `process` builds the reasoning service; every other command works
/// offline against the knowledge store.
pub async fn run(
    command: Commands,
    config: Config,
    config_path: Option<&Path>,
    out: Output,
) -> Result<()> {
    match command {
        Commands::InitConfig => init_config::execute(config_path),
        Commands::Segment { path } => segment::execute(&path, out).await,
        Commands::Process { document_id } => {
            let ctx = AppContext::open(config, true).await?;
            documents::process(&ctx, &document_id, out).await?;
            Ok(())
        }
        Commands::Add { path, name } => {
            let ctx = AppContext::open(config, false).await?;
            documents::add(&ctx, &path, name, out).await?;
            Ok(())
        }
        Commands::Docs => {
            let ctx = AppContext::open(config, false).await?;
            documents::list(&ctx, out).await
        }
        Commands::Quiz { document_id } => {
            let ctx = AppContext::open(config, false).await?;
            learning::quiz(&ctx, &document_id, out).await
        }
        Commands::Answer {
            unit_id, correct, ..
        } => {
            let ctx = AppContext::open(config, false).await?;
            learning::answer(&ctx, &unit_id, correct, out).await
        }
        Commands::Mark {
            unit_id,
            action,
            level,
        } => {
            let ctx = AppContext::open(config, false).await?;
            learning::mark(&ctx, &unit_id, action.into(), level, out).await
        }
        Commands::Mute { unit_id } => {
            let ctx = AppContext::open(config, false).await?;
            learning::mute(&ctx, &unit_id, out).await
        }
        Commands::Ignore { unit_id } => {
            let ctx = AppContext::open(config, false).await?;
            learning::ignore(&ctx, &unit_id, out).await
        }
        Commands::Restore { unit_id } => {
            let ctx = AppContext::open(config, false).await?;
            learning::restore(&ctx, &unit_id, out).await
        }
        Commands::Stats => {
            let ctx = AppContext::open(config, false).await?;
            learning::stats(&ctx, out).await
        }
    }
}
