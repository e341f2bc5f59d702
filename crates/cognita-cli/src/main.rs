use anyhow::Result;
use clap::Parser;
use cognita_cli::cli::{Cli, Commands};
use cognita_cli::commands;
use cognita_cli::output::Output;
use cognita_config::{Config, ConfigOverrides};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // init-config must work even when --config names a file that does not exist yet
    if matches!(cli.command, Commands::InitConfig) {
        init_logging(cli.log_filter().as_deref().unwrap_or("warn"));
        return commands::init_config::execute(cli.config.as_deref());
    }

    let overrides = ConfigOverrides {
        data_file: cli.data_file.clone(),
        log_level: cli.log_filter(),
        ..Default::default()
    };
    let config = Config::load(cli.config.as_deref(), &overrides)?;
    init_logging(&config.logging.level);

    tracing::debug!(
        provider = %config.chat.provider,
        model = %config.chat.chat_model(),
        "Configuration loaded"
    );

    commands::run(cli.command, config, cli.config.as_deref(), Output::new(cli.json)).await
}

/// Logs go to stderr so `--json` output on stdout stays machine-readable
fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
