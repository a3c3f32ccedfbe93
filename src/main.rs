//! # AttendTrack API Main Entry Point

use std::path::PathBuf;

use anyhow::Context;
use attendtrack::{
    config::ConfigLoader,
    db::{init_pool, run_migrations},
    server::run_server,
    telemetry::init_tracing,
};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "attendtrack", version, about = "Multi-tenant attendance tracking API")]
struct Cli {
    /// Directory searched for `.env` files (defaults to the working directory)
    #[arg(long, value_name = "DIR")]
    env_dir: Option<PathBuf>,

    /// Start without applying pending database migrations
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_loader = match cli.env_dir {
        Some(dir) => ConfigLoader::with_base_dir(dir),
        None => ConfigLoader::new(),
    };
    let config = config_loader
        .load()
        .context("Failed to load configuration")?;

    init_tracing(&config).context("Failed to initialize telemetry")?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let db = init_pool(&config).await?;
    if cli.skip_migrations {
        tracing::warn!("Skipping database migrations");
    } else {
        run_migrations(&db).await?;
    }

    run_server(config, db).await
}
