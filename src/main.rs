use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vinca_api::app;
use vinca_api::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "vinca-api")]
#[command(about = "Vinca personal vault API server")]
#[command(version)]
struct Args {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Fail when the config file does not exist
    #[arg(long)]
    require_config: bool,

    /// Listen address, overriding the config file
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, VINCA_LISTEN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load(&args.config, args.require_config)?;
    if let Some(listen) = args.listen {
        config.listen = listen;
    }

    let app = app::build(&config).await.context("failed to initialize storage")?;
    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;

    app::serve(listener, app, app::shutdown_signal()).await?;
    Ok(())
}
