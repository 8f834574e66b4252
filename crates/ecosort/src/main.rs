//! ecosort backend - Entry Point
//!
//! Serves live waste-sorter state read from the shared realtime database.

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use ecosort::config::DEFAULT_CONFIG_PATH;

/// ecosort backend
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ECOSORT_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Interface to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    ecosort_telemetry::init_logging()?;

    info!("Starting ecosort v{}", env!("CARGO_PKG_VERSION"));

    // CLI arg > ECOSORT_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("ECOSORT_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    info!(config_path = %config_path, "Loading configuration");

    let mut config = ecosort::AppConfig::load(Some(Path::new(&config_path)))?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!(
        bind = %config.server.bind_address(),
        database_configured = config.effective_database_url().is_some(),
        "Configuration loaded"
    );

    let app = ecosort::Application::connect(config).await;
    app.run().await?;

    Ok(())
}
