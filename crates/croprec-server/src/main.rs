//! croprec
//!
//! Loads a pre-trained crop recommendation model once and answers
//! `POST /predict` with the recommended crop for the submitted conditions.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use croprec_server::{init_tracing, Cli, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    info!("Starting croprec");

    let config = ServerConfig::load(cli.config.as_deref(), &cli)?;
    info!("Configuration loaded successfully");
    info!("Model: {}", config.model_path.display());
    info!("Listen: {}:{}", config.listen, config.port);

    if let Err(e) = croprec_server::run(config).await {
        error!("croprec failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
