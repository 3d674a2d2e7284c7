use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "croprec")]
#[command(author, version, about = "Crop recommendation prediction service", long_about = None)]
pub struct Cli {
    /// Configuration file path (must exist when given; defaults to croprec.yaml if present)
    #[arg(short, long, env = "CROPREC_CONFIG")]
    pub config: Option<String>,

    /// Model artifact path
    #[arg(short, long, env = "CROPREC_MODEL")]
    pub model: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'l', long, env = "CROPREC_LISTEN")]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "CROPREC_PORT")]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}
