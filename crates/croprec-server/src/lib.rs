//! croprec Server
//!
//! Serves a pre-trained crop recommendation model over HTTP.
//!
//! The model artifact is loaded exactly once, before the listener is bound.
//! A process that cannot load its model never accepts a connection.

pub mod cli;
pub mod config;
pub mod routes;
pub mod service;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

pub use cli::Cli;
pub use config::{ServerConfig, DEFAULT_CONFIG_PATH};
pub use routes::{create_router, AppState, BatchPredictionResponse, PredictionResponse};
pub use service::PredictionService;

/// Load the model named by `config` and build the router around it
pub fn build_app(config: &ServerConfig) -> Result<Router> {
    let service = PredictionService::load(&config.model_path)
        .with_context(|| format!("cannot serve without model {}", config.model_path.display()))?;

    Ok(create_router(AppState::new(service), config.max_body_bytes))
}

/// Load the model, bind, and serve until a shutdown signal arrives
pub async fn run(config: ServerConfig) -> Result<()> {
    let addr = config.socket_addr()?;

    // Model first: a broken artifact must fail before the port is bound
    let app = build_app(&config)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("croprec listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, stopping server...");
}

/// Initialize tracing/logging
pub fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("croprec=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("croprec=info,tower_http=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
