//! Server configuration

use croprec_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Configuration file read when none is given explicitly
pub const DEFAULT_CONFIG_PATH: &str = "croprec.yaml";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Model artifact, read once at startup
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides.
    ///
    /// An explicit `config_path` must exist. Without one, [`DEFAULT_CONFIG_PATH`]
    /// is read if present and built-in defaults are used otherwise.
    pub fn load(config_path: Option<&str>, cli: &Cli) -> Result<Self> {
        let file = match config_path {
            Some(path) if !Path::new(path).exists() => {
                return Err(Error::config(format!("configuration file {} not found", path)));
            }
            Some(path) => Some(path),
            None => Some(DEFAULT_CONFIG_PATH).filter(|path| Path::new(path).exists()),
        };

        let mut config = match file {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };

        // Apply CLI overrides
        if let Some(model) = &cli.model {
            config.model_path = model.clone();
        }

        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("invalid configuration file: {}", e)))
    }

    /// Check values the type system does not
    pub fn validate(&self) -> Result<()> {
        if self.max_body_bytes == 0 {
            return Err(Error::config("max_body_bytes must be greater than zero"));
        }
        self.socket_addr().map(|_| ())
    }

    /// Address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.listen, self.port)
            .parse()
            .map_err(|e| {
                Error::config(format!(
                    "invalid listen address {}:{}: {}",
                    self.listen, self.port, e
                ))
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            listen: default_listen(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("crop_recommendation_model.json")
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}
