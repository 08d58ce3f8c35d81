//! Configuration loading for the Duet server.
//!
//! Precedence, highest first: command-line arguments, the `PORT`
//! environment variable (listen port only), the TOML configuration file,
//! built-in defaults.

pub mod args;
pub mod settings;

pub use args::Args;
pub use settings::{Config, LoggingSettings, ServerSettings, StorySettings};

use std::net::SocketAddr;

use tracing::{info, warn};

use crate::error::ServerError;

/// Load configuration from file or create a default configuration file.
pub async fn load_config(args: &Args) -> Result<Config, ServerError> {
    if args.config.exists() {
        let config_str = tokio::fs::read_to_string(&args.config)
            .await
            .map_err(|e| {
                ServerError::Config(format!(
                    "failed to read config file {}: {}",
                    args.config.display(),
                    e
                ))
            })?;
        match toml::de::from_str::<Config>(&config_str) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Failed to parse config file {}: {}", args.config.display(), e);
                Err(ServerError::Config(format!(
                    "failed to parse config file {}: {}",
                    args.config.display(),
                    e
                )))
            }
        }
    } else {
        warn!(
            "Configuration file not found: {}, using defaults",
            args.config.display()
        );

        let default_config = Config::default();
        let config_str = toml::to_string_pretty(&default_config)
            .map_err(|e| ServerError::Config(e.to_string()))?;
        tokio::fs::write(&args.config, config_str).await.map_err(|e| {
            ServerError::Config(format!(
                "failed to write default config file {}: {}",
                args.config.display(),
                e
            ))
        })?;
        info!("Created default configuration file: {}", args.config.display());

        Ok(default_config)
    }
}

/// Read the `PORT` environment variable, the deployment-level port
/// override. Non-numeric values are logged and ignored.
pub fn port_from_env() -> Option<u16> {
    let port = std::env::var("PORT").ok()?;
    match port.parse() {
        Ok(port) => Some(port),
        Err(_) => {
            warn!("Ignoring non-numeric PORT value: {}", port);
            None
        }
    }
}

/// Resolve the final listen address. The CLI flag wins outright; the
/// port override (from the environment) then applies on top of the
/// configured address.
pub fn resolve_listen_addr(
    config: &Config,
    args: &Args,
    port_override: Option<u16>,
) -> Result<SocketAddr, ServerError> {
    if let Some(listen) = &args.listen {
        return listen
            .parse()
            .map_err(|e| ServerError::Config(format!("failed to parse --listen address: {e}")));
    }

    let mut addr: SocketAddr = config.server.listen_addr.parse().map_err(|e| {
        ServerError::Config(format!("failed to parse configured listen address: {e}"))
    })?;

    if let Some(port) = port_override {
        addr.set_port(port);
    }

    Ok(addr)
}
