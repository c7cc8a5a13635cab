//! Serve command implementation
//!
//! This module implements the `serve` command, which runs the HTTP API until a
//! shutdown signal arrives.

use crate::config::load_config_or_default;
use crate::server;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the bind host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting serve command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Some(host) = &self.host {
            tracing::info!(host = %host, "Overriding bind host from CLI");
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            tracing::info!(port, "Overriding bind port from CLI");
            config.server.port = port;
        }

        server::serve(config, shutdown_signal).await?;
        Ok(0)
    }
}
