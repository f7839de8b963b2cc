//! tube-relay server binary
//!
//! Resolves configuration, wires the production extractor into the router
//! and serves the HTTP API until Ctrl+C.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use tube_relay::core::ytdl::RustyExtractor;
use tube_relay::utils::logging::init_tracing;
use tube_relay::{router, AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    info!("🚀 Starting tube-relay v{}", tube_relay::VERSION);

    let config = load_or_initialize_config();

    // Environment overrides keep the on-disk config intact for local runs.
    let port = std::env::var("TUBE_RELAY_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let host: IpAddr = match std::env::var("TUBE_RELAY_HOST") {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .context("TUBE_RELAY_HOST must be a valid IPv4 or IPv6 address")?,
        _ => config
            .server
            .host
            .parse()
            .context("server.host must be a valid IPv4 or IPv6 address")?,
    };

    // The download directory exists for the whole process lifetime; the
    // relay itself only streams through it.
    std::fs::create_dir_all(&config.download.output_directory).with_context(|| {
        format!(
            "Failed to create download directory: {}",
            config.download.output_directory
        )
    })?;
    info!("📁 Download directory: {}", config.download.output_directory);

    let extractor = RustyExtractor::new(&config.download)
        .map_err(|e| anyhow::anyhow!("Failed to build extractor: {e}"))?;

    let state = AppState {
        extractor: Arc::new(extractor),
        config: Arc::new(config),
    };
    let app = router(state);

    let addr = SocketAddr::new(host, port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("🌐 tube-relay listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running API server")?;

    info!("🔚 tube-relay stopped");
    Ok(())
}

fn load_or_initialize_config() -> AppConfig {
    match AppConfig::load() {
        Ok(config) => {
            if let Err(err) = config.validate() {
                warn!(
                    "Invalid configuration detected ({}), falling back to defaults",
                    err
                );
                AppConfig::default()
            } else {
                config
            }
        }
        Err(err) => {
            warn!(
                "Failed to load configuration from disk: {}. Using defaults",
                err
            );
            AppConfig::default()
        }
    }
}

async fn shutdown_signal() {
    // Graceful shutdown is best effort; the process still terminates when
    // Ctrl+C fires even if the handler cannot be installed.
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", err);
    }
}
