//! Derailed Gateway Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p derailed-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use derailed_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Gateway failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.gateway.port,
        heartbeat_min_ms = config.heartbeat.min_interval_ms,
        heartbeat_max_ms = config.heartbeat.max_interval_ms,
        "Configuration loaded"
    );

    derailed_gateway::run(config).await?;

    Ok(())
}
