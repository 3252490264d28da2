//! Soz Ledger webhook receiver.
//!
//! Loads configuration, then serves the signed-delivery endpoint until
//! Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use soz_ledger::config::{config_from_env, load_config};
use soz_ledger::observability::{logging, metrics};
use soz_ledger::receiver::{shutdown_signal, LoggingHandler, WebhookReceiver};

#[derive(Parser)]
#[command(name = "soz-ledger")]
#[command(about = "Webhook receiver for the Soz Ledger", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => config_from_env(|key| std::env::var(key).ok())?,
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("soz-ledger v{} starting", env!("CARGO_PKG_VERSION"));

    if config.receiver.secret.is_empty() {
        tracing::error!(
            "No webhook secret configured; set receiver.secret or {}",
            soz_ledger::config::loader::WEBHOOK_SECRET_ENV
        );
        return Err("webhook secret is required".into());
    }

    tracing::info!(
        bind_address = %config.receiver.bind_address,
        path = %config.receiver.path,
        max_body_bytes = config.receiver.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Already checked by validation.
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics exporter");
        }
    }

    let listener = TcpListener::bind(&config.receiver.bind_address).await?;
    WebhookReceiver::new(&config.receiver, LoggingHandler)
        .run(listener, shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
