//! Notification relay.
//!
//! Accepts plain-text notifications over HTTP and forwards them to Telegram
//! chats chosen by the sender's routing rule.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────────┐
//!                      │                   NOTIFY RELAY                    │
//!                      │                                                   │
//!   POST /notify       │  ┌─────────┐    ┌─────────┐    ┌──────────────┐   │
//!   ───────────────────┼─▶│  http   │───▶│ routing │───▶│   message    │   │
//!                      │  │ handler │    │  table  │    │  formatter   │   │
//!                      │  └────┬────┘    └─────────┘    └──────────────┘   │
//!   200 / 400 / 503    │       │ try_enqueue (never waits)                 │
//!   ◀──────────────────┼───────┤                                           │
//!                      │       ▼                                           │
//!                      │  ┌─────────┐    ┌────────────┐    ┌──────────┐    │
//!                      │  │ bounded │───▶│ dispatcher │───▶│ telegram │────┼──▶ Bot API
//!                      │  │  queue  │    │ (1 task)   │    │  client  │    │
//!                      │  └─────────┘    └────────────┘    └──────────┘    │
//!                      │                                                   │
//!                      │  lifecycle: SIGINT/SIGTERM → stop server → close  │
//!                      │             queue → drain → exit                  │
//!                      └───────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use notify_relay::config::{load_config, Cli};
use notify_relay::delivery::TelegramClient;
use notify_relay::lifecycle::{self, Shutdown, TerminationSignals};
use notify_relay::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, routes) = load_config(Cli::parse())?;

    logging::init_logging(&config.observability);

    tracing::info!("notify-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        queue_capacity = config.delivery.queue_capacity,
        default_mode = %config.default_mode,
        senders = routes.len(),
        routes = routes.route_count(),
        "Configuration loaded"
    );
    if config.telegram.token.is_empty() {
        tracing::warn!("No bot token configured; the API will reject every delivery");
    }

    if let Some(addr) = &config.observability.metrics_address {
        let addr: SocketAddr = addr.parse()?;
        metrics::init_metrics(addr)?;
    }

    let signals = TerminationSignals::install()?;
    let deliverer = Arc::new(TelegramClient::new(&config.telegram)?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for notifications");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals.forward_to(shutdown);

    let summary = lifecycle::run(&config, routes, deliverer, listener, server_shutdown).await?;

    tracing::info!(
        delivered = summary.delivered,
        failed = summary.failed,
        "Shutdown complete"
    );
    Ok(())
}
