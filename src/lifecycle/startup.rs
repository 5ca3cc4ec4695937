//! Relay orchestration: startup order and the shutdown sequence.
//!
//! # Design Decisions
//! - Dispatcher starts before the server so the queue always has a consumer
//! - Serving errors are reported only after the backlog has been drained

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinError;

use crate::config::RelayConfig;
use crate::delivery::{queue, Deliverer, DispatchSummary, Dispatcher};
use crate::http::HttpServer;
use crate::routing::RoutingTable;

/// Terminal errors of a relay run.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Serving the listener failed.
    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),

    /// The dispatcher task panicked or was aborted.
    #[error("dispatcher task failed: {0}")]
    Dispatcher(#[from] JoinError),
}

/// Run the relay until `shutdown` fires and the backlog is delivered.
///
/// Sequence on shutdown: the server stops accepting and finishes in-flight
/// requests, the queue is closed, and the dispatcher is joined.
pub async fn run(
    config: &RelayConfig,
    routes: RoutingTable,
    deliverer: Arc<dyn Deliverer>,
    listener: TcpListener,
    shutdown: broadcast::Receiver<()>,
) -> Result<DispatchSummary, RelayError> {
    let (producer, consumer, closer) = queue::bounded(config.delivery.queue_capacity);
    let dispatcher = Dispatcher::new(consumer, deliverer).spawn();

    let server = HttpServer::new(config, Arc::new(routes), producer);
    let served = server.run(listener, shutdown).await;
    if let Err(e) = &served {
        tracing::error!(error = %e, "HTTP server failed");
    }

    tracing::info!("Closing delivery queue");
    closer.close();

    let summary = dispatcher.wait().await?;
    served.map_err(RelayError::Serve)?;
    Ok(summary)
}
