//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the `/notify` handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve until the shutdown signal, then let in-flight requests finish

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RelayConfig;
use crate::delivery::QueueProducer;
use crate::http::handler::notify;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::message::RenderMode;
use crate::routing::RoutingTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RoutingTable>,
    pub queue: QueueProducer,
    pub default_mode: RenderMode,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(config: &RelayConfig, routes: Arc<RoutingTable>, queue: QueueProducer) -> Self {
        Self {
            routes,
            queue,
            default_mode: config.default_mode,
            max_body_bytes: config.listener.max_body_bytes,
        }
    }
}

/// HTTP front end of the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server feeding `queue`.
    pub fn new(config: &RelayConfig, routes: Arc<RoutingTable>, queue: QueueProducer) -> Self {
        let state = AppState::new(config, routes, queue);
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/notify", get(notify).post(notify))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// Stops accepting at the signal and returns once in-flight requests are done.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server no longer accepting connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
