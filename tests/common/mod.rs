//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use notify_relay::config::RelayConfig;
use notify_relay::delivery::{Deliverer, DeliveryError, DispatchSummary};
use notify_relay::lifecycle::{self, RelayError, Shutdown};
use notify_relay::routing::parse_rules;
use notify_relay::OutboundMessage;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Records every delivered message. Optionally blocks each delivery on a gate.
pub struct RecordingDeliverer {
    messages: Mutex<Vec<OutboundMessage>>,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingDeliverer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            messages: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Each delivery consumes one permit from `gate` before it is recorded.
    #[allow(dead_code)]
    pub fn gated(gate: Arc<Semaphore>) -> Arc<Self> {
        Arc::new(Self {
            messages: Mutex::new(Vec::new()),
            gate: Some(gate),
        })
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Deliverer for RecordingDeliverer {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// A relay running on an ephemeral port.
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<DispatchSummary, RelayError>>,
}

impl RunningRelay {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    /// Trigger shutdown and wait for the relay to finish draining.
    pub async fn stop(self) -> DispatchSummary {
        self.shutdown.trigger();
        self.task.await.unwrap().unwrap()
    }
}

/// Start the relay with `rules` and `deliverer`. The listener is bound before returning.
pub async fn start_relay(
    config: RelayConfig,
    rules: &str,
    deliverer: Arc<dyn Deliverer>,
) -> RunningRelay {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = parse_rules(rules).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let task = tokio::spawn(async move {
        lifecycle::run(&config, routes, deliverer, listener, server_shutdown).await
    });

    RunningRelay {
        addr,
        shutdown,
        task,
    }
}

/// HTTP client without connection pooling, so shutdown is observed immediately.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
