//! Configuration schema definitions.

use std::fmt;

use crate::message::RenderMode;

/// Root configuration for the relay.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    /// Inbound HTTP listener.
    pub listener: ListenerConfig,

    /// Messaging API endpoint and credentials.
    pub telegram: TelegramConfig,

    /// Delivery queue settings.
    pub delivery: DeliveryConfig,

    /// Inbound request timeouts.
    pub timeouts: TimeoutConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Render mode used when a request does not ask for a valid one.
    pub default_mode: RenderMode,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Telegram Bot API settings.
#[derive(Clone)]
pub struct TelegramConfig {
    /// API base URL, without the `/bot{token}` part.
    pub api_base_url: String,

    /// Bot token.
    pub token: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.telegram.org".to_string(),
            token: String::new(),
        }
    }
}

// The token grants full control of the bot; keep it out of logs.
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_base_url", &self.api_base_url)
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .finish()
    }
}

/// Delivery queue configuration.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Maximum number of messages waiting for the dispatcher.
    pub queue_capacity: usize,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self { queue_capacity: 100 }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Request timeout (total time to read the body and enqueue) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is not set (e.g., "info", "notify_relay=debug").
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus exporter bind address; metrics are disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_address: None,
        }
    }
}
