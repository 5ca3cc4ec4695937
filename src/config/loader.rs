//! Configuration loading from command-line flags and environment.

use clap::Parser;
use thiserror::Error;

use crate::config::schema::{
    DeliveryConfig, ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig, TelegramConfig,
    TimeoutConfig,
};
use crate::config::validation::{validate_config, ValidationError};
use crate::message::RenderMode;
use crate::routing::{parse_rules, RoutingTable, RuleError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Rule error: {0}")]
    Rules(#[from] RuleError),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Parser)]
#[command(name = "notify-relay", version)]
#[command(about = "Relay HTTP notifications to Telegram chats", long_about = None)]
pub struct Cli {
    /// [address]:port for the web server to listen on
    #[arg(short = 'l', long, env = "LISTEN", default_value = ":8000")]
    pub listen: String,

    /// Telegram bot token
    #[arg(short = 't', long, env = "TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// Default parse mode of messages (text, html, markdown)
    #[arg(short = 'm', long, env = "MODE", default_value = "text")]
    pub mode: String,

    /// Forwarding rules, format: [{from:}{id,...};]{id,...}
    #[arg(short = 'r', long, env = "RULE", default_value = "")]
    pub rule: String,

    /// Telegram Bot API base URL
    #[arg(long, env = "API_URL", default_value = "https://api.telegram.org")]
    pub api_url: String,

    /// Maximum number of messages waiting for delivery
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = 100)]
    pub queue_capacity: usize,

    /// Largest accepted request body in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 2 * 1024 * 1024)]
    pub max_body_bytes: usize,

    /// Inbound request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this address
    #[arg(long, env = "METRICS_ADDRESS")]
    pub metrics_address: Option<String>,
}

/// Build and validate the relay configuration and routing table.
pub fn load_config(cli: Cli) -> Result<(RelayConfig, RoutingTable), ConfigError> {
    let routes = parse_rules(&cli.rule)?;

    let defaults = RelayConfig::default();
    let config = RelayConfig {
        listener: ListenerConfig {
            bind_address: normalize_listen(&cli.listen, &defaults.listener.bind_address),
            max_body_bytes: cli.max_body_bytes,
        },
        telegram: TelegramConfig {
            api_base_url: non_empty(cli.api_url, defaults.telegram.api_base_url),
            token: cli.token.trim().to_string(),
        },
        delivery: DeliveryConfig {
            queue_capacity: cli.queue_capacity,
        },
        timeouts: TimeoutConfig {
            request_secs: cli.request_timeout_secs,
        },
        observability: ObservabilityConfig {
            log_level: non_empty(cli.log_level, defaults.observability.log_level),
            log_format: cli.log_format,
            metrics_address: cli.metrics_address.filter(|addr| !addr.trim().is_empty()),
        },
        default_mode: cli.mode.parse::<RenderMode>().unwrap_or_default(),
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok((config, routes))
}

/// `:8000` means every interface; an empty value means the default.
fn normalize_listen(listen: &str, default: &str) -> String {
    let listen = listen.trim();
    if listen.is_empty() {
        default.to_string()
    } else if listen.starts_with(':') {
        format!("0.0.0.0{}", listen)
    } else {
        listen.to_string()
    }
}

fn non_empty(value: String, default: String) -> String {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}
