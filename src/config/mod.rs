//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command-line flags (env fallback)
//!     → loader.rs (clap parse, normalize listen address)
//!     → routing::parse_rules (rule string → RoutingTable)
//!     → validation.rs (semantic checks)
//!     → RelayConfig + RoutingTable (immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - Every setting has a flag and an environment variable
//! - All fields have defaults so the relay starts with no flags at all
//! - Any configuration error is fatal before the listener binds

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, Cli, ConfigError};
pub use schema::{
    DeliveryConfig, ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig, TelegramConfig,
    TimeoutConfig,
};
