//! Notification relay library.
//!
//! Accepts text over HTTP, routes it by sender to Telegram chats, and delivers
//! it through a bounded queue drained by a single dispatcher.

pub mod config;
pub mod delivery;
pub mod http;
pub mod lifecycle;
pub mod message;
pub mod observability;
pub mod routing;

pub use config::RelayConfig;
pub use delivery::{Deliverer, DeliveryError, TelegramClient};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use message::{OutboundMessage, RenderMode};
pub use routing::RoutingTable;
