//! The outbound delivery capability.

use async_trait::async_trait;
use thiserror::Error;

use crate::message::OutboundMessage;

/// Errors from a single delivery attempt. None of them are retried.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Connection, TLS or body transfer failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Sends one message to the external messaging API.
#[async_trait]
pub trait Deliverer: Send + Sync {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}
