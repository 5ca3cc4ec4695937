//! `/notify` request handling.
//!
//! # Responsibilities
//! - Resolve destinations for the sender
//! - Read and validate the body
//! - Format the text and fan out one message per destination
//!
//! # Design Decisions
//! - Query parameters take their first value; repeats are ignored, never rejected
//! - Routing is resolved before the body is read; unrouted requests are no-ops
//! - Empty bodies are silently dropped, not rejected
//! - Enqueue never waits: the first full-queue rejection ends the request with
//!   503 and earlier destinations stay queued

use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::delivery::EnqueueError;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::message::{format_message, OutboundMessage};
use crate::observability::metrics;

/// Query parameters of `/notify`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NotifyParams {
    /// Sender id, trimmed.
    pub from: Option<String>,
    /// `on` for an audible notification; anything else is silent.
    pub sound: Option<String>,
    /// Render mode override: `html` or `markdown`.
    pub mode: Option<String>,
}

impl NotifyParams {
    /// Parse a raw query string. The first occurrence of each key wins and
    /// unknown keys are ignored.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let pairs = url::form_urlencoded::parse(query.unwrap_or("").as_bytes());
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "from" => &mut params.from,
                "sound" => &mut params.sound,
                "mode" => &mut params.mode,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    fn sender(&self) -> &str {
        self.from.as_deref().map(str::trim).unwrap_or("")
    }

    fn silent(&self) -> bool {
        self.sound.as_deref().map(str::trim) != Some("on")
    }
}

/// Errors returned to the caller of `/notify`.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("can't read body")]
    UnreadableBody,

    #[error("max capacity reached")]
    QueueFull,

    #[error("shutting down")]
    ShuttingDown,
}

impl From<EnqueueError> for NotifyError {
    fn from(e: EnqueueError) -> Self {
        match e {
            EnqueueError::Full => NotifyError::QueueFull,
            EnqueueError::Closed => NotifyError::ShuttingDown,
        }
    }
}

impl NotifyError {
    fn outcome(&self) -> &'static str {
        match self {
            NotifyError::UnreadableBody => "bad_request",
            NotifyError::QueueFull => "queue_full",
            NotifyError::ShuttingDown => "closed",
        }
    }
}

impl IntoResponse for NotifyError {
    fn into_response(self) -> Response {
        let status = match self {
            NotifyError::UnreadableBody => StatusCode::BAD_REQUEST,
            NotifyError::QueueFull | NotifyError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, self.to_string()).into_response()
    }
}

/// `GET|POST /notify`
pub async fn notify(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Body,
) -> Result<StatusCode, NotifyError> {
    let params = NotifyParams::from_query(query.as_deref());
    let request_id = request_id(&headers);
    let sender = params.sender();

    let destinations = state.routes.resolve(sender);
    if destinations.is_empty() {
        tracing::debug!(request_id = %request_id, sender = %sender, "No destinations for sender");
        metrics::record_notify("noop");
        return Ok(StatusCode::OK);
    }

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            metrics::record_notify(NotifyError::UnreadableBody.outcome());
            return Err(NotifyError::UnreadableBody);
        }
    };
    if body.is_empty() {
        tracing::debug!(request_id = %request_id, sender = %sender, "Empty body, nothing to send");
        metrics::record_notify("noop");
        return Ok(StatusCode::OK);
    }

    let requested_mode = params.mode.as_deref().unwrap_or("");
    let (text, mode) = format_message(sender, &body, requested_mode, state.default_mode);
    let silent = params.silent();

    let mut enqueued = 0;
    for &destination_id in destinations {
        let message = OutboundMessage::new(destination_id, text.clone(), mode, silent);
        if let Err(e) = state.queue.try_enqueue(message) {
            let err = NotifyError::from(e);
            tracing::warn!(
                request_id = %request_id,
                sender = %sender,
                destination_id,
                enqueued,
                skipped = destinations.len() - enqueued,
                error = %e,
                "Rejecting notification"
            );
            metrics::record_enqueued(enqueued);
            metrics::record_notify(err.outcome());
            return Err(err);
        }
        enqueued += 1;
    }

    tracing::debug!(
        request_id = %request_id,
        sender = %sender,
        destinations = enqueued,
        mode = %mode,
        silent,
        "Notification queued"
    );
    metrics::record_enqueued(enqueued);
    metrics::record_notify("accepted");
    Ok(StatusCode::OK)
}
