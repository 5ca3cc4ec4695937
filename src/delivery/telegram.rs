//! Telegram Bot API client.
//!
//! # Responsibilities
//! - Build the `sendMessage` endpoint from base URL and bot token
//! - Serialize an OutboundMessage into the API's JSON body
//! - Map transport failures and non-2xx answers to DeliveryError
//!
//! # Design Decisions
//! - No client timeout: a stalled API stalls the dispatcher, which is accepted
//! - The response body is read only to report rejections

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::config::TelegramConfig;
use crate::delivery::deliverer::{Deliverer, DeliveryError};
use crate::message::OutboundMessage;

/// JSON body of a `sendMessage` call.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: String,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    disable_notification: bool,
}

impl<'a> From<&'a OutboundMessage> for SendMessage<'a> {
    fn from(message: &'a OutboundMessage) -> Self {
        Self {
            chat_id: message.destination_id().to_string(),
            text: message.text(),
            parse_mode: message.render_mode().as_parse_mode(),
            disable_web_page_preview: message.suppress_link_preview(),
            disable_notification: message.silent(),
        }
    }
}

/// Delivers messages through `POST {base}/bot{token}/sendMessage`.
pub struct TelegramClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: send_message_url(&config.api_base_url, &config.token)?,
        })
    }
}

fn send_message_url(base: &str, token: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}/bot{}/sendMessage", base.trim_end_matches('/'), token))
}

#[async_trait]
impl Deliverer for TelegramClient {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&SendMessage::from(message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::RenderMode;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TelegramClient {
        TelegramClient::new(&TelegramConfig {
            api_base_url: format!("{}/", server.uri()),
            token: "123:abc".into(),
        })
        .unwrap()
    }

    #[test]
    fn test_wire_format_plain_and_silent() {
        let message = OutboundMessage::new(111, "alice: hi", RenderMode::Plain, true);
        let value = serde_json::to_value(SendMessage::from(&message)).unwrap();
        assert_eq!(
            value,
            json!({
                "chat_id": "111",
                "text": "alice: hi",
                "disable_web_page_preview": true,
                "disable_notification": true,
            })
        );
    }

    #[test]
    fn test_wire_format_markdown_audible() {
        let message = OutboundMessage::new(-42, "*ci:* ok", RenderMode::Markdown, false);
        let value = serde_json::to_value(SendMessage::from(&message)).unwrap();
        assert_eq!(
            value,
            json!({
                "chat_id": "-42",
                "text": "*ci:* ok",
                "parse_mode": "markdown",
                "disable_web_page_preview": true,
            })
        );
    }

    #[tokio::test]
    async fn test_posts_to_send_message_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(json!({
                "chat_id": "999",
                "text": "<b>ci:</b> green",
                "parse_mode": "html",
                "disable_web_page_preview": true,
                "disable_notification": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let message = OutboundMessage::new(999, "<b>ci:</b> green", RenderMode::Html, true);
        client.deliver(&message).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("chat not found"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let message = OutboundMessage::new(1, "hello", RenderMode::Plain, true);
        match client.deliver(&message).await {
            Err(DeliveryError::Rejected { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "chat not found");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_api_is_transport_error() {
        let client = TelegramClient::new(&TelegramConfig {
            api_base_url: "http://127.0.0.1:1".into(),
            token: "t".into(),
        })
        .unwrap();
        let message = OutboundMessage::new(1, "hello", RenderMode::Plain, true);
        assert!(matches!(
            client.deliver(&message).await,
            Err(DeliveryError::Transport(_))
        ));
    }
}
