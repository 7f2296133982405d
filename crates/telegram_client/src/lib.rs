//! Telegram Bot API client.
//!
//! Delivers text messages to one fixed chat via the `sendMessage` method.
//! The automatic flood alert goes out as plain text; the daily report uses
//! Telegram's Markdown parse mode.

use common::Error;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Telegram bot client bound to a single destination chat.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    token: String,
    chat_id: String,
    base_url: String,
}

/// Request body for `sendMessage`.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

/// Telegram API response envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("failed to build Telegram HTTP client");

        Self {
            client,
            token: token.into(),
            chat_id: chat_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different base URL (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send a plain-text message to the configured chat.
    pub async fn send_text(&self, text: &str) -> Result<(), Error> {
        self.send(text, None).await
    }

    /// Send a Markdown-formatted message to the configured chat.
    pub async fn send_markdown(&self, text: &str) -> Result<(), Error> {
        self.send(text, Some("Markdown")).await
    }

    async fn send(&self, text: &str, parse_mode: Option<&str>) -> Result<(), Error> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode,
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Notification(format!("HTTP error: {}", e)))?;

        let status = resp.status().as_u16();
        let envelope: ApiEnvelope = resp
            .json()
            .await
            .map_err(|e| Error::Notification(format!("JSON parse error: {}", e)))?;

        if !envelope.ok {
            return Err(Error::Notification(format!(
                "Telegram returned {}: {}",
                status,
                envelope.description.unwrap_or_default()
            )));
        }

        debug!("Delivered {} chars to chat {}", text.len(), self.chat_id);
        Ok(())
    }
}
