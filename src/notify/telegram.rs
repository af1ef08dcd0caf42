//! Telegram Bot API channel.

use super::{NotifyError, Notifier};
use crate::config::NotifyConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to one chat through `sendMessage`.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
    parse_mode: String,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn from_config(config: &NotifyConfig) -> Result<Self, NotifyError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Configuration(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    /// Create a notifier with a custom HTTP client (for testing).
    pub fn with_client(client: reqwest::Client, config: &NotifyConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            parse_mode: config.parse_mode.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<bool, NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": self.parse_mode,
            }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout(self.timeout.as_millis() as u64)
                } else {
                    NotifyError::Network(e.to_string())
                }
            })?;

        // Rejections still come back as a JSON body with `ok: false`.
        let body: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::InvalidResponse(e.to_string()))?;

        if !body.ok {
            tracing::warn!(
                description = body.description.as_deref().unwrap_or(""),
                "Telegram rejected message"
            );
        }

        Ok(body.ok)
    }
}

/// Used when notifications are switched off; nothing is ever acknowledged.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, _text: &str) -> Result<bool, NotifyError> {
        tracing::debug!("Notifications disabled, message dropped");
        Ok(false)
    }
}
