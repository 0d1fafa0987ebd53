use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::DeliveryError;

/// Outbound messaging transport.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, destination: &str, text: &str) -> Result<(), DeliveryError>;
}

/// Telegram Bot API `sendMessage` transport.
#[derive(Clone)]
pub struct TelegramMessenger {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelegramMessenger {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            token: token.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &Config) -> Self {
        Self::new(http, &config.telegram_api_url, &config.telegram_token)
    }

    fn request(&self, destination: &str, text: &str) -> reqwest::Result<reqwest::Request> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.token
        );
        self.http
            .post(url)
            .json(&SendMessage {
                chat_id: destination,
                text,
            })
            .build()
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, destination: &str, text: &str) -> Result<(), DeliveryError> {
        let request = self.request(destination, text)?;
        let resp = self.http.execute(request).await?;

        let status = resp.status();
        let body = resp.text().await?;
        let parsed: Option<TelegramResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(TelegramResponse {
                description: Some(description),
                ..
            }) => Err(DeliveryError::Rejected(format!("{status}: {description}"))),
            _ => Err(DeliveryError::Rejected(format!("{status}: {body}"))),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Delivers notifications to the single configured chat.
pub struct Notifier<M> {
    messenger: M,
    destination: String,
}

impl<M: Messenger> Notifier<M> {
    pub fn new(messenger: M, destination: impl Into<String>) -> Self {
        Self {
            messenger,
            destination: destination.into(),
        }
    }

    /// Sends `message`. Failures are logged here and returned only for the
    /// caller's information; the poll loop does not act on them.
    pub async fn notify(&self, message: &str) -> Result<(), DeliveryError> {
        match self.messenger.send_text(&self.destination, message).await {
            Ok(()) => {
                tracing::debug!(%message, "Message sent to chat");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to send message to chat");
                Err(err)
            }
        }
    }

    #[cfg(test)]
    pub fn messenger(&self) -> &M {
        &self.messenger
    }
}
