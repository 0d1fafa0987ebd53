use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::config::Config;
use crate::error::CycleError;

/// Where the poll loop gets homework payloads from.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetches the raw payload for homework updated since `from_date` (Unix seconds).
    async fn fetch(&self, from_date: i64) -> Result<Value, CycleError>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &Config) -> Self {
        Self::new(http, &config.endpoint, &config.practicum_token)
    }

    fn request(&self, from_date: i64) -> reqwest::Result<reqwest::Request> {
        self.http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, CycleError> {
        let request = self.request(from_date).map_err(CycleError::Request)?;
        tracing::debug!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let resp = self.http.execute(request).await.map_err(|err| {
            tracing::error!(error = %err, "Homework API request failed");
            CycleError::Request(err)
        })?;

        let status = resp.status();
        tracing::debug!(status = status.as_u16(), "Homework API responded");

        let body = resp.text().await.map_err(|err| {
            tracing::error!(error = %err, "Homework API response read failed");
            CycleError::Request(err)
        })?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), %body, "Homework API returned an error status");
            return Err(CycleError::Transport { status, body });
        }

        serde_json::from_str(&body).map_err(|err| {
            tracing::error!(error = %err, "Homework API response is not valid JSON");
            CycleError::Decode(err)
        })
    }
}
