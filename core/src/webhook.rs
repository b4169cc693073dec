use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(300_000);

/// Normalized outcome of one webhook call, and the JSON shape the API
/// returns to the browser.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WebhookResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WebhookResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

impl From<Result<Value, WebhookError>> for WebhookResult {
    fn from(result: Result<Value, WebhookError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Request timeout - webhook took too long to respond")]
    Timeout,
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },
    #[error("{0}")]
    Transport(String),
}

/// Single-shot POST to an n8n webhook. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl WebhookClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn invoke(&self, url: &str, payload: &Value) -> WebhookResult {
        self.call(url, payload).await.into()
    }

    /// One attempt, no retries. The deadline covers the wait for response
    /// headers; when it passes the request future is dropped, which aborts
    /// the connection.
    pub async fn call(&self, url: &str, payload: &Value) -> Result<Value, WebhookError> {
        info!("POST {} (timeout {}ms)", url, self.timeout.as_millis());

        let result = self.exchange(url, payload).await;
        if let Err(e) = &result {
            warn!("Webhook {} failed: {}", url, e);
        }
        result
    }

    async fn exchange(&self, url: &str, payload: &Value) -> Result<Value, WebhookError> {
        let send = self.client.post(url).json(payload).send();
        let response = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| WebhookError::Timeout)?
            .map_err(|e| WebhookError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| WebhookError::Transport(e.to_string()))
    }
}
