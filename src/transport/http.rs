//! HTTP transport backed by `reqwest`.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use super::Transport;
use crate::error::{PanelError, Result};
use crate::request::{Command, Method};

/// Address of the controller on the home network.
pub const DEFAULT_BASE_URL: &str = "http://192.168.1.46:5000";

/// Talks to the controller's JSON API.
#[derive(Debug, Clone)]
pub struct HttpController {
    client: Client,
    base_url: String,
}

impl HttpController {
    /// Create a client for `base_url`. Without a timeout the transport default applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PanelError::Other(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Pull the controller's `message` out of an error body, falling back to the raw text.
fn error_message(status: StatusCode, text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("no reason").to_string()
            } else {
                text.trim().to_string()
            }
        })
}

fn decode_body(path: &str, text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| PanelError::InvalidResponse {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

impl Transport for HttpController {
    #[instrument(skip(self, command), fields(action = command.name(), path = command.path()))]
    async fn send(&self, command: &Command) -> Result<Value> {
        let path = command.path();
        let url = self.url(path);

        let request = match command.method() {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let request = match command.body() {
            Some(body) => request.json(&body),
            None => request,
        };

        debug!(method = %command.method(), %url, "Sending request");
        let transport_err = |e: reqwest::Error| PanelError::Transport {
            path: path.to_string(),
            reason: e.to_string(),
        };
        let response = request.send().await.map_err(transport_err)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_err)?;
        trace!(status = status.as_u16(), body_len = text.len(), "Response received");

        if !status.is_success() {
            return Err(PanelError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        decode_body(path, &text)
    }
}
