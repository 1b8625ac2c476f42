//! LINE Messaging API push client

use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use crate::monitor::error::NotifyError;

/// Trait for delivering a text message to the configured recipient
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message` once. `Ok(())` means the API accepted it (2xx).
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Push request body: `{"to": ..., "messages": [{"type": "text", "text": ...}]}`
#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: [PushMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PushMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Pushes text messages to a single LINE user or group
pub struct LineNotifier {
    client: Client,
    endpoint: String,
    access_token: String,
    target: String,
}

impl LineNotifier {
    pub fn new(
        endpoint: &str,
        access_token: &str,
        target: &str,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.to_string(),
            access_token: access_token.to_string(),
            target: target.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for LineNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        info!("Pushing message to {}", self.target);

        let body = PushRequest {
            to: &self.target,
            messages: [PushMessage {
                kind: "text",
                text: message,
            }],
        };

        // json() sets Content-Type: application/json
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|source| NotifyError::Network {
                url: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Push API rejected message ({}): {}", status, body);
            return Err(NotifyError::Rejected { status, body });
        }

        info!("Push message accepted (status {})", status);
        Ok(())
    }
}
