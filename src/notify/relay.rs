//! HTTP client for the claim mail relay

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::notifier::{ClaimEmail, Notifier, NotifyOutcome};

/// Relay answer; success carries `message`, failures carry `error`
#[derive(Debug, Default, Deserialize)]
struct RelayResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Posts `{toEmail, itemTitle}` to the relay endpoint
pub struct RelayNotifier {
    client: reqwest::Client,
    url: String,
}

impl RelayNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build relay client: {}", e))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for RelayNotifier {
    async fn notify(&self, recipient: &str, item_title: &str) -> NotifyOutcome {
        let payload = ClaimEmail {
            to_email: recipient.to_string(),
            item_title: item_title.to_string(),
        };

        let response = match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => return NotifyOutcome::TransportFailed(e.to_string()),
        };

        let status = response.status();
        let body: RelayResponse = response.json().await.unwrap_or_default();

        if status.is_success() && body.success != Some(false) {
            log::debug!(
                "Relay accepted notification: {}",
                body.message.as_deref().unwrap_or("no message")
            );
            return NotifyOutcome::Delivered;
        }

        NotifyOutcome::Rejected {
            status: status.as_u16(),
            message: body
                .error
                .or(body.message)
                .unwrap_or_else(|| status.to_string()),
        }
    }
}
