//! HTTP client for the LINE Messaging API push endpoint.

use std::time::Duration;

use chrono::FixedOffset;
use reqwest::Client;
use serde_json::{json, Value};

use newsdigest_core::{NewsItem, Notifier};

use crate::error::LineError;
use crate::message::{digest_message, error_message};

const DEFAULT_BASE_URL: &str = "https://api.line.me";

/// Client for LINE push messages.
///
/// Use [`LineClient::new`] for production or [`LineClient::with_base_url`]
/// to point at a mock server in tests. `zone` is the reference zone used to
/// render publication times.
pub struct LineClient {
    client: Client,
    base_url: String,
    channel_access_token: String,
    zone: FixedOffset,
}

impl LineClient {
    /// # Errors
    ///
    /// Returns [`LineError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        channel_access_token: &str,
        zone: FixedOffset,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, LineError> {
        Self::with_base_url(
            channel_access_token,
            zone,
            timeout_secs,
            user_agent,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LineError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        channel_access_token: &str,
        zone: FixedOffset,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, LineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            channel_access_token: channel_access_token.to_string(),
            zone,
        })
    }

    /// Push `messages` to one user, group, or room.
    ///
    /// # Errors
    ///
    /// - [`LineError::Http`] on network failure or timeout.
    /// - [`LineError::UnexpectedStatus`] when LINE answers with a non-2xx status.
    pub async fn push(&self, to: &str, messages: Vec<Value>) -> Result<(), LineError> {
        let url = format!("{}/v2/bot/message/push", self.base_url);
        let body = json!({ "to": to, "messages": messages });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.channel_access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LineError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

impl Notifier for LineClient {
    type Error = LineError;

    async fn deliver(
        &self,
        recipient_id: &str,
        items: &[NewsItem],
        label: &str,
    ) -> Result<(), LineError> {
        if items.is_empty() {
            tracing::warn!(target_name = %label, "no items to deliver");
            return Ok(());
        }

        let message = digest_message(items, label, self.zone);
        match self.push(recipient_id, vec![message]).await {
            Ok(()) => {
                tracing::info!(
                    target_name = %label,
                    count = items.len(),
                    "LINE digest delivered"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(target_name = %label, error = %e, "LINE digest push failed");
                Err(e)
            }
        }
    }

    async fn deliver_error(&self, recipient_id: &str, message: &str) -> Result<(), LineError> {
        self.push(recipient_id, vec![error_message(message)]).await?;
        tracing::info!("LINE error notification delivered");
        Ok(())
    }
}
