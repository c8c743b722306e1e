//! Outbound delivery of checkout submissions
//!
//! The delivery endpoint receives the envelope as JSON and forwards it to the
//! sales inbox. Any 2xx answer counts as delivered.

use super::models::DeliveryEnvelope;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("delivery endpoint responded with status {0}")]
    Rejected(u16),

    #[error("delivery request failed: {0}")]
    Transport(String),
}

/// Sends one envelope per call. Implementations must not retry.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn deliver(&self, envelope: &DeliveryEnvelope<'_>) -> Result<(), DeliveryError>;
}

/// Posts envelopes to a fixed URL over HTTP
#[derive(Debug, Clone)]
pub struct HttpDeliveryClient {
    client: reqwest::Client,
    url: String,
}

impl HttpDeliveryClient {
    /// Builds a client whose requests give up after `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(format!("could not build HTTP client: {}", e)))?;

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
impl DeliveryClient for HttpDeliveryClient {
    async fn deliver(&self, envelope: &DeliveryEnvelope<'_>) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .json(envelope)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Transport(format!("timed out: {}", e))
                } else {
                    DeliveryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = status.as_u16(), "delivery endpoint rejected order");
            return Err(DeliveryError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}
