//! Upstream token-endpoint collaborator.
//!
//! The provider call is the only external boundary in the relay, kept behind
//! [`CodeExchanger`] so the server can be exercised against a test double
//! without a live provider.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, header};

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};

/// Thread-safe shared exchanger handle.
pub type SharedExchanger = Arc<dyn CodeExchanger>;

/// Exchanges a one-time authorization code for the provider's token payload.
#[async_trait]
pub trait CodeExchanger: Send + Sync + std::fmt::Debug {
    /// Redeem `code` at the provider, returning the parsed JSON payload.
    async fn exchange(&self, code: &str) -> Result<serde_json::Value>;
}

/// Production exchanger backed by a reqwest client.
///
/// Issues exactly one `POST {token_url}` per call with `client_id`,
/// `client_secret`, and `code` as query parameters and
/// `Accept: application/json`. No retries; each call is independent.
#[derive(Debug, Clone)]
pub struct HttpExchanger {
    client: Client,
    config: RelayConfig,
}

impl HttpExchanger {
    /// Create an exchanger for the given relay configuration.
    pub fn new(config: RelayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Get the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

#[async_trait]
impl CodeExchanger for HttpExchanger {
    async fn exchange(&self, code: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.config.token_url)
            .query(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
            ])
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| RelayError::Network(format!("Token exchange request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Network(format!("Failed to read provider response: {}", e)))?;

        if !status.is_success() {
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            RelayError::Serialization(format!("Failed to parse token response: {}", e))
        })
    }
}
