//! Relay and server configuration.

use std::fmt;
use std::net::SocketAddr;

/// Token endpoint of the reference provider (GitHub).
pub const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

/// Browser origin allowed by default (local front-end dev server).
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Credentials and endpoint for the upstream token exchange.
///
/// Constructed once at startup and injected into the exchanger. The secret
/// is never accepted from callers and never appears in responses or in
/// `Debug` output.
#[derive(Clone)]
pub struct RelayConfig {
    /// Provider token endpoint URL.
    pub token_url: String,
    /// OAuth application client identifier.
    pub client_id: String,
    /// OAuth application client secret.
    pub client_secret: String,
}

impl RelayConfig {
    /// Create config for the reference provider (GitHub).
    pub fn github(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            token_url: GITHUB_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Override the token endpoint (stub providers, GitHub Enterprise).
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Configuration for the relay HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    pub bind_addr: SocketAddr,
    /// Browser origins allowed to make credentialed cross-origin requests.
    /// Empty disables CORS entirely (non-browser callers only).
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".parse().unwrap(),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        }
    }
}

impl ServerConfig {
    /// Create a server config bound to the given address.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Default::default()
        }
    }

    /// Set the allowed browser origins.
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }
}
