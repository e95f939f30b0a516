//! OAuth authorization-code exchange relay.
//!
//! A browser front-end finishes the OAuth consent flow holding a one-time
//! authorization code, but the confidential client secret needed to redeem
//! that code must never reach the browser. This crate is the small relay that
//! sits between the two: it accepts the code over a CORS-gated endpoint,
//! attaches the server-held client credentials, and forwards the provider's
//! JSON token response back to the caller.
//!
//! # Components
//!
//! - [`config`] — relay and server configuration, built once at startup
//! - [`exchange`] — upstream token-endpoint collaborator behind [`CodeExchanger`]
//! - [`proxy`] — axum server exposing `POST /api/token`
//! - [`error`] — error taxonomy shared across the crate

pub mod config;
pub mod error;
pub mod exchange;
pub mod proxy;

pub use config::{RelayConfig, ServerConfig};
pub use error::{RelayError, Result};
pub use exchange::{CodeExchanger, HttpExchanger, SharedExchanger};
pub use proxy::ProxyServer;
