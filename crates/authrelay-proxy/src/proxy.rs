//! Axum server exposing the token exchange endpoint.
//!
//! Accepts an authorization code from a browser front-end on `POST
//! /api/token` and relays the provider's token response. CORS is gated on a
//! configured origin allow-list with credentials permitted.

use axum::{
    Form, Json, Router,
    extract::State,
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::{RelayError, Result};
use crate::exchange::SharedExchanger;

/// Shared state for the relay server.
#[derive(Debug)]
struct ProxyState {
    exchanger: SharedExchanger,
}

/// The token exchange relay server.
pub struct ProxyServer {
    config: ServerConfig,
    state: Arc<ProxyState>,
}

impl ProxyServer {
    /// Create a relay server over the given exchanger.
    pub fn new(config: ServerConfig, exchanger: SharedExchanger) -> Self {
        Self {
            config,
            state: Arc::new(ProxyState { exchanger }),
        }
    }

    /// Build the axum router.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/api/token", post(handle_token))
            .route("/health", get(handle_health))
            .with_state(self.state.clone());

        if !self.config.allowed_origins.is_empty() {
            router = router.layer(cors_layer(&self.config.allowed_origins));
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Run the relay server.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "Starting token exchange relay");
        axum::serve(listener, self.router()).await
    }

    /// Run with graceful shutdown, returning the bound address.
    pub async fn run_with_shutdown(
        self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<SocketAddr> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "Starting token exchange relay");
        tokio::spawn(async move {
            axum::serve(listener, self.router())
                .with_graceful_shutdown(shutdown)
                .await
                .ok();
        });
        Ok(local_addr)
    }
}

/// Credentialed CORS for the configured origins.
///
/// Credentialed responses cannot use wildcards, so methods and headers
/// mirror whatever the request asks for instead.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Inbound form payload for `POST /api/token`.
#[derive(Debug, Deserialize)]
struct TokenRequest {
    #[serde(default)]
    code: Option<String>,
}

/// Handle `POST /api/token`.
///
/// Validates the form before touching the network: a missing `code` fails
/// with 422 and zero upstream calls.
async fn handle_token(
    State(state): State<Arc<ProxyState>>,
    Form(request): Form<TokenRequest>,
) -> Result<impl IntoResponse> {
    let code = request
        .code
        .as_deref()
        .filter(|code| !code.is_empty())
        .ok_or_else(|| RelayError::InvalidRequest("Missing form field `code`".to_string()))?;

    let payload = state.exchanger.exchange(code).await?;
    Ok(Json(payload))
}

/// Handle `GET /health`.
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "authrelay",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
