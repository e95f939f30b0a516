//! Integration tests exercising the relay against a stub provider.
//!
//! The stub stands in for GitHub's token endpoint: it records each inbound
//! exchange request and replays a canned response, so tests can assert on
//! the exact outbound request the relay constructs.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::post,
};
use tokio::net::TcpListener;

use authrelay_proxy::{
    CodeExchanger, HttpExchanger, ProxyServer, RelayConfig, RelayError, ServerConfig,
};

/// One captured exchange request.
#[derive(Debug, Clone)]
struct CapturedRequest {
    params: HashMap<String, String>,
    accept: Option<String>,
}

/// Stub provider state: captured requests plus the canned reply.
#[derive(Clone)]
struct StubProvider {
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    status: StatusCode,
    body: serde_json::Value,
}

async fn handle_access_token(
    State(stub): State<StubProvider>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<serde_json::Value>) {
    stub.captured.lock().unwrap().push(CapturedRequest {
        params,
        accept: headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
    (stub.status, Json(stub.body.clone()))
}

/// Spawn a stub provider on an ephemeral port, returning its token URL and
/// the captured request log.
async fn spawn_stub_provider(
    status: StatusCode,
    body: serde_json::Value,
) -> Result<(String, Arc<Mutex<Vec<CapturedRequest>>>)> {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let stub = StubProvider {
        captured: captured.clone(),
        status,
        body,
    };

    let router = Router::new()
        .route("/login/oauth/access_token", post(handle_access_token))
        .with_state(stub);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok((
        format!("http://{}/login/oauth/access_token", addr),
        captured,
    ))
}

fn exchanger_for(token_url: &str) -> HttpExchanger {
    HttpExchanger::new(RelayConfig::github("iv1.client", "hunter2").with_token_url(token_url))
}

#[tokio::test]
async fn test_exchange_sends_configured_credentials() -> Result<()> {
    let (token_url, captured) = spawn_stub_provider(
        StatusCode::OK,
        serde_json::json!({"access_token": "abc", "token_type": "bearer", "scope": ""}),
    )
    .await?;

    let payload = exchanger_for(&token_url).exchange("one-time-code").await?;

    assert_eq!(payload.get("access_token").unwrap(), "abc");

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.params.get("client_id").unwrap(), "iv1.client");
    assert_eq!(request.params.get("client_secret").unwrap(), "hunter2");
    assert_eq!(request.params.get("code").unwrap(), "one-time-code");
    assert_eq!(request.accept.as_deref(), Some("application/json"));
    Ok(())
}

#[tokio::test]
async fn test_exchange_surfaces_upstream_rejection() -> Result<()> {
    let (token_url, _captured) = spawn_stub_provider(
        StatusCode::UNAUTHORIZED,
        serde_json::json!({"message": "Bad credentials"}),
    )
    .await?;

    let err = exchanger_for(&token_url)
        .exchange("expired")
        .await
        .unwrap_err();

    match err {
        RelayError::Upstream { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Bad credentials"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_each_exchange_is_independent() -> Result<()> {
    let (token_url, captured) =
        spawn_stub_provider(StatusCode::OK, serde_json::json!({"access_token": "abc"})).await?;

    let exchanger = exchanger_for(&token_url);
    exchanger.exchange("code-a").await?;
    exchanger.exchange("code-b").await?;

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].params.get("code").unwrap(), "code-a");
    assert_eq!(requests[1].params.get("code").unwrap(), "code-b");
    Ok(())
}

#[tokio::test]
async fn test_relay_end_to_end() -> Result<()> {
    let (token_url, captured) = spawn_stub_provider(
        StatusCode::OK,
        serde_json::json!({"access_token": "gho_x", "token_type": "bearer"}),
    )
    .await?;

    let exchanger = Arc::new(exchanger_for(&token_url));
    let config = ServerConfig::new("127.0.0.1:0".parse()?);
    let addr = ProxyServer::new(config, exchanger)
        .run_with_shutdown(std::future::pending())
        .await?;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/api/token", addr))
        .form(&[("code", "e2e-code")])
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let payload: serde_json::Value = response.json().await?;
    assert_eq!(payload.get("access_token").unwrap(), "gho_x");
    assert_eq!(captured.lock().unwrap().len(), 1);
    Ok(())
}
