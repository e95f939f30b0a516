//! Authrelay - OAuth authorization-code exchange relay.
//!
//! Main entry point for the relay binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use authrelay_proxy::config::{DEFAULT_ALLOWED_ORIGIN, GITHUB_TOKEN_URL};
use authrelay_proxy::{HttpExchanger, ProxyServer, RelayConfig, ServerConfig};

/// OAuth authorization-code exchange relay.
///
/// Exchanges a browser-supplied authorization code for an access token at
/// the provider's token endpoint, keeping the client secret server-side.
#[derive(Parser, Debug)]
#[command(name = "authrelay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address to bind the listener to
    #[arg(long, env = "AUTHRELAY_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// OAuth application client identifier
    #[arg(long, env = "CLIENT_ID", hide_env_values = true)]
    pub client_id: String,

    /// OAuth application client secret
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// Provider token endpoint
    #[arg(long, env = "TOKEN_URL", default_value = GITHUB_TOKEN_URL)]
    pub token_url: String,

    /// Browser origin allowed to call the relay (repeatable)
    #[arg(
        long = "origin",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = DEFAULT_ALLOWED_ORIGIN
    )]
    pub origins: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "authrelay=debug,authrelay_proxy=debug,tower_http=debug,info"
    } else {
        "authrelay=info,authrelay_proxy=info,warn"
    };
    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let relay_config =
        RelayConfig::github(cli.client_id, cli.client_secret).with_token_url(cli.token_url);
    let server_config = ServerConfig::new(cli.bind).with_allowed_origins(cli.origins);

    tracing::info!(
        bind = %server_config.bind_addr,
        token_url = %relay_config.token_url,
        origins = ?server_config.allowed_origins,
        "Starting authrelay"
    );

    let exchanger = Arc::new(HttpExchanger::new(relay_config));
    let server = ProxyServer::new(server_config, exchanger);

    server.run().await?;
    Ok(())
}
