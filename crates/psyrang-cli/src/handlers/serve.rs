//! Serve command handler.

use std::sync::Arc;

use psyrang_core::{ProxyConfig, ProxyService};
use psyrang_gemini::{DefaultGeminiClient, GeminiClientConfig};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CliError;

/// Build the proxy from the environment and run it until Ctrl-C.
pub async fn execute(host: &str, port: u16) -> Result<(), CliError> {
    let client_config = GeminiClientConfig::from_env();
    info!(endpoint = %client_config.endpoint(), "Using upstream endpoint");
    let client = DefaultGeminiClient::new(&client_config)?;
    let service = Arc::new(ProxyService::new(ProxyConfig::from_env(), Arc::new(client)));

    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|e| CliError::Server(format!("cannot bind {host}:{port}: {e}")))?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                shutdown.cancel();
            }
            Err(e) => warn!(error = %e, "Cannot listen for Ctrl-C; stop the process to shut down"),
        }
    });

    println!("Proxy available on http://{host}:{port}{}", psyrang_proxy::API_PATH);
    println!("Press Ctrl+C to stop");

    psyrang_proxy::serve(listener, service, cancel)
        .await
        .map_err(|e: anyhow::Error| CliError::Server(format!("{e:#}")))
}
