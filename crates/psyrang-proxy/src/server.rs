//! Axum HTTP server for the generative proxy.
//!
//! This module provides the router and the `serve()` function that runs it
//! on a pre-bound `TcpListener`.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::to_bytes,
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use psyrang_core::{ProxyError, ProxyService, RawRequest};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::error::{ApiError, handle_panic};
use crate::models::{ErrorResponse, HealthResponse};

/// Path served for clients that call the proxy directly.
pub const API_PATH: &str = "/api/gemini";

/// Path used by clients built against the serverless functions layout.
pub const FUNCTION_PATH: &str = "/.netlify/functions/gemini";

/// Largest request body read for one proxy invocation.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Shared application state for the proxy server.
#[derive(Clone)]
struct AppState {
    /// Stateless pipeline shared by every request.
    service: Arc<ProxyService>,
}

/// Build the router for the proxy.
pub fn create_router(service: Arc<ProxyService>) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/health", get(health_check))
        .route(API_PATH, any(gemini_function))
        .route(FUNCTION_PATH, any(gemini_function))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the proxy server with a pre-bound listener.
///
/// Runs until the cancellation token is triggered.
///
/// # Returns
///
/// Returns `Ok(())` on clean shutdown, or an error if the server fails.
pub async fn serve(
    listener: TcpListener,
    service: Arc<ProxyService>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Proxy server starting on {addr}");

    if service.config().api_key.is_none() {
        info!("No upstream API key configured; requests will fail until one is set");
    }

    let app = create_router(service);

    info!("Proxy listening on http://{addr}{API_PATH}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Proxy server shut down");
    Ok(())
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::ok())
}

/// Run one invocation of the proxy pipeline.
///
/// The method guard runs before the body is read, so a non-POST request is
/// answered with 405 whatever its body.
async fn gemini_function(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    if parts.method != Method::POST {
        debug!(method = %parts.method, "Rejected non-POST invocation");
        return ApiError(ProxyError::MethodNotAllowed {
            method: parts.method.to_string(),
        })
        .into_response();
    }

    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, limit = MAX_BODY_BYTES, "Failed to read request body");
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorResponse::new(format!("Request body exceeds {MAX_BODY_BYTES} bytes"))),
            )
                .into_response();
        }
    };
    debug!(bytes = body.len(), "Proxy invocation");

    let request = RawRequest::post(body.to_vec());
    match state.service.handle(request).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
