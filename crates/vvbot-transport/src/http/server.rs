//! HTTP webhook server.
//!
//! Binds one TCP listener and serves a single route. Every request to the
//! registered path is answered `200 OK` with an empty body once the
//! [`WebhookHandler`] has seen it; the handler is expected to return quickly
//! and push any slow work onto its own task.
//!
//! Request bodies are not size-limited.
//!
//! ```text
//! 0.0.0.0:8080
//! └── POST /   → WebhookHandler::on_message(body)
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Bytes,
    extract::{ConnectInfo, DefaultBodyLimit, State},
    http::{Method, StatusCode},
    routing::any,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{TransportError, TransportResult};
use crate::handle::ListenerHandle;

/// Receives the raw body of every POST delivered to the webhook path.
#[async_trait]
pub trait WebhookHandler: Send + Sync {
    /// Processes one inbound payload.
    async fn on_message(&self, data: &[u8]);
}

/// Shared state for the axum handler.
struct ServerState {
    handler: Arc<dyn WebhookHandler>,
}

/// Starts a TCP server on `addr` and registers the webhook handler for `path`.
///
/// The server runs on its own task until the returned [`ListenerHandle`] is
/// stopped or dropped.
pub async fn http_listen(
    addr: &str,
    path: &str,
    handler: Arc<dyn WebhookHandler>,
) -> TransportResult<ListenerHandle> {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| TransportError::BindFailed {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;
    let local_addr = listener.local_addr()?;

    let state = Arc::new(ServerState { handler });
    let router = Router::new()
        .route(&path, any(webhook))
        .layer(DefaultBodyLimit::disable())
        .with_state(state);

    let shutdown_token = CancellationToken::new();
    let token_clone = shutdown_token.clone();

    tokio::spawn(async move {
        let server = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { token_clone.cancelled().await });

        if let Err(e) = server.await {
            error!(error = %e, "HTTP server error");
        }
        info!(addr = %local_addr, "HTTP server stopped");
    });

    info!(addr = %local_addr, path = %path, "HTTP server listening");

    Ok(ListenerHandle::new(
        format!("http-server-{local_addr}{path}"),
        local_addr,
        shutdown_token,
    ))
}

/// Axum handler for the webhook route.
///
/// Only POST reaches the [`WebhookHandler`]; other methods are logged and
/// answered with an empty body.
async fn webhook(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    method: Method,
    body: Bytes,
) -> StatusCode {
    if method != Method::POST {
        warn!(
            method = %method,
            remote_addr = %addr,
            "Received a non-POST request, only POST is supported",
        );
        return StatusCode::OK;
    }

    debug!(remote_addr = %addr, len = body.len(), "Received HTTP POST");
    state.handler.on_message(&body).await;

    StatusCode::OK
}
