//! HTTP API over the analysis pipeline and the history store.
//!
//! Identity is taken from a trusted header set by the authenticating
//! proxy in front of this service; the server itself does no auth.

pub mod api;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderMap;
use axum::routing::{get, post};

use crate::history::HistoryStore;
use crate::orchestrator::AnalysisOrchestrator;

/// Shared state for all handlers.
pub struct AppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub history: Option<Arc<HistoryStore>>,
    pub identity_header: String,
}

impl AppState {
    /// The caller's user id, if the identity header carries a non-blank value.
    pub fn identity(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(self.identity_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    }
}

/// Build the router with every endpoint mounted.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/fetch", post(api::fetch))
        .route("/analyze", post(api::analyze))
        .route("/history/save", post(api::history_save))
        .route("/history/list", get(api::history_list))
        .route("/health", get(api::health))
        .with_state(state)
}

/// Bind `bind` and serve until Ctrl-C.
pub async fn serve(state: Arc<AppState>, bind: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "serving HTTP API");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
