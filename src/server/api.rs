//! Request handlers and the JSON error envelope.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::constants;
use crate::gateway::GatewayError;
use crate::history::{HistoryError, SavePayload};
use crate::insight::InsightError;
use crate::orchestrator::AnalysisError;

use super::AppState;

/// A failed request. The message is what the client sees; details are
/// logged where the error is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(&'static str),
    Unauthorized,
    Internal(&'static str),
    Timeout(&'static str),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) | ApiError::Timeout(msg) => msg,
            ApiError::Unauthorized => "Unauthorized",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "success": false, "error": self.message() });
        (self.status(), Json(body)).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FetchRequest {
    #[serde(default)]
    repo_url: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    task: Option<Value>,
    #[serde(default)]
    signals: Option<Value>,
}

/// `POST /fetch`: locate, fetch and extract signals.
pub async fn fetch(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult {
    let request: FetchRequest = serde_json::from_slice(&body).unwrap_or_default();
    let url = request
        .repo_url
        .as_ref()
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::BadRequest("Valid GitHub repo URL required"))?;

    let (repo, signals) = state.orchestrator.fetch_signals(url).await.map_err(|e| match e {
        AnalysisError::InvalidUrl(_) => ApiError::BadRequest("Invalid GitHub repo URL format"),
        AnalysisError::Gateway(GatewayError::Timeout { .. }) => {
            ApiError::Timeout("GitHub API request timed out")
        }
        _ => ApiError::Internal("Failed to fetch repository"),
    })?;

    tracing::info!(repo = %repo, "served /fetch");
    Ok(Json(json!({
        "success": true,
        "owner": repo.owner,
        "repo": repo.name,
        "signals": signals,
    })))
}

/// `POST /analyze`: run one insight task over client-supplied signals.
pub async fn analyze(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult {
    let request: AnalyzeRequest = serde_json::from_slice(&body).unwrap_or_default();

    let signals = request
        .signals
        .filter(Value::is_object)
        .ok_or(ApiError::BadRequest("Repository signals are required"))?;
    let task = request
        .task
        .as_ref()
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::BadRequest("Analysis task is required"))?;

    let (task, output) = state
        .orchestrator
        .requestor()
        .request_named(task, &signals)
        .await
        .map_err(|e| match e {
            InsightError::UnknownTask(_) => ApiError::BadRequest("Unknown analysis task"),
            InsightError::InvalidSignals => ApiError::BadRequest("Repository signals are required"),
            InsightError::Timeout(_) => {
                tracing::error!(error = %e, "analysis request timed out");
                ApiError::Timeout("AI analysis timed out")
            }
            InsightError::Completion(_) => {
                tracing::error!(error = %e, "analysis request failed");
                ApiError::Internal("AI analysis failed")
            }
        })?;

    tracing::info!(%task, chars = output.len(), "served /analyze");
    Ok(Json(json!({
        "success": true,
        "task": task,
        "output": output,
    })))
}

/// `POST /history/save`: persist a completed analysis for the caller.
pub async fn history_save(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult {
    let identity = state.identity(&headers).ok_or(ApiError::Unauthorized)?;
    let history = state.history.as_ref().ok_or_else(|| {
        tracing::warn!("history save requested but history is disabled");
        ApiError::Internal("Failed to save analysis")
    })?;

    let payload: SavePayload =
        serde_json::from_slice(&body).map_err(|_| ApiError::BadRequest("Invalid payload"))?;

    let result = history
        .spawn_save(Some(identity), payload)
        .await
        .unwrap_or_else(|e| Err(HistoryError::Join(e.to_string())));

    match result {
        Ok(id) => Ok(Json(json!({ "success": true, "id": id }))),
        Err(HistoryError::Unauthorized) => Err(ApiError::Unauthorized),
        Err(HistoryError::InvalidPayload(_)) => Err(ApiError::BadRequest("Invalid payload")),
        Err(e) => {
            tracing::error!(error = %e, "failed to save analysis");
            Err(ApiError::Internal("Failed to save analysis"))
        }
    }
}

/// `GET /history/list`: the caller's most recent analyses, newest first.
pub async fn history_list(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResult {
    let identity = state.identity(&headers).ok_or(ApiError::Unauthorized)?;
    let history = state.history.clone().ok_or_else(|| {
        tracing::warn!("history list requested but history is disabled");
        ApiError::Internal("Failed to fetch history")
    })?;

    let result = tokio::task::spawn_blocking(move || {
        history.list(Some(identity.as_str()), constants::HISTORY_LIST_LIMIT)
    })
    .await
    .unwrap_or_else(|e| Err(HistoryError::Join(e.to_string())));

    match result {
        Ok(records) => Ok(Json(json!({ "success": true, "history": records }))),
        Err(HistoryError::Unauthorized) => Err(ApiError::Unauthorized),
        Err(e) => {
            tracing::error!(error = %e, "failed to list history");
            Err(ApiError::Internal("Failed to fetch history"))
        }
    }
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": constants::VERSION }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        assert_eq!(ApiError::BadRequest("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Internal("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Timeout("x").status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn unauthorized_message() {
        assert_eq!(ApiError::Unauthorized.message(), "Unauthorized");
        assert_eq!(
            ApiError::Internal("AI analysis failed").message(),
            "AI analysis failed"
        );
    }

    #[test]
    fn fetch_request_reads_camel_case() {
        let req: FetchRequest =
            serde_json::from_str(r#"{"repoUrl": "https://github.com/a/b"}"#).unwrap();
        assert_eq!(req.repo_url.unwrap(), "https://github.com/a/b");
    }
}
