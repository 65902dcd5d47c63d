use std::path::PathBuf;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use idx_common::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::dispatcher;
use crate::query;
use crate::state::AppState;
use crate::status;

/// Maps the crate's error kinds onto the status-code split demanded by
/// §7: client faults are 4xx, transient infrastructure problems are 5xx.
/// Every failing response carries `{"detail": string}`.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_fault() {
            StatusCode::BAD_REQUEST
        } else {
            match &self.0 {
                Error::NoWorkersAvailable | Error::BrokerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                Error::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/trigger-local-indexing/", post(trigger_local_indexing))
        .route("/search/", post(search))
        .route("/index-status/", get(index_status))
        .route("/index/save/", post(index_save))
        .route("/index/load/", post(index_load))
        .route("/healthz", get(healthz))
        .route("/workers/status/", get(workers_status))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TriggerIndexingForm {
    path: Option<String>,
}

async fn trigger_local_indexing(
    State(state): State<AppState>,
    Form(form): Form<TriggerIndexingForm>,
) -> Result<Response, ApiError> {
    let dir: PathBuf = form
        .path
        .map(PathBuf::from)
        .unwrap_or_else(|| state.config.uploads_path.clone());

    let report = dispatcher::trigger_indexing(state.broker.as_ref(), &state.pending, &dir).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "message": "indexing triggered",
            "details": {
                "successful_dispatches": report.successful_dispatches,
                "failed_files": report.failed_files,
                "docs_currently_pending": report.pending_count,
            }
        })),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    term: String,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    docs: Vec<(String, u32)>,
}

async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    if req.term.trim().is_empty() {
        return Err(Error::InputInvalid("term must not be empty".to_string()).into());
    }

    let docs = query::search(&state.index, &req.term, state.language);
    Ok(Json(SearchResponse { docs }))
}

async fn index_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "ok",
        "details": {
            "total_terms_in_index": state.index.total_terms(),
            "documents_pending_results": state.pending.len(),
        }
    }))
}

async fn index_save(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state.index.save(&state.config.index_path)?;
    Ok(Json(json!({ "message": "index saved" })))
}

async fn index_load(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state.index.load(&state.config.index_path)?;
    Ok(Json(json!({ "message": "index loaded" })))
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "message": "ok" }))
}

async fn workers_status(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let workers = status::list_workers(state.broker.as_ref()).await?;
    Ok(Json(json!({ "workers": workers })))
}
