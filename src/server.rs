use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::github::GitHubClient;
use crate::models::WrappedResponse;
use crate::wrapped::build_wrapped;

#[derive(Clone)]
pub struct AppState {
    pub github: Arc<GitHubClient>,
    pub events_max_pages: u32,
    pub repos_max_pages: u32,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            github: Arc::new(GitHubClient::new(config)?),
            events_max_pages: config.events_max_pages,
            repos_max_pages: config.repos_max_pages,
        })
    }
}

/// JSON error body: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wraps a pipeline failure for HTTP. Exactly one classification step:
/// not-found-shaped failures become 404, everything else 500.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            tracing::error!(error = %self.0, "wrapped request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/wrapped/{username}", get(wrapped))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct WrappedQuery {
    year: Option<i32>,
}

async fn wrapped(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<WrappedQuery>,
) -> std::result::Result<Json<WrappedResponse>, ApiError> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let report = build_wrapped(
        &state.github,
        &username,
        year,
        state.events_max_pages,
        state.repos_max_pages,
    )
    .await?;
    Ok(Json(report))
}
