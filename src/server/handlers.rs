use crate::present::{TablePage, TableParams, TableQuery};
use crate::server::{page, AppState};
use crate::snapshot::DashboardSnapshot;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, instrument, warn};

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    /// Always false
    pub success: bool,
}

impl ErrorResponse {
    fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub snapshot_age_secs: i64,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub last_updated: String,
    pub generated_at: DateTime<Utc>,
    pub warnings: Vec<String>,
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let snap = state.current().await;
    page::render(state.templates(), &snap, state.logo().is_some())
        .map(Html)
        .map_err(|e| {
            error!(error = %e, "rendering dashboard page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("RENDER_FAILED", e.to_string())),
            )
        })
}

#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snap = state.current().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: snap.generated_at,
        snapshot_age_secs: (Utc::now() - snap.generated_at).num_seconds(),
    })
}

pub async fn get_snapshot(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.current().await.as_ref().clone())
}

#[instrument(skip(state))]
pub async fn get_table(
    State(state): State<AppState>,
    params: Result<Query<TableParams>, QueryRejection>,
) -> Result<Json<TablePage>, ApiError> {
    let invalid = |e: String| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("INVALID_TABLE_QUERY", e)),
        )
    };
    let Query(params) = params.map_err(|e| invalid(e.body_text()))?;
    let query = TableQuery::from_params(params).map_err(invalid)?;
    let snap = state.current().await;
    Ok(Json(query.apply(&snap.table)))
}

pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, ApiError> {
    match state.refresh().await {
        Ok(snap) => Ok(Json(RefreshResponse {
            last_updated: snap.last_updated.clone(),
            generated_at: snap.generated_at,
            warnings: snap.warnings.clone(),
        })),
        Err(e) => {
            warn!(error = %e, "manual refresh failed; keeping previous snapshot");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new("REFRESH_FAILED", e.to_string())),
            ))
        }
    }
}

pub async fn logo(State(state): State<AppState>) -> Response {
    match state.logo() {
        Some(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes.to_vec()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
