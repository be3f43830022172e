//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{debug, error, warn};

use crate::domain::{LegRecord, LocationCode};
use crate::planner::{Planner, SearchError};
use crate::query::TripQuery;

use super::dto::*;
use super::state::{AppState, ReloadError};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/legs", get(list_legs))
        .route("/legs/reload", post(reload_legs))
        .route("/trip/plan", post(plan_trip))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List legs in the current snapshot, optionally only those from one origin.
async fn list_legs(
    State(state): State<AppState>,
    Query(params): Query<LegsQuery>,
) -> Result<Json<LegsResponse>, AppError> {
    let store = state.snapshot().await;

    let mut legs: Vec<LegRecord> = match params.origin.as_deref() {
        Some(origin) => {
            let origin =
                LocationCode::parse_normalized(origin).map_err(|e| AppError::BadRequest {
                    message: e.to_string(),
                })?;
            store.legs_from(&origin).iter().map(|l| l.to_record()).collect()
        }
        None => store.iter().map(|l| l.to_record()).collect(),
    };
    legs.sort_by(|a, b| {
        (&a.origin, &a.date, &a.destination).cmp(&(&b.origin, &b.date, &b.destination))
    });

    Ok(Json(LegsResponse {
        count: legs.len(),
        legs,
    }))
}

/// Rebuild the leg store from the cache.
async fn reload_legs(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let (legs, rejected) = state.reload().await?;
    Ok(Json(ReloadResponse { legs, rejected }))
}

/// Plan the cheapest trip for a query.
async fn plan_trip(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlanTripResponse>, AppError> {
    // Parse JSON manually so malformed queries get a 400 with a message
    let query: TripQuery = serde_json::from_slice(&body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(&body), "Rejected trip query");
        AppError::BadRequest {
            message: format!("Invalid query: {e}"),
        }
    })?;
    let request = query.into_request();

    let legs = state.snapshot().await;
    let config = state.config.clone();

    // The search is CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || {
        Planner::new(&legs, &config).search(&request)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("search task failed: {e}"),
    })??;

    Ok(Json(PlanTripResponse::from(result)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(_) => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<ReloadError> for AppError {
    fn from(e: ReloadError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
