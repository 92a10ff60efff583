//! HTTP route handlers.

use std::any::Any;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::service::{DEFAULT_COUNT, clamp_count};
use crate::soap::SoapTransport;

use super::dto::*;
use super::state::AppState;

/// Platform used when the request names none.
const DEFAULT_PLATFORM: &str = "1";

/// Create the application router.
pub fn create_router<T: SoapTransport + 'static>(state: AppState<T>) -> Router {
    Router::new()
        .route("/api/stop-times", get(stop_times::<T>))
        .route("/api/health", get(health))
        .route("/api/debug", get(debug::<T>))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Upcoming departures for a platform.
async fn stop_times<T: SoapTransport + 'static>(
    State(state): State<AppState<T>>,
    Query(query): Query<StopTimesQuery>,
) -> Result<Json<StopTimesResponse>, AppError> {
    let platform = parse_platform(query.platform.as_deref())?;
    let count = parse_count(query.count.as_deref());

    let stop_times = state.service.get_stop_times(&platform, count).await;
    Ok(Json(StopTimesResponse::from_stop_times(&stop_times)))
}

/// Raw view of both upstream sources.
async fn debug<T: SoapTransport + 'static>(
    State(state): State<AppState<T>>,
    Query(query): Query<StopTimesQuery>,
) -> Result<Json<DebugResponse>, AppError> {
    let platform = parse_platform(query.platform.as_deref())?;
    let count = parse_count(query.count.as_deref());

    let report = state.service.debug(&platform, count).await;
    Ok(Json(DebugResponse::new(platform, count, report)))
}

/// Validate the `platform` parameter.
///
/// Missing or blank means the default platform. Otherwise it must be one
/// or more digit runs separated by `;`, such as `1` or `1;2`.
///
/// The value is placed verbatim inside the upstream request envelope, so
/// anything else is rejected with a 400 rather than forwarded.
pub fn parse_platform(raw: Option<&str>) -> Result<String, AppError> {
    let platform = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_PLATFORM.to_string()),
        Some(p) => p,
    };

    let valid = platform
        .split(';')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
    if !valid {
        return Err(AppError::BadRequest {
            message: format!("Invalid platform: {platform}"),
        });
    }
    Ok(platform.to_string())
}

/// Read the `count` parameter, defaulting when missing or not a number.
pub fn parse_count(raw: Option<&str>) -> usize {
    raw.and_then(|c| c.trim().parse::<i64>().ok())
        .map(clamp_count)
        .unwrap_or(DEFAULT_COUNT)
}

fn handle_panic(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("handler panicked");
    AppError::Internal {
        message: "internal error".to_string(),
    }
    .into_response()
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
