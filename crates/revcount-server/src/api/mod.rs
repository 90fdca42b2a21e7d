mod reviews;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use revcount_core::{ExtractionFailure, ExtractionResult, StrategyKind};
use revcount_scraper::ExtractionOrchestrator;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

const SERVICE_NAME: &str = "revcount";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ExtractionOrchestrator>,
    pub started_at: Instant,
}

/// Error responses in the same `{success: false, ...}` shape as failed
/// extractions.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed path parameter; nothing was fetched.
    BadRequest(String),
    /// The pipeline ran and produced a failure result.
    Extraction(ExtractionFailure),
}

#[derive(Debug, Serialize)]
struct BadRequestBody<'a> {
    success: bool,
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::BadRequest(error) => (
                StatusCode::BAD_REQUEST,
                Json(BadRequestBody {
                    success: false,
                    error: &error,
                }),
            )
                .into_response(),
            ApiError::Extraction(failure) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ExtractionResult::Failure(failure)),
            )
                .into_response(),
        }
    }
}

impl From<ExtractionFailure> for ApiError {
    fn from(failure: ExtractionFailure) -> Self {
        ApiError::Extraction(failure)
    }
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    timestamp: DateTime<Utc>,
    /// Seconds since the server started.
    uptime: f64,
    service: &'static str,
}

#[derive(Debug, Serialize)]
struct ServiceIndex {
    service: &'static str,
    version: &'static str,
    description: &'static str,
    strategies: Vec<StrategyKind>,
    endpoints: [&'static str; 5],
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/{place_id}/{date}", get(reviews::bare_count))
        .route("/api/reviews/{place_id}/count", get(reviews::count))
        .route(
            "/api/reviews/{place_id}/count/{date}",
            get(reviews::count_for_date),
        )
        .route("/api/reviews/{place_id}/dates", get(reviews::dates))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Json(ServiceIndex {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        description: "Counts restaurant visitor reviews per day from the public review listing",
        strategies: state.orchestrator.strategy_kinds(),
        endpoints: [
            "GET /health",
            "GET /{placeId}/{date}",
            "GET /api/reviews/{placeId}/count",
            "GET /api/reviews/{placeId}/count/{date}",
            "GET /api/reviews/{placeId}/dates",
        ],
    })
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthData {
        status: "OK",
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        service: SERVICE_NAME,
    })
}

#[cfg(test)]
mod tests;
