use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use revcount_core::{CanonicalDate, DateListResult, ExtractionResult, ExtractionSuccess};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DateCountResponse {
    success: bool,
    place_id: String,
    target_date: CanonicalDate,
    count: usize,
    url: String,
    extracted_at: DateTime<Utc>,
}

fn parse_date(raw: &str) -> Result<CanonicalDate, ApiError> {
    raw.parse::<CanonicalDate>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn aggregate(
    state: &AppState,
    req_id: &RequestId,
    place_id: &str,
) -> Result<ExtractionSuccess, ApiError> {
    tracing::info!(request_id = %req_id.0, place_id, "review count requested");
    state
        .orchestrator
        .fetch_and_aggregate(place_id)
        .await
        .into_result()
        .map_err(ApiError::from)
}

pub(super) async fn count(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let success = aggregate(&state, &req_id, &place_id).await?;
    Ok(Json(ExtractionResult::Success(success)))
}

pub(super) async fn count_for_date(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((place_id, date)): Path<(String, String)>,
) -> Result<Json<DateCountResponse>, ApiError> {
    let target_date = parse_date(&date)?;
    let success = aggregate(&state, &req_id, &place_id).await?;
    Ok(Json(DateCountResponse {
        success: true,
        place_id,
        target_date,
        count: success.count_for(target_date),
        url: success.url().to_owned(),
        extracted_at: success.extracted_at(),
    }))
}

/// Plain JSON integer, for callers that only want the number.
pub(super) async fn bare_count(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((place_id, date)): Path<(String, String)>,
) -> Result<Json<usize>, ApiError> {
    let target_date = parse_date(&date)?;
    tracing::info!(
        request_id = %req_id.0,
        place_id = %place_id,
        date = %target_date,
        "bare count requested"
    );
    let count = state
        .orchestrator
        .fetch_and_count(&place_id, target_date)
        .await?;
    Ok(Json(count))
}

pub(super) async fn dates(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<Json<DateListResult>, ApiError> {
    tracing::info!(request_id = %req_id.0, place_id = %place_id, "review dates requested");
    match state.orchestrator.fetch_dates(&place_id).await {
        DateListResult::Failure(failure) => Err(failure.into()),
        success @ DateListResult::Success(_) => Ok(Json(success)),
    }
}
