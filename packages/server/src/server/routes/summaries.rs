//! The five-route CRUD surface over summary records.

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use url::Url;

use crate::common::{ApiError, ApiJson, ApiPath, FieldError};
use crate::domains::summaries::data::{SummaryCreatedData, SummaryData};
use crate::domains::summaries::jobs::GenerateSummaryJob;
use crate::domains::summaries::models::Summary;
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct SummaryPayload {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryUpdatePayload {
    pub url: Option<String>,
    pub summary: Option<String>,
}

/// POST /summaries/
///
/// Persists a record with an empty summary and enqueues the enrichment
/// job before returning; the job itself runs after this response is sent.
pub async fn create_summary(
    Extension(state): Extension<AppState>,
    ApiJson(payload): ApiJson<SummaryPayload>,
) -> Result<(StatusCode, Json<SummaryCreatedData>), ApiError> {
    let url = require_url(payload.url.as_deref())?;

    let record = Summary::create(url.as_str(), &state.deps.db_pool).await?;

    state
        .deps
        .job_queue
        .enqueue(&GenerateSummaryJob {
            summary_id: record.id,
            url: record.url.clone(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(SummaryCreatedData::from(record))))
}

/// GET /summaries/{id}/
pub async fn read_summary(
    Extension(state): Extension<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<SummaryData>, ApiError> {
    require_positive_id(id)?;

    let record = Summary::find_by_id(id, &state.deps.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Summary not found"))?;

    Ok(Json(SummaryData::from(record)))
}

/// GET /summaries/
pub async fn read_all_summaries(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<SummaryData>>, ApiError> {
    let records = Summary::find_all(&state.deps.db_pool).await?;
    Ok(Json(records.into_iter().map(SummaryData::from).collect()))
}

/// PUT /summaries/{id}/
pub async fn update_summary(
    Extension(state): Extension<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<SummaryUpdatePayload>,
) -> Result<Json<SummaryData>, ApiError> {
    require_positive_id(id)?;

    // Report all missing fields at once
    let mut missing = Vec::new();
    if payload.url.is_none() {
        missing.push(FieldError::new("url", "field required"));
    }
    if payload.summary.is_none() {
        missing.push(FieldError::new("summary", "field required"));
    }
    if !missing.is_empty() {
        return Err(ApiError::Validation(missing));
    }

    let url = validate_url(payload.url.as_deref().unwrap_or_default())?;
    let summary = payload.summary.unwrap_or_default();

    let record = Summary::update(id, url.as_str(), &summary, &state.deps.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Summary not found"))?;

    Ok(Json(SummaryData::from(record)))
}

/// DELETE /summaries/{id}/
pub async fn delete_summary(
    Extension(state): Extension<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<SummaryCreatedData>, ApiError> {
    require_positive_id(id)?;

    let record = Summary::delete(id, &state.deps.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Summary not found"))?;

    Ok(Json(SummaryCreatedData::from(record)))
}

fn require_positive_id(id: i64) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::validation("id", "must be greater than 0"));
    }
    Ok(())
}

fn require_url(url: Option<&str>) -> Result<Url, ApiError> {
    match url {
        Some(url) => validate_url(url),
        None => Err(ApiError::validation("url", "field required")),
    }
}

/// Only well-formed http/https URLs are accepted.
fn validate_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw)
        .map_err(|_| ApiError::validation("url", "URL is malformed"))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ApiError::validation(
            "url",
            format!("URL scheme should be http or https, not {}", scheme),
        )),
    }
}
