//! Duplicate detection endpoints.

use axum::{body::Bytes, extract::Extension, Json};
use serde::Deserialize;

use crate::domains::complaints::activities;
use crate::domains::complaints::{DuplicateMarkedResponse, SimilarComplaintsResponse};
use crate::kernel::ServerDeps;
use crate::server::error::{parse_json_body, ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindSimilarRequest {
    pub complaint_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkDuplicateRequest {
    pub duplicate_complaint_id: Option<String>,
    pub original_complaint_id: Option<String>,
}

/// `POST /functions/v1/find-similar-complaints`
pub async fn find_similar_handler(
    Extension(deps): Extension<ServerDeps>,
    body: Bytes,
) -> Result<Json<SimilarComplaintsResponse>, ApiError> {
    let request: FindSimilarRequest = parse_json_body(&body)?;
    let complaint_id = request.complaint_id.unwrap_or_default();

    let similar_complaints = activities::find_similar_complaints(&complaint_id, &deps).await?;

    Ok(Json(SimilarComplaintsResponse { similar_complaints }))
}

/// `POST /functions/v1/mark-duplicate`
pub async fn mark_duplicate_handler(
    Extension(deps): Extension<ServerDeps>,
    body: Bytes,
) -> Result<Json<DuplicateMarkedResponse>, ApiError> {
    let request: MarkDuplicateRequest = parse_json_body(&body)?;

    let response = activities::mark_duplicate(
        request.duplicate_complaint_id.as_deref().unwrap_or_default(),
        request.original_complaint_id.as_deref().unwrap_or_default(),
        &deps,
    )
    .await?;

    Ok(Json(response))
}
