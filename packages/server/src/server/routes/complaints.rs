//! Complaint lifecycle endpoints.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::domains::complaints::activities::{self, FileComplaint};
use crate::domains::complaints::{ClearedResponse, ComplaintData};
use crate::kernel::ServerDeps;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateComplaintRequest {
    pub student_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListComplaintsQuery {
    pub status: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateComplaintRequest {
    pub status: Option<String>,
    pub resolution_notes: Option<String>,
}

/// `POST /complaints`
pub async fn create_complaint_handler(
    Extension(deps): Extension<ServerDeps>,
    body: Result<Json<CreateComplaintRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ComplaintData>), ApiError> {
    let Json(request) = body?;

    let created = activities::create_complaint(
        FileComplaint {
            student_id: request.student_id,
            title: request.title,
            description: request.description,
            category: request.category,
            image_urls: request.image_urls,
        },
        &deps,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /complaints?status=&category=`
pub async fn list_complaints_handler(
    Extension(deps): Extension<ServerDeps>,
    query: Result<Query<ListComplaintsQuery>, QueryRejection>,
) -> Result<Json<Vec<ComplaintData>>, ApiError> {
    let Query(query) = query?;

    let complaints = activities::list_complaints(
        query.status.as_deref(),
        query.category.as_deref(),
        &deps,
    )
    .await?;

    Ok(Json(complaints))
}

/// `GET /complaints/{id}`
pub async fn get_complaint_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<String>,
) -> Result<Json<ComplaintData>, ApiError> {
    Ok(Json(activities::get_complaint(&id, &deps).await?))
}

/// `PATCH /complaints/{id}`
pub async fn update_complaint_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<String>,
    body: Result<Json<UpdateComplaintRequest>, JsonRejection>,
) -> Result<Json<ComplaintData>, ApiError> {
    let Json(request) = body?;

    let updated = activities::update_complaint(
        &id,
        request.status.as_deref(),
        request.resolution_notes,
        &deps,
    )
    .await?;

    Ok(Json(updated))
}

/// `POST /complaints/clear-resolved`
pub async fn clear_resolved_handler(
    Extension(deps): Extension<ServerDeps>,
) -> Result<Json<ClearedResponse>, ApiError> {
    let cleared = activities::clear_resolved(&deps).await?;
    Ok(Json(ClearedResponse { cleared }))
}
