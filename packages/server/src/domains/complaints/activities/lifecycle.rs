//! Complaint lifecycle - filing, admin review, and bulk clean-up

use tracing::{error, info};

use crate::common::{ComplaintId, ProfileId};
use crate::domains::complaints::data::ComplaintData;
use crate::domains::complaints::error::ComplaintError;
use crate::domains::complaints::models::{
    Complaint, ComplaintCategory, ComplaintFilter, ComplaintReview, ComplaintStatus, NewComplaint,
};
use crate::kernel::ServerDeps;

use super::StudentDirectory;

/// Raw filing request, as received.
#[derive(Debug, Clone, Default)]
pub struct FileComplaint {
    pub student_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_urls: Vec<String>,
}

pub async fn create_complaint(
    input: FileComplaint,
    deps: &ServerDeps,
) -> Result<ComplaintData, ComplaintError> {
    let student_id = required(input.student_id.as_deref(), "student_id is required")?;
    let student_id = ProfileId::parse(student_id)
        .map_err(|_| ComplaintError::invalid_argument("student_id must be a UUID"))?;
    let title = required(input.title.as_deref(), "title is required")?;
    let description = required(input.description.as_deref(), "description is required")?;
    let category: ComplaintCategory = required(input.category.as_deref(), "category is required")?
        .parse()
        .map_err(ComplaintError::InvalidArgument)?;

    let complaint = deps
        .store
        .create_complaint(NewComplaint {
            student_id,
            title: title.to_string(),
            description: description.to_string(),
            category,
            image_urls: input.image_urls,
        })
        .await
        .map_err(|e| {
            error!(student_id = %student_id, error = %e, "Error creating complaint");
            ComplaintError::upstream("Failed to create complaint")
        })?;

    info!(complaint_id = %complaint.id, category = %category, "Complaint filed");

    annotate_one(complaint, deps).await
}

/// List complaints, newest first. `"all"` or an empty value means no filter.
pub async fn list_complaints(
    status: Option<&str>,
    category: Option<&str>,
    deps: &ServerDeps,
) -> Result<Vec<ComplaintData>, ComplaintError> {
    let filter = ComplaintFilter {
        status: filter_value::<ComplaintStatus>(status)?,
        category: filter_value::<ComplaintCategory>(category)?,
    };

    let complaints = deps.store.list_complaints(filter).await.map_err(|e| {
        error!(error = %e, "Error listing complaints");
        ComplaintError::upstream("Failed to fetch complaints")
    })?;

    let students = StudentDirectory::load(complaints.iter().map(|c| c.student_id), deps).await;

    Ok(complaints
        .into_iter()
        .map(|c| {
            let name = students.name(c.student_id);
            let email = students.email(c.student_id);
            ComplaintData::new(c, name, email)
        })
        .collect())
}

pub async fn get_complaint(
    raw_id: &str,
    deps: &ServerDeps,
) -> Result<ComplaintData, ComplaintError> {
    let id = parse_id(raw_id)?;

    let complaint = deps
        .store
        .find_complaint(id)
        .await
        .map_err(|e| {
            error!(complaint_id = %id, error = %e, "Error fetching complaint");
            ComplaintError::upstream("Failed to fetch complaint")
        })?
        .ok_or_else(|| ComplaintError::not_found("Complaint not found"))?;

    annotate_one(complaint, deps).await
}

/// Admin review: change status and/or resolution notes.
pub async fn update_complaint(
    raw_id: &str,
    status: Option<&str>,
    resolution_notes: Option<String>,
    deps: &ServerDeps,
) -> Result<ComplaintData, ComplaintError> {
    let id = parse_id(raw_id)?;
    let review = ComplaintReview {
        status: status
            .map(str::parse::<ComplaintStatus>)
            .transpose()
            .map_err(ComplaintError::InvalidArgument)?,
        resolution_notes,
    };
    if review.is_empty() {
        return Err(ComplaintError::invalid_argument("Nothing to update"));
    }

    let complaint = deps
        .store
        .update_complaint(id, review)
        .await
        .map_err(|e| {
            error!(complaint_id = %id, error = %e, "Error updating complaint");
            ComplaintError::upstream("Failed to update complaint")
        })?
        .ok_or_else(|| ComplaintError::not_found("Complaint not found"))?;

    info!(complaint_id = %id, status = %complaint.status, "Complaint reviewed");

    annotate_one(complaint, deps).await
}

/// Delete every resolved complaint. Returns how many were removed.
pub async fn clear_resolved(deps: &ServerDeps) -> Result<u64, ComplaintError> {
    let cleared = deps.store.clear_resolved().await.map_err(|e| {
        error!(error = %e, "Error clearing resolved complaints");
        ComplaintError::upstream("Failed to clear resolved complaints")
    })?;

    info!(cleared, "Cleared resolved complaints");
    Ok(cleared)
}

async fn annotate_one(
    complaint: Complaint,
    deps: &ServerDeps,
) -> Result<ComplaintData, ComplaintError> {
    let students = StudentDirectory::load([complaint.student_id], deps).await;
    let name = students.name(complaint.student_id);
    let email = students.email(complaint.student_id);
    Ok(ComplaintData::new(complaint, name, email))
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, ComplaintError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ComplaintError::invalid_argument(message))
}

fn parse_id(raw_id: &str) -> Result<ComplaintId, ComplaintError> {
    ComplaintId::parse(raw_id).map_err(|_| ComplaintError::not_found("Complaint not found"))
}

fn filter_value<T>(raw: Option<&str>) -> Result<Option<T>, ComplaintError>
where
    T: std::str::FromStr<Err = String>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v.parse().map(Some).map_err(ComplaintError::InvalidArgument),
    }
}
