//! Duplicate Marker - link a complaint to the original it repeats
//!
//! Checks run in a fixed order and stop at the first failure: both ids
//! present, not the same id, original exists and is an original, duplicate
//! exists and is not yet linked. Only then is the link written.

use tracing::{error, info};

use crate::common::ComplaintId;
use crate::domains::complaints::data::DuplicateMarkedResponse;
use crate::domains::complaints::duplicate_link::{self, LinkCandidate, LinkViolation};
use crate::domains::complaints::error::ComplaintError;
use crate::domains::complaints::models::Complaint;
use crate::kernel::ServerDeps;

pub const DUPLICATE_MARKED_MESSAGE: &str = "Complaint marked as duplicate successfully";

pub async fn mark_duplicate(
    raw_duplicate_id: &str,
    raw_original_id: &str,
    deps: &ServerDeps,
) -> Result<DuplicateMarkedResponse, ComplaintError> {
    if raw_duplicate_id.trim().is_empty() || raw_original_id.trim().is_empty() {
        return Err(ComplaintError::invalid_argument(
            "Both duplicateComplaintId and originalComplaintId are required",
        ));
    }
    if raw_duplicate_id == raw_original_id {
        return Err(LinkViolation::SelfReference.into());
    }

    let original = load(raw_original_id, "Original complaint not found", deps).await?;
    let original = LinkCandidate::from(&original);
    duplicate_link::check_original(&original)?;

    let duplicate = load(
        raw_duplicate_id,
        "Complaint to mark as duplicate not found",
        deps,
    )
    .await?;
    let duplicate = LinkCandidate::from(&duplicate);

    // Also catches the same id spelled two ways.
    let new_state = duplicate_link::link(&duplicate, &original)?;

    deps.store
        .mark_duplicate(duplicate.id, original.id)
        .await
        .map_err(|e| {
            error!(
                duplicate_id = %duplicate.id,
                original_id = %original.id,
                error = %e,
                "Error marking complaint as duplicate"
            );
            ComplaintError::upstream(format!("Failed to mark complaint as duplicate: {e}"))
        })?;

    info!(
        duplicate_id = %duplicate.id,
        original_id = %original.id,
        state = ?new_state,
        "Marked complaint as duplicate"
    );

    Ok(DuplicateMarkedResponse {
        success: true,
        message: DUPLICATE_MARKED_MESSAGE.to_string(),
        duplicate_complaint_id: duplicate.id,
        original_complaint_id: original.id,
    })
}

/// Fetch a complaint by raw id. Unparseable and unknown ids are both
/// reported with `not_found_message`.
async fn load(
    raw_id: &str,
    not_found_message: &str,
    deps: &ServerDeps,
) -> Result<Complaint, ComplaintError> {
    let Ok(id) = ComplaintId::parse(raw_id) else {
        return Err(ComplaintError::not_found(not_found_message));
    };

    deps.store
        .find_complaint(id)
        .await
        .map_err(|e| {
            error!(complaint_id = %id, error = %e, "Error fetching complaint");
            ComplaintError::upstream("Failed to fetch complaint")
        })?
        .ok_or_else(|| ComplaintError::not_found(not_found_message))
}
