use serde::{Deserialize, Serialize};

use crate::common::{ComplaintId, ProfileId};
use crate::domains::complaints::models::{Complaint, ComplaintCategory, ComplaintStatus};

/// API representation of a complaint, annotated with its author
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintData {
    pub id: ComplaintId,
    pub student_id: ProfileId,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub status: ComplaintStatus,
    pub resolution_notes: Option<String>,
    pub image_urls: Vec<String>,
    pub is_duplicate: bool,
    pub duplicate_of: Option<ComplaintId>,
    pub created_at: String,
    pub updated_at: String,

    // Author
    pub student_name: String,
    pub student_email: String,
}

impl ComplaintData {
    pub fn new(complaint: Complaint, student_name: String, student_email: String) -> Self {
        Self {
            id: complaint.id,
            student_id: complaint.student_id,
            title: complaint.title,
            description: complaint.description,
            category: complaint.category,
            status: complaint.status,
            resolution_notes: complaint.resolution_notes,
            image_urls: complaint.image_urls,
            is_duplicate: complaint.is_duplicate,
            duplicate_of: complaint.duplicate_of,
            created_at: complaint.created_at.to_rfc3339(),
            updated_at: complaint.updated_at.to_rfc3339(),
            student_name,
            student_email,
        }
    }
}

/// One entry of a similarity answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarComplaintData {
    pub id: ComplaintId,
    pub title: String,
    /// Full description, not the truncated prompt text
    pub description: String,
    pub category: ComplaintCategory,
    pub status: ComplaintStatus,
    pub created_at: String,
    pub student_name: String,
    pub similarity_score: f64,
    pub similarity_reason: String,
}

impl SimilarComplaintData {
    pub fn new(complaint: &Complaint, student_name: String, score: f64, reason: String) -> Self {
        Self {
            id: complaint.id,
            title: complaint.title.clone(),
            description: complaint.description.clone(),
            category: complaint.category,
            status: complaint.status,
            created_at: complaint.created_at.to_rfc3339(),
            student_name,
            similarity_score: score,
            similarity_reason: reason,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarComplaintsResponse {
    pub similar_complaints: Vec<SimilarComplaintData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMarkedResponse {
    pub success: bool,
    pub message: String,
    pub duplicate_complaint_id: ComplaintId,
    pub original_complaint_id: ComplaintId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearedResponse {
    pub cleared: u64,
}
