pub mod activities;
pub mod data;
pub mod duplicate_link;
pub mod error;
pub mod models;
pub mod parse;
pub mod prompts;

// Re-export data types (API shapes)
pub use data::complaint::{
    ClearedResponse, ComplaintData, DuplicateMarkedResponse, SimilarComplaintData,
    SimilarComplaintsResponse,
};

pub use duplicate_link::{check_duplicate_link, DuplicateState, LinkCandidate, LinkViolation};
pub use error::ComplaintError;

// Re-export models (domain models)
pub use models::{
    Complaint, ComplaintCategory, ComplaintFilter, ComplaintReview, ComplaintStatus,
    NewComplaint, Profile,
};

/// Tuning for the Similarity Finder.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityConfig {
    /// How many of the newest other complaints are compared.
    pub candidate_window: i64,
    /// Candidate descriptions are cut to this many characters in the prompt.
    pub description_limit: usize,
    /// Lowest score that is reported.
    pub score_threshold: f64,
    pub temperature: f32,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            candidate_window: 50,
            description_limit: 300,
            score_threshold: 0.6,
            temperature: 0.3,
        }
    }
}
