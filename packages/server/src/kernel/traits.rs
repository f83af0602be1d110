// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (what to prompt for, which links are allowed) lives in
// the complaints domain and only talks to these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseComplaintStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{ComplaintId, ProfileId};
use crate::domains::complaints::models::{
    Complaint, ComplaintFilter, ComplaintReview, NewComplaint, Profile,
};

// =============================================================================
// AI Trait (Infrastructure - chat completion)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Send one system + user exchange and return the raw generated text.
    ///
    /// Errors keep the gateway's classification so callers can tell a
    /// rate limit apart from other failures.
    async fn complete_chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> openai_client::Result<String>;
}

// =============================================================================
// Complaint Store Trait (Infrastructure - relational data)
// =============================================================================

#[async_trait]
pub trait BaseComplaintStore: Send + Sync {
    /// Point lookup. `Ok(None)` when no row matches.
    async fn find_complaint(&self, id: ComplaintId) -> Result<Option<Complaint>>;

    /// Up to `limit` complaints other than `excluding`, newest first.
    async fn list_recent_complaints(
        &self,
        excluding: ComplaintId,
        limit: i64,
    ) -> Result<Vec<Complaint>>;

    async fn find_profile(&self, id: ProfileId) -> Result<Option<Profile>>;

    /// Set `is_duplicate = true, duplicate_of = original` on `duplicate`.
    async fn mark_duplicate(&self, duplicate: ComplaintId, original: ComplaintId) -> Result<()>;

    async fn create_complaint(&self, input: NewComplaint) -> Result<Complaint>;

    /// All complaints matching `filter`, newest first.
    async fn list_complaints(&self, filter: ComplaintFilter) -> Result<Vec<Complaint>>;

    async fn update_complaint(
        &self,
        id: ComplaintId,
        review: ComplaintReview,
    ) -> Result<Option<Complaint>>;

    /// Delete resolved complaints, unlinking any duplicates that pointed at them.
    async fn clear_resolved(&self) -> Result<u64>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> Result<()>;
}
