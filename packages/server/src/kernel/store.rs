// Postgres implementation of BaseComplaintStore
//
// Thin adapter over the model query methods.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::BaseComplaintStore;
use crate::common::{ComplaintId, ProfileId};
use crate::domains::complaints::models::{
    Complaint, ComplaintFilter, ComplaintReview, NewComplaint, Profile,
};

#[derive(Clone)]
pub struct PostgresComplaintStore {
    pool: PgPool,
}

impl PostgresComplaintStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseComplaintStore for PostgresComplaintStore {
    async fn find_complaint(&self, id: ComplaintId) -> Result<Option<Complaint>> {
        Complaint::find_by_id(id, &self.pool)
            .await
            .with_context(|| format!("Failed to load complaint {id}"))
    }

    async fn list_recent_complaints(
        &self,
        excluding: ComplaintId,
        limit: i64,
    ) -> Result<Vec<Complaint>> {
        Complaint::find_recent_excluding(excluding, limit, &self.pool)
            .await
            .context("Failed to list recent complaints")
    }

    async fn find_profile(&self, id: ProfileId) -> Result<Option<Profile>> {
        Profile::find_by_id(id, &self.pool)
            .await
            .with_context(|| format!("Failed to load profile {id}"))
    }

    async fn mark_duplicate(&self, duplicate: ComplaintId, original: ComplaintId) -> Result<()> {
        Complaint::mark_duplicate(duplicate, original, &self.pool).await
    }

    async fn create_complaint(&self, input: NewComplaint) -> Result<Complaint> {
        Complaint::create(&input, &self.pool)
            .await
            .context("Failed to insert complaint")
    }

    async fn list_complaints(&self, filter: ComplaintFilter) -> Result<Vec<Complaint>> {
        Complaint::list(filter, &self.pool)
            .await
            .context("Failed to list complaints")
    }

    async fn update_complaint(
        &self,
        id: ComplaintId,
        review: ComplaintReview,
    ) -> Result<Option<Complaint>> {
        Complaint::update_review(id, &review, &self.pool)
            .await
            .with_context(|| format!("Failed to update complaint {id}"))
    }

    async fn clear_resolved(&self) -> Result<u64> {
        Complaint::delete_resolved(&self.pool).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }
}
