use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use crate::common::{ComplaintId, ProfileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "complaint_category", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintCategory {
    Facilities,
    Academic,
    Administration,
    Harassment,
    Technology,
    Other,
}

impl ComplaintCategory {
    pub const ALL: [ComplaintCategory; 6] = [
        ComplaintCategory::Facilities,
        ComplaintCategory::Academic,
        ComplaintCategory::Administration,
        ComplaintCategory::Harassment,
        ComplaintCategory::Technology,
        ComplaintCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintCategory::Facilities => "facilities",
            ComplaintCategory::Academic => "academic",
            ComplaintCategory::Administration => "administration",
            ComplaintCategory::Harassment => "harassment",
            ComplaintCategory::Technology => "technology",
            ComplaintCategory::Other => "other",
        }
    }
}

impl fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown complaint category: {wanted}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "complaint_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in-progress",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown complaint status: {wanted}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Complaint {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a student supplies when filing a complaint.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub student_id: ProfileId,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub image_urls: Vec<String>,
}

/// Admin review edits. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ComplaintReview {
    pub status: Option<ComplaintStatus>,
    pub resolution_notes: Option<String>,
}

impl ComplaintReview {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.resolution_notes.is_none()
    }
}

/// Dashboard filter. `None` matches everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub category: Option<ComplaintCategory>,
}

impl ComplaintFilter {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.status.map_or(true, |s| complaint.status == s)
            && self.category.map_or(true, |c| complaint.category == c)
    }
}

// =============================================================================
// Complaint Queries
// =============================================================================

impl Complaint {
    pub async fn find_by_id(id: ComplaintId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM complaints WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Newest complaints first, never including `excluding`.
    pub async fn find_recent_excluding(
        excluding: ComplaintId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT *
            FROM complaints
            WHERE id <> $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(excluding)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(input: &NewComplaint, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO complaints (student_id, title, description, category, image_urls, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(input.student_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.category)
        .bind(&input.image_urls)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list(filter: ComplaintFilter, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT *
            FROM complaints
            WHERE ($1::complaint_status IS NULL OR status = $1)
              AND ($2::complaint_category IS NULL OR category = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.status)
        .bind(filter.category)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update_review(
        id: ComplaintId,
        review: &ComplaintReview,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE complaints
            SET status = COALESCE($2, status),
                resolution_notes = COALESCE($3, resolution_notes),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(review.status)
        .bind(review.resolution_notes.as_deref())
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Persist a one-level duplicate link on `duplicate`.
    pub async fn mark_duplicate(
        duplicate: ComplaintId,
        original: ComplaintId,
        pool: &PgPool,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE complaints
            SET is_duplicate = true, duplicate_of = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(duplicate)
        .bind(original)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("complaint {duplicate} no longer exists");
        }
        Ok(())
    }

    /// Delete every resolved complaint, returning how many were removed.
    ///
    /// Surviving complaints that pointed at a deleted original go back to
    /// being originals, in the same transaction.
    pub async fn delete_resolved(pool: &PgPool) -> Result<u64> {
        let mut tx = pool.begin().await.context("Failed to open transaction")?;

        let unlinked = sqlx::query(
            r#"
            UPDATE complaints
            SET is_duplicate = false, duplicate_of = NULL, updated_at = now()
            WHERE status <> 'resolved'
              AND duplicate_of IN (SELECT id FROM complaints WHERE status = 'resolved')
            "#,
        )
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let deleted = sqlx::query("DELETE FROM complaints WHERE status = 'resolved'")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await.context("Failed to commit clear-resolved")?;

        tracing::debug!(deleted, unlinked, "Cleared resolved complaints");
        Ok(deleted)
    }
}
