use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::ProfileId;

/// Display name used when a student's profile row is missing.
pub const UNKNOWN_STUDENT_NAME: &str = "Unknown";

/// Email shown when a student's profile row is missing.
pub const UNKNOWN_STUDENT_EMAIL: &str = "N/A";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub async fn find_by_id(id: ProfileId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(id: ProfileId, name: &str, email: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO profiles (id, name, email) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
