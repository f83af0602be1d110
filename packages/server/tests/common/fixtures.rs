//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use server_core::common::{ComplaintId, ProfileId};
use server_core::domains::complaints::models::{Complaint, ComplaintCategory, NewComplaint, Profile};
use sqlx::PgPool;

/// Create a student profile with a unique email
pub async fn create_test_profile(pool: &PgPool, name: &str) -> Result<ProfileId> {
    let id = ProfileId::new();
    let email = format!("{}@test.campus.edu", id);
    Profile::create(id, name, &email, pool).await?;
    Ok(id)
}

/// File a pending complaint
pub async fn create_test_complaint(
    pool: &PgPool,
    student_id: ProfileId,
    title: &str,
    description: &str,
) -> Result<ComplaintId> {
    let complaint = Complaint::create(
        &NewComplaint {
            student_id,
            title: title.to_string(),
            description: description.to_string(),
            category: ComplaintCategory::Technology,
            image_urls: vec![],
        },
        pool,
    )
    .await?;

    Ok(complaint.id)
}
