//! Complaints domain activities - entry-point business logic
//!
//! Called from the HTTP routes.
//! Activities are self-contained: they take raw input, handle ID parsing,
//! and return final data/results.

pub mod duplicates;
pub mod lifecycle;
pub mod similarity;

use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::common::ProfileId;
use crate::domains::complaints::models::{Profile, UNKNOWN_STUDENT_EMAIL, UNKNOWN_STUDENT_NAME};
use crate::kernel::ServerDeps;

pub use duplicates::mark_duplicate;
pub use lifecycle::{
    clear_resolved, create_complaint, get_complaint, list_complaints, update_complaint,
    FileComplaint,
};
pub use similarity::find_similar_complaints;

/// Profiles of the given students, looked up concurrently.
///
/// Best-effort: a failed or empty lookup leaves the student out and
/// [`StudentDirectory::name`] falls back to a placeholder.
pub(crate) struct StudentDirectory {
    profiles: HashMap<ProfileId, Profile>,
}

impl StudentDirectory {
    pub(crate) async fn load(
        student_ids: impl IntoIterator<Item = ProfileId>,
        deps: &ServerDeps,
    ) -> Self {
        let distinct: HashSet<ProfileId> = student_ids.into_iter().collect();

        let lookups = distinct.into_iter().map(|id| async move {
            match deps.store.find_profile(id).await {
                Ok(profile) => profile,
                Err(e) => {
                    warn!(student_id = %id, error = %e, "Profile lookup failed");
                    None
                }
            }
        });

        let profiles = join_all(lookups)
            .await
            .into_iter()
            .flatten()
            .map(|p| (p.id, p))
            .collect();

        Self { profiles }
    }

    pub(crate) fn name(&self, id: ProfileId) -> String {
        self.profiles
            .get(&id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| UNKNOWN_STUDENT_NAME.to_string())
    }

    pub(crate) fn email(&self, id: ProfileId) -> String {
        self.profiles
            .get(&id)
            .map(|p| p.email.clone())
            .unwrap_or_else(|| UNKNOWN_STUDENT_EMAIL.to_string())
    }
}
