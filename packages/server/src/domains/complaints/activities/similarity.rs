//! Similarity Finder - LLM-based duplicate detection
//!
//! The target and a bounded window of the newest other complaints go to
//! the model in one prompt. The answer is parsed leniently and every entry
//! is checked against the candidates that were actually sent: unknown ids
//! are dropped, scores outside `[threshold, 1]` are dropped, and a repeated
//! id keeps its best score.

use std::collections::HashMap;
use tracing::{debug, error, info, warn};

use crate::common::ComplaintId;
use crate::domains::complaints::data::SimilarComplaintData;
use crate::domains::complaints::error::ComplaintError;
use crate::domains::complaints::models::Complaint;
use crate::domains::complaints::parse::{parse_similarity_matches_or_empty, SimilarityMatch};
use crate::domains::complaints::prompts::{similarity_system_prompt, similarity_user_prompt};
use crate::kernel::ServerDeps;

use super::StudentDirectory;

/// Find complaints that look like duplicates of `raw_complaint_id`,
/// best match first.
pub async fn find_similar_complaints(
    raw_complaint_id: &str,
    deps: &ServerDeps,
) -> Result<Vec<SimilarComplaintData>, ComplaintError> {
    if raw_complaint_id.trim().is_empty() {
        return Err(ComplaintError::invalid_argument("complaintId is required"));
    }

    let Ok(target_id) = ComplaintId::parse(raw_complaint_id) else {
        return Err(ComplaintError::not_found("Complaint not found"));
    };

    let target = deps
        .store
        .find_complaint(target_id)
        .await
        .map_err(|e| {
            error!(complaint_id = %target_id, error = %e, "Error fetching target complaint");
            ComplaintError::upstream("Failed to fetch complaint")
        })?
        .ok_or_else(|| ComplaintError::not_found("Complaint not found"))?;

    let candidates: Vec<Complaint> = deps
        .store
        .list_recent_complaints(target_id, deps.similarity.candidate_window)
        .await
        .map_err(|e| {
            error!(complaint_id = %target_id, error = %e, "Error fetching other complaints");
            ComplaintError::upstream("Failed to fetch complaints")
        })?
        .into_iter()
        .filter(|c| c.id != target_id)
        .collect();

    if candidates.is_empty() {
        debug!(complaint_id = %target_id, "No other complaints to compare against");
        return Ok(Vec::new());
    }

    let students = StudentDirectory::load(candidates.iter().map(|c| c.student_id), deps).await;

    let system_prompt = similarity_system_prompt(deps.similarity.score_threshold);
    let user_prompt =
        similarity_user_prompt(&target, &candidates, deps.similarity.description_limit);

    info!(
        complaint_id = %target_id,
        candidates = candidates.len(),
        "Requesting AI similarity analysis"
    );

    let answer = deps
        .ai
        .complete_chat(&system_prompt, &user_prompt, deps.similarity.temperature)
        .await
        .map_err(|e| {
            if e.is_rate_limited() {
                warn!(complaint_id = %target_id, "AI gateway rate limited similarity analysis");
                ComplaintError::RateLimited
            } else {
                error!(complaint_id = %target_id, error = %e, "AI similarity analysis failed");
                ComplaintError::upstream("AI analysis failed")
            }
        })?;

    let matches = parse_similarity_matches_or_empty(&answer);
    let results = rank_matches(
        matches,
        &candidates,
        &students,
        deps.similarity.score_threshold,
    );

    info!(
        complaint_id = %target_id,
        similar = results.len(),
        "Similarity analysis complete"
    );

    Ok(results)
}

/// Resolve model answers against the candidates, keep valid scores, and
/// sort best first.
fn rank_matches(
    matches: Vec<SimilarityMatch>,
    candidates: &[Complaint],
    students: &StudentDirectory,
    threshold: f64,
) -> Vec<SimilarComplaintData> {
    let by_id: HashMap<ComplaintId, &Complaint> = candidates.iter().map(|c| (c.id, c)).collect();

    let mut best: HashMap<ComplaintId, SimilarityMatch> = HashMap::new();
    for m in matches {
        let score = m.similarity_score;
        if !(threshold..=1.0).contains(&score) {
            debug!(complaint_id = %m.complaint_id, score, "Dropping out-of-range similarity score");
            continue;
        }
        let Some(id) = ComplaintId::parse(&m.complaint_id)
            .ok()
            .filter(|id| by_id.contains_key(id))
        else {
            warn!(complaint_id = %m.complaint_id, "AI referenced a complaint that was not offered");
            continue;
        };
        let improves = best
            .get(&id)
            .map_or(true, |existing| score > existing.similarity_score);
        if improves {
            best.insert(id, m);
        }
    }

    // Candidate order is the tie-break, so equal scores come back newest first.
    let mut results: Vec<SimilarComplaintData> = candidates
        .iter()
        .filter_map(|c| {
            best.remove(&c.id).map(|m| {
                SimilarComplaintData::new(
                    c,
                    students.name(c.student_id),
                    m.similarity_score,
                    m.reason.unwrap_or_default(),
                )
            })
        })
        .collect();

    results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::complaints::models::ComplaintCategory;
    use crate::domains::complaints::SimilarityConfig;
    use crate::kernel::{MockAI, TestDependencies};
    use openai_client::OpenAIError;
    use serde_json::json;

    fn seeded() -> (TestDependencies, ComplaintId, ComplaintId, ComplaintId) {
        let deps = TestDependencies::new();
        let student = deps.store.add_profile("Ada", "ada@campus.edu");
        let x = deps.store.add_complaint(
            student,
            "Printer broken in lab 3",
            "The printer in lab 3 jams on every page",
            ComplaintCategory::Technology,
        );
        let y = deps.store.add_complaint(
            student,
            "Lab 3 printer not working",
            "Cannot print anything in lab 3",
            ComplaintCategory::Technology,
        );
        let z = deps.store.add_complaint(
            student,
            "Cafeteria closes too early",
            "Dinner ends at 6pm",
            ComplaintCategory::Facilities,
        );
        (deps, x, y, z)
    }

    fn with_answer(deps: TestDependencies, answer: serde_json::Value) -> TestDependencies {
        deps.mock_ai(MockAI::new().with_json_response(&answer))
    }

    #[tokio::test]
    async fn surfaces_semantic_duplicate_with_author_name() {
        let (deps, x, y, _) = seeded();
        let deps = with_answer(
            deps,
            json!([{"complaint_id": y.to_string(), "similarity_score": 0.92, "reason": "same printer"}]),
        );

        let results = find_similar_complaints(&x.to_string(), &deps.server_deps())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, y);
        assert_eq!(results[0].student_name, "Ada");
        assert_eq!(results[0].similarity_reason, "same printer");
        assert!(results[0].similarity_score >= 0.6);
    }

    #[tokio::test]
    async fn prompt_never_offers_the_target() {
        let (deps, x, y, z) = seeded();
        let server_deps = deps.server_deps();

        find_similar_complaints(&x.to_string(), &server_deps).await.unwrap();

        let call = &deps.ai.calls()[0];
        assert!(!call.user_prompt.contains(&format!("ID: {x}")));
        assert!(call.user_prompt.contains(&format!("ID: {y}")));
        assert!(call.user_prompt.contains(&format!("ID: {z}")));
        assert!((call.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn drops_unknown_ids_and_scores_below_threshold() {
        let (deps, x, y, z) = seeded();
        let deps = with_answer(
            deps,
            json!([
                {"complaint_id": ComplaintId::new().to_string(), "similarity_score": 0.99, "reason": "hallucinated"},
                {"complaint_id": x.to_string(), "similarity_score": 0.99, "reason": "itself"},
                {"complaint_id": "not-a-uuid", "similarity_score": 0.9, "reason": "junk"},
                {"complaint_id": z.to_string(), "similarity_score": 0.4, "reason": "weak"},
                {"complaint_id": y.to_string(), "similarity_score": 1.7, "reason": "out of range"},
            ]),
        );

        let results = find_similar_complaints(&x.to_string(), &deps.server_deps())
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn sorts_by_score_and_keeps_best_repeat() {
        let (deps, x, y, z) = seeded();
        let deps = with_answer(
            deps,
            json!([
                {"complaint_id": z.to_string(), "similarity_score": 0.65, "reason": "loosely"},
                {"complaint_id": y.to_string(), "similarity_score": 0.7, "reason": "first"},
                {"complaint_id": y.to_string(), "similarity_score": 0.95, "reason": "second"},
            ]),
        );

        let results = find_similar_complaints(&x.to_string(), &deps.server_deps())
            .await
            .unwrap();

        let ids: Vec<_> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![y, z]);
        assert_eq!(results[0].similarity_reason, "second");
    }

    #[tokio::test]
    async fn null_reason_does_not_discard_other_matches() {
        let (deps, x, y, z) = seeded();
        let deps = with_answer(
            deps,
            json!([
                {"complaint_id": y.to_string(), "similarity_score": 0.95, "reason": "same printer"},
                {"complaint_id": z.to_string(), "similarity_score": 0.7, "reason": null},
            ]),
        );

        let results = find_similar_complaints(&x.to_string(), &deps.server_deps())
            .await
            .unwrap();

        let ids: Vec<_> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![y, z]);
        assert_eq!(results[0].similarity_reason, "same printer");
        assert_eq!(results[1].similarity_reason, "");
    }

    #[tokio::test]
    async fn malformed_answer_means_no_matches() {
        let (deps, x, _, _) = seeded();
        let deps = deps.mock_ai(MockAI::new().with_response("```json\nnot json at all\n```"));

        let results = find_similar_complaints(&x.to_string(), &deps.server_deps())
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn missing_profile_uses_placeholder_name() {
        let deps = TestDependencies::new();
        let ghost = crate::common::ProfileId::new();
        let x = deps
            .store
            .add_complaint(ghost, "Wifi down", "No wifi", ComplaintCategory::Technology);
        let y = deps
            .store
            .add_complaint(ghost, "No wifi", "Wifi out", ComplaintCategory::Technology);
        deps.store.fail_profiles(true);
        let deps = with_answer(
            deps,
            json!([{"complaint_id": y.to_string(), "similarity_score": 0.8, "reason": "wifi"}]),
        );

        let results = find_similar_complaints(&x.to_string(), &deps.server_deps())
            .await
            .unwrap();

        assert_eq!(results[0].student_name, "Unknown");
    }

    #[tokio::test]
    async fn lone_complaint_skips_the_model() {
        let deps = TestDependencies::new();
        let x = deps.store.add_complaint(
            crate::common::ProfileId::new(),
            "Only one",
            "Nothing to compare",
            ComplaintCategory::Other,
        );

        let results = find_similar_complaints(&x.to_string(), &deps.server_deps())
            .await
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(deps.ai.call_count(), 0);
    }

    #[tokio::test]
    async fn candidate_window_is_bounded() {
        let (deps, x, _, z) = seeded();
        let deps = deps.similarity(SimilarityConfig {
            candidate_window: 1,
            ..SimilarityConfig::default()
        });
        let server_deps = deps.server_deps();

        find_similar_complaints(&x.to_string(), &server_deps).await.unwrap();

        let prompt = deps.ai.last_user_prompt().unwrap();
        assert!(prompt.contains(&format!("[0] ID: {z}")));
        assert!(!prompt.contains("[1] ID:"));
    }

    #[tokio::test]
    async fn error_mapping() {
        let (deps, x, _, _) = seeded();

        let missing = find_similar_complaints(" ", &deps.server_deps()).await;
        assert_eq!(
            missing.unwrap_err(),
            ComplaintError::InvalidArgument("complaintId is required".into())
        );

        let unknown =
            find_similar_complaints(&ComplaintId::new().to_string(), &deps.server_deps())
                .await;
        assert_eq!(
            unknown.unwrap_err(),
            ComplaintError::NotFound("Complaint not found".into())
        );

        let garbage = find_similar_complaints("abc", &deps.server_deps()).await;
        assert!(matches!(garbage, Err(ComplaintError::NotFound(_))));

        let limited = deps.clone().mock_ai(
            MockAI::new().with_error(OpenAIError::RateLimited("slow down".into())),
        );
        let err = find_similar_complaints(&x.to_string(), &limited.server_deps())
            .await
            .unwrap_err();
        assert_eq!(err, ComplaintError::RateLimited);

        let broken = deps.clone().mock_ai(MockAI::new().with_error(OpenAIError::Api {
            status: 502,
            message: "bad gateway".into(),
        }));
        let err = find_similar_complaints(&x.to_string(), &broken.server_deps())
            .await
            .unwrap_err();
        assert_eq!(err, ComplaintError::Upstream("AI analysis failed".into()));

        deps.store.fail_reads(true);
        let err = find_similar_complaints(&x.to_string(), &deps.server_deps())
            .await
            .unwrap_err();
        assert!(matches!(err, ComplaintError::Upstream(_)));
    }
}
