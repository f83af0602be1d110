//! Lenient parsing of the model's similarity answer.
//!
//! Two stages: [`strip_code_fence`] unwraps an optional markdown fence, then
//! [`parse_similarity_matches`] decodes the JSON array. Entries are decoded
//! one at a time, so a malformed entry is dropped without losing its
//! neighbours. Callers that must not fail use
//! [`parse_similarity_matches_or_empty`], which turns a non-array answer into
//! "no matches".

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

const FENCE: &str = "```";

/// One entry of the model's answer, before it is checked against the
/// candidates that were actually sent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimilarityMatch {
    pub complaint_id: String,
    pub similarity_score: f64,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Return the body of the first fenced code block, or the trimmed input when
/// there is no complete fence.
///
/// An optional `json` language tag after the opening fence is dropped.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(open) = trimmed.find(FENCE) else {
        return trimmed;
    };
    let after_open = &trimmed[open + FENCE.len()..];
    let Some(close) = after_open.find(FENCE) else {
        return trimmed;
    };

    let body = &after_open[..close];
    let body = match body.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
        _ => body,
    };
    body.trim()
}

/// Decode the model's answer as a JSON array of matches.
///
/// Fails only when the answer is not a JSON array. Elements that do not
/// decode as a [`SimilarityMatch`] are skipped.
pub fn parse_similarity_matches(text: &str) -> Result<Vec<SimilarityMatch>, serde_json::Error> {
    let entries: Vec<Value> = serde_json::from_str(strip_code_fence(text))?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(m) => Some(m),
            Err(e) => {
                debug!(error = %e, entry = %entry, "Skipping malformed similarity entry");
                None
            }
        })
        .collect())
}

/// Like [`parse_similarity_matches`], but a malformed answer yields an empty
/// list.
pub fn parse_similarity_matches_or_empty(text: &str) -> Vec<SimilarityMatch> {
    match parse_similarity_matches(text) {
        Ok(matches) => matches,
        Err(e) => {
            warn!(
                error = %e,
                response_preview = %preview(text),
                "Failed to parse AI similarity response, treating as no matches"
            );
            Vec::new()
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}
