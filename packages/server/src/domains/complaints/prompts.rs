//! Prompt text for semantic duplicate detection.

use std::fmt::Write;

use crate::domains::complaints::models::Complaint;

/// System instruction. `{threshold}` is replaced with the configured floor.
const SIMILARITY_SYSTEM_PROMPT: &str = r#"You are an AI assistant that analyzes student complaints to find similar or duplicate issues.
Analyze the target complaint and compare it with other complaints to identify semantic similarity.
Return your analysis as a JSON array with this exact structure:
[
  {
    "complaint_id": "uuid-string",
    "similarity_score": 0.0-1.0,
    "reason": "brief explanation"
  }
]
Only include complaints with similarity_score >= {threshold}. Return empty array [] if no similar complaints found."#;

pub fn similarity_system_prompt(threshold: f64) -> String {
    SIMILARITY_SYSTEM_PROMPT.replace("{threshold}", &threshold.to_string())
}

/// Cut `text` to at most `max_chars` characters without splitting one.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// User message: the target in full, then every candidate with an index,
/// its id, title, truncated description and category.
pub fn similarity_user_prompt(
    target: &Complaint,
    candidates: &[Complaint],
    description_limit: usize,
) -> String {
    let listing = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let mut entry = String::new();
            let _ = write!(
                entry,
                "\n[{idx}] ID: {}\nTitle: {}\nDescription: {}\nCategory: {}\n",
                c.id,
                c.title,
                truncate_chars(&c.description, description_limit),
                c.category,
            );
            entry
        })
        .collect::<Vec<_>>()
        .join("\n---\n");

    format!(
        "Target Complaint:\nTitle: {}\nDescription: {}\nCategory: {}\n\n\
         Other Complaints to Compare:\n{}\n\n\
         Identify complaints that are similar or duplicate to the target complaint. \
         Focus on semantic meaning, not just keyword matching.",
        target.title, target.description, target.category, listing
    )
}
