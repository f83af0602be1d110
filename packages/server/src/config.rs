use anyhow::{ensure, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::domains::complaints::SimilarityConfig;

/// Gateway the similarity prompts are sent to unless `AI_BASE_URL` is set.
pub const DEFAULT_AI_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1";

/// Model used for duplicate detection unless `AI_MODEL` is set.
pub const DEFAULT_AI_MODEL: &str = "google/gemini-2.5-flash";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub ai_api_key: String,
    pub ai_base_url: String,
    pub ai_model: String,
    pub similarity: SimilarityConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = SimilarityConfig::default();
        let similarity = SimilarityConfig {
            candidate_window: parse_or("SIMILARITY_CANDIDATE_WINDOW", defaults.candidate_window)?,
            description_limit: parse_or(
                "SIMILARITY_DESCRIPTION_LIMIT",
                defaults.description_limit,
            )?,
            score_threshold: parse_or("SIMILARITY_SCORE_THRESHOLD", defaults.score_threshold)?,
            temperature: parse_or("SIMILARITY_TEMPERATURE", defaults.temperature)?,
        };
        check_similarity(&similarity).context("Invalid similarity configuration")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_or("PORT", 8080)?,
            ai_api_key: env::var("AI_API_KEY").context("AI_API_KEY must be set")?,
            ai_base_url: env::var("AI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_AI_BASE_URL.to_string()),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string()),
            similarity,
        })
    }
}

/// Reported scores must stay within [0.6, 1.0], and the window is bound as a
/// SQL `LIMIT`.
fn check_similarity(similarity: &SimilarityConfig) -> Result<()> {
    ensure!(
        similarity.candidate_window >= 1,
        "SIMILARITY_CANDIDATE_WINDOW must be at least 1, got {}",
        similarity.candidate_window
    );
    ensure!(
        (0.6..=1.0).contains(&similarity.score_threshold),
        "SIMILARITY_SCORE_THRESHOLD must be between 0.6 and 1.0, got {}",
        similarity.score_threshold
    );
    ensure!(
        (0.0..=2.0).contains(&similarity.temperature),
        "SIMILARITY_TEMPERATURE must be between 0 and 2, got {}",
        similarity.temperature
    );
    Ok(())
}

/// Read `key` and parse it, falling back to `default` when unset.
fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}
