//! Server dependencies for the complaint operations (using traits for testability)
//!
//! Every handler receives a `ServerDeps`. Production wires Postgres and the
//! AI gateway; tests wire the in-memory store and `MockAI`.

use sqlx::PgPool;
use std::sync::Arc;

use openai_client::OpenAIClient;

use crate::config::Config;
use crate::domains::complaints::SimilarityConfig;
use crate::kernel::{BaseAI, BaseComplaintStore, GatewayAI, PostgresComplaintStore};

#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseComplaintStore>,
    pub ai: Arc<dyn BaseAI>,
    pub similarity: SimilarityConfig,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseComplaintStore>,
        ai: Arc<dyn BaseAI>,
        similarity: SimilarityConfig,
    ) -> Self {
        Self {
            store,
            ai,
            similarity,
        }
    }

    /// Production wiring from configuration and an open pool.
    pub fn from_config(config: &Config, pool: PgPool) -> Self {
        let client =
            OpenAIClient::new(config.ai_api_key.clone()).with_base_url(config.ai_base_url.clone());

        Self::new(
            Arc::new(PostgresComplaintStore::new(pool)),
            Arc::new(GatewayAI::new(client, config.ai_model.clone())),
            config.similarity.clone(),
        )
    }
}
