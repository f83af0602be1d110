//! Pure client for OpenAI-compatible chat completion gateways
//!
//! A minimal client with no domain-specific logic. It speaks the
//! `/chat/completions` dialect shared by OpenAI and most AI gateways, so the
//! same client works against either by swapping the base URL.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::new(api_key)
//!     .with_base_url("https://ai.gateway.lovable.dev/v1");
//!
//! let response = client
//!     .chat_completion(
//!         ChatRequest::new("google/gemini-2.5-flash")
//!             .message(Message::system("You compare complaints"))
//!             .message(Message::user("..."))
//!             .temperature(0.3),
//!     )
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// Text returned when the gateway answers without any message content.
const EMPTY_CONTENT: &str = "[]";

/// OpenAI-compatible chat client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Set a custom base URL (gateways, proxies, local mocks).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// A 429 from the gateway becomes [`OpenAIError::RateLimited`] so callers
    /// can tell throttling apart from other failures.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat completion request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Chat completion API error");

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(OpenAIError::RateLimited(error_text));
            }
            return Err(OpenAIError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let usage = chat_response.usage.clone();
        let content = chat_response
            .into_first_content()
            .unwrap_or_else(|| EMPTY_CONTENT.to_string());

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            content_length = content.len(),
            "Chat completion"
        );

        Ok(ChatResponse { content, usage })
    }
}
