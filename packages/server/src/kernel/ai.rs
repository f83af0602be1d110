// AI implementation using an OpenAI-compatible gateway
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};

use super::BaseAI;

/// Chat completions against a single configured model.
#[derive(Clone)]
pub struct GatewayAI {
    client: OpenAIClient,
    model: String,
}

impl GatewayAI {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl BaseAI for GatewayAI {
    async fn complete_chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> openai_client::Result<String> {
        tracing::info!(
            model = %self.model,
            prompt_length = system_prompt.len() + user_prompt.len(),
            temperature,
            "Calling AI gateway"
        );

        let request = ChatRequest::new(self.model.clone())
            .message(Message::system(system_prompt))
            .message(Message::user(user_prompt))
            .temperature(temperature);

        let response = self.client.chat_completion(request).await.map_err(|e| {
            tracing::error!(error = %e, model = %self.model, "AI gateway call failed");
            e
        })?;

        tracing::info!(
            response_length = response.content.len(),
            model = %self.model,
            "AI gateway response received"
        );

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires API key
    async fn test_complete_chat() {
        let api_key =
            std::env::var("AI_API_KEY").expect("AI_API_KEY must be set for integration tests");

        let ai = GatewayAI::new(
            OpenAIClient::new(api_key).with_base_url(crate::config::DEFAULT_AI_BASE_URL),
            crate::config::DEFAULT_AI_MODEL,
        );

        let response = ai
            .complete_chat("Reply with JSON only.", "Return an empty JSON array.", 0.0)
            .await
            .expect("AI completion should succeed");

        assert!(response.contains("[]"));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_surfaces_network_error() {
        let ai = GatewayAI::new(
            OpenAIClient::new("sk-test").with_base_url("http://127.0.0.1:9"),
            "test-model",
        );

        let err = ai.complete_chat("sys", "user", 0.3).await.unwrap_err();

        assert!(!err.is_rate_limited());
        assert!(matches!(err, openai_client::OpenAIError::Network(_)));
    }
}
