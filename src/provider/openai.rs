// src/provider/openai.rs
// OpenAI chat-completions adapter (single-turn, non-streaming)

use crate::config::ProviderConfig;
use crate::error::{AiError, Result};
use crate::provider::{Provider, ProviderAdapter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API adapter
pub struct OpenAiAdapter {
    api_key: String,
    config: &'static ProviderConfig,
    http: reqwest::Client,
}

impl OpenAiAdapter {
    pub fn new(api_key: String, http: reqwest::Client) -> Self {
        Self {
            api_key,
            config: ProviderConfig::for_provider(Provider::OpenAi),
            http,
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Pull the first choice's message content out of a parsed response.
fn extract_text(mut response: ChatResponse) -> Result<String> {
    let text = if response.choices.is_empty() {
        None
    } else {
        response.choices.swap_remove(0).message.content
    }
    .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn provider_type(&self) -> Provider {
        Provider::OpenAi
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_chars = prompt.len()))]
    async fn send(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            max_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, "OpenAI request rejected");
            return Err(AiError::from_status(status, &body));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::Unknown(format!("failed to parse OpenAI response: {e}")))?;

        extract_text(data)
    }
}
