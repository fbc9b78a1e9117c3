// src/provider/gemini.rs
// Google Gemini generateContent adapter (single-turn, non-streaming)
// Authenticates via query-string key, not Bearer header

use crate::config::ProviderConfig;
use crate::error::{AiError, Result};
use crate::provider::{Provider, ProviderAdapter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini API adapter
pub struct GeminiAdapter {
    api_key: String,
    config: &'static ProviderConfig,
    http: reqwest::Client,
}

impl GeminiAdapter {
    pub fn new(api_key: String, http: reqwest::Client) -> Self {
        Self {
            api_key,
            config: ProviderConfig::for_provider(Provider::Gemini),
            http,
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Pull the first candidate's text out of a parsed response.
fn extract_text(response: GeminiResponse) -> Result<String> {
    let text = response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.swap_remove(0))
            }
        })
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn provider_type(&self) -> Provider {
        Provider::Gemini
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_chars = prompt.len()))]
    async fn send(&self, prompt: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
            },
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.config.model, self.api_key
        );

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, "Gemini request rejected");
            return Err(AiError::from_status(status, &body));
        }

        let data: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AiError::Unknown(format!("failed to parse Gemini response: {e}")))?;

        extract_text(data)
    }
}
