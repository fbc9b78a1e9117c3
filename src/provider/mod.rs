// src/provider/mod.rs
// Provider abstraction layer: one adapter per backend

mod gemini;
mod openai;

pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// AI provider backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provider {
    Gemini,
    OpenAi,
}

impl Provider {
    /// Parse provider from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            "openai" => Some(Self::OpenAi),
            _ => None,
        }
    }

    /// Short display name for user-facing messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAi => "OpenAI",
        }
    }

    /// Get the environment variable name for this provider's API key
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

/// Trait for provider adapters - all backends must implement this.
///
/// An adapter owns the wire-level translation for one backend: model
/// selection, token/temperature parameters, and auth convention. Each
/// `send` performs exactly one outbound HTTP call; the retry policy lives
/// in [`crate::AiClient`] so it stays uniform across providers.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Send one optimized prompt and return the primary text completion
    async fn send(&self, prompt: &str) -> Result<String>;

    /// Get the provider type
    fn provider_type(&self) -> Provider;
}

/// Construct the adapter for a provider with the given credential.
///
/// The shared HTTP client is cloned cheaply (reqwest clients are
/// reference-counted) so all adapters reuse one connection pool.
pub(crate) fn build_adapter(
    provider: Provider,
    api_key: String,
    http: reqwest::Client,
) -> Arc<dyn ProviderAdapter> {
    match provider {
        Provider::Gemini => Arc::new(GeminiAdapter::new(api_key, http)),
        Provider::OpenAi => Arc::new(OpenAiAdapter::new(api_key, http)),
    }
}
