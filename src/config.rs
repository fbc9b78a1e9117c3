// src/config.rs
// Static per-provider settings and API key format validation

use crate::error::{AiError, Result};
use crate::provider::Provider;

/// Provider used when the application has no stored preference.
pub const DEFAULT_PROVIDER: Provider = Provider::Gemini;

/// Static attributes for one provider backend.
///
/// Loaded once at compile time and treated as read-only everywhere; the
/// client and adapters never mutate these. The key-format fields drive
/// the advisory validation in [`validate_api_key`].
#[derive(Debug)]
pub struct ProviderConfig {
    /// Human-facing provider name, used in UI messages
    pub name: &'static str,
    /// Model identifier sent on the wire
    pub model: &'static str,
    /// Output token cap (kept low to control cost)
    pub max_output_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Required key prefix
    pub key_prefix: &'static str,
    /// Minimum key length
    pub key_min_len: usize,
    /// Placeholder sentinel shipped in default app configs
    pub key_placeholder: &'static str,
    /// Where users obtain a key, surfaced by the settings UI
    pub setup_url: &'static str,
}

const GEMINI: ProviderConfig = ProviderConfig {
    name: "Google Gemini",
    model: "gemini-1.5-flash",
    max_output_tokens: 150,
    temperature: 0.7,
    key_prefix: "AIza",
    key_min_len: 35,
    key_placeholder: "YOUR_GEMINI_API_KEY_HERE",
    setup_url: "https://makersuite.google.com/app/apikey",
};

const OPENAI: ProviderConfig = ProviderConfig {
    name: "OpenAI GPT",
    model: "gpt-3.5-turbo",
    max_output_tokens: 150,
    temperature: 0.7,
    key_prefix: "sk-",
    key_min_len: 40,
    key_placeholder: "YOUR_OPENAI_API_KEY_HERE",
    setup_url: "https://platform.openai.com/api-keys",
};

impl ProviderConfig {
    /// Look up the static config for a provider.
    pub fn for_provider(provider: Provider) -> &'static ProviderConfig {
        match provider {
            Provider::Gemini => &GEMINI,
            Provider::OpenAi => &OPENAI,
        }
    }
}

/// Check a candidate API key against the provider's format rule.
///
/// Advisory only: a key that passes may still be rejected by the backend
/// at call time (surfaced as [`AiError::Auth`] from the adapter). Pure,
/// no I/O.
pub fn validate_api_key(api_key: &str, provider: Provider) -> Result<()> {
    if api_key.is_empty() {
        return Err(AiError::MissingKey { provider });
    }

    // Either provider's shipped placeholder counts as unconfigured
    if api_key == GEMINI.key_placeholder || api_key == OPENAI.key_placeholder {
        return Err(AiError::PlaceholderKey { provider });
    }

    let config = ProviderConfig::for_provider(provider);
    if !api_key.starts_with(config.key_prefix) || api_key.len() < config.key_min_len {
        return Err(AiError::BadKeyFormat {
            provider,
            prefix: config.key_prefix,
            min_len: config.key_min_len,
        });
    }

    Ok(())
}
