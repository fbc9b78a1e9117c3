// src/error.rs
// Standardized error types for the provider client

use crate::provider::Provider;
use reqwest::StatusCode;
use thiserror::Error;

/// How much of an upstream error body is carried into error messages.
const BODY_SNIPPET_CHARS: usize = 200;

/// Main error type for the HawkAI client library.
///
/// Every variant renders a short human-readable message suitable for
/// direct display in the UI. Only [`AiError::Overloaded`] is retried;
/// all other failures propagate to the caller immediately.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("please add your {} API key", .provider.display_name())]
    MissingKey { provider: Provider },

    #[error("please replace the placeholder with your actual {} API key", .provider.display_name())]
    PlaceholderKey { provider: Provider },

    #[error(
        "invalid {} API key format: keys should start with \"{prefix}\" and be at least {min_len} characters",
        .provider.display_name()
    )]
    BadKeyFormat {
        provider: Provider,
        prefix: &'static str,
        min_len: usize,
    },

    #[error("AI client not initialized: please set up your API key first")]
    NotInitialized,

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limit or quota exceeded: {0}")]
    RateLimited(String),

    #[error("provider is temporarily overloaded: {0}")]
    Overloaded(String),

    #[error("provider returned no usable text")]
    EmptyResponse,

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected provider error: {0}")]
    Unknown(String),
}

/// Convenience type alias for Result using AiError
pub type Result<T> = std::result::Result<T, AiError>;

impl AiError {
    /// Whether this failure class is worth another attempt.
    ///
    /// Only transient upstream unavailability qualifies; auth, rate-limit,
    /// and network failures would not be helped by an immediate retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AiError::Overloaded(_))
    }

    /// Classify a non-success HTTP status from a provider backend.
    ///
    /// 503 (and 5xx bodies that self-report as overloaded) map to the
    /// retryable [`AiError::Overloaded`] class; everything else surfaces
    /// immediately.
    pub fn from_status(status: StatusCode, body: &str) -> AiError {
        let detail = snippet(body);
        match status.as_u16() {
            401 | 403 => AiError::Auth(detail),
            429 => AiError::RateLimited(detail),
            503 => AiError::Overloaded(detail),
            _ if status.is_server_error()
                && (body.contains("overloaded") || body.contains("UNAVAILABLE")) =>
            {
                AiError::Overloaded(detail)
            }
            _ => AiError::Unknown(format!("API error {status}: {detail}")),
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        // Connect/timeout failures are connectivity problems; anything else
        // (body read, decode, redirect policy) is unclassified.
        if err.is_connect() || err.is_timeout() {
            AiError::Network(err.to_string())
        } else {
            AiError::Unknown(err.to_string())
        }
    }
}

/// Clamp an upstream error body to a displayable length.
fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no details provided".to_string();
    }
    trimmed.chars().take(BODY_SNIPPET_CHARS).collect()
}
