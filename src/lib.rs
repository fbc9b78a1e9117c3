// src/lib.rs
// HawkAI client - AI provider abstraction layer for the HawkAI assistant

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod prompt;
pub mod provider;

pub use client::AiClient;
pub use config::{DEFAULT_PROVIDER, ProviderConfig, validate_api_key};
pub use error::{AiError, Result};
pub use provider::{Provider, ProviderAdapter};
