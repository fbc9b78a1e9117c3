// src/http.rs
// Shared HTTP client for all provider network operations

use std::time::Duration;

/// Default request timeout (covers slow completions on the free tiers)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the shared HTTP client with appropriate defaults.
///
/// This client should be created once by the composition root and passed
/// to the [`crate::AiClient`]. Uses connection pooling internally, so all
/// provider adapters share the same pool.
pub fn create_shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(4)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
