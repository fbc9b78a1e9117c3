// src/client.rs
// Stateful AI client: credential lifecycle + uniform retry policy

use crate::config::{self, ProviderConfig};
use crate::error::{AiError, Result};
use crate::http;
use crate::prompt;
use crate::provider::{self, Provider, ProviderAdapter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Maximum retries after the first attempt (3 attempts total)
pub(crate) const MAX_RETRIES: u32 = 2;

/// Base backoff before retry n is `BASE_BACKOFF * 2^(n-1)`: 1s then 2s
pub(crate) const BASE_BACKOFF: Duration = Duration::from_millis(1000);

/// The configured provider and its adapter, swapped as one value.
///
/// Holding both behind a single `Arc` is what keeps the client's invariant:
/// the provider tag and the adapter (which owns the key) can never belong
/// to different configurations.
struct ActiveProvider {
    provider: Provider,
    adapter: Arc<dyn ProviderAdapter>,
}

/// Orchestrator for AI completions.
///
/// Lifecycle: construct once at the composition root, then
/// `initialize -> generate_response* -> reset`. The client is unconfigured
/// until a provider and API key pass validation; `generate_response` fails
/// fast with [`AiError::NotInitialized`] before that.
///
/// All methods take `&self`: the only mutable state is the active
/// provider slot, replaced wholesale under a short-lived lock that is
/// never held across an await. Concurrent calls observe either the old or
/// the new configuration, never a mix.
pub struct AiClient {
    active: Mutex<Option<Arc<ActiveProvider>>>,
    http: reqwest::Client,
}

impl AiClient {
    /// Create an unconfigured client over a shared HTTP client.
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            active: Mutex::new(None),
            http,
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<Arc<ActiveProvider>>> {
        // The lock only guards a pointer swap; a poisoned value is still valid
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Configure the client for a provider.
    ///
    /// Validates the key format, builds the matching adapter, and swaps it
    /// in atomically. Re-entrant: calling while already configured replaces
    /// the previous provider wholesale. A failed initialize leaves the
    /// client unconfigured rather than half-updated.
    ///
    /// Returns a confirmation message for the UI.
    pub fn initialize(&self, provider: Provider, api_key: &str) -> Result<String> {
        if let Err(err) = config::validate_api_key(api_key, provider) {
            *self.active() = None;
            warn!(provider = %provider, error = %err, "initialize rejected");
            return Err(err);
        }

        let settings = ProviderConfig::for_provider(provider);
        let adapter = provider::build_adapter(provider, api_key.to_string(), self.http.clone());
        *self.active() = Some(Arc::new(ActiveProvider { provider, adapter }));

        info!(provider = %provider, model = settings.model, "provider initialized");
        Ok(format!("{} initialized successfully", settings.name))
    }

    /// Whether a valid credential is currently held.
    pub fn is_ready(&self) -> bool {
        self.active().is_some()
    }

    /// The currently configured provider, if any.
    pub fn current_provider(&self) -> Option<Provider> {
        self.active().as_ref().map(|active| active.provider)
    }

    /// Drop the configured provider and return to the unconfigured state.
    /// Idempotent.
    pub fn reset(&self) {
        if let Some(active) = self.active().take() {
            info!(provider = %active.provider, "client reset");
        }
    }

    /// Generate a completion for a raw user message.
    ///
    /// Optimizes the prompt once, then calls the active adapter with a
    /// bounded retry loop: only [`AiError::Overloaded`] is retried, at most
    /// [`MAX_RETRIES`] times, sleeping 1s then 2s between attempts. Every
    /// other failure class propagates immediately.
    pub async fn generate_response(&self, raw_text: &str) -> Result<String> {
        let Some(active) = self.active().as_ref().map(Arc::clone) else {
            debug!("generate_response called while unconfigured");
            return Err(AiError::NotInitialized);
        };

        let prompt = prompt::optimize(raw_text);
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        info!(
            request_id = %request_id,
            provider = %active.provider,
            prompt_chars = prompt.len(),
            "starting generation"
        );

        for attempt in 0..MAX_RETRIES {
            match active.adapter.send(&prompt).await {
                Err(AiError::Overloaded(detail)) => {
                    let backoff = BASE_BACKOFF * 2u32.pow(attempt);
                    warn!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        detail = %detail,
                        "provider overloaded, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                result => return log_outcome(&request_id, attempt + 1, start, result),
            }
        }

        // Retry budget exhausted; the last attempt's outcome is surfaced as-is
        let result = active.adapter.send(&prompt).await;
        log_outcome(&request_id, MAX_RETRIES + 1, start, result)
    }
}

impl Default for AiClient {
    fn default() -> Self {
        Self::new(http::create_shared_client())
    }
}

fn log_outcome(request_id: &str, attempts: u32, start: Instant, result: Result<String>) -> Result<String> {
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(text) => info!(
            request_id = %request_id,
            attempts,
            duration_ms,
            response_chars = text.len(),
            "generation complete"
        ),
        Err(err) => warn!(
            request_id = %request_id,
            attempts,
            duration_ms,
            error = %err,
            "generation failed"
        ),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Adapter stub that replays a scripted sequence of outcomes
    struct ScriptedAdapter {
        calls: AtomicU32,
        script: Mutex<VecDeque<Result<String>>>,
    }

    impl ScriptedAdapter {
        fn new(script: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                script: Mutex::new(script.into_iter().collect()),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderAdapter for ScriptedAdapter {
        async fn send(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AiError::Unknown("script exhausted".into())))
        }

        fn provider_type(&self) -> Provider {
            Provider::Gemini
        }
    }

    fn overloaded() -> AiError {
        AiError::Overloaded("503 service unavailable".into())
    }

    /// Build a ready client whose adapter is the given stub
    fn client_with(adapter: Arc<ScriptedAdapter>) -> AiClient {
        let client = AiClient::new(reqwest::Client::new());
        *client.active() = Some(Arc::new(ActiveProvider {
            provider: Provider::Gemini,
            adapter,
        }));
        client
    }

    fn gemini_key() -> String {
        format!("AIza{}", "x".repeat(40))
    }

    // ========================================================================
    // Retry policy
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_overloaded_twice_then_success_retries_with_backoff() {
        let adapter = ScriptedAdapter::new(vec![
            Err(overloaded()),
            Err(overloaded()),
            Ok("third time lucky".into()),
        ]);
        let client = client_with(adapter.clone());

        let start = Instant::now();
        let reply = client.generate_response("hello").await.unwrap();

        assert_eq!(reply, "third time lucky");
        assert_eq!(adapter.calls(), 3);
        // 1000ms + 2000ms of backoff on the paused clock
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_overloaded_exhausts_three_attempts() {
        let adapter = ScriptedAdapter::new(vec![
            Err(overloaded()),
            Err(overloaded()),
            Err(overloaded()),
        ]);
        let client = client_with(adapter.clone());

        let err = client.generate_response("hello").await.unwrap_err();

        assert!(matches!(err, AiError::Overloaded(_)));
        assert_eq!(adapter.calls(), 3);
    }

    #[tokio::test]
    async fn test_auth_failure_is_not_retried() {
        let adapter = ScriptedAdapter::new(vec![Err(AiError::Auth("invalid key".into()))]);
        let client = client_with(adapter.clone());

        let err = client.generate_response("hello").await.unwrap_err();

        assert!(matches!(err, AiError::Auth(_)));
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let adapter = ScriptedAdapter::new(vec![Err(AiError::RateLimited("quota".into()))]);
        let client = client_with(adapter.clone());

        let err = client.generate_response("hello").await.unwrap_err();

        assert!(matches!(err, AiError::RateLimited(_)));
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_is_not_retried() {
        let adapter = ScriptedAdapter::new(vec![Err(AiError::Network("connection refused".into()))]);
        let client = client_with(adapter.clone());

        let err = client.generate_response("hello").await.unwrap_err();

        assert!(matches!(err, AiError::Network(_)));
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overloaded_once_then_success_sleeps_base_backoff_only() {
        let adapter = ScriptedAdapter::new(vec![Err(overloaded()), Ok("recovered".into())]);
        let client = client_with(adapter.clone());

        let start = Instant::now();
        let reply = client.generate_response("hello").await.unwrap();

        assert_eq!(reply, "recovered");
        assert_eq!(adapter.calls(), 2);
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_immediate_success_makes_one_call() {
        let adapter = ScriptedAdapter::new(vec![Ok("done".into())]);
        let client = client_with(adapter.clone());

        let reply = client.generate_response("hello").await.unwrap();

        assert_eq!(reply, "done");
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_failure_after_retry_propagates() {
        // Overloaded once, then auth: the second failure must surface directly
        let adapter = ScriptedAdapter::new(vec![
            Err(overloaded()),
            Err(AiError::Auth("revoked".into())),
        ]);
        let client = client_with(adapter.clone());

        let err = client.generate_response("hello").await.unwrap_err();

        assert!(matches!(err, AiError::Auth(_)));
        assert_eq!(adapter.calls(), 2);
    }

    // ========================================================================
    // State machine
    // ========================================================================

    #[tokio::test]
    async fn test_unconfigured_generate_fails_fast_with_zero_calls() {
        let adapter = ScriptedAdapter::new(vec![Ok("never".into())]);
        let client = client_with(adapter.clone());
        client.reset();

        let err = client.generate_response("hello").await.unwrap_err();

        assert!(matches!(err, AiError::NotInitialized));
        assert_eq!(adapter.calls(), 0);
    }

    #[test]
    fn test_new_client_is_unconfigured() {
        let client = AiClient::new(reqwest::Client::new());
        assert!(!client.is_ready());
        assert!(client.current_provider().is_none());
    }

    #[test]
    fn test_initialize_makes_client_ready() {
        let client = AiClient::new(reqwest::Client::new());
        let message = client.initialize(Provider::Gemini, &gemini_key()).unwrap();
        assert_eq!(message, "Google Gemini initialized successfully");
        assert!(client.is_ready());
        assert_eq!(client.current_provider(), Some(Provider::Gemini));
    }

    #[test]
    fn test_failed_initialize_clears_previous_credential() {
        let client = AiClient::new(reqwest::Client::new());
        client.initialize(Provider::Gemini, &gemini_key()).unwrap();
        assert!(client.is_ready());

        let err = client.initialize(Provider::OpenAi, "sk-short").unwrap_err();

        assert!(matches!(err, AiError::BadKeyFormat { .. }));
        assert!(!client.is_ready());
        assert!(client.current_provider().is_none());
    }

    #[test]
    fn test_reinitialize_replaces_provider_wholesale() {
        let client = AiClient::new(reqwest::Client::new());
        client.initialize(Provider::Gemini, &gemini_key()).unwrap();
        let openai_key = format!("sk-{}", "x".repeat(45));
        client.initialize(Provider::OpenAi, &openai_key).unwrap();
        assert_eq!(client.current_provider(), Some(Provider::OpenAi));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let client = AiClient::new(reqwest::Client::new());
        client.initialize(Provider::Gemini, &gemini_key()).unwrap();
        client.reset();
        client.reset();
        assert!(!client.is_ready());
        assert!(client.current_provider().is_none());
    }

    #[test]
    fn test_retry_constants() {
        assert_eq!(MAX_RETRIES, 2);
        assert_eq!(BASE_BACKOFF, Duration::from_millis(1000));
    }
}
