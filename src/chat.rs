//! Chat completion service: cache lookup plus a bounded retry loop around
//! the external provider.
//!
//! This is the only suspend point in the request path. Everything else the
//! handlers do is synchronous; only the remote call (and its backoff sleeps)
//! yields to the runtime.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::config::RetryConfig;
use crate::error::Result;
use crate::providers::{ChatMessage, ChatProvider, Completion};

/// Obtains completions from the external chat provider, consulting the
/// response cache first and retrying transient failures with increasing
/// backoff.
#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn ChatProvider>,
    cache: ResponseCache,
    max_retries: u32,
    backoff_base: Duration,
}

impl ChatService {
    pub fn new(provider: Arc<dyn ChatProvider>, cache: ResponseCache, retry: &RetryConfig) -> Self {
        Self {
            provider,
            cache,
            // A budget of zero would mean "never call the provider at all".
            max_retries: retry.max_retries.max(1),
            backoff_base: Duration::from_millis(retry.backoff_base_ms),
        }
    }

    /// The response cache owned by this service.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Obtain one completion for `messages`.
    ///
    /// With a `cache_key`, a fresh entry for that key short-circuits the call
    /// entirely, and a successful remote result is stored before returning.
    /// Without a key, the cache is neither read nor written — caching is
    /// opt-in per call.
    ///
    /// On failure the provider is retried up to `max_retries` total attempts,
    /// sleeping `backoff_base × attempt` between tries. Once the budget is
    /// exhausted the last provider error is returned unchanged; no fallback
    /// completion is ever synthesized.
    ///
    /// Overlapping invocations with the same key are not de-duplicated: both
    /// may miss and call the provider, and the later completion overwrites
    /// the earlier cache entry. Redundant, not incorrect.
    pub async fn completion(
        &self,
        messages: &[ChatMessage],
        cache_key: Option<&str>,
    ) -> Result<Completion> {
        if let Some(key) = cache_key {
            if let Some(hit) = self.cache.get(key) {
                debug!("returning cached completion");
                return Ok(hit);
            }
        }

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.provider.complete(messages).await {
                Ok(completion) => {
                    if let Some(key) = cache_key {
                        self.cache.put(key, completion.clone());
                    }
                    return Ok(completion);
                }
                Err(err) => {
                    let remaining = self.max_retries - attempt;
                    if remaining == 0 {
                        return Err(err);
                    }
                    let delay = self.backoff_base * attempt;
                    warn!(
                        attempt,
                        remaining,
                        delay_ms = delay.as_millis() as u64,
                        "chat provider call failed, retrying: {err}"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
