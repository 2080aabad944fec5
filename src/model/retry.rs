//! Retrying client: wraps any [`ModelClient`] with a capped, explicit retry.
//!
//! Hosted model calls are billed, so retrying is opt-in and bounded: the
//! retry count is clamped to [`MAX_MODEL_RETRIES`] and only transient
//! failures (timeouts, transport errors) are retried.  Every retry is logged.
//! Credential, quota and empty-reply errors are returned immediately.

use async_trait::async_trait;

use crate::config::MAX_MODEL_RETRIES;
use crate::model::client::{ModelClient, ModelError};

// ---------------------------------------------------------------------------
// RetryingClient
// ---------------------------------------------------------------------------

/// A wrapper around any [`ModelClient`] that retries transient failures at
/// most [`MAX_MODEL_RETRIES`] times.
///
/// # Example
/// ```rust
/// use smartbin::config::ModelConfig;
/// use smartbin::model::{GeminiClient, RetryingClient};
///
/// let config = ModelConfig { api_key: Some("key".into()), ..ModelConfig::default() };
/// let inner = GeminiClient::from_config(&config).unwrap();
/// let client = RetryingClient::new(inner, 3);
/// assert_eq!(client.retries(), 1);
/// ```
pub struct RetryingClient<C: ModelClient> {
    inner: C,
    retries: u32,
}

impl<C: ModelClient> RetryingClient<C> {
    /// Wrap `inner`; `retries` is clamped to [`MAX_MODEL_RETRIES`].
    pub fn new(inner: C, retries: u32) -> Self {
        Self {
            inner,
            retries: retries.min(MAX_MODEL_RETRIES),
        }
    }

    /// Effective retry budget after clamping.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Return a reference to the wrapped client.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ModelClient> ModelClient for RetryingClient<C> {
    async fn generate(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, ModelError> {
        let mut attempt = 0;
        loop {
            match self.inner.generate(image, mime_type, prompt).await {
                Err(err) if err.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    log::warn!(
                        "model call failed ({err}); retry {attempt}/{}",
                        self.retries
                    );
                }
                other => return other,
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, ModelError> {
        self.inner.list_models().await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
