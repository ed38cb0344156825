//! Fixed-delay retries for transport failures.

use std::sync::Arc;

use async_trait::async_trait;
use cpc_core::{ApiRequest, ApiResponse, CpcError, GameDataApi, Middleware, RetryConfig};

/// Retries requests that failed without producing a response.
///
/// Only errors for which [`CpcError::is_retryable`] holds are retried. A
/// response body the caller cannot decode is returned as-is; retrying would
/// not change it.
pub struct RetryingApi {
    inner: Arc<dyn GameDataApi>,
    cfg: RetryConfig,
}

impl RetryingApi {
    /// Wrap `inner` with the given policy.
    #[must_use]
    pub const fn new(inner: Arc<dyn GameDataApi>, cfg: RetryConfig) -> Self {
        Self { inner, cfg }
    }
}

#[async_trait]
impl GameDataApi for RetryingApi {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cpc::middleware::retry",
            skip(self, req),
            fields(request = %req.describe())
        )
    )]
    async fn fetch(&self, req: &ApiRequest) -> Result<ApiResponse, CpcError> {
        let attempts = self.cfg.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.fetch(req).await {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(attempt, error = %e, "request failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(self.cfg.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Middleware config for constructing a [`RetryingApi`].
pub struct RetryMiddleware {
    cfg: RetryConfig,
}

impl RetryMiddleware {
    /// Create a retry layer.
    #[must_use]
    pub const fn new(cfg: RetryConfig) -> Self {
        Self { cfg }
    }
}

impl Middleware for RetryMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn GameDataApi>) -> Arc<dyn GameDataApi> {
        Arc::new(RetryingApi::new(inner, self.cfg))
    }

    fn name(&self) -> &'static str {
        "RetryingApi"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "max_attempts": self.cfg.max_attempts,
            "delay_ms": self.cfg.delay.as_millis(),
        })
    }
}
