use std::sync::Arc;

use cpc_core::{ApiCredentials, GameDataApi, RateLimitConfig, RetryConfig};
use cpc_middleware::ApiBuilder;

use crate::BlizzardConnector;
use crate::auth::{OAuthTokenSource, TokenManager};

/// Builder type alias specialized for the HTTP connector.
pub type BlizzardApiBuilder = ApiBuilder;

impl BlizzardConnector {
    /// Returns an unconfigured builder around a connector for `credentials`.
    ///
    /// Customize with the builder methods before calling `.build()`.
    #[must_use]
    pub fn builder(credentials: ApiCredentials) -> BlizzardApiBuilder {
        let raw: Arc<dyn GameDataApi> = Arc::new(Self::new_raw(credentials));
        ApiBuilder::new(raw)
    }

    /// Returns a builder with the service quota (100 requests per 5 s) and
    /// five transport attempts one second apart.
    #[must_use]
    pub fn rate_limited(credentials: ApiCredentials) -> BlizzardApiBuilder {
        Self::builder(credentials)
            .with_rate_limit(RateLimitConfig::default())
            .with_retry(RetryConfig::default())
    }

    /// Expert-only: construct an unwrapped connector for manual composition.
    #[must_use]
    pub fn new_raw(credentials: ApiCredentials) -> Self {
        let http = reqwest::Client::new();
        let source = Arc::new(OAuthTokenSource::new(http.clone(), credentials));
        Self::with_tokens(http, Arc::new(TokenManager::new(source)))
    }
}
