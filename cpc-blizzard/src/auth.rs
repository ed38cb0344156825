//! Client-credentials tokens, one per region.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use cpc_core::{ApiCredentials, CpcError, Region};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Lifetime assumed when the service reports `expires_in: 0`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// Body of a successful token exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub access_token: String,
    /// Token type, normally `bearer`.
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: i64,
    /// Granted scope.
    #[serde(default)]
    pub scope: Option<String>,
}

/// A bearer token and the moment it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Bearer token.
    pub access_token: String,
    /// Token type, normally `bearer`.
    pub token_type: String,
    /// Lifetime in seconds, counted from `fetched_at`.
    pub expires_in: i64,
    /// Granted scope.
    pub scope: Option<String>,
    /// When the token was obtained.
    pub fetched_at: DateTime<Utc>,
}

impl AccessToken {
    /// Stamp a token response with the time it was received.
    ///
    /// A zero lifetime is replaced by [`DEFAULT_TOKEN_LIFETIME_SECS`].
    #[must_use]
    pub fn from_response(resp: TokenResponse, fetched_at: DateTime<Utc>) -> Self {
        let expires_in = if resp.expires_in == 0 {
            DEFAULT_TOKEN_LIFETIME_SECS
        } else {
            resp.expires_in
        };
        Self {
            access_token: resp.access_token,
            token_type: resp.token_type,
            expires_in,
            scope: resp.scope,
            fetched_at,
        }
    }

    /// Instant after which the token must not be used.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.fetched_at + TimeDelta::seconds(self.expires_in)
    }

    /// True while `now` is before the expiry instant.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }
}

/// Performs the credential exchange for a region.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Obtain a fresh token for `region`.
    async fn fetch_token(&self, region: Region) -> Result<TokenResponse, CpcError>;
}

type TokenFn = dyn Fn(Region) -> Result<TokenResponse, CpcError> + Send + Sync;

struct FnTokenSource(Box<TokenFn>);

#[async_trait]
impl TokenSource for FnTokenSource {
    async fn fetch_token(&self, region: Region) -> Result<TokenResponse, CpcError> {
        (self.0)(region)
    }
}

impl dyn TokenSource {
    /// Build a token source from a closure, mainly for tests.
    pub fn from_fn<F>(f: F) -> Arc<dyn TokenSource>
    where
        F: Fn(Region) -> Result<TokenResponse, CpcError> + Send + Sync + 'static,
    {
        Arc::new(FnTokenSource(Box::new(f)))
    }
}

/// OAuth client-credentials exchange against the regional token endpoint.
pub struct OAuthTokenSource {
    http: reqwest::Client,
    credentials: ApiCredentials,
    base_override: Option<String>,
}

impl OAuthTokenSource {
    /// Exchange `credentials` at `https://{region}.battle.net/oauth/token`.
    #[must_use]
    pub fn new(http: reqwest::Client, credentials: ApiCredentials) -> Self {
        Self {
            http,
            credentials,
            base_override: None,
        }
    }

    /// Send exchanges to `{base}/oauth/token` for every region instead.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_override = Some(base.into().trim_end_matches('/').to_string());
        self
    }

    /// Token endpoint used for `region`.
    #[must_use]
    pub fn token_url(&self, region: Region) -> String {
        match &self.base_override {
            Some(base) => format!("{base}/oauth/token"),
            None => format!("https://{region}.battle.net/oauth/token"),
        }
    }
}

#[async_trait]
impl TokenSource for OAuthTokenSource {
    async fn fetch_token(&self, region: Region) -> Result<TokenResponse, CpcError> {
        let resp = self
            .http
            .post(self.token_url(region))
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CpcError::auth(region.as_str(), e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CpcError::auth(
                region.as_str(),
                format!("token endpoint answered {status}"),
            ));
        }
        resp.json::<TokenResponse>()
            .await
            .map_err(|e| CpcError::auth(region.as_str(), format!("unreadable token response: {e}")))
    }
}

type Clock = dyn Fn() -> DateTime<Utc> + Send + Sync;
type Slot = Arc<Mutex<Option<AccessToken>>>;

/// Caches one token per region and refreshes it when it expires.
///
/// Each region has its own async lock, held across the refresh, so a region
/// is never refreshed by two callers at once while other regions proceed.
pub struct TokenManager {
    source: Arc<dyn TokenSource>,
    slots: StdMutex<HashMap<Region, Slot>>,
    clock: Box<Clock>,
}

impl TokenManager {
    /// Manage tokens obtained from `source`.
    #[must_use]
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            slots: StdMutex::new(HashMap::new()),
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the wall clock used for expiry checks.
    #[must_use]
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    fn slot(&self, region: Region) -> Slot {
        let mut slots = self.slots.lock().expect("mutex poisoned");
        Arc::clone(slots.entry(region).or_default())
    }

    /// A valid token for `region`, refreshing it first when needed.
    ///
    /// # Errors
    /// Returns `Auth` when the exchange fails; the previous token, if any,
    /// stays in place and the next call retries the exchange.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "cpc::blizzard::token", skip(self)))]
    pub async fn get_token(&self, region: Region) -> Result<AccessToken, CpcError> {
        let slot = self.slot(region);
        let mut guard = slot.lock().await;
        let now = (self.clock)();
        if let Some(token) = guard.as_ref()
            && token.is_valid_at(now)
        {
            return Ok(token.clone());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(stale = guard.is_some(), "refreshing access token");
        let resp = self.source.fetch_token(region).await?;
        let token = AccessToken::from_response(resp, (self.clock)());
        *guard = Some(token.clone());
        Ok(token)
    }

    /// The cached token for `region`, valid or not.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub async fn cached(&self, region: Region) -> Option<AccessToken> {
        self.slot(region).lock().await.clone()
    }
}
