use std::sync::Arc;

use async_trait::async_trait;
use cpc_core::{ApiRequest, ApiResponse, ApiTarget, CpcError, GameDataApi, Region};
use url::Url;

use crate::auth::TokenManager;

/// Locale requested for every resource.
pub const LOCALE: &str = "en_US";

/// HTTP connector for the game-data service.
pub struct BlizzardConnector {
    http: reqwest::Client,
    tokens: Arc<TokenManager>,
    api_base: Option<String>,
}

impl BlizzardConnector {
    /// Stable connector name.
    pub const NAME: &'static str = "cpc-blizzard";

    /// Connector using `tokens` for authorization.
    #[must_use]
    pub fn with_tokens(http: reqwest::Client, tokens: Arc<TokenManager>) -> Self {
        Self {
            http,
            tokens,
            api_base: None,
        }
    }

    /// Send path requests to `base` instead of the regional API host.
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into().trim_end_matches('/').to_string());
        self
    }

    /// Token manager shared by this connector.
    #[must_use]
    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    fn host(&self, region: Region) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| format!("https://{region}.api.blizzard.com"))
    }

    /// Full URL for a request, including locale, namespace and endpoint parameters.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the target cannot be parsed as a URL.
    pub fn url_for(&self, req: &ApiRequest) -> Result<Url, CpcError> {
        let raw = match &req.target {
            ApiTarget::Path(path) => format!("{}{path}", self.host(req.region)),
            ApiTarget::Href(href) => href.clone(),
        };
        let mut url =
            Url::parse(&raw).map_err(|e| CpcError::invalid_arg(format!("bad url {raw}: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("locale", LOCALE);
            pairs.append_pair("namespace", &req.namespace.qualified(req.region));
            for (k, v) in &req.query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl GameDataApi for BlizzardConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cpc::blizzard::fetch",
            skip(self, req),
            fields(request = %req.describe())
        )
    )]
    async fn fetch(&self, req: &ApiRequest) -> Result<ApiResponse, CpcError> {
        let token = self.tokens.get_token(req.region).await?;
        let url = self.url_for(req)?;

        let resp = self
            .http
            .get(url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| CpcError::transport(e.to_string()))?;
        #[cfg(feature = "tracing")]
        tracing::trace!(status = %resp.status(), "response received");

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| CpcError::transport(e.to_string()))?;
        let body = serde_json::from_slice(&bytes)
            .map_err(|e| CpcError::decode(req.describe(), e.to_string()))?;
        Ok(ApiResponse::new(body))
    }
}
