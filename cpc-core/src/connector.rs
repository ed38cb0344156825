use async_trait::async_trait;
use cpc_types::{CpcError, Namespace, Region};
use serde::de::DeserializeOwned;

/// Where a request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiTarget {
    /// Path below the regional API host, e.g. `/data/wow/item/19019`.
    Path(String),
    /// Absolute URL handed out by the service itself (connected-realm links).
    Href(String),
}

/// One resource fetch against the game-data service.
///
/// The connector adds `locale` and `namespace` to the query; `query` only
/// carries endpoint-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiRequest {
    /// Region whose host and token are used.
    pub region: Region,
    /// Resource to fetch.
    pub target: ApiTarget,
    /// Namespace family the resource lives in.
    pub namespace: Namespace,
    /// Extra query parameters in insertion order.
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Request for a path below the regional API host.
    #[must_use]
    pub fn path(region: Region, path: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            region,
            target: ApiTarget::Path(path.into()),
            namespace,
            query: Vec::new(),
        }
    }

    /// Request for an absolute link returned by a previous response.
    #[must_use]
    pub fn href(region: Region, href: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            region,
            target: ApiTarget::Href(href.into()),
            namespace,
            query: Vec::new(),
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Short description used in errors and logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.target {
            ApiTarget::Path(p) => format!("{}{p}", self.region),
            ApiTarget::Href(h) => h.clone(),
        }
    }
}

/// Decoded JSON body plus admission bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Response body.
    pub body: serde_json::Value,
    /// Admission periods the request waited through before being sent.
    pub wait_cycles: u32,
}

impl ApiResponse {
    /// Wrap a body that did not wait for admission.
    #[must_use]
    pub const fn new(body: serde_json::Value) -> Self {
        Self {
            body,
            wait_cycles: 0,
        }
    }

    /// Decode the body into a wire type.
    ///
    /// # Errors
    /// Returns `Decode` naming `what` when the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(self, what: &str) -> Result<T, CpcError> {
        serde_json::from_value(self.body).map_err(|e| CpcError::decode(what, e.to_string()))
    }
}

/// Access to the game-data service.
///
/// Implemented by the HTTP connector, by the in-memory mock world and by every
/// middleware layer wrapping either of them.
#[async_trait]
pub trait GameDataApi: Send + Sync {
    /// Stable name used in logs and middleware introspection.
    fn name(&self) -> &'static str;

    /// Fetch one resource.
    ///
    /// Only transport failures are reported as `Transport`; an HTTP error
    /// status with a JSON body is a successful fetch whose body will fail to
    /// decode later.
    async fn fetch(&self, req: &ApiRequest) -> Result<ApiResponse, CpcError>;
}
