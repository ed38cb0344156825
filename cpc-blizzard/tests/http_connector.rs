use std::sync::Arc;

use cpc_blizzard::{BlizzardConnector, TokenManager, TokenResponse, TokenSource};
use cpc_core::{ApiCredentials, ApiRequest, CpcError, GameDataApi, Namespace, Region};
use httpmock::prelude::*;
use serde_json::json;

fn tokens() -> Arc<TokenManager> {
    let source = <dyn TokenSource>::from_fn(|_region| {
        Ok(TokenResponse {
            access_token: "tok".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            scope: None,
        })
    });
    Arc::new(TokenManager::new(source))
}

fn connector(base: &str) -> BlizzardConnector {
    BlizzardConnector::with_tokens(reqwest::Client::new(), tokens()).with_api_base(base)
}

#[tokio::test]
async fn sends_locale_namespace_and_bearer() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/data/wow/search/item")
                .query_param("locale", "en_US")
                .query_param("namespace", "static-eu")
                .query_param("name.en_US", "Draconium Ore")
                .query_param("_pageSize", "1000")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!({"page": 1, "pageCount": 0, "results": []}));
        })
        .await;

    let req = ApiRequest::path(Region::Eu, "/data/wow/search/item", Namespace::Static)
        .query("name.en_US", "Draconium Ore")
        .query("_pageSize", 1000);
    let resp = connector(&server.base_url()).fetch(&req).await.unwrap();
    assert_eq!(resp.body["pageCount"], 0);
    assert_eq!(resp.wait_cycles, 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn hrefs_are_fetched_as_is() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/data/wow/connected-realm/12")
                .query_param("namespace", "dynamic-us");
            then.status(200).json_body(json!({"id": 12, "realms": []}));
        })
        .await;

    let href = server.url("/data/wow/connected-realm/12");
    let req = ApiRequest::href(Region::Us, href, Namespace::Dynamic);
    let api = BlizzardConnector::with_tokens(reqwest::Client::new(), tokens());
    let resp = api.fetch(&req).await.unwrap();
    assert_eq!(resp.body["id"], 12);
    mock.assert_async().await;
}

#[tokio::test]
async fn error_status_with_json_body_is_not_a_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/data/wow/item/1");
            then.status(404).json_body(json!({"code": 404, "detail": "Not Found"}));
        })
        .await;

    let req = ApiRequest::path(Region::Us, "/data/wow/item/1", Namespace::Static);
    let resp = connector(&server.base_url()).fetch(&req).await.unwrap();
    assert_eq!(resp.body["code"], 404);
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/data/wow/item/2");
            then.status(502).body("<html>bad gateway</html>");
        })
        .await;

    let req = ApiRequest::path(Region::Us, "/data/wow/item/2", Namespace::Static);
    let err = connector(&server.base_url()).fetch(&req).await.unwrap_err();
    assert!(matches!(err, CpcError::Decode { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let req = ApiRequest::path(Region::Us, "/data/wow/item/3", Namespace::Static);
    let err = connector("http://127.0.0.1:9").fetch(&req).await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn token_failure_aborts_before_the_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/wow/item/4");
            then.status(200).json_body(json!({}));
        })
        .await;
    let source =
        <dyn TokenSource>::from_fn(|region| Err(CpcError::auth(region.as_str(), "denied")));
    let api =
        BlizzardConnector::with_tokens(reqwest::Client::new(), Arc::new(TokenManager::new(source)))
        .with_api_base(server.base_url());

    let req = ApiRequest::path(Region::Us, "/data/wow/item/4", Namespace::Static);
    assert!(matches!(api.fetch(&req).await, Err(CpcError::Auth { .. })));
    mock.assert_calls_async(0).await;
}

#[test]
fn rate_limited_builder_stacks_window_and_retry() {
    let builder = BlizzardConnector::rate_limited(ApiCredentials::default());
    assert_eq!(
        builder.layer_names(),
        vec!["RateLimitedApi", "RetryingApi", BlizzardConnector::NAME]
    );
    assert_eq!(builder.admission_window().unwrap().config().max_per_period, 100);
    let api = builder.build();
    assert_eq!(api.name(), "cpc-blizzard");
}
