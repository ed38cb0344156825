use std::collections::HashMap;

use cpc_types::{CpcConfig, CpcError, RateLimitConfig};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

const CREDS: [(&str, &str); 2] = [("CLIENT_ID", "id"), ("CLIENT_SECRET", "secret")];

#[test]
fn library_default_leaves_sigint_alone() {
    assert!(!RateLimitConfig::default().stop_on_ctrl_c);
    assert!(!CpcConfig::default().rate_limit.stop_on_ctrl_c);
}

#[test]
fn environment_config_closes_window_on_ctrl_c() {
    let cfg = CpcConfig::from_lookup(lookup(&CREDS)).unwrap();
    assert!(cfg.rate_limit.stop_on_ctrl_c);
    assert_eq!(cfg.credentials.client_id, "id");
    assert_eq!(cfg.redis_url, None);
}

#[test]
fn missing_credentials_are_rejected() {
    let err = CpcConfig::from_lookup(lookup(&[("CLIENT_ID", "id")])).unwrap_err();
    assert!(matches!(err, CpcError::InvalidArg(msg) if msg.contains("CLIENT_SECRET")));
}

#[test]
fn use_redis_without_url_is_rejected() {
    let mut vars = CREDS.to_vec();
    vars.push(("USE_REDIS", "true"));
    let err = CpcConfig::from_lookup(lookup(&vars)).unwrap_err();
    assert!(matches!(err, CpcError::InvalidArg(msg) if msg.contains("REDIS_URL")));

    vars.push(("REDIS_URL", ""));
    assert!(CpcConfig::from_lookup(lookup(&vars)).is_err());
}

#[test]
fn use_redis_with_url_selects_redis() {
    let mut vars = CREDS.to_vec();
    vars.extend([("USE_REDIS", "yes"), ("REDIS_URL", "redis://localhost:6379")]);
    let cfg = CpcConfig::from_lookup(lookup(&vars)).unwrap();
    assert_eq!(cfg.redis_url.as_deref(), Some("redis://localhost:6379"));
}

#[test]
fn redis_url_is_ignored_unless_requested() {
    let mut vars = CREDS.to_vec();
    vars.push(("REDIS_URL", "redis://localhost:6379"));
    let cfg = CpcConfig::from_lookup(lookup(&vars)).unwrap();
    assert_eq!(cfg.redis_url, None);
}
