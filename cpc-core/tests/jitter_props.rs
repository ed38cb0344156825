use std::time::Duration;

use cpc_core::cache::ttl::jittered;
use cpc_core::{TtlConfig, TtlPolicy, TtlTier};
use proptest::prelude::*;

proptest! {
    #[test]
    fn jitter_stays_inside_window(base_s in 0u64..10_000_000, window_s in 0u64..1_000_000) {
        let policy = TtlPolicy {
            base: Duration::from_secs(base_s),
            window: Duration::from_secs(window_s),
        };
        let ttl = jittered(policy);
        prop_assert!(ttl >= policy.min());
        prop_assert!(ttl <= policy.max());
    }
}

#[test]
fn default_tiers_match_documented_windows() {
    let cfg = TtlConfig::default();
    let day = 24 * 60 * 60;
    let s = cfg.policy(TtlTier::Static);
    assert_eq!(s.min(), Duration::from_secs(20 * day));
    assert_eq!(s.max(), Duration::from_secs(36 * day));
    let d = cfg.policy(TtlTier::Dynamic);
    assert_eq!(d.min(), Duration::from_secs(4 * day));
    assert_eq!(d.max(), Duration::from_secs(10 * day));
    let c = cfg.policy(TtlTier::Computed);
    assert_eq!(c.max() - c.min(), Duration::from_secs(26 * 60 * 60));
}

#[test]
fn draws_are_spread_out() {
    let policy = TtlConfig::default().policy(TtlTier::Computed);
    let draws: std::collections::HashSet<Duration> = (0..50).map(|_| jittered(policy)).collect();
    assert!(draws.len() > 1, "expected distinct expirations, got {draws:?}");
}
