use std::time::Duration;

use cpc_types::TtlPolicy;
use rand::Rng;

/// Draw an expiry uniformly from `[base - window, base + window]`.
///
/// Entries written together by one resolution get different lifetimes, so
/// they do not all expire (and get recomputed) at the same moment.
#[must_use]
pub fn jittered(policy: TtlPolicy) -> Duration {
    let (min, max) = (policy.min(), policy.max());
    if min >= max {
        return min;
    }
    let lo = u64::try_from(min.as_millis()).unwrap_or(u64::MAX);
    let hi = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    let mut rng = rand::rng();
    Duration::from_millis(rng.random_range(lo..=hi))
}
