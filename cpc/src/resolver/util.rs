//! Bounded fan-out and error collapsing for concurrent lookups.

use std::future::Future;

use cpc_core::CpcError;
use futures::stream::{self, StreamExt};

/// Run `tasks` with at most `limit` in flight and return the outputs in input order.
pub async fn bounded_in_order<I, F, T>(limit: usize, tasks: I) -> Vec<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T>,
{
    // Build the futures up front so no closure-typed iterator is held across
    // an await point (works around higher-ranked `Send` inference limits).
    let wrapped: Vec<_> = tasks
        .into_iter()
        .enumerate()
        .map(|(i, task)| async move { (i, task.await) })
        .collect();
    let mut indexed: Vec<(usize, T)> = stream::iter(wrapped)
        .buffer_unordered(limit.max(1))
        .collect()
        .await;
    indexed.sort_unstable_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, out)| out).collect()
}

/// Split results into successes and a single collapsed error.
///
/// Rules:
/// - No failures: `Ok` with every value in order.
/// - One failure: that error.
/// - Several failures: `Multiple` carrying all of them.
pub fn collapse_errors<T>(results: Vec<Result<T, CpcError>>) -> Result<Vec<T>, CpcError> {
    let mut ok = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for r in results {
        match r {
            Ok(v) => ok.push(v),
            Err(e) => errors.push(e),
        }
    }
    match CpcError::collect(errors) {
        Some(err) => Err(err),
        None => Ok(ok),
    }
}
