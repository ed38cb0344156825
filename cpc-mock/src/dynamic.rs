use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cpc_core::CpcError;
use serde_json::Value;
use tokio::sync::Mutex;

/// Instruction for how requests to one resource should behave.
#[derive(Clone, Debug)]
pub enum MockBehavior {
    /// Return the provided body instead of the world's answer.
    Return(Value),
    /// Fail with the provided error.
    Fail(CpcError),
    /// Hang indefinitely (simulate a stalled upstream).
    Hang,
}

#[derive(Default)]
pub(crate) struct InternalState {
    pub(crate) rules: HashMap<String, MockBehavior>,
    pub(crate) fail_next: u32,
    pub(crate) latency: Option<Duration>,
    pub(crate) calls: Vec<String>,
}

/// What the connector should do with the current request, decided under lock.
pub(crate) enum Step {
    Answer,
    Return(Value),
    Fail(CpcError),
    Hang,
}

impl InternalState {
    pub(crate) fn record(&mut self, key: &str) -> Step {
        self.calls.push(key.to_string());
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Step::Fail(CpcError::transport(format!("injected failure for {key}")));
        }
        match self.rules.get(key) {
            Some(MockBehavior::Return(v)) => Step::Return(v.clone()),
            Some(MockBehavior::Fail(e)) => Step::Fail(e.clone()),
            Some(MockBehavior::Hang) => Step::Hang,
            None => Step::Answer,
        }
    }
}

/// Handle used by tests to steer a [`MockGameData`](crate::MockGameData)
/// from the outside.
#[derive(Clone)]
pub struct MockController {
    pub(crate) state: Arc<Mutex<InternalState>>,
}

impl MockController {
    /// Override the behavior for a path (or absolute link).
    pub async fn set_behavior(&self, target: &str, behavior: MockBehavior) {
        self.state.lock().await.rules.insert(target.to_string(), behavior);
    }

    /// Drop an override installed with [`set_behavior`](Self::set_behavior).
    pub async fn clear_behavior(&self, target: &str) {
        self.state.lock().await.rules.remove(target);
    }

    /// Fail the next `n` requests, whatever they target, with transport errors.
    pub async fn fail_next(&self, n: u32) {
        self.state.lock().await.fail_next = n;
    }

    /// Delay every answer by `latency` (on the Tokio clock).
    pub async fn set_latency(&self, latency: Option<Duration>) {
        self.state.lock().await.latency = latency;
    }

    /// Every request target seen so far, in arrival order.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    /// Number of requests seen for `target`.
    pub async fn call_count(&self, target: &str) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| c.as_str() == target)
            .count()
    }

    /// Total number of requests seen.
    pub async fn total_calls(&self) -> usize {
        self.state.lock().await.calls.len()
    }

    /// Forget recorded calls.
    pub async fn reset_calls(&self) {
        self.state.lock().await.calls.clear();
    }
}
