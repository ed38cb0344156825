//! Admission window shared by every request to the game-data service.
//!
//! A counting semaphore holds the permits left in the current period. Each
//! admitted request consumes one permit for good; at every period boundary a
//! background task hands back one permit per admission that finished since
//! the previous boundary. The pool therefore sits at `quota - in_flight`
//! after each reset, and requests still running across a boundary keep
//! counting against the new period.
//! Callers that find the pool empty wait on the semaphore (optionally
//! bounded by a timeout) and learn how many boundaries they waited through.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cpc_core::{ApiRequest, ApiResponse, CpcError, GameDataApi, Middleware, RateLimitConfig};
use tokio::sync::{Semaphore, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

struct WindowState {
    quota: usize,
    permits: Semaphore,
    in_flight: AtomicUsize,
    // Admissions dropped since the last reset.
    finished: AtomicUsize,
    generation: AtomicU64,
}

impl WindowState {
    fn new(quota: usize) -> Self {
        Self {
            quota,
            permits: Semaphore::new(quota),
            in_flight: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
        }
    }

    // A permit taken off the semaphore is gone from `available_permits` before
    // its admission is recorded, so the refill is driven by completions only.
    fn reset(&self) {
        let finished = self.finished.swap(0, Ordering::SeqCst);
        let refill = finished.min(self.quota.saturating_sub(self.permits.available_permits()));
        if refill > 0 {
            self.permits.add_permits(refill);
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            finished,
            in_flight = self.in_flight.load(Ordering::SeqCst),
            available = self.permits.available_permits(),
            "admission window reset"
        );
    }
}

enum Ticker {
    Idle,
    Running {
        stop_tx: oneshot::Sender<()>,
        task: JoinHandle<()>,
    },
    Stopped,
}

/// Process-wide admission control for outgoing requests.
///
/// The reset timer starts lazily on the first admission, on the runtime of
/// the caller, and runs until [`stop`](Self::stop) is called, the window is
/// dropped, or (when configured) the process receives Ctrl-C.
pub struct AdmissionWindow {
    state: Arc<WindowState>,
    config: RateLimitConfig,
    ticker: Mutex<Ticker>,
}

/// Proof of admission; the request counts as in flight until it is dropped.
#[must_use = "dropping the admission immediately ends the in-flight accounting"]
pub struct Admission {
    state: Arc<WindowState>,
    wait_cycles: u32,
}

impl Admission {
    /// Period boundaries the caller waited through before being admitted.
    #[must_use]
    pub const fn wait_cycles(&self) -> u32 {
        self.wait_cycles
    }
}

impl Drop for Admission {
    fn drop(&mut self) {
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.state.finished.fetch_add(1, Ordering::SeqCst);
    }
}

impl AdmissionWindow {
    /// Create a window with a full pool of permits.
    ///
    /// Quotas above what a semaphore can hold are clamped to
    /// [`Semaphore::MAX_PERMITS`].
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        let quota = usize::try_from(config.max_per_period)
            .unwrap_or(usize::MAX)
            .min(Semaphore::MAX_PERMITS);
        Self {
            state: Arc::new(WindowState::new(quota)),
            config,
            ticker: Mutex::new(Ticker::Idle),
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Admissions allowed per period.
    #[must_use]
    pub fn quota(&self) -> usize {
        self.state.quota
    }

    /// Permits left in the current period.
    #[must_use]
    pub fn available(&self) -> usize {
        self.state.permits.available_permits()
    }

    /// Requests admitted and not yet finished.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.state.in_flight.load(Ordering::SeqCst)
    }

    /// True once the window has been stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state.permits.is_closed()
    }

    fn ensure_ticker(&self) {
        let mut ticker = self.ticker.lock().expect("mutex poisoned");
        if !matches!(*ticker, Ticker::Idle) {
            return;
        }
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(run_ticker(
            Arc::clone(&self.state),
            self.config.period,
            self.config.stop_on_ctrl_c,
            stop_rx,
        ));
        *ticker = Ticker::Running { stop_tx, task };
    }

    /// Wait for a permit.
    ///
    /// # Errors
    /// Returns `LimiterStopped` once the window has been stopped and
    /// `AdmissionTimeout` when the configured admission timeout elapses first.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub async fn admit(&self) -> Result<Admission, CpcError> {
        self.ensure_ticker();
        let start_generation = self.state.generation.load(Ordering::SeqCst);
        let started = Instant::now();

        let acquired = match self.config.admission_timeout {
            Some(limit) => tokio::time::timeout(limit, self.state.permits.acquire())
                .await
                .map_err(|_| CpcError::AdmissionTimeout {
                    waited_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                })?,
            None => self.state.permits.acquire().await,
        };
        let permit = acquired.map_err(|_| CpcError::LimiterStopped)?;
        permit.forget();
        self.state.in_flight.fetch_add(1, Ordering::SeqCst);

        let cycles = self.state.generation.load(Ordering::SeqCst) - start_generation;
        let wait_cycles = u32::try_from(cycles).unwrap_or(u32::MAX);
        #[cfg(feature = "tracing")]
        if wait_cycles > 0 {
            tracing::debug!(wait_cycles, "waited for an available admission window");
        }
        Ok(Admission {
            state: Arc::clone(&self.state),
            wait_cycles,
        })
    }

    /// Stop the reset timer and close the window.
    ///
    /// Pending and future admissions fail with `LimiterStopped`.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub fn stop(&self) {
        let prev = std::mem::replace(
            &mut *self.ticker.lock().expect("mutex poisoned"),
            Ticker::Stopped,
        );
        if let Ticker::Running { stop_tx, task } = prev {
            let _ = stop_tx.send(());
            if !task.is_finished() {
                task.abort();
            }
        }
        self.state.permits.close();
        #[cfg(feature = "tracing")]
        tracing::info!("admission window stopped");
    }
}

impl Drop for AdmissionWindow {
    fn drop(&mut self) {
        if let Ok(mut ticker) = self.ticker.lock()
            && let Ticker::Running { stop_tx, task } =
                std::mem::replace(&mut *ticker, Ticker::Stopped)
        {
            let _ = stop_tx.send(());
            task.abort();
        }
    }
}

async fn shutdown_signal(enabled: bool) {
    if enabled && tokio::signal::ctrl_c().await.is_ok() {
        return;
    }
    std::future::pending::<()>().await;
}

async fn run_ticker(
    state: Arc<WindowState>,
    period: Duration,
    stop_on_ctrl_c: bool,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let shutdown = shutdown_signal(stop_on_ctrl_c);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => state.reset(),
            _ = &mut stop_rx => break,
            () = &mut shutdown => {
                #[cfg(feature = "tracing")]
                tracing::info!("shutdown signal received, closing admission window");
                break;
            }
        }
    }
    state.permits.close();
}

/// Connector wrapper that admits every request through an [`AdmissionWindow`].
pub struct RateLimitedApi {
    inner: Arc<dyn GameDataApi>,
    window: Arc<AdmissionWindow>,
}

impl RateLimitedApi {
    /// Wrap `inner` with a shared window.
    #[must_use]
    pub fn new(inner: Arc<dyn GameDataApi>, window: Arc<AdmissionWindow>) -> Self {
        Self { inner, window }
    }

    /// The shared window.
    #[must_use]
    pub fn window(&self) -> &Arc<AdmissionWindow> {
        &self.window
    }
}

#[async_trait]
impl GameDataApi for RateLimitedApi {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch(&self, req: &ApiRequest) -> Result<ApiResponse, CpcError> {
        let admission = self.window.admit().await?;
        let mut resp = self.inner.fetch(req).await?;
        resp.wait_cycles = resp.wait_cycles.saturating_add(admission.wait_cycles());
        Ok(resp)
    }
}

/// Middleware config for constructing a [`RateLimitedApi`].
pub struct RateLimitMiddleware {
    window: Arc<AdmissionWindow>,
}

impl RateLimitMiddleware {
    /// Use an existing window, e.g. one shared with other connector stacks.
    #[must_use]
    pub const fn new(window: Arc<AdmissionWindow>) -> Self {
        Self { window }
    }

    /// Create a fresh window from configuration.
    #[must_use]
    pub fn from_config(config: RateLimitConfig) -> Self {
        Self::new(Arc::new(AdmissionWindow::new(config)))
    }

    /// The window this middleware admits through.
    #[must_use]
    pub fn window(&self) -> Arc<AdmissionWindow> {
        Arc::clone(&self.window)
    }
}

impl Middleware for RateLimitMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn GameDataApi>) -> Arc<dyn GameDataApi> {
        Arc::new(RateLimitedApi::new(inner, self.window))
    }

    fn name(&self) -> &'static str {
        "RateLimitedApi"
    }

    fn config_json(&self) -> serde_json::Value {
        let cfg = self.window.config();
        serde_json::json!({
            "max_per_period": cfg.max_per_period,
            "period_ms": cfg.period.as_millis(),
            "admission_timeout_ms": cfg.admission_timeout.map(|d| d.as_millis()),
            "stop_on_ctrl_c": cfg.stop_on_ctrl_c,
        })
    }
}
