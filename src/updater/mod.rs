//! Background refresh of per-repository status indicators.
//!
//! [`IndicatorUpdater`] periodically walks the host's current repository
//! collection and invokes a host-supplied async refresh action for each
//! repository, one at a time. The collection is re-queried on every step, so
//! repositories added or removed mid-pass are respected. A pass can be
//! paused and resumed at any point without losing progress, and the time
//! spent paused is tracked separately from active refresh time.
//!
//! Scheduling is self-correcting: each pass records when it started, and the
//! next timer is armed for `max(interval - elapsed, 0) + skew`, where the
//! skew is drawn once per instance to keep independent instances from firing
//! in lockstep.

mod pause;
mod schedule;

pub use pause::PauseGate;

use crate::config::UpdaterConfig;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Minimal interface the updater needs from a repository.
pub trait Identifiable {
    /// Stable unique identifier. Must not change for the life of the
    /// repository.
    fn id(&self) -> u64;
}

/// Callback producing the current repository collection.
///
/// Called repeatedly while a pass is in flight — it must reflect live
/// membership, not a snapshot, so the caller may return a different sequence
/// on every call.
pub type RepositorySource<R> = Box<dyn Fn() -> Vec<R> + Send + Sync>;

/// Future returned by an indicator refresh action.
pub type RefreshFuture = Pin<Box<dyn Future<Output = crate::Result<()>> + Send>>;

/// Callback refreshing a single repository's indicator.
pub type IndicatorRefresher<R> = Box<dyn Fn(&R) -> RefreshFuture + Send + Sync>;

/// Summary of one completed refresh pass.
///
/// Emitted after every pass that visited at least one repository, both as an
/// `info!` log line and over the channel registered with
/// [`IndicatorUpdater::subscribe_summaries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// Repositories visited this pass, including failed refreshes.
    pub refreshed: usize,
    /// Subset of visited repositories whose refresh action failed.
    pub failed: usize,
    /// Wall-clock duration of the pass.
    pub total: Duration,
    /// Time spent actually refreshing (`total` minus `paused`).
    pub active: Duration,
    /// Time spent suspended on the pause gate.
    pub paused: Duration,
}

/// Mutable updater state. Owned exclusively by one [`IndicatorUpdater`].
struct UpdaterState {
    running: bool,
    /// Handle for the armed one-shot timer, if any. Covers only the delay:
    /// once the timer fires the pass runs in its own task, so aborting this
    /// handle never kills an in-flight refresh.
    timer: Option<JoinHandle<()>>,
    last_pass_started_at: Option<Instant>,
    summary_tx: Option<mpsc::UnboundedSender<PassSummary>>,
}

struct Inner<R> {
    source: RepositorySource<R>,
    refresh: IndicatorRefresher<R>,
    interval: Duration,
    /// Drawn once at construction; stable for the instance's lifetime.
    skew: Duration,
    gate: PauseGate,
    state: Mutex<UpdaterState>,
}

/// Periodically refreshes the status indicator of every repository in a
/// live, host-supplied collection.
///
/// All public operations are synchronous, idempotent, and fire-and-forget;
/// the actual work happens on spawned tokio tasks. Exactly one pass is in
/// flight at a time, and at most one timer is armed at a time.
pub struct IndicatorUpdater<R> {
    inner: Arc<Inner<R>>,
}

impl<R: Identifiable + Send + 'static> IndicatorUpdater<R> {
    /// Create a stopped, unpaused updater with default timing
    /// ([`UpdaterConfig::default`]).
    pub fn new(source: RepositorySource<R>, refresh: IndicatorRefresher<R>) -> Self {
        Self::with_config(source, refresh, UpdaterConfig::default())
    }

    /// Create a stopped, unpaused updater with explicit timing. The
    /// scheduling skew is drawn here and held for the instance's lifetime.
    pub fn with_config(
        source: RepositorySource<R>,
        refresh: IndicatorRefresher<R>,
        config: UpdaterConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                refresh,
                interval: config.interval(),
                skew: schedule::draw_skew(config.skew_bound()),
                gate: PauseGate::new(),
                state: Mutex::new(UpdaterState {
                    running: false,
                    timer: None,
                    last_pass_started_at: None,
                    summary_tx: None,
                }),
            }),
        }
    }

    /// Register a channel receiving a [`PassSummary`] after every non-empty
    /// pass. A later call replaces the previous subscriber.
    pub fn subscribe_summaries(&self) -> mpsc::UnboundedReceiver<PassSummary> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.state_guard().summary_tx = Some(tx);
        rx
    }

    /// Start the refresh cycle. No-op when already running; in particular a
    /// repeated `start` does not reset timing state or arm a second timer.
    pub fn start(&self) {
        let mut state = self.inner.state_guard();
        if state.running {
            return;
        }
        debug!("starting indicator updater");
        state.running = true;
        Inner::schedule_pass(&self.inner, &mut state);
    }

    /// Stop the refresh cycle and cancel any armed timer. No-op when already
    /// stopped. A pass already in flight is not aborted forcibly; it
    /// observes the stopped state at its next suspension point and winds
    /// down without re-arming.
    pub fn stop(&self) {
        let mut state = self.inner.state_guard();
        if !state.running {
            return;
        }
        debug!("stopping indicator updater");
        state.running = false;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    /// Suspend iteration. The in-flight pass (if any) finishes the current
    /// repository's refresh, then blocks until [`resume`](Self::resume).
    /// No-op when already paused.
    pub fn pause(&self) {
        if self.inner.gate.pause() {
            debug!("pausing indicator updater");
        }
    }

    /// Release a paused pass. No-op when not paused; resuming before
    /// anything waits leaves the gate open.
    pub fn resume(&self) {
        if self.inner.gate.resume() {
            debug!("resuming indicator updater");
        }
    }

    /// Whether the updater is currently started.
    pub fn is_running(&self) -> bool {
        self.inner.state_guard().running
    }

    /// Whether the pause gate is currently armed.
    pub fn is_paused(&self) -> bool {
        self.inner.gate.is_paused()
    }
}

impl<R: Identifiable + Send + 'static> Inner<R> {
    fn state_guard(&self) -> MutexGuard<'_, UpdaterState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_running(&self) -> bool {
        self.state_guard().running
    }

    /// Arm the one-shot timer for the next pass. No-op when stopped or when
    /// a timer is already outstanding, so re-entrant calls are safe.
    fn schedule_pass(inner: &Arc<Self>, state: &mut UpdaterState) {
        if !state.running || state.timer.is_some() {
            return;
        }

        let now = Instant::now();
        let delay =
            schedule::next_pass_delay(state.last_pass_started_at, now, inner.interval, inner.skew);
        match state.last_pass_started_at {
            Some(at) => debug!(
                last_pass_secs = now.duration_since(at).as_secs_f64(),
                delay_secs = delay.as_secs_f64(),
                "scheduling refresh pass"
            ),
            None => debug!(
                delay_secs = delay.as_secs_f64(),
                "scheduling first refresh pass"
            ),
        }

        let task_inner = Arc::clone(inner);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Hand the pass off to its own task: from here on, aborting the
            // timer handle must not kill an in-flight refresh.
            tokio::spawn(Self::run_pass(task_inner));
        }));
    }

    /// One full pass over the live repository collection.
    async fn run_pass(inner: Arc<Self>) {
        // The timer has fired; drop its handle so the next pass can be armed.
        inner.state_guard().timer = None;
        debug!("running refresh pass");

        if inner.gate.is_paused() {
            debug!("paused before pass start");
            inner.gate.wait_until_resumed().await;
            if !inner.is_running() {
                return;
            }
        }

        let start = Instant::now();
        {
            let mut state = inner.state_guard();
            if !state.running {
                return;
            }
            state.last_pass_started_at = Some(start);
        }

        let mut done: HashSet<u64> = HashSet::new();
        let mut failed = 0usize;
        let mut paused_time = Duration::ZERO;

        while inner.is_running() {
            // Re-query the live collection; repositories added mid-pass are
            // picked up, removed ones stop being returned.
            let Some(repository) = (inner.source)().into_iter().find(|r| !done.contains(&r.id()))
            else {
                break;
            };
            let id = repository.id();

            if let Err(e) = (inner.refresh)(&repository).await {
                failed += 1;
                warn!(repository = id, error = %e, "indicator refresh failed, skipping");
            }

            if inner.gate.is_paused() {
                debug!(refreshed = done.len(), "pausing refresh pass");
                let pause_started = Instant::now();
                inner.gate.wait_until_resumed().await;
                paused_time += pause_started.elapsed();
                debug!(
                    paused_secs = paused_time.as_secs_f64(),
                    "resuming refresh pass"
                );
            }

            // Marked visited only after the pause check, so re-queries during
            // a long pause neither reprocess nor skip this repository.
            done.insert(id);
        }

        if !done.is_empty() {
            let total = start.elapsed();
            let summary = PassSummary {
                refreshed: done.len(),
                failed,
                total,
                active: total.saturating_sub(paused_time),
                paused: paused_time,
            };
            info!(
                repositories = summary.refreshed,
                failures = summary.failed,
                active_secs = summary.active.as_secs_f64(),
                paused_secs = summary.paused.as_secs_f64(),
                total_secs = summary.total.as_secs_f64(),
                "refreshed sidebar indicators"
            );

            let state = inner.state_guard();
            if let Some(tx) = &state.summary_tx {
                // Observational only; a dropped receiver is not an error.
                let _ = tx.send(summary);
            }
        }

        let mut state = inner.state_guard();
        Inner::schedule_pass(&inner, &mut state);
    }
}
