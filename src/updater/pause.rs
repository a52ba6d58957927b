//! Suspend/resume gate used to halt iteration without losing progress.

use tokio::sync::watch;

/// A resumable binary signal.
///
/// `pause` arms the gate; `resume` releases every task currently waiting on
/// it. Resuming before anyone waits leaves the gate open, so a later
/// [`wait_until_resumed`](PauseGate::wait_until_resumed) returns immediately
/// — there is no missed-signal race. Repeated pause/resume cycles reuse the
/// same channel, so a wait from a previous cycle can never observe a stale
/// signal.
#[derive(Debug)]
pub struct PauseGate {
    paused: watch::Sender<bool>,
}

impl PauseGate {
    /// Create an open (unpaused) gate.
    pub fn new() -> Self {
        let (paused, _) = watch::channel(false);
        Self { paused }
    }

    /// Arm the gate. Returns `true` if the gate was previously open.
    pub fn pause(&self) -> bool {
        !self.paused.send_replace(true)
    }

    /// Release the gate, waking all waiters. Returns `true` if the gate was
    /// previously armed.
    pub fn resume(&self) -> bool {
        self.paused.send_replace(false)
    }

    /// Whether the gate is currently armed.
    pub fn is_paused(&self) -> bool {
        *self.paused.borrow()
    }

    /// Suspend until the gate is open.
    ///
    /// Returns immediately when not paused. Does not busy-wait.
    pub async fn wait_until_resumed(&self) {
        let mut rx = self.paused.subscribe();
        // Cannot fail: the sender lives as long as `self`.
        let _ = rx.wait_for(|paused| !*paused).await;
    }
}

impl Default for PauseGate {
    fn default() -> Self {
        Self::new()
    }
}
