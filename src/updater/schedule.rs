//! Refresh pass scheduling arithmetic.
//!
//! Pure helpers for the interval scheduler: the compensating delay before
//! the next pass, and the once-per-instance skew draw.

use std::time::Duration;
use tokio::time::Instant;

/// Computes the delay before the next refresh pass.
///
/// The schedule is self-correcting: a pass that ran long (including paused
/// time) pulls the next one closer, but the delay never drops below the skew
/// and never goes negative. A collection that has never been refreshed is
/// treated as infinitely stale, so only the skew remains.
pub(crate) fn next_pass_delay(
    last_pass_started_at: Option<Instant>,
    now: Instant,
    interval: Duration,
    skew: Duration,
) -> Duration {
    match last_pass_started_at {
        None => skew,
        Some(at) => interval.saturating_sub(now.duration_since(at)) + skew,
    }
}

/// Draws the per-instance scheduling skew, uniform over `[0, bound]`.
///
/// Pseudo-random is fine here; the skew only desynchronizes instances that
/// would otherwise fire in lockstep.
pub(crate) fn draw_skew(bound: Duration) -> Duration {
    bound.mul_f64(rand::random::<f64>())
}
