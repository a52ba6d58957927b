//! Beacon: background refresh of per-repository status indicators.
//!
//! The host application shows a status indicator next to every repository in
//! its sidebar. This crate keeps those indicators fresh: a single
//! [`IndicatorUpdater`] periodically walks the current repository collection
//! and invokes a host-supplied refresh action for each one, while supporting
//! cooperative pause/resume without losing iteration progress.
//!
//! # Architecture
//!
//! The updater is built from small pieces that share one piece of mutable
//! state:
//! - **Lifecycle gate**: idempotent `start`/`stop`
//! - **Interval scheduler**: compensating delay plus a per-instance random
//!   skew, with at most one armed timer at a time
//! - **Pause gate**: a suspend/resume signal any in-flight pass awaits on
//! - **Iteration engine**: one sequential pass over the live collection,
//!   re-queried on every step so membership changes are respected mid-pass
//!
//! The host injects the collection source and the per-repository refresh
//! action; this crate performs no I/O of its own.

pub mod config;
pub mod error;
pub mod updater;

pub use config::UpdaterConfig;
pub use error::{IndicatorError, Result};
pub use updater::{Identifiable, IndicatorUpdater, PassSummary, PauseGate};
