//! Evaluation gating
//!
//! Evaluation is a pure function of current scene state, so skipping a tick
//! only coarsens temporal resolution; it never produces a wrong answer. The
//! scheduler also owns the dirty flag that forces a candidate refresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "candidate list is out of date" marker
///
/// Clones share the same flag, so a clone can be moved into a scene change
/// callback and set from there at any time. Setting is idempotent.
#[derive(Debug, Clone)]
pub struct DirtyFlag(Arc<AtomicBool>);

impl Default for DirtyFlag {
    /// Starts dirty so the first evaluation always refreshes
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl DirtyFlag {
    /// New flag, initially set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag
    pub fn mark(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Read the flag without clearing it
    pub fn is_dirty(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear the flag, returning whether it was set
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// True iff no evaluation has happened yet or at least `interval_ms` has
/// passed since the last one
pub fn should_evaluate(now_ms: u64, last_eval_ms: Option<u64>, interval_ms: u64) -> bool {
    match last_eval_ms {
        None => true,
        Some(last) => now_ms.saturating_sub(last) >= interval_ms,
    }
}

/// Interval gate plus dirty flag for one engine instance
#[derive(Debug, Default)]
pub struct EvaluationScheduler {
    interval_ms: u64,
    last_eval_ms: Option<u64>,
    dirty: DirtyFlag,
}

impl EvaluationScheduler {
    /// Scheduler with the given minimum spacing between evaluations
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            ..Self::default()
        }
    }

    /// Minimum spacing between evaluations
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Change the spacing; takes effect on the next gate check
    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    /// Time of the last evaluation that passed the gate
    pub fn last_evaluation_ms(&self) -> Option<u64> {
        self.last_eval_ms
    }

    /// Gate check; records `now_ms` as the last evaluation when it passes
    pub fn try_begin(&mut self, now_ms: u64) -> bool {
        if !should_evaluate(now_ms, self.last_eval_ms, self.interval_ms) {
            return false;
        }
        self.last_eval_ms = Some(now_ms);
        true
    }

    /// Forget the last evaluation time and set the dirty flag
    pub fn reset(&mut self) {
        self.last_eval_ms = None;
        self.dirty.mark();
    }

    /// Request a candidate refresh before the next evaluation
    pub fn mark_dirty(&self) {
        self.dirty.mark();
    }

    /// Shared handle to the dirty flag, for change callbacks
    pub fn dirty_flag(&self) -> DirtyFlag {
        self.dirty.clone()
    }

    /// Whether a refresh is pending
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Clear the dirty flag, returning whether a refresh is due
    pub fn take_dirty(&self) -> bool {
        self.dirty.take()
    }
}
