//! Suite statistics
//!
//! Counters and timing owned by a suite, accumulated only while it runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::Serialize;

use crate::case::CaseState;

/// Aggregated results of a suite's runs.
///
/// Holds after every completed run: `tests == successes + failures + errors`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Statistics {
    pub(crate) tests: usize,
    pub(crate) failures: usize,
    pub(crate) errors: usize,
    pub(crate) elapsed: Duration,
}

impl Statistics {
    /// Total number of registered cases.
    pub fn tests(&self) -> usize {
        self.tests
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Passed cases, derived from the other counters.
    pub fn successes(&self) -> usize {
        self.tests - self.failures - self.errors
    }

    /// Failures plus errors.
    pub fn faults(&self) -> usize {
        self.failures + self.errors
    }

    /// Cumulative wall-clock time spent running the suite.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub(crate) fn record(&mut self, state: CaseState) {
        match state {
            CaseState::Failed => self.failures += 1,
            CaseState::Errored => self.errors += 1,
            _ => {}
        }
    }
}

/// Fail/error counters shared across workers during the parallel phase.
///
/// Workers tally through atomics; the suite folds the result into its
/// [`Statistics`] once all workers have joined.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    failures: AtomicUsize,
    errors: AtomicUsize,
}

impl Tally {
    pub(crate) fn record(&self, state: CaseState) {
        match state {
            CaseState::Failed => {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
            CaseState::Errored => {
                self.errors.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    pub(crate) fn fold_into(&self, stats: &mut Statistics) {
        stats.failures += self.failures.load(Ordering::Acquire);
        stats.errors += self.errors.load(Ordering::Acquire);
    }
}
