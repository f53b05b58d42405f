//! Result reporting
//!
//! Reporters consume finished suites through a four-operation contract and
//! accumulate absolute totals across every suite they see. A reporter may
//! serve multiple runner invocations; each `begin_report` starts a fresh
//! accumulation.

mod console;
mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

use std::time::Duration;

use crate::error::Result;
use crate::stats::Statistics;
use crate::suite::TestSuite;

/// Output-format-specific consumer of suite results.
///
/// The runner calls `begin_report` once, then `report` once per selected suite
/// after that suite has run, then `end_report` once.
pub trait Reporter: Send {
    fn begin_report(&mut self) -> Result<()>;

    fn report(&mut self, suite: &TestSuite) -> Result<()>;

    fn end_report(&mut self) -> Result<()>;

    /// Cumulative failures plus errors seen since the last `begin_report`.
    fn fault_count(&self) -> usize;
}

/// Absolute counters a reporter accumulates across reported suites.
#[derive(Clone, Copy, Debug, Default)]
pub struct Totals {
    pub tests: usize,
    pub failures: usize,
    pub errors: usize,
    pub elapsed: Duration,
}

impl Totals {
    pub fn reset(&mut self) {
        *self = Totals::default();
    }

    pub fn absorb(&mut self, stats: &Statistics) {
        self.tests += stats.tests();
        self.failures += stats.failures();
        self.errors += stats.errors();
        self.elapsed += stats.elapsed();
    }

    pub fn successes(&self) -> usize {
        self.tests - self.failures - self.errors
    }

    pub fn faults(&self) -> usize {
        self.failures + self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_absorb_and_reset() {
        let mut totals = Totals::default();
        let stats = Statistics {
            tests: 4,
            failures: 1,
            errors: 1,
            elapsed: Duration::from_millis(20),
        };
        totals.absorb(&stats);
        totals.absorb(&stats);

        assert_eq!(totals.tests, 8);
        assert_eq!(totals.faults(), 4);
        assert_eq!(totals.successes(), 4);
        assert_eq!(totals.elapsed, Duration::from_millis(40));

        totals.reset();
        assert_eq!(totals.tests, 0);
        assert_eq!(totals.faults(), 0);
    }
}
