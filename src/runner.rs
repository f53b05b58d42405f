//! Suite orchestration
//!
//! The runner owns the suite registry, executes suites one at a time in
//! registration order (each suite may parallelize its own cases internally),
//! and drives the reporter lifecycle. Cases run only once, but suites are
//! reported fresh on every invocation.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::config::RunConfig;
use crate::error::Result;
use crate::suite::TestSuite;

/// Shared handle to a registered suite, kept by callers for further
/// registration after [`Runner::add_suite`].
pub type SuiteHandle = Arc<Mutex<TestSuite>>;

/// Returned when a fatal configuration or runtime error was caught at the
/// runner boundary.
pub const FATAL: i64 = -2;

/// Registry of suites, executed and reported in insertion order.
#[derive(Default)]
pub struct Runner {
    suites: Vec<SuiteHandle>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a suite, returning a shared handle to it.
    pub fn add_suite(&mut self, suite: TestSuite) -> SuiteHandle {
        let handle = Arc::new(Mutex::new(suite));
        self.suites.push(Arc::clone(&handle));
        handle
    }

    pub fn suites(&self) -> &[SuiteHandle] {
        &self.suites
    }

    /// Run every selected suite and report it. Suites that already finished
    /// are reported again without re-executing their cases.
    ///
    /// Returns the reporter's fault count, saturated to `i64::MAX`, or
    /// [`FATAL`] when an error escaped execution or reporting. Nothing a user
    /// test does can make this panic.
    pub async fn run(&mut self, config: &mut RunConfig) -> i64 {
        match self.try_run(config).await {
            Ok(faults) => i64::try_from(faults).unwrap_or(i64::MAX),
            Err(e) => {
                error!(error = %e, "fatal error during test run");
                eprintln!("A fatal error occurred: {e}");
                FATAL
            }
        }
    }

    async fn try_run(&mut self, config: &mut RunConfig) -> Result<usize> {
        config.reporter.begin_report()?;
        for handle in &self.suites {
            let mut suite = handle.lock().await;
            if !config.selects(suite.name()) {
                debug!(suite = %suite.name(), "suite filtered out");
                continue;
            }
            suite.run().await;
            config.reporter.report(&suite)?;
        }
        config.reporter.end_report()?;
        Ok(config.reporter.fault_count())
    }
}

static DEFAULT_RUNNER: Lazy<Mutex<Runner>> = Lazy::new(|| Mutex::new(Runner::new()));

/// Process-wide default runner, so test files can register suites without
/// threading a runner reference around. All core logic operates on explicit
/// [`Runner`] instances; this is only a convenience accessor.
pub fn default_runner() -> &'static Mutex<Runner> {
    &DEFAULT_RUNNER
}
