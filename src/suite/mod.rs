//! Test suites
//!
//! Groups test cases together with shared lifecycle hooks and aggregate
//! statistics. Cases run sequentially in registration order by default;
//! suites created with [`TestSuite::parallel`] distribute cases across a
//! worker pool instead.

mod parallel;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::case::{CaseResult, CaseState, TestCase};
use crate::stats::Statistics;

/// Hook bound to a suite lifecycle point. Faults raised inside a hook are
/// swallowed and never recorded as case results.
pub type HookFn = Arc<dyn Fn() + Send + Sync + 'static>;

#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) setup: Option<HookFn>,
    pub(crate) teardown: Option<HookFn>,
    pub(crate) before_each: Option<HookFn>,
    pub(crate) after_each: Option<HookFn>,
}

/// Completion state of a suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuiteState {
    /// At least one registered case has not been run.
    Pending,
    /// All registered cases have been run.
    Done,
}

/// Scheduling model, selected at suite creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Concurrency {
    Sequential,
    Parallel { workers: usize },
}

/// Named group of test cases sharing lifecycle hooks and statistics.
pub struct TestSuite {
    name: String,
    created_at: DateTime<Utc>,
    cases: Vec<TestCase>,
    hooks: Hooks,
    stats: Statistics,
    state: SuiteState,
    mode: Concurrency,
}

impl TestSuite {
    /// Create a suite whose cases run one at a time in registration order.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_mode(name, Concurrency::Sequential)
    }

    /// Create a suite whose cases run concurrently on a worker pool sized to
    /// the available hardware concurrency, minimum one worker.
    pub fn parallel(name: impl Into<String>) -> Self {
        let workers = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self::with_mode(name, Concurrency::Parallel { workers })
    }

    fn with_mode(name: impl Into<String>, mode: Concurrency) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            cases: Vec::new(),
            hooks: Hooks::default(),
            stats: Statistics::default(),
            state: SuiteState::Pending,
            mode,
        }
    }

    /// Override the worker pool size. Has no effect on sequential suites.
    pub fn with_workers(mut self, workers: usize) -> Self {
        if let Concurrency::Parallel { workers: w } = &mut self.mode {
            *w = workers.max(1);
        }
        self
    }

    /// Register a test case. Registering a case on a finished suite reopens
    /// it, so a later run executes only the cases that have not run yet.
    pub fn test(
        &mut self,
        name: impl Into<String>,
        func: impl FnOnce() -> CaseResult + Send + 'static,
    ) -> &mut Self {
        self.cases
            .push(TestCase::new(name, self.name.clone(), Box::new(func)));
        self.state = SuiteState::Pending;
        self
    }

    /// Set a function executed once before all cases.
    pub fn setup(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.hooks.setup = Some(Arc::new(hook));
        self
    }

    /// Set a function executed once after all cases.
    pub fn teardown(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.hooks.teardown = Some(Arc::new(hook));
        self
    }

    /// Set a function executed before each case.
    pub fn before_each(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.hooks.before_each = Some(Arc::new(hook));
        self
    }

    /// Set a function executed after each case.
    pub fn after_each(&mut self, hook: impl Fn() + Send + Sync + 'static) -> &mut Self {
        self.hooks.after_each = Some(Arc::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Point in time when this suite was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn is_done(&self) -> bool {
        self.state == SuiteState::Done
    }

    /// Run all cases that have not run yet. A finished suite is a no-op, so
    /// calling this twice never re-executes a case. Setup and teardown bracket
    /// the case phase exactly once per call; statistics are accumulated during
    /// this single pass.
    pub async fn run(&mut self) {
        if self.state == SuiteState::Done {
            return;
        }
        info!(suite = %self.name, cases = self.cases.len(), "running suite");

        let start = Instant::now();
        self.stats.tests = self.cases.len();
        run_hook(self.hooks.setup.as_ref(), "setup");

        match self.mode {
            Concurrency::Sequential => self.run_sequential(),
            Concurrency::Parallel { workers } => self.run_parallel(workers).await,
        }

        run_hook(self.hooks.teardown.as_ref(), "teardown");
        self.state = SuiteState::Done;
        self.stats.elapsed += start.elapsed();

        info!(
            suite = %self.name,
            passed = self.stats.successes(),
            failed = self.stats.failures(),
            errored = self.stats.errors(),
            ms = self.stats.elapsed().as_millis() as u64,
            "suite finished"
        );
    }

    fn run_sequential(&mut self) {
        for case in &mut self.cases {
            if case.state() != CaseState::NotRun {
                continue;
            }
            run_hook(self.hooks.before_each.as_ref(), "before_each");
            case.execute();
            self.stats.record(case.state());
            run_hook(self.hooks.after_each.as_ref(), "after_each");
        }
    }

    async fn run_parallel(&mut self, workers: usize) {
        let cases = std::mem::take(&mut self.cases);
        self.cases =
            parallel::run_cases(cases, workers, self.hooks.clone(), &mut self.stats).await;
    }
}

/// Run a lifecycle hook, swallowing any fault it raises.
pub(crate) fn run_hook(hook: Option<&HookFn>, label: &str) {
    if let Some(hook) = hook {
        if panic::catch_unwind(AssertUnwindSafe(|| hook())).is_err() {
            warn!(hook = label, "lifecycle hook raised a fault; ignoring");
        }
    }
}
