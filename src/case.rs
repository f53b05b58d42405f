//! Test cases
//!
//! A named unit of work bound to a function. A case owns its result state,
//! timing, and the output it wrote while executing. It executes at most once;
//! the suite enforces this, and [`TestCase::execute`] additionally no-ops when
//! a terminal state was already reached.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::capture::CaptureGuard;
use crate::error::Fault;

/// Result type returned by test case bodies.
pub type CaseResult = Result<(), Fault>;

/// Function bound to a test case.
pub type CaseFn = Box<dyn FnOnce() -> CaseResult + Send + 'static>;

/// Execution state of a test case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseState {
    NotRun,
    Passed,
    Failed,
    Errored,
}

impl CaseState {
    pub fn symbol(&self) -> &'static str {
        match self {
            CaseState::NotRun => "○",
            CaseState::Passed => "✓",
            CaseState::Failed => "✗",
            CaseState::Errored => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CaseState::Passed)
    }
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseState::NotRun => write!(f, "NOT RUN"),
            CaseState::Passed => write!(f, "PASSED"),
            CaseState::Failed => write!(f, "FAILED"),
            CaseState::Errored => write!(f, "ERRORED"),
        }
    }
}

/// A single named test bound to a function, owned by its suite.
pub struct TestCase {
    name: String,
    context: String,
    state: CaseState,
    reason: String,
    duration: Duration,
    stdout: String,
    stderr: String,
    func: Option<CaseFn>,
}

impl TestCase {
    pub(crate) fn new(name: impl Into<String>, context: impl Into<String>, func: CaseFn) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            state: CaseState::NotRun,
            reason: String::new(),
            duration: Duration::ZERO,
            stdout: String::new(),
            stderr: String::new(),
            func: Some(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the suite this case belongs to.
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn state(&self) -> CaseState {
        self.state
    }

    /// Failure or error message; empty when the case passed.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Wall-clock duration of the bound function's call.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Text the case wrote to standard output during its execution window.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Text the case wrote to standard error during its execution window.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Invoke the bound function once, capturing its output and classifying
    /// the outcome. Duration is recorded regardless of the outcome.
    pub(crate) fn execute(&mut self) {
        if self.state != CaseState::NotRun {
            return;
        }
        let Some(func) = self.func.take() else {
            return;
        };

        let guard = CaptureGuard::install();
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(func));
        self.duration = start.elapsed();
        let (out, err) = guard.finish();
        self.stdout = out;
        self.stderr = err;

        match outcome {
            Ok(Ok(())) => {
                self.state = CaseState::Passed;
            }
            Ok(Err(fault @ Fault::Assertion { .. })) => {
                self.state = CaseState::Failed;
                self.reason = fault.to_string();
            }
            Ok(Err(fault)) => {
                self.state = CaseState::Errored;
                self.reason = fault.to_string();
            }
            Err(payload) => {
                self.state = CaseState::Errored;
                self.reason = panic_message(payload.as_ref());
            }
        }

        debug!(
            case = %self.name,
            state = %self.state,
            ms = self.duration.as_millis() as u64,
            "case finished"
        );
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("context", &self.context)
            .field("state", &self.state)
            .field("reason", &self.reason)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(func: impl FnOnce() -> CaseResult + Send + 'static) -> TestCase {
        TestCase::new("case", "suite", Box::new(func))
    }

    #[test]
    fn passing_body_yields_passed() {
        let mut tc = case(|| Ok(()));
        tc.execute();
        assert_eq!(tc.state(), CaseState::Passed);
        assert!(tc.reason().is_empty());
    }

    #[test]
    fn assertion_fault_yields_failed_with_reason() {
        let mut tc = case(|| {
            crate::check_eq!(2, 1);
            Ok(())
        });
        tc.execute();
        assert_eq!(tc.state(), CaseState::Failed);
        assert!(tc.reason().contains("expected 1, got 2"));
    }

    #[test]
    fn other_fault_yields_errored() {
        let mut tc = case(|| Err(Fault::error("disk on fire")));
        tc.execute();
        assert_eq!(tc.state(), CaseState::Errored);
        assert_eq!(tc.reason(), "disk on fire");
    }

    #[test]
    fn panic_in_body_yields_errored_with_message() {
        let mut tc = case(|| panic!("index out of bounds"));
        tc.execute();
        assert_eq!(tc.state(), CaseState::Errored);
        assert!(tc.reason().contains("index out of bounds"));
    }

    #[test]
    fn panic_without_message_yields_generic_reason() {
        let mut tc = case(|| panic::panic_any(42_u32));
        tc.execute();
        assert_eq!(tc.state(), CaseState::Errored);
        assert_eq!(tc.reason(), "unknown error");
    }

    #[test]
    fn duration_is_recorded_on_failure() {
        let mut tc = case(|| {
            std::thread::sleep(Duration::from_millis(10));
            Err(Fault::error("late failure"))
        });
        tc.execute();
        assert!(tc.duration() >= Duration::from_millis(10));
    }

    #[test]
    fn output_is_attached_to_the_case() {
        let mut tc = case(|| {
            crate::outln!("hello");
            crate::errln!("world");
            Ok(())
        });
        tc.execute();
        assert_eq!(tc.stdout(), "hello\n");
        assert_eq!(tc.stderr(), "world\n");
    }

    #[test]
    fn execute_twice_is_a_no_op() {
        let mut tc = case(|| Ok(()));
        tc.execute();
        let first = tc.duration();
        tc.execute();
        assert_eq!(tc.state(), CaseState::Passed);
        assert_eq!(tc.duration(), first);
    }
}
