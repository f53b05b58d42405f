//! Error and fault types
//!
//! Separates faults raised inside a test case body (classified into the case
//! result) from errors of the framework itself (caught at the runner boundary).

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Source location attached to an assertion failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Fault raised by a test case body.
///
/// An [`Assertion`](Fault::Assertion) fault means an expectation was not met
/// and classifies the case as failed; every other fault classifies it as
/// errored.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("{message} at {location}")]
    Assertion { message: String, location: Location },

    #[error("{0}")]
    Error(String),
}

impl Fault {
    /// Build an assertion fault with its source location.
    pub fn assertion(message: impl Into<String>, file: &'static str, line: u32) -> Self {
        Fault::Assertion {
            message: message.into(),
            location: Location { file, line },
        }
    }

    /// Build a non-assertion fault from any message.
    pub fn error(message: impl Into<String>) -> Self {
        Fault::Error(message.into())
    }
}

impl From<anyhow::Error> for Fault {
    fn from(e: anyhow::Error) -> Self {
        Fault::Error(format!("{e:#}"))
    }
}

/// Framework-level errors, surfaced at the runner boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid filter pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown report format `{0}`")]
    Format(String),

    #[error("could not write report: {0}")]
    Report(#[from] std::io::Error),

    #[error("could not encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fail the current test case with an assertion failure.
///
/// Expands to an early return, so it may only appear in functions returning
/// [`CaseResult`](crate::CaseResult).
#[macro_export]
macro_rules! fail {
    ($($arg:tt)*) => {
        return ::core::result::Result::Err($crate::Fault::assertion(
            ::std::format!($($arg)*),
            ::core::file!(),
            ::core::line!(),
        ))
    };
}

/// Fail the current test case unless the predicate holds.
#[macro_export]
macro_rules! check {
    ($cond:expr) => {
        if !$cond {
            $crate::fail!("check failed: `{}`", ::core::stringify!($cond));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::fail!($($arg)*);
        }
    };
}

/// Fail the current test case unless both values compare equal.
#[macro_export]
macro_rules! check_eq {
    ($actual:expr, $expected:expr) => {{
        let (actual, expected) = (&$actual, &$expected);
        if actual != expected {
            $crate::fail!("expected {:?}, got {:?}", expected, actual);
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_display_carries_location() {
        let fault = Fault::assertion("expected 1, got 2", "suite.rs", 42);
        assert_eq!(fault.to_string(), "expected 1, got 2 at suite.rs:42");
    }

    #[test]
    fn anyhow_converts_to_error_fault() {
        let fault: Fault = anyhow::anyhow!("broken pipe").into();
        match fault {
            Fault::Error(msg) => assert_eq!(msg, "broken pipe"),
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    #[test]
    fn check_macros_produce_assertions() {
        fn body() -> crate::CaseResult {
            check!(1 < 2);
            check_eq!(1 + 1, 2);
            check_eq!(2 + 2, 5);
            Ok(())
        }

        match body() {
            Err(Fault::Assertion { message, .. }) => {
                assert_eq!(message, "expected 5, got 4");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
