//! veritest - a lightweight unit-testing framework
//!
//! Declare named test suites, register cases with optional lifecycle hooks
//! (setup, teardown, before-each, after-each), execute them sequentially or
//! across a worker pool, and render the collected results through pluggable
//! reporters.
//!
//! ## Features
//!
//! - Sequential and parallel suites with identical hook semantics
//! - Per-case stdout/stderr capture, isolated even under concurrency
//! - Pass/fail/error classification with timing per case
//! - Four-operation reporter contract with console and JSON implementations
//! - Suite-name filtering (include/exclude) driven by compiled regex patterns
//!
//! ## Usage
//!
//! ```no_run
//! use veritest::{ConsoleReporter, RunConfig, Runner, TestSuite};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut runner = Runner::new();
//!     let math = runner.add_suite(TestSuite::new("math"));
//!     {
//!         let mut math = math.lock().await;
//!         math.test("addition", || {
//!             veritest::check_eq!(1 + 1, 2);
//!             Ok(())
//!         });
//!         math.test("division", || {
//!             veritest::check!(10 / 2 == 5, "integer division is exact here");
//!             Ok(())
//!         });
//!     }
//!
//!     let mut config = RunConfig::new(Box::new(ConsoleReporter::stdout()));
//!     std::process::exit(runner.run(&mut config).await as i32);
//! }
//! ```
//!
//! Binaries that register their suites with [`default_runner`] can instead
//! delegate the whole main body to [`cli::default_main`], which parses
//! command-line arguments into the run configuration.

pub mod capture;
pub mod case;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod runner;
pub mod stats;
pub mod suite;

pub use case::{CaseFn, CaseResult, CaseState, TestCase};
pub use config::{FilterMode, RunConfig};
pub use error::{Error, Fault, Location, Result};
pub use report::{ConsoleReporter, JsonReporter, Reporter, Totals};
pub use runner::{default_runner, Runner, SuiteHandle, FATAL};
pub use stats::Statistics;
pub use suite::{HookFn, SuiteState, TestSuite};
