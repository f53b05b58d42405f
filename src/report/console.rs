//! Plain-text console reporter
//!
//! One line per case plus a totals footer, optionally colorized and optionally
//! including the output each case wrote.

use std::io::{self, Write};

use crate::case::{CaseState, TestCase};
use crate::error::Result;
use crate::report::{Reporter, Totals};
use crate::suite::TestSuite;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Writes suite results as indented text.
pub struct ConsoleReporter {
    out: Box<dyn Write + Send>,
    colorize: bool,
    capture: bool,
    totals: Totals,
}

impl ConsoleReporter {
    /// Report to the process's standard output.
    pub fn stdout() -> Self {
        Self::to(Box::new(io::stdout()))
    }

    /// Report to an arbitrary sink.
    pub fn to(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            colorize: false,
            capture: false,
            totals: Totals::default(),
        }
    }

    /// Colorize case states with ANSI escapes.
    pub fn with_color(mut self) -> Self {
        self.colorize = true;
        self
    }

    /// Include each case's captured stdout/stderr in the report.
    pub fn with_captured_output(mut self) -> Self {
        self.capture = true;
        self
    }

    fn status(&self, state: CaseState) -> String {
        let plain = format!("{} {}", state.symbol(), state);
        if !self.colorize {
            return plain;
        }
        match state {
            CaseState::Passed => format!("{GREEN}{plain}{RESET}"),
            CaseState::Failed | CaseState::Errored => format!("{RED}{plain}{RESET}"),
            CaseState::NotRun => plain,
        }
    }

    fn write_case(&mut self, case: &TestCase) -> Result<()> {
        let status = self.status(case.state());
        writeln!(
            self.out,
            "  {:30} {} [{:>6}ms]",
            case.name(),
            status,
            case.duration().as_millis()
        )?;
        if !case.reason().is_empty() {
            writeln!(self.out, "      {}", case.reason())?;
        }
        if self.capture {
            if !case.stdout().is_empty() {
                writeln!(self.out, "      stdout: {}", case.stdout().trim_end())?;
            }
            if !case.stderr().is_empty() {
                writeln!(self.out, "      stderr: {}", case.stderr().trim_end())?;
            }
        }
        Ok(())
    }
}

impl Reporter for ConsoleReporter {
    fn begin_report(&mut self) -> Result<()> {
        self.totals.reset();
        Ok(())
    }

    fn report(&mut self, suite: &TestSuite) -> Result<()> {
        self.totals.absorb(suite.statistics());
        writeln!(
            self.out,
            "{} ({} cases, {}ms)",
            suite.name(),
            suite.cases().len(),
            suite.statistics().elapsed().as_millis()
        )?;
        for case in suite.cases() {
            self.write_case(case)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn end_report(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "Total: {} | Pass: {} | Fail: {} | Error: {} | Time: {}ms",
            self.totals.tests,
            self.totals.successes(),
            self.totals.failures,
            self.totals.errors,
            self.totals.elapsed.as_millis()
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn fault_count(&self) -> usize {
        self.totals.faults()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::suite::TestSuite;
    use std::sync::{Arc, Mutex};

    /// Test sink that stays readable after being boxed into a reporter.
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn reports_cases_and_totals() {
        let mut suite = TestSuite::new("console");
        suite.test("passes", || Ok(()));
        suite.test("fails", || {
            crate::check_eq!(2, 1);
            Ok(())
        });
        suite.run().await;

        let buf = SharedBuf::default();
        let mut reporter = ConsoleReporter::to(Box::new(buf.clone()));
        reporter.begin_report().unwrap();
        reporter.report(&suite).unwrap();
        reporter.end_report().unwrap();

        let text = buf.contents();
        assert!(text.contains("console (2 cases"));
        assert!(text.contains("passes"));
        assert!(text.contains("expected 1, got 2"));
        assert!(text.contains("Total: 2 | Pass: 1 | Fail: 1 | Error: 0"));
        assert_eq!(reporter.fault_count(), 1);
    }

    #[tokio::test]
    async fn captured_output_is_optional() {
        let mut suite = TestSuite::new("captured");
        suite.test("writer", || {
            crate::outln!("visible line");
            Ok(())
        });
        suite.run().await;

        let silent = SharedBuf::default();
        let mut reporter = ConsoleReporter::to(Box::new(silent.clone()));
        reporter.begin_report().unwrap();
        reporter.report(&suite).unwrap();
        reporter.end_report().unwrap();
        assert!(!silent.contents().contains("visible line"));

        let verbose = SharedBuf::default();
        let mut reporter = ConsoleReporter::to(Box::new(verbose.clone())).with_captured_output();
        reporter.begin_report().unwrap();
        reporter.report(&suite).unwrap();
        reporter.end_report().unwrap();
        assert!(verbose.contents().contains("stdout: visible line"));
    }

    #[tokio::test]
    async fn color_wraps_case_states() {
        let mut suite = TestSuite::new("colored");
        suite.test("ok", || Ok(()));
        suite.run().await;

        let buf = SharedBuf::default();
        let mut reporter = ConsoleReporter::to(Box::new(buf.clone())).with_color();
        reporter.begin_report().unwrap();
        reporter.report(&suite).unwrap();
        reporter.end_report().unwrap();

        assert!(buf.contents().contains("\x1b[32m"));
    }
}
