//! JSON reporter
//!
//! Buffers one object per reported suite and writes a single document with
//! absolute totals at `end_report`.

use std::io::{self, Write};

use serde_json::{json, Value};

use crate::case::TestCase;
use crate::error::Result;
use crate::report::{Reporter, Totals};
use crate::suite::TestSuite;

/// Serializes suite results as one JSON document.
pub struct JsonReporter {
    out: Box<dyn Write + Send>,
    capture: bool,
    suites: Vec<Value>,
    totals: Totals,
}

impl JsonReporter {
    /// Report to the process's standard output.
    pub fn stdout() -> Self {
        Self::to(Box::new(io::stdout()))
    }

    /// Report to an arbitrary sink.
    pub fn to(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            capture: false,
            suites: Vec::new(),
            totals: Totals::default(),
        }
    }

    /// Include each case's captured stdout/stderr in the document.
    pub fn with_captured_output(mut self) -> Self {
        self.capture = true;
        self
    }

    fn case_value(&self, case: &TestCase) -> Value {
        let mut value = json!({
            "name": case.name(),
            "result": case.state(),
            "reason": case.reason(),
            "time": case.duration().as_secs_f64(),
        });
        if self.capture {
            value["stdout"] = Value::from(case.stdout());
            value["stderr"] = Value::from(case.stderr());
        }
        value
    }
}

impl Reporter for JsonReporter {
    fn begin_report(&mut self) -> Result<()> {
        self.totals.reset();
        self.suites.clear();
        Ok(())
    }

    fn report(&mut self, suite: &TestSuite) -> Result<()> {
        self.totals.absorb(suite.statistics());
        let cases: Vec<Value> = suite.cases().iter().map(|c| self.case_value(c)).collect();
        self.suites.push(json!({
            "name": suite.name(),
            "timestamp": suite.created_at().to_rfc3339(),
            "time": suite.statistics().elapsed().as_secs_f64(),
            "count": suite.statistics().tests(),
            "passes": suite.statistics().successes(),
            "failures": suite.statistics().failures(),
            "errors": suite.statistics().errors(),
            "tests": cases,
        }));
        Ok(())
    }

    fn end_report(&mut self) -> Result<()> {
        let document = json!({
            "testsuites": std::mem::take(&mut self.suites),
            "count": self.totals.tests,
            "passes": self.totals.successes(),
            "failures": self.totals.failures,
            "errors": self.totals.errors,
            "time": self.totals.elapsed.as_secs_f64(),
        });
        let rendered = serde_json::to_string_pretty(&document)?;
        writeln!(self.out, "{rendered}")?;
        self.out.flush()?;
        Ok(())
    }

    fn fault_count(&self) -> usize {
        self.totals.faults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::console::tests::SharedBuf;
    use crate::suite::TestSuite;

    #[tokio::test]
    async fn emits_a_valid_document_with_counts() {
        let mut suite = TestSuite::new("json");
        suite.test("passes", || Ok(()));
        suite.test("fails", || {
            crate::check_eq!(2, 1);
            Ok(())
        });
        suite.test("errors", || panic!("kaboom"));
        suite.run().await;

        let buf = SharedBuf::default();
        let mut reporter = JsonReporter::to(Box::new(buf.clone()));
        reporter.begin_report().unwrap();
        reporter.report(&suite).unwrap();
        reporter.end_report().unwrap();

        let document: Value = serde_json::from_str(&buf.contents()).unwrap();
        assert_eq!(document["count"], 3);
        assert_eq!(document["passes"], 1);
        assert_eq!(document["failures"], 1);
        assert_eq!(document["errors"], 1);

        let cases = document["testsuites"][0]["tests"].as_array().unwrap();
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0]["result"], "passed");
        assert_eq!(cases[1]["result"], "failed");
        assert_eq!(cases[2]["result"], "errored");
        assert!(cases[1]["reason"]
            .as_str()
            .unwrap()
            .contains("expected 1, got 2"));
        assert_eq!(reporter.fault_count(), 2);
    }

    #[tokio::test]
    async fn capture_fields_appear_only_when_enabled() {
        let mut suite = TestSuite::new("json-capture");
        suite.test("writer", || {
            crate::outln!("from the case");
            Ok(())
        });
        suite.run().await;

        let buf = SharedBuf::default();
        let mut reporter = JsonReporter::to(Box::new(buf.clone())).with_captured_output();
        reporter.begin_report().unwrap();
        reporter.report(&suite).unwrap();
        reporter.end_report().unwrap();

        let document: Value = serde_json::from_str(&buf.contents()).unwrap();
        let case = &document["testsuites"][0]["tests"][0];
        assert_eq!(case["stdout"], "from the case\n");
        assert_eq!(case["stderr"], "");
    }

    #[tokio::test]
    async fn begin_report_starts_a_fresh_document() {
        let mut suite = TestSuite::new("json-repeat");
        suite.test("ok", || Ok(()));
        suite.run().await;

        let buf = SharedBuf::default();
        let mut reporter = JsonReporter::to(Box::new(buf.clone()));
        for _ in 0..2 {
            reporter.begin_report().unwrap();
            reporter.report(&suite).unwrap();
            reporter.end_report().unwrap();
        }

        // Two complete documents, each with exactly one suite.
        let raw = buf.contents();
        let documents: Vec<&str> = raw.split("}\n{").collect();
        assert_eq!(documents.len(), 2);
        assert_eq!(reporter.fault_count(), 0);
    }
}
