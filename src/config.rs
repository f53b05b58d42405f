//! Run configuration
//!
//! The resolved value object the runner consumes: an active reporter, compiled
//! suite-name filters, and the filter mode. Argument parsing lives in the
//! [`cli`](crate::cli) module; the core never parses arguments itself.

use regex::Regex;

use crate::error::{Error, Result};
use crate::report::Reporter;

/// Whether filter patterns select or reject matching suites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    Include,
    Exclude,
}

/// Configuration for one runner invocation.
pub struct RunConfig {
    pub reporter: Box<dyn Reporter>,
    pub patterns: Vec<Regex>,
    pub mode: FilterMode,
}

impl RunConfig {
    /// Configuration with no filters: every suite is selected.
    pub fn new(reporter: Box<dyn Reporter>) -> Self {
        Self {
            reporter,
            patterns: Vec::new(),
            mode: FilterMode::Include,
        }
    }

    pub fn with_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn with_mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Compile raw patterns into anchored regexes matching whole suite names.
    pub fn compile_patterns(raw: &[String]) -> Result<Vec<Regex>> {
        raw.iter()
            .map(|p| {
                Regex::new(&format!("^(?:{p})$")).map_err(|source| Error::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Whether a suite with this name should be executed and reported.
    /// With no patterns every suite matches; an exclude-mode configuration
    /// then selects nothing that matches.
    pub fn selects(&self, name: &str) -> bool {
        let matched =
            self.patterns.is_empty() || self.patterns.iter().any(|re| re.is_match(name));
        matched == (self.mode == FilterMode::Include)
    }
}
