//! Command-line front end
//!
//! Resolves arguments into the core's [`RunConfig`] and provides the default
//! main body for downstream test binaries. The execution core never parses
//! arguments itself.

use clap::Parser;

use crate::config::{FilterMode, RunConfig};
use crate::error::{Error, Result};
use crate::logging;
use crate::report::{ConsoleReporter, JsonReporter, Reporter};
use crate::runner::{default_runner, FATAL};

/// Run registered test suites
#[derive(Parser, Debug)]
#[command(name = "veritest")]
#[command(about = "Run registered test suites")]
pub struct Args {
    /// Regex patterns selecting suites by name (whole-name match)
    #[arg(short, long = "filter", value_name = "PATTERN")]
    pub filters: Vec<String>,

    /// Treat filter patterns as exclusions
    #[arg(short, long)]
    pub exclude: bool,

    /// Report format (plain, colored, json)
    #[arg(long, default_value = "plain")]
    pub format: String,

    /// Attach captured stdout/stderr to the report
    #[arg(short, long)]
    pub capture: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log: String,
}

impl Args {
    /// Resolve parsed arguments into the runner's configuration value object.
    pub fn into_config(self) -> Result<RunConfig> {
        let reporter = make_reporter(&self.format, self.capture)?;
        let patterns = RunConfig::compile_patterns(&self.filters)?;
        let mode = if self.exclude {
            FilterMode::Exclude
        } else {
            FilterMode::Include
        };
        Ok(RunConfig::new(reporter)
            .with_patterns(patterns)
            .with_mode(mode))
    }
}

fn make_reporter(format: &str, capture: bool) -> Result<Box<dyn Reporter>> {
    match format.to_lowercase().as_str() {
        "plain" => {
            let reporter = ConsoleReporter::stdout();
            Ok(Box::new(if capture {
                reporter.with_captured_output()
            } else {
                reporter
            }))
        }
        "colored" => {
            let reporter = ConsoleReporter::stdout().with_color();
            Ok(Box::new(if capture {
                reporter.with_captured_output()
            } else {
                reporter
            }))
        }
        "json" => {
            let reporter = JsonReporter::stdout();
            Ok(Box::new(if capture {
                reporter.with_captured_output()
            } else {
                reporter
            }))
        }
        other => Err(Error::Format(other.to_string())),
    }
}

/// Default main body for a test binary: parse arguments, initialize logging,
/// run every suite registered with the default runner, and return the value
/// to exit with. Fatal errors yield the negative sentinel instead of a crash;
/// clap handles `--help` before the core ever runs.
pub async fn default_main() -> i64 {
    let args = Args::parse();
    logging::init(&args.log);

    let mut config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("A fatal error occurred: {e}");
            return FATAL;
        }
    };

    default_runner().lock().await.run(&mut config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_and_mode_are_resolved() {
        let args = Args::try_parse_from([
            "veritest", "--filter", "Alpha", "--filter", "net-.*", "--exclude",
        ])
        .unwrap();
        assert_eq!(args.filters, vec!["Alpha", "net-.*"]);

        let config = args.into_config().unwrap();
        assert_eq!(config.mode, FilterMode::Exclude);
        assert_eq!(config.patterns.len(), 2);
        assert!(!config.selects("Alpha"));
        assert!(config.selects("disk-io"));
    }

    #[test]
    fn default_format_is_plain() {
        let args = Args::try_parse_from(["veritest"]).unwrap();
        assert_eq!(args.format, "plain");
        assert!(args.into_config().is_ok());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let args = Args::try_parse_from(["veritest", "--format", "teletype"]).unwrap();
        match args.into_config() {
            Err(Error::Format(name)) => assert_eq!(name, "teletype"),
            other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn malformed_filter_is_rejected() {
        let args = Args::try_parse_from(["veritest", "--filter", "(unclosed"]).unwrap();
        assert!(matches!(args.into_config(), Err(Error::Pattern { .. })));
    }
}
