//! Batch driver
//!
//! Transforms every discovered file in turn, writes the results and reports
//! each outcome to the logger.

use anyhow::Context;
use ember_native_class::logging::{log_report, ConsoleLogger, FileLogger, LogLevel, Logger, NullLogger};
use ember_native_class::{FileOutcome, Transformer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Outcome log for a `--log-file` value: `-` prints to the console, `none`
/// drops the records, anything else is a file to append to.
pub fn open_logger(target: &str) -> anyhow::Result<Box<dyn Logger>> {
    match target {
        "-" => Ok(Box::new(ConsoleLogger::new(LogLevel::Info))),
        "none" => Ok(Box::new(NullLogger)),
        path => {
            let logger = FileLogger::open(Path::new(path), LogLevel::Info)
                .with_context(|| format!("failed to open log file {}", path))?;
            Ok(Box::new(logger))
        }
    }
}

/// Outcome counts of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub unchanged: usize,
    /// Files that could not be read, parsed or written.
    pub errored: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped + self.unchanged + self.errored
    }

    pub fn has_errors(&self) -> bool {
        self.errored > 0
    }
}

pub struct Runner<'t> {
    transformer: &'t Transformer<'t>,
    logger: &'t dyn Logger,
    dry_run: bool,
}

impl<'t> Runner<'t> {
    pub fn new(transformer: &'t Transformer<'t>, logger: &'t dyn Logger, dry_run: bool) -> Self {
        Self {
            transformer,
            logger,
            dry_run,
        }
    }

    /// Process `files` one after another. A file that errors is reported and
    /// the run continues.
    pub fn run(&self, files: &[PathBuf]) -> RunSummary {
        let mut summary = RunSummary::default();
        for path in files {
            match self.run_file(path) {
                Ok(outcome) => match outcome {
                    FileOutcome::Success => summary.succeeded += 1,
                    FileOutcome::Failure => summary.failed += 1,
                    FileOutcome::Unchanged => summary.unchanged += 1,
                    FileOutcome::Skipped(_) => summary.skipped += 1,
                },
                Err(e) => {
                    error!(path = %path.display(), error = %e, "file not transformed");
                    self.logger
                        .error(&format!("[{}]: FAILURE \nError: {:#}", path.display(), e));
                    summary.errored += 1;
                }
            }
        }
        summary
    }

    fn run_file(&self, path: &Path) -> anyhow::Result<FileOutcome> {
        let source = fs::read_to_string(path)?;
        let report = self.transformer.transform_file(path, &source)?;
        log_report(self.logger, &report);
        if let Some(output) = &report.output {
            if self.dry_run {
                debug!(path = %path.display(), "dry run, not written");
            } else {
                fs::write(path, output)?;
            }
        }
        Ok(report.outcome)
    }
}
