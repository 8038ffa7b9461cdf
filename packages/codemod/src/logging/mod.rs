//! Logging
//!
//! Outcome records are written through a `Logger`; internal diagnostics go
//! through `tracing`.

mod console_logger;
mod file_logger;
mod logger;
mod memory_logger;

pub use console_logger::ConsoleLogger;
pub use file_logger::{FileLogger, DEFAULT_LOG_FILE};
pub use logger::{LogLevel, Logger, NullLogger};
pub use memory_logger::MemoryLogger;

use crate::transform::FileReport;

/// Write every record of a file report to the logger.
pub fn log_report(logger: &dyn Logger, report: &FileReport) {
    for (level, message) in report.records() {
        logger.log(level, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod log_level_tests {
        use super::*;

        #[test]
        fn should_have_correct_ordering() {
            assert!((LogLevel::Debug as u8) < (LogLevel::Info as u8));
            assert!((LogLevel::Info as u8) < (LogLevel::Warn as u8));
            assert!((LogLevel::Warn as u8) < (LogLevel::Error as u8));
        }
    }

    mod console_logger_tests {
        use super::*;

        #[test]
        fn should_check_level_enabled() {
            let logger = ConsoleLogger::new(LogLevel::Warn);

            assert_eq!(logger.level(), LogLevel::Warn);
            assert!(!logger.is_enabled(LogLevel::Debug));
            assert!(!logger.is_enabled(LogLevel::Info));
            assert!(logger.is_enabled(LogLevel::Warn));
            assert!(logger.is_enabled(LogLevel::Error));
        }
    }

    mod memory_logger_tests {
        use super::*;

        #[test]
        fn should_keep_records_in_order() {
            let logger = MemoryLogger::new();
            logger.info("first");
            logger.log(LogLevel::Warn, "second");

            assert_eq!(
                logger.records(),
                vec![
                    (LogLevel::Info, "first".to_string()),
                    (LogLevel::Warn, "second".to_string())
                ]
            );
        }
    }

    mod file_logger_tests {
        use super::*;

        #[test]
        fn should_append_lines() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join(DEFAULT_LOG_FILE);
            {
                let logger = FileLogger::open(&path, LogLevel::Info).unwrap();
                logger.debug("hidden");
                logger.info("[a.js]: SUCCESS");
                logger.warn("[b.js]: SKIPPED Skipping test file");
            }
            let content = std::fs::read_to_string(&path).unwrap();
            assert_eq!(
                content,
                "[info] [a.js]: SUCCESS\n[warn] [b.js]: SKIPPED Skipping test file\n"
            );
        }
    }
}
