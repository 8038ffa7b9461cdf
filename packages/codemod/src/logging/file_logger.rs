// File Logger
//
// Appends `[level] message` lines to a log file (`codemods.log` by default).

use super::logger::{LogLevel, Logger};
use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub const DEFAULT_LOG_FILE: &str = "codemods.log";

/// File logger.
pub struct FileLogger {
    level: LogLevel,
    file: RefCell<File>,
}

impl FileLogger {
    pub fn open(path: &Path, level: LogLevel) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            level,
            file: RefCell::new(file),
        })
    }

    fn write(&self, level: LogLevel, msg: &str) {
        if !self.is_enabled(level) {
            return;
        }
        // A failing log sink must not abort the transform.
        let _ = writeln!(self.file.borrow_mut(), "[{}] {}", level.as_str(), msg);
    }
}

impl Logger for FileLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn debug(&self, msg: &str) {
        self.write(LogLevel::Debug, msg);
    }

    fn info(&self, msg: &str) {
        self.write(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.write(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.write(LogLevel::Error, msg);
    }
}
