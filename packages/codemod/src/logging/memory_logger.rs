// Memory Logger
//
// Keeps every record in memory. Used by tests and dry runs.

use super::logger::{LogLevel, Logger};
use std::cell::RefCell;

#[derive(Default)]
pub struct MemoryLogger {
    records: RefCell<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.borrow().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records.borrow().iter().map(|(_, m)| m.clone()).collect()
    }

    fn push(&self, level: LogLevel, msg: &str) {
        self.records.borrow_mut().push((level, msg.to_string()));
    }
}

impl Logger for MemoryLogger {
    fn level(&self) -> LogLevel {
        LogLevel::Debug
    }

    fn debug(&self, msg: &str) {
        self.push(LogLevel::Debug, msg);
    }

    fn info(&self, msg: &str) {
        self.push(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(LogLevel::Error, msg);
    }
}
