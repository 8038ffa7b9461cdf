#![deny(clippy::all)]

/**
 * Ember Native Class Codemod
 *
 * Rewrites `Base.extend({ ... })` object-literal definitions into native
 * classes with decorators, guided by runtime usage data.
 */
pub mod class_builder;
pub mod error;
pub mod imports;
pub mod logging;
pub mod matcher;
pub mod options;
pub mod output;
pub mod property;
pub mod runtime_data;
pub mod source;
pub mod transform;
pub mod util;
pub mod validation;

// Re-exports
pub use error::{Result, TransformError};
pub use options::{FileType, Options, Quote};
pub use runtime_data::{InMemoryRuntimeData, JsonRuntimeData, RuntimeData, RuntimeDataProvider};
pub use transform::{FileOutcome, FileReport, SkipReason, Transformer};

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
