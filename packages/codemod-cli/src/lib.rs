#![deny(clippy::all)]

/**
 * Ember Native Class Codemod CLI
 *
 * Option loading, file discovery and the batch driver behind the
 * `ember-native-class` binary.
 */
pub use ember_native_class as codemod;

pub mod config;
pub mod discovery;
pub mod run;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
