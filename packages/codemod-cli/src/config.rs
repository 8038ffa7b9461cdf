//! Configuration
//!
//! Options come from an optional JSON config file; command-line flags
//! override individual values.

use anyhow::Context;
use ember_native_class::{FileType, Options, Quote};
use std::fs;
use std::path::Path;

/// Option values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub decorators: Option<bool>,
    pub class_fields: Option<bool>,
    pub classic_decorator: Option<bool>,
    pub quote: Option<Quote>,
    pub file_type: Option<FileType>,
}

impl OptionOverrides {
    pub fn apply(&self, options: &mut Options) {
        if let Some(decorators) = self.decorators {
            options.decorators = decorators;
        }
        if let Some(class_fields) = self.class_fields {
            options.class_fields = class_fields;
        }
        if let Some(classic_decorator) = self.classic_decorator {
            options.classic_decorator = classic_decorator;
        }
        if let Some(quote) = self.quote {
            options.quote = quote;
        }
        if self.file_type.is_some() {
            options.file_type = self.file_type;
        }
    }
}

/// Read the config file, if any, and apply the overrides on top.
pub fn load_options(config: Option<&Path>, overrides: &OptionOverrides) -> anyhow::Result<Options> {
    let mut options = match config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            Options::from_json(&content)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => Options::default(),
    };
    overrides.apply(&mut options);
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config() {
        let options = load_options(None, &OptionOverrides::default()).unwrap();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "classFields": false, "quote": "double", "type": "services" }"#).unwrap();

        let overrides = OptionOverrides {
            quote: Some(Quote::Single),
            ..OptionOverrides::default()
        };
        let options = load_options(Some(&path), &overrides).unwrap();
        assert!(!options.class_fields);
        assert!(options.decorators);
        assert_eq!(options.quote, Quote::Single);
        assert_eq!(options.file_type, Some(FileType::Service));
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_options(Some(&path), &OptionOverrides::default()).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse config"));
    }
}
