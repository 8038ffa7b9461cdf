//! Codemod Options
//!
//! Options controlling which constructs may be emitted. Deserialized from a
//! JSON config file (camelCase keys) and overridden from the command line.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Quote style for generated string literals and import sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quote {
    #[default]
    Single,
    Double,
}

impl Quote {
    pub fn char(self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }
}

impl FromStr for Quote {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Quote::Single),
            "double" => Ok(Quote::Double),
            other => Err(format!("unknown quote style '{}'", other)),
        }
    }
}

/// Kind of Ember object a file is expected to define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[serde(alias = "services")]
    Service,
    #[serde(alias = "controllers")]
    Controller,
    #[serde(alias = "components")]
    Component,
    #[serde(alias = "routes")]
    Route,
}

impl FileType {
    /// Glob pattern a file path must match to be of this type.
    pub fn pattern(self) -> &'static str {
        match self {
            FileType::Service => "**/services/**/*.js",
            FileType::Controller => "**/controllers/**/*.js",
            FileType::Component => "**/components/**/*.js",
            FileType::Route => "**/routes/**/*.js",
        }
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" | "services" => Ok(FileType::Service),
            "controller" | "controllers" => Ok(FileType::Controller),
            "component" | "components" => Ok(FileType::Component),
            "route" | "routes" => Ok(FileType::Route),
            other => Err(format!("unknown type '{}'", other)),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Service => "service",
            FileType::Controller => "controller",
            FileType::Component => "component",
            FileType::Route => "route",
        };
        f.write_str(name)
    }
}

/// Transform options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Allow emitting decorators.
    pub decorators: bool,
    /// Allow emitting class fields with initial values.
    pub class_fields: bool,
    /// Add `@classic` to every generated class.
    pub classic_decorator: bool,
    #[serde(alias = "quotes")]
    pub quote: Quote,
    /// Only transform files matching the pattern of this kind.
    #[serde(rename = "type")]
    pub file_type: Option<FileType>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            decorators: true,
            class_fields: true,
            classic_decorator: true,
            quote: Quote::Single,
            file_type: None,
        }
    }
}

impl Options {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert!(options.decorators);
        assert!(options.class_fields);
        assert!(options.classic_decorator);
        assert_eq!(options.quote, Quote::Single);
        assert_eq!(options.file_type, None);
    }

    #[test]
    fn test_from_json_partial() {
        let options =
            Options::from_json(r#"{ "classFields": false, "quotes": "double", "type": "services" }"#)
                .unwrap();
        assert!(options.decorators);
        assert!(!options.class_fields);
        assert_eq!(options.quote, Quote::Double);
        assert_eq!(options.file_type, Some(FileType::Service));
    }

    #[test]
    fn test_file_type_from_str() {
        assert_eq!("routes".parse::<FileType>(), Ok(FileType::Route));
        assert_eq!("component".parse::<FileType>(), Ok(FileType::Component));
        assert!("model".parse::<FileType>().is_err());
    }
}
