//! Validation
//!
//! Decides whether a definition can be rewritten. Every rule runs for every
//! property and all errors are reported together; one error is enough to
//! leave the definition untouched.

use crate::options::{FileType, Options};
use crate::property::{actions, PropertyDescriptor, ValueShape};
use glob::Pattern;
use once_cell::sync::Lazy;
use std::fmt;
use std::path::Path;

/// Names that need a decorator to be expressed on a class.
const UNSUPPORTED_PROP_NAMES: [&str; 2] = ["actions", "layout"];

/// Object-literal values that are not shared state.
const ALLOWED_OBJECT_PROP_NAMES: [&str; 2] = ["actions", "queryParams"];

static TEST_FILE_PATTERN: Lazy<Pattern> = Lazy::new(|| Pattern::new("**/*-test.js").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// `None` for errors about the definition as a whole.
    pub property_name: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn for_property(name: &str, message: impl Into<String>) -> Self {
        Self {
            property_name: Some(name.to_string()),
            message: message.into(),
        }
    }

    pub fn definition(message: impl Into<String>) -> Self {
        Self {
            property_name: None,
            message: message.into(),
        }
    }

    /// The definition is followed by `.reopenClass(...)` or similar.
    pub fn chained_definition() -> Self {
        Self::definition("class has chained definition (e.g. EmberObject.extend().reopenClass();")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.property_name {
            Some(name) => write!(f, "[{}]: {}", name, self.message),
            None => f.write_str(&self.message),
        }
    }
}

pub fn is_test_file(path: &Path) -> bool {
    TEST_FILE_PATTERN.matches_path(path)
}

pub fn is_file_of_type(path: &Path, file_type: FileType) -> bool {
    Pattern::new(file_type.pattern())
        .map(|pattern| pattern.matches_path(path))
        .unwrap_or(false)
}

/// Check every property of a definition.
pub fn validate_properties(
    properties: &[PropertyDescriptor],
    options: &Options,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for prop in properties {
        validate_property(prop, options, &mut errors);
    }
    errors
}

fn validate_property(prop: &PropertyDescriptor, options: &Options, errors: &mut Vec<ValidationError>) {
    let name = prop.name.as_str();

    if !options.class_fields && prop.has_field_initializer() {
        errors.push(ValidationError::for_property(
            name,
            "Need option '--class-fields=true'",
        ));
    }

    if matches!(prop.shape, ValueShape::Object(_)) && !ALLOWED_OBJECT_PROP_NAMES.contains(&name) {
        errors.push(ValidationError::for_property(
            name,
            "Transform not supported - value is of type object. For more details: eslint-plugin-ember/avoid-leaking-state-in-ember-objects",
        ));
    }

    let needs_decorators = prop.has_decorators()
        || prop.is_class_decorator()
        || UNSUPPORTED_PROP_NAMES.contains(&name);
    let undecorated_call = matches!(prop.shape, ValueShape::Call(_)) && !prop.has_decorators();
    if (!options.decorators && needs_decorators) || undecorated_call {
        errors.push(ValidationError::for_property(
            name,
            format!(
                "Transform not supported - need option '--decorators=true' or the property type {} can not be transformed",
                prop.shape.type_name()
            ),
        ));
    }

    if prop.modifiers.iter().any(|m| !m.args.is_empty()) {
        errors.push(ValidationError::for_property(
            name,
            "Transform not supported - value has modifiers like 'property' or 'meta'",
        ));
    }

    if prop.has_volatile && prop.decorators.iter().any(|d| d.is_meta()) {
        errors.push(ValidationError::for_property(
            name,
            "Transform not supported - value has 'volatile' modifier with computed meta ('@ember/object/computed') is not supported",
        ));
    }

    if prop.is_actions() {
        errors.extend(actions::validate_actions(&prop.actions));
    }

    if prop.is_class_decorator()
        && !matches!(
            prop.shape,
            ValueShape::Literal(_)
                | ValueShape::Identifier { .. }
                | ValueShape::Array { .. }
                | ValueShape::Expression(_)
                | ValueShape::Unsupported { .. }
        )
    {
        errors.push(ValidationError::for_property(
            name,
            format!(
                "Transform not supported - class decorator value of type {} can not be transformed",
                prop.shape.type_name()
            ),
        ));
    }

    if let Some(reason) = prop.functions().iter().find_map(|f| f.unsupported_super) {
        errors.push(ValidationError::for_property(
            name,
            format!("Transform not supported - {}", reason),
        ));
    }

    if let ValueShape::Unsupported { reason } = prop.shape {
        errors.push(ValidationError::for_property(
            name,
            format!("Transform not supported - {}", reason),
        ));
    }
}
