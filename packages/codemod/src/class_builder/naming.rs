//! Class naming.

use crate::util::{camel_case, capitalize_first_letter};
use std::path::Path;

/// Runtime types that are not appended to a derived class name.
const UNSUFFIXED_TYPES: [&str; 3] = ["Component", "Helper", "EmberObject"];

/// Name of the generated class.
///
/// A bound definition keeps its variable name. Otherwise the name comes from
/// the file (`foo-bar.js` -> `FooBar`), or from its directory when the file
/// is named after the type (`foo/route.js` -> `Foo`), followed by the
/// capitalized runtime type (`FooBarRoute`).
pub fn class_name(binding: Option<&str>, file_path: &Path, runtime_type: Option<&str>) -> String {
    if let Some(binding) = binding {
        return binding.to_string();
    }

    let runtime_type = runtime_type.unwrap_or("");
    let capitalized_type = capitalize_first_letter(runtime_type);

    let stem = file_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = capitalize_first_letter(&camel_case(&stem));

    if !capitalized_type.is_empty() && name == capitalized_type {
        let dir = file_path
            .parent()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        name = capitalize_first_letter(&camel_case(&dir));
    }

    if !UNSUFFIXED_TYPES.contains(&runtime_type) && name != capitalized_type {
        name.push_str(&capitalized_type);
    }
    name
}

/// A class may not share its superclass's name.
pub fn avoid_superclass_name(name: String, superclass_name: &str) -> String {
    if name == superclass_name {
        format!("_{}", name)
    } else {
        name
    }
}
