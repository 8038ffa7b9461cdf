//! Imported decorated props
//!
//! Framework helpers imported by the file that have a decorator form, such
//! as `computed`, `observer` or the `@ember/object/computed` macros.

use crate::imports::{DecoratorImports, ExistingImport, OBJECT_DECORATORS_MODULE};
use crate::util::METHOD_DECORATORS;
use std::collections::HashMap;

struct DecoratorPath {
    module: &'static str,
    /// Imported name to decorator name.
    names: &'static [(&'static str, &'static str)],
    /// Module the decorator form lives in, when it is not `module`.
    decorator_module: Option<&'static str>,
    /// Every named import of the module is a decorator.
    meta: bool,
}

static DECORATOR_PATHS: [DecoratorPath; 5] = [
    DecoratorPath {
        module: "@ember/object",
        names: &[("observer", "observes"), ("computed", "computed")],
        decorator_module: None,
        meta: false,
    },
    DecoratorPath {
        module: "@ember/object/evented",
        names: &[("on", "on")],
        decorator_module: Some(OBJECT_DECORATORS_MODULE),
        meta: false,
    },
    DecoratorPath {
        module: "@ember/controller",
        names: &[("inject", "inject")],
        decorator_module: None,
        meta: false,
    },
    DecoratorPath {
        module: "@ember/service",
        names: &[("inject", "inject")],
        decorator_module: None,
        meta: false,
    },
    DecoratorPath {
        module: "@ember/object/computed",
        names: &[],
        decorator_module: None,
        meta: true,
    },
];

/// Decorators whose module differs from the import they replace.
static DECORATOR_PATH_OVERRIDES: [(&str, &str); 1] = [("observes", OBJECT_DECORATORS_MODULE)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedDecorator {
    pub local_name: String,
    pub imported_name: String,
    pub module: String,
    /// Name written after `@`.
    pub decorator_name: String,
    pub is_meta: bool,
    pub is_method: bool,
    /// Import the decorator form needs, when it is not the existing import.
    pub required_import: DecoratorImports,
}

impl ImportedDecorator {
    /// `computed` from `@ember/object`.
    pub fn is_computed(&self) -> bool {
        self.module == "@ember/object" && self.imported_name == "computed"
    }
}

/// Imported decorated props of a file, keyed by local name.
#[derive(Debug, Clone, Default)]
pub struct ImportedDecorators {
    by_local: HashMap<String, ImportedDecorator>,
}

impl ImportedDecorators {
    pub fn from_imports(imports: &[ExistingImport]) -> Self {
        let mut by_local = HashMap::new();
        for import in imports.iter().filter(|i| !i.is_type) {
            let Some(path) = DECORATOR_PATHS.iter().find(|p| p.module == import.source) else {
                continue;
            };
            for specifier in &import.named {
                let mapped = path
                    .names
                    .iter()
                    .find(|(imported, _)| *imported == specifier.imported)
                    .map(|(_, decorator)| *decorator);
                let Some(decorator) = mapped.or(path.meta.then_some(specifier.imported.as_str()))
                else {
                    continue;
                };

                let rehomed = path.decorator_module.is_some()
                    || DECORATOR_PATH_OVERRIDES.iter().any(|(name, _)| *name == decorator);
                let is_imported_as = specifier.imported != specifier.local;
                let decorator_name = if !rehomed && (is_imported_as || path.meta) {
                    specifier.local.clone()
                } else {
                    decorator.to_string()
                };
                let required_import = match decorator {
                    "observes" => DecoratorImports::OBSERVES,
                    "on" if rehomed => DecoratorImports::ON,
                    _ => DecoratorImports::empty(),
                };

                by_local.insert(
                    specifier.local.clone(),
                    ImportedDecorator {
                        local_name: specifier.local.clone(),
                        imported_name: specifier.imported.clone(),
                        module: import.source.clone(),
                        decorator_name,
                        is_meta: path.meta,
                        is_method: METHOD_DECORATORS.contains(&specifier.imported.as_str()),
                        required_import,
                    },
                );
            }
        }
        Self { by_local }
    }

    pub fn get(&self, local_name: &str) -> Option<&ImportedDecorator> {
        self.by_local.get(local_name)
    }

    pub fn len(&self) -> usize {
        self.by_local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_local.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::existing_imports;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn scan(source: &str) -> ImportedDecorators {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty());
        ImportedDecorators::from_imports(&existing_imports(&ret.program))
    }

    #[test]
    fn test_object_imports() {
        let decorators = scan("import EmberObject, { computed, observer, get } from '@ember/object';");
        assert_eq!(decorators.len(), 2);

        let computed = decorators.get("computed").unwrap();
        assert!(computed.is_computed());
        assert_eq!(computed.decorator_name, "computed");
        assert_eq!(computed.required_import, DecoratorImports::empty());

        let observer = decorators.get("observer").unwrap();
        assert_eq!(observer.decorator_name, "observes");
        assert!(observer.is_method);
        assert_eq!(observer.required_import, DecoratorImports::OBSERVES);
    }

    #[test]
    fn test_aliased_service_keeps_local_name() {
        let decorators = scan("import { inject as service } from '@ember/service';");
        let service = decorators.get("service").unwrap();
        assert_eq!(service.decorator_name, "service");
        assert!(!service.is_meta);
    }

    #[test]
    fn test_computed_macros_are_meta() {
        let decorators = scan("import { alias, readOnly as ro } from '@ember/object/computed';");
        assert!(decorators.get("alias").unwrap().is_meta);
        assert_eq!(decorators.get("ro").unwrap().decorator_name, "ro");
    }

    #[test]
    fn test_evented_on_is_rehomed() {
        let decorators = scan("import { on } from '@ember/object/evented';");
        let on = decorators.get("on").unwrap();
        assert_eq!(on.decorator_name, "on");
        assert!(on.is_method);
        assert_eq!(on.required_import, DecoratorImports::ON);
    }

    #[test]
    fn test_unrelated_imports_are_ignored() {
        assert!(scan("import { computed } from 'somewhere-else';").is_empty());
    }
}
