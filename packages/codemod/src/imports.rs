//! Decorator Imports
//!
//! Tracks which decorators a file's generated classes use and turns that set
//! into import edits: specifiers are merged into an existing import of the
//! same module when there is one, otherwise a new declaration is added after
//! the last import of the file.

use crate::options::Quote;
use crate::source::TextEdit;
use bitflags::bitflags;
use indexmap::IndexMap;
use oxc_ast::ast::*;
use oxc_span::Span;

bitflags! {
    /// Decorators a file needs to import.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DecoratorImports: u16 {
        const ACTION = 1 << 0;
        const CLASS_NAMES = 1 << 1;
        const CLASS_NAME_BINDINGS = 1 << 2;
        const ATTRIBUTE_BINDINGS = 1 << 3;
        const LAYOUT = 1 << 4;
        const TEMPLATE_LAYOUT = 1 << 5;
        const OFF = 1 << 6;
        const TAG_NAME = 1 << 7;
        const UNOBSERVES = 1 << 8;
        const ON = 1 << 9;
        const OBSERVES = 1 << 10;
        const READ_ONLY = 1 << 11;
        const CLASSIC = 1 << 12;
    }
}

/// How one decorator is imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSpec {
    pub flag: DecoratorImports,
    /// Exported name; `None` for a default import.
    pub imported: Option<&'static str>,
    pub local: &'static str,
    pub module: &'static str,
}

const fn named(
    flag: DecoratorImports,
    imported: &'static str,
    local: &'static str,
    module: &'static str,
) -> ImportSpec {
    ImportSpec {
        flag,
        imported: Some(imported),
        local,
        module,
    }
}

pub const CLASSIC_MODULE: &str = "ember-classic-decorator";
pub const COMPONENT_DECORATORS_MODULE: &str = "@ember-decorators/component";
pub const OBJECT_DECORATORS_MODULE: &str = "@ember-decorators/object";

/// Import table, in emission order.
pub static IMPORT_TABLE: [ImportSpec; 13] = [
    ImportSpec {
        flag: DecoratorImports::CLASSIC,
        imported: None,
        local: "classic",
        module: CLASSIC_MODULE,
    },
    named(
        DecoratorImports::ATTRIBUTE_BINDINGS,
        "attributeBindings",
        "attributeBindings",
        COMPONENT_DECORATORS_MODULE,
    ),
    named(
        DecoratorImports::CLASS_NAME_BINDINGS,
        "classNameBindings",
        "classNameBindings",
        COMPONENT_DECORATORS_MODULE,
    ),
    named(
        DecoratorImports::CLASS_NAMES,
        "classNames",
        "classNames",
        COMPONENT_DECORATORS_MODULE,
    ),
    named(DecoratorImports::LAYOUT, "layout", "layout", COMPONENT_DECORATORS_MODULE),
    named(DecoratorImports::TAG_NAME, "tagName", "tagName", COMPONENT_DECORATORS_MODULE),
    named(
        DecoratorImports::TEMPLATE_LAYOUT,
        "layout",
        "templateLayout",
        COMPONENT_DECORATORS_MODULE,
    ),
    named(DecoratorImports::OBSERVES, "observes", "observes", OBJECT_DECORATORS_MODULE),
    named(DecoratorImports::OFF, "off", "off", OBJECT_DECORATORS_MODULE),
    named(DecoratorImports::ON, "on", "on", OBJECT_DECORATORS_MODULE),
    named(
        DecoratorImports::UNOBSERVES,
        "unobserves",
        "unobserves",
        OBJECT_DECORATORS_MODULE,
    ),
    named(DecoratorImports::ACTION, "action", "action", "@ember/object"),
    named(
        DecoratorImports::READ_ONLY,
        "readOnly",
        "readOnly",
        "@ember/object/computed",
    ),
];

/// Import specs needed for a flag set, grouped by module in table order.
pub fn required_imports(flags: DecoratorImports) -> IndexMap<&'static str, Vec<ImportSpec>> {
    let mut grouped: IndexMap<&'static str, Vec<ImportSpec>> = IndexMap::new();
    for spec in IMPORT_TABLE.iter().filter(|s| flags.contains(s.flag)) {
        grouped.entry(spec.module).or_default().push(*spec);
    }
    grouped
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSpecifier {
    pub imported: String,
    pub local: String,
}

/// An import declaration already present in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingImport {
    pub span: Span,
    pub source: String,
    pub default: Option<String>,
    pub namespace: Option<String>,
    pub named: Vec<NamedSpecifier>,
    pub is_type: bool,
}

impl ExistingImport {
    fn binds(&self, local: &str) -> bool {
        self.default.as_deref() == Some(local)
            || self.namespace.as_deref() == Some(local)
            || self.named.iter().any(|s| s.local == local)
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.namespace.is_none() && self.named.is_empty()
    }

    fn remove_local(&mut self, local: &str) {
        if self.default.as_deref() == Some(local) {
            self.default = None;
        }
        self.named.retain(|s| s.local != local);
    }

    fn add(&mut self, spec: &ImportSpec) {
        match spec.imported {
            None => self.default = Some(spec.local.to_string()),
            Some(imported) => self.named.push(NamedSpecifier {
                imported: imported.to_string(),
                local: spec.local.to_string(),
            }),
        }
    }

    fn render(&self, quote: Quote) -> String {
        let mut clauses = Vec::new();
        if let Some(default) = &self.default {
            clauses.push(default.clone());
        }
        if let Some(namespace) = &self.namespace {
            clauses.push(format!("* as {}", namespace));
        }
        if !self.named.is_empty() {
            let specifiers: Vec<String> = self
                .named
                .iter()
                .map(|s| {
                    if s.imported == s.local {
                        s.local.clone()
                    } else {
                        format!("{} as {}", s.imported, s.local)
                    }
                })
                .collect();
            clauses.push(format!("{{ {} }}", specifiers.join(", ")));
        }
        let q = quote.char();
        if clauses.is_empty() {
            format!("import {q}{}{q};", self.source)
        } else {
            format!("import {} from {q}{}{q};", clauses.join(", "), self.source)
        }
    }
}

/// Collect the import declarations at the top level of a program.
pub fn existing_imports(program: &Program<'_>) -> Vec<ExistingImport> {
    let mut imports = Vec::new();
    for statement in &program.body {
        let Statement::ImportDeclaration(decl) = statement else {
            continue;
        };
        let mut import = ExistingImport {
            span: decl.span,
            source: decl.source.value.to_string(),
            default: None,
            namespace: None,
            named: Vec::new(),
            is_type: decl.import_kind.is_type(),
        };
        for specifier in decl.specifiers.iter().flatten() {
            match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    import.named.push(NamedSpecifier {
                        imported: s.imported.name().to_string(),
                        local: s.local.name.to_string(),
                    })
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    import.default = Some(s.local.name.to_string())
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    import.namespace = Some(s.local.name.to_string())
                }
            }
        }
        imports.push(import);
    }
    imports
}

/// Edits that make every decorator in `flags` available in the file.
///
/// A local name already bound by an import of another module is moved to the
/// decorator module: the old specifier is dropped.
pub fn import_edits(
    source: &str,
    imports: &[ExistingImport],
    flags: DecoratorImports,
    quote: Quote,
) -> Vec<TextEdit> {
    let mut modified: IndexMap<usize, ExistingImport> = IndexMap::new();
    let mut new_declarations = Vec::new();

    for (module, specs) in required_imports(flags) {
        let mut missing = Vec::new();
        for spec in specs {
            let already_bound = imports
                .iter()
                .any(|i| !i.is_type && i.source == module && i.binds(spec.local));
            if already_bound {
                continue;
            }
            for (idx, import) in imports.iter().enumerate() {
                if import.source != module && !import.is_type && import.binds(spec.local) {
                    modified
                        .entry(idx)
                        .or_insert_with(|| import.clone())
                        .remove_local(spec.local);
                }
            }
            missing.push(spec);
        }
        if missing.is_empty() {
            continue;
        }

        let target = imports.iter().position(|i| {
            i.source == module
                && !i.is_type
                && i.namespace.is_none()
                && (i.default.is_none() || missing.iter().all(|s| s.imported.is_some()))
        });
        match target {
            Some(idx) => {
                let import = modified.entry(idx).or_insert_with(|| imports[idx].clone());
                for spec in &missing {
                    import.add(spec);
                }
            }
            None => {
                let mut import = ExistingImport {
                    span: Span::default(),
                    source: module.to_string(),
                    default: None,
                    namespace: None,
                    named: Vec::new(),
                    is_type: false,
                };
                for spec in &missing {
                    import.add(spec);
                }
                new_declarations.push(import.render(quote));
            }
        }
    }

    let insert_at = imports.last().map(|i| i.span.end);
    let mut edits = Vec::new();
    for (idx, import) in modified {
        let original = &imports[idx];
        if import.is_empty() && !original.is_empty() {
            let mut end = original.span.end;
            if Some(end) != insert_at && source.as_bytes().get(end as usize) == Some(&b'\n') {
                end += 1;
            }
            edits.push(TextEdit::new(Span::new(original.span.start, end), ""));
        } else {
            edits.push(TextEdit::new(original.span, import.render(quote)));
        }
    }

    if !new_declarations.is_empty() {
        let text = new_declarations.join("\n");
        edits.push(match insert_at {
            Some(end) => TextEdit::insert(end, format!("\n{}", text)),
            None => TextEdit::insert(0, format!("{}\n\n", text)),
        });
    }
    edits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::apply_edits;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn rewrite(source: &str, flags: DecoratorImports) -> String {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty());
        let imports = existing_imports(&ret.program);
        let edits = import_edits(source, &imports, flags, Quote::Single);
        apply_edits(source, &edits).unwrap()
    }

    #[test]
    fn test_required_imports_grouped_in_table_order() {
        let grouped = required_imports(
            DecoratorImports::ACTION | DecoratorImports::TAG_NAME | DecoratorImports::CLASSIC,
        );
        let modules: Vec<&str> = grouped.keys().copied().collect();
        assert_eq!(
            modules,
            vec![CLASSIC_MODULE, COMPONENT_DECORATORS_MODULE, "@ember/object"]
        );
    }

    #[test]
    fn test_new_imports_after_last_import() {
        let source = "import Component from '@ember/component';\n\nexport default class Foo extends Component {}\n";
        let output = rewrite(
            source,
            DecoratorImports::TAG_NAME | DecoratorImports::CLASS_NAMES | DecoratorImports::CLASSIC,
        );
        assert_eq!(
            output,
            "import Component from '@ember/component';\nimport classic from 'ember-classic-decorator';\nimport { classNames, tagName } from '@ember-decorators/component';\n\nexport default class Foo extends Component {}\n"
        );
    }

    #[test]
    fn test_merge_into_existing_import() {
        let source = "import EmberObject, { computed } from '@ember/object';\nconst a = 1;\n";
        let output = rewrite(source, DecoratorImports::ACTION);
        assert_eq!(
            output,
            "import EmberObject, { computed, action } from '@ember/object';\nconst a = 1;\n"
        );
    }

    #[test]
    fn test_no_duplicate_specifiers() {
        let source = "import { action } from '@ember/object';\n";
        assert_eq!(rewrite(source, DecoratorImports::ACTION), source);
    }

    #[test]
    fn test_template_layout_alias() {
        let source = "import layout from './template';\n";
        let output = rewrite(source, DecoratorImports::TEMPLATE_LAYOUT);
        assert_eq!(
            output,
            "import layout from './template';\nimport { layout as templateLayout } from '@ember-decorators/component';\n"
        );
    }

    #[test]
    fn test_conflicting_local_name_is_moved() {
        let source = "import { on } from '@ember/object/evented';\nimport Foo from 'foo';\n";
        let output = rewrite(source, DecoratorImports::ON);
        assert_eq!(
            output,
            "import Foo from 'foo';\nimport { on } from '@ember-decorators/object';\n"
        );
    }

    #[test]
    fn test_without_existing_imports() {
        let output = rewrite("class A {}\n", DecoratorImports::ACTION);
        assert_eq!(output, "import { action } from '@ember/object';\n\nclass A {}\n");
    }

    #[test]
    fn test_empty_flags_produce_no_edits() {
        let source = "import a from 'a';\n";
        assert_eq!(rewrite(source, DecoratorImports::empty()), source);
    }
}
