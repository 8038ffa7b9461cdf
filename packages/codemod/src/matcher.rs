//! Extend Call Matcher
//!
//! Finds `Base.extend(...)` call sites in a parsed program and works out
//! which node a replacement class has to take the place of.

use crate::error::Result;
use crate::util::starts_with_uppercase_letter;
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};
use std::collections::{HashMap, HashSet};

/// The node a generated class replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceTarget {
    /// A whole statement. `prefix` is the export keyword(s) the statement
    /// started with; class decorators are printed before it.
    Statement { span: Span, prefix: &'static str },
    /// The call expression itself, replaced by a class expression.
    Expression { span: Span, parenthesize: bool },
}

impl ReplaceTarget {
    pub fn span(&self) -> Span {
        match self {
            ReplaceTarget::Statement { span, .. } | ReplaceTarget::Expression { span, .. } => *span,
        }
    }
}

/// One candidate definition.
pub struct ExtendCall<'b, 'a> {
    pub call: &'b CallExpression<'a>,
    pub superclass_name: String,
    /// The object literal holding the properties, if any.
    pub properties: Option<&'b ObjectExpression<'a>>,
    /// Every other argument, in order.
    pub mixins: Vec<Span>,
    /// Name of the variable the definition is bound to.
    pub binding: Option<String>,
    pub target: ReplaceTarget,
    /// Member accessed on the result, other than `create`
    /// (e.g. `reopenClass`).
    pub chained_member: Option<String>,
}

#[derive(Debug, Clone)]
struct Binding {
    name: String,
    statement: Option<Span>,
}

/// Call `on_match` for every `extend` call in source order.
///
/// The callback returns `true` when it replaced the definition; nested
/// candidates inside a replaced definition are then not visited.
pub fn for_each_extend_call<'a, F>(program: &Program<'a>, on_match: F) -> Result<()>
where
    F: FnMut(&ExtendCall<'_, 'a>) -> Result<bool>,
{
    let mut finder = ExtendCallFinder {
        on_match,
        error: None,
        class_heritage: HashSet::new(),
        member_parents: HashMap::new(),
        bindings: HashMap::new(),
        export_wrappers: HashMap::new(),
        default_exports: HashMap::new(),
    };
    finder.visit_program(program);
    match finder.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Returns the superclass name when `call` has the `Identifier.extend(...)`
/// shape with an uppercase identifier.
pub fn extend_superclass<'b>(call: &'b CallExpression<'_>) -> Option<&'b str> {
    let Expression::StaticMemberExpression(member) = &call.callee else {
        return None;
    };
    if member.property.name.as_str() != "extend" {
        return None;
    }
    let Expression::Identifier(object) = &member.object else {
        return None;
    };
    let name = object.name.as_str();
    starts_with_uppercase_letter(name).then_some(name)
}

struct ExtendCallFinder<F> {
    on_match: F,
    error: Option<crate::error::TransformError>,
    /// Calls used as a class `extends` clause.
    class_heritage: HashSet<Span>,
    /// Call span to the name of the member accessed on it.
    member_parents: HashMap<Span, String>,
    bindings: HashMap<Span, Binding>,
    /// Variable declaration span to the enclosing `export` statement.
    export_wrappers: HashMap<Span, Span>,
    /// Call span to the enclosing `export default` statement.
    default_exports: HashMap<Span, Span>,
}

impl<F> ExtendCallFinder<F> {
    fn replace_target(&self, call: &CallExpression<'_>) -> ReplaceTarget {
        if let Some(export) = self.default_exports.get(&call.span) {
            return ReplaceTarget::Statement {
                span: *export,
                prefix: "export default ",
            };
        }
        if let Some(statement) = self.bindings.get(&call.span).and_then(|b| b.statement) {
            return match self.export_wrappers.get(&statement) {
                Some(export) => ReplaceTarget::Statement {
                    span: *export,
                    prefix: "export ",
                },
                None => ReplaceTarget::Statement {
                    span: statement,
                    prefix: "",
                },
            };
        }
        ReplaceTarget::Expression {
            span: call.span,
            parenthesize: self.member_parents.contains_key(&call.span),
        }
    }
}

impl<'a, F> Visit<'a> for ExtendCallFinder<F>
where
    F: FnMut(&ExtendCall<'_, 'a>) -> Result<bool>,
{
    fn visit_class(&mut self, it: &Class<'a>) {
        if let Some(Expression::CallExpression(call)) = &it.super_class {
            self.class_heritage.insert(call.span);
        }
        walk::walk_class(self, it);
    }

    fn visit_static_member_expression(&mut self, it: &StaticMemberExpression<'a>) {
        if let Expression::CallExpression(call) = &it.object {
            self.member_parents
                .insert(call.span, it.property.name.to_string());
        }
        walk::walk_static_member_expression(self, it);
    }

    fn visit_export_named_declaration(&mut self, it: &ExportNamedDeclaration<'a>) {
        if let Some(Declaration::VariableDeclaration(decl)) = &it.declaration {
            self.export_wrappers.insert(decl.span, it.span);
        }
        walk::walk_export_named_declaration(self, it);
    }

    fn visit_export_default_declaration(&mut self, it: &ExportDefaultDeclaration<'a>) {
        if let ExportDefaultDeclarationKind::CallExpression(call) = &it.declaration {
            self.default_exports.insert(call.span, it.span);
        }
        walk::walk_export_default_declaration(self, it);
    }

    fn visit_variable_declaration(&mut self, it: &VariableDeclaration<'a>) {
        let single = it.declarations.len() == 1;
        for declarator in &it.declarations {
            let Some(name) = declarator.id.get_binding_identifier() else {
                continue;
            };
            let Some(Expression::CallExpression(init)) = &declarator.init else {
                continue;
            };
            if extend_superclass(init).is_some() {
                self.bindings.insert(
                    init.span,
                    Binding {
                        name: name.name.to_string(),
                        statement: single.then_some(it.span),
                    },
                );
            } else if let Expression::StaticMemberExpression(member) = &init.callee {
                // `const foo = Base.extend({ ... }).create();`
                if let Expression::CallExpression(inner) = &member.object {
                    if member.property.name.as_str() == "create" {
                        self.bindings.insert(
                            inner.span,
                            Binding {
                                name: name.name.to_string(),
                                statement: None,
                            },
                        );
                    }
                }
            }
        }
        walk::walk_variable_declaration(self, it);
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        if self.error.is_some() {
            return;
        }
        let superclass = match extend_superclass(it) {
            Some(name) if !self.class_heritage.contains(&it.span) => name.to_string(),
            _ => {
                walk::walk_call_expression(self, it);
                return;
            }
        };

        let mut properties = None;
        let mut mixins = Vec::new();
        for argument in &it.arguments {
            match argument {
                Argument::ObjectExpression(object) => properties = Some(&**object),
                other => mixins.push(other.span()),
            }
        }

        let chained_member = self
            .member_parents
            .get(&it.span)
            .filter(|name| name.as_str() != "create")
            .cloned();

        let candidate = ExtendCall {
            call: it,
            superclass_name: superclass,
            properties,
            mixins,
            binding: self.bindings.get(&it.span).map(|b| b.name.clone()),
            target: self.replace_target(it),
            chained_member,
        };

        match (self.on_match)(&candidate) {
            Ok(true) => {}
            Ok(false) => walk::walk_call_expression(self, it),
            Err(err) => self.error = Some(err),
        }
    }
}
