//! Function values and the body scans run over them.

use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_syntax::scope::ScopeFlags;
use oxc_span::{GetSpan, Span};

/// A `this._super(...)` call inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperCall {
    pub call: Span,
    /// The `this._super` member expression.
    pub callee: Span,
    /// Start of the innermost statement containing the call.
    pub statement_start: u32,
}

/// A function or method body, kept as source spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionValue {
    /// The whole function expression or method.
    pub span: Span,
    pub params: Vec<Span>,
    /// Body including its braces.
    pub body: Span,
    pub is_async: bool,
    pub is_generator: bool,
    pub super_calls: Vec<SuperCall>,
    /// Why a `this._super` reference in the body can not become `super`.
    pub unsupported_super: Option<&'static str>,
}

impl FunctionValue {
    /// Returns `None` for a function without body (declarations only).
    pub fn from_function(func: &Function<'_>) -> Option<Self> {
        let body = func.body.as_ref()?;
        let mut params: Vec<Span> = func.params.items.iter().map(|p| p.span).collect();
        if let Some(rest) = &func.params.rest {
            params.push(rest.span);
        }

        let mut finder = SuperCallFinder::default();
        finder.visit_function_body(body);

        Some(Self {
            span: func.span,
            params,
            body: body.span,
            is_async: func.r#async,
            is_generator: func.generator,
            super_calls: finder.calls,
            unsupported_super: finder.unsupported,
        })
    }

    /// Super calls that are not nested in the arguments of another one.
    pub fn outermost_super_calls(&self) -> impl Iterator<Item = &SuperCall> {
        self.super_calls.iter().filter(move |call| {
            !self.super_calls.iter().any(|other| {
                other.call != call.call
                    && other.call.start <= call.call.start
                    && call.call.end <= other.call.end
            })
        })
    }
}

const SUPER_IN_NESTED_FUNCTION: &str =
    "this._super is used inside a nested function, where super is not available";
const SUPER_NOT_CALLED: &str = "this._super is used without being called";

/// `this._super`
fn is_this_super(member: &StaticMemberExpression<'_>) -> bool {
    matches!(member.object, Expression::ThisExpression(_)) && member.property.name.as_str() == "_super"
}

/// The `this._super` part of `this._super(...)`, `this._super.apply(...)`
/// and `this._super.call(...)`.
fn super_callee<'m, 'a>(callee: &'m Expression<'a>) -> Option<&'m StaticMemberExpression<'a>> {
    let Expression::StaticMemberExpression(member) = callee else {
        return None;
    };
    let member: &StaticMemberExpression<'a> = member;
    if is_this_super(member) {
        return Some(member);
    }
    match &member.object {
        Expression::StaticMemberExpression(inner)
            if is_this_super(inner) && matches!(member.property.name.as_str(), "apply" | "call") =>
        {
            let inner: &StaticMemberExpression<'a> = inner;
            Some(inner)
        }
        _ => None,
    }
}

/// Collects the super calls of one body. Non-arrow functions inside it bind
/// their own `this`, so super calls there are not collected.
#[derive(Default)]
struct SuperCallFinder {
    statements: Vec<u32>,
    function_depth: usize,
    /// Callees of the collected calls.
    claimed: Vec<Span>,
    calls: Vec<SuperCall>,
    unsupported: Option<&'static str>,
}

impl<'a> Visit<'a> for SuperCallFinder {
    fn visit_statement(&mut self, it: &Statement<'a>) {
        self.statements.push(it.span().start);
        walk::walk_statement(self, it);
        self.statements.pop();
    }

    fn visit_function(&mut self, it: &Function<'a>, flags: ScopeFlags) {
        self.function_depth += 1;
        walk::walk_function(self, it, flags);
        self.function_depth -= 1;
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        if self.function_depth == 0 {
            if let Some(member) = super_callee(&it.callee) {
                self.claimed.push(member.span);
                self.calls.push(SuperCall {
                    call: it.span,
                    callee: member.span,
                    statement_start: self.statements.last().copied().unwrap_or(it.span.start),
                });
            }
        }
        walk::walk_call_expression(self, it);
    }

    fn visit_static_member_expression(&mut self, it: &StaticMemberExpression<'a>) {
        if is_this_super(it) && self.unsupported.is_none() {
            if self.function_depth > 0 {
                self.unsupported = Some(SUPER_IN_NESTED_FUNCTION);
            } else if !self.claimed.contains(&it.span) {
                self.unsupported = Some(SUPER_NOT_CALLED);
            }
        }
        walk::walk_static_member_expression(self, it);
    }
}

/// True when the function calls `this.<name>(...)` or mentions `name` as a
/// string literal (e.g. `this.send('name')`).
pub fn references_own_name(func: &Function<'_>, name: &str) -> bool {
    let mut finder = SelfReferenceFinder { name, found: false };
    finder.visit_formal_parameters(&func.params);
    if let Some(body) = &func.body {
        finder.visit_function_body(body);
    }
    finder.found
}

struct SelfReferenceFinder<'n> {
    name: &'n str,
    found: bool,
}

impl<'a> Visit<'a> for SelfReferenceFinder<'_> {
    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        if let Expression::StaticMemberExpression(member) = &it.callee {
            if matches!(member.object, Expression::ThisExpression(_))
                && member.property.name.as_str() == self.name
            {
                self.found = true;
            }
        }
        walk::walk_call_expression(self, it);
    }

    fn visit_string_literal(&mut self, it: &StringLiteral<'a>) {
        if it.value.as_str() == self.name {
            self.found = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn with_function<R>(source: &str, f: impl FnOnce(&Function<'_>) -> R) -> R {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty());
        let Some(Statement::FunctionDeclaration(func)) = ret.program.body.first() else {
            panic!("expected a function declaration");
        };
        f(func)
    }

    fn text(source: &str, span: Span) -> &str {
        &source[span.start as usize..span.end as usize]
    }

    #[test]
    fn test_super_calls_and_params() {
        let source = "function foo(a, b = 1, ...rest) {\n  this._super(...arguments);\n  return this._super.apply(this, arguments);\n}";
        with_function(source, |func| {
            let value = FunctionValue::from_function(func).unwrap();
            assert_eq!(value.params.len(), 3);
            assert_eq!(value.super_calls.len(), 2);
            assert_eq!(value.unsupported_super, None);
            let call = &value.super_calls[0];
            assert_eq!(text(source, call.callee), "this._super");
            assert_eq!(
                &source[call.statement_start as usize..call.call.end as usize],
                "this._super(...arguments)"
            );
            let apply = &value.super_calls[1];
            assert_eq!(text(source, apply.callee), "this._super");
            assert_eq!(text(source, apply.call), "this._super.apply(this, arguments)");
        });
    }

    #[test]
    fn test_super_in_nested_function_is_unsupported() {
        let source = "function foo() {\n  return items.map(function(item) {\n    return this._super(item);\n  });\n}";
        with_function(source, |func| {
            let value = FunctionValue::from_function(func).unwrap();
            assert!(value.super_calls.is_empty());
            assert_eq!(value.unsupported_super, Some(SUPER_IN_NESTED_FUNCTION));
        });
    }

    #[test]
    fn test_super_in_arrow_function_is_collected() {
        let source = "function foo() {\n  return items.map((item) => this._super(item));\n}";
        with_function(source, |func| {
            let value = FunctionValue::from_function(func).unwrap();
            assert_eq!(value.super_calls.len(), 1);
            assert_eq!(value.unsupported_super, None);
        });
    }

    #[test]
    fn test_uncalled_super_is_unsupported() {
        with_function("function foo() { const parent = this._super; parent(); }", |func| {
            let value = FunctionValue::from_function(func).unwrap();
            assert_eq!(value.unsupported_super, Some(SUPER_NOT_CALLED));
        });
        with_function("function foo() { this._super.bind(this)(); }", |func| {
            let value = FunctionValue::from_function(func).unwrap();
            assert_eq!(value.unsupported_super, Some(SUPER_NOT_CALLED));
        });
    }

    #[test]
    fn test_nested_super_calls_are_not_outermost() {
        let source = "function foo() { return this._super(this._super()); }";
        with_function(source, |func| {
            let value = FunctionValue::from_function(func).unwrap();
            assert_eq!(value.super_calls.len(), 2);
            assert_eq!(value.outermost_super_calls().count(), 1);
        });
    }

    #[test]
    fn test_references_own_name() {
        with_function("function f() { this.save(); }", |func| {
            assert!(references_own_name(func, "save"));
            assert!(!references_own_name(func, "other"));
        });
        with_function("function f() { this.sendAction('save'); }", |func| {
            assert!(references_own_name(func, "save"));
        });
        with_function("function f() { this.get('save').then(); }", |func| {
            assert!(references_own_name(func, "save"));
        });
    }
}
