//! Call-expression chains
//!
//! `computed('a', function() {}).volatile().readOnly()` is a base call
//! wrapped in modifier calls. The chain is peeled from the outside in and the
//! modifiers are returned innermost first; the base call is never part of
//! the modifier list.

use super::functions::FunctionValue;
use oxc_ast::ast::*;
use oxc_span::{GetSpan, Span};
use smallvec::SmallVec;

/// A call chained onto the base call, such as `.readOnly()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub name: String,
    pub args: Vec<Span>,
}

/// `{ get() {}, set(key, value) {} }` passed to a computed macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessors {
    pub span: Span,
    pub get: Option<FunctionValue>,
    pub set: Option<FunctionValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Function(FunctionValue),
    Accessors(Accessors),
    Other(Span),
}

impl CallArg {
    pub fn span(&self) -> Span {
        match self {
            CallArg::Function(value) => value.span,
            CallArg::Accessors(accessors) => accessors.span,
            CallArg::Other(span) => *span,
        }
    }

    pub fn is_function_like(&self) -> bool {
        matches!(self, CallArg::Function(_) | CallArg::Accessors(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallChain {
    /// Span of the outermost call.
    pub span: Span,
    /// Callee of the base call when it is a plain identifier.
    pub callee_name: Option<String>,
    pub args: Vec<CallArg>,
    pub modifiers: SmallVec<[Modifier; 2]>,
}

impl CallChain {
    pub fn from_call(call: &CallExpression<'_>) -> Self {
        let (base, modifiers) = peel_modifiers(call);
        let callee_name = match &base.callee {
            Expression::Identifier(id) => Some(id.name.to_string()),
            _ => None,
        };
        Self {
            span: call.span,
            callee_name,
            args: base.arguments.iter().map(call_arg).collect(),
            modifiers,
        }
    }

    pub fn last_arg(&self) -> Option<&CallArg> {
        self.args.last()
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m.name == name)
    }
}

/// Split a call chain into its base call and the modifiers wrapped around it.
pub fn peel_modifiers<'b, 'a>(
    call: &'b CallExpression<'a>,
) -> (&'b CallExpression<'a>, SmallVec<[Modifier; 2]>) {
    if let Expression::StaticMemberExpression(member) = &call.callee {
        if let Expression::CallExpression(inner) = &member.object {
            let (base, mut modifiers) = peel_modifiers(inner);
            modifiers.push(Modifier {
                name: member.property.name.to_string(),
                args: call.arguments.iter().map(|a| a.span()).collect(),
            });
            return (base, modifiers);
        }
    }
    (call, SmallVec::new())
}

fn call_arg(argument: &Argument<'_>) -> CallArg {
    match argument {
        Argument::FunctionExpression(func) => match FunctionValue::from_function(func) {
            Some(value) => CallArg::Function(value),
            None => CallArg::Other(func.span),
        },
        Argument::ObjectExpression(object) => match accessors(object) {
            Some(accessors) => CallArg::Accessors(accessors),
            None => CallArg::Other(object.span),
        },
        other => CallArg::Other(other.span()),
    }
}

fn accessors(object: &ObjectExpression<'_>) -> Option<Accessors> {
    let mut result = Accessors {
        span: object.span,
        get: None,
        set: None,
    };
    if object.properties.is_empty() {
        return None;
    }
    for property in &object.properties {
        let ObjectPropertyKind::ObjectProperty(prop) = property else {
            return None;
        };
        let PropertyKey::StaticIdentifier(key) = &prop.key else {
            return None;
        };
        let Expression::FunctionExpression(func) = &prop.value else {
            return None;
        };
        let value = FunctionValue::from_function(func)?;
        match key.name.as_str() {
            "get" => result.get = Some(value),
            "set" => result.set = Some(value),
            _ => return None,
        }
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn chain(expr: &str) -> CallChain {
        let source = format!("{};", expr);
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, &source, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty());
        let Some(Statement::ExpressionStatement(stmt)) = ret.program.body.first() else {
            panic!("expected an expression statement");
        };
        let Expression::CallExpression(call) = &stmt.expression else {
            panic!("expected a call");
        };
        CallChain::from_call(call)
    }

    #[test]
    fn test_modifiers_inside_out() {
        let chain = chain("computed('a', function() { return 1; }).volatile().readOnly()");
        assert_eq!(chain.callee_name.as_deref(), Some("computed"));
        let names: Vec<&str> = chain.modifiers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["volatile", "readOnly"]);
        assert_eq!(chain.args.len(), 2);
        assert!(matches!(chain.last_arg(), Some(CallArg::Function(_))));
    }

    #[test]
    fn test_plain_call_has_no_modifiers() {
        let chain = chain("alias('model.name')");
        assert!(chain.modifiers.is_empty());
        assert!(matches!(chain.args[0], CallArg::Other(_)));
    }

    #[test]
    fn test_modifier_arguments_are_kept() {
        let chain = chain("computed(function() {}).meta({ type: 'x' })");
        assert_eq!(chain.modifiers.len(), 1);
        assert_eq!(chain.modifiers[0].args.len(), 1);
    }

    #[test]
    fn test_accessor_object() {
        let chain = chain("computed('a', { get() { return 1; }, set(key, value) { return value; } })");
        let Some(CallArg::Accessors(accessors)) = chain.last_arg() else {
            panic!("expected accessors");
        };
        assert!(accessors.get.is_some());
        assert_eq!(accessors.set.as_ref().unwrap().params.len(), 2);
    }

    #[test]
    fn test_member_callee_has_no_name() {
        let chain = chain("Ember.computed('a', function() {})");
        assert_eq!(chain.callee_name, None);
    }
}
