//! Actions
//!
//! The `actions: { ... }` hash of a component or controller. Every entry
//! becomes an `@action` method of the class.

use super::functions::{references_own_name, FunctionValue};
use super::AnalysisContext;
use crate::source::{comments_between, span_text};
use crate::util::LIFECYCLE_HOOKS;
use crate::validation::ValidationError;
use oxc_ast::ast::*;
use oxc_span::{GetSpan, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionValue {
    Function(FunctionValue),
    /// `save: saveRecord`, forwarded to the referenced function.
    Identifier(String),
    Unsupported(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    pub name: String,
    pub span: Span,
    pub value: ActionValue,
    pub comments: Vec<String>,
    /// `this._super(...)` becomes `undefined`: no parent defines the action.
    pub replace_super_with_undefined: bool,
    /// The body calls itself through `this.<name>` or names itself in a
    /// string literal.
    pub has_self_reference: bool,
}

pub fn analyze_actions(object: &ObjectExpression<'_>, ctx: &AnalysisContext<'_>) -> Vec<ActionEntry> {
    let mut entries = Vec::with_capacity(object.properties.len());
    let mut previous_end = object.span.start + 1;
    for property in &object.properties {
        let span = property.span();
        let comments = comments_between(ctx.source, previous_end, span.start);
        previous_end = span.end;
        entries.push(analyze_entry(property, span, comments, ctx));
    }
    entries
}

fn analyze_entry(
    property: &ObjectPropertyKind<'_>,
    span: Span,
    comments: Vec<String>,
    ctx: &AnalysisContext<'_>,
) -> ActionEntry {
    let unsupported = |name: String, reason: &'static str, comments: Vec<String>| ActionEntry {
        name,
        span,
        value: ActionValue::Unsupported(reason),
        comments,
        replace_super_with_undefined: true,
        has_self_reference: false,
    };

    let ObjectPropertyKind::ObjectProperty(prop) = property else {
        return unsupported(
            span_text(ctx.source, span).to_string(),
            "spread in actions can not be transformed",
            comments,
        );
    };
    let name = match &prop.key {
        PropertyKey::StaticIdentifier(id) if !prop.computed => id.name.to_string(),
        key => {
            return unsupported(
                span_text(ctx.source, key.span()).to_string(),
                "action name must be a plain identifier",
                comments,
            )
        }
    };

    let (value, has_self_reference) = match &prop.value {
        Expression::FunctionExpression(func) if matches!(prop.kind, PropertyKind::Init) => {
            match FunctionValue::from_function(func) {
                Some(value) => (ActionValue::Function(value), references_own_name(func, &name)),
                None => (ActionValue::Unsupported("action has no body"), false),
            }
        }
        Expression::Identifier(id) => (ActionValue::Identifier(id.name.to_string()), false),
        _ => (
            ActionValue::Unsupported("action must be a method, function or identifier"),
            false,
        ),
    };

    ActionEntry {
        replace_super_with_undefined: !ctx.runtime_data.is_overridden_action(&name),
        name,
        span,
        value,
        comments,
        has_self_reference,
    }
}

pub fn lifecycle_hook_errors(entries: &[ActionEntry]) -> Vec<ValidationError> {
    entries
        .iter()
        .filter(|e| LIFECYCLE_HOOKS.contains(e.name.as_str()))
        .map(|e| {
            ValidationError::for_property(
                &e.name,
                "Transform not supported - action name matches one of the lifecycle hooks. Rename and try again. See https://github.com/scalvert/ember-native-class-codemod/issues/34 for more details",
            )
        })
        .collect()
}

/// Only the first entry is inspected; later self-delegating entries pass.
pub fn infinite_loop_errors(entries: &[ActionEntry]) -> Vec<ValidationError> {
    entries
        .first()
        .filter(|e| e.has_self_reference)
        .map(|e| {
            ValidationError::for_property(
                &e.name,
                "Transform not supported - calling the passed action would cause an infinite loop. See https://github.com/scalvert/eslint-plugin-ember-es6-class/pull/2 for more details",
            )
        })
        .into_iter()
        .collect()
}

pub fn unsupported_entry_errors(entries: &[ActionEntry]) -> Vec<ValidationError> {
    entries
        .iter()
        .filter_map(|e| {
            let reason = match &e.value {
                ActionValue::Unsupported(reason) => Some(*reason),
                ActionValue::Function(function) => function.unsupported_super,
                ActionValue::Identifier(_) => None,
            }?;
            Some(ValidationError::for_property(
                &e.name,
                format!("Transform not supported - {}", reason),
            ))
        })
        .collect()
}

/// Every blocking error of an actions hash.
pub fn validate_actions(entries: &[ActionEntry]) -> Vec<ValidationError> {
    let mut errors = lifecycle_hook_errors(entries);
    errors.extend(infinite_loop_errors(entries));
    errors.extend(unsupported_entry_errors(entries));
    errors
}
