//! Member synthesis
//!
//! Turns one property descriptor into the class members that replace it.

use super::BuildContext;
use crate::error::{Result, TransformError};
use crate::output::{ClassMember, DecoratorExpr, MethodKind, SourceText};
use crate::property::{
    ActionEntry, ActionValue, CallArg, CallChain, DecoratorSource, FunctionValue,
    PropertyDescriptor, PropertyKind, ValueShape,
};
use crate::source::{line_indent, source_text, TextEdit};
use crate::options::Quote;
use oxc_span::Span;
use serde_json::Value;

const ACTION_SUPER_NOTE: [&str; 3] = [
    "// NOTE: this super call runs inside an action and resolves to the parent",
    "// class's action of the same name. Moving the shared logic into a regular",
    "// method on the parent class makes the call independent of the actions hash.",
];

/// Members replacing `prop`, in order. The property's comments go to the
/// first one.
pub fn property_members(prop: &PropertyDescriptor, ctx: &BuildContext<'_>) -> Result<Vec<ClassMember>> {
    let column = line_indent(ctx.source, prop.span.start).len();
    let mut members = if prop.is_actions() {
        action_members(prop, ctx)?
    } else {
        match &prop.shape {
            ValueShape::Function(function) => {
                let kind = match prop.kind {
                    PropertyKind::Get => MethodKind::Get,
                    _ => MethodKind::Method,
                };
                let replace_super = prop.runtime_type.is_some() && !prop.is_overridden;
                let body = rewrite_body(function, &prop.name, replace_super, false, ctx, column)?;
                vec![method_member(&prop.name, kind, function, body, ctx, column, 0)?
                    .with_decorators(recorded_decorators(prop, ctx.options.quote))]
            }
            ValueShape::Call(chain) => call_members(prop, chain, ctx, column)?,
            ValueShape::Unsupported { reason } => {
                return Err(TransformError::invariant(format!(
                    "[{}]: unsupported property reached the class builder: {}",
                    prop.name, reason
                )))
            }
            shape => {
                let value = match shape.span() {
                    Some(span) if prop.should_set_value() => Some(snippet(ctx, span, column)?),
                    _ => None,
                };
                vec![ClassMember::field(&prop.name, value)
                    .with_decorators(recorded_decorators(prop, ctx.options.quote))]
            }
        }
    };

    if let Some(first) = members.first_mut() {
        let mut comments = prop.comments.clone();
        comments.append(&mut first.comments);
        first.comments = comments;
    }
    Ok(members)
}

fn snippet(ctx: &BuildContext<'_>, span: Span, column: usize) -> Result<SourceText> {
    source_text(ctx.source, span, &[], ctx.quasis, column)
}

/// Decorators taken from runtime usage data (`@off`, `@unobserves`).
fn recorded_decorators(prop: &PropertyDescriptor, quote: Quote) -> Vec<DecoratorExpr> {
    prop.decorators
        .iter()
        .filter_map(|d| match &d.source {
            DecoratorSource::RuntimeData(args) => {
                Some(DecoratorExpr::new(&d.name, json_args(args, quote)))
            }
            _ => None,
        })
        .collect()
}

fn json_args(value: &Value, quote: Quote) -> Vec<SourceText> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(|v| json_to_js(v, quote).into()).collect(),
        other => vec![json_to_js(other, quote).into()],
    }
}

/// Print a JSON value as a JavaScript literal.
pub fn json_to_js(value: &Value, quote: Quote) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_string(s, quote),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(|v| json_to_js(v, quote)).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            if map.is_empty() {
                return "{}".to_string();
            }
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| {
                    let key = if crate::util::is_legal_identifier(k) {
                        k.clone()
                    } else {
                        quote_string(k, quote)
                    };
                    format!("{}: {}", key, json_to_js(v, quote))
                })
                .collect();
            format!("{{ {} }}", entries.join(", "))
        }
    }
}

fn quote_string(s: &str, quote: Quote) -> String {
    let q = quote.char();
    let mut out = String::with_capacity(s.len() + 2);
    out.push(q);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

fn method_member(
    name: &str,
    kind: MethodKind,
    function: &FunctionValue,
    body: SourceText,
    ctx: &BuildContext<'_>,
    column: usize,
    skip_params: usize,
) -> Result<ClassMember> {
    let params = function
        .params
        .iter()
        .skip(skip_params)
        .map(|span| snippet(ctx, *span, column))
        .collect::<Result<Vec<_>>>()?;
    Ok(ClassMember::method(name, kind, params, body)
        .with_flags(function.is_async, function.is_generator))
}

/// Method body with `this._super(...)` rewritten.
fn rewrite_body(
    function: &FunctionValue,
    name: &str,
    replace_with_undefined: bool,
    in_action: bool,
    ctx: &BuildContext<'_>,
    column: usize,
) -> Result<SourceText> {
    let mut edits = Vec::new();
    if replace_with_undefined {
        for call in function.outermost_super_calls() {
            edits.push(TextEdit::new(call.call, "undefined"));
        }
    } else {
        let mut noted = Vec::new();
        for call in &function.super_calls {
            edits.push(TextEdit::new(call.callee, format!("super.{}", name)));
            if in_action && !noted.contains(&call.statement_start) {
                noted.push(call.statement_start);
                let indent = line_indent(ctx.source, call.statement_start);
                let mut note = ACTION_SUPER_NOTE.join(&format!("\n{}", indent));
                note.push('\n');
                note.push_str(indent);
                edits.push(TextEdit::insert(call.statement_start, note));
            }
        }
    }
    source_text(ctx.source, function.body, &edits, ctx.quasis, column)
}

fn call_members(
    prop: &PropertyDescriptor,
    chain: &CallChain,
    ctx: &BuildContext<'_>,
    column: usize,
) -> Result<Vec<ClassMember>> {
    let mut decorators = recorded_decorators(prop, ctx.options.quote);

    let last = chain.last_arg();
    let drops_last = matches!(prop.kind, PropertyKind::Method | PropertyKind::Get)
        && last.map_or(false, CallArg::is_function_like);
    let args = if drops_last {
        &chain.args[..chain.args.len() - 1]
    } else {
        &chain.args[..]
    };

    if prop.keeps_call_decorator() {
        let arg_texts = args
            .iter()
            .map(|a| snippet(ctx, a.span(), column))
            .collect::<Result<Vec<_>>>()?;
        for decorator in prop.decorators.iter().filter(|d| d.is_call_decorator()) {
            decorators.push(DecoratorExpr::new(&decorator.name, arg_texts.clone()));
        }
        // Other argument-free modifiers (`.meta()`, `.property()`) change nothing.
        if prop.has_read_only && !prop.has_volatile {
            decorators.push(DecoratorExpr::bare("readOnly"));
        }
    }

    let replace_super = prop.runtime_type.is_some() && !prop.is_overridden;
    let members = match (prop.kind, last) {
        (PropertyKind::Method, Some(CallArg::Function(function))) => {
            let body = rewrite_body(function, &prop.name, replace_super, false, ctx, column)?;
            vec![method_member(&prop.name, MethodKind::Method, function, body, ctx, column, 0)?
                .with_decorators(decorators)]
        }
        (PropertyKind::Get, Some(CallArg::Function(function))) => {
            let body = rewrite_body(function, &prop.name, replace_super, false, ctx, column)?;
            vec![method_member(&prop.name, MethodKind::Get, function, body, ctx, column, 0)?
                .with_decorators(decorators)]
        }
        (PropertyKind::Get, Some(CallArg::Accessors(accessors))) => {
            let mut members = Vec::new();
            if let Some(getter) = &accessors.get {
                let body = rewrite_body(getter, &prop.name, replace_super, false, ctx, column)?;
                members.push(method_member(&prop.name, MethodKind::Get, getter, body, ctx, column, 0)?);
            }
            if let Some(setter) = &accessors.set {
                let body = rewrite_body(setter, &prop.name, replace_super, false, ctx, column)?;
                // The key parameter of a computed setter has no native counterpart.
                members.push(method_member(&prop.name, MethodKind::Set, setter, body, ctx, column, 1)?);
            }
            if let Some(first) = members.first_mut() {
                first.decorators = decorators;
            }
            members
        }
        _ => {
            let value = if prop.should_set_value() {
                Some(snippet(ctx, chain.span, column)?)
            } else {
                None
            };
            vec![ClassMember::field(&prop.name, value).with_decorators(decorators)]
        }
    };
    Ok(members)
}

fn action_members(prop: &PropertyDescriptor, ctx: &BuildContext<'_>) -> Result<Vec<ClassMember>> {
    prop.actions.iter().map(|entry| action_member(entry, ctx)).collect()
}

fn action_member(entry: &ActionEntry, ctx: &BuildContext<'_>) -> Result<ClassMember> {
    let column = line_indent(ctx.source, entry.span.start).len();
    let mut member = match &entry.value {
        ActionValue::Function(function) => {
            let body = rewrite_body(
                function,
                &entry.name,
                entry.replace_super_with_undefined,
                true,
                ctx,
                column,
            )?;
            method_member(&entry.name, MethodKind::Method, function, body, ctx, column, 0)?
        }
        ActionValue::Identifier(reference) => ClassMember::method(
            &entry.name,
            MethodKind::Method,
            Vec::new(),
            format!("{{\n  return {}.call(this, ...arguments);\n}}", reference).into(),
        ),
        ActionValue::Unsupported(reason) => {
            return Err(TransformError::invariant(format!(
                "[{}]: unsupported action reached the class builder: {}",
                entry.name, reason
            )))
        }
    };
    member.comments = entry.comments.clone();
    member.decorators = vec![DecoratorExpr::bare("action")];
    Ok(member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_js() {
        assert_eq!(json_to_js(&json!("it's"), Quote::Single), "'it\\'s'");
        assert_eq!(json_to_js(&json!("a"), Quote::Double), "\"a\"");
        assert_eq!(json_to_js(&json!([1, true, null]), Quote::Single), "[1, true, null]");
        assert_eq!(
            json_to_js(&json!({ "a": 1, "b-c": "d" }), Quote::Single),
            "{ a: 1, 'b-c': 'd' }"
        );
    }

    #[test]
    fn test_json_args_spread_arrays() {
        let texts = |args: Vec<SourceText>| args.into_iter().map(|a| a.text).collect::<Vec<_>>();
        assert_eq!(
            texts(json_args(&json!(["init", "didInsertElement"]), Quote::Single)),
            vec!["'init'", "'didInsertElement'"]
        );
        assert_eq!(texts(json_args(&json!("init"), Quote::Single)), vec!["'init'"]);
        assert!(json_args(&Value::Null, Quote::Single).is_empty());
    }
}
