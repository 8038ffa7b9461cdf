//! Property Analysis
//!
//! Classifies every property of a definition's object literal: its value
//! shape, the decorators it maps to (from runtime usage data and from imported
//! decorator helpers) and the modifiers chained onto a computed macro.
//!
//! The descriptors own their data (names, flags and source spans) so they
//! outlive the traversal that produced them.

pub mod actions;
mod call_chain;
mod functions;
mod imported;

pub use actions::{ActionEntry, ActionValue};
pub use call_chain::{peel_modifiers, Accessors, CallArg, CallChain, Modifier};
pub use functions::{references_own_name, FunctionValue, SuperCall};
pub use imported::{ImportedDecorator, ImportedDecorators};

use crate::imports::DecoratorImports;
use crate::runtime_data::RuntimeData;
use crate::source::{comments_between, span_text};
use crate::util::{is_class_decorator_prop, LAYOUT_DECORATOR_LOCAL_NAME, LAYOUT_DECORATOR_NAME};
use oxc_ast::ast::{self, Expression, ObjectExpression, ObjectPropertyKind, PropertyKey};
use oxc_span::{GetSpan, Span};
use serde_json::Value;
use smallvec::SmallVec;

/// Decorators that keep a field's initial value.
const VALUE_KEEPING_DECORATORS: [&str; 2] = ["className", "attribute"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Method,
}

/// What a property's value looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueShape {
    Literal(Span),
    Identifier { name: String, span: Span },
    Array { span: Span, elements: Vec<Span> },
    Call(CallChain),
    Function(FunctionValue),
    Object(Span),
    /// Any other plain expression kept verbatim as a field value.
    Expression(Span),
    Unsupported { reason: &'static str },
}

impl ValueShape {
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueShape::Literal(_) => "Literal",
            ValueShape::Identifier { .. } => "Identifier",
            ValueShape::Array { .. } => "ArrayExpression",
            ValueShape::Call(_) => "CallExpression",
            ValueShape::Function(_) => "FunctionExpression",
            ValueShape::Object(_) => "ObjectExpression",
            ValueShape::Expression(_) => "Expression",
            ValueShape::Unsupported { .. } => "Unsupported",
        }
    }

    /// Span of the whole value, for shapes kept as source text.
    pub fn span(&self) -> Option<Span> {
        match self {
            ValueShape::Literal(span)
            | ValueShape::Object(span)
            | ValueShape::Expression(span)
            | ValueShape::Identifier { span, .. }
            | ValueShape::Array { span, .. } => Some(*span),
            ValueShape::Call(chain) => Some(chain.span),
            ValueShape::Function(value) => Some(value.body),
            ValueShape::Unsupported { .. } => None,
        }
    }

    /// A value written out as a field initializer.
    pub fn is_plain_value(&self) -> bool {
        matches!(
            self,
            ValueShape::Literal(_)
                | ValueShape::Identifier { .. }
                | ValueShape::Array { .. }
                | ValueShape::Object(_)
                | ValueShape::Expression(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoratorSource {
    /// From runtime usage data, with the recorded arguments.
    RuntimeData(Value),
    /// The base call's callee is an imported decorator helper.
    Imported(ImportedDecorator),
    /// Named after the base call's callee of a computed property.
    Synthesized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decorator {
    pub name: String,
    pub source: DecoratorSource,
}

impl Decorator {
    pub fn recorded(name: &str, args: Value) -> Self {
        Self {
            name: name.to_string(),
            source: DecoratorSource::RuntimeData(args),
        }
    }

    pub fn imported(imported: &ImportedDecorator) -> Self {
        Self {
            name: imported.decorator_name.clone(),
            source: DecoratorSource::Imported(imported.clone()),
        }
    }

    pub fn synthesized(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: DecoratorSource::Synthesized,
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(&self.source, DecoratorSource::Imported(i) if i.is_method)
    }

    pub fn is_meta(&self) -> bool {
        matches!(&self.source, DecoratorSource::Imported(i) if i.is_meta)
    }

    /// `computed` imported from `@ember/object`.
    pub fn is_computed(&self) -> bool {
        matches!(&self.source, DecoratorSource::Imported(i) if i.is_computed())
    }

    /// Built from the property's call expression rather than usage data.
    pub fn is_call_decorator(&self) -> bool {
        !matches!(self.source, DecoratorSource::RuntimeData(_))
    }
}

/// One property of a definition's object literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub span: Span,
    pub kind: PropertyKind,
    pub shape: ValueShape,
    pub decorators: Vec<Decorator>,
    /// Modifier calls, innermost first.
    pub modifiers: SmallVec<[Modifier; 2]>,
    pub comments: Vec<String>,
    pub runtime_type: Option<String>,
    pub is_computed: bool,
    pub is_overridden: bool,
    pub has_volatile: bool,
    pub has_read_only: bool,
    /// Entries of an `actions` hash.
    pub actions: Vec<ActionEntry>,
}

impl PropertyDescriptor {
    fn new(name: String, span: Span, shape: ValueShape, comments: Vec<String>) -> Self {
        Self {
            name,
            span,
            kind: PropertyKind::Init,
            shape,
            decorators: Vec::new(),
            modifiers: SmallVec::new(),
            comments,
            runtime_type: None,
            is_computed: false,
            is_overridden: false,
            has_volatile: false,
            has_read_only: false,
            actions: Vec::new(),
        }
    }

    pub fn has_decorators(&self) -> bool {
        !self.decorators.is_empty()
    }

    pub fn is_actions(&self) -> bool {
        self.name == "actions"
    }

    pub fn is_tag_name(&self) -> bool {
        self.name == "tagName"
    }

    pub fn is_class_names(&self) -> bool {
        self.name == "classNames"
    }

    pub fn is_class_name_bindings(&self) -> bool {
        self.name == "classNameBindings"
    }

    pub fn is_attribute_bindings(&self) -> bool {
        self.name == "attributeBindings"
    }

    pub fn is_class_decorator(&self) -> bool {
        is_class_decorator_prop(&self.name)
    }

    /// Name of the class decorator this property becomes. A `layout`
    /// property holding the imported `layout` template is written as
    /// `@templateLayout(layout)`.
    pub fn class_decorator_name(&self) -> Option<&str> {
        if !self.is_class_decorator() {
            return None;
        }
        match &self.shape {
            ValueShape::Identifier { name, .. }
                if self.name == LAYOUT_DECORATOR_NAME && name == LAYOUT_DECORATOR_NAME =>
            {
                Some(LAYOUT_DECORATOR_LOCAL_NAME)
            }
            _ => Some(&self.name),
        }
    }

    pub fn is_layout_decorator(&self) -> bool {
        self.class_decorator_name() == Some(LAYOUT_DECORATOR_NAME)
    }

    pub fn is_template_layout_decorator(&self) -> bool {
        self.class_decorator_name() == Some(LAYOUT_DECORATOR_LOCAL_NAME)
    }

    /// A field keeps its initial value unless a decorator takes it over.
    pub fn should_set_value(&self) -> bool {
        self.decorators
            .iter()
            .all(|d| VALUE_KEEPING_DECORATORS.contains(&d.name.as_str()))
    }

    /// Becomes a class field with an initializer.
    pub fn has_field_initializer(&self) -> bool {
        !self.is_class_decorator()
            && !self.is_actions()
            && self.shape.is_plain_value()
            && self.should_set_value()
    }

    /// Function values that become member bodies. Actions are not included.
    pub fn functions(&self) -> Vec<&FunctionValue> {
        match &self.shape {
            ValueShape::Function(function) => vec![function],
            ValueShape::Call(chain) => chain
                .args
                .iter()
                .flat_map(|arg| match arg {
                    CallArg::Function(function) => vec![function],
                    CallArg::Accessors(accessors) => {
                        accessors.get.iter().chain(accessors.set.iter()).collect()
                    }
                    CallArg::Other(_) => Vec::new(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// False when `volatile` turns a computed getter into a plain getter.
    pub fn keeps_call_decorator(&self) -> bool {
        !(self.has_volatile && self.kind == PropertyKind::Get)
    }

    /// Imports the decorators of this property need.
    pub fn decorator_imports(&self) -> DecoratorImports {
        let mut flags = DecoratorImports::empty();
        if self.is_actions() {
            flags |= DecoratorImports::ACTION;
        }
        if self.is_tag_name() {
            flags |= DecoratorImports::TAG_NAME;
        }
        if self.is_class_names() {
            flags |= DecoratorImports::CLASS_NAMES;
        }
        if self.is_class_name_bindings() {
            flags |= DecoratorImports::CLASS_NAME_BINDINGS;
        }
        if self.is_attribute_bindings() {
            flags |= DecoratorImports::ATTRIBUTE_BINDINGS;
        }
        if self.is_layout_decorator() {
            flags |= DecoratorImports::LAYOUT;
        }
        if self.is_template_layout_decorator() {
            flags |= DecoratorImports::TEMPLATE_LAYOUT;
        }
        for decorator in &self.decorators {
            match &decorator.source {
                DecoratorSource::RuntimeData(_) if decorator.name == "off" => {
                    flags |= DecoratorImports::OFF
                }
                DecoratorSource::RuntimeData(_) if decorator.name == "unobserves" => {
                    flags |= DecoratorImports::UNOBSERVES
                }
                DecoratorSource::Imported(imported) if self.keeps_call_decorator() => {
                    flags |= imported.required_import
                }
                _ => {}
            }
        }
        if self.has_read_only && !self.has_volatile && matches!(self.shape, ValueShape::Call(_)) {
            flags |= DecoratorImports::READ_ONLY;
        }
        flags
    }
}

/// Inputs shared by every property of a file.
pub struct AnalysisContext<'r> {
    pub source: &'r str,
    pub runtime_data: &'r RuntimeData,
    pub imported: &'r ImportedDecorators,
}

/// Properties of an object literal plus the comments after the last one.
#[derive(Debug, Clone, Default)]
pub struct AnalyzedObject {
    pub properties: Vec<PropertyDescriptor>,
    pub trailing_comments: Vec<String>,
}

pub fn analyze_properties(object: &ObjectExpression<'_>, ctx: &AnalysisContext<'_>) -> AnalyzedObject {
    let mut properties = Vec::with_capacity(object.properties.len());
    let mut previous_end = object.span.start + 1;
    for property in &object.properties {
        let span = property.span();
        let comments = comments_between(ctx.source, previous_end, span.start);
        previous_end = span.end;
        properties.push(analyze_property(property, span, comments, ctx));
    }
    let trailing_comments =
        comments_between(ctx.source, previous_end, object.span.end.saturating_sub(1));
    AnalyzedObject {
        properties,
        trailing_comments,
    }
}

fn analyze_property(
    property: &ObjectPropertyKind<'_>,
    span: Span,
    comments: Vec<String>,
    ctx: &AnalysisContext<'_>,
) -> PropertyDescriptor {
    let ObjectPropertyKind::ObjectProperty(prop) = property else {
        let name = span_text(ctx.source, span).to_string();
        let shape = ValueShape::Unsupported {
            reason: "spread properties can not be transformed",
        };
        return PropertyDescriptor::new(name, span, shape, comments);
    };

    let name = match &prop.key {
        PropertyKey::StaticIdentifier(id) if !prop.computed => id.name.to_string(),
        key => {
            let name = span_text(ctx.source, key.span()).to_string();
            let shape = ValueShape::Unsupported {
                reason: "property key must be a plain identifier",
            };
            return PropertyDescriptor::new(name, span, shape, comments);
        }
    };

    let shape = if !matches!(prop.kind, ast::PropertyKind::Init) {
        ValueShape::Unsupported {
            reason: "getters and setters in the object literal can not be transformed",
        }
    } else if name == "actions" && !matches!(prop.value, Expression::ObjectExpression(_)) {
        ValueShape::Unsupported {
            reason: "actions must be an object literal",
        }
    } else {
        value_shape(&prop.value)
    };

    let mut descriptor = PropertyDescriptor::new(name, span, shape, comments);

    let data = ctx.runtime_data;
    if let Some(object_type) = data.object_type() {
        descriptor.runtime_type = Some(object_type.to_string());
        if let Some(args) = data.unobserved_properties.get(&descriptor.name) {
            descriptor
                .decorators
                .push(Decorator::recorded("unobserves", args.clone()));
        }
        if let Some(args) = data.off_properties.get(&descriptor.name) {
            descriptor.decorators.push(Decorator::recorded("off", args.clone()));
        }
        descriptor.is_computed = data.is_computed(&descriptor.name);
        descriptor.is_overridden = data.is_overridden(&descriptor.name);
    }

    if let ValueShape::Call(chain) = &descriptor.shape {
        if let Some(callee) = chain.callee_name.as_deref() {
            if let Some(imported) = ctx.imported.get(callee) {
                descriptor.decorators.push(Decorator::imported(imported));
            } else if descriptor.is_computed {
                descriptor.decorators.push(Decorator::synthesized(callee));
            }
        }
        descriptor.modifiers = chain.modifiers.clone();
        descriptor.has_volatile = chain.has_modifier("volatile");
        descriptor.has_read_only = chain.has_modifier("readOnly");
    }

    if descriptor.decorators.iter().any(Decorator::is_computed) {
        descriptor.kind = PropertyKind::Get;
    }
    if prop.method
        || matches!(descriptor.shape, ValueShape::Function(_))
        || descriptor.decorators.iter().any(Decorator::is_method)
    {
        descriptor.kind = PropertyKind::Method;
    }

    if descriptor.is_actions() {
        if let Expression::ObjectExpression(object) = &prop.value {
            descriptor.actions = actions::analyze_actions(object, ctx);
        }
    }

    descriptor
}

fn value_shape(value: &Expression<'_>) -> ValueShape {
    match value {
        Expression::StringLiteral(_)
        | Expression::NumericLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::RegExpLiteral(_) => ValueShape::Literal(value.span()),
        Expression::Identifier(id) => ValueShape::Identifier {
            name: id.name.to_string(),
            span: id.span,
        },
        Expression::ArrayExpression(array) => ValueShape::Array {
            span: array.span,
            elements: array
                .elements
                .iter()
                .filter(|e| !matches!(e, ast::ArrayExpressionElement::Elision(_)))
                .map(|e| e.span())
                .collect(),
        },
        Expression::ObjectExpression(object) => ValueShape::Object(object.span),
        Expression::FunctionExpression(func) => match FunctionValue::from_function(func) {
            Some(function) => ValueShape::Function(function),
            None => ValueShape::Unsupported {
                reason: "function has no body",
            },
        },
        Expression::CallExpression(call) => ValueShape::Call(CallChain::from_call(call)),
        Expression::ArrowFunctionExpression(_)
        | Expression::TemplateLiteral(_)
        | Expression::TaggedTemplateExpression(_)
        | Expression::StaticMemberExpression(_)
        | Expression::ComputedMemberExpression(_)
        | Expression::UnaryExpression(_)
        | Expression::BinaryExpression(_)
        | Expression::LogicalExpression(_)
        | Expression::ConditionalExpression(_)
        | Expression::NewExpression(_)
        | Expression::ParenthesizedExpression(_) => ValueShape::Expression(value.span()),
        _ => ValueShape::Unsupported {
            reason: "value expression can not be transformed",
        },
    }
}
