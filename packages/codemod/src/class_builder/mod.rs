//! Class Builder
//!
//! Synthesizes the native class for a validated definition: class-level
//! decorators, members in property order, and the decorator imports the
//! class needs.

mod members;
mod naming;

pub use members::json_to_js;
pub use naming::{avoid_superclass_name, class_name};

use crate::error::{Result, TransformError};
use crate::imports::DecoratorImports;
use crate::options::Options;
use crate::output::{ClassDeclaration, DecoratorExpr};
use crate::property::{AnalyzedObject, PropertyDescriptor, ValueShape};
use crate::source::{line_indent, source_text};
use oxc_span::Span;

/// A definition ready to be turned into a class.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    pub name: String,
    pub superclass_name: String,
    /// Source text of each mixin, in order.
    pub mixins: Vec<String>,
    pub properties: Vec<PropertyDescriptor>,
    pub trailing_comments: Vec<String>,
}

impl ClassDescriptor {
    pub fn new(
        name: String,
        superclass_name: String,
        mixins: Vec<String>,
        object: AnalyzedObject,
    ) -> Self {
        ClassDescriptor {
            name: avoid_superclass_name(name, &superclass_name),
            superclass_name,
            mixins,
            properties: object.properties,
            trailing_comments: object.trailing_comments,
        }
    }

    /// `Base`, or `Base.extend(MixinA, MixinB)` when mixins are applied.
    pub fn super_class_expression(&self) -> String {
        if self.mixins.is_empty() {
            self.superclass_name.clone()
        } else {
            format!("{}.extend({})", self.superclass_name, self.mixins.join(", "))
        }
    }

    pub fn decorator_imports(&self, options: &Options) -> DecoratorImports {
        let mut flags = self
            .properties
            .iter()
            .fold(DecoratorImports::empty(), |flags, p| flags | p.decorator_imports());
        if options.classic_decorator {
            flags |= DecoratorImports::CLASSIC;
        }
        flags
    }
}

pub struct BuildContext<'s> {
    pub source: &'s str,
    pub options: &'s Options,
    /// Template literal quasis of the file, see `source::template_quasis`.
    pub quasis: &'s [Span],
}

#[derive(Debug, Clone)]
pub struct BuiltClass {
    pub class: ClassDeclaration,
    pub imports: DecoratorImports,
}

pub fn build_class(descriptor: &ClassDescriptor, ctx: &BuildContext<'_>) -> Result<BuiltClass> {
    let mut class = ClassDeclaration {
        name: descriptor.name.clone(),
        super_class: descriptor.super_class_expression(),
        trailing_comments: descriptor.trailing_comments.clone(),
        ..ClassDeclaration::default()
    };
    if ctx.options.classic_decorator {
        class.decorators.push(DecoratorExpr::bare("classic"));
    }

    for prop in &descriptor.properties {
        match prop.class_decorator_name() {
            Some(decorator_name) => {
                class.leading_comments.extend(prop.comments.iter().cloned());
                class
                    .decorators
                    .push(class_decorator(prop, decorator_name, ctx)?);
            }
            None => class.members.extend(members::property_members(prop, ctx)?),
        }
    }

    Ok(BuiltClass {
        class,
        imports: descriptor.decorator_imports(ctx.options),
    })
}

fn class_decorator(
    prop: &PropertyDescriptor,
    decorator_name: &str,
    ctx: &BuildContext<'_>,
) -> Result<DecoratorExpr> {
    let column = line_indent(ctx.source, prop.span.start).len();
    let text = |span| source_text(ctx.source, span, &[], ctx.quasis, column);
    let args = match &prop.shape {
        ValueShape::Array { elements, .. } => elements
            .iter()
            .map(|span| text(*span))
            .collect::<Result<Vec<_>>>()?,
        ValueShape::Literal(span)
        | ValueShape::Expression(span)
        | ValueShape::Identifier { span, .. } => vec![text(*span)?],
        other => {
            return Err(TransformError::invariant(format!(
                "[{}]: class decorator value of type {} reached the class builder",
                prop.name,
                other.type_name()
            )))
        }
    };
    Ok(DecoratorExpr::new(decorator_name, args))
}
