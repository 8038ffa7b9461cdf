//! Output Module
//!
//! A small class AST for the generated code and the emitter that prints it.

pub mod class_ast;
pub mod emitter;

pub use class_ast::{ClassDeclaration, ClassMember, DecoratorExpr, MemberBody, MethodKind, SourceText};
pub use emitter::{emit_class, EmitterContext};
