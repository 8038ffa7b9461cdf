//! Class AST
//!
//! Expressions that come from the original source (values, decorator
//! arguments, method bodies) are carried as already-printed text.

/// Printed code. Lines listed in `verbatim_lines` start inside a template
/// literal; their leading whitespace belongs to the string and is never
/// re-indented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceText {
    pub text: String,
    /// Line indexes, ascending. Line 0 is never verbatim.
    pub verbatim_lines: Vec<usize>,
}

impl SourceText {
    pub fn new(text: impl Into<String>, verbatim_lines: Vec<usize>) -> Self {
        SourceText {
            text: text.into(),
            verbatim_lines,
        }
    }

    pub fn is_verbatim(&self, line: usize) -> bool {
        self.verbatim_lines.binary_search(&line).is_ok()
    }

    fn line_count(&self) -> usize {
        self.text.matches('\n').count()
    }

    /// Append generated text. Its lines are never verbatim.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append another piece, keeping its verbatim lines.
    pub fn append(&mut self, other: &SourceText) {
        let offset = self.line_count();
        self.verbatim_lines
            .extend(other.verbatim_lines.iter().map(|line| line + offset));
        self.text.push_str(&other.text);
    }

    pub fn join(parts: &[SourceText], separator: &str) -> SourceText {
        let mut joined = SourceText::default();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                joined.push_str(separator);
            }
            joined.append(part);
        }
        joined
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        SourceText::new(text, Vec::new())
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        SourceText::new(text, Vec::new())
    }
}

/// `@name` or `@name(args)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratorExpr {
    pub name: String,
    pub args: Vec<SourceText>,
}

impl DecoratorExpr {
    pub fn new(name: impl Into<String>, args: Vec<SourceText>) -> Self {
        DecoratorExpr {
            name: name.into(),
            args,
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn to_source(&self) -> SourceText {
        let mut out = SourceText::from(format!("@{}", self.name));
        if !self.args.is_empty() {
            out.push_str("(");
            out.append(&SourceText::join(&self.args, ", "));
            out.push_str(")");
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberBody {
    Field {
        value: Option<SourceText>,
    },
    Method {
        kind: MethodKind,
        is_async: bool,
        is_generator: bool,
        params: Vec<SourceText>,
        /// Block including braces.
        body: SourceText,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMember {
    pub key: String,
    pub comments: Vec<String>,
    pub decorators: Vec<DecoratorExpr>,
    pub body: MemberBody,
}

impl ClassMember {
    pub fn field(key: impl Into<String>, value: Option<SourceText>) -> Self {
        ClassMember {
            key: key.into(),
            comments: Vec::new(),
            decorators: Vec::new(),
            body: MemberBody::Field { value },
        }
    }

    pub fn method(
        key: impl Into<String>,
        kind: MethodKind,
        params: Vec<SourceText>,
        body: SourceText,
    ) -> Self {
        ClassMember {
            key: key.into(),
            comments: Vec::new(),
            decorators: Vec::new(),
            body: MemberBody::Method {
                kind,
                is_async: false,
                is_generator: false,
                params,
                body,
            },
        }
    }

    pub fn with_decorators(mut self, decorators: Vec<DecoratorExpr>) -> Self {
        self.decorators = decorators;
        self
    }

    pub fn with_flags(mut self, async_flag: bool, generator_flag: bool) -> Self {
        if let MemberBody::Method {
            is_async,
            is_generator,
            ..
        } = &mut self.body
        {
            *is_async = async_flag;
            *is_generator = generator_flag;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassDeclaration {
    pub name: String,
    pub super_class: String,
    pub leading_comments: Vec<String>,
    pub decorators: Vec<DecoratorExpr>,
    pub members: Vec<ClassMember>,
    pub trailing_comments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_shifts_verbatim_lines() {
        let mut text = SourceText::from("a = {\n  b: ");
        text.append(&SourceText::new("`x\ny`", vec![1]));
        text.push_str("\n}");
        assert_eq!(text.text, "a = {\n  b: `x\ny`\n}");
        assert_eq!(text.verbatim_lines, vec![2]);
        assert!(text.is_verbatim(2));
        assert!(!text.is_verbatim(3));
    }

    #[test]
    fn test_decorator_source() {
        assert_eq!(DecoratorExpr::bare("classic").to_source().text, "@classic");
        let decorator = DecoratorExpr::new(
            "classNames",
            vec!["'a'".into(), SourceText::new("`b\n  c`", vec![1])],
        );
        let source = decorator.to_source();
        assert_eq!(source.text, "@classNames('a', `b\n  c`)");
        assert_eq!(source.verbatim_lines, vec![1]);
    }
}
