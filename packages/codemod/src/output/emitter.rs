//! Emitter
//!
//! Line-based printing with an indentation level, as used for every piece of
//! generated code.

use super::class_ast::{ClassDeclaration, ClassMember, MemberBody, MethodKind, SourceText};

const INDENT_WITH: &str = "  ";

#[derive(Debug, Clone)]
struct EmittedLine {
    parts: Vec<String>,
    indent: usize,
    /// Continues a template literal: printed without any indentation.
    verbatim: bool,
}

impl EmittedLine {
    fn new(indent: usize) -> Self {
        EmittedLine {
            parts: Vec::new(),
            indent,
            verbatim: false,
        }
    }
}

pub struct EmitterContext {
    lines: Vec<EmittedLine>,
    indent: usize,
    /// Prefix of every line after the first.
    base_indent: String,
}

impl Default for EmitterContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EmitterContext {
    pub fn new() -> Self {
        Self::with_base_indent("")
    }

    /// Output placed at a position indented by `base_indent`.
    pub fn with_base_indent(base_indent: &str) -> Self {
        EmitterContext {
            lines: vec![EmittedLine::new(0)],
            indent: 0,
            base_indent: base_indent.to_string(),
        }
    }

    fn current_line_mut(&mut self) -> &mut EmittedLine {
        if self.lines.is_empty() {
            self.lines.push(EmittedLine::new(self.indent));
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    pub fn line_is_empty(&self) -> bool {
        self.lines.last().map_or(true, |l| l.parts.is_empty())
    }

    pub fn print(&mut self, part: &str, new_line: bool) {
        if !part.is_empty() {
            self.current_line_mut().parts.push(part.to_string());
        }
        if new_line {
            self.lines.push(EmittedLine::new(self.indent));
        }
    }

    pub fn println(&mut self, part: &str) {
        self.print(part, true);
    }

    /// Print text that may span several lines. Continuation lines keep their
    /// own relative indentation on top of the current level.
    pub fn print_multiline(&mut self, text: &str, new_line: bool) {
        self.print_lines(text, |_| false, new_line);
    }

    /// Like `print_multiline`, but lines inside template literals are
    /// printed as they are.
    pub fn print_source(&mut self, text: &SourceText, new_line: bool) {
        self.print_lines(&text.text, |line| text.is_verbatim(line), new_line);
    }

    fn print_lines(&mut self, text: &str, verbatim: impl Fn(usize) -> bool, new_line: bool) {
        let mut lines = text.split('\n').enumerate().peekable();
        while let Some((i, line)) = lines.next() {
            if i > 0 && verbatim(i) {
                self.current_line_mut().verbatim = true;
            }
            let last = lines.peek().is_none();
            self.print(line, !last || new_line);
        }
    }

    pub fn inc_indent(&mut self) {
        self.indent += 1;
        if self.line_is_empty() {
            let indent = self.indent;
            self.current_line_mut().indent = indent;
        }
    }

    pub fn dec_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        if self.line_is_empty() {
            let indent = self.indent;
            self.current_line_mut().indent = indent;
        }
    }

    pub fn to_source(&self) -> String {
        let mut lines: &[EmittedLine] = &self.lines;
        if let Some((last, rest)) = lines.split_last() {
            if last.parts.is_empty() && !last.verbatim {
                lines = rest;
            }
        }
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let text = l.parts.join("");
                if l.verbatim || text.is_empty() {
                    text
                } else if i == 0 {
                    format!("{}{}", INDENT_WITH.repeat(l.indent), text)
                } else {
                    format!("{}{}{}", self.base_indent, INDENT_WITH.repeat(l.indent), text)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Print a class. `prefix` (`export `, `export default `) goes between the
/// decorators and the `class` keyword. The first line is placed by the
/// caller; every other line gets `base_indent`.
pub fn emit_class(class: &ClassDeclaration, prefix: &str, base_indent: &str) -> String {
    let mut ctx = EmitterContext::with_base_indent(base_indent);
    for comment in &class.leading_comments {
        ctx.print_multiline(comment, true);
    }
    for decorator in &class.decorators {
        ctx.print_source(&decorator.to_source(), true);
    }
    ctx.print(
        &format!("{}class {} extends {} {{", prefix, class.name, class.super_class),
        false,
    );
    if class.members.is_empty() && class.trailing_comments.is_empty() {
        ctx.print("}", false);
        return ctx.to_source();
    }

    ctx.println("");
    ctx.inc_indent();
    for (i, member) in class.members.iter().enumerate() {
        if i > 0 {
            ctx.println("");
        }
        emit_member(&mut ctx, member);
    }
    if !class.trailing_comments.is_empty() {
        if !class.members.is_empty() {
            ctx.println("");
        }
        for comment in &class.trailing_comments {
            ctx.print_multiline(comment, true);
        }
    }
    ctx.dec_indent();
    ctx.print("}", false);
    ctx.to_source()
}

fn emit_member(ctx: &mut EmitterContext, member: &ClassMember) {
    for comment in &member.comments {
        ctx.print_multiline(comment, true);
    }
    for decorator in &member.decorators {
        ctx.print_source(&decorator.to_source(), true);
    }
    match &member.body {
        MemberBody::Field { value: None } => ctx.println(&format!("{};", member.key)),
        MemberBody::Field { value: Some(value) } => {
            let mut line = SourceText::from(format!("{} = ", member.key));
            line.append(value);
            line.push_str(";");
            ctx.print_source(&line, true);
        }
        MemberBody::Method {
            kind,
            is_async,
            is_generator,
            params,
            body,
        } => {
            let mut head = String::new();
            if *is_async {
                head.push_str("async ");
            }
            match kind {
                MethodKind::Get => head.push_str("get "),
                MethodKind::Set => head.push_str("set "),
                MethodKind::Method => {}
            }
            if *is_generator {
                head.push('*');
            }
            head.push_str(&member.key);
            head.push('(');
            let mut method = SourceText::from(head);
            method.append(&SourceText::join(params, ", "));
            method.push_str(") ");
            method.append(body);
            ctx.print_source(&method, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::class_ast::DecoratorExpr;

    #[test]
    fn test_empty_class() {
        let class = ClassDeclaration {
            name: "Foo".to_string(),
            super_class: "EmberObject".to_string(),
            decorators: vec![DecoratorExpr::bare("classic")],
            ..ClassDeclaration::default()
        };
        assert_eq!(
            emit_class(&class, "export default ", ""),
            "@classic\nexport default class Foo extends EmberObject {}"
        );
    }

    #[test]
    fn test_members_are_separated_by_blank_lines() {
        let class = ClassDeclaration {
            name: "Foo".to_string(),
            super_class: "Component".to_string(),
            decorators: vec![DecoratorExpr::new("tagName", vec!["'div'".into()])],
            members: vec![
                ClassMember::field("a", Some("1".into())),
                ClassMember::method(
                    "click",
                    MethodKind::Method,
                    vec!["event".into()],
                    "{\n  this.toggle();\n}".into(),
                )
                .with_decorators(vec![DecoratorExpr::bare("action")]),
                ClassMember {
                    comments: vec!["// injected".to_string()],
                    ..ClassMember::field("store", None)
                }
                .with_decorators(vec![DecoratorExpr::bare("service")]),
            ],
            trailing_comments: vec!["// end".to_string()],
            ..ClassDeclaration::default()
        };
        assert_eq!(
            emit_class(&class, "", ""),
            "@tagName('div')\nclass Foo extends Component {\n  a = 1;\n\n  @action\n  click(event) {\n    this.toggle();\n  }\n\n  // injected\n  @service\n  store;\n\n  // end\n}"
        );
    }

    #[test]
    fn test_getter_and_async_method() {
        let class = ClassDeclaration {
            name: "Foo".to_string(),
            super_class: "EmberObject".to_string(),
            members: vec![
                ClassMember::method("full", MethodKind::Get, vec![], "{ return 1; }".into()),
                ClassMember::method("load", MethodKind::Method, vec![], "{}".into())
                    .with_flags(true, false),
            ],
            ..ClassDeclaration::default()
        };
        assert_eq!(
            emit_class(&class, "", ""),
            "class Foo extends EmberObject {\n  get full() { return 1; }\n\n  async load() {}\n}"
        );
    }

    #[test]
    fn test_base_indent_skips_template_lines() {
        let class = ClassDeclaration {
            name: "Foo".to_string(),
            super_class: "EmberObject".to_string(),
            members: vec![ClassMember::method(
                "message",
                MethodKind::Method,
                vec![],
                SourceText::new("{\n  return `a\nb`;\n}", vec![2]),
            )],
            ..ClassDeclaration::default()
        };
        assert_eq!(
            emit_class(&class, "", "    "),
            "class Foo extends EmberObject {\n      message() {\n        return `a\nb`;\n      }\n    }"
        );
    }
}
