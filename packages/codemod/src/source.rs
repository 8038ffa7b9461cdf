//! Source Text Helpers
//!
//! The rewrite works on the original text: nodes are located through their
//! spans and replaced with span-based edits, so everything outside a
//! transformed definition is preserved byte for byte.

use crate::error::{Result, TransformError};
use crate::output::SourceText;
use oxc_ast::ast::{Program, TemplateElement};
use oxc_ast_visit::Visit;
use oxc_span::Span;

/// A replacement of `span` in the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        Self::new(Span::new(at, at), text)
    }
}

/// Text covered by a span.
pub fn span_text(source: &str, span: Span) -> &str {
    &source[span.start as usize..span.end as usize]
}

/// Apply non-overlapping edits to the text of `span`.
///
/// Edit spans are absolute offsets into `source` and must lie within `span`.
pub fn apply_edits_in(source: &str, span: Span, edits: &[TextEdit]) -> Result<String> {
    source_text(source, span, edits, &[], 0).map(|text| text.text)
}

/// Apply non-overlapping edits to the whole source.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String> {
    apply_edits_in(source, Span::new(0, source.len() as u32), edits)
}

/// Leading whitespace of the line containing `offset`.
pub fn line_indent(source: &str, offset: u32) -> &str {
    let line_start = source[..offset as usize]
        .rfind('\n')
        .map_or(0, |i| i + 1);
    let line = &source[line_start..];
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Column (in bytes) of `offset` within its line.
pub fn column(source: &str, offset: u32) -> usize {
    let line_start = source[..offset as usize]
        .rfind('\n')
        .map_or(0, |i| i + 1);
    offset as usize - line_start
}

/// Remove up to `columns` leading whitespace characters from every line
/// after the first.
pub fn dedent_tail(text: &str, columns: usize) -> String {
    dedent_lines(text, columns, |_| false)
}

fn dedent_lines(text: &str, columns: usize, keep: impl Fn(usize) -> bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i == 0 {
            out.push_str(line);
            continue;
        }
        out.push('\n');
        if keep(i) {
            out.push_str(line);
            continue;
        }
        let strip = line
            .char_indices()
            .take(columns)
            .take_while(|(_, c)| *c == ' ' || *c == '\t')
            .count();
        out.push_str(&line[strip..]);
    }
    out
}

/// Spans of every template literal quasi in the program, sorted.
pub fn template_quasis(program: &Program<'_>) -> Vec<Span> {
    #[derive(Default)]
    struct QuasiCollector {
        spans: Vec<Span>,
    }

    impl<'a> Visit<'a> for QuasiCollector {
        fn visit_template_element(&mut self, it: &TemplateElement<'a>) {
            self.spans.push(it.span);
        }
    }

    let mut collector = QuasiCollector::default();
    collector.visit_program(program);
    collector.spans.sort_by_key(|span| span.start);
    collector.spans
}

/// True when `offset` lies inside one of the sorted, disjoint `quasis`.
fn in_template(quasis: &[Span], offset: u32) -> bool {
    let index = quasis.partition_point(|q| q.end <= offset);
    quasis.get(index).map_or(false, |q| q.start <= offset)
}

/// Text of `span` with `edits` applied, dedented by up to `columns` after
/// the first line. Lines that start inside a template literal are kept as
/// they are and reported as verbatim. Inserted text never is.
pub fn source_text(
    source: &str,
    span: Span,
    edits: &[TextEdit],
    quasis: &[Span],
    columns: usize,
) -> Result<SourceText> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.span.start, e.span.end));

    let mut out = LineTracker::default();
    let mut cursor = span.start;
    for edit in sorted {
        if edit.span.start < cursor || edit.span.end > span.end {
            return Err(TransformError::invariant(format!(
                "overlapping or out of range edit at {}..{}",
                edit.span.start, edit.span.end
            )));
        }
        out.copy(source, cursor, edit.span.start, quasis);
        out.insert(&edit.replacement);
        cursor = edit.span.end;
    }
    out.copy(source, cursor, span.end, quasis);

    let LineTracker {
        text,
        verbatim_lines,
        ..
    } = out;
    let text = dedent_lines(&text, columns, |i| verbatim_lines.binary_search(&i).is_ok());
    Ok(SourceText::new(text, verbatim_lines))
}

#[derive(Default)]
struct LineTracker {
    text: String,
    line: usize,
    verbatim_lines: Vec<usize>,
}

impl LineTracker {
    fn copy(&mut self, source: &str, from: u32, to: u32, quasis: &[Span]) {
        let chunk = &source[from as usize..to as usize];
        for (i, _) in chunk.match_indices('\n') {
            self.line += 1;
            if in_template(quasis, from + i as u32) {
                self.verbatim_lines.push(self.line);
            }
        }
        self.text.push_str(chunk);
    }

    fn insert(&mut self, text: &str) {
        self.line += text.matches('\n').count();
        self.text.push_str(text);
    }
}

/// Comments found in the gap `start..end`, which may only contain
/// whitespace, commas and comments. Scanning stops at anything else.
pub fn comments_between(source: &str, start: u32, end: u32) -> Vec<String> {
    let mut comments = Vec::new();
    if start >= end {
        return comments;
    }
    let gap = &source[start as usize..end as usize];
    let mut pos = 0;
    while pos < gap.len() {
        let rest = &gap[pos..];
        let skipped = rest
            .find(|c: char| !c.is_whitespace() && c != ',')
            .unwrap_or(rest.len());
        pos += skipped;
        let rest = &gap[pos..];
        if rest.starts_with("//") {
            let len = rest.find('\n').unwrap_or(rest.len());
            comments.push(rest[..len].trim_end().to_string());
            pos += len;
        } else if rest.starts_with("/*") {
            let Some(close) = rest.find("*/") else {
                break;
            };
            let len = close + 2;
            let col = column(source, start + pos as u32);
            comments.push(dedent_tail(&rest[..len], col));
            pos += len;
        } else {
            break;
        }
    }
    comments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_edits() {
        let source = "const a = 1; const b = 2;";
        let edits = vec![
            TextEdit::new(Span::new(19, 20), "c"),
            TextEdit::new(Span::new(6, 7), "z"),
        ];
        assert_eq!(apply_edits(source, &edits).unwrap(), "const z = 1; const c = 2;");
    }

    #[test]
    fn test_apply_overlapping_edits_fails() {
        let source = "abcdef";
        let edits = vec![
            TextEdit::new(Span::new(0, 3), "x"),
            TextEdit::new(Span::new(2, 4), "y"),
        ];
        assert!(apply_edits(source, &edits).is_err());
    }

    #[test]
    fn test_line_indent_and_column() {
        let source = "a\n    foo: 1\n";
        assert_eq!(line_indent(source, 8), "    ");
        assert_eq!(column(source, 6), 4);
    }

    #[test]
    fn test_dedent_tail() {
        let text = "{\n      foo();\n    }";
        assert_eq!(dedent_tail(text, 4), "{\n  foo();\n}");
    }

    #[test]
    fn test_comments_between() {
        let source = "{ a: 1,\n  // first\n  /**\n   * doc\n   */\n  b: 2 }";
        let start = source.find(',').unwrap() as u32;
        let end = source.find("b:").unwrap() as u32;
        assert_eq!(
            comments_between(source, start, end),
            vec!["// first".to_string(), "/**\n * doc\n */".to_string()]
        );
    }

    fn quasis_of(source: &str) -> Vec<Span> {
        let allocator = oxc_allocator::Allocator::default();
        let ret = oxc_parser::Parser::new(&allocator, source, oxc_span::SourceType::mjs()).parse();
        assert!(ret.errors.is_empty());
        template_quasis(&ret.program)
    }

    #[test]
    fn test_source_text_keeps_template_lines() {
        let source = "function f() {\n    return `a\n    b ${x}\n    c`;\n  }";
        let quasis = quasis_of(source);
        assert_eq!(quasis.len(), 2);
        let start = source.find('{').unwrap() as u32;
        let text = source_text(source, Span::new(start, source.len() as u32), &[], &quasis, 2).unwrap();
        assert_eq!(text.text, "{\n  return `a\n    b ${x}\n    c`;\n}");
        assert_eq!(text.verbatim_lines, vec![2, 3]);
    }

    #[test]
    fn test_source_text_counts_inserted_lines() {
        let source = "{\n  call(`x\ny`);\n}";
        let quasis = quasis_of(source);
        let at = source.find("call").unwrap() as u32;
        let edits = vec![TextEdit::insert(at, "// note\n  ")];
        let text = source_text(source, Span::new(0, source.len() as u32), &edits, &quasis, 0).unwrap();
        assert_eq!(text.text, "{\n  // note\n  call(`x\ny`);\n}");
        assert_eq!(text.verbatim_lines, vec![3]);
    }
}
