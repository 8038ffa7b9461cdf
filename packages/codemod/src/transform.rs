//! Transform
//!
//! Per-file driver: eligibility gates, parse, one pass over every `extend`
//! definition, import edits, and a final re-parse of the output.

use crate::class_builder::{build_class, class_name, BuildContext, ClassDescriptor};
use crate::error::{Result, TransformError};
use crate::imports::{existing_imports, import_edits, DecoratorImports};
use crate::logging::LogLevel;
use crate::matcher::{for_each_extend_call, ExtendCall, ReplaceTarget};
use crate::options::{FileType, Options};
use crate::output::emit_class;
use crate::property::{analyze_properties, AnalysisContext, AnalyzedObject, ImportedDecorators};
use crate::runtime_data::{RuntimeData, RuntimeDataProvider};
use crate::source::{apply_edits, line_indent, span_text, template_quasis, TextEdit};
use crate::validation::{is_file_of_type, is_test_file, validate_properties, ValidationError};
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::{SourceType, Span};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SUPPORTED_EXTENSIONS: [&str; 2] = ["js", "ts"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedExtension,
    NoRuntimeData,
    TestFile,
    TypeMismatch(FileType),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedExtension => f.write_str("Unsupported file extension"),
            SkipReason::NoRuntimeData => f.write_str("Could not find runtime data NO_RUNTIME_DATA"),
            SkipReason::TestFile => f.write_str("Skipping test file"),
            SkipReason::TypeMismatch(file_type) => write!(
                f,
                "Type mismatch, expected type '{}' did not match type of file",
                file_type
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// At least one definition was replaced.
    Success,
    /// Definitions were found but none could be replaced.
    Failure,
    /// No definition was found.
    Unchanged,
    Skipped(SkipReason),
}

/// A definition that was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionFailure {
    pub span: Span,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
    pub transformed: usize,
    pub failures: Vec<DefinitionFailure>,
    /// Rewritten source, present when something changed.
    pub output: Option<String>,
}

impl FileReport {
    fn skipped(path: &Path, reason: SkipReason) -> Self {
        FileReport {
            path: path.to_path_buf(),
            outcome: FileOutcome::Skipped(reason),
            transformed: 0,
            failures: Vec::new(),
            output: None,
        }
    }

    /// Log lines describing the outcome.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        let path = self.path.display();
        let mut records = Vec::new();
        match &self.outcome {
            FileOutcome::Skipped(reason) => {
                records.push((LogLevel::Warn, format!("[{}]: SKIPPED {}", path, reason)))
            }
            FileOutcome::Success | FileOutcome::Failure | FileOutcome::Unchanged => {
                for failure in &self.failures {
                    let errors: Vec<String> = failure.errors.iter().map(|e| e.to_string()).collect();
                    records.push((
                        LogLevel::Warn,
                        format!(
                            "[{}]: FAILURE \nValidation errors: \n\t{}",
                            path,
                            errors.join("\n\t")
                        ),
                    ));
                }
                if self.outcome == FileOutcome::Success {
                    records.push((LogLevel::Info, format!("[{}]: SUCCESS", path)));
                }
            }
        }
        records
    }
}

/// Rewrites files using one set of options and one usage data source.
pub struct Transformer<'p> {
    options: Options,
    runtime_data: &'p dyn RuntimeDataProvider,
}

impl<'p> Transformer<'p> {
    pub fn new(options: Options, runtime_data: &'p dyn RuntimeDataProvider) -> Self {
        Transformer {
            options,
            runtime_data,
        }
    }

    /// Transform one file. `Err` means the file could not be processed at
    /// all; validation failures are part of the report.
    pub fn transform_file(&self, path: &Path, source: &str) -> Result<FileReport> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !SUPPORTED_EXTENSIONS.contains(&extension) {
            return Ok(FileReport::skipped(path, SkipReason::UnsupportedExtension));
        }
        let Some(runtime_data) = self.runtime_data.runtime_data_for(path) else {
            return Ok(FileReport::skipped(path, SkipReason::NoRuntimeData));
        };
        if is_test_file(path) {
            return Ok(FileReport::skipped(path, SkipReason::TestFile));
        }
        if let Some(file_type) = self.options.file_type {
            if !is_file_of_type(path, file_type) {
                return Ok(FileReport::skipped(path, SkipReason::TypeMismatch(file_type)));
            }
        }

        let allocator = Allocator::default();
        let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs());
        let ret = Parser::new(&allocator, source, source_type).parse();
        if ret.panicked || !ret.errors.is_empty() {
            let message = ret
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(TransformError::Parse {
                path: path.to_path_buf(),
                message,
            });
        }
        let program = ret.program;

        let imports = existing_imports(&program);
        let imported = ImportedDecorators::from_imports(&imports);
        let quasis = template_quasis(&program);
        let mut file = FileTransform {
            path,
            source,
            options: &self.options,
            runtime_data,
            imported: &imported,
            quasis: &quasis,
            edits: Vec::new(),
            failures: Vec::new(),
            transformed: 0,
            imports: DecoratorImports::empty(),
        };

        for_each_extend_call(&program, |call| file.transform_definition(call))?;

        let FileTransform {
            mut edits,
            failures,
            transformed,
            imports: flags,
            ..
        } = file;

        let outcome = if transformed > 0 {
            FileOutcome::Success
        } else if failures.is_empty() {
            FileOutcome::Unchanged
        } else {
            FileOutcome::Failure
        };

        let output = if transformed > 0 {
            edits.extend(import_edits(source, &imports, flags, self.options.quote));
            let output = apply_edits(source, &edits)?;
            self.check_output(path, &output, source_type)?;
            Some(output)
        } else {
            None
        };

        debug!(
            path = %path.display(),
            transformed,
            failed = failures.len(),
            "file processed"
        );

        Ok(FileReport {
            path: path.to_path_buf(),
            outcome,
            transformed,
            failures,
            output,
        })
    }

    fn check_output(&self, path: &Path, output: &str, source_type: SourceType) -> Result<()> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, output, source_type).parse();
        if !ret.panicked && ret.errors.is_empty() {
            return Ok(());
        }
        let message = ret
            .errors
            .first()
            .map_or_else(|| "parser panicked".to_string(), |e| e.to_string());
        Err(TransformError::OutputParse {
            path: path.to_path_buf(),
            message,
        })
    }
}

/// State of one file while its definitions are processed.
struct FileTransform<'f> {
    path: &'f Path,
    source: &'f str,
    options: &'f Options,
    runtime_data: &'f RuntimeData,
    imported: &'f ImportedDecorators,
    quasis: &'f [Span],
    edits: Vec<TextEdit>,
    failures: Vec<DefinitionFailure>,
    transformed: usize,
    /// Decorator imports needed by every class replaced so far.
    imports: DecoratorImports,
}

impl FileTransform<'_> {
    /// Validate and replace one definition. Returns whether it was replaced.
    fn transform_definition(&mut self, call: &ExtendCall<'_, '_>) -> Result<bool> {
        let ctx = AnalysisContext {
            source: self.source,
            runtime_data: self.runtime_data,
            imported: self.imported,
        };
        let object = match call.properties {
            Some(object) => analyze_properties(object, &ctx),
            None => AnalyzedObject::default(),
        };

        let mut errors = validate_properties(&object.properties, self.options);
        if call.chained_member.is_some() {
            errors.push(ValidationError::chained_definition());
        }
        if !errors.is_empty() {
            warn!(
                path = %self.path.display(),
                superclass = %call.superclass_name,
                errors = errors.len(),
                "definition left unchanged"
            );
            self.failures.push(DefinitionFailure {
                span: call.call.span,
                errors,
            });
            return Ok(false);
        }

        let name = class_name(
            call.binding.as_deref(),
            self.path,
            self.runtime_data.object_type(),
        );
        let mixins = call
            .mixins
            .iter()
            .map(|span| span_text(self.source, *span).to_string())
            .collect();
        let descriptor = ClassDescriptor::new(name, call.superclass_name.clone(), mixins, object);
        let built = build_class(
            &descriptor,
            &BuildContext {
                source: self.source,
                options: self.options,
                quasis: self.quasis,
            },
        )?;

        let target = &call.target;
        let indent = line_indent(self.source, target.span().start);
        let text = match target {
            ReplaceTarget::Statement { prefix, .. } => emit_class(&built.class, prefix, indent),
            ReplaceTarget::Expression { parenthesize, .. } => {
                let class = emit_class(&built.class, "", indent);
                if *parenthesize {
                    format!("({})", class)
                } else {
                    class
                }
            }
        };
        self.edits.push(TextEdit::new(target.span(), text));
        self.transformed += 1;
        self.imports |= built.imports;

        debug!(
            path = %self.path.display(),
            class = %descriptor.name,
            "definition replaced"
        );
        Ok(true)
    }
}
