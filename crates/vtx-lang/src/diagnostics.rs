use std::fmt;

use thiserror::Error;
use vtx_log::{error, warn};

/// A recoverable problem. The offending field, layout or declaration is dropped (or defaulted)
/// and processing continues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("failed to parse field line `{0}`")]
    MalformedField(String),
    #[error("field `{field}` defined multiple times in layout `{layout}`")]
    DuplicateField { layout: String, field: String },
    #[error("too many fields in layout `{layout}`, max is {max}")]
    TooManyFields { layout: String, max: usize },
    #[error("layout `{0}` has no fields")]
    EmptyLayout(String),
    #[error("layout `{0}` is never closed")]
    UnterminatedLayout(String),
    #[error("layout `{0}` never opens its body")]
    MissingLayoutBody(String),
    #[error("layout declaration is missing a name")]
    MissingLayoutName,
    #[error("layout `{0}` defined multiple times")]
    DuplicateLayout(String),
    #[error("too many layouts, max is {0}")]
    TooManyLayouts(usize),
    #[error("too many declarations, max is {0}")]
    TooManyDeclarations(usize),
    #[error("malformed declaration `{0}`")]
    MalformedDeclaration(String),
    #[error("unknown DSL type `{0}`, falling back to float4")]
    UnknownType(String),
    #[error("layout `{0}` not found for declaration")]
    UnknownLayout(String),
    #[error("declaration of `{0}` is not visible to the GPU, skipping shader generation for it")]
    NotGpuVisible(String),
    #[error("layout `{0}` is used as vertex input but none of its fields has a semantic")]
    NoSemantics(String),
    #[error("semantic `{semantic}{index}` used more than once in layout `{layout}`")]
    DuplicateSemantic {
        layout: String,
        semantic: String,
        index: u32,
    },
    #[error("binding `{0}` is not of the form `@b<digits>`, using register 0")]
    MalformedBinding(String),
    #[error("`{0}` emitted more than once")]
    DuplicateStageInput(&'static str),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 1-based source line, when the problem is tied to one.
    pub line: Option<usize>,
    pub kind: DiagnosticKind,
}

/// Ordered record of diagnostics. Every entry is also sent to the logger as it is pushed.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, line: Option<usize>, kind: DiagnosticKind) {
        self.push(Diagnostic {
            severity: Severity::Warning,
            line,
            kind,
        });
    }

    pub fn error(&mut self, line: Option<usize>, kind: DiagnosticKind) {
        self.push(Diagnostic {
            severity: Severity::Error,
            line,
            kind,
        });
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => warn!("{diagnostic}"),
            Severity::Error => error!("{diagnostic}"),
        }
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if any recorded diagnostic matches `pred`.
    pub fn any(&self, pred: impl FnMut(&DiagnosticKind) -> bool) -> bool {
        self.entries.iter().map(|d| &d.kind).any(pred)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
