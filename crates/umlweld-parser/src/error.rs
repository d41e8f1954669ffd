//! Error and diagnostic system for the umlweld parser.
//!
//! The system is built around [`Diagnostic`], a single error or warning with
//! an optional [`ErrorCode`], one or more labeled source spans, and optional
//! help text. Diagnostics accumulate in a [`DiagnosticCollector`] so the
//! parser can report every problem in one pass, and are wrapped in
//! [`ParseError`] when parsing fails.
//!
//! # Example
//!
//! ```
//! # use umlweld_parser::error::{Diagnostic, ErrorCode};
//! # use umlweld_parser::Span;
//! let diag = Diagnostic::error("unrecognized declaration")
//!     .with_code(ErrorCode::E103)
//!     .with_label(Span::new(12..30), "not a class, enum, hide, or connection")
//!     .with_help("declarations must start inside `@startuml`/`@enduml`");
//! ```

mod code;
mod diagnostic;

pub use code::ErrorCode;
pub use diagnostic::Diagnostic;
pub(crate) use diagnostic::DiagnosticCollector;

use std::fmt;

use thiserror::Error;

use crate::span::{Span, line_col};

/// The severity level of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A fatal problem; no diagram is produced when any error is collected.
    Error,
    /// An advisory problem that does not block parsing.
    Warning,
}

impl Severity {
    /// Returns `true` for [`Severity::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A labeled source span attached to a [`Diagnostic`].
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    primary: bool,
}

impl Label {
    /// A primary label marking the main location of the problem.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: true,
        }
    }

    /// A secondary label adding context at another location.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }
}

/// The flat `line`/`column`/`message` form of a parse failure.
///
/// This is the boundary representation handed to callers that do not work
/// with spans, e.g. editor integrations or plain-text reporting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    /// 1-based line of the primary label.
    pub line: usize,
    /// 1-based column of the primary label.
    pub column: usize,
    pub message: String,
}

/// Error type for the parsing lifecycle, wrapping one or more diagnostics.
///
/// Displays as the first diagnostic plus a count of the remaining ones.
#[derive(Debug, Error)]
#[error("{}", summarize(.diagnostics))]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => String::new(),
        [first] => first.to_string(),
        [first, rest @ ..] => format!("{first} (+{} more)", rest.len()),
    }
}

impl ParseError {
    /// Create a parse error from collected diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// All diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Flatten the diagnostics into [`SyntaxError`]s against `source`.
    ///
    /// Each diagnostic contributes one entry located at its first primary
    /// label (or `1:1` when it carries no label).
    pub fn to_syntax_errors(&self, source: &str) -> Vec<SyntaxError> {
        self.diagnostics
            .iter()
            .map(|diag| {
                let offset = diag
                    .labels()
                    .iter()
                    .find(|label| label.is_primary())
                    .map(|label| label.span().start())
                    .unwrap_or(0);
                let (line, column) = line_col(source, offset);
                SyntaxError {
                    line,
                    column,
                    message: diag.to_string(),
                }
            })
            .collect()
    }
}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}
