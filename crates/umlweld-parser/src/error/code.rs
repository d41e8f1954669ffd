//! Error codes for the umlweld diagnostic system.
//!
//! Codes are grouped by phase: `E0xx` for lexical problems, `E1xx` for
//! document-structure problems.

use std::fmt;

/// Stable identifiers for categorizing parser diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Unexpected character.
    ///
    /// A character that cannot start any recognized construct.
    E001,

    /// Unexpected token.
    ///
    /// Content appeared where the grammar allows none, e.g. text after
    /// the closing `@enduml` marker.
    E100,

    /// Missing `@startuml`.
    ///
    /// The document must open with a literal `@startuml` line.
    E101,

    /// Missing `@enduml`.
    ///
    /// The document ended before the closing `@enduml` marker.
    E102,

    /// Unrecognized declaration.
    ///
    /// A top-level line is not a class, enum, hide, or connection
    /// declaration.
    E103,

    /// Unterminated body block.
    ///
    /// A `{` body of a class or enum was never closed with `}`.
    E104,
}

impl ErrorCode {
    /// A short human-readable description of the code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unexpected character",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "missing `@startuml` marker",
            ErrorCode::E102 => "missing `@enduml` marker",
            ErrorCode::E103 => "unrecognized declaration",
            ErrorCode::E104 => "unterminated body block",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The enum variant name is the code itself.
        write!(f, "{self:?}")
    }
}
