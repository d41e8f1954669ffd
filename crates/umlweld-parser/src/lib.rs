//! # Umlweld Parser
//!
//! Parser for the PlantUML class-diagram dialect used by umlweld. This crate
//! turns source text into the in-memory [`Diagram`] model consumed by the
//! rendering strategies in the `umlweld` crate.
//!
//! ## Usage
//!
//! ```
//! # use umlweld_parser::{parse, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let source = "@startuml\n\
//!                   class User {\n\
//!                   \x20 + string name\n\
//!                   }\n\
//!                   @enduml\n";
//!
//!     let diagram = parse(source)?;
//!     assert_eq!(diagram.classes.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Error model
//!
//! Document-structure problems (missing markers, unrecognized declarations,
//! unterminated blocks) are collected as [`error::Diagnostic`]s across the
//! whole pass and returned together in an [`error::ParseError`]; no diagram
//! is produced when any error was collected. A malformed *member* line
//! inside an otherwise valid class body is not a parse error: it is kept
//! verbatim in the model and classified at render time by the configured
//! reconstruction mode.

pub mod error;

mod parser;
#[cfg(test)]
mod parser_tests;
mod span;

pub use span::{Span, line_col};

use log::trace;

use umlweld_core::model::Diagram;

use crate::error::ParseError;

/// Parse class-diagram source text into a [`Diagram`].
///
/// The input is expected to use `\n` line endings; callers that accept raw
/// files should run `umlweld_core::normalize::normalize` first. Repeated
/// declarations are preserved as-is; merging them is a rendering concern.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every collected diagnostic when the
/// document structure is invalid.
pub fn parse(source: &str) -> Result<Diagram, ParseError> {
    trace!(bytes = source.len(); "Parsing class-diagram source");
    parser::parse_document(source)
}
