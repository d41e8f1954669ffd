//! Error types for umlweld operations.
//!
//! [`WeldError`] wraps the error conditions of the whole pipeline. The
//! `Parse` variant keeps the source text alongside the structured
//! diagnostics so callers can produce rich reports with code snippets.

use std::io;

use thiserror::Error;

use umlweld_parser::error::ParseError;

use crate::diagnostics::RenderFailure;

/// The main error type for umlweld operations.
#[derive(Debug, Error)]
pub enum WeldError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("reconstruction failed: {0}")]
    Reconstruction(#[from] RenderFailure),

    #[error("configuration error: {0}")]
    Config(String),
}

impl WeldError {
    /// Create a `Parse` error carrying the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
