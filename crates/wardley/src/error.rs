//! Error types for Wardley map operations.
//!
//! This module provides the main error type [`WardleyError`] which wraps
//! the error conditions that can occur while loading, rendering, editing and
//! watching maps. Parsing itself never fails; only strict callers see
//! [`WardleyError::Parse`].

use std::io;

use thiserror::Error;

use wardley_core::geometry::SurfaceError;
use wardley_parser::DiagnosticError;

/// The main error type for Wardley operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the rich diagnostics together with the source
/// they point into, so callers can render labelled reports.
#[derive(Debug, Error)]
pub enum WardleyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: DiagnosticError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("No statement declares a position for `{0}`")]
    UnknownElement(String),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for WardleyError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl WardleyError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: DiagnosticError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
