//! Export functionality for Wardley maps.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! writing a parsed map to an output format. It is the final stage in the
//! processing pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ parse
//! Document
//!     ↓ coordinate mapping
//! Surface positions
//!     ↓ export (this module)
//! Output File
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`WardleyError::Export`] at the crate
//! boundary.
//!
//! [`WardleyError::Export`]: crate::WardleyError::Export

/// SVG export backend.
pub mod svg;

use wardley_core::document::Document;

/// Abstraction for map export backends.
pub trait Exporter {
    /// Exports a parsed map to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the map cannot be converted to the target
    /// format, or [`Error::Io`] if writing the output fails.
    fn export_document(&mut self, doc: &Document) -> Result<(), Error>;
}

/// Errors that can occur during map export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
