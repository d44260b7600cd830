//! # Wardley Parser
//!
//! Parser for the Wardley map language. The language is line oriented: one
//! statement per line, comments in `//` and `/* */` form, and `{ ... }`
//! bodies only under `pipeline`. This crate turns source text into a
//! [`wardley_core::document::Document`] and edits source text in place when
//! elements move.
//!
//! Parsing is tolerant. A malformed line contributes nothing to the document
//! and exactly one error to [`Document::errors`]; every other line still
//! counts.
//!
//! ## Usage
//!
//! ```
//! # use wardley_parser::parse;
//! let source = r#"
//!     title Tea Shop
//!     component Cup [0.73, 0.78]
//!     component Tea [0.63, 0.81]
//!     Cup->Tea
//! "#;
//!
//! let doc = parse(source);
//! assert_eq!(doc.title(), "Tea Shop");
//! assert_eq!(doc.elements().len(), 2);
//! assert_eq!(doc.links().len(), 1);
//! assert!(doc.errors().is_empty());
//! ```

pub mod error;
pub mod extract;
mod fields;
pub mod patch;
mod source;
mod span;

pub use error::{Diagnostic, DiagnosticError, ErrorCode};
pub use patch::{apply_position_edit, update_evolve_maturity, update_position};
pub use source::SourceLine;
pub use span::Span;

use log::info;

use wardley_core::document::Document;

use error::DiagnosticCollector;
use source::PreparedSource;

/// Parse source text into a document.
///
/// Never fails: problems are recorded in [`Document::errors`] as
/// `(line, message)` pairs sorted by line.
pub fn parse(source: &str) -> Document {
    parse_with_diagnostics(source).0
}

/// Parse source text, also returning the rich diagnostics.
///
/// The diagnostics carry error codes and byte spans into `source`, and
/// include warnings (unterminated comments, ignored lines)
/// that never appear in [`Document::errors`].
///
/// # Example
///
/// ```
/// # use wardley_parser::{parse_with_diagnostics, ErrorCode};
/// let (doc, diagnostics) = parse_with_diagnostics("component Cup [0.73]\ncomponent Tea [0.6, 0.8]");
///
/// assert_eq!(doc.elements().len(), 1);
/// assert_eq!(doc.errors()[0].line(), 1);
/// assert_eq!(diagnostics[0].code(), Some(ErrorCode::E100));
/// ```
pub fn parse_with_diagnostics(source: &str) -> (Document, Vec<Diagnostic>) {
    let mut diagnostics = DiagnosticCollector::new();
    let prepared = PreparedSource::prepare(source, &mut diagnostics);
    let doc = extract::extract(&prepared, &mut diagnostics);
    info!(
        elements = doc.elements().len(),
        links = doc.links().len(),
        errors = doc.errors().len(),
        diagnostics = diagnostics.len();
        "Parsed map"
    );
    (doc, diagnostics.into_diagnostics())
}

/// Parse source text, refusing documents with errors.
///
/// Warnings alone do not fail the parse.
///
/// # Errors
///
/// Returns a [`DiagnosticError`] holding every diagnostic when any line
/// produced an error.
pub fn parse_strict(source: &str) -> Result<Document, DiagnosticError> {
    let mut diagnostics = DiagnosticCollector::new();
    let prepared = PreparedSource::prepare(source, &mut diagnostics);
    let doc = extract::extract(&prepared, &mut diagnostics);
    diagnostics.finish()?;
    Ok(doc)
}
