//! Error and diagnostic system for the Wardley parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labeled spans pointing into the original source
//! - Severity levels
//! - Diagnostic collector for accumulating problems across passes
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with an optional error code, the source
//! line it belongs to, labeled source locations, and help text. Extraction
//! never fails; error diagnostics are mirrored into the document's line
//! errors, and strict callers wrap them in a [`DiagnosticError`].
//!
//! # Example
//!
//! ```
//! # use wardley_parser::error::{Diagnostic, ErrorCode};
//! # use wardley_parser::Span;
//!
//! let line = Span::new(40..66);
//! let bracket = Span::new(57..66);
//!
//! let diag = Diagnostic::error("malformed coordinates for component `Kettle`")
//!     .with_code(ErrorCode::E100)
//!     .with_line(3)
//!     .with_label(bracket, "expected `[<visibility>, <maturity>]`")
//!     .with_secondary_label(line, "statement skipped")
//!     .with_help("coordinates are two decimals between 0 and 1");
//! assert!(diag.severity().is_error());
//! ```

mod collector;
mod diagnostic;
mod diagnostic_error;
mod error_code;
mod label;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use diagnostic_error::DiagnosticError;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
