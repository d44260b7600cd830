//! The core diagnostic type for the Wardley error system.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, the source line it refers to, labeled source spans, and help
//! text.

use std::fmt;

use wardley_core::document::ParseError;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    span::Span,
};

/// A rich diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E100]: malformed coordinates for component `Kettle`
///   --> tea.owm:4:1
///    |
///  4 | component Kettle [0.43, oops]
///    | ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ expected `[<visibility>, <maturity>]`
///    |
///    = help: coordinates are two decimals between 0 and 1
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    line: Option<usize>,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use wardley_parser::error::{Diagnostic, ErrorCode};
    /// # use wardley_parser::Span;
    ///
    /// let diag = Diagnostic::error("missing component name")
    ///     .with_code(ErrorCode::E101)
    ///     .with_line(3)
    ///     .with_label(Span::new(20..29), "here")
    ///     .with_help("write `component <name> [<visibility>, <maturity>]`");
    /// assert_eq!(diag.line(), Some(3));
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the 1-based source line, if any.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the source line.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Rebases every label by `offset` bytes.
    ///
    /// Line passes report spans relative to the statement text; the
    /// extractor shifts them onto the original source.
    pub(crate) fn shifted(mut self, offset: usize) -> Self {
        self.labels = self
            .labels
            .into_iter()
            .map(|label| label.shifted(offset))
            .collect();
        self
    }

    /// Converts an error diagnostic into the document's line error.
    ///
    /// Returns `None` for warnings and for diagnostics without a line.
    pub fn to_parse_error(&self) -> Option<ParseError> {
        if !self.severity.is_error() {
            return None;
        }
        self.line.map(|line| ParseError::new(line, self.message.clone()))
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            line: None,
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E100]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.line().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_with_label() {
        let diag = Diagnostic::error("test error").with_label(Span::new(10..20), "error here");

        assert_eq!(diag.labels().len(), 1);
        assert!(diag.labels()[0].is_primary());
        assert_eq!(diag.labels()[0].message(), "error here");
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::error("malformed link `->B`").with_code(ErrorCode::E102);

        assert_eq!(diag.to_string(), "error[E102]: malformed link `->B`");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::warning("unrecognized statement");

        assert_eq!(diag.to_string(), "warning: unrecognized statement");
    }

    #[test]
    fn test_shifted_moves_labels() {
        let diag = Diagnostic::error("bad")
            .with_label(Span::new(3..7), "here")
            .with_secondary_label(Span::new(0..2), "and here")
            .shifted(100);

        assert_eq!(diag.labels()[0].span(), Span::new(103..107));
        assert_eq!(diag.labels()[1].span(), Span::new(100..102));
    }

    #[test]
    fn test_to_parse_error() {
        let diag = Diagnostic::error("missing name").with_line(4);
        let err = diag.to_parse_error().expect("error with a line");

        assert_eq!(err.line(), 4);
        assert_eq!(err.message(), "missing name");
    }

    #[test]
    fn test_warning_is_not_a_parse_error() {
        let diag = Diagnostic::warning("ignored").with_line(2);
        assert!(diag.to_parse_error().is_none());
    }
}
