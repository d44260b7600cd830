//! The DiagnosticError type for wrapping parsing diagnostics.
//!
//! Parsing itself never fails; [`DiagnosticError`] is what strict callers
//! get back when they refuse a document that produced errors.

use std::fmt;

use crate::error::Diagnostic;

/// Error type for strict parsing.
///
/// Wraps one or more diagnostics.
#[derive(Debug)]
pub struct DiagnosticError {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticError {
    /// Create a new error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for DiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for DiagnosticError {}

impl From<Diagnostic> for DiagnosticError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for DiagnosticError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_error_from_diagnostic() {
        let diag = Diagnostic::error("test error").with_code(ErrorCode::E100);
        let err: DiagnosticError = diag.into();

        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].message(), "test error");
    }

    #[test]
    fn test_error_display_single() {
        let err: DiagnosticError = Diagnostic::error("missing name").into();

        assert_eq!(err.to_string(), "error: missing name");
    }

    #[test]
    fn test_error_display_multiple() {
        let diags = vec![
            Diagnostic::error("first error"),
            Diagnostic::error("second error"),
            Diagnostic::error("third error"),
        ];
        let err: DiagnosticError = diags.into();

        assert_eq!(err.to_string(), "error: first error (+2 more)");
    }
}
