//! Collector for accumulating diagnostics across extraction passes.
//!
//! Extraction never stops at the first bad line. Every pass reports into a
//! shared [`DiagnosticCollector`], which later feeds both the document's
//! line errors and the rich diagnostics handed to the CLI.

use crate::error::{Diagnostic, DiagnosticError};

/// A collector for accumulating diagnostics during extraction.
///
/// # Example
///
/// ```text
/// let mut collector = DiagnosticCollector::new();
///
/// collector.emit(
///     Diagnostic::error("missing component name")
///         .with_code(ErrorCode::E101)
///         .with_line(3)
/// );
/// collector.emit(Diagnostic::warning("unrecognized statement").with_line(9));
///
/// assert!(collector.has_errors());
/// let diagnostics = collector.into_diagnostics();
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` once any error severity diagnostic was emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Number of diagnostics emitted so far.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Borrow the diagnostics emitted so far, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the collector, keeping warnings and errors alike.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Finish collection and return a result.
    ///
    /// - If there are errors, returns `Err(DiagnosticError)` with all diagnostics.
    /// - If there are no errors, returns `Ok(())`.
    ///
    /// Warnings are discarded in the success case.
    pub fn finish(self) -> Result<(), DiagnosticError> {
        if self.has_errors {
            Err(DiagnosticError::new(self.diagnostics))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_collector_new_finish_ok() {
        let collector = DiagnosticCollector::new();
        assert!(!collector.has_errors());
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_emit_error_finish_err() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::error("missing name"));

        assert!(collector.has_errors());
        assert!(collector.finish().is_err());
    }

    #[test]
    fn test_collector_emit_warning_finish_ok() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::warning("unrecognized statement"));

        assert!(!collector.has_errors());
        assert_eq!(collector.len(), 1);
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_keeps_emission_order() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(
            Diagnostic::error("malformed coordinates")
                .with_code(ErrorCode::E100)
                .with_line(2)
                .with_label(Span::new(10..20), "here"),
        );
        collector.emit(Diagnostic::warning("ignored").with_line(5));

        let diagnostics = collector.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line(), Some(2));
        assert_eq!(diagnostics[1].line(), Some(5));
    }

    #[test]
    fn test_collector_finish_with_errors() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::error("first"));
        collector.emit(Diagnostic::warning("second"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.diagnostics()[0].message(), "first");
    }
}
