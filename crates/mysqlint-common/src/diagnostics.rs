//! Diagnostic types shared by the parser, binder, and analyzer.

use serde::Serialize;

use crate::span::Span;

/// Diagnostic severity, in host-compiler terms: an `Error` blocks a
/// successful build, everything else is advisory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Hint,
    Info,
}

/// A coded finding attached to a source span. Immutable once created.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub span: Span,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: DiagnosticSeverity,
        span: Span,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
            span,
        }
    }

    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self::new(code, message, DiagnosticSeverity::Error, span)
    }

    /// Create a new hint diagnostic.
    #[must_use]
    pub fn hint(code: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self::new(code, message, DiagnosticSeverity::Hint, span)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        let err = Diagnostic::error("X_001", "boom", Span::new(0, 1));
        let hint = Diagnostic::hint("X_002", "fyi", Span::new(0, 1));
        assert!(err.is_error());
        assert!(!hint.is_error());
    }
}
