//! Fluent diagnostic construction.

use super::{Diagnostic, DiagnosticCode, Handler, Level};
use crate::Span;

/// Builder for [`Diagnostic`]
///
/// # Examples
///
/// ```
/// use lexm_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Level};
/// use lexm_util::Span;
///
/// let diag = DiagnosticBuilder::error("lexeme rejected")
///     .code(DiagnosticCode::E_REJECTED_LEXEME)
///     .span(Span::new(0, 3, 1, 1))
///     .note("expected a number")
///     .build();
///
/// assert_eq!(diag.level, Level::Error);
/// assert_eq!(diag.notes.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    /// Start a diagnostic at the given level
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            diagnostic: Diagnostic::new(level, message, Span::DUMMY),
        }
    }

    /// Start an error
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    /// Start a warning
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    /// Set the code
    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.diagnostic.code = Some(code);
        self
    }

    /// Set the span
    pub fn span(mut self, span: Span) -> Self {
        self.diagnostic.span = span;
        self
    }

    /// Add a note
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.diagnostic.notes.push(note.into());
        self
    }

    /// Finish building
    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }

    /// Finish building and hand the diagnostic to `handler`
    pub fn emit(self, handler: &Handler) {
        handler.emit_diagnostic(self.diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let diag = DiagnosticBuilder::warning("w").build();
        assert_eq!(diag.level, Level::Warning);
        assert_eq!(diag.span, Span::DUMMY);
        assert!(diag.code.is_none());
    }

    #[test]
    fn test_builder_emit() {
        let handler = Handler::new();
        DiagnosticBuilder::error("bad")
            .span(Span::new(1, 2, 1, 2))
            .emit(&handler);
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.diagnostics()[0].span.start, 1);
    }
}
