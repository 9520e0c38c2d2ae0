//! Diagnostic module - Warning and error reporting.
//!
//! The tokenizer never fails on bad input; it produces unrecognized
//! lexemes instead. Drivers that want those surfaced to a user route them
//! through a [`Handler`] as diagnostics.
//!
//! # Examples
//!
//! ```
//! use lexm_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Handler};
//! use lexm_util::Span;
//!
//! let handler = Handler::new();
//! DiagnosticBuilder::warning("unrecognized input `@`")
//!     .code(DiagnosticCode::W_UNRECOGNIZED_INPUT)
//!     .span(Span::new(3, 4, 1, 4))
//!     .emit(&handler);
//!
//! assert_eq!(handler.warning_count(), 1);
//! assert!(!handler.has_errors());
//! ```

mod builder;
mod codes;

pub use builder::DiagnosticBuilder;
pub use codes::DiagnosticCode;

use crate::Span;
use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Something the caller must act on
    Error,
    /// Suspicious input that did not stop processing
    Warning,
    /// Additional information
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with severity and location
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Diagnostic severity level
    pub level: Level,
    /// Main diagnostic message
    pub message: String,
    /// Source location
    pub span: Span,
    /// Optional diagnostic code
    pub code: Option<DiagnosticCode>,
    /// Additional notes for context
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            code: None,
            notes: Vec::new(),
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }

    /// Attach a code
    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}[{}]: {}", self.level, code, self.message)?,
            None => write!(f, "{}: {}", self.level, self.message)?,
        }
        write!(f, "\n  --> {}", self.span)?;
        for note in &self.notes {
            write!(f, "\n  = note: {}", note)?;
        }
        Ok(())
    }
}

/// Collects diagnostics emitted while processing a source
///
/// Uses interior mutability so a shared reference can be threaded through
/// a driver without borrowing it mutably.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create new handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an error
    pub fn error(&self, message: impl Into<String>, span: Span) {
        self.emit_diagnostic(Diagnostic::error(message, span));
    }

    /// Report a warning
    pub fn warning(&self, message: impl Into<String>, span: Span) {
        self.emit_diagnostic(Diagnostic::warning(message, span));
    }

    /// Record a fully built diagnostic
    pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Returns true if any error has been reported
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Get the number of errors
    pub fn error_count(&self) -> usize {
        self.count(Level::Error)
    }

    /// Get the number of warnings
    pub fn warning_count(&self) -> usize {
        self.count(Level::Warning)
    }

    /// Get a copy of all diagnostics
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drain all diagnostics, leaving the handler empty
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    fn count(&self, level: Level) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == level)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Error.to_string(), "error");
        assert_eq!(Level::Warning.to_string(), "warning");
        assert_eq!(Level::Note.to_string(), "note");
    }

    #[test]
    fn test_handler_counts() {
        let handler = Handler::new();
        handler.warning("first", Span::DUMMY);
        handler.warning("second", Span::DUMMY);
        handler.error("third", Span::DUMMY);

        assert!(handler.has_errors());
        assert_eq!(handler.warning_count(), 2);
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn test_handler_take_empties() {
        let handler = Handler::new();
        handler.warning("only", Span::DUMMY);
        let taken = handler.take();
        assert_eq!(taken.len(), 1);
        assert!(handler.diagnostics().is_empty());
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::warning("unrecognized input `#`", Span::new(4, 5, 2, 1))
            .with_code(DiagnosticCode::W_UNRECOGNIZED_INPUT)
            .with_note("no token accepts this character");
        let rendered = diag.to_string();
        assert!(rendered.starts_with("warning[W0101]: unrecognized input `#`"));
        assert!(rendered.contains("--> 2:1"));
        assert!(rendered.contains("= note: no token accepts this character"));
    }
}
