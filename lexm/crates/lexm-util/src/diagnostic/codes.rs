//! Diagnostic codes.
//!
//! Codes follow the format `{prefix}{number:04}`, `E` for errors and `W`
//! for warnings.

use std::fmt;

/// A unique code identifying a diagnostic message
///
/// # Examples
///
/// ```
/// use lexm_util::diagnostic::DiagnosticCode;
///
/// let code = DiagnosticCode::new("W", 101);
/// assert_eq!(code.as_str(), "W0101");
/// assert_eq!(code, DiagnosticCode::W_UNRECOGNIZED_INPUT);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    prefix: &'static str,
    number: u32,
}

impl DiagnosticCode {
    /// Create a new diagnostic code
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the prefix
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Get the numeric identifier
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Format as `W0101`
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    /// Input that no live token accepted
    pub const W_UNRECOGNIZED_INPUT: Self = Self::new("W", 101);
    /// A lexeme the active syntax rejected
    pub const E_REJECTED_LEXEME: Self = Self::new("E", 201);
    /// A generated literal that did not read back to itself
    pub const E_ROUND_TRIP: Self = Self::new("E", 301);
}

impl fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_pads() {
        assert_eq!(DiagnosticCode::new("E", 1).as_str(), "E0001");
        assert_eq!(DiagnosticCode::new("W", 4001).as_str(), "W4001");
    }

    #[test]
    fn test_debug() {
        let code = DiagnosticCode::new("E", 201);
        assert_eq!(format!("{:?}", code), "DiagnosticCode(E0201)");
    }

    #[test]
    fn test_predefined_codes() {
        assert_eq!(DiagnosticCode::W_UNRECOGNIZED_INPUT.prefix(), "W");
        assert_eq!(DiagnosticCode::E_REJECTED_LEXEME.number(), 201);
        assert_eq!(DiagnosticCode::E_ROUND_TRIP.to_string(), "E0301");
    }
}
