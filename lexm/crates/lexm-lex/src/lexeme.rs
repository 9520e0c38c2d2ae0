//! Matched and unmatched source spans.

use crate::token::{same_token, TokenRef};
use crate::value::Value;
use lexm_util::Span;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

/// A finalized span of source.
///
/// If `token` is set, `text` satisfied that token's validity check and
/// `value` holds what it decoded to. Without a token the lexeme is an
/// unrecognized snippet. Offsets are source code units, `end` exclusive.
#[derive(Clone)]
pub struct Lexeme {
    /// Offset of the first unit
    pub start: usize,
    /// Offset one past the last unit
    pub end: usize,
    /// Line the lexeme starts on
    pub line: u32,
    /// Offset of `start` from the beginning of its line
    pub line_offset: usize,
    /// The characters as the token saw them
    pub text: String,
    /// Decoded value, if the token produces one
    pub value: Option<Value>,
    /// The token that recognized this lexeme
    pub token: Option<TokenRef>,
}

impl Lexeme {
    /// A lexeme produced by `token`.
    pub fn recognized(
        token: TokenRef,
        start: usize,
        end: usize,
        line: u32,
        line_offset: usize,
        text: impl Into<String>,
        value: Option<Value>,
    ) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
            line,
            line_offset,
            text: text.into(),
            value,
            token: Some(token),
        }
    }

    /// A snippet no token accepted.
    pub fn unrecognized(
        start: usize,
        end: usize,
        line: u32,
        line_offset: usize,
        text: impl Into<String>,
    ) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
            line,
            line_offset,
            text: text.into(),
            value: None,
            token: None,
        }
    }

    /// Whether a token produced this lexeme.
    #[inline]
    pub fn is_recognized(&self) -> bool {
        self.token.is_some()
    }

    /// Name of the producing token.
    pub fn token_name(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.token_name())
    }

    /// Whether `token` produced this lexeme.
    pub fn is_from(&self, token: &TokenRef) -> bool {
        self.token.as_ref().is_some_and(|t| same_token(t, token))
    }

    /// Source span, with a 1-based column.
    pub fn span(&self) -> Span {
        Span::at_line_offset(self.start, self.end, self.line, self.line_offset)
    }

    /// Length in source code units.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the lexeme covers no source.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl PartialEq for Lexeme {
    fn eq(&self, other: &Self) -> bool {
        let same_token = match (&self.token, &other.token) {
            (Some(a), Some(b)) => same_token(a, b),
            (None, None) => true,
            _ => false,
        };
        same_token
            && self.start == other.start
            && self.end == other.end
            && self.line == other.line
            && self.line_offset == other.line_offset
            && self.text == other.text
            && self.value == other.value
    }
}

impl fmt::Debug for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexeme")
            .field("token", &self.token_name())
            .field("range", &(self.start..self.end))
            .field("line", &self.line)
            .field("line_offset", &self.line_offset)
            .field("text", &self.text)
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.token_name().unwrap_or("<unrecognized>");
        write!(f, "{} {:?} @ {}", name, self.text, self.span())?;
        if let Some(value) = &self.value {
            write!(f, " = {} ({})", value, value.kind())?;
        }
        Ok(())
    }
}

impl Serialize for Lexeme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Lexeme", 6)?;
        s.serialize_field("token", &self.token_name())?;
        s.serialize_field("start", &self.start)?;
        s.serialize_field("end", &self.end)?;
        s.serialize_field("line", &self.line)?;
        s.serialize_field("column", &(self.line_offset + 1))?;
        s.serialize_field("text", &self.text)?;
        s.serialize_field("value", &self.value)?;
        s.end()
    }
}
