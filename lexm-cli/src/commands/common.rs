//! Common types and utilities for lexm commands.

use std::io::Write;
use std::sync::Arc;

use clap::ValueEnum;
use lexm_lex::token::keyname::KeynameToken;
use lexm_lex::token::literal::CharToken;
use lexm_lex::token::numeric::NumericToken;
use lexm_lex::{
    token_ref, CharCategory, Lexeme, NumericConfig, TokenRef, TokenSet, Value, ValueKind,
};
use serde::Serialize;

use crate::error::Result;

// ============================================================================
// Output Format
// ============================================================================

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One human readable line per item
    #[default]
    Text,
    /// A pretty-printed JSON array
    Json,
}

// ============================================================================
// Tokens
// ============================================================================

/// Numeric token built from the configured separators.
pub fn numeric_token(config: &NumericConfig) -> Result<Arc<NumericToken>> {
    Ok(Arc::new(NumericToken::with_config(config.clone())?))
}

/// Names, numbers and one token per ASCII symbol.
///
/// Symbols the numeric configuration uses as separators are left out, so
/// they only ever appear inside literals.
pub fn statement_tokens(config: &NumericConfig) -> Result<TokenSet> {
    let numeric: TokenRef = numeric_token(config)?;
    let mut set = TokenSet::new([token_ref(KeynameToken), numeric]);
    for c in CharCategory::Symbol.chars() {
        if c != config.separator && c != config.fraction {
            set.push(token_ref(CharToken::new(c)));
        }
    }
    Ok(set)
}

// ============================================================================
// Records
// ============================================================================

/// One numeric literal as reported by `extract` and `generate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiteralRecord {
    /// The literal text
    pub text: String,
    /// Whether the numeric token accepts the text
    pub valid: bool,
    /// Decoded type
    #[serde(rename = "type")]
    pub kind: Option<ValueKind>,
    /// Decoded value
    pub value: Option<Value>,
}

impl LiteralRecord {
    /// Record for a lexeme produced by the numeric token.
    pub fn from_lexeme(lexeme: &Lexeme) -> Self {
        Self {
            text: lexeme.text.clone(),
            valid: lexeme.is_recognized(),
            kind: lexeme.value.map(|v| v.kind()),
            value: lexeme.value,
        }
    }

    /// Tab separated line: text, type and value.
    pub fn to_line(&self) -> String {
        match (&self.kind, &self.value) {
            (Some(kind), Some(value)) => format!("{}\t{}\t{}", self.text, kind, value),
            _ => format!("{}\tinvalid", self.text),
        }
    }
}

/// Print `records` in `format`.
pub fn write_records(
    out: &mut dyn Write,
    format: OutputFormat,
    records: &[LiteralRecord],
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for record in records {
                writeln!(out, "{}", record.to_line())?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, records)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexm_lex::{extract, Scanner};

    #[test]
    fn test_statement_tokens_skip_separators() {
        let set = statement_tokens(&NumericConfig::default()).unwrap();
        let names: Vec<_> = set.tokens().iter().map(|t| t.token_name()).collect();
        assert!(names.contains(&"';'"));
        assert!(!names.contains(&"'''"));
        assert!(!names.contains(&"'.'"));
    }

    #[test]
    fn test_statement_tokens_scan_literals() {
        let set = statement_tokens(&NumericConfig::default()).unwrap();
        let lexemes = Scanner::new(&set).scan("a = 1'000.5;");
        let texts: Vec<_> = lexemes.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["a", "=", "1'000.5", ";"]);
    }

    #[test]
    fn test_record_lines() {
        let token = numeric_token(&NumericConfig::default()).unwrap();
        let record = LiteralRecord::from_lexeme(&extract(&token, "0x10u"));
        assert_eq!(record.to_line(), "0x10u\tu8\t16");
        let record = LiteralRecord::from_lexeme(&extract(&token, "-."));
        assert_eq!(record.to_line(), "-.\tinvalid");
    }

    #[test]
    fn test_json_records() {
        let token = numeric_token(&NumericConfig::default()).unwrap();
        let records = [LiteralRecord::from_lexeme(&extract(&token, "7"))];
        let mut out = Vec::new();
        write_records(&mut out, OutputFormat::Json, &records).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["type"], "i8");
        assert_eq!(json[0]["value"]["value"], 7);
        assert_eq!(json[0]["valid"], true);
    }
}
