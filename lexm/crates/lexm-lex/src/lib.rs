//! lexm-lex - Grammar-agnostic tokenization engine
//!
//! This crate turns a stream of code units into lexemes using any set of
//! pluggable token recognizers. It knows nothing about a particular
//! language: a grammar supplies the tokens that are live at each point and
//! picks among the competing matches the tokenizer reports.
//!
//! # Overview
//!
//! Every registered token is started on each character that could begin a
//! lexeme. All of them run side by side and the tokenizer reports every
//! lexeme that ended, longest first, so a caller can apply longest-match or
//! its own choice. Characters can be trimmed, ignored, disallowed or made to
//! terminate matches through a per-category policy table.
//!
//! # Example Usage
//!
//! ```
//! use lexm_lex::syntax::{Scanner, TokenSet};
//! use lexm_lex::token::{keyname::KeynameToken, literal::CharToken, numeric::NumericToken, token_ref};
//! use lexm_lex::Value;
//!
//! let syntax = TokenSet::new([
//!     token_ref(KeynameToken),
//!     token_ref(NumericToken::default()),
//!     token_ref(CharToken::new('=')),
//! ]);
//! let lexemes = Scanner::new(&syntax).scan("width = 0x10");
//!
//! assert_eq!(lexemes.len(), 3);
//! assert_eq!(lexemes[2].value, Some(Value::I8(16)));
//! ```
//!
//! # Module Structure
//!
//! - [`token`] - The token contract, the state machine base and the stock tokens
//! - [`tokenizer`] - The streaming multi-candidate tokenizer
//! - [`syntax`] - Grammar-driven scanning over a tokenizer
//! - [`micro`] - Single-token extraction and generation
//! - [`lexeme`] - Finalized lexemes
//! - [`value`] - Decoded numeric values
//! - [`charset`] - Character categories and code unit encodings
//! - [`config`] - `lexm.toml` configuration
//! - [`error`] - Configuration and scan errors
//!
//! # Stock Tokens
//!
//! - **Numeric**: `42`, `0x1F`, `-0b''11`, `077ul`, `1.5e-3d`
//! - **Keyname**: `[a-zA-Z_][a-zA-Z0-9_]*` minus the reserved words
//! - **Char** and **String**: fixed punctuation and keywords

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod charset;
pub mod config;
pub mod error;
pub mod lexeme;
pub mod micro;
pub mod syntax;
pub mod token;
pub mod tokenizer;
pub mod value;

mod edge_cases;

// Re-export main types for convenience
pub use charset::{CharCategory, Encoding};
pub use config::{FloatWidth, LexConfig, NumericConfig, PolicyRule, TokenizerConfig, CONFIG_FILE};
pub use error::{ConfigError, Result, ScanError};
pub use lexeme::Lexeme;
pub use micro::{extract, extract_with, generate};
pub use syntax::{validate_stream, Scanner, Syntax, TokenSet};
pub use token::{
    same_token, token_ref, Candidate, DynToken, GlobalState, Token, TokenGenerator, TokenRef,
};
pub use tokenizer::{CharPolicy, Mode, PolicyFlag, PolicyTable, Select, Tokenizer};
pub use value::{Value, ValueKind};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::keyname::KeynameToken;
    use crate::token::literal::{CharToken, StringToken};
    use crate::token::numeric::NumericToken;

    fn statement_tokens() -> TokenSet {
        let mut set = TokenSet::new([
            token_ref(KeynameToken),
            token_ref(NumericToken::default()),
        ]);
        for c in "=+-*/;(){}".chars() {
            set.push(token_ref(CharToken::new(c)));
        }
        set
    }

    fn scan_all(source: &str) -> Vec<Lexeme> {
        Scanner::new(&statement_tokens()).scan(source)
    }

    fn texts(lexemes: &[Lexeme]) -> Vec<&str> {
        lexemes.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_assignment_statement() {
        let lexemes = scan_all("let total = 0x1F + 3.5;");
        assert_eq!(texts(&lexemes), ["let", "total", "=", "0x1F", "+", "3.5", ";"]);
        assert_eq!(lexemes[3].value, Some(Value::I8(31)));
        assert_eq!(lexemes[5].value, Some(Value::F32(3.5)));
        assert_eq!(lexemes[4].token_name(), Some("'+'"));
        assert!(lexemes.iter().all(Lexeme::is_recognized));
    }

    #[test]
    fn test_signed_literal_beats_operator() {
        let lexemes = scan_all("x=-5");
        assert_eq!(texts(&lexemes), ["x", "=", "-5"]);
        assert_eq!(lexemes[2].value, Some(Value::I8(-5)));
    }

    #[test]
    fn test_block_over_lines() {
        let source = "loop {\n    n = n - 1;\n}\n";
        let lexemes = scan_all(source);
        assert_eq!(
            texts(&lexemes),
            ["loop", "{", "n", "=", "n", "-", "1", ";", "}"]
        );
        let positions: Vec<_> = lexemes.iter().map(|l| (l.line, l.line_offset)).collect();
        assert_eq!(
            positions,
            [
                (1, 0),
                (1, 5),
                (2, 4),
                (2, 6),
                (2, 8),
                (2, 10),
                (2, 12),
                (2, 13),
                (3, 0)
            ]
        );
    }

    #[test]
    fn test_reserved_words_fall_to_keywords() {
        let keyword = token_ref(StringToken::new("let"));
        let syntax = TokenSet::new([token_ref(KeynameToken), keyword.clone()]);
        let mut scanner = Scanner::new(&syntax);
        scanner
            .tokenizer_mut()
            .set_global(Some(GlobalState::with_reserved(["let"])));

        let lexemes = scanner.scan("let lettuce");
        assert_eq!(texts(&lexemes), ["let", "lettuce"]);
        assert!(lexemes[0].is_from(&keyword));
        assert_eq!(lexemes[1].token_name(), Some("keyname"));
    }

    #[test]
    fn test_config_drives_numbers() {
        let config = LexConfig::from_toml_str(
            r#"
            [numeric]
            separator = "_"
            fraction = ","
            default-float = "f64"
            "#,
        )
        .unwrap();
        let token = std::sync::Arc::new(NumericToken::with_config(config.numeric).unwrap());
        assert_eq!(extract(&token, "1_000").value, Some(Value::I16(1000)));
        assert_eq!(extract(&token, "2,5").value, Some(Value::F64(2.5)));
    }

    #[test]
    fn test_unrecognized_input_is_kept() {
        let lexemes = scan_all("a # b");
        assert_eq!(texts(&lexemes), ["a", "#", "b"]);
        assert!(!lexemes[1].is_recognized());
        assert_eq!(lexemes[1].start, 2);
    }

    #[test]
    fn test_empty_source() {
        assert!(scan_all("").is_empty());
        assert!(scan_all(" \n\t ").is_empty());
    }
}
