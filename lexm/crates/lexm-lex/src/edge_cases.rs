//! Edge case tests for lexm-lex
