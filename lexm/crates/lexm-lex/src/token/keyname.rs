//! Identifier token.

use super::{GlobalState, Token, TokenGenerator};
use crate::charset::{is_ascii_ident_continue, is_ascii_ident_start};
use crate::value::Value;
use rand::{Rng, RngCore};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Matches `[_a-zA-Z][_a-zA-Z0-9]*`, excluding reserved words.
///
/// # Example
///
/// ```
/// use lexm_lex::micro::extract_with;
/// use lexm_lex::token::keyname::KeynameToken;
/// use lexm_lex::token::GlobalState;
/// use lexm_lex::charset::Encoding;
/// use std::sync::Arc;
///
/// let token = Arc::new(KeynameToken);
/// let global = GlobalState::with_reserved(["if"]);
/// assert!(extract_with(&token, "iffy", Some(&global), Encoding::Utf8).is_recognized());
///
/// // a reserved word only matches up to its longest valid prefix
/// let lexeme = extract_with(&token, "if", Some(&global), Encoding::Utf8);
/// assert_eq!(lexeme.text, "i");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KeynameToken;

/// Match state of [`KeynameToken`]: the reserved words in effect.
#[derive(Debug, Clone, Default)]
pub struct KeynameState {
    reserved: Option<Arc<FxHashSet<String>>>,
}

impl Token for KeynameToken {
    type State = KeynameState;

    fn name(&self) -> &str {
        "keyname"
    }

    fn fresh_state(&self, global: Option<&GlobalState>) -> KeynameState {
        KeynameState {
            reserved: global.map(|g| Arc::clone(g.reserved())),
        }
    }

    fn advance(&self, _state: &mut KeynameState, _text: &str, c: char, pos: usize) -> bool {
        if pos == 0 {
            is_ascii_ident_start(c)
        } else {
            is_ascii_ident_continue(c)
        }
    }

    fn is_valid(&self, state: &KeynameState, text: &str) -> bool {
        !text.is_empty()
            && !state
                .reserved
                .as_ref()
                .is_some_and(|words| words.contains(text))
    }

    fn decode(&self, _state: &KeynameState, _text: &str) -> Option<Value> {
        None
    }
}

const LETTERS: u32 = 26;

impl TokenGenerator for KeynameToken {
    fn generate(
        &self,
        _state: &mut KeynameState,
        _text: &str,
        pos: usize,
        rng: &mut dyn RngCore,
    ) -> Option<char> {
        let span = 1 + 2 * LETTERS + if pos > 0 { 10 } else { 0 };
        let mut v = rng.gen_range(0..span);
        if v == 0 {
            return Some('_');
        }
        v -= 1;
        let c = if v < LETTERS {
            b'a' + v as u8
        } else if v < 2 * LETTERS {
            b'A' + (v - LETTERS) as u8
        } else {
            b'0' + (v - 2 * LETTERS) as u8
        };
        Some(char::from(c))
    }
}
