//! Single-token helpers.
//!
//! [`extract`] runs one token over a whole string without a tokenizer, and
//! [`generate`] asks a token to produce a random lexeme. Together they form
//! the round-trip oracle used by the property tests.

use crate::charset::{to_ascii, Encoding};
use crate::lexeme::Lexeme;
use crate::token::{GlobalState, Token, TokenGenerator, TokenRef};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Upper bound on generated lexeme length.
pub const MAX_GENERATED: usize = 256;

/// Run `token` over `source` as UTF-8 without global state.
pub fn extract<T: Token + 'static>(token: &Arc<T>, source: &str) -> Lexeme {
    extract_with(token, source, None, Encoding::Utf8)
}

/// Run `token` over `source`.
///
/// Returns the whole of `source` if the token accepts it, otherwise the
/// longest valid prefix. If no prefix is valid the result is unrecognized
/// and covers the characters the token did consume. Offsets count units of
/// `encoding`.
///
/// # Example
///
/// ```
/// use lexm_lex::micro::extract;
/// use lexm_lex::token::numeric::NumericToken;
/// use std::sync::Arc;
///
/// let token = Arc::new(NumericToken::default());
/// let lexeme = extract(&token, "42u;");
/// assert_eq!(lexeme.text, "42u");
/// assert_eq!(lexeme.end, 3);
/// ```
pub fn extract_with<T: Token + 'static>(
    token: &Arc<T>,
    source: &str,
    global: Option<&GlobalState>,
    encoding: Encoding,
) -> Lexeme {
    let mut state = token.fresh_state(global);
    let mut text = String::new();
    let mut end = 0;
    let mut best = token
        .is_valid(&state, &text)
        .then(|| (0, 0, state.clone()));

    for c in source.chars() {
        let seen = to_ascii(c);
        if !token.advance(&mut state, &text, seen, text.len()) {
            break;
        }
        text.push(seen);
        end += encoding.unit_len(c);
        if token.is_valid(&state, &text) {
            best = Some((text.len(), end, state.clone()));
        }
    }

    match best {
        Some((len, end, state)) => {
            text.truncate(len);
            let value = token.decode(&state, &text);
            let token: TokenRef = token.clone();
            Lexeme::recognized(token, 0, end, 1, 0, text, value)
        }
        None => Lexeme::unrecognized(0, end, 1, 0, text),
    }
}

/// Produce a random lexeme of `token`.
///
/// Asks for between `min_len` and `max_len` characters, then keeps going
/// until the text is valid, the token stops, or [`MAX_GENERATED`] is hit.
/// The result is unrecognized only if no valid text was reached.
pub fn generate<T: TokenGenerator + 'static>(
    token: &Arc<T>,
    global: Option<&GlobalState>,
    min_len: usize,
    max_len: usize,
    rng: &mut dyn RngCore,
) -> Lexeme {
    let count = if max_len > min_len {
        rng.gen_range(min_len..=max_len)
    } else {
        min_len
    };
    let mut state = token.fresh_state(global);
    let mut text = String::new();

    while text.len() < count.min(MAX_GENERATED) {
        match token.generate(&mut state, &text, text.len(), rng) {
            Some(c) => text.push(c),
            None => break,
        }
    }
    while !token.is_valid(&state, &text) && text.len() < MAX_GENERATED {
        match token.generate(&mut state, &text, text.len(), rng) {
            Some(c) => text.push(c),
            None => break,
        }
    }

    let end = text.len();
    if token.is_valid(&state, &text) {
        let value = token.decode(&state, &text);
        let token: TokenRef = token.clone();
        Lexeme::recognized(token, 0, end, 1, 0, text, value)
    } else {
        Lexeme::unrecognized(0, end, 1, 0, text)
    }
}
