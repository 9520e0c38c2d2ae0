//! Fixed-text tokens.

use super::{GlobalState, Token, TokenGenerator};
use crate::value::Value;
use rand::RngCore;

/// Matches exactly one character.
#[derive(Debug, Clone)]
pub struct CharToken {
    c: char,
    name: String,
}

impl CharToken {
    /// Token for `c`, named `'c'`.
    pub fn new(c: char) -> Self {
        Self {
            c,
            name: format!("'{c}'"),
        }
    }

    /// The matched character
    pub fn char(&self) -> char {
        self.c
    }
}

impl Token for CharToken {
    type State = ();

    fn name(&self) -> &str {
        &self.name
    }

    fn fresh_state(&self, _global: Option<&GlobalState>) {}

    fn advance(&self, _state: &mut (), _text: &str, c: char, pos: usize) -> bool {
        pos == 0 && c == self.c
    }

    fn is_valid(&self, _state: &(), text: &str) -> bool {
        let mut chars = text.chars();
        chars.next() == Some(self.c) && chars.next().is_none()
    }

    fn decode(&self, _state: &(), _text: &str) -> Option<Value> {
        None
    }
}

impl TokenGenerator for CharToken {
    fn generate(&self, _state: &mut (), _text: &str, pos: usize, _rng: &mut dyn RngCore) -> Option<char> {
        (pos == 0).then_some(self.c)
    }
}

/// Matches one fixed string, such as a keyword or a multi-character operator.
#[derive(Debug, Clone)]
pub struct StringToken {
    chars: Box<[char]>,
    text: String,
    name: String,
}

impl StringToken {
    /// Token for `text`, named `"text"`.
    ///
    /// # Panics
    ///
    /// Panics if `text` is empty.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        assert!(!text.is_empty(), "string token needs at least one character");
        Self {
            chars: text.chars().collect(),
            name: format!("{text:?}"),
            text,
        }
    }

    /// The matched string
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Token for StringToken {
    type State = ();

    fn name(&self) -> &str {
        &self.name
    }

    fn fresh_state(&self, _global: Option<&GlobalState>) {}

    fn advance(&self, _state: &mut (), _text: &str, c: char, pos: usize) -> bool {
        self.chars.get(pos) == Some(&c)
    }

    fn is_valid(&self, _state: &(), text: &str) -> bool {
        text == self.text
    }

    fn decode(&self, _state: &(), _text: &str) -> Option<Value> {
        None
    }
}

impl TokenGenerator for StringToken {
    fn generate(&self, _state: &mut (), _text: &str, pos: usize, _rng: &mut dyn RngCore) -> Option<char> {
        self.chars.get(pos).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::micro::{extract, generate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_char_token_single_position() {
        let token = CharToken::new(';');
        assert!(token.advance(&mut (), "", ';', 0));
        assert!(!token.advance(&mut (), ";", ';', 1));
        assert!(!token.advance(&mut (), "", ',', 0));
        assert!(token.is_valid(&(), ";"));
        assert!(!token.is_valid(&(), ""));
        assert_eq!(token.name(), "';'");
    }

    #[test]
    fn test_string_token_prefixes() {
        let token = Arc::new(StringToken::new("<<="));
        assert!(!token.is_valid(&(), "<<"));
        assert!(token.is_valid(&(), "<<="));
        let lex = extract(&token, "<<=1");
        assert_eq!(lex.text, "<<=");
        assert!(lex.is_recognized());
        assert!(!extract(&token, "<<").is_recognized());
    }

    #[test]
    #[should_panic(expected = "at least one character")]
    fn test_empty_string_token_panics() {
        let _ = StringToken::new("");
    }

    #[test]
    fn test_generation_replays_text() {
        let mut rng = StdRng::seed_from_u64(3);
        let token = Arc::new(StringToken::new("while"));
        assert_eq!(generate(&token, None, 0, 0, &mut rng).text, "while");
        let token = Arc::new(CharToken::new('{'));
        assert_eq!(generate(&token, None, 0, 4, &mut rng).text, "{");
    }
}
