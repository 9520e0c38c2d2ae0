//! Grammar-driven scanning.
//!
//! A [`Syntax`] decides which tokens are live at each point of the input and
//! which of the lexemes the tokenizer found gets committed. [`Scanner`]
//! drives a [`Tokenizer`] over a whole source under a syntax, and
//! [`validate_stream`] checks an already tokenized stream against one.

use crate::config::TokenizerConfig;
use crate::error::ScanError;
use crate::lexeme::Lexeme;
use crate::token::{same_token, TokenRef};
use crate::tokenizer::Tokenizer;
use lexm_util::{DiagnosticBuilder, DiagnosticCode, Handler};
use tracing::debug;

/// Context-sensitive control over tokenization.
pub trait Syntax {
    /// Per-scan state, such as the position inside a grammar rule
    type State;

    /// State at the start of a scan.
    fn initial_state(&self) -> Self::State;

    /// Tokens that may start a lexeme in `state`.
    fn tokens(&self, state: &Self::State) -> Vec<TokenRef>;

    /// Pick one of `lexemes`, which are never empty and come longest first.
    /// Out-of-range answers select the last one.
    fn select_lexeme(&self, state: &Self::State, lexemes: &[Lexeme]) -> usize {
        let _ = (state, lexemes);
        0
    }

    /// Apply a committed lexeme to `state`.
    fn handle_lexeme(&self, state: &mut Self::State, lexeme: &Lexeme) {
        let _ = (state, lexeme);
    }

    /// Adjust the tokenizer before the next lexeme is searched for.
    fn setup_tokenizer(&self, state: &Self::State, tokenizer: &mut Tokenizer) {
        tokenizer.set_tokens(self.tokens(state));
    }

    /// Whether `lexeme` may appear in `state`.
    fn is_valid(&self, state: &Self::State, lexeme: &Lexeme) -> bool {
        match &lexeme.token {
            Some(token) => self.tokens(state).iter().any(|t| same_token(t, token)),
            None => false,
        }
    }
}

/// A syntax with one fixed set of tokens.
#[derive(Clone, Debug, Default)]
pub struct TokenSet {
    tokens: Vec<TokenRef>,
}

impl TokenSet {
    /// Set of `tokens`, in priority order.
    pub fn new(tokens: impl IntoIterator<Item = TokenRef>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    /// Append a token with the lowest priority.
    pub fn push(&mut self, token: TokenRef) {
        self.tokens.push(token);
    }

    /// The tokens
    pub fn tokens(&self) -> &[TokenRef] {
        &self.tokens
    }
}

impl FromIterator<TokenRef> for TokenSet {
    fn from_iter<I: IntoIterator<Item = TokenRef>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl Syntax for TokenSet {
    type State = ();

    fn initial_state(&self) {}

    fn tokens(&self, _state: &()) -> Vec<TokenRef> {
        self.tokens.clone()
    }
}

/// Scans whole sources under a [`Syntax`].
///
/// Every time the tokenizer has lexemes ready the syntax selects one, the
/// scanner commits it and rewinds the tokenizer to its end. Unrecognized
/// input is committed like any other lexeme and, with a handler attached,
/// reported as a warning.
///
/// # Example
///
/// ```
/// use lexm_lex::syntax::{Scanner, TokenSet};
/// use lexm_lex::token::{keyname::KeynameToken, literal::CharToken, token_ref};
///
/// let syntax = TokenSet::new([token_ref(KeynameToken), token_ref(CharToken::new('.'))]);
/// let lexemes = Scanner::new(&syntax).scan("self.name");
/// let texts: Vec<_> = lexemes.iter().map(|l| l.text.as_str()).collect();
/// assert_eq!(texts, ["self", ".", "name"]);
/// ```
pub struct Scanner<'a, S: Syntax> {
    syntax: &'a S,
    state: S::State,
    tokenizer: Tokenizer,
    handler: Option<&'a Handler>,
}

impl<'a, S: Syntax> Scanner<'a, S> {
    /// Scanner with the default tokenizer configuration.
    pub fn new(syntax: &'a S) -> Self {
        Self::with_config(syntax, &TokenizerConfig::default())
    }

    /// Scanner whose tokenizer starts from `config`.
    pub fn with_config(syntax: &'a S, config: &TokenizerConfig) -> Self {
        let state = syntax.initial_state();
        let mut tokenizer = Tokenizer::with_config(syntax.tokens(&state), config);
        syntax.setup_tokenizer(&state, &mut tokenizer);
        Self {
            syntax,
            state,
            tokenizer,
            handler: None,
        }
    }

    /// Report unrecognized and rejected lexemes to `handler`.
    pub fn with_handler(mut self, handler: &'a Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// The syntax state
    pub fn state(&self) -> &S::State {
        &self.state
    }

    /// Consume the scanner, keeping the syntax state.
    pub fn into_state(self) -> S::State {
        self.state
    }

    /// The underlying tokenizer
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Mutable access to the tokenizer, for global state or policies.
    pub fn tokenizer_mut(&mut self) -> &mut Tokenizer {
        &mut self.tokenizer
    }

    /// Scan `source`, encoded with the tokenizer's encoding.
    pub fn scan(&mut self, source: &str) -> Vec<Lexeme> {
        let units = self.tokenizer.encoding().units(source);
        self.scan_units(&units)
    }

    /// Scan a unit stream starting at the tokenizer's current position.
    pub fn scan_units(&mut self, units: &[u32]) -> Vec<Lexeme> {
        let base = self.tokenizer.position();
        let mut committed = Vec::new();
        let mut next = 0;
        loop {
            let ready = match units.get(next) {
                Some(&unit) => {
                    next += 1;
                    self.tokenizer.tokenize_unit(unit)
                }
                None => {
                    if !self.tokenizer.finish() {
                        break;
                    }
                    true
                }
            };
            if !ready {
                continue;
            }
            let mut lexemes = self.tokenizer.take_lexemes();
            if lexemes.is_empty() {
                continue;
            }
            let pick = self
                .syntax
                .select_lexeme(&self.state, &lexemes)
                .min(lexemes.len() - 1);
            let lexeme = lexemes.swap_remove(pick);
            let end = lexeme.end;
            self.commit(lexeme, &mut committed);

            self.tokenizer.rewind(end);
            next = end.saturating_sub(base);
            self.syntax.setup_tokenizer(&self.state, &mut self.tokenizer);
        }
        committed
    }

    fn commit(&mut self, lexeme: Lexeme, committed: &mut Vec<Lexeme>) {
        debug!(
            start = lexeme.start,
            end = lexeme.end,
            token = lexeme.token_name().unwrap_or("<unrecognized>"),
            "commit"
        );
        if let Some(handler) = self.handler {
            if !lexeme.is_recognized() {
                DiagnosticBuilder::warning(format!("unrecognized input {:?}", lexeme.text))
                    .code(DiagnosticCode::W_UNRECOGNIZED_INPUT)
                    .span(lexeme.span())
                    .emit(handler);
            } else if !self.syntax.is_valid(&self.state, &lexeme) {
                DiagnosticBuilder::error(format!("{} is not valid here", lexeme.text))
                    .code(DiagnosticCode::E_REJECTED_LEXEME)
                    .span(lexeme.span())
                    .emit(handler);
            }
        }
        self.syntax.handle_lexeme(&mut self.state, &lexeme);
        committed.push(lexeme);
    }
}

/// Check a pretokenized stream, returning the final syntax state.
pub fn validate_stream<S: Syntax>(syntax: &S, lexemes: &[Lexeme]) -> Result<S::State, ScanError> {
    let mut state = syntax.initial_state();
    for (index, lexeme) in lexemes.iter().enumerate() {
        if !syntax.is_valid(&state, lexeme) {
            return Err(ScanError::Rejected {
                index,
                text: lexeme.text.clone(),
                line: lexeme.line,
                column: lexeme.span().column,
            });
        }
        syntax.handle_lexeme(&mut state, lexeme);
    }
    Ok(state)
}
