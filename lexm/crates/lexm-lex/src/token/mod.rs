//! The recognizer contract.
//!
//! A [`Token`] decides, one character at a time, whether a candidate string
//! can still grow into one of its lexemes. All per-match data lives in the
//! associated [`Token::State`], so a single token instance can drive any
//! number of concurrent matches. Tokens themselves are immutable and are
//! shared as [`TokenRef`] handles, compared by identity.
//!
//! The tokenizer holds matches of different token types side by side; the
//! [`Candidate`] trait object is the only place where that heterogeneity is
//! erased.

pub mod fsm;
pub mod keyname;
pub mod literal;
pub mod numeric;

use crate::value::Value;
use rand::RngCore;
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

/// Context shared read-only by every fresh token state.
///
/// Currently carries the reserved-word set consulted by identifier tokens.
///
/// # Example
///
/// ```
/// use lexm_lex::token::GlobalState;
///
/// let global = GlobalState::with_reserved(["let", "fn"]);
/// assert!(global.is_reserved("fn"));
/// assert!(!global.is_reserved("main"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct GlobalState {
    reserved: Arc<FxHashSet<String>>,
}

impl GlobalState {
    /// Empty global state
    pub fn new() -> Self {
        Self::default()
    }

    /// Global state with a set of reserved words
    pub fn with_reserved<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reserved: Arc::new(words.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether `word` is reserved
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(word)
    }

    /// Shared handle to the reserved-word set
    pub fn reserved(&self) -> &Arc<FxHashSet<String>> {
        &self.reserved
    }
}

/// A pluggable lexeme recognizer.
///
/// `text` is always the candidate string accepted so far and `pos` the
/// index the next character would occupy in it.
pub trait Token: fmt::Debug + Send + Sync {
    /// Per-match state, owned exclusively by one candidate.
    type State: Clone + fmt::Debug;

    /// Human readable name, used in diagnostics and output.
    fn name(&self) -> &str;

    /// A clean state for a new match.
    fn fresh_state(&self, global: Option<&GlobalState>) -> Self::State;

    /// Try to consume `c`. Returns true and updates `state` iff `text + c`
    /// can still be (a prefix of) a lexeme of this token.
    fn advance(&self, state: &mut Self::State, text: &str, c: char, pos: usize) -> bool;

    /// Whether `text` is by itself a complete lexeme.
    fn is_valid(&self, state: &Self::State, text: &str) -> bool;

    /// Decode a validated lexeme. Only call after `is_valid` returned true
    /// for the same `state` and `text`.
    fn decode(&self, state: &Self::State, text: &str) -> Option<Value>;
}

/// Tokens that can also produce the characters they accept.
pub trait TokenGenerator: Token {
    /// Produce a character `advance` would accept next, applying it to
    /// `state`, or `None` if the lexeme cannot be extended.
    fn generate(
        &self,
        state: &mut Self::State,
        text: &str,
        pos: usize,
        rng: &mut dyn RngCore,
    ) -> Option<char>;

    /// Render `value` as a lexeme this token reads back to the same kind.
    fn serialize(&self, value: &Value) -> Option<String> {
        let _ = value;
        None
    }
}

/// An in-flight match: a token together with its private state.
pub trait Candidate: fmt::Debug {
    /// See [`Token::advance`].
    fn advance(&mut self, text: &str, c: char, pos: usize) -> bool;
    /// See [`Token::is_valid`].
    fn is_valid(&self, text: &str) -> bool;
    /// See [`Token::decode`].
    fn decode(&self, text: &str) -> Option<Value>;
    /// An independent copy of this match, frozen at its current state.
    fn fork(&self) -> Box<dyn Candidate>;
    /// The token driving this match.
    fn token(&self) -> TokenRef;
}

/// Object-safe view of a [`Token`], implemented for every token type.
pub trait DynToken: fmt::Debug + Send + Sync {
    /// See [`Token::name`].
    fn token_name(&self) -> &str;
    /// Start a new match with a fresh state.
    fn begin(self: Arc<Self>, global: Option<&GlobalState>) -> Box<dyn Candidate>;
}

/// Shared handle to a registered token.
pub type TokenRef = Arc<dyn DynToken>;

impl<T: Token + 'static> DynToken for T {
    fn token_name(&self) -> &str {
        self.name()
    }

    fn begin(self: Arc<Self>, global: Option<&GlobalState>) -> Box<dyn Candidate> {
        let state = self.fresh_state(global);
        Box::new(Match { token: self, state })
    }
}

struct Match<T: Token> {
    token: Arc<T>,
    state: T::State,
}

impl<T: Token> fmt::Debug for Match<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("token", &self.token.name())
            .field("state", &self.state)
            .finish()
    }
}

impl<T: Token + 'static> Candidate for Match<T> {
    fn advance(&mut self, text: &str, c: char, pos: usize) -> bool {
        self.token.advance(&mut self.state, text, c, pos)
    }

    fn is_valid(&self, text: &str) -> bool {
        self.token.is_valid(&self.state, text)
    }

    fn decode(&self, text: &str) -> Option<Value> {
        self.token.decode(&self.state, text)
    }

    fn fork(&self) -> Box<dyn Candidate> {
        Box::new(Match {
            token: Arc::clone(&self.token),
            state: self.state.clone(),
        })
    }

    fn token(&self) -> TokenRef {
        self.token.clone()
    }
}

/// Wrap a token into a shareable handle.
pub fn token_ref<T: Token + 'static>(token: T) -> TokenRef {
    Arc::new(token)
}

/// Identity comparison of token handles.
#[inline]
pub fn same_token(a: &TokenRef, b: &TokenRef) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a).cast::<()>(),
        Arc::as_ptr(b).cast::<()>(),
    )
}
