//! Table-driven recognizers.
//!
//! A [`Machine`] describes a recognizer as a set of states: which states may
//! follow each one (in priority order), which characters enter a state, and
//! what entering it does to the match state. [`StateMachine`] turns such a
//! table into a [`Token`] and a [`TokenGenerator`].
//!
//! # Example
//!
//! ```
//! use lexm_lex::token::fsm::{Machine, MachineState, StateId, StateMachine};
//! use lexm_lex::token::{GlobalState, Token};
//! use lexm_lex::Value;
//! use std::borrow::Cow;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! enum Ab { Start, A, B }
//!
//! impl StateId for Ab {
//!     const ALL: &'static [Self] = &[Ab::Start, Ab::A, Ab::B];
//!     fn index(self) -> usize { self as usize }
//! }
//!
//! #[derive(Clone, Debug)]
//! struct AbState { at: Ab }
//!
//! impl MachineState for AbState {
//!     type Id = Ab;
//!     fn current(&self) -> Ab { self.at }
//!     fn set_current(&mut self, id: Ab) { self.at = id }
//!     fn is_valid(&self) -> bool { self.at == Ab::B }
//! }
//!
//! // a+b
//! #[derive(Debug)]
//! struct AbMachine;
//!
//! impl Machine for AbMachine {
//!     type State = AbState;
//!     fn name(&self) -> &str { "ab" }
//!     fn fresh_state(&self, _: Option<&GlobalState>) -> AbState { AbState { at: Ab::Start } }
//!     fn targets(&self, from: Ab) -> &'static [Ab] {
//!         match from {
//!             Ab::Start => &[Ab::A],
//!             Ab::A => &[Ab::A, Ab::B],
//!             Ab::B => &[],
//!         }
//!     }
//!     fn entry_chars(&self, to: Ab, _: &AbState) -> Cow<'static, [char]> {
//!         match to {
//!             Ab::Start => Cow::Borrowed(&[]),
//!             Ab::A => Cow::Borrowed(&['a']),
//!             Ab::B => Cow::Borrowed(&['b']),
//!         }
//!     }
//!     fn decode(&self, _: &AbState, text: &str) -> Option<Value> {
//!         Some(Value::U64(text.len() as u64))
//!     }
//! }
//!
//! let token = StateMachine::new(AbMachine);
//! let mut state = token.fresh_state(None);
//! assert!(token.advance(&mut state, "", 'a', 0));
//! assert!(!token.is_valid(&state, "a"));
//! assert!(token.advance(&mut state, "a", 'b', 1));
//! assert!(token.is_valid(&state, "ab"));
//! assert!(!token.advance(&mut state, "ab", 'b', 2));
//! ```

use super::{GlobalState, Token, TokenGenerator};
use crate::value::Value;
use rand::seq::SliceRandom;
use rand::RngCore;
use std::borrow::Cow;
use std::fmt;

/// Identifier of one state in a machine table.
///
/// `ALL` lists every state so that `ALL[id.index()] == id`.
pub trait StateId: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every state, in index order
    const ALL: &'static [Self];
    /// Dense index of this state
    fn index(self) -> usize;
}

/// The part of a match state the machine driver needs.
pub trait MachineState: Clone + fmt::Debug {
    /// State identifier type
    type Id: StateId;
    /// The state the machine is in
    fn current(&self) -> Self::Id;
    /// Move to another state
    fn set_current(&mut self, id: Self::Id);
    /// Whether the characters consumed so far form a complete lexeme
    fn is_valid(&self) -> bool;
}

/// Shorthand for a machine's state id type.
pub type IdOf<M> = <<M as Machine>::State as MachineState>::Id;

/// A recognizer described as a state table.
pub trait Machine: fmt::Debug + Send + Sync {
    /// Per-match state
    type State: MachineState;

    /// Token name
    fn name(&self) -> &str;

    /// A clean match state, positioned at the initial state.
    fn fresh_state(&self, global: Option<&GlobalState>) -> Self::State;

    /// States that may follow `from`, highest priority first.
    fn targets(&self, from: IdOf<Self>) -> &'static [IdOf<Self>];

    /// Whether the edge `from -> to` is open for `state`.
    fn allows(&self, from: IdOf<Self>, to: IdOf<Self>, state: &Self::State) -> bool {
        let _ = (from, to, state);
        true
    }

    /// Characters that enter `to` given `state`.
    fn entry_chars(&self, to: IdOf<Self>, state: &Self::State) -> Cow<'static, [char]>;

    /// Whether `c` enters `to`. Must agree with `entry_chars`.
    fn can_enter(
        &self,
        to: IdOf<Self>,
        state: &Self::State,
        text: &str,
        c: char,
        pos: usize,
    ) -> bool {
        let _ = (text, pos);
        self.entry_chars(to, state).contains(&c)
    }

    /// Mutation applied when `c` enters `to`.
    fn on_enter(&self, to: IdOf<Self>, state: &mut Self::State, text: &str, c: char, pos: usize) {
        let _ = (to, state, text, c, pos);
    }

    /// Decode a valid match.
    fn decode(&self, state: &Self::State, text: &str) -> Option<Value>;

    /// Render a value as text this machine accepts.
    fn serialize(&self, value: &Value) -> Option<String> {
        let _ = value;
        None
    }
}

/// Adapter running a [`Machine`] as a token.
#[derive(Debug)]
pub struct StateMachine<M: Machine> {
    machine: M,
}

impl<M: Machine> StateMachine<M> {
    /// Wrap `machine`, checking its table.
    ///
    /// # Panics
    ///
    /// Panics if `StateId::ALL` is not dense and ordered, or if any
    /// transition names a state outside of it.
    pub fn new(machine: M) -> Self {
        let all = IdOf::<M>::ALL;
        for (i, id) in all.iter().enumerate() {
            assert_eq!(id.index(), i, "state {:?} is not at index {}", id, i);
        }
        for &from in all {
            for &to in machine.targets(from) {
                assert!(
                    all.get(to.index()) == Some(&to),
                    "transition {:?} -> {:?} leaves the state table",
                    from,
                    to
                );
            }
        }
        Self { machine }
    }

    /// The wrapped machine
    pub fn machine(&self) -> &M {
        &self.machine
    }

    fn open_targets<'a>(&'a self, state: &'a M::State) -> impl Iterator<Item = IdOf<M>> + 'a {
        let from = state.current();
        self.machine
            .targets(from)
            .iter()
            .copied()
            .filter(move |&to| self.machine.allows(from, to, state))
    }
}

impl<M: Machine + Default> Default for StateMachine<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M: Machine> Token for StateMachine<M> {
    type State = M::State;

    fn name(&self) -> &str {
        self.machine.name()
    }

    fn fresh_state(&self, global: Option<&GlobalState>) -> Self::State {
        self.machine.fresh_state(global)
    }

    fn advance(&self, state: &mut Self::State, text: &str, c: char, pos: usize) -> bool {
        let current: &M::State = state;
        let next = self
            .open_targets(current)
            .find(|&to| self.machine.can_enter(to, current, text, c, pos));
        match next {
            Some(to) => {
                self.machine.on_enter(to, state, text, c, pos);
                state.set_current(to);
                true
            }
            None => false,
        }
    }

    fn is_valid(&self, state: &Self::State, _text: &str) -> bool {
        state.is_valid()
    }

    fn decode(&self, state: &Self::State, text: &str) -> Option<Value> {
        assert!(
            state.is_valid(),
            "{}: decode called on invalid text {:?}",
            self.name(),
            text
        );
        self.machine.decode(state, text)
    }
}

impl<M: Machine> TokenGenerator for StateMachine<M> {
    fn generate(
        &self,
        state: &mut Self::State,
        text: &str,
        pos: usize,
        rng: &mut dyn RngCore,
    ) -> Option<char> {
        let open: Vec<IdOf<M>> = self.open_targets(state).collect();
        let &to = open.choose(rng)?;
        let chars = self.machine.entry_chars(to, state);
        let &c = chars.choose(rng)?;
        if !self.machine.can_enter(to, state, text, c, pos) {
            return None;
        }
        self.machine.on_enter(to, state, text, c, pos);
        state.set_current(to);
        Some(c)
    }

    fn serialize(&self, value: &Value) -> Option<String> {
        self.machine.serialize(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Hex {
        Start,
        Zero,
        X,
        Digit,
    }

    impl StateId for Hex {
        const ALL: &'static [Self] = &[Hex::Start, Hex::Zero, Hex::X, Hex::Digit];
        fn index(self) -> usize {
            self as usize
        }
    }

    #[derive(Clone, Debug)]
    struct HexState {
        at: Hex,
        digits: u32,
    }

    impl MachineState for HexState {
        type Id = Hex;
        fn current(&self) -> Hex {
            self.at
        }
        fn set_current(&mut self, id: Hex) {
            self.at = id;
        }
        fn is_valid(&self) -> bool {
            self.digits > 0
        }
    }

    /// `0x[0-9a-f]{1,2}`
    #[derive(Debug, Default)]
    struct HexByte;

    impl Machine for HexByte {
        type State = HexState;

        fn name(&self) -> &str {
            "hex-byte"
        }

        fn fresh_state(&self, _: Option<&GlobalState>) -> HexState {
            HexState {
                at: Hex::Start,
                digits: 0,
            }
        }

        fn targets(&self, from: Hex) -> &'static [Hex] {
            match from {
                Hex::Start => &[Hex::Zero],
                Hex::Zero => &[Hex::X],
                Hex::X | Hex::Digit => &[Hex::Digit],
            }
        }

        fn allows(&self, _from: Hex, to: Hex, state: &HexState) -> bool {
            to != Hex::Digit || state.digits < 2
        }

        fn entry_chars(&self, to: Hex, _: &HexState) -> Cow<'static, [char]> {
            match to {
                Hex::Start => Cow::Borrowed(&[]),
                Hex::Zero => Cow::Borrowed(&['0']),
                Hex::X => Cow::Borrowed(&['x']),
                Hex::Digit => Cow::Owned("0123456789abcdef".chars().collect()),
            }
        }

        fn on_enter(&self, to: Hex, state: &mut HexState, _: &str, _: char, _: usize) {
            if to == Hex::Digit {
                state.digits += 1;
            }
        }

        fn decode(&self, _: &HexState, text: &str) -> Option<Value> {
            u8::from_str_radix(&text[2..], 16).ok().map(Value::U8)
        }
    }

    fn run(token: &StateMachine<HexByte>, text: &str) -> (usize, HexState) {
        let mut state = token.fresh_state(None);
        let mut taken = 0;
        for (i, c) in text.chars().enumerate() {
            if !token.advance(&mut state, &text[..i], c, i) {
                break;
            }
            taken += 1;
        }
        (taken, state)
    }

    #[test]
    fn test_advance_follows_table() {
        let token = StateMachine::new(HexByte);
        let (taken, state) = run(&token, "0x1f");
        assert_eq!(taken, 4);
        assert!(token.is_valid(&state, "0x1f"));
        assert_eq!(token.decode(&state, "0x1f"), Some(Value::U8(0x1f)));
    }

    #[test]
    fn test_conditional_edge_closes() {
        let token = StateMachine::new(HexByte);
        let (taken, _) = run(&token, "0xabc");
        assert_eq!(taken, 4);
    }

    #[test]
    fn test_rejects_unknown_char() {
        let token = StateMachine::new(HexByte);
        let (taken, state) = run(&token, "0y");
        assert_eq!(taken, 1);
        assert!(!token.is_valid(&state, "0"));
    }

    #[test]
    #[should_panic(expected = "decode called on invalid text")]
    fn test_decode_invalid_panics() {
        let token = StateMachine::new(HexByte);
        let state = token.fresh_state(None);
        let _ = token.decode(&state, "");
    }

    #[test]
    fn test_generate_produces_accepted_text() {
        let token = StateMachine::new(HexByte);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut state = token.fresh_state(None);
            let mut text = String::new();
            while let Some(c) = token.generate(&mut state, &text, text.len(), &mut rng) {
                text.push(c);
            }
            assert!(token.is_valid(&state, &text), "{text}");
            assert!(text.len() == 3 || text.len() == 4);
            let (taken, _) = run(&token, &text);
            assert_eq!(taken, text.len());
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Broken {
        A,
        B,
    }

    impl StateId for Broken {
        // B is missing from the table
        const ALL: &'static [Self] = &[Broken::A];
        fn index(self) -> usize {
            self as usize
        }
    }

    #[derive(Clone, Debug)]
    struct BrokenState(Broken);

    impl MachineState for BrokenState {
        type Id = Broken;
        fn current(&self) -> Broken {
            self.0
        }
        fn set_current(&mut self, id: Broken) {
            self.0 = id;
        }
        fn is_valid(&self) -> bool {
            false
        }
    }

    #[derive(Debug)]
    struct BrokenMachine;

    impl Machine for BrokenMachine {
        type State = BrokenState;
        fn name(&self) -> &str {
            "broken"
        }
        fn fresh_state(&self, _: Option<&GlobalState>) -> BrokenState {
            BrokenState(Broken::A)
        }
        fn targets(&self, _: Broken) -> &'static [Broken] {
            &[Broken::B]
        }
        fn entry_chars(&self, _: Broken, _: &BrokenState) -> Cow<'static, [char]> {
            Cow::Borrowed(&['b'])
        }
        fn decode(&self, _: &BrokenState, _: &str) -> Option<Value> {
            None
        }
    }

    #[test]
    #[should_panic(expected = "leaves the state table")]
    fn test_dangling_transition_fails_fast() {
        let _ = StateMachine::new(BrokenMachine);
    }
}
