//! Core tokenizer implementation.
//!
//! The tokenizer is fed one code unit at a time and keeps every candidate
//! match that is still alive. Candidates are grouped in buckets by the
//! signature index they started at; the signature holds every character
//! consumed since the oldest live bucket began.
//!
//! A `true` return from [`Tokenizer::tokenize_unit`] means lexemes are
//! ready. The character that completed them may not have been consumed,
//! so a caller takes the lexemes, picks one and [`rewind`](Tokenizer::rewind)s
//! to its end before feeding further units.

use super::mode::{Mode, Select};
use super::policy::{CharPolicy, PolicyTable};
use crate::charset::{lead_to_char, CharCategory, Encoding};
use crate::config::TokenizerConfig;
use crate::lexeme::Lexeme;
use crate::token::{Candidate, GlobalState, TokenRef};
use indexmap::IndexMap;
use lexm_util::LineTable;
use rustc_hash::FxBuildHasher;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, trace};

/// Rank given to lexemes no token produced.
const UNRANKED: usize = usize::MAX;

/// One in-flight match and the last valid prefix it passed through.
struct Live {
    candidate: Box<dyn Candidate>,
    rank: usize,
    fallback: Option<(usize, Box<dyn Candidate>)>,
}

/// Candidates that started at the same signature index.
struct Bucket {
    start: usize,
    line: u32,
    line_start: usize,
    live: Vec<Live>,
}

/// A maximal run of characters that started no candidate.
struct Unmatched {
    start: usize,
    end: usize,
    line: u32,
    line_start: usize,
    text: String,
}

struct Ready {
    lexeme: Lexeme,
    rank: usize,
}

/// Drives many candidate matches over a stream of code units.
///
/// A candidate whose token rejects a character is finalized at the longest
/// valid prefix it passed through, not only when the text it holds is
/// valid: `12e+;` yields `12` followed by the rest, not one unrecognized
/// `12e+`.
///
/// # Example
///
/// ```
/// use lexm_lex::token::{numeric::NumericToken, literal::CharToken, token_ref};
/// use lexm_lex::tokenizer::Tokenizer;
///
/// let mut tokenizer = Tokenizer::new([
///     token_ref(NumericToken::default()),
///     token_ref(CharToken::new(';')),
/// ]);
/// let ready = "12;".chars().map(|c| tokenizer.tokenize(c)).collect::<Vec<_>>();
/// assert_eq!(ready, [false, false, true]);
///
/// let lexemes = tokenizer.take_lexemes();
/// assert_eq!(lexemes[0].text, "12");
/// assert_eq!(lexemes[0].end, 2);
/// ```
pub struct Tokenizer {
    tokens: Vec<TokenRef>,
    global: Option<GlobalState>,
    mode: Mode,
    encoding: Encoding,
    policies: PolicyTable,
    offset: usize,
    position: usize,
    lines: LineTable,
    newline_run: Option<usize>,
    signature: String,
    sig_offsets: Vec<usize>,
    active: IndexMap<usize, Bucket, FxBuildHasher>,
    results: Vec<Ready>,
    unmatched: Option<Unmatched>,
    units: Vec<u32>,
}

impl Tokenizer {
    /// Tokenizer with the default configuration.
    pub fn new(tokens: impl IntoIterator<Item = TokenRef>) -> Self {
        Self::with_config(tokens, &TokenizerConfig::default())
    }

    /// Tokenizer starting at the configured offset and line.
    pub fn with_config(tokens: impl IntoIterator<Item = TokenRef>, config: &TokenizerConfig) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
            global: None,
            mode: config.mode(),
            encoding: config.encoding,
            policies: config.policy_table(),
            offset: config.offset,
            position: config.offset,
            lines: LineTable::new(config.line, config.offset),
            newline_run: None,
            signature: String::new(),
            sig_offsets: Vec::new(),
            active: IndexMap::default(),
            results: Vec::new(),
            unmatched: None,
            units: Vec::with_capacity(4),
        }
    }

    /// Registered tokens, in registration order
    pub fn tokens(&self) -> &[TokenRef] {
        &self.tokens
    }

    /// Replace the token set. Takes effect for candidates started later.
    pub fn set_tokens(&mut self, tokens: impl IntoIterator<Item = TokenRef>) {
        self.tokens.clear();
        self.tokens.extend(tokens);
    }

    /// Context handed to every fresh token state.
    pub fn set_global(&mut self, global: Option<GlobalState>) {
        self.global = global;
    }

    /// Scanning mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Change the scanning mode.
    pub fn set_mode(&mut self, mode: impl Into<Mode>) {
        self.mode = mode.into();
    }

    /// Encoding of the unit stream
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Change the encoding of the unit stream.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    /// The policy table
    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Set the policy of every character in `category`.
    pub fn set_category_policy(&mut self, category: CharCategory, policy: CharPolicy) {
        self.policies.set_category(category, policy);
    }

    /// Set the policy of one character.
    pub fn set_policy(&mut self, c: char, policy: CharPolicy) {
        self.policies.set(c, policy);
    }

    /// Offset the stream started at
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Offset the next unit will occupy
    pub fn position(&self) -> usize {
        self.position
    }

    /// Current line and the offset it starts at
    pub fn line(&self) -> (u32, usize) {
        self.lines.current()
    }

    /// Line starts discovered so far
    pub fn lines(&self) -> &LineTable {
        &self.lines
    }

    /// Characters consumed by the live candidates
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Number of live candidates
    pub fn active_count(&self) -> usize {
        self.active.values().map(|b| b.live.len()).sum()
    }

    /// Whether any candidate is live
    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Lexemes waiting to be taken
    pub fn pending(&self) -> usize {
        self.results.len()
    }

    /// Remove the finished lexemes, longest first.
    ///
    /// Equal lengths put the earlier start first, then follow registration
    /// order, with unrecognized lexemes last.
    pub fn take_lexemes(&mut self) -> Vec<Lexeme> {
        let mut ready = std::mem::take(&mut self.results);
        ready.sort_by_key(|r| (Reverse(r.lexeme.len()), r.lexeme.start, r.rank));
        ready.into_iter().map(|r| r.lexeme).collect()
    }

    /// Feed one character, split into units of the configured encoding.
    ///
    /// Returns true if any unit made lexemes ready.
    pub fn tokenize(&mut self, c: char) -> bool {
        let mut units = std::mem::take(&mut self.units);
        units.clear();
        self.encoding.encode_char(c, &mut units);
        let mut ready = false;
        for &unit in &units {
            ready |= self.tokenize_unit(unit);
        }
        self.units = units;
        ready
    }

    /// Feed one code unit. Returns true when lexemes are ready.
    pub fn tokenize_unit(&mut self, unit: u32) -> bool {
        let at = self.position;
        self.position += 1;
        if self.active.is_empty() {
            self.signature.clear();
            self.sig_offsets.clear();
        }

        let width = self.encoding.glyph_units(unit);
        if width == 0 {
            return false;
        }
        let c = lead_to_char(unit);
        self.track_lines(at, c);

        let policy = self.policies.get(c);
        if policy.contains(CharPolicy::TRIM) && self.active.is_empty() {
            return self.flush_unmatched();
        }
        let disallow = policy.contains(CharPolicy::DISALLOW);
        if disallow && self.active.is_empty() {
            if self.flush_unmatched() {
                return true;
            }
            let (line, line_start) = self.lines.current();
            debug!(offset = at, ?c, "disallowed character");
            self.push_ready(
                Lexeme::unrecognized(at, at + width, line, at - line_start, c.to_string()),
                UNRANKED,
            );
            return true;
        }
        if policy.contains(CharPolicy::IGNORE) {
            return false;
        }
        let terminate = disallow || policy.contains(CharPolicy::TERMINATE);

        let before = self.signature.len();
        self.signature.push(c);
        self.sig_offsets.push(at);

        if self.step_candidates(c, terminate) {
            return true;
        }
        if !self.results.is_empty() && (disallow || self.results_complete()) {
            return true;
        }
        if (disallow || !self.mode.interleaved)
            && self.active.is_empty()
            && self.results.is_empty()
            && before > 0
        {
            self.flush_signature(before, at);
            return true;
        }

        if self.mode.interleaved || self.active.is_empty() {
            let started = self.start_candidates(c, before);
            if !started.is_empty() {
                if self.flush_unmatched() {
                    return true;
                }
                let (line, line_start) = self.lines.current();
                trace!(offset = at, count = started.len(), "candidates started");
                self.active.insert(
                    before,
                    Bucket {
                        start: at,
                        line,
                        line_start,
                        live: started,
                    },
                );
            } else if self.active.is_empty() {
                self.extend_unmatched(at, at + width, c);
            }
        }
        false
    }

    /// End the stream: finalize every live candidate and flush anything
    /// pending. Returns true if lexemes are ready.
    pub fn finish(&mut self) -> bool {
        let end = self.position;
        let sig_len = self.signature.len();
        // without live candidates the signature is stale
        let had_active = !self.active.is_empty();
        for (key, bucket) in self.active.drain(..) {
            let text = &self.signature[key..];
            for live in bucket.live.into_iter().rev() {
                let found = if live.candidate.is_valid(text) {
                    Some((text.len(), live.candidate))
                } else {
                    live.fallback
                };
                if let Some((len, candidate)) = found {
                    let end = self.sig_offsets.get(key + len).copied().unwrap_or(end);
                    let text = &self.signature[key..key + len];
                    trace!(start = bucket.start, end, text, "candidate finalized at end of input");
                    self.results.push(Ready {
                        lexeme: Lexeme::recognized(
                            candidate.token(),
                            bucket.start,
                            end,
                            bucket.line,
                            bucket.start - bucket.line_start,
                            text,
                            candidate.decode(text),
                        ),
                        rank: live.rank,
                    });
                }
            }
        }
        if had_active && self.results.is_empty() && sig_len > 0 {
            self.flush_signature(sig_len, end);
        }
        self.flush_unmatched();
        self.signature.clear();
        self.sig_offsets.clear();
        !self.results.is_empty()
    }

    /// Seek to `position`, re-deriving the current line from the lines
    /// already discovered. Live candidates are kept.
    pub fn set_position(&mut self, position: usize) {
        debug!(from = self.position, to = position, "seek");
        self.lines.truncate_after(position);
        self.newline_run = self.newline_run.filter(|&start| start < position);
        self.position = position;
    }

    /// Seek to `position` and drop every live candidate and pending lexeme.
    pub fn rewind(&mut self, position: usize) {
        self.set_position(position);
        self.active.clear();
        self.results.clear();
        self.signature.clear();
        self.sig_offsets.clear();
        self.unmatched = None;
    }

    fn results_complete(&self) -> bool {
        match self.mode.select {
            Select::ReturnFirst | Select::ReturnSet => true,
            Select::ReturnAll => self.active.is_empty(),
        }
    }

    fn track_lines(&mut self, at: usize, c: char) {
        if CharCategory::of(c) == CharCategory::Newline {
            self.newline_run.get_or_insert(at);
        } else if self.newline_run.take().is_some() {
            self.lines.push(at);
        }
    }

    /// Advance every live candidate over the last signature character.
    /// Returns true if `ReturnFirst` stopped the step early.
    fn step_candidates(&mut self, c: char, terminate: bool) -> bool {
        let first_only = self.mode.select == Select::ReturnFirst;
        let before = self.signature.len() - 1;
        let mut stopped = false;
        for (&key, bucket) in self.active.iter_mut() {
            let text = &self.signature[key..before];
            let grown = &self.signature[key..];
            let mut i = bucket.live.len();
            while i > 0 {
                i -= 1;
                let live = &mut bucket.live[i];
                if !terminate && live.candidate.advance(text, c, text.len()) {
                    if live.candidate.is_valid(grown) {
                        live.fallback = Some((grown.len(), live.candidate.fork()));
                    }
                    continue;
                }
                let live = bucket.live.remove(i);
                let found = if live.candidate.is_valid(text) {
                    Some((text.len(), live.candidate))
                } else {
                    live.fallback
                };
                let Some((len, candidate)) = found else {
                    continue;
                };
                let end = self.sig_offsets[key + len];
                let text = &self.signature[key..key + len];
                trace!(start = bucket.start, end, text, "candidate finalized");
                self.results.push(Ready {
                    lexeme: Lexeme::recognized(
                        candidate.token(),
                        bucket.start,
                        end,
                        bucket.line,
                        bucket.start - bucket.line_start,
                        text,
                        candidate.decode(text),
                    ),
                    rank: live.rank,
                });
                if first_only {
                    stopped = true;
                    break;
                }
            }
            if stopped {
                break;
            }
        }
        self.active.retain(|_, bucket| !bucket.live.is_empty());
        stopped
    }

    fn start_candidates(&self, c: char, at: usize) -> Vec<Live> {
        let text = &self.signature[at..];
        self.tokens
            .iter()
            .enumerate()
            .filter_map(|(rank, token)| {
                let mut candidate = Arc::clone(token).begin(self.global.as_ref());
                if !candidate.advance("", c, 0) {
                    return None;
                }
                let fallback = candidate
                    .is_valid(text)
                    .then(|| (text.len(), candidate.fork()));
                Some(Live {
                    candidate,
                    rank,
                    fallback,
                })
            })
            .collect()
    }

    fn push_ready(&mut self, lexeme: Lexeme, rank: usize) {
        self.results.push(Ready { lexeme, rank });
    }

    /// Emit `signature[..len]` as one unrecognized lexeme ending at `end`.
    fn flush_signature(&mut self, len: usize, end: usize) {
        let start = self.sig_offsets[0];
        let (line, line_start) = self.lines.lookup(start);
        let text = self.signature[..len].to_string();
        debug!(start, end, text = %text, "unrecognized signature");
        self.push_ready(
            Lexeme::unrecognized(start, end, line, start - line_start, text),
            UNRANKED,
        );
    }

    fn extend_unmatched(&mut self, at: usize, end: usize, c: char) {
        let (line, line_start) = self.lines.current();
        let run = self.unmatched.get_or_insert_with(|| Unmatched {
            start: at,
            end: at,
            line,
            line_start,
            text: String::new(),
        });
        run.end = end;
        run.text.push(c);
    }

    fn flush_unmatched(&mut self) -> bool {
        let Some(run) = self.unmatched.take() else {
            return false;
        };
        debug!(start = run.start, end = run.end, text = %run.text, "unrecognized run");
        self.push_ready(
            Lexeme::unrecognized(
                run.start,
                run.end,
                run.line,
                run.start - run.line_start,
                run.text,
            ),
            UNRANKED,
        );
        true
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("tokens", &self.tokens.len())
            .field("mode", &self.mode)
            .field("encoding", &self.encoding)
            .field("position", &self.position)
            .field("signature", &self.signature)
            .field("active", &self.active_count())
            .field("pending", &self.results.len())
            .finish()
    }
}
