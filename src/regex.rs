//! Types and public API for regex matching.
//!
//! This module defines [`Regex`] and [`Builder`], thin wrappers dispatching
//! to whichever [`RegexImpl`] backend actually runs a match: the JIT
//! (`crate::jit::JittedRegex`) when codegen for the compiled program
//! succeeded, or the recursive reference interpreter (`crate::interp`)
//! otherwise. Both backends implement the exact same backtracking
//! semantics, so which one actually ran is invisible to the caller.

use std::error::Error;
use std::fmt;

use crate::interp::Interpreter;
use crate::jit::JittedRegex;
use crate::program::{CompileError, Compiler};
use crate::util::{Captures, Input, Match, Partial, Span};

/// Compile-time options affecting how a pattern is parsed and lowered.
/// Corresponds to the familiar PCRE2 option bits (`PCRE2_CASELESS`,
/// `PCRE2_MULTILINE`, `PCRE2_DOTALL`, `PCRE2_UNGREEDY`), plus resource
/// limits enforced at match time.
#[derive(Debug, Clone)]
pub struct Config {
    /// `PCRE2_CASELESS`: case-insensitive matching.
    pub caseless: bool,
    /// `PCRE2_MULTILINE`: `^`/`$` match at internal line boundaries.
    pub multi_line: bool,
    /// `PCRE2_DOTALL`: `.` matches `\n` too.
    pub dotall: bool,
    /// `PCRE2_UNGREEDY`: swap the default greediness of quantifiers.
    pub swap_greed: bool,
    /// Caps the number of backtracking choice-points explored before a
    /// match attempt aborts with [`MatchError::MatchLimitExceeded`]. `None`
    /// means unlimited.
    pub call_limit: Option<u64>,
    /// Caps the backtracking stack's size, in machine words, before a
    /// match attempt aborts with [`MatchError::StackLimitExceeded`]. `None`
    /// means the stack is allowed to grow as needed.
    pub stack_limit: Option<usize>,
    /// Attempt to JIT-compile the program; fall back to the reference
    /// interpreter on any [`CompileError`] it can't represent, or when this
    /// is `false`.
    pub jit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            caseless: false,
            multi_line: false,
            dotall: false,
            swap_greed: false,
            call_limit: None,
            stack_limit: None,
            jit: true,
        }
    }
}

/// Builds a [`Regex`] with non-default [`Config`] options.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caseless(mut self, value: bool) -> Self {
        self.config.caseless = value;
        self
    }

    pub fn multi_line(mut self, value: bool) -> Self {
        self.config.multi_line = value;
        self
    }

    pub fn dotall(mut self, value: bool) -> Self {
        self.config.dotall = value;
        self
    }

    pub fn swap_greed(mut self, value: bool) -> Self {
        self.config.swap_greed = value;
        self
    }

    pub fn call_limit(mut self, value: Option<u64>) -> Self {
        self.config.call_limit = value;
        self
    }

    pub fn stack_limit(mut self, value: Option<usize>) -> Self {
        self.config.stack_limit = value;
        self
    }

    /// Disables JIT compilation, always running the reference interpreter.
    /// Useful to confirm a JIT/interpreter divergence is a codegen bug
    /// rather than a genuine ambiguity in the pattern.
    pub fn jit(mut self, value: bool) -> Self {
        self.config.jit = value;
        self
    }

    pub fn build(self, pattern: &str) -> Result<Regex, CompileError> {
        Regex::with_config(pattern, self.config)
    }
}

/// Why a match attempt did not produce an ordinary success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// No match was found; not really an error, returned by the `try_*`
    /// methods only when the caller needs to distinguish "no match" from
    /// "match abandoned" in the same `Result`.
    NoMatch,
    /// The subject ran out mid-construct in [`crate::util::Partial`] mode.
    /// `hit_start` is the byte offset where the partial match began.
    Partial { hit_start: usize },
    /// [`Config::call_limit`] was exceeded before a verdict was reached.
    MatchLimitExceeded,
    /// [`Config::stack_limit`] was exceeded before a verdict was reached.
    StackLimitExceeded,
    /// The requested [`Input`] was malformed (out-of-range or non-char-
    /// boundary span).
    BadOption,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NoMatch => write!(f, "no match"),
            MatchError::Partial { hit_start } => {
                write!(f, "partial match starting at byte {hit_start}")
            }
            MatchError::MatchLimitExceeded => write!(f, "match call limit exceeded"),
            MatchError::StackLimitExceeded => write!(f, "backtracking stack limit exceeded"),
            MatchError::BadOption => write!(f, "invalid match options"),
        }
    }
}

impl Error for MatchError {}

/// A compiled regular expression.
///
/// Holds both backends: a JIT-compiled program when codegen succeeded and
/// [`Config::jit`] asked for it, and the reference interpreter always,
/// since [`Partial`] matching is routed to the interpreter unconditionally
/// — the JIT emitter has no notion of partial matching at all.
pub struct Regex {
    jit: Option<JittedRegex>,
    interp: Interpreter,
    capture_count: usize,
    capture_names: Vec<Option<Box<str>>>,
}

impl Regex {
    /// Compiles `pattern` with default [`Config`]. Equivalent to
    /// `Builder::new().build(pattern)`.
    pub fn new(pattern: &str) -> Result<Self, CompileError> {
        Self::with_config(pattern, Config::default())
    }

    pub fn with_config(pattern: &str, config: Config) -> Result<Self, CompileError> {
        let program = Compiler::compile(pattern, config.clone())?;
        let capture_count = program.capture_count as usize;
        let capture_names = program.capture_names.clone();

        let jit = if config.jit {
            JittedRegex::new(program.clone(), config.clone())
        } else {
            None
        };
        let interp = Interpreter::new(program, config);

        Ok(Self {
            jit,
            interp,
            capture_count,
            capture_names,
        })
    }

    /// Whether this regex's program is currently running jitted, or fell
    /// back to the reference interpreter.
    pub fn is_jitted(&self) -> bool {
        self.jit.is_some()
    }

    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// The name bound to capture group `index`, if it has one.
    pub fn capture_name(&self, index: usize) -> Option<&str> {
        self.capture_names.get(index)?.as_deref()
    }

    /// Picks which backend serves a search with the given partial-match
    /// mode: the JIT whenever one was built and the caller isn't asking
    /// for partial matching, the reference interpreter otherwise.
    fn use_jit(&self, partial: Partial) -> bool {
        partial == Partial::No && self.jit.is_some()
    }

    pub fn is_match<'s>(&self, input: impl Into<Input<'s>>) -> bool {
        let input = input.into();
        if self.use_jit(input.partial) {
            let jit = self.jit.as_ref().unwrap();
            let mut state = jit.new_state();
            jit.is_match(input, &mut state)
        } else {
            let mut state = self.interp.new_state();
            self.interp.is_match(input, &mut state)
        }
    }

    pub fn find<'s>(&self, input: impl Into<Input<'s>>) -> Option<Match<'s>> {
        let input = input.into();
        if self.use_jit(input.partial) {
            let jit = self.jit.as_ref().unwrap();
            let mut state = jit.new_state();
            jit.find(input, &mut state)
        } else {
            let mut state = self.interp.new_state();
            self.interp.find(input, &mut state)
        }
    }

    pub fn find_captures<'s>(&self, input: impl Into<Input<'s>>) -> Option<Captures<'s>> {
        self.try_find_captures(input).ok()
    }

    /// Like [`Self::find_captures`], but distinguishes the different reasons
    /// a search didn't produce an ordinary match, in particular surfacing
    /// [`MatchError::Partial`] when [`Input::partial`] asked for it.
    pub fn try_find_captures<'s>(
        &self,
        input: impl Into<Input<'s>>,
    ) -> Result<Captures<'s>, MatchError> {
        let input = input.into();
        let subject = input.subject;
        let mut spans = vec![Span::invalid(); self.capture_count].into_boxed_slice();
        if self.use_jit(input.partial) {
            let jit = self.jit.as_ref().unwrap();
            let mut state = jit.new_state();
            jit.try_find_captures(input, &mut state, &mut spans)?;
        } else {
            let mut state = self.interp.new_state();
            self.interp.try_find_captures(input, &mut state, &mut spans)?;
        }
        Ok(Captures::new(subject, spans))
    }

    /// Returns an iterator over all non-overlapping matches.
    pub fn find_all<'r, 's>(&'r self, input: impl Into<Input<'s>>) -> AllMatch<'r, 's> {
        let input = input.into();
        let imp = self.engine_with_state(input.partial);
        AllMatch { input, imp }
    }

    /// Returns an iterator over all non-overlapping matches, with their
    /// capture group bounds.
    pub fn find_all_captures<'r, 's>(&'r self, input: impl Into<Input<'s>>) -> AllCaptures<'r, 's> {
        let input = input.into();
        let imp = self.engine_with_state(input.partial);
        AllCaptures {
            input,
            spans: vec![Span::invalid(); self.capture_count].into_boxed_slice(),
            imp,
        }
    }

    fn engine_with_state(&self, partial: Partial) -> EngineWithState<'_> {
        if self.use_jit(partial) {
            let jit = self.jit.as_ref().unwrap();
            EngineWithState::Jit(jit, jit.new_state())
        } else {
            EngineWithState::Interp(&self.interp, self.interp.new_state())
        }
    }
}

pub struct AllMatch<'r, 's> {
    input: Input<'s>,
    imp: EngineWithState<'r>,
}

impl<'r, 's> Iterator for AllMatch<'r, 's> {
    type Item = Match<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.input.span.valid() {
            return None;
        }
        let result = match &mut self.imp {
            EngineWithState::Interp(interp, state) => {
                interp.reset_state(state);
                interp.find(self.input.clone(), state)?
            }
            EngineWithState::Jit(jit, state) => {
                jit.reset_state(state);
                jit.find(self.input.clone(), state)?
            }
        };
        self.input.span.from = result.next_match_start();
        Some(result)
    }
}

pub struct AllCaptures<'r, 's> {
    input: Input<'s>,
    spans: Box<[Span]>,
    imp: EngineWithState<'r>,
}

impl<'r, 's> Iterator for AllCaptures<'r, 's> {
    type Item = Captures<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.input.span.valid() {
            return None;
        }
        let matched = match &mut self.imp {
            EngineWithState::Interp(interp, state) => {
                interp.reset_state(state);
                interp.find_captures(self.input.clone(), state, &mut self.spans)
            }
            EngineWithState::Jit(jit, state) => {
                jit.reset_state(state);
                jit.find_captures(self.input.clone(), state, &mut self.spans)
            }
        };
        if !matched {
            return None;
        }
        let result = Captures::new(self.input.subject, self.spans.clone());
        self.input.span.from = result.group0().next_match_start();
        Some(result)
    }
}

pub(crate) enum EngineWithState<'r> {
    Interp(&'r Interpreter, <Interpreter as RegexImpl>::State),
    Jit(&'r JittedRegex, <JittedRegex as RegexImpl>::State),
}

/// Lower-level API implemented by both regex backends (the reference
/// interpreter and the JIT). Not part of the public API; exists so both
/// engines are held to the same contract and `Regex` can dispatch between
/// them uniformly.
pub(crate) trait RegexImpl {
    /// Per-search scratch state, reused across repeated searches to avoid
    /// reallocating on every call (the backtracking stack, in particular).
    type State;

    fn new_state(&self) -> Self::State;

    fn reset_state(&self, state: &mut Self::State);

    /// The one method each backend actually implements: searches for a
    /// match and fills in `captures` (as many slots as it has room for; a
    /// backend whose native capture count exceeds `captures.len()` copies
    /// back only the requested prefix) on success.
    fn try_find_captures<'s>(
        &self,
        input: Input<'s>,
        state: &mut Self::State,
        captures: &mut [Span],
    ) -> Result<(), MatchError>;

    fn find_captures<'s>(
        &self,
        input: Input<'s>,
        state: &mut Self::State,
        captures: &mut [Span],
    ) -> bool {
        self.try_find_captures(input, state, captures).is_ok()
    }

    fn find<'s>(&self, input: Input<'s>, state: &mut Self::State) -> Option<Match<'s>> {
        let subject = input.subject;
        let mut span = [Span::invalid()];
        self.try_find_captures(input, state, &mut span).ok()?;
        Some(Match { subject, span: span[0] })
    }

    fn is_match<'s>(&self, input: impl Into<Input<'s>>, state: &mut Self::State) -> bool {
        self.find(input.into().first_match(true), state).is_some()
    }
}
