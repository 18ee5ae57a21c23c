//! Recursive backtracking reference interpreter over [`crate::program::Node`].
//!
//! This plays two roles: it's the ground truth that the JIT's output is
//! checked against in tests, and it's the fallback engine `Regex` falls
//! back to whenever [`crate::jit`] declines a program (or when the caller
//! asks for it explicitly via `Builder::jit(false)`, or when the caller
//! requests [`Partial`] matching, which the JIT never attempts). It walks
//! `Node` directly with ordinary recursive descent and Rust closures
//! standing in for the "rest of the pattern" continuation, rather than
//! stepping parallel threads one input character at a time — the natural
//! way to express real backtracking (backreferences, repeats) without
//! hand-rolling an explicit stack machine.

use std::ops::Range;

use crate::program::{Assertion, LineBreak, Node, Program};
use crate::regex::{Config, MatchError, RegexImpl};
use crate::util::{Char, Input, Partial, Span};

pub struct Interpreter {
    program: Program,
    config: Config,
}

/// Per-search scratch state. Reused across repeated searches (e.g. inside
/// `find_all`) so the capture vector isn't reallocated every time.
pub struct State {
    captures: Vec<Span>,
}

impl Interpreter {
    pub fn new(program: Program, config: Config) -> Self {
        Self { program, config }
    }

    pub fn capture_count(&self) -> usize {
        self.program.capture_count as usize
    }

    /// Attempts a match with its start pinned at `start`. Returns the
    /// overall match end on success.
    fn try_at(&self, ctx: &mut Ctx, start: usize) -> Option<usize> {
        ctx.captures[0].from = start;
        let mut end = None;
        exec(&self.program.root, ctx, start, &mut |_ctx, pos| {
            end = Some(pos);
            true
        });
        end
    }
}

impl RegexImpl for Interpreter {
    type State = State;

    fn new_state(&self) -> Self::State {
        State {
            captures: vec![Span::invalid(); self.capture_count()],
        }
    }

    fn reset_state(&self, state: &mut Self::State) {
        for span in &mut state.captures {
            *span = Span::invalid();
        }
    }

    fn try_find_captures<'s>(
        &self,
        input: Input<'s>,
        state: &mut Self::State,
        captures: &mut [Span],
    ) -> Result<(), MatchError> {
        if !input.valid() {
            return Err(MatchError::BadOption);
        }

        let Input {
            subject,
            span,
            anchored,
            partial,
            notbol,
            noteol,
            notempty,
            notempty_atstart,
            ..
        } = input;

        if state.captures.len() != self.capture_count() {
            state.captures = vec![Span::invalid(); self.capture_count()];
        }

        let call_limit = self.config.call_limit;
        let mut start = span.from;
        // Kept across start positions: Soft partial matching reports the
        // *leftmost* partial candidate only if no full match turns up
        // anywhere in the search, so the first one recorded wins.
        let mut best_partial: Option<usize> = None;
        loop {
            for s in &mut state.captures {
                *s = Span::invalid();
            }
            let mut ctx = Ctx {
                subject,
                captures: &mut state.captures,
                call_count: 0,
                call_limit,
                search_start: span.from,
                search_end: span.to,
                notbol,
                noteol,
                partial,
                attempt_start: start,
                partial_hit: None,
                hard_abort: false,
            };

            if let Some(end) = self.try_at(&mut ctx, start) {
                let empty = start == end;
                let reject_empty = notempty || (notempty_atstart && start == span.from);
                if !(empty && reject_empty) {
                    ctx.captures[0] = Span { from: start, to: end };
                    let result_len = captures.len().min(ctx.captures.len());
                    captures[..result_len].copy_from_slice(&ctx.captures[..result_len]);
                    return Ok(());
                }
            }

            if best_partial.is_none() {
                best_partial = ctx.partial_hit;
            }

            if ctx.hard_abort || anchored || start >= span.to {
                break;
            }
            start += subject[start..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
        }

        match best_partial {
            Some(hit_start) => Err(MatchError::Partial { hit_start }),
            None => Err(MatchError::NoMatch),
        }
    }
}

/// Match-time context threaded through every `exec` call: the subject, the
/// in-progress capture vector, resource accounting, and partial-match
/// bookkeeping.
struct Ctx<'s, 'c> {
    subject: &'s str,
    captures: &'c mut Vec<Span>,
    call_count: u64,
    call_limit: Option<u64>,
    search_start: usize,
    search_end: usize,
    notbol: bool,
    noteol: bool,
    partial: Partial,
    /// Where the current match attempt started; the offset reported in
    /// [`MatchError::Partial`] if this attempt ends up being the winning
    /// partial candidate.
    attempt_start: usize,
    /// Set the first time this attempt runs out of subject mid-construct.
    partial_hit: Option<usize>,
    /// Set once under [`Partial::Hard`] and never cleared: every `exec`
    /// call checks it first and fails immediately, unwinding the entire
    /// attempt without trying further alternatives.
    hard_abort: bool,
}

/// Records that `ctx`'s current attempt ran out of subject while still
/// inside a construct that could have matched more input. Always returns
/// `false` — running out of input is still an ordinary failure for the
/// node that hit it, just one the search loop can turn into
/// [`MatchError::Partial`] if nothing better turns up. Under
/// [`Partial::Hard`] this also sets `hard_abort`, which every subsequent
/// `exec` call checks first, so the rest of this attempt's backtracking is
/// abandoned instead of trying shorter alternatives.
fn record_partial(ctx: &mut Ctx) -> bool {
    if ctx.partial == Partial::No {
        return false;
    }
    if ctx.partial_hit.is_none() {
        ctx.partial_hit = Some(ctx.attempt_start);
    }
    if ctx.partial == Partial::Hard {
        ctx.hard_abort = true;
    }
    false
}

type Cont<'a> = dyn FnMut(&mut Ctx, usize) -> bool + 'a;

/// Matches `node` starting at byte offset `pos`, invoking `k` with the
/// position just after `node`'s match for every way `node` could match.
/// Returns `true` the moment some invocation of `k` (transitively,
/// including everything after `node` in the pattern) returns `true`, at
/// which point every capture still recorded in `ctx` belongs to that
/// winning path. Returns `false` once every possibility is exhausted,
/// having undone any capture writes made along the way.
fn exec(node: &Node, ctx: &mut Ctx, pos: usize, k: &mut Cont) -> bool {
    if ctx.hard_abort {
        return false;
    }
    if let Some(limit) = ctx.call_limit {
        ctx.call_count += 1;
        if ctx.call_count > limit {
            return false;
        }
    }

    match node {
        Node::Empty => k(ctx, pos),
        Node::Char(c) => match next_char(ctx.subject, pos) {
            Some((got, len)) if got == *c => k(ctx, pos + len),
            Some(_) => false,
            None => record_partial(ctx),
        },
        Node::CharFold(c, other) => match next_char(ctx.subject, pos) {
            Some((got, len)) if got == *c || Some(got) == *other => k(ctx, pos + len),
            Some((got, len)) if other.is_none() && chars_fold_eq(got, *c) => k(ctx, pos + len),
            Some(_) => false,
            None => record_partial(ctx),
        },
        Node::Class(ranges) => match next_char(ctx.subject, pos) {
            Some((got, len)) if ranges.iter().any(|(lo, hi)| *lo <= got && got <= *hi) => {
                k(ctx, pos + len)
            }
            Some(_) => false,
            None => record_partial(ctx),
        },
        Node::Concat(nodes) => exec_seq(nodes, ctx, pos, k),
        Node::Alternation(nodes) => {
            for n in nodes {
                if exec(n, ctx, pos, k) {
                    return true;
                }
            }
            false
        }
        Node::Repeat {
            min,
            max,
            greedy,
            node: inner,
        } => exec_repeat(inner, *min, max.unwrap_or(u32::MAX), *greedy, ctx, pos, 0, k),
        Node::Capture { index, node, .. } => {
            let index = *index as usize;
            let old = ctx.captures[index];
            let matched = exec(node, ctx, pos, &mut |ctx, end| {
                let prev = ctx.captures[index];
                ctx.captures[index] = Span { from: pos, to: end };
                if k(ctx, end) {
                    true
                } else {
                    ctx.captures[index] = prev;
                    false
                }
            });
            if !matched {
                ctx.captures[index] = old;
            }
            matched
        }
        Node::Assertion(assertion) => {
            if check_assertion(*assertion, ctx, pos) {
                k(ctx, pos)
            } else {
                false
            }
        }
        Node::Backref { index, casei } => {
            let span = ctx.captures[*index as usize];
            if !span.valid() {
                return false;
            }
            let wanted = &ctx.subject[Range::from(span)];
            let remaining = &ctx.subject[pos..];
            let matched_len = if *casei {
                prefix_eq_casefold(remaining, wanted)
            } else if remaining.starts_with(wanted) {
                Some(wanted.len())
            } else {
                None
            };
            match matched_len {
                Some(len) => k(ctx, pos + len),
                None => {
                    // Only a partial candidate if the whole (short)
                    // remainder genuinely agrees with a prefix of `wanted`
                    // — an outright content mismatch is an ordinary
                    // failure, not a case of running out of input.
                    let is_prefix = if *casei {
                        casefold_is_prefix(remaining, wanted)
                    } else {
                        wanted.starts_with(remaining)
                    };
                    if is_prefix {
                        record_partial(ctx)
                    } else {
                        false
                    }
                }
            }
        }
    }
}

fn exec_seq(nodes: &[Node], ctx: &mut Ctx, pos: usize, k: &mut Cont) -> bool {
    match nodes.split_first() {
        None => k(ctx, pos),
        Some((first, rest)) => exec(first, ctx, pos, &mut |ctx, pos2| exec_seq(rest, ctx, pos2, k)),
    }
}

#[allow(clippy::too_many_arguments)]
fn exec_repeat(
    node: &Node,
    min: u32,
    max: u32,
    greedy: bool,
    ctx: &mut Ctx,
    pos: usize,
    count: u32,
    k: &mut Cont,
) -> bool {
    let mut try_one_more = |ctx: &mut Ctx, k: &mut Cont| -> bool {
        if count >= max {
            return false;
        }
        exec(node, ctx, pos, &mut |ctx, pos2| {
            if pos2 == pos {
                // Zero-width iteration: counting it once more and stopping,
                // rather than recursing again, avoids looping forever.
                let count = count + 1;
                if count >= min {
                    k(ctx, pos2)
                } else {
                    false
                }
            } else {
                exec_repeat(node, min, max, greedy, ctx, pos2, count + 1, k)
            }
        })
    };

    if greedy {
        if try_one_more(ctx, k) {
            return true;
        }
        if count >= min { k(ctx, pos) } else { false }
    } else {
        if count >= min && k(ctx, pos) {
            return true;
        }
        try_one_more(ctx, k)
    }
}

fn next_char(subject: &str, pos: usize) -> Option<(char, usize)> {
    let c = subject[pos..].chars().next()?;
    Some((c, c.len_utf8()))
}

fn chars_fold_eq(a: char, b: char) -> bool {
    a.to_lowercase().eq(b.to_lowercase())
}

fn prefix_eq_casefold(haystack: &str, needle: &str) -> Option<usize> {
    let mut h = haystack.char_indices();
    let mut consumed = 0;
    for nc in needle.chars() {
        let (idx, hc) = h.next()?;
        if !chars_fold_eq(hc, nc) {
            return None;
        }
        consumed = idx + hc.len_utf8();
    }
    Some(consumed)
}

/// Whether every character of `remaining` agrees, case-insensitively, with
/// the corresponding prefix character of `wanted` — used to tell a
/// genuinely-truncated backreference match (a partial-match candidate)
/// apart from one that simply disagrees with the wanted text.
fn casefold_is_prefix(remaining: &str, wanted: &str) -> bool {
    let mut w = wanted.chars();
    for rc in remaining.chars() {
        match w.next() {
            Some(wc) if chars_fold_eq(rc, wc) => {}
            _ => return false,
        }
    }
    true
}

fn check_assertion(assertion: Assertion, ctx: &Ctx, pos: usize) -> bool {
    match assertion {
        Assertion::Sod => pos == 0,
        Assertion::Eod => pos == ctx.subject.len(),
        Assertion::Circ(lb) => {
            if pos == ctx.search_start && !ctx.notbol {
                return true;
            }
            pos != ctx.search_start
                && is_line_start(ctx.subject, pos, lb)
        }
        Assertion::Doll(lb) => {
            if pos == ctx.search_end && !ctx.noteol {
                return true;
            }
            pos != ctx.search_end && is_line_end(ctx.subject, pos, lb)
        }
        Assertion::WordBoundary => is_word_boundary(ctx.subject, pos),
        Assertion::NotWordBoundary => !is_word_boundary(ctx.subject, pos),
    }
}

fn is_line_start(subject: &str, pos: usize, lb: LineBreak) -> bool {
    if pos == 0 {
        return true;
    }
    let prev = Char::from(subject[..pos].chars().next_back().unwrap());
    match lb {
        LineBreak::Lf => prev.as_char() == Some('\n'),
        LineBreak::CrLf => matches!(prev.as_char(), Some('\n')),
    }
}

fn is_line_end(subject: &str, pos: usize, lb: LineBreak) -> bool {
    if pos == subject.len() {
        return true;
    }
    let next = subject[pos..].chars().next().unwrap();
    match lb {
        LineBreak::Lf => next == '\n',
        LineBreak::CrLf => next == '\n' || next == '\r',
    }
}

fn is_word_boundary(subject: &str, pos: usize) -> bool {
    let before = pos > 0 && is_word_char_at_end(&subject[..pos]);
    let after = pos < subject.len() && is_word_char_at_start(&subject[pos..]);
    before != after
}

fn is_word_char_at_end(s: &str) -> bool {
    s.chars().next_back().is_some_and(|c| c == '_' || c.is_alphanumeric())
}

fn is_word_char_at_start(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c == '_' || c.is_alphanumeric())
}
