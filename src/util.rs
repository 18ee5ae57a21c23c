/*!
This module contains shared types and helpers used across the whole crate,
in particular across the reference interpreter and the JIT engine.
*/

use std::ops::Range;

/// Defines the input parameter to most matching methods on a [`crate::Regex`].
/// Since all values other than subject have a default value it's always
/// sufficient to only provide the subject string to all matching methods,
/// but for cases where we need more control (when finding all matches, or
/// requesting a partial match) this type comes in handy.
#[derive(Clone)]
pub struct Input<'s> {
    /// The subject string against which the regex is matched
    pub subject: &'s str,
    /// Perform the match within that span (but take the surroundings into account)
    /// Default: 0..subject.len()
    pub span: Span,
    /// Whenever the match should be anchored at the start of span.
    /// Default: false
    pub anchored: bool,
    /// Whenever the search should return the first match, or the left-most one.
    /// Default: false
    pub first_match: bool,
    /// Partial-match mode. See [`Partial`].
    pub partial: Partial,
    /// `NOTBOL`: the start of `span` is not considered the start of a line.
    pub notbol: bool,
    /// `NOTEOL`: the end of `span` is not considered the end of a line.
    pub noteol: bool,
    /// `NOTEMPTY`: an empty match anywhere is converted to a non-match.
    pub notempty: bool,
    /// `NOTEMPTY_ATSTART`: an empty match is converted to a non-match only
    /// when it starts exactly at `span.from`.
    pub notempty_atstart: bool,
}

/// Whether a search should report a partial match when it runs off the end
/// of the subject mid-construct, and if so, which flavor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Partial {
    #[default]
    No,
    /// Return the longest prefix match seen so far if the end of the subject
    /// is reached without a full match.
    Soft,
    /// Fail immediately, rather than trying shorter alternatives, once the
    /// end of the subject is reached while still inside a construct that
    /// could have consumed more input.
    Hard,
}

impl<'s> Input<'s> {
    pub fn new(subject: &'s str) -> Self {
        Self {
            subject,
            span: (0..subject.len()).into(),
            anchored: false,
            first_match: false,
            partial: Partial::No,
            notbol: false,
            noteol: false,
            notempty: false,
            notempty_atstart: false,
        }
    }

    pub fn anchored(mut self, value: bool) -> Self {
        self.anchored = value;
        self
    }

    pub fn first_match(mut self, value: bool) -> Self {
        self.first_match = value;
        self
    }

    pub fn partial(mut self, value: Partial) -> Self {
        self.partial = value;
        self
    }

    pub fn span(mut self, span: impl Into<Span>) -> Self {
        self.span = span.into();
        self
    }

    pub fn valid(&self) -> bool {
        self.span.valid()
            && self.span.to <= self.subject.len()
            && self.subject.is_char_boundary(self.span.from)
            && self.subject.is_char_boundary(self.span.to)
    }
}

impl<'s> From<&'s str> for Input<'s> {
    fn from(subject: &'s str) -> Self {
        Self::new(subject)
    }
}

/// A span in a &str. Similar to [`std::ops::Range`], but implements Copy.
/// Plus, it implements repr(C) in order to share it with the jitted code.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct Span {
    pub from: usize,
    pub to: usize,
}

impl Span {
    pub fn empty(&self) -> bool {
        self.from == self.to
    }

    pub fn valid(&self) -> bool {
        self.from <= self.to
    }

    pub fn invalid() -> Span {
        Span { from: 1, to: 0 }
    }
}

impl From<Range<usize>> for Span {
    fn from(value: Range<usize>) -> Self {
        Self {
            from: value.start,
            to: value.end,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(val: Span) -> Self {
        val.from..val.to
    }
}

/// Successful non-capturing match. Contains only the bounds of the
/// overall match.
#[derive(Copy, Debug, Clone)]
pub struct Match<'s> {
    pub subject: &'s str,
    pub span: Span,
}

impl<'s> Match<'s> {
    pub fn new(subject: &'s str, span: impl Into<Span>) -> Self {
        let span = span.into();
        Self { subject, span }
    }

    pub fn start(&self) -> usize {
        self.span.from
    }

    pub fn end(&self) -> usize {
        self.span.to
    }

    pub fn as_str(&self) -> &'s str {
        &self.subject[self.span.from..self.span.to]
    }

    pub fn slice(&self) -> &'s str {
        self.as_str()
    }

    /// Returns the byte-index where the next non-overlapping
    /// match could start. This takes empty matches into account.
    pub fn next_match_start(&self) -> usize {
        if self.span.empty() && self.span.from < self.subject.len() {
            // Must advance to the next codepoint, otherwise we would always
            // return the same empty match forever.
            let range: Range<usize> = self.span.into();
            range.start
                + self.subject[range.start..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8)
        } else {
            self.span.to
        }
    }
}

/// Successful capturing match. Contains the bounds (if any) of all capture groups
/// defined in the pattern. In particular this includes the implicit capture-group
/// 0.
#[derive(Debug, Clone)]
pub struct Captures<'s> {
    subject: &'s str,
    spans: Box<[Span]>,
}

impl<'s> Captures<'s> {
    pub fn new(subject: &'s str, spans: Box<[Span]>) -> Self {
        Self { subject, spans }
    }

    pub fn get(&self, group_index: usize) -> Option<Match<'s>> {
        let span = *self.spans.get(group_index)?;
        if !span.valid() {
            return None;
        }

        Some(Match {
            subject: self.subject,
            span,
        })
    }

    pub fn group0(&self) -> Match<'s> {
        // Must always be set on a successful match.
        self.get(0).unwrap()
    }

    pub fn group_len(&self) -> usize {
        self.spans.len()
    }

    // TODO: Add an iterator over groups, and one over all matched groups.
}

/// A codepoint, plus a sentinel value (outside the Unicode range) used to
/// represent "out of input" without a separate boolean flag. This keeps the
/// hot character-dispatch path in the jitted code a single register compare
/// instead of a branch on an `Option`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Char(u32);

impl Char {
    /// Sentinel standing in for "no character here" (start or end of input).
    /// `0x11_0000` is the first value past the last valid Unicode scalar
    /// value, so it can never collide with a real decoded codepoint.
    pub const INPUT_BOUND: Char = Char(0x0011_0000);

    pub fn is_bound(self) -> bool {
        self == Self::INPUT_BOUND
    }

    pub fn as_char(self) -> Option<char> {
        char::from_u32(self.0)
    }

    pub fn len_utf8(self) -> usize {
        self.as_char().map_or(0, char::len_utf8)
    }
}

impl From<char> for Char {
    fn from(c: char) -> Self {
        Char(c as u32)
    }
}

impl From<Char> for u32 {
    fn from(c: Char) -> Self {
        c.0
    }
}

impl From<Char> for i32 {
    fn from(c: Char) -> Self {
        c.0 as i32
    }
}

/// Is `c` a "word" character for `\b`/`\B` purposes: `[0-9A-Za-z_]` plus,
/// for non-ASCII codepoints, any Unicode alphanumeric.
pub fn is_word_char(c: Char) -> bool {
    match c.as_char() {
        Some(c) => c == '_' || c.is_alphanumeric(),
        None => false,
    }
}

pub fn is_any_newline(c: Char) -> bool {
    matches!(
        c.as_char(),
        Some('\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}')
    )
}

pub fn is_h_space(c: Char) -> bool {
    matches!(
        c.as_char(),
        Some(
            '\t' | ' '
                | '\u{A0}'
                | '\u{1680}'
                | '\u{2000}'..='\u{200A}'
                | '\u{202F}'
                | '\u{205F}'
                | '\u{3000}'
        )
    )
}

pub fn is_v_space(c: Char) -> bool {
    matches!(
        c.as_char(),
        Some('\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
    )
}
