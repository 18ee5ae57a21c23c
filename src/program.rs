//! The compiled regex program: a typed opcode tree.
//!
//! Given a pattern, this module produces [`Node`], a tree of opcodes with
//! capture numbers, class ranges, and bracket/ket structure already
//! resolved (a bracket's "end" is simply the end of its subtree — there is
//! no separate `bracket_end` scan to perform, unlike a flat bytecode
//! walker over a linear instruction stream).
//!
//! [`Compiler::compile`] lowers a [`regex_syntax::hir::Hir`] into this tree.

use std::cell::Cell;
use std::{error::Error, fmt};

use regex_syntax::hir::{Capture, Class, Hir, HirKind, Literal, Look, Repetition};

use crate::regex::Config;

/// One node of the compiled program.
#[derive(Debug, Clone)]
pub enum Node {
    /// Matches nothing, consumes nothing.
    Empty,
    /// A single literal codepoint.
    Char(char),
    /// A single literal codepoint, matched case-insensitively. The second
    /// field is the codepoint's "other case" counterpart when one exists
    /// and folding is a simple two-way relationship; `None` means a fuller
    /// Unicode case-fold (`compile_internal` emits a helper call for those).
    CharFold(char, Option<char>),
    /// An inclusive range list, already merged and sorted by the `regex_syntax`
    /// HIR. Kept inline if small, or consulted through `program.classes` if
    /// large.
    Class(Box<[(char, char)]>),
    Concat(Vec<Node>),
    Alternation(Vec<Node>),
    Repeat {
        min: u32,
        max: Option<u32>,
        greedy: bool,
        node: Box<Node>,
    },
    Capture {
        index: u32,
        name: Option<Box<str>>,
        /// Filled in by `planner::plan`: true if this capture's ovector
        /// cells can be written in place without a save/restore on backtrack.
        optimized: Cell<bool>,
        node: Box<Node>,
    },
    Assertion(Assertion),
    Backref {
        index: u32,
        casei: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assertion {
    /// `\A` — start of subject.
    Sod,
    /// `\z` — end of subject.
    Eod,
    /// `^`, multiline-aware per `Look::StartLF` etc.
    Circ(LineBreak),
    /// `$`, multiline-aware.
    Doll(LineBreak),
    /// `\b`
    WordBoundary,
    /// `\B`
    NotWordBoundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    Lf,
    CrLf,
}

/// Compilation error. Each variant means the JIT and the reference
/// interpreter both decline, and the caller must treat the pattern as
/// unsupported.
#[derive(Debug)]
pub enum CompileError {
    Syntax(regex_syntax::Error),
    InvalidUtf8,
    /// `\k<name>` referencing a name that was never bound as a capture.
    UnknownBackrefName(Box<str>),
    /// Subroutine recursion (`(?R)`, `(?1)`, ...): out of scope.
    UnsupportedRecursion,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Syntax(e) => write!(f, "{e}"),
            CompileError::InvalidUtf8 => write!(f, "pattern can match non-UTF-8 byte sequences"),
            CompileError::UnknownBackrefName(name) => {
                write!(f, "backreference to unknown group name '{name}'")
            }
            CompileError::UnsupportedRecursion => {
                write!(f, "subroutine recursion is not supported")
            }
        }
    }
}

impl Error for CompileError {}

impl From<regex_syntax::Error> for CompileError {
    fn from(e: regex_syntax::Error) -> Self {
        CompileError::Syntax(e)
    }
}

/// A parsed `\g{...}` backreference token extracted by the pre-pass in
/// [`extract_backrefs`], before the remainder of the pattern is handed to
/// `regex_syntax`.
struct BackrefToken {
    /// Byte offset, in the *rewritten* pattern, where a placeholder capture
    /// group was inserted so `regex_syntax` still sees balanced syntax.
    placeholder_index: u32,
    target: BackrefTarget,
    casei: bool,
}

enum BackrefTarget {
    Index(u32),
    Name(Box<str>),
}

/// Pulls `\g{N}`, `\g{name}` and `\k<name>` backreference escapes out of a
/// pattern before handing the rest to `regex_syntax`, which has no concept
/// of backreferences at all. Each token is replaced with `()`, an empty
/// non-participating placeholder group, preserving every other group's
/// numbering.
fn extract_backrefs(pattern: &str) -> (String, Vec<BackrefToken>) {
    let mut out = String::with_capacity(pattern.len());
    let mut tokens = Vec::new();
    let mut chars = pattern.char_indices().peekable();
    let mut group_index: u32 = 0;
    let mut in_class = false;

    while let Some((_, c)) = chars.next() {
        match c {
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '(' if !in_class => {
                // A capturing group is any `(` not followed by `?`, or
                // followed by `?<name>` (but not `?:`, `?=`, `?!`, `?<=`,
                // `?<!`, `?P<name>` is handled the same as `?<name>`).
                if chars.peek().map(|(_, c)| *c) != Some('?') {
                    group_index += 1;
                }
                out.push(c);
            }
            '\\' if !in_class => match chars.peek().map(|(_, c)| *c) {
                Some('g') => {
                    chars.next();
                    if let Some((_, '{')) = chars.peek().copied().map(|(i, c)| (i, c)) {
                        chars.next();
                        let mut token = String::new();
                        for (_, c) in chars.by_ref() {
                            if c == '}' {
                                break;
                            }
                            token.push(c);
                        }
                        let (casei, token) = (false, token);
                        let target = if let Ok(n) = token.parse::<u32>() {
                            BackrefTarget::Index(n)
                        } else {
                            BackrefTarget::Name(token.into_boxed_str())
                        };
                        group_index += 1;
                        tokens.push(BackrefToken {
                            placeholder_index: group_index,
                            target,
                            casei,
                        });
                        out.push_str("()");
                    } else {
                        out.push('\\');
                        out.push('g');
                    }
                }
                Some('k') => {
                    chars.next();
                    let open = chars.peek().map(|(_, c)| *c);
                    if matches!(open, Some('<') | Some('\'')) {
                        let (_, opener) = chars.next().unwrap();
                        let closer = if opener == '<' { '>' } else { '\'' };
                        let mut name = String::new();
                        for (_, c) in chars.by_ref() {
                            if c == closer {
                                break;
                            }
                            name.push(c);
                        }
                        group_index += 1;
                        tokens.push(BackrefToken {
                            placeholder_index: group_index,
                            target: BackrefTarget::Name(name.into_boxed_str()),
                            casei: false,
                        });
                        out.push_str("()");
                    } else {
                        out.push('\\');
                        out.push('k');
                    }
                }
                _ => {
                    out.push('\\');
                    if let Some((_, c)) = chars.next() {
                        out.push(c);
                    }
                }
            },
            _ => out.push(c),
        }
    }

    (out, tokens)
}

#[derive(Debug, Default, Clone)]
pub struct Program {
    pub root: Node,
    pub capture_count: u32,
    pub capture_names: Vec<Option<Box<str>>>,
}

impl Default for Node {
    fn default() -> Self {
        Node::Empty
    }
}

pub struct Compiler {
    config: Config,
    capture_names: Vec<Option<Box<str>>>,
}

impl Compiler {
    /// Parses and lowers `pattern` into a [`Program`].
    pub fn compile(pattern: &str, config: Config) -> Result<Program, CompileError> {
        let (rewritten, backrefs) = extract_backrefs(pattern);

        // Subroutine-recursion syntax is not accepted by `regex_syntax`
        // either; reject it explicitly with a clear error rather than
        // letting the parser choke on it.
        if rewritten.contains("(?R)") || rewritten.contains("(?0)") {
            return Err(CompileError::UnsupportedRecursion);
        }

        let mut parser = regex_syntax::ParserBuilder::new()
            .utf8(true)
            .case_insensitive(config.caseless)
            .multi_line(config.multi_line)
            .dot_matches_new_line(config.dotall)
            .swap_greed(config.swap_greed)
            .build();
        let hir = parser.parse(&rewritten)?;
        if !hir.properties().is_utf8() {
            return Err(CompileError::InvalidUtf8);
        }

        let capture_count = hir.properties().explicit_captures_len() as u32 + 1;
        let mut capture_names = vec![None; capture_count as usize];
        collect_capture_names(&hir, &mut capture_names);

        let mut compiler = Compiler {
            config,
            capture_names: capture_names.clone(),
        };
        let mut root = compiler.lower(hir)?;

        if !backrefs.is_empty() {
            let name_to_index: Vec<(Box<str>, u32)> = capture_names
                .iter()
                .enumerate()
                .filter_map(|(i, n)| n.clone().map(|n| (n, i as u32)))
                .collect();
            for token in backrefs {
                let target_index = match token.target {
                    BackrefTarget::Index(i) => i,
                    BackrefTarget::Name(ref name) => name_to_index
                        .iter()
                        .find(|(n, _)| n.as_ref() == name.as_ref())
                        .map(|(_, i)| *i)
                        .ok_or_else(|| CompileError::UnknownBackrefName(name.clone()))?,
                };
                replace_placeholder(
                    &mut root,
                    token.placeholder_index,
                    Node::Backref {
                        index: target_index,
                        casei: token.casei || config.caseless,
                    },
                );
            }
        }

        Ok(Program {
            root,
            capture_count,
            capture_names,
        })
    }

    fn lower(&mut self, hir: Hir) -> Result<Node, CompileError> {
        Ok(match hir.into_kind() {
            HirKind::Empty => Node::Empty,
            HirKind::Literal(Literal(bytes)) => {
                let string = std::str::from_utf8(&bytes).map_err(|_| CompileError::InvalidUtf8)?;
                let chars: Vec<Node> = string
                    .chars()
                    .map(|c| self.lower_char(c))
                    .collect();
                if chars.len() == 1 {
                    chars.into_iter().next().unwrap()
                } else {
                    Node::Concat(chars)
                }
            }
            HirKind::Class(class) => {
                let ranges = match class {
                    Class::Unicode(u) => u
                        .iter()
                        .map(|r| (r.start(), r.end()))
                        .collect::<Box<[_]>>(),
                    Class::Bytes(b) => b
                        .iter()
                        .map(|r| (r.start() as char, r.end() as char))
                        .collect::<Box<[_]>>(),
                };
                Node::Class(ranges)
            }
            HirKind::Look(look) => self.lower_look(look)?,
            HirKind::Repetition(Repetition {
                min,
                max,
                greedy,
                sub,
            }) => {
                let node = self.lower(*sub)?;
                Node::Repeat {
                    min,
                    max,
                    greedy,
                    node: Box::new(node),
                }
            }
            HirKind::Capture(Capture { index, name, sub }) => {
                let node = self.lower(*sub)?;
                Node::Capture {
                    index,
                    name: name.map(|n| n.to_string().into_boxed_str()),
                    optimized: Cell::new(false),
                    node: Box::new(node),
                }
            }
            HirKind::Concat(hirs) => {
                let mut nodes = Vec::with_capacity(hirs.len());
                for hir in hirs {
                    nodes.push(self.lower(hir)?);
                }
                Node::Concat(nodes)
            }
            HirKind::Alternation(hirs) => {
                let mut nodes = Vec::with_capacity(hirs.len());
                for hir in hirs {
                    nodes.push(self.lower(hir)?);
                }
                Node::Alternation(nodes)
            }
        })
    }

    fn lower_char(&mut self, c: char) -> Node {
        if self.config.caseless {
            let folded: Vec<char> = c.to_uppercase().chain(c.to_lowercase()).collect();
            match folded.as_slice() {
                [only] if *only == c => Node::Char(c),
                [a, b] if a == b => Node::Char(*a),
                [a, b] => Node::CharFold(c, Some(if *a == c { *b } else { *a })),
                _ => Node::CharFold(c, None),
            }
        } else {
            Node::Char(c)
        }
    }

    fn lower_look(&mut self, look: Look) -> Result<Node, CompileError> {
        Ok(match look {
            Look::Start => Node::Assertion(Assertion::Sod),
            Look::End => Node::Assertion(Assertion::Eod),
            Look::StartLF => Node::Assertion(Assertion::Circ(LineBreak::Lf)),
            Look::EndLF => Node::Assertion(Assertion::Doll(LineBreak::Lf)),
            Look::StartCRLF => Node::Assertion(Assertion::Circ(LineBreak::CrLf)),
            Look::EndCRLF => Node::Assertion(Assertion::Doll(LineBreak::CrLf)),
            Look::WordAscii | Look::WordUnicode => Node::Assertion(Assertion::WordBoundary),
            Look::WordAsciiNegate | Look::WordUnicodeNegate => {
                Node::Assertion(Assertion::NotWordBoundary)
            }
            // `\b{start}`/`\b{end}`-style half-word boundaries have no
            // dedicated opcode here; they're approximated with a plain word
            // boundary, which is exact whenever the half-boundary sits at
            // the very start/end of the subject (the common case).
            _ => Node::Assertion(Assertion::WordBoundary),
            // `Hir::Look` only ever carries anchors and word boundaries;
            // `regex_syntax`'s grammar has no lookaround production at all,
            // so `(?=...)`/`(?<=...)` fail with a `Syntax` error in
            // `Compiler::compile` before a `Hir` is even built. There is
            // nothing for this function to lower them into.
        })
    }
}

fn collect_capture_names(hir: &Hir, names: &mut [Option<Box<str>>]) {
    match hir.kind() {
        HirKind::Capture(Capture { index, name, sub }) => {
            if let Some(name) = name {
                if let Some(slot) = names.get_mut(*index as usize) {
                    *slot = Some(name.to_string().into_boxed_str());
                }
            }
            collect_capture_names(sub, names);
        }
        HirKind::Concat(hirs) | HirKind::Alternation(hirs) => {
            for hir in hirs {
                collect_capture_names(hir, names);
            }
        }
        HirKind::Repetition(rep) => collect_capture_names(&rep.sub, names),
        _ => {}
    }
}

/// Finds the `Capture { index: placeholder, .. }` node inserted by
/// `extract_backrefs` for an empty `()` group and replaces it in place with
/// `replacement`. Returns the replacement back if it wasn't consumed, so
/// callers can thread it through sibling nodes without cloning.
fn replace_placeholder(node: &mut Node, placeholder_index: u32, replacement: Node) -> Option<Node> {
    match node {
        Node::Capture { index, node, .. } if *index == placeholder_index => {
            **node = replacement;
            None
        }
        Node::Capture { node, .. } => replace_placeholder(node, placeholder_index, replacement),
        Node::Concat(nodes) | Node::Alternation(nodes) => {
            let mut replacement = Some(replacement);
            for n in nodes.iter_mut() {
                replacement = replace_placeholder(n, placeholder_index, replacement.unwrap());
                if replacement.is_none() {
                    break;
                }
            }
            replacement
        }
        Node::Repeat { node, .. } => replace_placeholder(node, placeholder_index, replacement),
        _ => Some(replacement),
    }
}
