//! # gregex
//!
//! **gregex** is a regular expression library compiling Perl-compatible
//! patterns down to a tree-shaped program, then either walking it with a
//! recursive backtracking interpreter or JIT-compiling it to native x86-64
//! machine code.
//!
//! ## Features
//!
//! - **Multiple Engines:** a reference interpreter (always correct, used as
//!   the fallback) and a JIT compiler (fast, but declines on a handful of
//!   constructs it doesn't yet cover).
//! - **Compatibility:** designed to be consistent with the
//!   [`regex`](https://docs.rs/regex) crate's API shape, while supporting
//!   backreferences, which the `regex` crate deliberately leaves out.
//!   Other PCRE-only constructs (atomic groups, possessive quantifiers,
//!   lookaround, conditionals, `(*VERB)` marks) are declined at compile
//!   time, since the upstream parser this crate lowers from has no
//!   grammar production for any of them.
//!
//! ## Usage
//!
//! ```rust
//! use gregex::Regex;
//!
//! let re = Regex::new(r"\d+").unwrap();
//! assert!(re.is_match("abc123"));
//! let mat = re.find("abc123").unwrap();
//! assert_eq!(mat.as_str(), "123");
//! ```
//!
//! ## Engines
//!
//! - [`interp::Interpreter`] — recursive backtracking reference engine.
//! - [`jit::JittedRegex`] — native-code engine, used whenever the compiled
//!   program doesn't need the interpreter's fallback coverage.
//!
//! ## Crate Organization
//!
//! - `regex`: core API ([`Regex`], [`Builder`]) and engine dispatch
//! - `program`: pattern parsing and lowering to the `Node` tree
//! - `planner`: static analysis over a compiled program (capture
//!   optimization)
//! - `interp`: the reference interpreter
//! - `jit`: the native-code compiler
//! - `util`: shared types and helpers
//!
//! ## License
//!
//! Licensed under MIT or Apache-2.0.

pub mod interp;
pub mod jit;
pub mod planner;
pub mod program;
pub mod regex;
pub mod util;

pub use regex::Builder;
pub use regex::Regex;
