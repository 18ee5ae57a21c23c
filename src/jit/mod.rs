//! The JIT engine: compiles a [`crate::program::Node`] tree into native x64
//! machine code with [`dynasmrt`], or declines so the caller can fall back
//! to [`crate::interp::Interpreter`] instead.
//!
//! A growable `State { mem, mem_len }` region backs an explicit
//! backtracking stack, grown by doubling; an `extern "sysv64"` pattern
//! calls out to Rust helpers too heavy to hand-assemble; a standard
//! prologue/epilogue saves and restores the callee-saved registers used as
//! aliases for the hot matching state. See `emit` for the codegen itself.

use std::alloc::{self, Layout};
use std::mem;

use dynasmrt::{AssemblyOffset, ExecutableBuffer, dynasm};

use crate::program::Program;
use crate::regex::{Config, MatchError, RegexImpl};
use crate::util::{Input, Partial, Span};

/// Defines the platform and register aliases shared by `emit` and `helpers`.
/// `macro_rules!` scoping makes a macro defined here visible to child
/// modules declared afterward in the same file.
macro_rules! __ {
    ($ops:expr, $($t:tt)*) => {
        dynasm!($ops
        ; .arch x64
        ; .alias subject, rbx
        ; .alias input_len, r12
        ; .alias pos, r13
        ; .alias mem, r14
        ; .alias bt_sp, r15
        ; $($t)*
        )
    };
}

mod emit;
mod helpers;

pub(crate) use emit::Unsupported;

/// The backtracking stack, shared between Rust and the jitted code. Grown
/// by doubling; holds backtrack frames (saved captures, repeat counters)
/// rather than Pike-VM thread nodes.
#[derive(Debug)]
#[repr(C)]
pub struct State {
    mem: *mut u64,
    mem_len: usize,
    /// How many choice-points have been explored in the current match
    /// attempt; compared against `Config::call_limit` by the jitted code.
    call_count: u64,
}

impl Drop for State {
    fn drop(&mut self) {
        unsafe {
            alloc::dealloc(self.mem as *mut u8, Layout::array::<u64>(self.mem_len).unwrap());
        }
    }
}

// SAFETY: `State` owns its buffer outright.
unsafe impl Send for State {}

impl State {
    fn new(mem_len: usize) -> Self {
        let layout = Layout::array::<u64>(mem_len).unwrap();
        let mem = unsafe { alloc::alloc_zeroed(layout) as *mut u64 };
        assert!(!mem.is_null(), "backtracking stack allocation failed");
        Self {
            mem,
            mem_len,
            call_count: 0,
        }
    }

    fn ensure_capacity(&mut self, mem_len: usize) {
        if mem_len > self.mem_len {
            let layout = Layout::array::<u64>(self.mem_len).unwrap();
            let new_mem =
                unsafe { alloc::realloc(self.mem as *mut u8, layout, mem_len * size_of::<u64>()) };
            assert!(!new_mem.is_null(), "backtracking stack growth failed");
            self.mem = new_mem as *mut u64;
            self.mem_len = mem_len;
        }
    }

    fn reset(&mut self) {
        self.call_count = 0;
    }
}

/// Called from jitted code when the backtracking stack runs out of room.
/// Doubles the allocation and returns the (possibly moved) pointer.
extern "sysv64" fn grow_stack(state: *mut State) -> *mut u64 {
    unsafe {
        (*state).ensure_capacity(2 * (*state).mem_len);
        (*state).mem
    }
}

#[derive(Debug)]
pub struct JittedRegex {
    code: ExecutableBuffer,
    entry: AssemblyOffset,
    capture_count: usize,
    initial_stack_words: usize,
}

// pointer-to-u8, u64, pointer-to-Span, u64, pointer-to-State, u64, u64, u64,
// u64, u64 -> u8 (1 = matched, 0 = no match).
//
// subject, subject_len, result, result_len, state, from, to, anchored,
// notbol, noteol.
type ExecSig = extern "sysv64" fn(
    *const u8,
    u64,
    *mut Span,
    u64,
    *mut State,
    u64,
    u64,
    u64,
    u64,
    u64,
) -> u8;

impl JittedRegex {
    /// Attempts to JIT-compile `program`. On any construct the emitter
    /// doesn't (yet) cover — `Backref`, unbounded or overlong repeats, or a
    /// `CrLf`-flavored anchor — or whenever [`Config::call_limit`] is set,
    /// compilation declines and `Regex` keeps its own copy of `program` to
    /// build the reference interpreter from instead. A tree-shaped CPS
    /// emitter can't partially emit a construct it doesn't understand the
    /// way a flat byte walker could skip one opcode and resume, so the
    /// whole program is rejected rather than just the unsupported subtree.
    ///
    /// `call_limit` is declined because the interpreter enforces it per
    /// backtracking step by threading a counter through every `exec` call,
    /// which has no equivalent in straight-line generated code without a
    /// runtime counter and a conditional abort wired into every single
    /// choice point. A caller asking for a call limit is asking to bound
    /// pathological backtracking, exactly the case the reference
    /// interpreter (not throughput) is for. Partial matching is declined
    /// the same way, at the `Regex` level rather than here: `Regex` never
    /// calls into a JIT backend when [`Input::partial`] isn't
    /// [`Partial::No`], so the emitter doesn't need a partial-aware code
    /// path at all.
    pub fn new(program: Program, config: Config) -> Option<Self> {
        if config.call_limit.is_some() {
            return None;
        }
        let built = emit::Emitter::compile(&program).ok()?;
        Some(JittedRegex {
            code: built.code,
            entry: built.entry,
            capture_count: program.capture_count as usize,
            initial_stack_words: built.initial_stack_words,
        })
    }

    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// Runs the jitted code. `result` must already be sized to
    /// `self.capture_count` — every capture's slot is written unconditionally
    /// by the generated code (see `emit::compile_capture`), so a shorter
    /// buffer here is a caller bug, not something this function can guard
    /// against at the call boundary. [`Self::try_find_captures`] is the
    /// public-facing entry point that actually enforces this.
    fn exec<'s>(&self, input: &Input<'s>, state: &mut State, result: &mut [Span]) -> bool {
        debug_assert!(result.len() >= self.capture_count);

        state.ensure_capacity(self.initial_stack_words);
        state.call_count = 0;

        let Input {
            subject,
            span,
            anchored,
            first_match: _,
            partial: _,
            notbol,
            noteol,
            notempty: _,
            notempty_atstart: _,
        } = input;

        let f: ExecSig =
            unsafe { mem::transmute::<*const u8, ExecSig>(self.code.ptr(self.entry)) };

        f(
            subject.as_ptr(),
            subject.len() as u64,
            result.as_mut_ptr(),
            result.len() as u64,
            state as *mut State,
            span.from as u64,
            span.to as u64,
            *anchored as u64,
            *notbol as u64,
            *noteol as u64,
        ) != 0
    }
}

impl RegexImpl for JittedRegex {
    type State = State;

    fn new_state(&self) -> Self::State {
        State::new(self.initial_stack_words)
    }

    fn reset_state(&self, state: &mut Self::State) {
        state.reset();
    }

    /// `Regex` never routes a partial-match request here (see
    /// [`JittedRegex::new`]'s doc comment), so this never needs to consult
    /// [`Input::partial`] itself.
    fn try_find_captures<'s>(
        &self,
        input: Input<'s>,
        state: &mut Self::State,
        captures: &mut [Span],
    ) -> Result<(), MatchError> {
        debug_assert_eq!(input.partial, Partial::No);
        if !input.valid() {
            return Err(MatchError::BadOption);
        }

        let matched = if captures.len() >= self.capture_count {
            self.exec(&input, state, captures)
        } else {
            let mut full = vec![Span::invalid(); self.capture_count];
            let matched = self.exec(&input, state, &mut full);
            let n = captures.len().min(full.len());
            captures[..n].copy_from_slice(&full[..n]);
            matched
        };

        if matched { Ok(()) } else { Err(MatchError::NoMatch) }
    }
}
