//! The CPS matching/backtracking-path emitter: a single recursive pass over
//! the program tree that emits both the match path and the backtrack path
//! for each node together.
//!
//! `Emitter::compile(node)` emits straight-line matching code for `node`
//! that falls through on success (with the cursor register `r13` advanced
//! past the match) and jumps to `self.fail` — a dynamically-scoped "where
//! to resume on failure" label — on mismatch. `self.fail` is usually the
//! global backtracking trampoline (`backtrack`, which pops a choice record
//! off the explicit backtracking stack and resumes there), but constructs
//! that need to catch a *local* failure without disturbing outer
//! backtracking (bounded repeat unrolling) temporarily override it and
//! restore it afterward, held in a field rather than threaded through every
//! call explicitly.
//!
//! Every choice point (alternation branch, repeat iteration) pushes a
//! four-word record — `(retry_addr, saved_pos, extra1, extra2)` — onto the
//! backtracking stack (`State`'s growable `mem` region, `r14`/`r15`) before
//! committing to its first option; `backtrack` always pops exactly one such
//! record, restores `r13`/`r10`/`r11` from it, and jumps indirectly to
//! `retry_addr`. This keeps the trampoline itself construct-agnostic: it
//! has no idea whether it's retrying an alternative branch, giving back a
//! repeat iteration, or undoing a capture write — that's entirely encoded
//! in what `retry_addr` points to.

use std::error::Error;
use std::fmt;

use dynasmrt::{DynamicLabel, DynasmApi, DynasmLabelApi, dynasm, x64::Assembler};

use crate::planner;
use crate::program::{Assertion, LineBreak, Node, Program};

use super::helpers;

/// The emitter declined to compile this program; `JittedRegex::new` falls
/// back to the reference interpreter.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Unsupported;

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "construct not supported by the JIT emitter")
    }
}

impl Error for Unsupported {}

/// A greedy/lazy repeat is unrolled at compile time rather than emitted as
/// a runtime loop with a mutable counter: since there's no free
/// callee-saved register (and no safe way to keep a live counter across the
/// calls a loop body makes) to track "how many reps so far" across a
/// backtrack, turning the count into a compile-time-known label address per
/// level sidesteps the problem entirely, at the cost of bounding how many
/// repetitions the JIT can represent. Repeats needing more bail out to the
/// reference interpreter, which has no such bound.
const MAX_UNROLL: u32 = 8;

pub(crate) struct Built {
    pub code: dynasmrt::ExecutableBuffer,
    pub entry: dynasmrt::AssemblyOffset,
    pub initial_stack_words: usize,
}

macro_rules! cst {
    ($name:ident, $value:expr) => {
        macro_rules! $name {
            () => {
                $value
            };
        }
    };
}

cst!(to_offset, 16);
cst!(anchored_offset, 24);
cst!(notbol_offset, 32);
cst!(noteol_offset, 40);
cst!(result_ptr_offset, -48);
cst!(result_len_offset, -56);
cst!(state_ptr_offset, -64);
cst!(attempt_start_offset, -72);
// `push_record_with_extras` uses `call_scratch_offset!() - 8` and `- 16` as
// scratch for stashing r10/r11 across the stack-growth check; nothing else
// may live there.
cst!(call_scratch_offset, -80);
cst!(search_from_offset, -104);
/// Offset of capture `index`'s body-start scratch slot. One fixed slot per
/// capture (rather than the native call stack) because a capture's body can
/// escape to `self.fail` without ever reaching the code that would pop a
/// native `push` — and can also be re-entered and re-matched successfully
/// more than once (inside a repeat, or via backtracking into an earlier
/// alternative) before this slot is read again, which a stack discipline
/// can't express but a fixed slot, overwritten fresh on every entry, can.
fn capture_slot_offset(index: u32) -> i32 {
    -112 - 8 * index as i32
}

pub(crate) struct Emitter<'p> {
    ops: Assembler,
    program: &'p Program,
    /// Where a match failure currently resumes. Dynamically scoped: saved
    /// and restored by constructs that need to intercept a local failure
    /// (bounded-repeat unrolling) without disturbing the global backtracking
    /// trampoline other constructs rely on.
    fail: DynamicLabel,
    backtrack: DynamicLabel,
    /// Grows with every record pushed at compile time's worth of static
    /// nesting, used only to size the initial backtracking-stack
    /// allocation generously; the stack still grows on demand at runtime
    /// if a pathological input needs more.
    max_static_depth: usize,
    /// Bytes of fixed rbp-relative scratch space, including one slot per
    /// capture; computed once from `program.capture_count` so it covers
    /// the deepest `capture_slot_offset`, sized so that subtracting it from
    /// `rsp` in the prologue restores 16-byte alignment for `call` sites
    /// per the SysV ABI (see `Emitter::compile`).
    locals_size: i32,
}

impl<'p> Emitter<'p> {
    /// `config` only affects parsing (`program::Compiler` already applied
    /// `caseless`/`multi_line`/`dotall`/`swap_greed`) and `call_limit`
    /// (checked by `JittedRegex::new` before this is ever called), so the
    /// emitter itself doesn't need it.
    pub fn compile(program: &'p Program) -> Result<Built, Unsupported> {
        // Fills in each `Node::Capture`'s `optimized` cell in place.
        planner::plan(&program.root);
        let mut ops = Assembler::new().map_err(|_| Unsupported)?;
        let backtrack = ops.new_dynamic_label();
        let needed = 112 + 8 * program.capture_count as i32;
        // The prologue pushes six registers (rbp plus five callee-saved),
        // a multiple of 16 bytes, so it leaves `rsp % 16 == 8` (the SysV
        // entry invariant) unchanged instead of flipping it to 0. A plain
        // multiple of 16 here would keep every `call` inside the jitted
        // body misaligned, so this rounds up to the next size congruent to
        // 8 mod 16 instead.
        let locals_size = ((needed + 7) & !15) + 8;
        let mut emitter = Emitter {
            ops,
            program,
            fail: backtrack,
            backtrack,
            max_static_depth: 0,
            locals_size,
        };
        let entry = emitter.emit_entry()?;
        let code = emitter.ops.finalize().map_err(|_| Unsupported)?;
        Ok(Built {
            code,
            entry,
            initial_stack_words: (emitter.max_static_depth + 8) * 4 + 64,
        })
    }

    fn emit_entry(&mut self) -> Result<dynasmrt::AssemblyOffset, Unsupported> {
        let entry = self.ops.offset();
        let search_loop = self.ops.new_dynamic_label();
        let advance = self.ops.new_dynamic_label();
        let matched = self.ops.new_dynamic_label();
        let no_match = self.ops.new_dynamic_label();

        __!(self.ops,
          push rbp
        ; mov rbp, rsp
        ; push rbx
        ; push r12
        ; push r13
        ; push r14
        ; push r15
        ; sub rsp, self.locals_size
        ; mov [rbp + result_ptr_offset!()], rdx
        ; mov [rbp + result_len_offset!()], rcx
        ; mov [rbp + state_ptr_offset!()], r8
        ; mov subject, rdi
        ; mov input_len, rsi
        ; mov pos, r9
        ; mov mem, [r8]
        ; mov bt_sp, mem
        ; mov [rbp + search_from_offset!()], pos
        ; =>search_loop
        ; mov [rbp + attempt_start_offset!()], pos
        );

        self.backtrack = self.ops.new_dynamic_label();
        self.fail = self.backtrack;
        self.compile(&self.program.root.clone())?;

        __!(self.ops,
          jmp =>matched
        ; =>advance
        ; cmp pos, [rbp + to_offset!()]
        ; jae =>no_match
        ; cmp byte [rbp + anchored_offset!()], 0
        ; jne =>no_match
        ; mov pos, [rbp + attempt_start_offset!()]
        ;; helpers::call_char_len(&mut self.ops)
        ; add pos, rax
        ; jmp =>search_loop
        ; =>self.backtrack
        ; cmp bt_sp, mem
        ; je =>advance
        ;; self.pop_record()
        ; jmp rax
        ; =>matched
        ; mov r8, [rbp + result_ptr_offset!()]
        ; mov r9, [rbp + result_len_offset!()]
        ; test r9, r9
        ; jz >skip_group0
        ; mov rax, [rbp + attempt_start_offset!()]
        ; mov [r8], rax
        ; mov [r8 + 8], pos
        ; skip_group0:
        ; mov rax, 1
        ;; self.epilogue()
        ; ret
        ; =>no_match
        ; xor rax, rax
        ;; self.epilogue()
        ; ret
        );

        Ok(entry)
    }

    fn epilogue(&mut self) {
        __!(self.ops,
          add rsp, self.locals_size
        ; pop r15
        ; pop r14
        ; pop r13
        ; pop r12
        ; pop rbx
        ; pop rbp
        );
    }

    /// Pops the top backtracking record: restores `pos`/`r10`/`r11` from
    /// its fields and leaves the retry address in `rax` for the caller to
    /// jump to.
    fn pop_record(&mut self) {
        __!(self.ops,
          sub bt_sp, 32
        ; mov rax, [bt_sp]
        ; mov pos, [bt_sp + 8]
        ; mov r10, [bt_sp + 16]
        ; mov r11, [bt_sp + 24]
        );
    }

    /// Pushes a four-word record: `(retry_addr, saved_pos, r10, r11)`.
    /// Grows the backtracking stack first if there isn't room. Callers that
    /// don't need the `extra` fields should zero `r10`/`r11` first; callers
    /// that do (capture undo) load them before calling this.
    fn push_record_with_extras(&mut self, retry: DynamicLabel) {
        self.max_static_depth += 1;
        __!(self.ops,
          mov [rbp + call_scratch_offset!() - 8], r10
        ; mov [rbp + call_scratch_offset!() - 16], r11
        ; mov rax, [rbp + state_ptr_offset!()]
        ; mov r8, [rax + 8]
        ; lea r9, [mem + r8 * 8]
        ; lea r8, [bt_sp + 32]
        ; cmp r8, r9
        ; jbe >has_room
        ;; self.grow_stack()
        ; has_room:
        ; lea rax, [=>retry]
        ; mov [bt_sp], rax
        ; mov [bt_sp + 8], pos
        ; mov r10, [rbp + call_scratch_offset!() - 8]
        ; mov r11, [rbp + call_scratch_offset!() - 16]
        ; mov [bt_sp + 16], r10
        ; mov [bt_sp + 24], r11
        ; add bt_sp, 32
        );
    }

    /// Pushes a plain choice-point record with no extra payload.
    fn push_record(&mut self, retry: DynamicLabel, saved_pos_reg: &str) {
        match saved_pos_reg {
            "pos" => {}
            _ => unreachable!("only `pos` is ever saved into a record"),
        }
        __!(self.ops, ; xor r10, r10; xor r11, r11);
        self.push_record_with_extras(retry);
    }

    fn grow_stack(&mut self) {
        __!(self.ops,
          mov rdi, [rbp + state_ptr_offset!()]
        ; sub bt_sp, mem
        ; mov rax, QWORD super::grow_stack as _
        ; call rax
        ; mov mem, rax
        ; add bt_sp, mem
        );
    }

    /// Compiles `node`: falls through on success with `pos` advanced past
    /// the match; jumps to `self.fail` on mismatch.
    fn compile(&mut self, node: &Node) -> Result<(), Unsupported> {
        match node {
            Node::Empty => Ok(()),
            Node::Char(c) => self.compile_char(*c, None),
            Node::CharFold(c, Some(other)) => self.compile_char(*c, Some(*other)),
            Node::CharFold(_, None) => Err(Unsupported),
            Node::Class(ranges) => self.compile_class(ranges),
            Node::Concat(nodes) => {
                for n in nodes {
                    self.compile(n)?;
                }
                Ok(())
            }
            Node::Alternation(nodes) => self.compile_alternation(nodes),
            Node::Repeat {
                min,
                max,
                greedy,
                node: inner,
            } => self.compile_repeat(*min, *max, *greedy, inner),
            Node::Capture {
                index,
                node: inner,
                optimized,
                ..
            } => self.compile_capture(*index, inner, optimized.get()),
            Node::Assertion(assertion) => self.compile_assertion(*assertion),
            Node::Backref { .. } => Err(Unsupported),
        }
    }

    fn compile_char(&mut self, c: char, other: Option<char>) -> Result<(), Unsupported> {
        let fail = self.fail;
        __!(self.ops,
          ;; helpers::call_decode(&mut self.ops)
          ; mov r10, rax
          ; shr r10, 32
          ; mov r11d, eax
          ; cmp r10d, (u32::from(c)).cast_signed()
        );
        match other {
            None => __!(self.ops, ; jne =>fail),
            Some(o) => __!(self.ops,
              je >ok
            ; cmp r10d, (u32::from(o)).cast_signed()
            ; jne =>fail
            ; ok:
            ),
        }
        __!(self.ops, ; add pos, r11);
        Ok(())
    }

    fn compile_class(&mut self, ranges: &[(char, char)]) -> Result<(), Unsupported> {
        let fail = self.fail;
        __!(self.ops,
          ;; helpers::call_decode(&mut self.ops)
          ; mov r10, rax
          ; shr r10, 32
          ; mov r11d, eax
        );
        let matched = self.ops.new_dynamic_label();
        for (lo, hi) in ranges {
            let next = self.ops.new_dynamic_label();
            __!(self.ops,
              cmp r10d, (u32::from(*lo)).cast_signed()
            ; jb =>next
            ; cmp r10d, (u32::from(*hi)).cast_signed()
            ; ja =>next
            ; jmp =>matched
            ; =>next
            );
        }
        __!(self.ops,
          jmp =>fail
        ; =>matched
        ; add pos, r11
        );
        Ok(())
    }

    fn compile_alternation(&mut self, nodes: &[Node]) -> Result<(), Unsupported> {
        if nodes.is_empty() {
            return Ok(());
        }
        let after = self.ops.new_dynamic_label();
        let retry_labels: Vec<DynamicLabel> =
            (1..nodes.len()).map(|_| self.ops.new_dynamic_label()).collect();

        for label in retry_labels.iter().rev() {
            self.push_record(*label, "pos");
        }

        self.compile(&nodes[0])?;
        __!(self.ops, ; jmp =>after);

        for (node, label) in nodes[1..].iter().zip(retry_labels) {
            __!(self.ops, ; =>label);
            self.compile(node)?;
            __!(self.ops, ; jmp =>after);
        }

        __!(self.ops, ; =>after);
        Ok(())
    }

    /// Unrolls `node{min,max}` at compile time: `min` mandatory copies
    /// followed by up to `max - min` optional ones, each guarded by a choice
    /// point so backtracking can give copies back one at a time.
    ///
    /// Greedy unrolling is a flat loop: each optional copy pushes a record
    /// whose retry address is simply "stop taking more copies here", so
    /// popping records in the usual LIFO order naturally surrenders the
    /// most recently taken copy first. Lazy unrolling has to be recursive
    /// instead — each level's record retries into *taking* one more copy,
    /// nested inside the level before it, so that backtracking into an
    /// outer level's retry still has the inner levels' "stop" code to fall
    /// through to once it runs out of extra copies to offer.
    fn compile_repeat(
        &mut self,
        min: u32,
        max: Option<u32>,
        greedy: bool,
        node: &Node,
    ) -> Result<(), Unsupported> {
        let max = match max {
            Some(max) if max.saturating_sub(min) <= MAX_UNROLL && max <= 32 => max,
            _ => return Err(Unsupported),
        };

        for _ in 0..min {
            self.compile(node)?;
        }

        let extra = max - min;
        if greedy {
            let stop = self.ops.new_dynamic_label();
            for _ in 0..extra {
                self.push_record(stop, "pos");
                self.compile(node)?;
            }
            __!(self.ops, ; =>stop);
        } else {
            self.compile_lazy_extra(node, extra)?;
        }
        Ok(())
    }

    /// The lazy half of [`Self::compile_repeat`]: `remaining` further
    /// optional copies of `node`, tried only once backtracking reaches this
    /// point (a lazy repeat prefers to match as few times as possible, so
    /// taking another copy is itself the thing a choice point offers as a
    /// fallback rather than the default path).
    fn compile_lazy_extra(&mut self, node: &Node, remaining: u32) -> Result<(), Unsupported> {
        if remaining == 0 {
            return Ok(());
        }
        let take_more = self.ops.new_dynamic_label();
        let after = self.ops.new_dynamic_label();
        self.push_record(take_more, "pos");
        __!(self.ops,
          jmp =>after
        ; =>take_more
        );
        self.compile(node)?;
        self.compile_lazy_extra(node, remaining - 1)?;
        __!(self.ops, ; =>after);
        Ok(())
    }

    /// An `optimized` capture (nothing else ever needs its old span back)
    /// writes its ovector slot once and never undoes it. Anything
    /// else pushes a choice-point record stashing the slot's old `(start,
    /// end)` as the record's extras, so that backtracking through it can put
    /// the old span back before continuing to unwind.
    fn compile_capture(
        &mut self,
        index: u32,
        node: &Node,
        optimized: bool,
    ) -> Result<(), Unsupported> {
        let slot = capture_slot_offset(index);
        if optimized {
            __!(self.ops, ; mov [rbp + slot], pos);
            self.compile(node)?;
            __!(self.ops,
              mov r9, [rbp + slot]
            ; mov r8, [rbp + result_ptr_offset!()]
            ; mov r10d, (index as i32)
            ; imul r10, r10, 16
            ; mov [r8 + r10], r9
            ; mov [r8 + r10 + 8], pos
            );
            return Ok(());
        }

        let undo = self.ops.new_dynamic_label();
        let after = self.ops.new_dynamic_label();
        __!(self.ops,
          mov [rbp + slot], pos
        ; mov r8, [rbp + result_ptr_offset!()]
        ; mov r9d, (index as i32)
        ; imul r9, r9, 16
        ; mov rax, [r8 + r9]
        ; mov r10, [r8 + r9 + 8]
        // `push_record` itself uses rax/r10/r11 as scratch, so the old
        // span has to ride on the native stack across that one call
        // rather than in registers; unlike the start position above, this
        // push/pop pair has no escape in between, so it can't leak.
        ; push rax
        ; push r10
        );
        self.push_record(undo, "pos");
        // Overwrite the record's extras (pushed as zero by `push_record`)
        // with the old span, so `undo` below can restore it.
        __!(self.ops,
          pop r10
        ; pop rax
        ; mov [bt_sp - 16], rax
        ; mov [bt_sp - 8], r10
        );

        self.compile(node)?;

        __!(self.ops,
          mov r9, [rbp + slot]
        ; mov r8, [rbp + result_ptr_offset!()]
        ; mov r10d, (index as i32)
        ; imul r10, r10, 16
        ; mov [r8 + r10], r9
        ; mov [r8 + r10 + 8], pos
        ; jmp =>after
        ; =>undo
        ; mov r8, [rbp + result_ptr_offset!()]
        ; mov r9d, (index as i32)
        ; imul r9, r9, 16
        ; mov [r8 + r9], r10
        ; mov [r8 + r9 + 8], r11
        ; jmp =>self.backtrack
        ; =>after
        );
        Ok(())
    }

    /// `\A`/`\z` test absolute subject boundaries; `^`/`$` test against the
    /// fixed original search span (`search_from_offset`/`to_offset`, not the
    /// per-retry `attempt_start_offset`) with the `notbol`/`noteol` escape
    /// hatches, falling back to a literal newline check away from those
    /// boundaries — the same three-way split as `interp::check_assertion`.
    /// `\n` is single-byte ASCII in UTF-8 and can never appear as a
    /// continuation byte, so this needs no helper call, just a byte compare.
    fn compile_assertion(&mut self, assertion: Assertion) -> Result<(), Unsupported> {
        let fail = self.fail;
        match assertion {
            Assertion::Sod => __!(self.ops, ; test pos, pos; jnz =>fail),
            Assertion::Eod => __!(self.ops, ; cmp pos, input_len; jne =>fail),
            Assertion::Circ(LineBreak::Lf) => __!(self.ops,
              mov rax, [rbp + search_from_offset!()]
            ; cmp pos, rax
            ; jne >check_prev
            ; cmp byte [rbp + notbol_offset!()], 0
            ; jne =>fail
            ; jmp >pass
            ; check_prev:
            ; mov r10, pos
            ; dec r10
            ; cmp byte [subject + r10], 0x0A
            ; jne =>fail
            ; pass:
            ),
            Assertion::Doll(LineBreak::Lf) => __!(self.ops,
              mov rax, [rbp + to_offset!()]
            ; cmp pos, rax
            ; jne >check_next
            ; cmp byte [rbp + noteol_offset!()], 0
            ; jne =>fail
            ; jmp >pass
            ; check_next:
            ; cmp pos, input_len
            ; je >pass
            ; cmp byte [subject + pos], 0x0A
            ; jne =>fail
            ; pass:
            ),
            Assertion::Circ(LineBreak::CrLf) | Assertion::Doll(LineBreak::CrLf) => {
                return Err(Unsupported);
            }
            Assertion::WordBoundary => {
                __!(self.ops, ;; helpers::call_word_boundary(&mut self.ops); test al, al; jz =>fail)
            }
            Assertion::NotWordBoundary => {
                __!(self.ops, ;; helpers::call_word_boundary(&mut self.ops); test al, al; jnz =>fail)
            }
        }
        Ok(())
    }
}
