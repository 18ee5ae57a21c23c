//! Extern "sysv64" routines called out to from jitted code for work that's
//! not worth hand-assembling: UTF-8 decoding and the word-boundary
//! character class test. Each takes an `(input, input_len, input_pos)`
//! triple and returns its result packed into a register rather than through
//! an out-pointer, keeping the call site a single `call` plus a register
//! read.

use dynasmrt::{DynasmApi, DynasmLabelApi, dynasm, x64::Assembler};

use crate::util::{Char, is_word_char};

/// Decodes the codepoint starting at byte offset `pos` in `subject`, or
/// `Char::INPUT_BOUND` with length 0 if `pos` is at or past the end.
/// Packed into a single `u64` return (codepoint in the high 32 bits, UTF-8
/// length in the low 32) so the caller gets both out of one `call` without a
/// second memory round-trip.
extern "sysv64" fn decode_char_at(subject: *const u8, len: u64, pos: u64) -> u64 {
    if pos >= len {
        return u64::from(u32::from(Char::INPUT_BOUND)) << 32;
    }
    let bytes = unsafe { std::slice::from_raw_parts(subject, len as usize) };
    let s = unsafe { std::str::from_utf8_unchecked(bytes) };
    let c = s[pos as usize..]
        .chars()
        .next()
        .expect("pos is a char boundary inside subject");
    (u64::from(c as u32) << 32) | c.len_utf8() as u64
}

/// Whether `pos` sits on a `\b`/`\B` word boundary: true iff exactly one of
/// the codepoint before and the codepoint after `pos` is a word character.
extern "sysv64" fn word_boundary_at(subject: *const u8, len: u64, pos: u64) -> u8 {
    let bytes = unsafe { std::slice::from_raw_parts(subject, len as usize) };
    let s = unsafe { std::str::from_utf8_unchecked(bytes) };
    let (before, after) = s.split_at(pos as usize);
    let before = before.chars().next_back().is_some_and(|c| is_word_char(c.into()));
    let after = after.chars().next().is_some_and(|c| is_word_char(c.into()));
    (before != after) as u8
}

/// Emits a call to [`decode_char_at`], leaving the packed `(codepoint, len)`
/// result in `rax`.
pub(crate) fn call_decode(ops: &mut Assembler) {
    __!(ops,
      mov rdi, subject
    ; mov rsi, input_len
    ; mov rdx, pos
    ; mov rax, QWORD decode_char_at as _
    ; call rax
    );
}

/// Like [`call_decode`], but leaves just the UTF-8 length in `eax` (the
/// high 32 bits of the codepoint are discarded by the 32-bit write).
pub(crate) fn call_char_len(ops: &mut Assembler) {
    call_decode(ops);
    __!(ops, ; mov eax, eax);
}

/// Emits a call to [`word_boundary_at`], leaving a `0`/`1` flag in `al`.
pub(crate) fn call_word_boundary(ops: &mut Assembler) {
    __!(ops,
      mov rdi, subject
    ; mov rsi, input_len
    ; mov rdx, pos
    ; mov rax, QWORD word_boundary_at as _
    ; call rax
    );
}
