// Copyright 2014-2025 The wregex Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://github.com/wregex-rs/wregex/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The error dictionary.
//!
//! `Error` is the Rust-native rendition of the `WRX_*` codes in the
//! original `wrxcfg.h` and the messages `wrx_err()` produces for them. There
//! is one variant per code; nothing here is recovered internally, matching
//! spec.md's "no error is recovered internally" propagation policy.

use thiserror::Error;

/// Something went wrong compiling or executing a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Expected a value (literal, group, class, ...) but found something
    /// else or the end of the pattern.
    #[error("value expected")]
    ValueExpected,
    /// A capturing or non-capturing group was opened with `(` but never
    /// closed with `)`.
    #[error("')' expected")]
    UnclosedGroup,
    /// The parser stopped before the whole pattern was consumed, and no
    /// more specific diagnostic applies.
    #[error("invalid expression")]
    InvalidExpression,
    /// A character class was opened with `[` but never closed with `]`.
    #[error("']' expected")]
    UnclosedClass,
    /// A malformed `[...]` set (e.g. an empty class body).
    #[error("error in [...] set")]
    BadSet,
    /// `v < u` in a class range `[u-v]`.
    #[error("v < u in the range [u-v]")]
    RangeOrder,
    /// A non-alphanumeric character was used as a range endpoint.
    #[error("non-alphanumeric character in [u-v]")]
    RangeBadChar,
    /// The two endpoints of a range are not the same "kind" (upper/lower/
    /// digit), e.g. `[A-a]` or `[0-a]`.
    #[error("mismatch in range [u-v]")]
    RangeMismatch,
    /// An escape sequence that means nothing in this grammar.
    #[error("invalid escape sequence")]
    BadEscape,
    /// `$` occurred somewhere other than the very end of the pattern.
    #[error("'$' not at end of pattern")]
    DollarNotAtEnd,
    /// A bounded quantifier `{...}` was opened but never closed with `}`.
    #[error("'}}' expected")]
    UnclosedBrace,
    /// `{m,n}` with `m > n`.
    #[error("m > n in expression {{m,n}}")]
    BadBraceRange,
    /// A defensive check: the compiled program is not well-formed.
    #[error("NFA invalid")]
    BadProgram,
    /// Fewer capture slots were supplied than `nsm` requires (kept for
    /// parity with `WRX_SMALL_NSM`; unreachable from safe Rust callers
    /// since slice lengths cannot be negative).
    #[error("nsm parameter to exec() is too small")]
    TooFewCaptures,
    /// A back-reference referred to a capture slot that does not exist, or
    /// that has not yet been recorded along the current path.
    #[error("invalid backreference")]
    InvalidBackreference,
    /// Compiling the pattern would require more than 32767 states.
    #[error("too many states in expression")]
    TooManyStates,
    /// The backtracking operation stack could not be grown any further.
    #[error("can't grow stack any further")]
    StackOverflow,
    /// Kept for parity with `WRX_OPCODE`; unreachable from safe Rust
    /// callers since `Opcode` is a closed enum and `backtrack::run`'s
    /// dispatch over it is exhaustive, unlike the C original's `op` field
    /// (a raw byte that a corrupted `wrx_nfa_state` could set to anything).
    #[error("unknown opcode")]
    UnknownOpcode,
}

/// A compile-time error together with the byte offset into the pattern
/// where the parser stopped.
///
/// This is the Rust-native collapse of `wrx_comp()`'s `int *e, int *ep`
/// out-parameters into a single value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct CompileError {
    /// What went wrong.
    pub kind: Error,
    /// The byte offset within the pattern where parsing stopped.
    pub offset: usize,
}

impl CompileError {
    pub(crate) fn new(kind: Error, offset: usize) -> CompileError {
        CompileError { kind, offset }
    }
}
