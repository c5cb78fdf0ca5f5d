// Copyright 2014-2025 The wregex Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://github.com/wregex-rs/wregex/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A compiled regular expression.
//!
//! `Program` is the Rust-native `wrx_nfa`: an owned state table plus the
//! bookkeeping [`crate::compile::compile`] produces alongside it (`start`/
//! `stop` indices, the capture-slot count, whether the pattern is anchored).
//! Grounded on `defuz-regex`'s own `Program` (the struct that bundles an
//! `Insts` table with `cap_names`/`prefixes`/engine caches) narrowed to the
//! fields this crate's single backtracking engine actually needs — no
//! engine-selection fields, no cached `Pool<BackMachine>`/`NfaCache` (see
//! `DESIGN.md`: a single engine has nothing to pick between and no
//! per-call state worth pooling).

use crate::inst::{State, StateIdx};

/// An immutable, compiled NFA.
///
/// Built only by [`crate::compile::compile`] (via [`crate::Regex::new`]);
/// nothing in the executor ever mutates it, so a `Program` may be freely
/// shared across threads behind a `&Program` as long as each concurrent
/// exec call uses its own capture slice — the Rust-native reading of
/// spec.md §5's "multiple executor invocations may read one NFA
/// concurrently provided each has its own operation stack and capture
/// array." There is no explicit `release`: the table, every `ClassSet`
/// payload and the pattern copy are freed by the ordinary `Drop` of the
/// `Vec`/`String` fields below when the last `Program` goes out of scope.
#[derive(Clone, Debug)]
pub struct Program {
    /// The state table, indexed by [`StateIdx`].
    pub(crate) states: Vec<State>,
    /// The entry state of the whole pattern (after submatch-0 is wrapped
    /// around it and leading `Mov`s are optimized away).
    pub(crate) start: StateIdx,
    /// The `Eom` state.
    pub(crate) stop: StateIdx,
    /// The number of capture slots, including slot 0 (the whole match).
    /// Always `>= 1`.
    pub(crate) n_subm: usize,
    /// Whether the pattern began with `^`. Decided once at compile time
    /// (see `Compiler::pattern` in `compile.rs`) rather than rediscovered
    /// by the executor on every attempt: the grammar only ever allows `^`
    /// as the very first thing in the pattern, so every execution path
    /// reaches the same `Bol` state (or none at all) regardless of which
    /// alternative eventually matches.
    pub(crate) anchored: bool,
    /// The original pattern text, kept so `CompileError` and debugging
    /// output can refer back to it.
    pub(crate) original: String,
}

impl Program {
    /// The pattern this program was compiled from.
    pub fn pattern(&self) -> &str {
        &self.original
    }

    /// The number of capture slots a full `Captures` of this pattern has,
    /// including slot 0.
    pub fn captures_len(&self) -> usize {
        self.n_subm
    }

    pub(crate) fn state(&self, idx: StateIdx) -> Option<&State> {
        self.states.get(idx as usize)
    }
}
