// Copyright 2014-2025 The wregex Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://github.com/wregex-rs/wregex/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A small, byte-oriented backtracking regular expression engine with
//! back-reference support.
//!
//! The pattern language is ASCII-only and deliberately small: literals,
//! `.`, `[...]` classes, the `\d`/`\w`/... shorthands, `*`/`+`/`?`/`{m,n}`
//! quantifiers (including their lazy `?` suffix), grouping/alternation,
//! `^`/`$` anchors, `<`/`>` word-edge anchors, the `\i`/`\I` case-fold
//! toggle, and numbered back-references (`\1`, `\2`, ...). There is no
//! linear-time guarantee: matching is explicit backtracking over an
//! operation stack, which is what makes back-references possible at all.
//!
//! ```
//! let re = wregex::Regex::new(r"(abc) \1").unwrap();
//! let caps = re.captures(b"abc abc").unwrap().unwrap();
//! assert_eq!(caps.bytes(1), Some(&b"abc"[..]));
//! ```

mod backtrack;
pub mod charset;
pub mod compile;
pub mod error;
pub mod inst;
mod input;
pub mod program;
mod segment;

pub use crate::backtrack::Capture;
pub use crate::compile::CompileOptions;
pub use crate::error::{CompileError, Error};
pub use crate::program::Program;

/// A compiled regular expression.
///
/// `Regex` is the thin, caller-facing wrapper around a [`Program`]: it owns
/// the compiled NFA and offers the three caller-facing operations spec.md
/// §6 describes (`compile`/`execute`/`describe` — `release` has no Rust
/// equivalent, see `DESIGN.md`). A `Regex` is immutable once built and safe
/// to share across threads; each call to `exec`/`captures`/`is_match`
/// allocates its own scratch stack and capture array, matching spec.md
/// §5's per-invocation resource policy.
#[derive(Clone, Debug)]
pub struct Regex {
    program: Program,
}

impl Regex {
    /// Compiles `pattern` with the default [`CompileOptions`].
    pub fn new(pattern: &str) -> Result<Regex, CompileError> {
        Regex::with_options(pattern, CompileOptions::default())
    }

    /// Compiles `pattern`, applying caller-supplied limits (currently just
    /// [`CompileOptions::max_states`]) before the NFA is built.
    pub fn with_options(pattern: &str, options: CompileOptions) -> Result<Regex, CompileError> {
        Ok(Regex { program: crate::compile::compile(pattern, options)? })
    }

    /// The pattern this `Regex` was compiled from.
    pub fn pattern(&self) -> &str {
        self.program.pattern()
    }

    /// The number of capture slots a full [`Captures`] of this pattern has,
    /// including slot 0 (the whole match).
    pub fn captures_len(&self) -> usize {
        self.program.captures_len()
    }

    /// Runs the NFA against `subject`, filling `captures` on a match.
    ///
    /// This is spec.md §6's `execute(NFA, subject, captures[], n_captures)`
    /// collapsed into a `Result<bool, Error>`: `Ok(true)`/`Ok(false)` are
    /// the "1"/"0" verdicts, `Err` is the negative error code. Slot 0, if
    /// `captures` is non-empty, always receives the whole match's bounds.
    /// `captures` may hold fewer slots than [`Regex::captures_len`]; any
    /// back-references in the pattern still see every slot internally
    /// (spec.md §4.3's "spillover array"), only the export is truncated.
    pub fn exec(&self, subject: &[u8], captures: &mut [Capture]) -> Result<bool, Error> {
        crate::backtrack::exec(&self.program, subject, captures)
    }

    /// Whether `subject` matches anywhere, without recording captures.
    pub fn is_match(&self, subject: &[u8]) -> Result<bool, Error> {
        let mut caps = [(None, None)];
        self.exec(subject, &mut caps)
    }

    /// Matches `subject`, returning the full capture set on success.
    pub fn captures<'t>(&self, subject: &'t [u8]) -> Result<Option<Captures<'t>>, Error> {
        let mut slots = vec![(None, None); self.program.captures_len()];
        if self.exec(subject, &mut slots)? {
            Ok(Some(Captures { subject, slots }))
        } else {
            Ok(None)
        }
    }
}

/// The capture slots recorded by one successful match, together with a
/// borrow of the subject they index into.
///
/// The subject must outlive any `Captures` built from it (spec.md §6: "the
/// subject must outlive any use of the returned capture bounds") — the
/// `'t` lifetime here is exactly that requirement made a compile error
/// instead of a caller obligation.
#[derive(Clone, Debug)]
pub struct Captures<'t> {
    subject: &'t [u8],
    slots: Vec<Capture>,
}

impl<'t> Captures<'t> {
    /// The `(begin, end)` byte-offset bounds of capture slot `i`, or `None`
    /// if that slot doesn't exist or wasn't recorded along the winning
    /// path.
    pub fn pos(&self, i: usize) -> Option<(usize, usize)> {
        let (begin, end) = *self.slots.get(i)?;
        Some((begin?, end?))
    }

    /// The subject bytes covered by capture slot `i`.
    pub fn bytes(&self, i: usize) -> Option<&'t [u8]> {
        let (begin, end) = self.pos(i)?;
        Some(&self.subject[begin..end])
    }

    /// The number of capture slots, including slot 0.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether this capture set has no slots at all (never true for a
    /// successful match: slot 0 is always present).
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl std::ops::Index<usize> for Captures<'_> {
    type Output = [u8];
    fn index(&self, i: usize) -> &[u8] {
        self.bytes(i).unwrap_or_else(|| panic!("no captured group at index {i}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_reports_offset() {
        let err = Regex::new("a(b").unwrap_err();
        assert_eq!(err.kind, Error::UnclosedGroup);
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn is_match_true_and_false() {
        let re = Regex::new("def").unwrap();
        assert!(re.is_match(b"abcdefghi").unwrap());
        assert!(!re.is_match(b"xyz").unwrap());
    }

    #[test]
    fn captures_exposes_whole_match_and_groups() {
        let re = Regex::new(r"(abc) \1").unwrap();
        let caps = re.captures(b"abc abc").unwrap().unwrap();
        assert_eq!(caps.bytes(0), Some(&b"abc abc"[..]));
        assert_eq!(caps.bytes(1), Some(&b"abc"[..]));
        assert_eq!(&caps[1], b"abc");
    }

    #[test]
    fn captures_is_none_on_no_match() {
        let re = Regex::new("xyz").unwrap();
        assert!(re.captures(b"abc").unwrap().is_none());
    }

    #[test]
    fn unrecorded_optional_group_has_no_bounds() {
        let re = Regex::new("a(b)?c").unwrap();
        let caps = re.captures(b"ac").unwrap().unwrap();
        assert_eq!(caps.pos(1), None);
    }

    #[test]
    fn regex_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Regex>();
    }
}
