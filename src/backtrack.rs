// Copyright 2014-2025 The wregex Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://github.com/wregex-rs/wregex/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The backtracking executor: a bounded-stack interpreter over a compiled
//! [`Program`], driven by an explicit [`Job`] stack rather than host
//! recursion.
//!
//! Grounded on `defuz-regex`'s own `backtrack.rs` (`Job`/`BackMachine`/
//! `Backtrack::step`, the `push`-alternative-then-fall-through `Split`
//! dispatch, the outer "bump the start position by one and retry" loop in
//! `exec_`) generalized from its visited-bitmap, capture-free variant to
//! the capture-restoring, back-reference-aware one `wrx_exec.c` implements
//! (`stack_el`/`op_pos`/`op_rbeg`/`op_rend`): every write to a capture slot
//! is preceded by a stack entry that undoes it, so failing back out of a
//! path leaves the capture array exactly as it was before that path was
//! tried.

use crate::charset::ClassSet;
use crate::error::Error;
use crate::inst::{Opcode, Payload, State, StateIdx};
use crate::input::Cursor;
use crate::program::Program;

/// A single capture slot: byte offsets into the subject, or `None` if the
/// slot was never recorded along the winning path.
pub type Capture = (Option<usize>, Option<usize>);

/// A hard ceiling on the operation stack, the Rust-native stand-in for
/// `wrx_exec.c`'s `stack_create`/`push` doubling from `nfa->n_states` up to
/// `0x7FFF` before giving up. A `Vec` has no such ceiling on its own; this
/// crate accepts exponential backtracking blow-up by design (spec.md §1
/// Non-goals) but still needs *some* backstop so a pathological pattern
/// fails with [`Error::StackOverflow`] rather than exhausting memory.
const MAX_STACK: usize = 1 << 20;

/// One entry of the executor's explicit operation stack (spec.md §3.5).
#[derive(Clone, Copy, Debug)]
enum Job {
    /// Resume interpretation at input position `at`, automaton state
    /// `state`. Pushed by `Chc` for its backtrack alternative, and once at
    /// the start of every match attempt.
    Pos { at: usize, state: StateIdx },
    /// On unwind, restore `captures[slot].0 := saved`.
    RestoreBegin { slot: usize, saved: Option<usize> },
    /// On unwind, restore `captures[slot].1 := saved`.
    RestoreEnd { slot: usize, saved: Option<usize> },
}

struct Backtrack<'p, 't> {
    program: &'p Program,
    cursor: Cursor<'t>,
    jobs: Vec<Job>,
    captures: Vec<Capture>,
}

impl<'p, 't> Backtrack<'p, 't> {
    fn new(program: &'p Program, subject: &'t [u8]) -> Backtrack<'p, 't> {
        Backtrack {
            program,
            cursor: Cursor::new(subject),
            jobs: Vec::new(),
            captures: vec![(None, None); program.n_subm],
        }
    }

    fn push(&mut self, job: Job) -> Result<(), Error> {
        if self.jobs.len() >= MAX_STACK {
            return Err(Error::StackOverflow);
        }
        self.jobs.push(job);
        Ok(())
    }

    /// Tries to match starting exactly at `at`, exploring every
    /// alternative before giving up. On failure every capture this
    /// attempt wrote has already been restored by the time this returns —
    /// the stack can only drain to empty once every `RestoreBegin`/
    /// `RestoreEnd` entry pushed along the way has been popped and
    /// applied, which is also what undoes them, so there is nothing left
    /// for the caller to clean up between attempts at different start
    /// positions.
    fn attempt(&mut self, at: usize) -> Result<bool, Error> {
        self.push(Job::Pos { at, state: self.program.start })?;
        while let Some(job) = self.jobs.pop() {
            match job {
                Job::RestoreBegin { slot, saved } => self.captures[slot].0 = saved,
                Job::RestoreEnd { slot, saved } => self.captures[slot].1 = saved,
                Job::Pos { at, state } => {
                    if self.run(state, at)? {
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }

    /// Follows one chain of `cont`-true transitions starting at `state`/
    /// `at`. `Eom`/`Mev` end the chain (and the whole match) in success;
    /// any other opcode whose side-condition fails is a dead end — this
    /// returns `false` and lets `attempt`'s stack-pop loop try whatever
    /// alternative (if any) is still pending. `Chc` pushes its backtrack
    /// branch and keeps going down its primary branch in the same call,
    /// mirroring the original's `do { ... } while(cont)` inner loop rather
    /// than pushing a fresh `Job` for every single state.
    fn run(&mut self, mut state: StateIdx, mut at: usize) -> Result<bool, Error> {
        loop {
            let st: &State = self.program.state(state).ok_or(Error::BadProgram)?;
            let cont = match st.op {
                Opcode::Eom | Opcode::Mev => return Ok(true),
                Opcode::Mtc => self.step_byte(at, byte_payload(st.payload)?, false, &mut at),
                Opcode::Mci => self.step_byte(at, byte_payload(st.payload)?, true, &mut at),
                Opcode::Set => self.step_class(at, class_payload(st.payload)?, &mut at),
                Opcode::Mov => true,
                Opcode::Chc => {
                    self.push(Job::Pos { at, state: st.s[1] })?;
                    true
                }
                Opcode::Rec => {
                    let slot = slot_payload(st.payload)?;
                    self.push(Job::RestoreBegin { slot, saved: self.captures[slot].0 })?;
                    self.captures[slot].0 = Some(at);
                    true
                }
                Opcode::Stp => {
                    let slot = slot_payload(st.payload)?;
                    self.push(Job::RestoreEnd { slot, saved: self.captures[slot].1 })?;
                    self.captures[slot].1 = Some(at);
                    true
                }
                Opcode::Brf => self.step_backref(at, slot_payload(st.payload)?, false, &mut at)?,
                Opcode::Bri => self.step_backref(at, slot_payload(st.payload)?, true, &mut at)?,
                Opcode::Bol => self.cursor.is_line_start(at),
                Opcode::Eol => self.cursor.is_line_end(at),
                Opcode::Bow => self.cursor.is_word_start(at),
                Opcode::Eow => self.cursor.is_word_end(at),
                Opcode::Bnd => self.cursor.is_word_boundary(at),
            };

            if !cont {
                return Ok(false);
            }
            state = st.s[0];
        }
    }

    /// `Mtc`/`Mci`: consume one byte if it equals `want`, advancing `at`.
    fn step_byte(&self, at: usize, want: u8, ci: bool, at_out: &mut usize) -> bool {
        let matched = match self.cursor.byte_at(at) {
            Some(b) if ci => b.eq_ignore_ascii_case(&want),
            Some(b) => b == want,
            None => false,
        };
        if matched {
            *at_out = at + 1;
        }
        matched
    }

    /// `Set`: consume one byte if its bit is set in `class`.
    fn step_class(&self, at: usize, class: ClassSet, at_out: &mut usize) -> bool {
        let matched = self.cursor.byte_at(at).map(|b| class.test(b)).unwrap_or(false);
        if matched {
            *at_out = at + 1;
        }
        matched
    }

    /// `Brf`/`Bri`: consume input bytes equal to the previously recorded
    /// capture `slot`. A slot that does not exist, or exists but was never
    /// fully recorded along this path, is a fatal error rather than a
    /// plain mismatch (spec.md §4.3).
    fn step_backref(
        &self,
        at: usize,
        slot: usize,
        ci: bool,
        at_out: &mut usize,
    ) -> Result<bool, Error> {
        let (Some(begin), Some(end)) =
            *self.captures.get(slot).ok_or(Error::InvalidBackreference)?
        else {
            return Err(Error::InvalidBackreference);
        };
        let subject = self.cursor.subject();
        let len = end - begin;
        let matched = at + len <= subject.len()
            && (0..len).all(|i| {
                let (x, y) = (subject[begin + i], subject[at + i]);
                if ci { x.eq_ignore_ascii_case(&y) } else { x == y }
            });
        if matched {
            *at_out = at + len;
        }
        Ok(matched)
    }

    /// Copies the internal (always fully-sized) capture array into the
    /// caller's slice, truncating to whichever is shorter. This is the
    /// Rust-native rendition of spec.md §4.3's "spillover array": the
    /// internal array always has `program.n_subm` slots regardless of how
    /// many the caller asked for, so back-references always see a
    /// complete slot set, and only the prefix the caller actually
    /// supplied room for is copied out.
    fn export(&self, captures: &mut [Capture]) {
        let n = captures.len().min(self.captures.len());
        captures[..n].copy_from_slice(&self.captures[..n]);
    }
}

fn byte_payload(p: Payload) -> Result<u8, Error> {
    match p {
        Payload::Byte(b) => Ok(b),
        _ => Err(Error::BadProgram),
    }
}

fn class_payload(p: Payload) -> Result<ClassSet, Error> {
    match p {
        Payload::Class(c) => Ok(c),
        _ => Err(Error::BadProgram),
    }
}

fn slot_payload(p: Payload) -> Result<usize, Error> {
    match p {
        Payload::Slot(s) => Ok(s),
        _ => Err(Error::BadProgram),
    }
}

/// Finds the next position right after a `\r` or `\n` at or after `from`,
/// used to bulk-advance an anchored (`^`) search past its first failure:
/// spec.md §4.3 "this advance is restricted to positions immediately
/// following CR or LF (and is performed in bulk, once, after the first
/// failure of the primary start)". Candidates are tried in left-to-right
/// order here; `wrx_exec.c`'s own bulk-seeding interleaves this scan with
/// ordinary backtracking and ends up trying them in the opposite order as
/// a side effect of stack order, which is not a documented invariant (see
/// DESIGN.md).
fn next_bol(subject: &[u8], from: usize) -> Option<usize> {
    memchr::memchr2(b'\r', b'\n', &subject[from..]).map(|i| from + i + 1)
}

/// Matches `program` against `subject`, searching every start position
/// unless the pattern is anchored, and fills `captures` on success.
pub fn exec(program: &Program, subject: &[u8], captures: &mut [Capture]) -> Result<bool, Error> {
    let mut bt = Backtrack::new(program, subject);
    let len = subject.len();

    if bt.attempt(0)? {
        bt.export(captures);
        return Ok(true);
    }

    if program.anchored {
        let mut from = 0;
        while let Some(at) = next_bol(subject, from) {
            if bt.attempt(at)? {
                bt.export(captures);
                return Ok(true);
            }
            from = at;
        }
        return Ok(false);
    }

    let mut at = 0;
    while at < len {
        at += 1;
        if bt.attempt(at)? {
            bt.export(captures);
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{compile, CompileOptions};

    fn run(pattern: &str, subject: &str) -> (bool, Vec<Capture>) {
        let program = compile(pattern, CompileOptions::default()).unwrap();
        let mut caps = vec![(None, None); program.n_subm];
        let matched = exec(&program, subject.as_bytes(), &mut caps).unwrap();
        (matched, caps)
    }

    #[test]
    fn literal_is_found_mid_subject() {
        let (m, caps) = run("def", "abcdefghi");
        assert!(m);
        assert_eq!(caps[0], (Some(3), Some(6)));
    }

    #[test]
    fn anchored_matches_after_newline() {
        let (m, _) = run("^def", "abc\ndef\nghi");
        assert!(m);
        let (m2, _) = run("^def", "abcdefghi");
        assert!(!m2);
    }

    #[test]
    fn dollar_matches_before_newline_or_end() {
        let (m, caps) = run("def$", "abcdef\n");
        assert!(m);
        assert_eq!(caps[0], (Some(3), Some(6)));
    }

    #[test]
    fn bounded_repetition_rejects_out_of_range_count() {
        let (m, _) = run("ab{2,4}c", "abbbbbc");
        assert!(!m);
    }

    #[test]
    fn negated_class_matches_excluded_run() {
        let (m, _) = run("[^a-c]{3}", "def");
        assert!(m);
    }

    #[test]
    fn case_fold_toggle_applies_for_remainder_of_pattern() {
        let (m, _) = run(r"\iabc\Iabc", "AbCabc");
        assert!(m);
        let (m2, _) = run(r"\iabc\Iabc", "AbCAbc");
        assert!(!m2);
    }

    #[test]
    fn backreference_matches_prior_capture() {
        let (m, caps) = run(r"(abc) \1", "abc abc");
        assert!(m);
        assert_eq!(caps[1], (Some(0), Some(3)));
    }

    #[test]
    fn case_insensitive_backreference() {
        let (m, _) = run(r"([abc]{3})-\i\1", "abc-ABC");
        assert!(m);
    }

    #[test]
    fn empty_pattern_matches_an_empty_line() {
        let (m, _) = run("^$", "abc\n\ndef");
        assert!(m);
    }

    #[test]
    fn backtracking_over_a_star_group_can_still_fail() {
        let (m, _) = run(r"\(x*\)", "(xxxxxxxxxxxx");
        assert!(!m);
    }

    #[test]
    fn empty_alternative_branch_is_a_noop() {
        let (m, _) = run("a(b|)d", "ad");
        assert!(m);
    }

    #[test]
    fn undefined_backreference_is_a_fatal_error() {
        let program = compile(r"a\1", CompileOptions::default()).unwrap();
        let mut caps = vec![(None, None); program.n_subm];
        let err = exec(&program, b"a", &mut caps).unwrap_err();
        assert_eq!(err, Error::InvalidBackreference);
    }

    #[test]
    fn fewer_caller_slots_than_subm_still_exposes_slot_zero() {
        let program = compile("(a)(b)", CompileOptions::default()).unwrap();
        let mut caps = vec![(None, None); 1];
        let matched = exec(&program, b"ab", &mut caps).unwrap();
        assert!(matched);
        assert_eq!(caps[0], (Some(0), Some(2)));
    }
}
