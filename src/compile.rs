// Copyright 2014-2025 The wregex Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://github.com/wregex-rs/wregex/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The recursive-descent compiler: pattern -> list -> element -> value ->
//! sets, straight off `wrx_comp.c`. No intermediate AST — each production
//! emits `State`s directly into a [`StateTable`] and leaves one
//! `(begin, end)` [`Segment`] on a [`SegmentStack`] for its caller to wire
//! up, exactly as the original does with its own segment stack.
//!
//! ```text
//! pattern ::= ["^"] [list] ["$"]
//! list    ::= element ["|" list]
//! element ::= ("(" [":"] list ")" | value)
//!             [(("*"|"+"|"?")["?"]) | ("{" [digit+] ["," [digit+]] "}" ["?"])]
//!             [element]
//! value   ::= literal | "[" ["^"] sets "]" | "." | "<" | ">" | escape
//! sets    ::= (c ["-" c])+
//! ```

use crate::charset::ClassSet;
use crate::error::{CompileError, Error};
use crate::inst::{Opcode, Payload, StateIdx, StateTable, MAX_STATES};
use crate::program::Program;
use crate::segment::SegmentStack;

const ESC: u8 = b'\\';

/// Per-compile limits, the Rust-native stand-in for the original's fixed
/// `0x7FFF`-state ceiling.
///
/// `Regex::new` uses [`CompileOptions::default`]; `Regex::with_options` lets
/// a caller lower `max_states` to bound how much memory an untrusted pattern
/// can make the compiler allocate before it ever starts matching.
#[derive(Clone, Copy, Debug)]
pub struct CompileOptions {
    /// The largest number of NFA states a single compile may produce.
    /// Clamped to [`MAX_STATES`] regardless of what's requested here: state
    /// indices are a [`StateIdx`] and can't address more than that.
    pub max_states: usize,
}

impl Default for CompileOptions {
    fn default() -> CompileOptions {
        CompileOptions { max_states: MAX_STATES }
    }
}

/// Parses `isspace` the way the original's C locale does: space plus the
/// `0x09..=0x0D` control range (`\t\n\v\f\r`).
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | 0x09..=0x0D)
}

/// `isgraph`: printable and not a space.
fn is_graph(b: u8) -> bool {
    b.is_ascii_graphic()
}

/// Builds a [`ClassSet`] from a literal spec like `"a-zA-Z"`: a sequence of
/// single characters and `x-y` ranges. Mirrors `create_bv()` in
/// `wrx_comp.c`; only ever called here with the fixed literals the `\d`,
/// `\w`, ... shorthands expand to.
fn bv_from_spec(spec: &[u8]) -> ClassSet {
    let mut cs = ClassSet::empty();
    let mut i = 0;
    while i < spec.len() {
        let lo = spec[i];
        if i + 2 < spec.len() && spec[i + 1] == b'-' {
            cs.set_range(lo, spec[i + 2]);
            i += 3;
        } else {
            cs.set(lo);
            i += 1;
        }
    }
    cs
}

struct Compiler<'p> {
    pattern: &'p [u8],
    pos: usize,
    states: StateTable,
    segs: SegmentStack,
    n_subm: usize,
    ci: bool,
    anchored: bool,
}

impl<'p> Compiler<'p> {
    fn new(pattern: &'p [u8], options: CompileOptions) -> Compiler<'p> {
        Compiler {
            pattern,
            pos: 0,
            states: StateTable::with_limit(pattern.len(), options.max_states),
            segs: SegmentStack::new(),
            n_subm: 1,
            ci: false,
            anchored: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.pattern.get(self.pos).copied()
    }

    fn peek_at(&self, ofs: usize) -> Option<u8> {
        self.pattern.get(self.pos + ofs).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn err(&self, kind: Error) -> CompileError {
        CompileError::new(kind, self.pos)
    }

    fn push_state(&mut self, op: Opcode) -> Result<StateIdx, CompileError> {
        self.states.push(op).map_err(|kind| self.err(kind))
    }

    fn duplicate_range(
        &mut self,
        sub1: StateIdx,
        sub2: StateIdx,
        ofs: StateIdx,
    ) -> Result<(), CompileError> {
        let mut j = sub1;
        while j < sub2 {
            let k = self.states.duplicate(j).map_err(|kind| self.err(kind))?;
            if self.states[k].s[0] != crate::inst::NONE {
                self.states[k].s[0] += ofs;
            }
            if self.states[k].s[1] != crate::inst::NONE {
                self.states[k].s[1] += ofs;
            }
            j += 1;
        }
        Ok(())
    }

    /// `pattern ::= ["^"] [list] ["$"]`, wrapped in the `REC`/`STP` pair for
    /// submatch 0 — except for the two early-return special cases below,
    /// which the original leaves unwrapped too.
    fn pattern(&mut self) -> Result<(), CompileError> {
        if self.peek().is_none() {
            let b = self.push_state(Opcode::Mev)?;
            self.segs.push(b, b);
            return Ok(());
        }

        let mut bol = false;
        let mut has_list = false;

        if self.peek() == Some(b'^') {
            bol = true;
            self.anchored = true;
            let b = self.push_state(Opcode::Bol)?;
            self.segs.push(b, b);
            self.bump();
            if self.peek().is_none() {
                return Ok(());
            }
        }

        if self.peek() != Some(b'$') {
            has_list = true;
            self.list()?;
        }

        if bol && has_list {
            let m2 = self.segs.pop();
            let m1 = self.segs.pop();
            self.states.transition(m1.end, m2.begin);
            self.segs.push(m1.begin, m2.end);
        }

        if self.peek() == Some(b'$') {
            if !bol && !has_list {
                let b = self.push_state(Opcode::Mev)?;
                self.segs.push(b, b);
            }

            self.bump();
            if self.peek().is_some() {
                return Err(self.err(Error::DollarNotAtEnd));
            }

            let b = self.push_state(Opcode::Eol)?;
            let e = self.push_state(Opcode::Mov)?;
            self.states.transition(b, e);

            let m1 = self.segs.pop();
            self.states.transition(m1.end, b);
            self.segs.push(m1.begin, e);
        }

        // Submatch 0 records the whole match.
        let m1 = self.segs.pop();
        let b = self.push_state(Opcode::Rec)?;
        self.states[b].payload = Payload::Slot(0);
        let e = self.push_state(Opcode::Stp)?;
        self.states[e].payload = Payload::Slot(0);
        self.states.transition(b, m1.begin);
        self.states.transition(m1.end, e);
        self.segs.push(b, e);

        Ok(())
    }

    /// `list ::= element ["|" list]`
    fn list(&mut self) -> Result<(), CompileError> {
        self.element()?;

        if self.peek() == Some(b'|') {
            self.bump();

            let m1 = self.segs.pop();
            let (b, e) = (m1.begin, m1.end);

            self.list()?;
            let m2 = self.segs.pop();

            let n1 = self.push_state(Opcode::Chc)?;
            let n2 = self.push_state(Opcode::Mov)?;
            self.states.transition(n1, b);
            self.states.transition(n1, m2.begin);
            self.states.transition(e, n2);
            self.states.transition(m2.end, n2);
            self.segs.push(n1, n2);
        }

        Ok(())
    }

    /// `element ::= ("(" [":"] list ")" | value) [quantifier] [element]`
    fn element(&mut self) -> Result<(), CompileError> {
        let sub1 = self.states.len() as StateIdx;

        if self.peek() == Some(b'$') {
            return Ok(());
        }

        if self.peek() == Some(b'(') {
            let capturing = if self.peek_at(1) == Some(b':') {
                self.pos += 2;
                None
            } else {
                let idx = self.n_subm;
                self.n_subm += 1;
                self.bump();
                Some(idx)
            };

            self.list()?;
            if self.peek() != Some(b')') {
                return Err(self.err(Error::UnclosedGroup));
            }

            if let Some(idx) = capturing {
                let m = self.segs.pop();

                let b = self.push_state(Opcode::Rec)?;
                self.states[b].payload = Payload::Slot(idx);
                self.states.transition(b, m.begin);

                let e = self.push_state(Opcode::Stp)?;
                self.states[e].payload = Payload::Slot(idx);
                self.states.transition(m.end, e);

                self.segs.push(b, e);
            }

            self.bump(); // ')'
        } else {
            self.value()?;
        }

        if self.peek() == Some(b'$') {
            return Ok(());
        }

        if let Some(c) = self.peek() {
            if c == b'*' || c == b'+' || c == b'?' {
                let m = self.segs.pop();

                let b = self.push_state(Opcode::Chc)?;
                let e = self.push_state(Opcode::Mov)?;
                self.states.transition(b, m.begin);
                self.states.transition(b, e);

                match c {
                    b'*' => {
                        self.states.transition(m.end, b);
                        self.segs.push(b, e);
                    }
                    b'+' => {
                        self.states.transition(m.end, b);
                        self.segs.push(m.begin, e);
                    }
                    b'?' => {
                        self.states.transition(m.end, e);
                        self.segs.push(b, e);
                    }
                    _ => unreachable!(),
                }

                self.bump();

                if self.peek() == Some(b'?') {
                    self.bump();
                    self.states.weaken(b);
                }
            } else if c == b'{' {
                self.bounded_quantifier(sub1)?;
            }
        }

        if let Some(c) = self.peek() {
            if c != b'|' && c != b')' && c != b'$' {
                let m1 = self.segs.pop();
                let (b, e) = (m1.begin, m1.end);

                self.element()?;
                let m2 = self.segs.pop();

                self.states.transition(e, m2.begin);
                self.segs.push(b, m2.end);
            }
        }

        Ok(())
    }

    fn bounded_quantifier(&mut self, sub1: StateIdx) -> Result<(), CompileError> {
        self.bump(); // '{'

        let mut boc: u32 = 0;
        let mut eoc: u32 = 0;
        let mut cf: u8 = 0;

        if self.peek().map(|b| b.is_ascii_digit()).unwrap_or(false) {
            cf = 1;
        }
        while let Some(b) = self.peek() {
            if !b.is_ascii_digit() {
                break;
            }
            boc = boc * 10 + (b - b'0') as u32;
            self.bump();
        }

        if self.peek() == Some(b',') {
            cf |= 2;
            self.bump();
            if self.peek().map(|b| b.is_ascii_digit()).unwrap_or(false) {
                cf |= 4;
            }
            while let Some(b) = self.peek() {
                if !b.is_ascii_digit() {
                    break;
                }
                eoc = eoc * 10 + (b - b'0') as u32;
                self.bump();
            }
        }

        if self.peek() != Some(b'}') {
            return Err(self.err(Error::UnclosedBrace));
        }
        self.bump();

        // 0: {} / {,} - treated as '*'.  1: {x}.  3: {x,}.  6: {,y}.
        // 7: {x,y}.  4 and 5 can't occur: they'd need a ',' without the
        // bit that only gets set inside the ',' branch.
        if cf == 7 && boc == eoc {
            cf = 1;
        }

        match cf {
            0 | 2 => self.quantifier_star(),
            1 => self.quantifier_exact(sub1, boc),
            3 => self.quantifier_at_least(sub1, boc),
            6 => self.quantifier_at_most(sub1, eoc),
            7 => self.quantifier_range(sub1, boc, eoc),
            _ => unreachable!("cf=4,5 require a ',' without its own flag bit"),
        }
    }

    /// `{}` / `{,}` - no count at all, same as `*`.
    fn quantifier_star(&mut self) -> Result<(), CompileError> {
        let m = self.segs.pop();

        let b = self.push_state(Opcode::Chc)?;
        let e = self.push_state(Opcode::Mov)?;
        self.states.transition(b, m.begin);
        self.states.transition(b, e);
        self.states.transition(m.end, b);
        self.segs.push(b, e);

        if self.peek() == Some(b'?') {
            self.bump();
            self.states.weaken(b);
        }

        Ok(())
    }

    /// `{boc}` - exactly `boc` repetitions, by duplicating the atom's
    /// states `boc - 1` more times. The trailing `?` has no meaning here
    /// and is only consumed, never acted on (matches the original).
    fn quantifier_exact(&mut self, sub1: StateIdx, boc: u32) -> Result<(), CompileError> {
        let mut sub2 = self.states.len() as StateIdx;
        let m = self.segs.pop();

        let ofs = sub2 - sub1;
        let mut sub1 = sub1;
        let mut b = m.begin + ofs;
        let mut e = m.end;

        for _ in 1..boc {
            self.duplicate_range(sub1, sub2, ofs)?;
            self.states[e].s[0] = b;
            b += ofs;
            e += ofs;
            sub1 += ofs;
            sub2 += ofs;
        }

        if self.peek() == Some(b'?') {
            self.bump();
        }

        self.segs.push(m.begin, e);
        Ok(())
    }

    /// `{boc,}` - at least `boc`, compiled as `boc - 1` mandatory
    /// duplicates followed by a `+` on the last copy ("`aaa+`" for
    /// `a{3,}`).
    fn quantifier_at_least(&mut self, sub1: StateIdx, boc: u32) -> Result<(), CompileError> {
        let mut sub2 = self.states.len() as StateIdx;
        let m = self.segs.pop();

        let ofs = sub2 - sub1;
        let mut sub1 = sub1;
        let mut b = m.begin + ofs;
        let mut e = m.end;

        for _ in 1..boc {
            self.duplicate_range(sub1, sub2, ofs)?;
            self.states[e].s[0] = b;
            b += ofs;
            e += ofs;
            sub1 += ofs;
            sub2 += ofs;
        }

        b -= ofs;
        let i = self.push_state(Opcode::Chc)?;
        let j = self.push_state(Opcode::Mov)?;
        self.states.transition(i, b);
        self.states.transition(i, j);
        self.states.transition(e, i);

        if self.peek() == Some(b'?') {
            self.bump();
            self.states.weaken(i);
        }

        self.segs.push(m.begin, j);
        Ok(())
    }

    /// `{,eoc}` - at most `eoc`, compiled as `A?A?A?...` (`eoc` copies of
    /// an optional `A`).
    fn quantifier_at_most(&mut self, sub1: StateIdx, eoc: u32) -> Result<(), CompileError> {
        let mut m = self.segs.pop();

        let b0 = self.push_state(Opcode::Chc)?;
        let e0 = self.push_state(Opcode::Mov)?;
        self.states.transition(b0, m.begin);
        self.states.transition(b0, e0);
        self.states.transition(m.end, e0);

        if self.peek() == Some(b'?') {
            self.bump();
            self.states.weaken(b0);
        }

        let mut sub2 = self.states.len() as StateIdx;
        m.begin = b0;
        m.end = e0;

        let ofs = sub2 - sub1;
        let mut sub1 = sub1;
        let mut b = b0 + ofs;
        let mut e = e0;

        for _ in 1..eoc {
            self.duplicate_range(sub1, sub2, ofs)?;
            self.states[e].s[0] = b;
            b += ofs;
            e += ofs;
            sub1 += ofs;
            sub2 += ofs;
        }

        self.segs.push(m.begin, e);
        Ok(())
    }

    /// `{boc,eoc}` - evaluated as `AAA?A?A?` (`boc` mandatory copies,
    /// followed by `eoc - boc` optional ones).
    fn quantifier_range(
        &mut self,
        sub1_init: StateIdx,
        boc: u32,
        eoc: u32,
    ) -> Result<(), CompileError> {
        if boc > eoc {
            return Err(self.err(Error::BadBraceRange));
        }

        let mut sub1 = sub1_init;
        let mut sub2 = self.states.len() as StateIdx;
        let m = self.segs.pop();

        let ofs = sub2 - sub1;
        let mut b = m.begin + ofs;
        let mut e = m.end;

        for _ in 1..boc {
            self.duplicate_range(sub1, sub2, ofs)?;
            self.states[e].s[0] = b;
            b += ofs;
            e += ofs;
            sub1 += ofs;
            sub2 += ofs;
        }

        // One further copy, to become the first optional "A?".
        self.duplicate_range(sub1, sub2, ofs)?;

        let chc = self.push_state(Opcode::Chc)?;
        let mov = self.push_state(Opcode::Mov)?;

        self.states[e].s[0] = chc;
        self.states.transition(chc, b);
        self.states.transition(chc, mov);
        e += ofs;
        self.states.transition(e, mov);

        if self.peek() == Some(b'?') {
            self.states.weaken(chc);
        }

        // Recall where the first "A?" lies, and duplicate it
        // (eoc - boc - 1) more times.
        let mut sub1 = sub2;
        let mut sub2 = self.states.len() as StateIdx;
        let ofs = sub2 - sub1;
        let mut b = chc;
        let mut e = mov;

        for _ in boc..eoc - 1 {
            self.duplicate_range(sub1, sub2, ofs)?;
            b += ofs;
            self.states[e].s[0] = b;
            e += ofs;
            sub1 += ofs;
            sub2 += ofs;
        }

        self.segs.push(m.begin, e);

        if self.peek() == Some(b'?') {
            self.bump();
        }

        Ok(())
    }

    /// `value ::= literal | "[" ["^"] sets "]" | "." | "<" | ">" | escape`
    fn value(&mut self) -> Result<(), CompileError> {
        let Some(c) = self.peek() else {
            let b = self.push_state(Opcode::Mov)?;
            self.segs.push(b, b);
            return Ok(());
        };

        if c.is_ascii_alphanumeric() || c == b' ' {
            let b = self.push_state(if self.ci { Opcode::Mci } else { Opcode::Mtc })?;
            self.states[b].payload = Payload::Byte(c);
            let e = self.push_state(Opcode::Mov)?;
            self.states.transition(b, e);
            self.segs.push(b, e);
            self.bump();
        } else if c == b'[' {
            self.bump();

            let b = self.push_state(Opcode::Set)?;
            let e = self.push_state(Opcode::Mov)?;

            let invert = self.peek() == Some(b'^');
            if invert {
                self.bump();
            }

            let mut cs = self.sets()?;
            if invert {
                cs.invert_printable();
            }
            self.states[b].payload = Payload::Class(cs);

            self.states.transition(b, e);
            self.segs.push(b, e);

            if self.peek() == Some(b']') {
                self.bump();
            } else {
                return Err(self.err(Error::UnclosedClass));
            }
        } else if c == b'.' {
            let b = self.push_state(Opcode::Set)?;
            let e = self.push_state(Opcode::Mov)?;

            let mut cs = ClassSet::empty();
            cs.set_range(0x20, 0x7F);
            cs.set(b'\r');
            cs.set(b'\n');
            cs.set(b'\t');
            self.states[b].payload = Payload::Class(cs);

            self.states.transition(b, e);
            self.segs.push(b, e);
            self.bump();
        } else if c == b'<' {
            let b = self.push_state(Opcode::Bow)?;
            let e = self.push_state(Opcode::Mov)?;
            self.states.transition(b, e);
            self.segs.push(b, e);
            self.bump();
        } else if c == b'>' {
            let b = self.push_state(Opcode::Eow)?;
            let e = self.push_state(Opcode::Mov)?;
            self.states.transition(b, e);
            self.segs.push(b, e);
            self.bump();
        } else if c == b'$' {
            // Handled by the caller.
        } else if c == ESC {
            self.bump();
            self.escape()?;
        } else if c != b')' && (is_graph(c) || is_space(c)) {
            let b = self.push_state(Opcode::Mtc)?;
            self.states[b].payload = Payload::Byte(c);
            let e = self.push_state(Opcode::Mov)?;
            self.states.transition(b, e);
            self.segs.push(b, e);
            self.bump();
        } else {
            // Allows constructs such as "(a|)".
            let b = self.push_state(Opcode::Mov)?;
            self.segs.push(b, b);
        }

        Ok(())
    }

    fn escape(&mut self) -> Result<(), CompileError> {
        let Some(c) = self.peek() else {
            return Err(self.err(Error::BadEscape));
        };

        if c == b'i' || c == b'I' {
            self.ci = c == b'i';
            self.bump();
            if self.peek().is_some() && self.peek() != Some(b'$') {
                self.list()?;
            } else {
                let b = self.push_state(Opcode::Mov)?;
                self.segs.push(b, b);
            }
        } else if matches!(c.to_ascii_lowercase(), b'd' | b'a' | b'u' | b'l' | b's' | b'w' | b'x')
        {
            let b = self.push_state(Opcode::Set)?;
            let e = self.push_state(Opcode::Mov)?;

            let mut cs = match c.to_ascii_lowercase() {
                b'd' => bv_from_spec(b"0-9"),
                b'a' => bv_from_spec(b"a-zA-Z"),
                b'u' if self.ci => bv_from_spec(b"a-zA-Z"),
                b'u' => bv_from_spec(b"A-Z"),
                b'l' if self.ci => bv_from_spec(b"a-zA-Z"),
                b'l' => bv_from_spec(b"a-z"),
                b's' => bv_from_spec(b" \t\r\n"),
                b'w' => bv_from_spec(b"0-9a-zA-Z_"),
                b'x' => bv_from_spec(b"a-fA-F0-9"),
                _ => unreachable!(),
            };

            if c.is_ascii_uppercase() {
                cs.invert_printable();
            }

            self.states[b].payload = Payload::Class(cs);
            self.states.transition(b, e);
            self.segs.push(b, e);
            self.bump();
        } else if matches!(c, b'r' | b'n' | b't' | b'b') {
            let op = if c == b'b' { Opcode::Bnd } else { Opcode::Mtc };
            let b = self.push_state(op)?;
            if c != b'b' {
                let byte = match c {
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    _ => unreachable!(),
                };
                self.states[b].payload = Payload::Byte(byte);
            }
            let e = self.push_state(Opcode::Mov)?;
            self.states.transition(b, e);
            self.segs.push(b, e);
            self.bump();
        } else if b".*+?[](){}|^$<>:".contains(&c) || c == ESC {
            let b = self.push_state(Opcode::Mtc)?;
            self.states[b].payload = Payload::Byte(c);
            let e = self.push_state(Opcode::Mov)?;
            self.states.transition(b, e);
            self.segs.push(b, e);
            self.bump();
        } else if c.is_ascii_digit() {
            let mut idx = 0usize;
            while let Some(d) = self.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                idx = idx * 10 + (d - b'0') as usize;
                self.bump();
            }

            let b = self.push_state(if self.ci { Opcode::Bri } else { Opcode::Brf })?;
            self.states[b].payload = Payload::Slot(idx);
            let e = self.push_state(Opcode::Mov)?;
            self.states.transition(b, e);
            self.segs.push(b, e);
        } else {
            self.bump();
            return Err(self.err(Error::BadEscape));
        }

        Ok(())
    }

    /// `sets ::= (c ["-" c])+`, terminated by the `]` that [`Compiler::value`]
    /// checks for afterward. The leading `]` of an empty-looking `[]` is
    /// consumed as an ordinary set member here, matching the original's
    /// do-while loop (there is no way to write an empty class).
    fn sets(&mut self) -> Result<ClassSet, CompileError> {
        let mut cs = ClassSet::empty();

        loop {
            let Some(u) = self.peek() else {
                return Err(self.err(Error::UnclosedClass));
            };

            if u == ESC {
                let Some(esc) = self.peek_at(1) else {
                    return Err(self.err(Error::UnclosedClass));
                };

                match esc {
                    b'r' => cs.set(b'\r'),
                    b'n' => cs.set(b'\n'),
                    b't' => cs.set(b'\t'),
                    b'\\' | b'-' | b'^' | b']' => cs.set(esc),
                    b'd' => cs.set_range(b'0', b'9'),
                    b'a' => {
                        cs.set_range(b'a', b'z');
                        cs.set_range(b'A', b'Z');
                    }
                    b'u' => {
                        cs.set_range(b'A', b'Z');
                        if self.ci {
                            cs.set_range(b'a', b'z');
                        }
                    }
                    b'l' => {
                        cs.set_range(b'a', b'z');
                        if self.ci {
                            cs.set_range(b'A', b'Z');
                        }
                    }
                    b's' => {
                        cs.set(b' ');
                        cs.set(b'\t');
                        cs.set(b'\r');
                        cs.set(b'\n');
                    }
                    b'w' => {
                        cs.set_range(b'a', b'z');
                        cs.set_range(b'A', b'Z');
                        cs.set_range(b'0', b'9');
                        cs.set(b'_');
                    }
                    b'x' => {
                        cs.set_range(b'a', b'f');
                        cs.set_range(b'A', b'F');
                        cs.set_range(b'0', b'9');
                    }
                    _ => {}
                }

                self.pos += 2;
            } else {
                let v;

                if self.peek_at(1) == Some(b'-') {
                    self.pos += 2;
                    let Some(hi) = self.peek() else {
                        return Err(self.err(Error::BadSet));
                    };
                    v = hi;

                    if !u.is_ascii_alphanumeric() || !v.is_ascii_alphanumeric() {
                        return Err(self.err(Error::RangeBadChar));
                    }
                    if u.is_ascii_uppercase() && !v.is_ascii_uppercase() {
                        return Err(self.err(Error::RangeMismatch));
                    }
                    if u.is_ascii_lowercase() && !v.is_ascii_lowercase() {
                        return Err(self.err(Error::RangeMismatch));
                    }
                    if u.is_ascii_digit() && !v.is_ascii_digit() {
                        return Err(self.err(Error::RangeMismatch));
                    }
                } else {
                    v = u;
                }

                self.bump();

                let allowed_control = |b: u8| matches!(b, b'\r' | b'\n' | b'\t');
                if u < 0x20 && !allowed_control(u) {
                    return Err(self.err(Error::BadSet));
                }
                if v < 0x20 && !allowed_control(v) {
                    return Err(self.err(Error::BadSet));
                }
                if v < u {
                    return Err(self.err(Error::RangeOrder));
                }

                if self.ci {
                    for b in u..=v {
                        cs.set(b.to_ascii_uppercase());
                        cs.set(b.to_ascii_lowercase());
                    }
                } else {
                    cs.set_range(u, v);
                }
            }

            if self.peek() == Some(b']') {
                break;
            }
        }

        Ok(cs)
    }
}

/// Compiles `pattern` into a [`Program`] using `options`'s limits.
pub fn compile(pattern: &str, options: CompileOptions) -> Result<Program, CompileError> {
    let bytes = pattern.as_bytes();
    let mut c = Compiler::new(bytes, options);

    c.pattern()?;

    if c.pos != bytes.len() {
        return Err(c.err(Error::InvalidExpression));
    }

    let top = c.segs.finish();
    let stop = c.push_state(Opcode::Eom)?;
    c.states.transition(top.end, stop);

    let start = c.states.optimize(top.begin);

    Ok(Program {
        states: c.states.into_inner(),
        start,
        stop,
        n_subm: c.n_subm,
        anchored: c.anchored,
        original: pattern.to_owned(),
    })
}
