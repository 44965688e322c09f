// engine/backtrack/exec.rs - Backtracking VM.
//
// One explicit stack per run. Look-ahead and atomic bodies execute in a
// nested run whose leftover alternatives are discarded on success.

use memchr::memchr;
use tracing::warn;

use super::compile::Inst;
use super::parse::{fold, Assertion, CharType};
use super::BacktrackProgram;
use crate::encodings::utf8::{char_len, decode, decode_prev};
use crate::region::Region;

/// Backtracks allowed per start position before a search gives up.
pub const DEFAULT_RETRY_LIMIT_IN_MATCH: u64 = 10_000_000;

enum Frame {
    Alt { pc: usize, pos: usize },
    Slot { slot: usize, old: Option<usize> },
    Reg { reg: usize, old: usize },
}

struct Machine<'a> {
    insts: &'a [Inst],
    text: &'a [u8],
    search_start: usize,
    ascii: bool,
    slots: Vec<Option<usize>>,
    regs: Vec<usize>,
    retries: u64,
    retry_limit: u64,
    aborted: bool,
}

/// Leftmost search from `start`.
pub fn search(prog: &BacktrackProgram, text: &[u8], start: usize) -> Option<Region> {
    if start > text.len() {
        return None;
    }
    let mut m = Machine {
        insts: &prog.insts,
        text,
        search_start: start,
        ascii: prog.ascii,
        slots: vec![None; (prog.num_groups + 1) * 2],
        regs: vec![0; prog.num_regs],
        retries: 0,
        retry_limit: prog.retry_limit,
        aborted: false,
    };
    let mut at = start;
    loop {
        if let Some(byte) = prog.prefix {
            at += memchr(byte, &text[at..])?;
        }
        m.slots.iter_mut().for_each(|s| *s = None);
        m.retries = 0;
        if m.run(0, at, prog.longest).is_some() {
            if m.aborted {
                warn!(
                    limit = prog.retry_limit,
                    position = at,
                    "retry-limit-in-match over, reporting longest match so far"
                );
            }
            return Some(m.region());
        }
        if m.aborted {
            warn!(
                limit = prog.retry_limit,
                position = at,
                "retry-limit-in-match over, reporting no match"
            );
            return None;
        }
        if prog.anchored || at >= text.len() {
            return None;
        }
        at += char_len(text, at).max(1);
    }
}

impl<'a> Machine<'a> {
    fn region(&self) -> Region {
        let n = self.slots.len() / 2;
        let mut region = Region::new(n);
        for i in 0..n {
            if let (Some(s), Some(e)) = (self.slots[i * 2], self.slots[i * 2 + 1]) {
                region.set(i, Some((s, e)));
            }
        }
        region
    }

    fn backtrack(&mut self, stack: &mut Vec<Frame>) -> Option<(usize, usize)> {
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Slot { slot, old } => self.slots[slot] = old,
                Frame::Reg { reg, old } => self.regs[reg] = old,
                Frame::Alt { pc, pos } => {
                    self.retries += 1;
                    if self.retries > self.retry_limit {
                        self.aborted = true;
                        return None;
                    }
                    return Some((pc, pos));
                }
            }
        }
        None
    }

    /// Runs from `pc` until `Match` or `Succeed`; returns the end position.
    /// In `longest` mode every path is explored and the longest one kept,
    /// even when the retry limit cuts the exploration short.
    fn run(&mut self, mut pc: usize, mut pos: usize, longest: bool) -> Option<usize> {
        let insts = self.insts;
        let text = self.text;
        let mut stack: Vec<Frame> = Vec::new();
        let mut best: Option<(usize, Vec<Option<usize>>)> = None;
        loop {
            let advanced = match &insts[pc] {
                Inst::Char(c) => match decode(text, pos) {
                    Some((ch, len)) if ch == *c => Some((pc + 1, pos + len)),
                    _ => None,
                },
                Inst::CharFold(c) => match decode(text, pos) {
                    Some((ch, len)) if fold(ch, self.ascii) == *c => Some((pc + 1, pos + len)),
                    _ => None,
                },
                Inst::Any => match decode(text, pos) {
                    Some((ch, len)) if ch != '\n' => Some((pc + 1, pos + len)),
                    _ => None,
                },
                Inst::AnyNl => decode(text, pos).map(|(_, len)| (pc + 1, pos + len)),
                Inst::Class { class, icase } => match decode(text, pos) {
                    Some((ch, len)) if class.matches(ch, *icase, self.ascii) => {
                        Some((pc + 1, pos + len))
                    }
                    _ => None,
                },
                Inst::Assert(a) => self.assert(*a, pos).then_some((pc + 1, pos)),
                Inst::Save(slot) => {
                    stack.push(Frame::Slot {
                        slot: *slot,
                        old: self.slots[*slot],
                    });
                    self.slots[*slot] = Some(pos);
                    Some((pc + 1, pos))
                }
                Inst::Split(x, y) => {
                    stack.push(Frame::Alt { pc: *y, pos });
                    Some((*x, pos))
                }
                Inst::Jmp(target) => Some((*target, pos)),
                Inst::EmptyCheckStart(reg) => {
                    stack.push(Frame::Reg {
                        reg: *reg,
                        old: self.regs[*reg],
                    });
                    self.regs[*reg] = pos;
                    Some((pc + 1, pos))
                }
                Inst::EmptyCheckEnd { reg, exit } => {
                    if self.regs[*reg] == pos {
                        Some((*exit, pos))
                    } else {
                        Some((pc + 1, pos))
                    }
                }
                Inst::BackRef { groups, icase } => {
                    self.backref(groups, *icase, pos).map(|end| (pc + 1, end))
                }
                Inst::Look { negate, end } => {
                    let snapshot = self.slots.clone();
                    let hit = self.run(pc + 1, pos, false).is_some();
                    if self.aborted {
                        break;
                    }
                    if *negate {
                        self.slots = snapshot;
                        (!hit).then_some((*end, pos))
                    } else if hit {
                        self.keep_slots(&snapshot, &mut stack);
                        Some((*end, pos))
                    } else {
                        None
                    }
                }
                Inst::Atomic { end } => {
                    let snapshot = self.slots.clone();
                    let hit = self.run(pc + 1, pos, false);
                    if self.aborted {
                        break;
                    }
                    match hit {
                        Some(after) => {
                            self.keep_slots(&snapshot, &mut stack);
                            Some((*end, after))
                        }
                        None => None,
                    }
                }
                Inst::Succeed => return Some(pos),
                Inst::Match => {
                    if !longest {
                        return Some(pos);
                    }
                    if best.as_ref().map_or(true, |(end, _)| pos > *end) {
                        best = Some((pos, self.slots.clone()));
                    }
                    None
                }
            };
            match advanced {
                Some((next_pc, next_pos)) => {
                    pc = next_pc;
                    pos = next_pos;
                }
                None => match self.backtrack(&mut stack) {
                    Some((next_pc, next_pos)) => {
                        pc = next_pc;
                        pos = next_pos;
                    }
                    None => break,
                },
            }
        }
        // an aborted longest run still reports the best match it reached
        let (end, slots) = best?;
        self.slots = slots;
        Some(end)
    }

    // Slots changed by a committed nested run are restored when the outer
    // run backtracks past it.
    fn keep_slots(&self, snapshot: &[Option<usize>], stack: &mut Vec<Frame>) {
        for (slot, (old, new)) in snapshot.iter().zip(&self.slots).enumerate() {
            if old != new {
                stack.push(Frame::Slot { slot, old: *old });
            }
        }
    }

    fn is_word_at(&self, pos: usize) -> bool {
        decode(self.text, pos).is_some_and(|(ch, _)| CharType::Word.matches(ch, self.ascii))
    }

    fn is_word_before(&self, pos: usize) -> bool {
        decode_prev(self.text, pos).is_some_and(|(ch, _)| CharType::Word.matches(ch, self.ascii))
    }

    fn assert(&self, a: Assertion, pos: usize) -> bool {
        let text = self.text;
        match a {
            Assertion::LineStart => pos == 0 || text[pos - 1] == b'\n',
            Assertion::LineEnd => pos == text.len() || text[pos] == b'\n',
            Assertion::TextStart => pos == 0,
            Assertion::TextEnd => pos == text.len(),
            Assertion::TextEndNewline => {
                pos == text.len() || (pos + 1 == text.len() && text[pos] == b'\n')
            }
            Assertion::WordBoundary => self.is_word_before(pos) != self.is_word_at(pos),
            Assertion::NotWordBoundary => self.is_word_before(pos) == self.is_word_at(pos),
            Assertion::SearchStart => pos == self.search_start,
        }
    }

    /// Tries the groups last to first and takes the first set one whose text
    /// matches at `pos`.
    fn backref(&self, groups: &[usize], icase: bool, pos: usize) -> Option<usize> {
        for &g in groups.iter().rev() {
            let (Some(s), Some(e)) = (self.slots[g * 2], self.slots[g * 2 + 1]) else {
                continue;
            };
            let captured = &self.text[s..e];
            if !icase {
                if self.text[pos..].starts_with(captured) {
                    return Some(pos + captured.len());
                }
                continue;
            }
            let mut i = 0;
            let mut j = pos;
            let mut ok = true;
            while i < captured.len() {
                match (decode(captured, i), decode(self.text, j)) {
                    (Some((a, la)), Some((b, lb))) if fold(a, self.ascii) == fold(b, self.ascii) => {
                        i += la;
                        j += lb;
                    }
                    _ => {
                        ok = false;
                        break;
                    }
                }
            }
            if ok {
                return Some(j);
            }
        }
        None
    }
}
