//! Thompson-NFA executor, ported from Kakoune's `ThreadedRegexVM`.
//!
//! Threads carry a copy-on-write capture-slot vector (`Rc<Vec<Option<usize>>>`,
//! mutated through `Rc::make_mut`) instead of the original's hand-rolled
//! refcounted byte buffer -- `Rc::make_mut` already gives the same
//! clone-only-when-shared behaviour idiomatically.

use crate::ast::CharMatcher;
use crate::compile::{CompiledRegex, Inst};
use bitflags::bitflags;
use std::rc::Rc;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RegexExecFlags: u32 {
        /// Try matching starting at any position, not just the subject start.
        const SEARCH = 1 << 0;
        /// `^`/`\A` must not match right at the search start position (used
        /// when resuming a search just past a previous match).
        const NOT_INITIAL_NULL = 1 << 1;
        const NOT_BEGIN_OF_LINE = 1 << 2;
        const NOT_END_OF_LINE = 1 << 3;
        const NOT_BEGIN_OF_WORD = 1 << 4;
        const NOT_END_OF_WORD = 1 << 5;
        const NOT_BEGIN_OF_SUBJECT = 1 << 6;
    }
}

pub type Saves = Rc<Vec<Option<usize>>>;

#[derive(Clone)]
struct Thread {
    pc: usize,
    saves: Saves,
}

/// Result of a single char-index match: capture slot `2*n`/`2*n+1` hold the
/// start/end char offsets of capture group `n` (`0` is the whole match).
#[derive(Debug, Clone)]
pub struct MatchCaptures {
    pub slots: Vec<Option<usize>>,
}

impl MatchCaptures {
    pub fn group(&self, index: usize) -> Option<(usize, usize)> {
        let start = self.slots.get(index * 2).copied().flatten()?;
        let end = self.slots.get(index * 2 + 1).copied().flatten()?;
        Some((start, end))
    }
}

/// Runs `regex` over `subject` (already split into codepoints). `start` is
/// the char index to begin at; with `SEARCH` set, matching may begin later.
pub fn exec(
    regex: &CompiledRegex,
    subject: &[char],
    start: usize,
    flags: RegexExecFlags,
) -> Option<MatchCaptures> {
    let entry_pc = if flags.contains(RegexExecFlags::SEARCH) {
        0
    } else {
        regex.body_start
    };
    let initial: Saves = Rc::new(vec![None; regex.save_count]);
    exec_from(regex, subject, start, entry_pc, initial, flags)
        .map(|saves| MatchCaptures { slots: (*saves).clone() })
}

fn exec_from(
    regex: &CompiledRegex,
    subject: &[char],
    begin: usize,
    entry_pc: usize,
    initial_saves: Saves,
    flags: RegexExecFlags,
) -> Option<Saves> {
    let search = flags.contains(RegexExecFlags::SEARCH);
    let mut current: Vec<Thread> = vec![Thread {
        pc: entry_pc,
        saves: initial_saves,
    }];
    let mut next: Vec<Thread> = Vec::new();
    let mut found: Option<Saves> = None;
    let mut pos = begin;
    // Sparse "already on this step's thread list" set, re-zeroed once per
    // character position. A nullable subexpression under an unbounded
    // quantifier (`(a?)*`) otherwise re-enters the same epsilon cycle
    // forever: this bounds the number of threads considered per position
    // to `regex.program.len()`, as the Thompson construction requires.
    let mut visited = vec![false; regex.program.len()];

    while pos < subject.len() {
        let cp = Some(subject[pos]);
        visited.iter_mut().for_each(|v| *v = false);
        while let Some(mut thread) = current.pop() {
            match step(regex, pos, cp, &mut thread, &mut current, &mut visited, subject, flags) {
                StepResult::Matched => {
                    let accept = search && !(flags.contains(RegexExecFlags::NOT_INITIAL_NULL) && pos == begin);
                    if accept {
                        found = Some(Rc::clone(&thread.saves));
                        current.clear();
                        break;
                    }
                }
                StepResult::Failed => {}
                StepResult::Consumed => {
                    if !next.iter().any(|t| t.pc == thread.pc) {
                        next.push(thread);
                    }
                }
            }
        }
        if next.is_empty() {
            return found;
        }
        std::mem::swap(&mut current, &mut next);
        current.reverse();
        pos += 1;
    }

    visited.iter_mut().for_each(|v| *v = false);
    while let Some(mut thread) = current.pop() {
        if let StepResult::Matched = step(regex, pos, None, &mut thread, &mut current, &mut visited, subject, flags) {
            return Some(thread.saves);
        }
    }
    found
}

enum StepResult {
    Consumed,
    Matched,
    Failed,
}

#[allow(clippy::too_many_arguments)]
fn step(
    regex: &CompiledRegex,
    pos: usize,
    cp: Option<char>,
    thread: &mut Thread,
    queue: &mut Vec<Thread>,
    visited: &mut [bool],
    subject: &[char],
    flags: RegexExecFlags,
) -> StepResult {
    loop {
        // A pc already reached by a higher-priority thread at this position
        // is a redundant (lower-priority) re-derivation -- drop it instead
        // of re-walking the same epsilon edges again.
        if visited[thread.pc] {
            return StepResult::Failed;
        }
        visited[thread.pc] = true;
        match &regex.program[thread.pc] {
            Inst::Match => return StepResult::Matched,
            Inst::Literal(c) => {
                thread.pc += 1;
                return if cp == Some(*c) {
                    StepResult::Consumed
                } else {
                    StepResult::Failed
                };
            }
            Inst::LiteralIgnoreCase(lower) => {
                thread.pc += 1;
                return match cp {
                    Some(c) if c.to_lowercase().next().unwrap_or(c) == *lower => StepResult::Consumed,
                    _ => StepResult::Failed,
                };
            }
            Inst::AnyChar => {
                thread.pc += 1;
                return StepResult::Consumed;
            }
            Inst::Matcher(id) => {
                thread.pc += 1;
                return match cp {
                    Some(c) if matches_at(&regex.matchers, *id, c) => StepResult::Consumed,
                    _ => StepResult::Failed,
                };
            }
            Inst::Jump(target) => {
                thread.pc = *target;
            }
            Inst::SplitPrioParent(target) => {
                let child = Thread {
                    pc: *target,
                    saves: Rc::clone(&thread.saves),
                };
                queue.push(child);
                thread.pc += 1;
            }
            Inst::SplitPrioChild(target) => {
                let parent = Thread {
                    pc: thread.pc + 1,
                    saves: Rc::clone(&thread.saves),
                };
                queue.push(parent);
                thread.pc = *target;
            }
            Inst::Save(slot) => {
                let saves = Rc::make_mut(&mut thread.saves);
                saves[*slot] = Some(pos);
                thread.pc += 1;
            }
            Inst::LineStart => {
                if !is_line_start(subject, pos, flags) {
                    return StepResult::Failed;
                }
                thread.pc += 1;
            }
            Inst::LineEnd => {
                if !is_line_end(subject, pos, flags) {
                    return StepResult::Failed;
                }
                thread.pc += 1;
            }
            Inst::WordBoundary => {
                if !is_word_boundary(subject, pos, flags) {
                    return StepResult::Failed;
                }
                thread.pc += 1;
            }
            Inst::NotWordBoundary => {
                if is_word_boundary(subject, pos, flags) {
                    return StepResult::Failed;
                }
                thread.pc += 1;
            }
            Inst::SubjectBegin => {
                if !(pos == 0 && !flags.contains(RegexExecFlags::NOT_BEGIN_OF_SUBJECT)) {
                    return StepResult::Failed;
                }
                thread.pc += 1;
            }
            Inst::SubjectEnd => {
                if pos != subject.len() {
                    return StepResult::Failed;
                }
                thread.pc += 1;
            }
            Inst::LookAhead(literal) => {
                if !matches_literal_forward(subject, pos, literal) {
                    return StepResult::Failed;
                }
                thread.pc += 1;
            }
            Inst::NegativeLookAhead(literal) => {
                if matches_literal_forward(subject, pos, literal) {
                    return StepResult::Failed;
                }
                thread.pc += 1;
            }
            Inst::LookBehind(literal) => {
                if !matches_literal_backward(subject, pos, literal) {
                    return StepResult::Failed;
                }
                thread.pc += 1;
            }
            Inst::NegativeLookBehind(literal) => {
                if matches_literal_backward(subject, pos, literal) {
                    return StepResult::Failed;
                }
                thread.pc += 1;
            }
        }
    }
}

fn matches_at(matchers: &[CharMatcher], id: usize, c: char) -> bool {
    matchers[id](c)
}

fn matches_literal_forward(subject: &[char], pos: usize, literal: &[char]) -> bool {
    if pos + literal.len() > subject.len() {
        return false;
    }
    subject[pos..pos + literal.len()] == *literal
}

fn matches_literal_backward(subject: &[char], pos: usize, literal: &[char]) -> bool {
    if literal.len() > pos {
        return false;
    }
    subject[pos - literal.len()..pos] == *literal
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_line_start(subject: &[char], pos: usize, flags: RegexExecFlags) -> bool {
    if pos == 0 {
        return !flags.contains(RegexExecFlags::NOT_BEGIN_OF_LINE);
    }
    subject[pos - 1] == '\n'
}

fn is_line_end(subject: &[char], pos: usize, flags: RegexExecFlags) -> bool {
    if pos == subject.len() {
        return !flags.contains(RegexExecFlags::NOT_END_OF_LINE);
    }
    subject[pos] == '\n'
}

fn is_word_boundary(subject: &[char], pos: usize, flags: RegexExecFlags) -> bool {
    let before = if pos == 0 {
        None
    } else {
        Some(is_word_char(subject[pos - 1]))
    };
    let after = if pos == subject.len() {
        None
    } else {
        Some(is_word_char(subject[pos]))
    };
    match (before, after) {
        (None, None) => false,
        (None, Some(w)) => w && !flags.contains(RegexExecFlags::NOT_BEGIN_OF_WORD),
        (Some(w), None) => w && !flags.contains(RegexExecFlags::NOT_END_OF_WORD),
        (Some(a), Some(b)) => a != b,
    }
}
