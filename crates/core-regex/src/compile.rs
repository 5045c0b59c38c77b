//! Bytecode compiler, ported from Kakoune's `RegexCompiler::compile_node`.
//!
//! Unlike the teacher's packed-byte `CompiledRegex`, jump targets here are
//! plain `usize` indices into a `Vec<Inst>` -- idiomatic for a from-scratch
//! Rust VM and sidesteps the original's offset-patching-through-raw-bytes
//! trick entirely.

use crate::ast::{CharMatcher, Node, Op, ParsedRegex};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Inst {
    Match,
    Literal(char),
    LiteralIgnoreCase(char),
    AnyChar,
    Matcher(usize),
    Jump(usize),
    /// Continue at `pc + 1` (higher priority), push a thread at `target`.
    SplitPrioParent(usize),
    /// Continue at `target` (higher priority), push a thread at `pc + 1`.
    SplitPrioChild(usize),
    Save(usize),
    LineStart,
    LineEnd,
    WordBoundary,
    NotWordBoundary,
    SubjectBegin,
    SubjectEnd,
    LookAhead(Arc<[char]>),
    NegativeLookAhead(Arc<[char]>),
    LookBehind(Arc<[char]>),
    NegativeLookBehind(Arc<[char]>),
}

#[derive(Debug, Clone)]
pub struct CompiledRegex {
    pub program: Vec<Inst>,
    /// Index of the first instruction of the actual pattern body, i.e. right
    /// after the three-instruction search preamble.
    pub body_start: usize,
    pub save_count: usize,
    pub matchers: Vec<CharMatcher>,
    pub named_captures: Vec<(String, usize)>,
}

pub fn compile(parsed: &ParsedRegex) -> CompiledRegex {
    let mut compiler = Compiler { prog: Vec::new() };
    let body_start = compiler.write_search_prefix();
    compiler.compile_node(&parsed.root);
    compiler.emit(Inst::Match);
    CompiledRegex {
        program: compiler.prog,
        body_start,
        save_count: parsed.capture_count * 2,
        matchers: parsed.matchers.clone(),
        named_captures: parsed.named_captures.clone(),
    }
}

struct Compiler {
    prog: Vec<Inst>,
}

impl Compiler {
    fn emit(&mut self, inst: Inst) -> usize {
        self.prog.push(inst);
        self.prog.len() - 1
    }

    fn patch(&mut self, idx: usize, target: usize) {
        match &mut self.prog[idx] {
            Inst::Jump(t) | Inst::SplitPrioParent(t) | Inst::SplitPrioChild(t) => *t = target,
            other => unreachable!("patch() called on non-jump instruction {other:?}"),
        }
    }

    /// The unconditional `.*?`-style search preamble: try the body first
    /// (`Split_PrioritizeChild` to body), else consume one char and retry
    /// from one position later (`Split_PrioritizeParent` loops back).
    fn write_search_prefix(&mut self) -> usize {
        let split1 = self.emit(Inst::SplitPrioChild(0));
        let any = self.emit(Inst::AnyChar);
        let split2 = self.emit(Inst::SplitPrioParent(0));
        let body_start = self.prog.len();
        self.patch(split1, body_start);
        self.patch(split2, any);
        body_start
    }

    fn compile_node(&mut self, node: &Node) -> usize {
        let pos = self.prog.len();
        let q = &node.quantifier;

        if q.max == Some(0) {
            // {0,0}: matches the empty string, nothing to emit.
            return pos;
        }

        let mut end_patches: Vec<usize> = Vec::new();

        if q.allows_none() {
            let idx = self.emit(if q.greedy {
                Inst::SplitPrioParent(0)
            } else {
                Inst::SplitPrioChild(0)
            });
            end_patches.push(idx);
        }

        // Unroll the mandatory minimum; the last unrolled copy doubles as the
        // loop body for an unbounded tail (or stays a one-shot body for `?`).
        let mandatory = q.min.max(1);
        let mut inner_start = pos;
        for _ in 0..mandatory {
            inner_start = self.compile_node_inner(node);
        }

        if q.allows_infinite_repeat() {
            let idx = self.emit(if q.greedy {
                Inst::SplitPrioChild(0)
            } else {
                Inst::SplitPrioParent(0)
            });
            self.patch(idx, inner_start);
        } else if let Some(max) = q.max {
            for _ in mandatory..max {
                let idx = self.emit(if q.greedy {
                    Inst::SplitPrioParent(0)
                } else {
                    Inst::SplitPrioChild(0)
                });
                end_patches.push(idx);
                self.compile_node_inner(node);
            }
        }

        for idx in end_patches {
            self.patch(idx, self.prog.len());
        }
        pos
    }

    fn compile_node_inner(&mut self, node: &Node) -> usize {
        let start = self.prog.len();
        let capture = match node.op {
            Op::Sequence | Op::Alternation => node.capture,
            _ => None,
        };
        if let Some(idx) = capture {
            self.emit(Inst::Save(idx * 2));
        }
        match &node.op {
            Op::Literal(c) => {
                self.emit(if node.ignore_case {
                    Inst::LiteralIgnoreCase(c.to_lowercase().next().unwrap_or(*c))
                } else {
                    Inst::Literal(*c)
                });
            }
            Op::AnyChar => {
                self.emit(Inst::AnyChar);
            }
            Op::Matcher(id) => {
                self.emit(Inst::Matcher(*id));
            }
            Op::Sequence => {
                for child in &node.children {
                    self.compile_node(child);
                }
            }
            Op::Alternation => {
                let split_idx = self.emit(Inst::SplitPrioParent(0));
                self.compile_node(&node.children[0]);
                let jump_idx = self.emit(Inst::Jump(0));
                let right_pos = self.prog.len();
                self.patch(split_idx, right_pos);
                self.compile_node(&node.children[1]);
                self.patch(jump_idx, self.prog.len());
            }
            Op::LineStart => {
                self.emit(Inst::LineStart);
            }
            Op::LineEnd => {
                self.emit(Inst::LineEnd);
            }
            Op::WordBoundary => {
                self.emit(Inst::WordBoundary);
            }
            Op::NotWordBoundary => {
                self.emit(Inst::NotWordBoundary);
            }
            Op::SubjectBegin => {
                self.emit(Inst::SubjectBegin);
            }
            Op::SubjectEnd => {
                self.emit(Inst::SubjectEnd);
            }
            Op::ResetStart => {
                self.emit(Inst::Save(0));
            }
            Op::LookAhead => {
                self.emit(Inst::LookAhead(node.lookaround_literal.as_slice().into()));
            }
            Op::NegativeLookAhead => {
                self.emit(Inst::NegativeLookAhead(
                    node.lookaround_literal.as_slice().into(),
                ));
            }
            Op::LookBehind => {
                self.emit(Inst::LookBehind(node.lookaround_literal.as_slice().into()));
            }
            Op::NegativeLookBehind => {
                self.emit(Inst::NegativeLookBehind(
                    node.lookaround_literal.as_slice().into(),
                ));
            }
        }
        if let Some(idx) = capture {
            self.emit(Inst::Save(idx * 2 + 1));
        }
        start
    }
}
