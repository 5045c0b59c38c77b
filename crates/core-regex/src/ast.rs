//! Parsed regex tree, ported from Kakoune's `ParsedRegex`/`AstNode`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantifier {
    pub min: u32,
    pub max: Option<u32>,
    pub greedy: bool,
}

impl Quantifier {
    pub const ONE: Quantifier = Quantifier {
        min: 1,
        max: Some(1),
        greedy: true,
    };

    pub fn allows_none(&self) -> bool {
        self.min == 0
    }

    pub fn allows_infinite_repeat(&self) -> bool {
        self.max.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Literal(char),
    AnyChar,
    Matcher(usize),
    Sequence,
    Alternation,
    LineStart,
    LineEnd,
    WordBoundary,
    NotWordBoundary,
    SubjectBegin,
    SubjectEnd,
    ResetStart,
    LookAhead,
    LookBehind,
    NegativeLookAhead,
    NegativeLookBehind,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub op: Op,
    /// Byte-offset-independent capture slot index; only meaningful on
    /// `Sequence`/`Alternation` nodes that are the body of a capturing group.
    pub capture: Option<usize>,
    pub quantifier: Quantifier,
    pub ignore_case: bool,
    /// Literal codepoints for the two lookaround variants; Kakoune requires
    /// lookaround bodies to be a plain literal sequence (`validate_lookaround`).
    pub lookaround_literal: Vec<char>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(op: Op) -> Node {
        Node {
            op,
            capture: None,
            quantifier: Quantifier::ONE,
            ignore_case: false,
            lookaround_literal: Vec::new(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedRegex {
    pub root: Node,
    pub capture_count: usize,
    pub named_captures: Vec<(String, usize)>,
    pub matchers: Vec<CharMatcher>,
}

/// A compiled character-class or class-escape test. Stored by index so the
/// `Node` tree and the compiled program can stay `Clone`-able without boxing
/// a trait object into every leaf.
pub type CharMatcher = std::sync::Arc<dyn Fn(char) -> bool + Send + Sync>;
