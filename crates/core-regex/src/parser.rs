//! Recursive-descent parser, ported from Kakoune's `RegexParser`.
//!
//! Surface syntax is intentionally narrower than a general-purpose regex
//! dialect: no backreferences, lookaround bodies must be plain literal runs,
//! and `(?i)`/`(?I)` are flag toggles rather than groups (they parse the very
//! next atom under the new case-sensitivity and otherwise affect everything
//! parsed after them, exactly like Kakoune's regex_impl.cc).

use crate::ast::{CharMatcher, Node, Op, ParsedRegex, Quantifier};
use crate::error::RegexError;
use std::sync::Arc;

pub fn parse(pattern: &str) -> Result<ParsedRegex, RegexError> {
    let mut parser = Parser {
        chars: pattern.chars().collect(),
        pos: 0,
        ignore_case: false,
        capture_count: 1,
        matchers: Vec::new(),
        named_captures: Vec::new(),
    };
    let idx = parser.next_capture_index();
    let root = parser.disjunction(Some(idx))?;
    if parser.pos != parser.chars.len() {
        return Err(parser.error(&format!("unexpected '{}'", parser.chars[parser.pos])));
    }
    Ok(ParsedRegex {
        root,
        capture_count: parser.capture_count,
        named_captures: parser.named_captures,
        matchers: parser.matchers,
    })
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    ignore_case: bool,
    capture_count: usize,
    matchers: Vec<CharMatcher>,
    named_captures: Vec<(String, usize)>,
}

impl Parser {
    fn error(&self, message: &str) -> RegexError {
        RegexError::Parse {
            pos: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), RegexError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{c}'")))
        }
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn next_capture_index(&mut self) -> usize {
        let idx = self.capture_count;
        self.capture_count += 1;
        idx
    }

    /// `capture`: `Some(idx)` if this disjunction is the body of a capturing
    /// group already assigned index `idx`; `None` for non-capturing groups.
    fn disjunction(&mut self, capture: Option<usize>) -> Result<Node, RegexError> {
        let mut node = self.alternative(capture)?;
        while self.eat('|') {
            let rhs = self.alternative(None)?;
            let mut alt = Node::leaf(Op::Alternation);
            alt.children = vec![node, rhs];
            node = alt;
        }
        if let Some(idx) = capture {
            node.capture = Some(idx);
        }
        Ok(node)
    }

    fn alternative(&mut self, capture: Option<usize>) -> Result<Node, RegexError> {
        let mut seq = Node::leaf(Op::Sequence);
        seq.capture = capture;
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            seq.children.push(self.term()?);
        }
        Ok(seq)
    }

    fn term(&mut self) -> Result<Node, RegexError> {
        let mut node = match self.assertion()? {
            Some(n) => n,
            None => self.atom()?,
        };
        node.quantifier = self.quantifier()?;
        Ok(node)
    }

    fn quantifier(&mut self) -> Result<Quantifier, RegexError> {
        let (min, max) = match self.peek() {
            Some('*') => {
                self.pos += 1;
                (0, None)
            }
            Some('+') => {
                self.pos += 1;
                (1, None)
            }
            Some('?') => {
                self.pos += 1;
                (0, Some(1))
            }
            Some('{') => {
                let save = self.pos;
                self.pos += 1;
                match self.parse_bounds() {
                    Some(bounds) => bounds,
                    None => {
                        self.pos = save;
                        return Ok(Quantifier::ONE);
                    }
                }
            }
            _ => return Ok(Quantifier::ONE),
        };
        let greedy = !self.eat('?');
        Ok(Quantifier { min, max, greedy })
    }

    fn parse_bounds(&mut self) -> Option<(u32, Option<u32>)> {
        let min = self.parse_number();
        let min = match (min, self.peek()) {
            (Some(n), _) => n,
            (None, Some(',')) => 0,
            _ => return None,
        };
        if self.eat('}') {
            return Some((min, Some(min)));
        }
        if !self.eat(',') {
            return None;
        }
        let max = self.parse_number();
        if !self.eat('}') {
            return None;
        }
        Some((min, max))
    }

    fn parse_number(&mut self) -> Option<u32> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        self.chars[start..self.pos]
            .iter()
            .collect::<String>()
            .parse()
            .ok()
    }

    fn assertion(&mut self) -> Result<Option<Node>, RegexError> {
        let op = match self.peek() {
            Some('^') => Some(Op::LineStart),
            Some('$') => Some(Op::LineEnd),
            Some('\\') => match self.chars.get(self.pos + 1).copied() {
                Some('b') => Some(Op::WordBoundary),
                Some('B') => Some(Op::NotWordBoundary),
                Some('A') => Some(Op::SubjectBegin),
                Some('z') => Some(Op::SubjectEnd),
                Some('K') => Some(Op::ResetStart),
                _ => None,
            },
            _ => None,
        };
        match op {
            Some(op @ (Op::LineStart | Op::LineEnd)) => {
                self.pos += 1;
                Ok(Some(Node::leaf(op)))
            }
            Some(op) => {
                self.pos += 2;
                Ok(Some(Node::leaf(op)))
            }
            None => Ok(None),
        }
    }

    fn atom(&mut self) -> Result<Node, RegexError> {
        match self.peek() {
            Some('.') => {
                self.pos += 1;
                Ok(Node::leaf(Op::AnyChar))
            }
            Some('(') => self.group(),
            Some('[') => self.character_class(),
            Some('\\') => self.atom_escape(),
            Some(c) => {
                self.pos += 1;
                let mut node = Node::leaf(Op::Literal(c));
                node.ignore_case = self.ignore_case;
                Ok(node)
            }
            None => Err(self.error("unexpected end of pattern")),
        }
    }

    fn group(&mut self) -> Result<Node, RegexError> {
        self.pos += 1; // consume '('
        if self.eat('?') {
            if self.eat(':') {
                let node = self.disjunction(None)?;
                self.expect(')')?;
                return Ok(node);
            }
            if self.peek() == Some('=') || self.peek() == Some('!') {
                let negative = self.peek() == Some('!');
                self.pos += 1;
                let body = self.disjunction(None)?;
                self.expect(')')?;
                let literal = literal_run(&body, self)?;
                let mut node = Node::leaf(if negative {
                    Op::NegativeLookAhead
                } else {
                    Op::LookAhead
                });
                node.lookaround_literal = literal;
                return Ok(node);
            }
            if self.eat('<') {
                if self.peek() == Some('=') || self.peek() == Some('!') {
                    let negative = self.peek() == Some('!');
                    self.pos += 1;
                    let body = self.disjunction(None)?;
                    self.expect(')')?;
                    let literal = literal_run(&body, self)?;
                    let mut node = Node::leaf(if negative {
                        Op::NegativeLookBehind
                    } else {
                        Op::LookBehind
                    });
                    node.lookaround_literal = literal;
                    return Ok(node);
                }
                let name_start = self.pos;
                while matches!(self.peek(), Some(c) if c != '>') {
                    self.pos += 1;
                }
                if self.peek() != Some('>') {
                    return Err(self.error("unterminated named capture"));
                }
                let name: String = self.chars[name_start..self.pos].iter().collect();
                self.pos += 1; // consume '>'
                let idx = self.next_capture_index();
                self.named_captures.push((name, idx));
                let node = self.disjunction(Some(idx))?;
                self.expect(')')?;
                return Ok(node);
            }
            if self.peek() == Some('i') || self.peek() == Some('I') {
                self.ignore_case = self.peek() == Some('i');
                self.pos += 1;
                self.expect(')')?;
                return self.atom();
            }
            return Err(self.error("unrecognized group syntax"));
        }
        let idx = self.next_capture_index();
        let node = self.disjunction(Some(idx))?;
        self.expect(')')?;
        Ok(node)
    }

    fn atom_escape(&mut self) -> Result<Node, RegexError> {
        self.pos += 1; // consume '\'
        let c = self.next().ok_or_else(|| self.error("trailing backslash"))?;
        match c {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'h' | 'H' => {
                let matcher = class_escape_matcher(c);
                let idx = self.matchers.len();
                self.matchers.push(matcher);
                Ok(Node::leaf(Op::Matcher(idx)))
            }
            'f' => Ok(self.literal('\u{000C}')),
            'n' => Ok(self.literal('\n')),
            'r' => Ok(self.literal('\r')),
            't' => Ok(self.literal('\t')),
            'v' => Ok(self.literal('\u{000B}')),
            'Q' => {
                let start = self.pos;
                while self.pos < self.chars.len() && !self.at_quote_end() {
                    self.pos += 1;
                }
                let literal: Vec<char> = self.chars[start..self.pos].to_vec();
                if self.at_quote_end() {
                    self.pos += 2;
                }
                let mut seq = Node::leaf(Op::Sequence);
                seq.children = literal.into_iter().map(|c| self.literal(c)).collect();
                Ok(seq)
            }
            c if c.is_ascii_digit() => Err(self.error("backreferences are not supported")),
            c => Ok(self.literal(c)),
        }
    }

    fn at_quote_end(&self) -> bool {
        self.chars.get(self.pos) == Some(&'\\') && self.chars.get(self.pos + 1) == Some(&'E')
    }

    fn literal(&self, c: char) -> Node {
        let mut node = Node::leaf(Op::Literal(c));
        node.ignore_case = self.ignore_case;
        node
    }

    fn character_class(&mut self) -> Result<Node, RegexError> {
        self.pos += 1; // consume '['
        let negative = self.eat('^');
        let mut ranges: Vec<(char, char)> = Vec::new();
        let mut singles: Vec<char> = Vec::new();
        let mut sub_matchers: Vec<CharMatcher> = Vec::new();
        let mut first = true;
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated character class")),
                Some(']') if !first => {
                    self.pos += 1;
                    break;
                }
                _ => {}
            }
            first = false;
            let c = if self.peek() == Some('\\') {
                self.pos += 1;
                let esc = self
                    .next()
                    .ok_or_else(|| self.error("trailing backslash in class"))?;
                match esc {
                    'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'h' | 'H' => {
                        sub_matchers.push(class_escape_matcher(esc));
                        continue;
                    }
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                }
            } else {
                self.next().unwrap()
            };
            if self.peek() == Some('-') && self.chars.get(self.pos + 1) != Some(&']') {
                self.pos += 1;
                let to = if self.peek() == Some('\\') {
                    self.pos += 1;
                    self.next()
                        .ok_or_else(|| self.error("trailing backslash in class range"))?
                } else {
                    self.next()
                        .ok_or_else(|| self.error("unterminated class range"))?
                };
                ranges.push((c, to));
            } else {
                singles.push(c);
            }
        }
        let ignore_case = self.ignore_case;
        let matcher: CharMatcher = Arc::new(move |ch: char| {
            let ch_cmp = if ignore_case {
                ch.to_lowercase().next().unwrap_or(ch)
            } else {
                ch
            };
            let hit = singles.iter().any(|&s| {
                if ignore_case {
                    s.to_lowercase().next().unwrap_or(s) == ch_cmp
                } else {
                    s == ch
                }
            }) || ranges.iter().any(|&(lo, hi)| {
                if ignore_case {
                    let lo_c = lo.to_lowercase().next().unwrap_or(lo);
                    let hi_c = hi.to_lowercase().next().unwrap_or(hi);
                    ch_cmp >= lo_c && ch_cmp <= hi_c
                } else {
                    ch >= lo && ch <= hi
                }
            }) || sub_matchers.iter().any(|m| m(ch));
            hit != negative
        });
        let idx = self.matchers.len();
        self.matchers.push(matcher);
        Ok(Node::leaf(Op::Matcher(idx)))
    }
}

fn class_escape_matcher(c: char) -> CharMatcher {
    match c {
        'd' => Arc::new(|c: char| c.is_ascii_digit()),
        'D' => Arc::new(|c: char| !c.is_ascii_digit()),
        'w' => Arc::new(|c: char| c.is_alphanumeric() || c == '_'),
        'W' => Arc::new(|c: char| !(c.is_alphanumeric() || c == '_')),
        's' => Arc::new(|c: char| c.is_whitespace()),
        'S' => Arc::new(|c: char| !c.is_whitespace()),
        'h' => Arc::new(|c: char| c == ' ' || c == '\t'),
        'H' => Arc::new(|c: char| !(c == ' ' || c == '\t')),
        _ => unreachable!("class_escape_matcher called with non-class-escape char"),
    }
}

/// Kakoune's `validate_lookaround`: a lookaround body must be a plain literal
/// sequence (no quantifiers, alternation, nested groups or assertions).
fn literal_run(node: &Node, parser: &Parser) -> Result<Vec<char>, RegexError> {
    let mut out = Vec::new();
    collect_literal(node, &mut out, parser)?;
    Ok(out)
}

fn collect_literal(node: &Node, out: &mut Vec<char>, parser: &Parser) -> Result<(), RegexError> {
    if node.quantifier != Quantifier::ONE {
        return Err(parser.error("lookaround may only contain literal characters"));
    }
    match &node.op {
        Op::Literal(c) => {
            out.push(*c);
            Ok(())
        }
        Op::Sequence => {
            for child in &node.children {
                collect_literal(child, out, parser)?;
            }
            Ok(())
        }
        _ => Err(parser.error("lookaround may only contain literal characters")),
    }
}
