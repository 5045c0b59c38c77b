//! Thompson-NFA regex engine: parser, compiler and VM.
//!
//! Surface syntax covers literals, `.`, character classes, `\d \D \w \W \s
//! \S \h \H`, anchors (`^ $ \A \z \b \B \K`), groups (capturing, `(?:...)`,
//! named `(?<name>...)`), alternation, the usual quantifiers (`* + ? {m,n}`
//! and their lazy `?`-suffixed forms), inline case-folding `(?i)`/`(?I)`, and
//! literal-only lookaround (`(?=...) (?!...) (?<=...) (?<!...)`).
//!
//! There is no backreference support and lookaround bodies must be a plain
//! literal run -- both match Kakoune's own regex dialect.

mod ast;
mod compile;
mod error;
mod parser;
mod vm;

pub use error::RegexError;
pub use vm::RegexExecFlags;

use compile::CompiledRegex;
use vm::MatchCaptures;

/// A compiled pattern, ready to run against any subject.
#[derive(Debug, Clone)]
pub struct Regex {
    program: CompiledRegex,
}

/// A successful match: capture 0 is the whole match, 1.. are parenthesized
/// groups. Offsets are char indices into the subject that was searched.
#[derive(Debug, Clone)]
pub struct Captures {
    inner: MatchCaptures,
    named: Vec<(String, usize)>,
}

impl Captures {
    pub fn get(&self, index: usize) -> Option<(usize, usize)> {
        self.inner.group(index)
    }

    pub fn name(&self, name: &str) -> Option<(usize, usize)> {
        let idx = self.named.iter().find(|(n, _)| n == name)?.1;
        self.get(idx)
    }
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Regex, RegexError> {
        let parsed = parser::parse(pattern)?;
        Ok(Regex {
            program: compile::compile(&parsed),
        })
    }

    pub fn capture_count(&self) -> usize {
        self.program.save_count / 2
    }

    /// Anchored match: the pattern must match starting exactly at char index 0.
    pub fn is_match(&self, subject: &[char]) -> bool {
        self.captures_anchored(subject).is_some()
    }

    /// Anchored match starting at char index 0, returning captures.
    pub fn captures_anchored(&self, subject: &[char]) -> Option<Captures> {
        let caps = vm::exec(&self.program, subject, 0, RegexExecFlags::empty())?;
        Some(Captures {
            inner: caps,
            named: self.program.named_captures.clone(),
        })
    }

    /// Search mode: find the first match starting at or after `from`.
    pub fn search(&self, subject: &[char], from: usize) -> Option<Captures> {
        let caps = vm::exec(&self.program, subject, from, RegexExecFlags::SEARCH)?;
        Some(Captures {
            inner: caps,
            named: self.program.named_captures.clone(),
        })
    }

    /// Iterate all non-overlapping matches left to right.
    pub fn find_all(&self, subject: &[char]) -> Vec<Captures> {
        let mut out = Vec::new();
        let mut pos = 0;
        while pos <= subject.len() {
            match self.search(subject, pos) {
                Some(caps) => {
                    let (start, end) = caps.get(0).expect("whole match always captures");
                    pos = if end > start { end } else { end + 1 };
                    out.push(caps);
                }
                None => break,
            }
        }
        out
    }
}
