//! Prompt mode (spec §4.5.4): a one-line editor with history and
//! tab-completion cycling, used for search/command-line style input.
//!
//! Grounded on Kakoune's `prompt.cc`/`input_handler.cc` prompt-mode line
//! editor for the motion/history/completion shape, adapted onto
//! `core_completion::Completions` instead of Kakoune's own completion type.

use core_completion::Completions;
use core_text::{is_word, WordType};

/// Per-prompt-string history: de-duplicated, most-recent-last.
#[derive(Debug, Clone, Default)]
pub struct PromptHistory {
    entries: Vec<String>,
}

impl PromptHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Appends `entry`, moving it to the end if already present (so the
    /// most recently used entry is always last).
    pub fn push(&mut self, entry: &str) {
        self.entries.retain(|e| e != entry);
        self.entries.push(entry.to_string());
    }
}

#[derive(Debug, Clone)]
struct CompletionCycle {
    completions: Completions,
    index: usize,
    inserted_len: usize,
}

/// A single-line editor: cursor position, optional password masking,
/// `Ctrl-V` literal-insert state and tab-completion cycling.
#[derive(Debug, Clone)]
pub struct PromptState {
    line: Vec<char>,
    cursor: usize,
    password: bool,
    awaiting_literal: bool,
    drop_blank_history: bool,
    completion: Option<CompletionCycle>,
}

impl PromptState {
    pub fn new(password: bool, drop_blank_history: bool) -> Self {
        PromptState {
            line: Vec::new(),
            cursor: 0,
            password,
            awaiting_literal: false,
            drop_blank_history,
            completion: None,
        }
    }

    pub fn line(&self) -> String {
        self.line.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The text actually shown to the user: the real line, or an equal
    /// number of mask characters when `password` is set.
    pub fn display(&self) -> String {
        if self.password {
            "*".repeat(self.line.len())
        } else {
            self.line()
        }
    }

    pub fn is_awaiting_literal(&self) -> bool {
        self.awaiting_literal
    }

    pub fn begin_literal(&mut self) {
        self.awaiting_literal = true;
    }

    pub fn insert_literal(&mut self, c: char) {
        self.awaiting_literal = false;
        self.insert_char(c);
    }

    pub fn insert_char(&mut self, c: char) {
        self.line.insert(self.cursor, c);
        self.cursor += 1;
        self.completion = None;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.line.remove(self.cursor);
            self.completion = None;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.line.len() {
            self.line.remove(self.cursor);
            self.completion = None;
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.line.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.line.len();
    }

    /// Moves to the start of the previous `Word` (spec §4.2's word
    /// classification, no extra word codepoints configured for prompt text).
    pub fn move_word_left(&mut self) {
        while self.cursor > 0 && !is_word(self.line[self.cursor - 1], WordType::Word, &[]) {
            self.cursor -= 1;
        }
        while self.cursor > 0 && is_word(self.line[self.cursor - 1], WordType::Word, &[]) {
            self.cursor -= 1;
        }
    }

    pub fn move_word_right(&mut self) {
        while self.cursor < self.line.len() && !is_word(self.line[self.cursor], WordType::Word, &[]) {
            self.cursor += 1;
        }
        while self.cursor < self.line.len() && is_word(self.line[self.cursor], WordType::Word, &[]) {
            self.cursor += 1;
        }
    }

    /// Records the current line into `history` on `Return`, or on `Esc`
    /// unless `drop_blank_history` is set and the line starts with a blank
    /// (spec §4.5.4).
    pub fn commit_to_history(&self, history: &mut PromptHistory, aborted: bool) {
        if aborted && self.drop_blank_history && self.line.first().is_some_and(|c| c.is_whitespace()) {
            return;
        }
        history.push(&self.line());
    }

    /// Cycles to the next completion candidate produced by `completer`,
    /// splicing it into the line at the anchor the completer reports.
    pub fn complete_next(&mut self, completer: impl Fn(&str, usize) -> Completions) {
        if self.completion.is_none() {
            let completions = completer(&self.line(), self.cursor);
            if completions.is_empty() {
                return;
            }
            self.completion = Some(CompletionCycle { completions, index: 0, inserted_len: 0 });
        } else if let Some(cycle) = &mut self.completion {
            cycle.index = (cycle.index + 1) % cycle.completions.candidates.len();
        }
        self.splice_current_candidate();
    }

    fn splice_current_candidate(&mut self) {
        let Some(cycle) = &self.completion else { return };
        let start = cycle.completions.start;
        let current_end = if cycle.inserted_len > 0 { start + cycle.inserted_len } else { cycle.completions.end };
        let current_end = current_end.min(self.line.len());
        let candidate: Vec<char> = cycle.completions.candidates[cycle.index].chars().collect();
        self.line.splice(start..current_end, candidate.iter().copied());
        self.cursor = start + candidate.len();
        if let Some(cycle) = &mut self.completion {
            cycle.inserted_len = candidate.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_editing_moves_cursor() {
        let mut p = PromptState::new(false, false);
        p.insert_str("abc");
        assert_eq!(p.line(), "abc");
        p.backspace();
        assert_eq!(p.line(), "ab");
        p.move_home();
        p.insert_char('X');
        assert_eq!(p.line(), "Xab");
        assert_eq!(p.cursor(), 1);
    }

    #[test]
    fn password_mode_masks_the_display() {
        let mut p = PromptState::new(true, false);
        p.insert_str("secret");
        assert_eq!(p.display(), "*".repeat(6));
        assert_eq!(p.line(), "secret");
    }

    #[test]
    fn word_left_skips_trailing_blanks_then_a_word() {
        let mut p = PromptState::new(false, false);
        p.insert_str("foo bar");
        p.move_word_left();
        assert_eq!(p.cursor(), 4);
        p.move_word_left();
        assert_eq!(p.cursor(), 0);
    }

    #[test]
    fn history_skips_blank_prefixed_aborts_when_configured() {
        let mut history = PromptHistory::new();
        let mut p = PromptState::new(false, true);
        p.insert_str(" secret-ish");
        p.commit_to_history(&mut history, true);
        assert!(history.entries().is_empty());

        let mut p2 = PromptState::new(false, true);
        p2.insert_str("kept");
        p2.commit_to_history(&mut history, true);
        assert_eq!(history.entries(), ["kept"]);
    }

    #[test]
    fn history_dedups_and_moves_entry_to_the_end() {
        let mut history = PromptHistory::new();
        history.push("one");
        history.push("two");
        history.push("one");
        assert_eq!(history.entries(), ["two", "one"]);
    }

    #[test]
    fn tab_completion_cycles_through_candidates() {
        let mut p = PromptState::new(false, false);
        p.insert_str("se");
        let completer = |line: &str, cursor: usize| {
            Completions::new(vec!["select".into(), "set".into()], 0, line[..cursor].len())
        };
        p.complete_next(&completer);
        assert_eq!(p.line(), "select");
        p.complete_next(&completer);
        assert_eq!(p.line(), "set");
        p.complete_next(&completer);
        assert_eq!(p.line(), "select");
    }
}
