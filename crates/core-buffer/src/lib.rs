//! Line-structured text buffer: a `ropey::Rope` for storage, an append-only
//! change log for remapping stale coordinates, and a branching undo tree.
//!
//! Grounded on Kakoune's `buffer.hh`/`buffer.cc` for the trailing-newline
//! invariant and the shape of the public edit operations, generalized onto
//! `ropey` rather than Kakoune's own line-vector-of-`String`s storage -- the
//! rope already gives the O(log n) line/byte lookups the line storage was
//! built for by hand.

mod change;
mod error;
mod listener;
mod undo;

pub use change::{Change, ChangeKind, Modification, Timestamp};
pub use error::{BufferError, EditorError};
pub use listener::{ListenerHandle, ListenerTable};
pub use undo::UndoTree;

use bitflags::bitflags;
use core_coords::{BufferCoord, ByteCount, LineCount};
use std::borrow::Cow;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BufferFlags: u32 {
        const FILE = 1 << 0;
        const NEW = 1 << 1;
        const SCRATCH = 1 << 2;
        const READ_ONLY = 1 << 3;
        const NO_UNDO = 1 << 4;
        const DEBUG = 1 << 5;
        const FIFO = 1 << 6;
    }
}

pub struct Buffer {
    name: String,
    flags: BufferFlags,
    rope: ropey::Rope,
    timestamp: Timestamp,
    change_log: Vec<(Timestamp, Change)>,
    undo: UndoTree,
    listeners: ListenerTable,
}

impl Buffer {
    pub fn new(name: impl Into<String>, flags: BufferFlags, content: &str) -> Self {
        let normalized = normalize_content(content);
        Buffer {
            name: name.into(),
            flags,
            rope: ropey::Rope::from_str(&normalized),
            timestamp: Timestamp::ZERO,
            change_log: Vec::new(),
            undo: UndoTree::new(),
            listeners: ListenerTable::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> BufferFlags {
        self.flags
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Number of logical lines: every line ends with exactly one `\n`, so
    /// this is one less than `ropey`'s own line count, which always counts
    /// the empty tail after a trailing `\n` as a line of its own.
    pub fn line_count(&self) -> LineCount {
        LineCount(self.rope.len_lines().saturating_sub(1).max(1))
    }

    pub fn line_length(&self, line: LineCount) -> Result<ByteCount, BufferError> {
        if line.get() >= self.line_count().get() {
            return Err(BufferError::CoordOutOfRange(BufferCoord::new(line, 0usize)));
        }
        Ok(ByteCount(self.rope.line(line.get()).len_bytes()))
    }

    pub fn substring(&self, begin: BufferCoord, end: BufferCoord) -> Result<String, BufferError> {
        self.validate_coord(begin)?;
        self.validate_coord(end)?;
        let from = self.to_char_idx(begin);
        let to = self.to_char_idx(end);
        if to < from {
            return Err(BufferError::InvalidRange { begin, end });
        }
        Ok(self.rope.slice(from..to).to_string())
    }

    pub fn char_at(&self, coord: BufferCoord) -> Option<char> {
        let idx = self.to_char_idx(coord);
        if idx >= self.rope.len_chars() {
            None
        } else {
            Some(self.rope.char(idx))
        }
    }

    pub fn next(&self, coord: BufferCoord) -> BufferCoord {
        let idx = self.to_char_idx(coord);
        self.from_char_idx((idx + 1).min(self.rope.len_chars()))
    }

    pub fn prev(&self, coord: BufferCoord) -> BufferCoord {
        let idx = self.to_char_idx(coord);
        self.from_char_idx(idx.saturating_sub(1))
    }

    pub fn offset_coord(&self, coord: BufferCoord, delta: isize) -> BufferCoord {
        let idx = self.to_char_idx(coord) as isize + delta;
        let idx = idx.clamp(0, self.rope.len_chars() as isize) as usize;
        self.from_char_idx(idx)
    }

    pub fn is_end_of_buffer(&self, coord: BufferCoord) -> bool {
        self.to_char_idx(coord) >= self.rope.len_chars()
    }

    pub fn validate_coord(&self, coord: BufferCoord) -> Result<(), BufferError> {
        if coord.line.get() >= self.line_count().get() {
            return Err(BufferError::CoordOutOfRange(coord));
        }
        let line_len = self.rope.line(coord.line.get()).len_bytes();
        if coord.byte.get() > line_len {
            return Err(BufferError::CoordOutOfRange(coord));
        }
        Ok(())
    }

    pub fn insert(&mut self, at: BufferCoord, text: &str) -> Result<BufferCoord, BufferError> {
        self.validate_coord(at)?;
        if text.is_empty() {
            return Ok(at);
        }
        let char_idx = self.to_char_idx(at);
        let at_buffer_end = char_idx == self.rope.len_chars();
        let effective: Cow<str> = if at_buffer_end && !text.ends_with('\n') {
            Cow::Owned(format!("{text}\n"))
        } else {
            Cow::Borrowed(text)
        };
        let change = self.apply_insert_raw(at, &effective);
        self.undo.record(Modification::Insert {
            at,
            text: effective.into_owned(),
        });
        self.bump_and_log(change);
        Ok(change.end)
    }

    pub fn erase(&mut self, begin: BufferCoord, end: BufferCoord) -> Result<BufferCoord, BufferError> {
        self.validate_coord(begin)?;
        self.validate_coord(end)?;
        let char_begin = self.to_char_idx(begin);
        let char_end = self.to_char_idx(end);
        if char_end < char_begin {
            return Err(BufferError::InvalidRange { begin, end });
        }

        self.begin_undo_group();
        let (removed, change) = self.apply_erase_raw(begin, end);
        self.undo.record(Modification::Erase { at: begin, text: removed });
        self.bump_and_log(change);

        let ends_with_newline = self.rope.len_chars() > 0 && self.rope.char(self.rope.len_chars() - 1) == '\n';
        if !ends_with_newline {
            let tail = self.from_char_idx(self.rope.len_chars());
            let synth = self.apply_insert_raw(tail, "\n");
            self.undo.record(Modification::Insert {
                at: synth.begin,
                text: "\n".to_string(),
            });
            self.bump_and_log(synth);
            tracing::trace!("erase crossed the final newline, reinserted one");
        }
        self.end_undo_group();

        Ok(begin)
    }

    pub fn begin_undo_group(&mut self) {
        self.undo.begin_group();
    }

    pub fn end_undo_group(&mut self) {
        self.undo.end_group();
    }

    /// Applies the inverse of the current undo node and moves to its parent.
    /// Returns `false` (and does nothing) at the root.
    pub fn undo(&mut self) -> bool {
        if self.undo.parent().is_none() {
            return false;
        }
        let group = self.undo.current_group().to_vec();
        for modification in group.iter().rev() {
            let change = self.apply_inverse(modification);
            self.bump_and_log(change);
        }
        let parent = self.undo.parent().expect("checked above");
        self.undo.move_to(parent);
        true
    }

    /// Re-applies the most recently created child of the current node.
    /// Returns `false` (and does nothing) at a leaf.
    pub fn redo(&mut self) -> bool {
        let Some(child) = self.undo.most_recent_child() else {
            return false;
        };
        self.undo.move_to(child);
        let group = self.undo.current_group().to_vec();
        for modification in group.iter() {
            let change = self.apply_forward(modification);
            self.bump_and_log(change);
        }
        true
    }

    pub fn changes_since(&self, ts: Timestamp) -> Vec<Change> {
        self.change_log
            .iter()
            .filter(|(t, _)| *t > ts)
            .map(|(_, c)| *c)
            .collect()
    }

    /// Drops change log entries older than every live listener's watermark.
    pub fn compact_change_log(&mut self) {
        let Some(floor) = self.listeners.min_observed() else {
            self.change_log.clear();
            return;
        };
        self.change_log.retain(|(t, _)| *t > floor);
    }

    pub fn register_listener(&mut self) -> ListenerHandle {
        self.listeners.register(self.timestamp)
    }

    pub fn unregister_listener(&mut self, handle: ListenerHandle) {
        self.listeners.unregister(handle);
    }

    pub fn update_listener(&mut self, handle: ListenerHandle, at: Timestamp) {
        self.listeners.update(handle, at);
    }

    fn apply_inverse(&mut self, modification: &Modification) -> Change {
        match modification {
            Modification::Insert { at, text } => {
                let end = self.end_of_insertion(*at, text);
                self.apply_erase_raw(*at, end).1
            }
            Modification::Erase { at, text } => self.apply_insert_raw(*at, text),
        }
    }

    fn apply_forward(&mut self, modification: &Modification) -> Change {
        match modification {
            Modification::Insert { at, text } => self.apply_insert_raw(*at, text),
            Modification::Erase { at, text } => {
                let end = self.end_of_insertion(*at, text);
                self.apply_erase_raw(*at, end).1
            }
        }
    }

    fn end_of_insertion(&self, at: BufferCoord, text: &str) -> BufferCoord {
        let idx = self.to_char_idx(at) + text.chars().count();
        self.from_char_idx(idx)
    }

    fn apply_insert_raw(&mut self, at: BufferCoord, text: &str) -> Change {
        let char_idx = self.to_char_idx(at);
        let at_end = char_idx == self.rope.len_chars();
        self.rope.insert(char_idx, text);
        let end = self.from_char_idx(char_idx + text.chars().count());
        Change {
            kind: ChangeKind::Insert,
            begin: at,
            end,
            at_end_of_buffer: at_end,
        }
    }

    fn apply_erase_raw(&mut self, begin: BufferCoord, end: BufferCoord) -> (String, Change) {
        let char_begin = self.to_char_idx(begin);
        let char_end = self.to_char_idx(end);
        let at_end = char_end == self.rope.len_chars();
        let removed = self.rope.slice(char_begin..char_end).to_string();
        self.rope.remove(char_begin..char_end);
        // `end` keeps the pre-erase extent (not collapsed to `begin`): selection
        // remapping needs the original span to tell "inside the erased text"
        // from "after it" and to size the backward translation.
        let change = Change {
            kind: ChangeKind::Erase,
            begin,
            end,
            at_end_of_buffer: at_end,
        };
        (removed, change)
    }

    fn bump_and_log(&mut self, change: Change) {
        self.timestamp = Timestamp(self.timestamp.0 + 1);
        self.change_log.push((self.timestamp, change));
    }

    fn to_char_idx(&self, coord: BufferCoord) -> usize {
        let line_start = self.rope.line_to_byte(coord.line.get());
        let byte = (line_start + coord.byte.get()).min(self.rope.len_bytes());
        self.rope.byte_to_char(byte)
    }

    fn from_char_idx(&self, char_idx: usize) -> BufferCoord {
        let byte = self.rope.char_to_byte(char_idx);
        let last_line = self.line_count().get() - 1;
        if byte >= self.rope.len_bytes() {
            let line_start = self.rope.line_to_byte(last_line);
            return BufferCoord::new(last_line, byte - line_start);
        }
        let mut line = self.rope.byte_to_line(byte);
        if line > last_line {
            line = last_line;
        }
        let line_start = self.rope.line_to_byte(line);
        BufferCoord::new(line, byte - line_start)
    }
}

impl std::fmt::Display for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rope)
    }
}

/// Enforces the empty-buffer-is-one-line and trailing-newline invariants on
/// buffer construction. Edits enforce the same rules incrementally.
fn normalize_content(content: &str) -> String {
    if content.is_empty() {
        return "\n".to_string();
    }
    if content.ends_with('\n') {
        content.to_string()
    } else {
        format!("{content}\n")
    }
}
