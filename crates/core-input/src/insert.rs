//! Insert mode (spec §4.5.3): a preparation table transforms selections on
//! entry, then every typed codepoint is inserted at the cursor end of each
//! selection.
//!
//! Grounded on Kakoune's `insert_completer.hh`/`normal.cc` insert-mode
//! entry points (`insert`, `append`, `open_line_below`, ...), generalized
//! onto `core_selection::SelectionList`'s operation set instead of
//! Kakoune's per-selection `Buffer::insert` loop with manual normalization.

use core_buffer::{Buffer, BufferError};
use core_coords::{BufferCoord, ByteCount, LineCount};
use core_selection::{ApplyMode, Selection, SelectionList};

/// Which preparation the mode-entry key requested (`i a o I A O c`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertKind {
    /// `i`: type before each selection's start.
    Insert,
    /// `a`: type after each selection's end.
    Append,
    /// Overtype: typed codepoints replace the one under the cursor instead
    /// of pushing it forward.
    Replace,
    /// `O`: open a new empty line above each selection's line.
    OpenLineAbove,
    /// `o`: open a new empty line below each selection's line.
    OpenLineBelow,
}

/// Per-mode state that outlives a single keystroke: whether `Ctrl-V` is
/// waiting for the literal key to insert, and the `Ctrl-O`
/// autocomplete-on-idle toggle (spec §4.5.3).
#[derive(Debug, Clone)]
pub struct InsertState {
    kind: InsertKind,
    awaiting_literal: bool,
    autocomplete_on_idle: bool,
    edits: u32,
}

impl InsertState {
    pub fn new(kind: InsertKind) -> Self {
        InsertState { kind, awaiting_literal: false, autocomplete_on_idle: false, edits: 0 }
    }

    pub fn kind(&self) -> InsertKind {
        self.kind
    }

    pub fn edits(&self) -> u32 {
        self.edits
    }

    pub fn is_awaiting_literal(&self) -> bool {
        self.awaiting_literal
    }

    pub fn begin_literal(&mut self) {
        self.awaiting_literal = true;
    }

    pub fn autocomplete_on_idle(&self) -> bool {
        self.autocomplete_on_idle
    }

    pub fn toggle_autocomplete_on_idle(&mut self) {
        self.autocomplete_on_idle = !self.autocomplete_on_idle;
    }

    /// Applies the preparation table for `kind`, collapsing every selection
    /// to the empty caret insertion typing will grow from.
    pub fn prepare(
        kind: InsertKind,
        buffer: &mut Buffer,
        selections: &mut SelectionList,
    ) -> Result<InsertState, BufferError> {
        match kind {
            InsertKind::Insert | InsertKind::Replace => {
                selections.apply(ApplyMode::Replace, |s| Selection::at(s.min()));
            }
            InsertKind::Append => {
                selections.apply(ApplyMode::Replace, |s| Selection::at(buffer.next(s.max())));
            }
            InsertKind::OpenLineBelow => open_line(buffer, selections, true)?,
            InsertKind::OpenLineAbove => open_line(buffer, selections, false)?,
        }
        Ok(InsertState::new(kind))
    }

    /// Inserts `c` at the cursor of every selection; cursors translate
    /// forward across the insertion, landing just past the typed text.
    pub fn type_char(
        &mut self,
        buffer: &mut Buffer,
        selections: &mut SelectionList,
        c: char,
    ) -> Result<(), BufferError> {
        if self.kind == InsertKind::Replace {
            overtype_char(buffer, selections, c)?;
        } else {
            let mut text = [0u8; 4];
            selections.insert_before(buffer, c.encode_utf8(&mut text))?;
        }
        self.edits += 1;
        Ok(())
    }

    /// Inserts the literal codepoint of `c` (`Ctrl-V<key>`), bypassing any
    /// further key interpretation.
    pub fn insert_literal(
        &mut self,
        buffer: &mut Buffer,
        selections: &mut SelectionList,
        c: char,
    ) -> Result<(), BufferError> {
        self.awaiting_literal = false;
        let mut text = [0u8; 4];
        selections.insert_before(buffer, c.encode_utf8(&mut text))?;
        self.edits += 1;
        Ok(())
    }

    /// Inserts `text` (a register's contents) at each cursor (`Ctrl-R<reg>`).
    pub fn insert_register_text(
        &mut self,
        buffer: &mut Buffer,
        selections: &mut SelectionList,
        text: &str,
    ) -> Result<(), BufferError> {
        if text.is_empty() {
            return Ok(());
        }
        selections.insert_before(buffer, text)?;
        self.edits += 1;
        Ok(())
    }

    /// Erases the codepoint before each cursor (`Backspace`). A cursor
    /// already at the start of the buffer is left untouched.
    pub fn backspace(&mut self, buffer: &mut Buffer, selections: &mut SelectionList) -> Result<(), BufferError> {
        for i in (0..selections.len()).rev() {
            let cursor = selections.selections()[i].cursor();
            if cursor == BufferCoord::ZERO {
                continue;
            }
            let before = buffer.prev(cursor);
            buffer.erase(before, cursor)?;
        }
        selections.update(buffer);
        self.edits += 1;
        Ok(())
    }

    /// Erases the codepoint at each cursor (`Delete`).
    pub fn delete_under(&mut self, buffer: &mut Buffer, selections: &mut SelectionList) -> Result<(), BufferError> {
        for i in (0..selections.len()).rev() {
            let cursor = selections.selections()[i].cursor();
            if buffer.is_end_of_buffer(cursor) {
                continue;
            }
            let after = buffer.next(cursor);
            buffer.erase(cursor, after)?;
        }
        selections.update(buffer);
        self.edits += 1;
        Ok(())
    }

    /// Moves every cursor by one codepoint (arrow keys); `forward` picks
    /// the direction.
    pub fn move_cursor(&self, buffer: &Buffer, selections: &mut SelectionList, forward: bool) {
        selections.apply(ApplyMode::Replace, |s| {
            let target = if forward { buffer.next(s.cursor()) } else { buffer.prev(s.cursor()) };
            Selection::at(target)
        });
    }

    /// Leaving insert mode optionally retreats the cursor one codepoint
    /// (`Append` only, matching the common "cursor lands on the last typed
    /// character, not past it" convention); returns the new selections'
    /// owning buffer is unused here, since the retreat is a pure motion.
    pub fn leave(&self, buffer: &Buffer, selections: &mut SelectionList) {
        if self.kind == InsertKind::Append {
            selections.apply(ApplyMode::Replace, |s| {
                if s.cursor() == BufferCoord::ZERO {
                    s.clone()
                } else {
                    Selection::at(buffer.prev(s.cursor()))
                }
            });
        }
    }
}

fn overtype_char(buffer: &mut Buffer, selections: &mut SelectionList, c: char) -> Result<(), BufferError> {
    for i in (0..selections.len()).rev() {
        let cursor = selections.selections()[i].cursor();
        if !buffer.is_end_of_buffer(cursor) {
            let after = buffer.next(cursor);
            buffer.erase(cursor, after)?;
        }
        let mut text = [0u8; 4];
        buffer.insert(cursor, c.encode_utf8(&mut text))?;
    }
    selections.update(buffer);
    Ok(())
}

/// Opens a new empty line above (`below = false`) or below (`below = true`)
/// every selection's line, landing an empty caret selection on each new
/// line. Insertions are applied from the highest line downward so an
/// earlier (lower-numbered) target's line index is never shifted by a
/// later one.
fn open_line(buffer: &mut Buffer, selections: &mut SelectionList, below: bool) -> Result<(), BufferError> {
    let targets: Vec<LineCount> = selections
        .selections()
        .iter()
        .map(|s| if below { s.max().line } else { s.min().line })
        .collect();

    for &line in targets.iter().rev() {
        let at = if below {
            BufferCoord::new(line, buffer.line_length(line)?)
        } else {
            BufferCoord::new(line, ByteCount::ZERO)
        };
        buffer.insert(at, "\n")?;
    }

    let idx = std::cell::Cell::new(0);
    selections
        .apply_multi(|_s| {
            let i = idx.get();
            idx.set(i + 1);
            let line = if below { LineCount(targets[i].get() + 1) } else { targets[i] };
            vec![Selection::at(BufferCoord::new(line, ByteCount::ZERO))]
        })
        .expect("opening a line never empties the selection set");
    Ok(())
}
