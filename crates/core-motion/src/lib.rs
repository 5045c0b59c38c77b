//! The motion and text-object library: pure functions
//! `fn(&Buffer, &Selection, ..) -> Selection` (or `Vec<Selection>`).
//!
//! Grounded on the teacher's `core-text::motion` module for
//! character/line-stepping shape, generalized from single-`Position`
//! motions to selection-returning motions, and on Kakoune's
//! `selectors.cc`/`selectors.hh` for word/bracket/object semantics. Extend
//! vs. replace vs. append is deliberately NOT a property of any function
//! here -- per the surrounding editor's design, that's `core_selection`'s
//! `ApplyMode`, applied by the caller around whichever motion it picked.

mod bracket;
mod find_char;
mod line;
mod object;
mod regex_motion;
mod word;

pub use bracket::matching_bracket;
pub use find_char::{select_to_char, FindCharMode};
pub use line::{buffer_begin, buffer_end, line_begin, line_end, select_whole_line, trim_to_lines};
pub use object::{surrounding_pair, word_object};
pub use regex_motion::{select_all_matches, select_to_next_match, split_selections};
pub use word::{word_backward, word_end_forward, word_forward};

use core_buffer::{Buffer, EditorError};
use core_coords::BufferCoord;
use core_regex::RegexError;
use core_selection::Selection;

/// A malformed pattern is a user-visible command failure (spec §7's
/// runtime kind), reported with the parser's own position. Lives here,
/// not in `core-regex` or `core-buffer`, since `EditorError` is `core-buffer`
/// and `RegexError` is `core-regex` -- this crate is the one dependency
/// edge that already touches both.
impl From<RegexError> for EditorError {
    fn from(e: RegexError) -> Self {
        match e {
            RegexError::Parse { pos, message } => EditorError::Parse { pos, message },
        }
    }
}

/// Moves the cursor one codepoint forward, collapsing to an empty selection.
pub fn char_forward(buffer: &Buffer, selection: &Selection) -> Selection {
    Selection::at(buffer.next(selection.cursor()))
}

/// Moves the cursor one codepoint backward, collapsing to an empty selection.
pub fn char_backward(buffer: &Buffer, selection: &Selection) -> Selection {
    Selection::at(buffer.prev(selection.cursor()))
}

/// Advances `pos` forward while `pred` holds on the codepoint at `pos`.
/// Total: stops at end of buffer without panicking.
pub(crate) fn skip_while(buffer: &Buffer, mut pos: BufferCoord, pred: impl Fn(char) -> bool) -> BufferCoord {
    while let Some(c) = buffer.char_at(pos) {
        if !pred(c) {
            break;
        }
        let next = buffer.next(pos);
        if next == pos {
            break;
        }
        pos = next;
    }
    pos
}

/// Retreats `pos` backward while `pred` holds on the codepoint *before* it.
pub(crate) fn skip_while_back(buffer: &Buffer, mut pos: BufferCoord, pred: impl Fn(char) -> bool) -> BufferCoord {
    loop {
        if pos == BufferCoord::ZERO {
            break;
        }
        let prev = buffer.prev(pos);
        match buffer.char_at(prev) {
            Some(c) if pred(c) => pos = prev,
            _ => break,
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_buffer::BufferFlags;

    #[test]
    fn char_forward_and_backward_step_one_codepoint() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "abc\n");
        let start = Selection::at(BufferCoord::new(0usize, 0usize));
        let next = char_forward(&buffer, &start);
        assert_eq!(next.cursor(), BufferCoord::new(0usize, 1usize));
        let back = char_backward(&buffer, &next);
        assert_eq!(back.cursor(), BufferCoord::new(0usize, 0usize));
    }
}
