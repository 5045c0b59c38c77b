//! `tfFT`-style "find character" motions.

use core_buffer::Buffer;
use core_selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindCharMode {
    /// Land the cursor on the matched codepoint (`f`/`F`).
    To,
    /// Land the cursor just before it in the direction of travel (`t`/`T`).
    Till,
}

/// Selects from the cursor to the next (or previous, if `!forward`)
/// occurrence of `target`. `None` if `target` does not occur before the
/// relevant edge of the buffer.
pub fn select_to_char(
    buffer: &Buffer,
    selection: &Selection,
    target: char,
    mode: FindCharMode,
    forward: bool,
) -> Option<Selection> {
    let start = selection.cursor();
    let mut pos = if forward { buffer.next(start) } else { buffer.prev(start) };
    if pos == start {
        return None;
    }
    loop {
        let c = buffer.char_at(pos)?;
        if c == target {
            let cursor = match (mode, forward) {
                (FindCharMode::To, _) => pos,
                (FindCharMode::Till, true) => buffer.prev(pos),
                (FindCharMode::Till, false) => buffer.next(pos),
            };
            return Some(Selection::new(start, cursor));
        }
        let next = if forward { buffer.next(pos) } else { buffer.prev(pos) };
        if next == pos {
            return None;
        }
        pos = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_buffer::BufferFlags;
    use core_coords::BufferCoord;

    #[test]
    fn find_forward_lands_on_the_target() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "a,b,c\n");
        let start = Selection::at(BufferCoord::new(0usize, 0usize));
        let found = select_to_char(&buffer, &start, ',', FindCharMode::To, true).unwrap();
        assert_eq!(found.cursor(), BufferCoord::new(0usize, 1usize));
    }

    #[test]
    fn till_forward_lands_just_before_the_target() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "a,b,c\n");
        let start = Selection::at(BufferCoord::new(0usize, 0usize));
        let found = select_to_char(&buffer, &start, ',', FindCharMode::Till, true).unwrap();
        assert_eq!(found.cursor(), BufferCoord::new(0usize, 0usize));
    }

    #[test]
    fn missing_target_returns_none() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "abc\n");
        let start = Selection::at(BufferCoord::new(0usize, 0usize));
        assert!(select_to_char(&buffer, &start, 'z', FindCharMode::To, true).is_none());
    }
}
