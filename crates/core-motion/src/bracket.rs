//! Matching-bracket motion, grounded on Kakoune's `selectors.cc::find_matching`.

use core_buffer::Buffer;
use core_coords::BufferCoord;
use core_selection::Selection;

const PAIRS: [(char, char); 4] = [('(', ')'), ('{', '}'), ('[', ']'), ('<', '>')];

fn pair_of(c: char) -> Option<(char, bool)> {
    for (open, close) in PAIRS {
        if c == open {
            return Some((close, true));
        }
        if c == close {
            return Some((open, false));
        }
    }
    None
}

/// Jumps the cursor to the bracket matching the one under it, tracking
/// nesting depth so inner pairs of the same kind don't confuse the scan.
/// Returns the selection unchanged if the cursor isn't on a bracket or no
/// match is found before the buffer's edge.
pub fn matching_bracket(buffer: &Buffer, selection: &Selection) -> Selection {
    let cursor = selection.cursor();
    let Some(c) = buffer.char_at(cursor) else {
        return selection.clone();
    };
    let Some((target, forward)) = pair_of(c) else {
        return selection.clone();
    };
    let mut depth = 1i64;
    let mut pos = cursor;
    loop {
        let next = if forward { buffer.next(pos) } else { buffer.prev(pos) };
        if next == pos {
            return selection.clone();
        }
        pos = next;
        let Some(at) = buffer.char_at(pos) else {
            return selection.clone();
        };
        if at == target {
            depth -= 1;
            if depth == 0 {
                return Selection::at(pos);
            }
        } else if at == c {
            depth += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_buffer::BufferFlags;

    #[test]
    fn jumps_from_open_to_matching_close_skipping_nested_pairs() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "(a(b)c)\n");
        let at_open = Selection::at(BufferCoord::new(0usize, 0usize));
        let matched = matching_bracket(&buffer, &at_open);
        assert_eq!(matched.cursor(), BufferCoord::new(0usize, 6usize));
    }

    #[test]
    fn jumps_backward_from_close_to_open() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "(a(b)c)\n");
        let at_close = Selection::at(BufferCoord::new(0usize, 6usize));
        let matched = matching_bracket(&buffer, &at_close);
        assert_eq!(matched.cursor(), BufferCoord::new(0usize, 0usize));
    }

    #[test]
    fn cursor_not_on_a_bracket_is_unchanged() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "abc\n");
        let sel = Selection::at(BufferCoord::new(0usize, 1usize));
        let matched = matching_bracket(&buffer, &sel);
        assert_eq!(matched, sel);
    }
}
