//! Text objects: word (inner/outer) and surrounding bracket pairs
//! (inner/outer, with a nesting level), grounded on Kakoune's
//! `selectors.cc::select_surrounding`/`select_object` family.

use crate::{skip_while, skip_while_back};
use core_buffer::Buffer;
use core_selection::Selection;
use core_text::classify::{categorize, is_blank};
use core_text::WordType;

/// `inner=true` selects just the run of codepoints sharing the cursor's
/// category (`iw`); `inner=false` additionally absorbs the blank run that
/// follows it, or precedes it if there is none following (`aw`).
pub fn word_object(buffer: &Buffer, selection: &Selection, word_type: WordType, inner: bool) -> Selection {
    let pos = selection.cursor();
    let Some(c) = buffer.char_at(pos) else {
        return selection.clone();
    };
    let extra = &[][..];
    let cat = categorize(c, word_type, extra);
    let start = skip_while_back(buffer, pos, |c2| categorize(c2, word_type, extra) == cat);
    let run_end = skip_while(buffer, pos, |c2| categorize(c2, word_type, extra) == cat);
    let run_end = if run_end == pos { buffer.next(pos) } else { run_end };

    if inner {
        return Selection::new(start, buffer.prev(run_end));
    }

    let after_blanks = skip_while(buffer, run_end, is_blank);
    if after_blanks != run_end {
        Selection::new(start, buffer.prev(after_blanks))
    } else {
        let before_blanks = skip_while_back(buffer, start, is_blank);
        Selection::new(before_blanks, buffer.prev(run_end))
    }
}

/// Selects the bracket pair enclosing the cursor at the given nesting
/// level (`0` = the innermost enclosing pair). `inner=true` excludes the
/// delimiters; `None` if the cursor isn't nested that deeply.
pub fn surrounding_pair(
    buffer: &Buffer,
    selection: &Selection,
    open: char,
    close: char,
    inner: bool,
    nesting: usize,
) -> Option<Selection> {
    let mut depth_to_skip = nesting as i64;
    let mut depth = 0i64;
    let mut p = selection.cursor();
    let open_pos = loop {
        let prev = buffer.prev(p);
        if prev == p {
            return None;
        }
        p = prev;
        match buffer.char_at(p) {
            Some(c) if c == close => depth += 1,
            Some(c) if c == open => {
                if depth == 0 {
                    if depth_to_skip == 0 {
                        break p;
                    }
                    depth_to_skip -= 1;
                } else {
                    depth -= 1;
                }
            }
            _ => {}
        }
    };

    let mut depth2 = 0i64;
    let mut q = open_pos;
    let close_pos = loop {
        let next = buffer.next(q);
        if next == q {
            return None;
        }
        q = next;
        match buffer.char_at(q) {
            Some(c) if c == open => depth2 += 1,
            Some(c) if c == close => {
                if depth2 == 0 {
                    break q;
                }
                depth2 -= 1;
            }
            _ => {}
        }
    };

    if inner {
        let inner_start = buffer.next(open_pos);
        if inner_start == close_pos {
            return Some(Selection::at(open_pos));
        }
        Some(Selection::new(inner_start, buffer.prev(close_pos)))
    } else {
        Some(Selection::new(open_pos, close_pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_buffer::BufferFlags;
    use core_coords::BufferCoord;

    #[test]
    fn inner_word_selects_just_the_run() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "foo bar\n");
        let sel = Selection::at(BufferCoord::new(0usize, 1usize));
        let obj = word_object(&buffer, &sel, WordType::Word, true);
        assert_eq!(obj.min(), BufferCoord::new(0usize, 0usize));
        assert_eq!(obj.max(), BufferCoord::new(0usize, 2usize));
    }

    #[test]
    fn outer_word_absorbs_trailing_blank() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "foo bar\n");
        let sel = Selection::at(BufferCoord::new(0usize, 1usize));
        let obj = word_object(&buffer, &sel, WordType::Word, false);
        assert_eq!(obj.max(), BufferCoord::new(0usize, 3usize), "includes the space after foo");
    }

    #[test]
    fn inner_pair_excludes_the_delimiters() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "(abc)\n");
        let sel = Selection::at(BufferCoord::new(0usize, 2usize));
        let obj = surrounding_pair(&buffer, &sel, '(', ')', true, 0).unwrap();
        assert_eq!(obj.min(), BufferCoord::new(0usize, 1usize));
        assert_eq!(obj.max(), BufferCoord::new(0usize, 3usize));
    }

    #[test]
    fn outer_pair_at_nesting_one_finds_the_enclosing_parens() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "(a(b)c)\n");
        let sel = Selection::at(BufferCoord::new(0usize, 3usize)); // on 'b'
        let obj = surrounding_pair(&buffer, &sel, '(', ')', false, 1).unwrap();
        assert_eq!(obj.min(), BufferCoord::new(0usize, 0usize));
        assert_eq!(obj.max(), BufferCoord::new(0usize, 6usize));
    }
}
