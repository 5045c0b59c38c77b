//! Word/WORD motions, grounded on Kakoune's `selectors.cc::select_to_next_word`
//! family and `word_splitter.hh` for run classification.

use crate::{skip_while, skip_while_back};
use core_buffer::Buffer;
use core_selection::Selection;
use core_text::classify::{categorize, is_blank, CharCategory, WordType};

/// Selects from the current cursor to just before the start of the next
/// word: skips any blanks left over from a previous selection, then the
/// run sharing the landing codepoint's category, then the blanks that
/// follow -- landing the cursor on the last blank before the next token
/// (or at end of buffer).
pub fn word_forward(buffer: &Buffer, selection: &Selection, word_type: WordType) -> Selection {
    let extra = &[][..];
    let anchor = skip_while(buffer, selection.cursor(), is_blank);
    let cat = buffer.char_at(anchor).map(|c| categorize(c, word_type, extra));
    let mut pos = anchor;
    if let Some(cat) = cat {
        pos = skip_while(buffer, pos, |c| categorize(c, word_type, extra) == cat);
    }
    pos = skip_while(buffer, pos, is_blank);
    let cursor = if pos == anchor { anchor } else { buffer.prev(pos) };
    Selection::new(anchor, cursor)
}

/// Selects backward to the start of the previous word.
pub fn word_backward(buffer: &Buffer, selection: &Selection, word_type: WordType) -> Selection {
    let extra = &[][..];
    let anchor = skip_while_back(buffer, selection.cursor(), is_blank);
    let cat = if anchor == core_coords::BufferCoord::ZERO {
        None
    } else {
        buffer
            .char_at(buffer.prev(anchor))
            .map(|c| categorize(c, word_type, extra))
    };
    let mut pos = anchor;
    if let Some(cat) = cat {
        pos = skip_while_back(buffer, pos, |c| categorize(c, word_type, extra) == cat);
    }
    Selection::new(if pos == anchor { anchor } else { buffer.prev(anchor).max(pos) }, pos)
}

/// Selects to the end of the current or next word (used by `e`-style
/// motions): skips blanks, then selects a run of the landing category.
pub fn word_end_forward(buffer: &Buffer, selection: &Selection, word_type: WordType) -> Selection {
    let extra = &[][..];
    let start = buffer.next(selection.cursor());
    let anchor = skip_while(buffer, start, is_blank);
    let cat = buffer
        .char_at(anchor)
        .map(|c| categorize(c, word_type, extra))
        .unwrap_or(CharCategory::Blank);
    let end = skip_while(buffer, anchor, |c| categorize(c, word_type, extra) == cat);
    let cursor = if end == anchor { anchor } else { buffer.prev(end) };
    Selection::new(anchor, cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_buffer::BufferFlags;
    use core_coords::BufferCoord;
    use core_text::classify::WordType;

    #[test]
    fn select_to_next_word_crosses_the_boundary_per_the_editors_own_scenario() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "fn main() { }\n");
        let start = Selection::at(BufferCoord::new(0usize, 0usize));

        let first = word_forward(&buffer, &start, WordType::Word);
        assert_eq!(first.min(), BufferCoord::new(0usize, 0usize));
        assert_eq!(first.max(), BufferCoord::new(0usize, 2usize), "covers \"fn \"");

        let second = word_forward(&buffer, &first, WordType::Word);
        assert_eq!(second.min(), BufferCoord::new(0usize, 3usize));
        assert_eq!(second.max(), BufferCoord::new(0usize, 6usize), "covers \"main\"");
    }

    #[test]
    fn word_backward_returns_to_the_previous_tokens_start() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "foo bar\n");
        let at_bar = Selection::at(BufferCoord::new(0usize, 4usize));
        let back = word_backward(&buffer, &at_bar, WordType::Word);
        assert_eq!(back.cursor(), BufferCoord::new(0usize, 0usize));
    }
}
