//! Line and buffer-extent motions.

use core_buffer::Buffer;
use core_coords::BufferCoord;
use core_selection::Selection;

pub fn line_begin(_buffer: &Buffer, selection: &Selection) -> Selection {
    Selection::at(BufferCoord::new(selection.cursor().line, 0usize))
}

/// Lands on the last content codepoint of the line, before its trailing
/// `\n`. An empty line (just `"\n"`) has no content codepoint, so the
/// selection stays on column 0.
pub fn line_end(buffer: &Buffer, selection: &Selection) -> Selection {
    let line = selection.cursor().line;
    let len = buffer.line_length(line).map(|b| b.get()).unwrap_or(1);
    if len <= 1 {
        return Selection::at(BufferCoord::new(line, 0usize));
    }
    let newline_pos = BufferCoord::new(line, len - 1);
    Selection::at(buffer.prev(newline_pos))
}

pub fn buffer_begin(_buffer: &Buffer, _selection: &Selection) -> Selection {
    Selection::at(BufferCoord::ZERO)
}

pub fn buffer_end(buffer: &Buffer, selection: &Selection) -> Selection {
    let last_line = buffer.line_count().saturating_dec();
    line_end(buffer, &Selection::at(BufferCoord::new(last_line, 0usize)))
}

/// Selects the whole current line, including its trailing `\n`.
pub fn select_whole_line(buffer: &Buffer, selection: &Selection) -> Selection {
    let line = selection.cursor().line;
    let len = buffer.line_length(line).map(|b| b.get()).unwrap_or(1);
    Selection::new(BufferCoord::new(line, 0usize), BufferCoord::new(line, len - 1))
}

/// Expands a selection to cover every whole line it touches.
pub fn trim_to_lines(buffer: &Buffer, selection: &Selection) -> Selection {
    let min_line = selection.min().line;
    let max_line = selection.max().line;
    let anchor = BufferCoord::new(min_line, 0usize);
    let len = buffer.line_length(max_line).map(|b| b.get()).unwrap_or(1);
    let cursor = BufferCoord::new(max_line, len.saturating_sub(1));
    Selection::new(anchor, cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_buffer::BufferFlags;

    #[test]
    fn line_end_lands_before_the_trailing_newline() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "abc\n");
        let sel = Selection::at(BufferCoord::new(0usize, 0usize));
        let end = line_end(&buffer, &sel);
        assert_eq!(end.cursor(), BufferCoord::new(0usize, 2usize));
    }

    #[test]
    fn empty_line_end_stays_on_column_zero() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "a\n\nb\n");
        let sel = Selection::at(BufferCoord::new(1usize, 0usize));
        let end = line_end(&buffer, &sel);
        assert_eq!(end.cursor(), BufferCoord::new(1usize, 0usize));
    }

    #[test]
    fn buffer_end_lands_on_the_last_lines_last_codepoint() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "one\ntwo\n");
        let sel = Selection::at(BufferCoord::ZERO);
        let end = buffer_end(&buffer, &sel);
        assert_eq!(end.cursor(), BufferCoord::new(1usize, 2usize));
    }

    #[test]
    fn trim_to_lines_covers_every_touched_line_whole() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "one\ntwo\nthree\n");
        let sel = Selection::new(BufferCoord::new(0usize, 2usize), BufferCoord::new(1usize, 1usize));
        let trimmed = trim_to_lines(&buffer, &sel);
        assert_eq!(trimmed.min(), BufferCoord::new(0usize, 0usize));
        assert_eq!(trimmed.max(), BufferCoord::new(1usize, 3usize));
    }
}
