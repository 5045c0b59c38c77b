//! Regex-driven motions: search-to-next-match, select-all-matches and
//! split-selections. All three share the same char-index <-> `BufferCoord`
//! bridge, since `core_regex::Regex` runs over a `&[char]` subject while
//! selections live in buffer coordinates.

use core_buffer::Buffer;
use core_coords::BufferCoord;
use core_regex::{Captures, Regex};
use core_selection::Selection;

fn char_index_of(buffer: &Buffer, coord: BufferCoord) -> usize {
    buffer
        .substring(BufferCoord::ZERO, coord)
        .map(|s| s.chars().count())
        .unwrap_or(0)
}

fn coord_of_char_index(buffer: &Buffer, index: usize) -> BufferCoord {
    buffer.offset_coord(BufferCoord::ZERO, index as isize)
}

fn extract_captures(caps: &Captures, chars: &[char], count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match caps.get(i) {
            Some((s, e)) => chars[s..e].iter().collect(),
            None => String::new(),
        })
        .collect()
}

fn selection_from_char_range(buffer: &Buffer, start: usize, end_exclusive: usize) -> Selection {
    let anchor = coord_of_char_index(buffer, start);
    let last = end_exclusive.saturating_sub(1).max(start);
    let cursor = coord_of_char_index(buffer, last);
    Selection::new(anchor, cursor)
}

/// Searches forward from just past the cursor for the next match of
/// `regex` over the whole buffer. `None` if nothing matches before the end
/// of the buffer. The first nine capture groups belong in registers
/// `1`..`9`, the whole match in register `0` (the caller's job, per the
/// register interface).
pub fn select_to_next_match(buffer: &Buffer, selection: &Selection, regex: &Regex) -> Option<Selection> {
    let content: Vec<char> = buffer.to_string().chars().collect();
    let cursor_idx = char_index_of(buffer, selection.cursor());
    let from = (cursor_idx + 1).min(content.len());
    let caps = regex.search(&content, from)?;
    let (start, end) = caps.get(0)?;
    let captures = extract_captures(&caps, &content, regex.capture_count());
    Some(selection_from_char_range(buffer, start, end).with_captures(captures))
}

/// Replaces a selection with one selection per non-overlapping match of
/// `regex` found within its own content.
pub fn select_all_matches(buffer: &Buffer, selection: &Selection, regex: &Regex) -> Vec<Selection> {
    let text = buffer
        .substring(selection.min(), buffer.next(selection.max()))
        .unwrap_or_default();
    let chars: Vec<char> = text.chars().collect();
    let base = char_index_of(buffer, selection.min());
    regex
        .find_all(&chars)
        .into_iter()
        .map(|caps| {
            let (s, e) = caps.get(0).expect("whole match always captures");
            let captures = extract_captures(&caps, &chars, regex.capture_count());
            selection_from_char_range(buffer, base + s, base + e).with_captures(captures)
        })
        .collect()
}

/// Splits a selection into the spans *between* matches of `regex` (the
/// inverse of `select_all_matches`: matching `,` on `"a,b,c"` yields
/// selections for `"a"`, `"b"`, `"c"`).
pub fn split_selections(buffer: &Buffer, selection: &Selection, regex: &Regex) -> Vec<Selection> {
    let text = buffer
        .substring(selection.min(), buffer.next(selection.max()))
        .unwrap_or_default();
    let chars: Vec<char> = text.chars().collect();
    let base = char_index_of(buffer, selection.min());
    let matches = regex.find_all(&chars);

    let mut out = Vec::new();
    let mut prev_end = 0usize;
    for caps in &matches {
        let (start, end) = caps.get(0).expect("whole match always captures");
        if start > prev_end {
            out.push(selection_from_char_range(buffer, base + prev_end, base + start));
        }
        prev_end = end;
    }
    if prev_end < chars.len() {
        out.push(selection_from_char_range(buffer, base + prev_end, base + chars.len()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_buffer::BufferFlags;

    #[test]
    fn select_to_next_match_finds_the_capture_groups() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "foo 123 bar 456 baz\n");
        let regex = Regex::new(r"(\w+)\s+(\d+)").unwrap();
        let start = Selection::at(BufferCoord::ZERO);

        let first = select_to_next_match(&buffer, &start, &regex).unwrap();
        assert_eq!(first.min(), BufferCoord::new(0usize, 0usize));
        assert_eq!(first.captures().unwrap()[1], "foo");
        assert_eq!(first.captures().unwrap()[2], "123");

        let second = select_to_next_match(&buffer, &first, &regex).unwrap();
        assert_eq!(second.min(), BufferCoord::new(0usize, 8usize));
        assert_eq!(second.captures().unwrap()[1], "bar");
    }

    #[test]
    fn split_selections_divides_on_every_match() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "a,b,c\n");
        let regex = Regex::new(",").unwrap();
        let whole = Selection::new(BufferCoord::new(0usize, 0usize), BufferCoord::new(0usize, 4usize));
        let parts = split_selections(&buffer, &whole, &regex);
        assert_eq!(parts.len(), 3);
        assert_eq!(buffer.substring(parts[0].min(), buffer.next(parts[0].max())).unwrap(), "a");
        assert_eq!(buffer.substring(parts[1].min(), buffer.next(parts[1].max())).unwrap(), "b");
        assert_eq!(buffer.substring(parts[2].min(), buffer.next(parts[2].max())).unwrap(), "c");
    }

    #[test]
    fn select_all_matches_returns_one_selection_per_match() {
        let buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "aXbXc\n");
        let regex = Regex::new("X").unwrap();
        let whole = Selection::new(BufferCoord::new(0usize, 0usize), BufferCoord::new(0usize, 4usize));
        let matches = select_all_matches(&buffer, &whole, &regex);
        assert_eq!(matches.len(), 2);
    }
}
