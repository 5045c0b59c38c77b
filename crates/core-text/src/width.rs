//! Per-codepoint display width (0, 1 or 2 cells), following a wcwidth-style
//! table rather than grapheme-cluster composition.

use unicode_width::UnicodeWidthChar;

/// Column width of a single codepoint. Combining marks are 0, most text is
/// 1, wide CJK/emoji codepoints are 2. Control characters (other than the
/// ones callers special-case, like `\t`) report width 0 to avoid negative
/// layout rather than panicking.
pub fn char_width(c: char) -> core_coords::ColumnCount {
    core_coords::ColumnCount(UnicodeWidthChar::width(c).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_width_one() {
        assert_eq!(char_width('a').get(), 1);
    }

    #[test]
    fn combining_mark_is_width_zero() {
        assert_eq!(char_width('\u{0301}').get(), 0);
    }

    #[test]
    fn wide_cjk_is_width_two() {
        assert_eq!(char_width('漢').get(), 2);
    }
}
