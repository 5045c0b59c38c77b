//! Typed coordinate and count primitives shared by the rest of the editor core.
//!
//! Line, column, byte and char counts are deliberately distinct types (rather
//! than four `usize` parameters that are easy to transpose at a call site).
//! `BufferCoord` and `DisplayCoord` are the two coordinate systems the rest of
//! the workspace builds on: a `BufferCoord` names a byte offset inside a line
//! and is only meaningful against a specific buffer snapshot (see
//! `core-buffer`'s `Timestamp`); a `DisplayCoord` is a column position used
//! for rendering and is derived from a `BufferCoord` plus a tabstop.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

macro_rules! count_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub usize);

        impl $name {
            pub const ZERO: Self = Self(0);

            pub fn get(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self(v)
            }
        }

        impl From<$name> for usize {
            fn from(v: $name) -> usize {
                v.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }
    };
}

count_type!(LineCount);
count_type!(ColumnCount);
count_type!(ByteCount);
count_type!(CharCount);

impl LineCount {
    /// Saturating predecessor; line counts never go negative.
    pub fn saturating_dec(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

/// A coordinate naming a byte offset inside a line. Only meaningful against
/// the buffer snapshot it was produced from; a coordinate from an older
/// snapshot must be remapped through the buffer's change log before use
/// (see `core-buffer::Buffer::changes_since`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferCoord {
    pub line: LineCount,
    pub byte: ByteCount,
}

impl BufferCoord {
    pub fn new(line: impl Into<LineCount>, byte: impl Into<ByteCount>) -> Self {
        Self {
            line: line.into(),
            byte: byte.into(),
        }
    }

    pub const ZERO: Self = Self {
        line: LineCount(0),
        byte: ByteCount(0),
    };
}

impl fmt::Display for BufferCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.byte)
    }
}

/// A coordinate in the rendered grid: a line and a display column (counting
/// cell widths, not bytes or codepoints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayCoord {
    pub line: LineCount,
    pub column: ColumnCount,
}

impl DisplayCoord {
    pub fn new(line: impl Into<LineCount>, column: impl Into<ColumnCount>) -> Self {
        Self {
            line: line.into(),
            column: column.into(),
        }
    }
}

/// Convert a byte offset within a line's content to a display column,
/// expanding tabs to the next multiple of `tabstop`. `width_of` maps a
/// codepoint to its display width (0, 1 or 2); callers typically pass
/// `core_text::width`.
pub fn byte_to_column(
    line: &str,
    byte_offset: ByteCount,
    tabstop: ColumnCount,
    width_of: impl Fn(char) -> ColumnCount,
) -> ColumnCount {
    let mut column = ColumnCount::ZERO;
    let mut seen_bytes = ByteCount::ZERO;
    for c in line.chars() {
        if seen_bytes >= byte_offset {
            break;
        }
        column = if c == '\t' {
            next_tabstop(column, tabstop)
        } else {
            column + width_of(c)
        };
        seen_bytes += ByteCount(c.len_utf8());
    }
    column
}

/// Inverse of `byte_to_column`: find the byte offset whose column is closest
/// to (but not past) `target_column`.
pub fn column_to_byte(
    line: &str,
    target_column: ColumnCount,
    tabstop: ColumnCount,
    width_of: impl Fn(char) -> ColumnCount,
) -> ByteCount {
    let mut column = ColumnCount::ZERO;
    let mut byte = ByteCount::ZERO;
    for c in line.chars() {
        let next_column = if c == '\t' {
            next_tabstop(column, tabstop)
        } else {
            column + width_of(c)
        };
        if next_column > target_column {
            break;
        }
        column = next_column;
        byte += ByteCount(c.len_utf8());
    }
    byte
}

fn next_tabstop(column: ColumnCount, tabstop: ColumnCount) -> ColumnCount {
    let tabstop = tabstop.get().max(1);
    let advanced = (column.get() / tabstop + 1) * tabstop;
    ColumnCount(advanced)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width1(_: char) -> ColumnCount {
        ColumnCount(1)
    }

    #[test]
    fn byte_to_column_plain_ascii() {
        let col = byte_to_column("hello", ByteCount(3), ColumnCount(8), width1);
        assert_eq!(col, ColumnCount(3));
    }

    #[test]
    fn byte_to_column_expands_tabs() {
        // "\tx" with tabstop 4: tab takes column 0 -> 4, 'x' at column 4.
        let col = byte_to_column("\tx", ByteCount(2), ColumnCount(4), width1);
        assert_eq!(col, ColumnCount(5));
    }

    #[test]
    fn column_to_byte_round_trips_ascii() {
        let byte = column_to_byte("hello world", ColumnCount(6), ColumnCount(8), width1);
        assert_eq!(byte, ByteCount(6));
    }

    #[test]
    fn column_to_byte_with_tab() {
        let byte = column_to_byte("\tx", ColumnCount(5), ColumnCount(4), width1);
        assert_eq!(byte, ByteCount(2));
    }
}
