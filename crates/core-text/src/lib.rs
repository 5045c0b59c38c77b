//! Per-codepoint UTF-8 iteration, display width and character classification.
//!
//! Deliberately operates on single codepoints, not grapheme clusters: column
//! width follows a wcwidth-style per-codepoint table, and there is no NFC
//! normalization step. Combining marks and RTL text are not cursor-motion
//! aware; that is an explicit non-goal of the editor this crate belongs to.

pub mod classify;
pub mod utf8;
pub mod width;

pub use classify::{is_blank, is_horizontal_blank, is_punctuation, is_word, CharCategory, WordType};
pub use utf8::{next_boundary, prev_boundary, read_codepoint, REPLACEMENT_CHARACTER};
pub use width::char_width;
