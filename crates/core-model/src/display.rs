//! Status-line and cursor-position projections for the outer event loop
//! (spec §6.3). Rendering a terminal frame is out of scope for this core;
//! what an event loop needs from it is a plain-text mode line and a
//! `(CursorMode, DisplayCoord)` pair telling it where to place the cursor.

/// A single line of status text, ready for an outer renderer to draw
/// verbatim (no styling spans -- that belongs to the dropped `core-render`
/// layer, out of scope here).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub text: String,
}

impl DisplayLine {
    pub fn new(text: impl Into<String>) -> Self {
        DisplayLine { text: text.into() }
    }
}

/// Which coordinate space `get_cursor_info`'s `DisplayCoord` is relative to
/// (spec §6.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    Buffer,
    Prompt,
}
