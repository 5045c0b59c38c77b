//! The key representation fed to the mode machine: a
//! `(modifiers, codepoint, mouse-coord-or-none)` triple.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const SHIFT             = 1 << 0;
        const ALT                = 1 << 1;
        const CTRL                = 1 << 2;
        const MOUSE_PRESS         = 1 << 3;
        const MOUSE_RELEASE       = 1 << 4;
        const MOUSE_POS           = 1 << 5;
        const MOUSE_WHEEL_UP      = 1 << 6;
        const MOUSE_WHEEL_DOWN    = 1 << 7;
    }
}

/// Spec §6.3 models a key as strictly `(modifiers, codepoint,
/// mouse-coord-or-none)` -- there is no separate "named key" variant. Keys
/// with no natural codepoint (arrows, Backspace, Delete, Home, End) are
/// represented as private-use-area codepoints, the same trick already used
/// for `Esc` (`U+001B`) elsewhere in this module.
pub mod named {
    pub const BACKSPACE: char = '\u{E000}';
    pub const DELETE: char = '\u{E001}';
    pub const LEFT: char = '\u{E002}';
    pub const RIGHT: char = '\u{E003}';
    pub const UP: char = '\u{E004}';
    pub const DOWN: char = '\u{E005}';
    pub const HOME: char = '\u{E006}';
    pub const END: char = '\u{E007}';
}

/// One input event as it reaches the mode machine. `mouse` carries a
/// terminal cell coordinate for mouse-flavored modifiers, `None`
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyToken {
    pub modifiers: Modifiers,
    pub codepoint: Option<char>,
    pub mouse: Option<(u16, u16)>,
}

impl KeyToken {
    pub fn char(c: char) -> Self {
        KeyToken { modifiers: Modifiers::empty(), codepoint: Some(c), mouse: None }
    }

    pub fn ctrl(c: char) -> Self {
        KeyToken { modifiers: Modifiers::CTRL, codepoint: Some(c), mouse: None }
    }

    pub fn esc() -> Self {
        KeyToken { modifiers: Modifiers::empty(), codepoint: Some('\u{1b}'), mouse: None }
    }

    pub fn is_esc(&self) -> bool {
        self.codepoint == Some('\u{1b}') && self.modifiers.is_empty()
    }

    /// `Ctrl-C` is treated like `Esc` for leaving insert mode (§4.5.1).
    pub fn is_ctrl_c(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL) && self.codepoint == Some('c')
    }

    pub fn is_plain(&self, c: char) -> bool {
        self.modifiers.is_empty() && self.codepoint == Some(c)
    }

    pub fn is_ctrl_char(&self, c: char) -> bool {
        self.modifiers == Modifiers::CTRL && self.codepoint == Some(c)
    }

    pub fn backspace() -> Self {
        KeyToken::char(named::BACKSPACE)
    }

    pub fn delete() -> Self {
        KeyToken::char(named::DELETE)
    }

    pub fn left() -> Self {
        KeyToken::char(named::LEFT)
    }

    pub fn right() -> Self {
        KeyToken::char(named::RIGHT)
    }

    pub fn up() -> Self {
        KeyToken::char(named::UP)
    }

    pub fn down() -> Self {
        KeyToken::char(named::DOWN)
    }

    pub fn home() -> Self {
        KeyToken::char(named::HOME)
    }

    pub fn end() -> Self {
        KeyToken::char(named::END)
    }

    pub fn is_backspace(&self) -> bool {
        self.is_plain(named::BACKSPACE)
    }

    pub fn is_delete(&self) -> bool {
        self.is_plain(named::DELETE)
    }
}

/// Macro recordings and `NormalKey`/hook payloads need a stable textual
/// form; mirrors the angle-bracket key notation the teacher's key tokens
/// used (`<c-r>`, `<esc>`), extended with the mouse/alt modifiers.
impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            if let Some(c) = self.codepoint {
                if c == '\u{1b}' {
                    return write!(f, "<esc>");
                }
                return write!(f, "{c}");
            }
        }
        write!(f, "<")?;
        if self.modifiers.contains(Modifiers::CTRL) {
            write!(f, "c-")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            write!(f, "a-")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            write!(f, "s-")?;
        }
        match self.codepoint {
            Some(c) => write!(f, "{c}>"),
            None => write!(f, "mouse>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_char_displays_bare() {
        assert_eq!(KeyToken::char('x').to_string(), "x");
    }

    #[test]
    fn ctrl_key_displays_bracketed() {
        assert_eq!(KeyToken::ctrl('r').to_string(), "<c-r>");
    }

    #[test]
    fn esc_displays_as_a_named_key() {
        assert_eq!(KeyToken::esc().to_string(), "<esc>");
    }
}
