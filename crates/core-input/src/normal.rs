//! Normal-mode key routing: numeric-prefix and register-prefix accumulation
//! (spec §4.5.2).
//!
//! A key either extends the pending numeric prefix, sets a one-shot register
//! via `"`, or -- once neither applies -- completes a command ready for the
//! keymap the surrounding editor supplies (out of scope here; see spec §1's
//! "command language" exclusion). `core-input` only owns the prefix state
//! machine, not the `Key -> Command` table itself.

use crate::key::KeyToken;

/// What a key did to the pending normal-mode state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalDispatch {
    /// The key extended a numeric-prefix or awaited a register name; no
    /// command is ready yet.
    Pending,
    /// `"<letter>` just set the one-shot register for the next command.
    RegisterSet(char),
    /// A full command is ready: `count` defaults to 1 absent a prefix,
    /// `register` is the one-shot register set via `"`, if any.
    Command {
        key: KeyToken,
        count: u32,
        register: Option<char>,
    },
}

/// Accumulates the numeric-prefix and one-shot register-prefix state a
/// normal-mode key sequence builds up before a command dispatches.
#[derive(Debug, Default, Clone)]
pub struct NormalState {
    count: Option<u32>,
    register: Option<char>,
    awaiting_register: bool,
}

impl NormalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> Option<u32> {
        self.count
    }

    pub fn pending_register(&self) -> Option<char> {
        self.register
    }

    pub fn is_awaiting_register(&self) -> bool {
        self.awaiting_register
    }

    /// Clears all pending prefix state, e.g. on `Esc`.
    pub fn reset(&mut self) {
        *self = NormalState::default();
    }

    /// Feeds one key through prefix accumulation.
    pub fn feed(&mut self, key: KeyToken) -> NormalDispatch {
        if self.awaiting_register {
            self.awaiting_register = false;
            if let Some(c) = key.codepoint {
                self.register = Some(c);
                return NormalDispatch::RegisterSet(c);
            }
            // A non-codepoint key (e.g. a mouse event) while awaiting a
            // register name cancels the prefix rather than crashing on it.
            return NormalDispatch::Pending;
        }

        if key.is_plain('"') {
            self.awaiting_register = true;
            return NormalDispatch::Pending;
        }

        if let Some(c) = key.codepoint {
            if key.modifiers.is_empty() && c.is_ascii_digit() {
                // A solitary '0' (no count begun yet) is the line-start
                // command, not a prefix digit; '0' extending an existing
                // count is just another digit.
                if c != '0' || self.count.is_some() {
                    let digit = c.to_digit(10).expect("ascii digit");
                    let extended = self
                        .count
                        .unwrap_or(0)
                        .saturating_mul(10)
                        .saturating_add(digit);
                    self.count = Some(extended);
                    return NormalDispatch::Pending;
                }
            }
        }

        let count = self.count.take().unwrap_or(1);
        let register = self.register.take();
        NormalDispatch::Command { key, count, register }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_dispatches_with_default_count_one() {
        let mut st = NormalState::new();
        assert_eq!(
            st.feed(KeyToken::char('w')),
            NormalDispatch::Command { key: KeyToken::char('w'), count: 1, register: None }
        );
    }

    #[test]
    fn leading_zero_with_no_prior_digits_is_a_command() {
        let mut st = NormalState::new();
        assert_eq!(
            st.feed(KeyToken::char('0')),
            NormalDispatch::Command { key: KeyToken::char('0'), count: 1, register: None }
        );
    }

    #[test]
    fn digits_accumulate_into_a_count_prefix() {
        let mut st = NormalState::new();
        assert_eq!(st.feed(KeyToken::char('1')), NormalDispatch::Pending);
        assert_eq!(st.feed(KeyToken::char('0')), NormalDispatch::Pending);
        assert_eq!(
            st.feed(KeyToken::char('j')),
            NormalDispatch::Command { key: KeyToken::char('j'), count: 10, register: None }
        );
    }

    #[test]
    fn quote_then_letter_sets_a_one_shot_register() {
        let mut st = NormalState::new();
        assert_eq!(st.feed(KeyToken::char('"')), NormalDispatch::Pending);
        assert_eq!(st.feed(KeyToken::char('a')), NormalDispatch::RegisterSet('a'));
        assert_eq!(
            st.feed(KeyToken::char('p')),
            NormalDispatch::Command { key: KeyToken::char('p'), count: 1, register: Some('a') }
        );
        // Consumed: the next command has no register unless "-prefixed again.
        assert_eq!(
            st.feed(KeyToken::char('p')),
            NormalDispatch::Command { key: KeyToken::char('p'), count: 1, register: None }
        );
    }

    #[test]
    fn count_and_register_combine() {
        let mut st = NormalState::new();
        st.feed(KeyToken::char('"'));
        st.feed(KeyToken::char('z'));
        st.feed(KeyToken::char('3'));
        assert_eq!(
            st.feed(KeyToken::char('d')),
            NormalDispatch::Command { key: KeyToken::char('d'), count: 3, register: Some('z') }
        );
    }

    #[test]
    fn reset_clears_pending_state() {
        let mut st = NormalState::new();
        st.feed(KeyToken::char('4'));
        st.reset();
        assert_eq!(
            st.feed(KeyToken::char('j')),
            NormalDispatch::Command { key: KeyToken::char('j'), count: 1, register: None }
        );
    }
}
