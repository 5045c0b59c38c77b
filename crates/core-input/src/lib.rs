//! The input-mode state machine (spec §4.5): a strictly LIFO stack of modes
//! with `Normal` as the permanent root, normal-mode numeric/register-prefix
//! accumulation, insert-mode typing, prompt-mode line editing, and macro
//! record/replay.
//!
//! Grounded on the teacher's `core-keymap::PendingContext` (the
//! numeric-prefix/register accumulation shape, reused near-verbatim in
//! `normal.rs` -- spec §4.5.2 is the same problem the teacher already
//! solved) and the teacher's own `key_token.rs` (kept, renamed `key.rs`).
//! The teacher's `core-input` is otherwise built around an async
//! `crossterm::EventStream` + `tokio` service loop; spec §5 mandates a
//! single-threaded, non-suspending core with the outer event loop out of
//! scope, so that plumbing is replaced here with a synchronous
//! `InputMachine::feed_*` entry point per mode. Mode push/pop and the
//! `InputModeChange` hook follow spec §4.5.1 and Kakoune's
//! `input_handler.cc` recursive-push semantics: a mode may push another
//! mode, and the new mode's entry runs before the call that triggered it
//! returns.

pub mod key;
mod insert;
mod macros;
mod menu;
mod normal;
mod prompt;

pub use insert::{InsertKind, InsertState};
pub use key::{KeyToken, Modifiers};
pub use macros::{MacroError, MacroRecorder};
pub use menu::MenuState;
pub use normal::{NormalDispatch, NormalState};
pub use prompt::{PromptHistory, PromptState};

use core_buffer::{Buffer, BufferError};
use core_registers::HookManager;
use core_selection::SelectionList;

/// The mode owning the keystream. `Normal` is the permanent root; the
/// others are pushed on top of it or of each other (spec §4.5.1's table).
pub enum Mode {
    Normal,
    Insert(InsertState),
    Prompt(PromptState),
    Menu(MenuState),
    NextKey,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Insert(_) => "insert",
            Mode::Prompt(_) => "prompt",
            Mode::Menu(_) => "menu",
            Mode::NextKey => "next_key",
        }
    }
}

/// A strictly LIFO stack of `Mode`s. Pushing fires `InputModeChange` with a
/// `"prev:next"` payload (spec §4.5.1); the stack can never empty out from
/// under `Normal`.
///
/// Kakoune represents modes as a class hierarchy with virtual
/// `on_enabled`/`on_disabled` methods; per spec §9's redesign note
/// replacing "deep virtual inheritance" with tagged variants, those
/// lifecycle callbacks are not separate virtual dispatch here -- they are
/// exactly the `push`/`pop` transitions below, observable externally only
/// through the `InputModeChange` hook and the mode-specific `prepare`/
/// `leave` functions each mode module already exposes.
pub struct ModeStack {
    stack: Vec<Mode>,
}

impl Default for ModeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeStack {
    pub fn new() -> Self {
        ModeStack { stack: vec![Mode::Normal] }
    }

    pub fn top(&self) -> &Mode {
        self.stack.last().expect("Normal is never popped off the root")
    }

    pub fn top_mut(&mut self) -> &mut Mode {
        self.stack.last_mut().expect("Normal is never popped off the root")
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push<Ctx>(&mut self, mode: Mode, hooks: &HookManager<Ctx>, ctx: &mut Ctx) {
        let prev = self.top().name();
        let next = mode.name();
        tracing::debug!(target: "input.mode", prev, next, "mode pushed");
        self.stack.push(mode);
        hooks.run_hook("InputModeChange", &format!("{prev}:{next}"), ctx);
    }

    /// Pops the top mode unless it is the root `Normal`.
    pub fn pop<Ctx>(&mut self, hooks: &HookManager<Ctx>, ctx: &mut Ctx) -> Option<Mode> {
        if self.stack.len() <= 1 {
            return None;
        }
        let popped = self.stack.pop().unwrap();
        let prev = popped.name();
        let next = self.top().name();
        tracing::debug!(target: "input.mode", prev, next, "mode popped");
        hooks.run_hook("InputModeChange", &format!("{prev}:{next}"), ctx);
        Some(popped)
    }
}

/// What a normal-mode key produced, once the input machine's own
/// bookkeeping (prefix accumulation, macro toggling) is accounted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalOutcome {
    /// Still accumulating a prefix; no command, no mode change.
    Pending,
    RegisterSet(char),
    /// `Q<letter>`: if this toggled recording *off*, carries the keys
    /// recorded since the matching `Q<letter>` that turned it on.
    MacroToggled { register: char, recorded: Option<Vec<KeyToken>> },
    /// `q<letter>`: the caller now replays register `letter`'s stored keys
    /// by calling `begin_macro_replay`/`feed_*`/`end_macro_replay`.
    MacroReplayRequested(char),
    Command { key: KeyToken, count: u32, register: Option<char> },
}

/// The full input-mode machine: mode stack, normal-mode prefix state,
/// macro recorder and the hook manager that `NormalKey`, `InputModeChange`
/// and `InsertEnd` fire through.
pub struct InputMachine<Ctx> {
    modes: ModeStack,
    normal: NormalState,
    macros: MacroRecorder,
    hooks: HookManager<Ctx>,
    awaiting_macro_register: bool,
    awaiting_replay_register: bool,
}

impl<Ctx> Default for InputMachine<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> InputMachine<Ctx> {
    pub fn new() -> Self {
        InputMachine {
            modes: ModeStack::new(),
            normal: NormalState::new(),
            macros: MacroRecorder::new(),
            hooks: HookManager::new(),
            awaiting_macro_register: false,
            awaiting_replay_register: false,
        }
    }

    pub fn hooks(&self) -> &HookManager<Ctx> {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookManager<Ctx> {
        &mut self.hooks
    }

    pub fn mode(&self) -> &Mode {
        self.modes.top()
    }

    pub fn depth(&self) -> usize {
        self.modes.depth()
    }

    pub fn is_recording_macro(&self) -> bool {
        self.macros.is_recording()
    }

    pub fn recording_register(&self) -> Option<char> {
        self.macros.recording_register()
    }

    pub fn is_replaying_macro(&self) -> bool {
        self.macros.is_replaying()
    }

    /// Begins replaying register `reg`'s recorded keys: the caller feeds
    /// each recorded key back through the normal `feed_*` entry points,
    /// then calls `end_macro_replay`. Rejects recursive replay of a
    /// register already being replayed (spec §4.5.2).
    pub fn begin_macro_replay(&mut self, reg: char) -> Result<(), MacroError> {
        self.macros.begin_replay(reg)
    }

    pub fn end_macro_replay(&mut self) {
        self.macros.end_replay();
    }

    fn record(&mut self, key: KeyToken) {
        self.macros.record(key);
    }

    /// Feeds a key while `Normal` is the active mode. Handles `Q<letter>`
    /// macro-record toggling, numeric/register prefix accumulation (via
    /// `NormalState`), and fires the `NormalKey` hook once a key resolves
    /// to a command (the literal key string is the payload, per §4.5.2).
    pub fn feed_normal(&mut self, key: KeyToken, ctx: &mut Ctx) -> NormalOutcome {
        self.record(key);

        if self.awaiting_macro_register {
            self.awaiting_macro_register = false;
            return match key.codepoint {
                Some(reg) => {
                    let recorded = self.macros.toggle(reg);
                    NormalOutcome::MacroToggled { register: reg, recorded }
                }
                None => NormalOutcome::Pending,
            };
        }
        if self.awaiting_replay_register {
            self.awaiting_replay_register = false;
            return match key.codepoint {
                Some(reg) => NormalOutcome::MacroReplayRequested(reg),
                None => NormalOutcome::Pending,
            };
        }
        if key.is_plain('Q') {
            self.awaiting_macro_register = true;
            return NormalOutcome::Pending;
        }
        if key.is_plain('q') && !self.macros.is_recording() {
            self.awaiting_replay_register = true;
            return NormalOutcome::Pending;
        }

        match self.normal.feed(key) {
            NormalDispatch::Pending => NormalOutcome::Pending,
            NormalDispatch::RegisterSet(c) => NormalOutcome::RegisterSet(c),
            NormalDispatch::Command { key, count, register } => {
                self.hooks.run_hook("NormalKey", &key.to_string(), ctx);
                NormalOutcome::Command { key, count, register }
            }
        }
    }

    /// Pushes `Insert` mode, applying `kind`'s selection-preparation table
    /// (spec §4.5.3).
    pub fn enter_insert(
        &mut self,
        kind: InsertKind,
        buffer: &mut Buffer,
        selections: &mut SelectionList,
        ctx: &mut Ctx,
    ) -> Result<(), BufferError> {
        let state = InsertState::prepare(kind, buffer, selections)?;
        self.modes.push(Mode::Insert(state), &self.hooks, ctx);
        Ok(())
    }

    fn insert_state_mut(&mut self) -> Option<&mut InsertState> {
        match self.modes.top_mut() {
            Mode::Insert(s) => Some(s),
            _ => None,
        }
    }

    /// Feeds a key while `Insert` is active. Returns `true` if the key
    /// popped insert mode (`Esc`/`Ctrl-C`).
    pub fn feed_insert(
        &mut self,
        key: KeyToken,
        buffer: &mut Buffer,
        selections: &mut SelectionList,
        ctx: &mut Ctx,
    ) -> Result<bool, BufferError> {
        self.record(key);
        let Some(state) = self.insert_state_mut() else { return Ok(false) };

        if state.is_awaiting_literal() {
            if let Some(c) = key.codepoint {
                state.insert_literal(buffer, selections, c)?;
            }
            return Ok(false);
        }

        if key.is_esc() || key.is_ctrl_c() {
            if let Mode::Insert(state) = self.modes.top() {
                state.leave(buffer, selections);
            }
            self.modes.pop(&self.hooks, ctx);
            self.hooks.run_hook("InsertEnd", "", ctx);
            return Ok(true);
        }
        if key.is_ctrl_char('v') {
            state.begin_literal();
            return Ok(false);
        }
        if key.is_ctrl_char('o') {
            state.toggle_autocomplete_on_idle();
            return Ok(false);
        }
        if key.is_backspace() {
            state.backspace(buffer, selections)?;
            return Ok(false);
        }
        if key.is_delete() {
            state.delete_under(buffer, selections)?;
            return Ok(false);
        }
        if key.is_plain(key::named::LEFT) {
            state.move_cursor(buffer, selections, false);
            return Ok(false);
        }
        if key.is_plain(key::named::RIGHT) {
            state.move_cursor(buffer, selections, true);
            return Ok(false);
        }
        if let Some(c) = key.codepoint {
            if key.modifiers.is_empty() || key.modifiers == Modifiers::SHIFT {
                state.type_char(buffer, selections, c)?;
            }
        }
        Ok(false)
    }

    /// Inserts register `reg`'s contents at each cursor (`Ctrl-R<reg>`);
    /// the caller looks `reg` up against its `RegisterTable` and supplies
    /// the resolved text, since the table is process-wide state that
    /// outlives any one mode (spec §3.5, §5).
    pub fn insert_register_text(
        &mut self,
        text: &str,
        buffer: &mut Buffer,
        selections: &mut SelectionList,
    ) -> Result<(), BufferError> {
        if let Some(state) = self.insert_state_mut() {
            state.insert_register_text(buffer, selections, text)?;
        }
        Ok(())
    }

    /// Pushes `Prompt` mode.
    pub fn enter_prompt(&mut self, password: bool, drop_blank_history: bool, ctx: &mut Ctx) {
        self.modes.push(Mode::Prompt(PromptState::new(password, drop_blank_history)), &self.hooks, ctx);
    }

    fn prompt_state_mut(&mut self) -> Option<&mut PromptState> {
        match self.modes.top_mut() {
            Mode::Prompt(s) => Some(s),
            _ => None,
        }
    }

    pub fn prompt_state(&self) -> Option<&PromptState> {
        match self.modes.top() {
            Mode::Prompt(s) => Some(s),
            _ => None,
        }
    }

    /// Cycles the prompt line's tab completion (`Tab`), a no-op outside
    /// `Prompt` mode.
    pub fn prompt_complete_next(&mut self, completer: impl Fn(&str, usize) -> core_completion::Completions) {
        if let Some(state) = self.prompt_state_mut() {
            state.complete_next(completer);
        }
    }

    /// Feeds a key while `Prompt` is active. `Return` validates (pops with
    /// `Some(line)`), `Esc` aborts (pops with `None`); both record a
    /// history entry per `drop_blank_history` (spec §4.5.4).
    pub fn feed_prompt(&mut self, key: KeyToken, history: &mut PromptHistory, ctx: &mut Ctx) -> Option<Option<String>> {
        self.record(key);
        let Some(state) = self.prompt_state_mut() else { return None };

        if state.is_awaiting_literal() {
            if let Some(c) = key.codepoint {
                state.insert_literal(c);
            }
            return None;
        }
        if key.is_plain('\n') || key.is_plain('\r') {
            let line = state.line();
            state.commit_to_history(history, false);
            self.modes.pop(&self.hooks, ctx);
            return Some(Some(line));
        }
        if key.is_esc() {
            state.commit_to_history(history, true);
            self.modes.pop(&self.hooks, ctx);
            return Some(None);
        }
        if key.is_ctrl_char('v') {
            state.begin_literal();
            return None;
        }
        if key.is_backspace() {
            state.backspace();
            return None;
        }
        if key.is_delete() {
            state.delete();
            return None;
        }
        if key.is_plain(key::named::LEFT) {
            state.move_left();
            return None;
        }
        if key.is_plain(key::named::RIGHT) {
            state.move_right();
            return None;
        }
        if key.is_plain(key::named::HOME) {
            state.move_home();
            return None;
        }
        if key.is_plain(key::named::END) {
            state.move_end();
            return None;
        }
        if let Some(c) = key.codepoint {
            if key.modifiers.is_empty() || key.modifiers == Modifiers::SHIFT {
                state.insert_char(c);
            }
        }
        None
    }

    /// Pushes `Menu` mode.
    pub fn enter_menu(&mut self, items: Vec<String>, ctx: &mut Ctx) {
        self.modes.push(Mode::Menu(MenuState::new(items)), &self.hooks, ctx);
    }

    /// Feeds a key while `Menu` is active. Returns the chosen item's index
    /// on `Return`, `None` on `Esc`; either pops the mode.
    pub fn feed_menu(&mut self, key: KeyToken, ctx: &mut Ctx) -> Option<Option<usize>> {
        self.record(key);
        let Mode::Menu(state) = self.modes.top_mut() else { return None };

        if key.is_plain('\n') || key.is_plain('\r') {
            let idx = state.selected_index();
            self.modes.pop(&self.hooks, ctx);
            return Some(Some(idx));
        }
        if key.is_esc() {
            self.modes.pop(&self.hooks, ctx);
            return Some(None);
        }
        if key.is_plain(key::named::DOWN) {
            state.move_next();
        } else if key.is_plain(key::named::UP) {
            state.move_prev();
        }
        None
    }

    /// Pushes `NextKey` mode: the very next key fed in pops it and is
    /// handed back to the caller (spec §4.5.1's `on_next_key` row).
    pub fn enter_next_key(&mut self, ctx: &mut Ctx) {
        self.modes.push(Mode::NextKey, &self.hooks, ctx);
    }

    pub fn feed_next_key(&mut self, key: KeyToken, ctx: &mut Ctx) -> Option<KeyToken> {
        if !matches!(self.modes.top(), Mode::NextKey) {
            return None;
        }
        self.record(key);
        self.modes.pop(&self.hooks, ctx);
        Some(key)
    }
}
