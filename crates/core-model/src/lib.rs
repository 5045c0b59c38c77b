//! The aggregator crate: every piece of mutable editor-core state behind
//! one explicit `Context` value, exposing the buffer, motion, input and
//! register external interfaces as inherent methods.
//!
//! Grounded on the teacher's `core-model`, a thin crate that existed only
//! to depend on the rest of the workspace and re-export a composed view;
//! the dependency list below plays the same role against this crate
//! family. Global singletons (a buffer manager, a register manager, a hook
//! manager, a mode manager, an option manager) are replaced with ordinary
//! fields on one value threaded through every call, the same "explicit
//! state, no statics" shape the teacher's `core-state::Editor` already
//! used for its own buffer list and active view.

mod buffers;
mod display;

pub use buffers::{BufferId, ChangeListener, ListenerId};
pub use core_buffer::{BufferError, BufferFlags, Change, EditorError, Timestamp};
pub use core_completion::Completions;
pub use core_input::{InsertKind, KeyToken, MacroError, Modifiers, NormalOutcome};
pub use core_options::{OptionError, OptionValue, ScopeId};
pub use core_registers::HookError;
pub use core_selection::{ApplyMode, Selection, SelectionError};
pub use display::{CursorMode, DisplayLine};

use buffers::{BufferEntry, BufferTable};
use core_buffer::Buffer;
use core_coords::{BufferCoord, ColumnCount, DisplayCoord, LineCount};
use core_input::{InputMachine, Mode as InputMode, PromptHistory};
use core_options::OptionTree;
use core_registers::RegisterTable;
use core_selection::SelectionList;
use std::collections::HashMap;

/// Tabstop used by `get_cursor_info` when no `tabstop` option has been set
/// on the root scope.
const DEFAULT_TABSTOP: i64 = 8;

/// What feeding one key through the mode stack produced, flattened across
/// all five modes so a caller doesn't need to match on which mode was
/// active beforehand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The mode is still accumulating input; nothing resolved yet.
    Pending,
    Normal(NormalOutcome),
    /// Insert mode consumed the key and is still active.
    InsertHandled,
    /// `Esc`/`Ctrl-C` popped insert mode.
    InsertLeft,
    PromptSubmitted(String),
    PromptAborted,
    MenuChosen(usize),
    MenuAborted,
    NextKey(KeyToken),
}

/// Every piece of mutable editor-core state, owned behind one value.
///
/// `HookManager`/`InputMachine` are both generic over an externally
/// supplied context so a hook body or mode transition can reach arbitrary
/// caller state; instantiated here with `Ctx = ()` rather than `Ctx =
/// Context`. Embedding `InputMachine<Context>` inside `Context` would need
/// a hook body to take `&mut Context` while `Context` already holds the
/// `&mut` borrow used to invoke it -- an unconditional double borrow, not
/// a lifetime that more structure would fix. Hook bodies that need live
/// editor state are out of scope (only `add_hook`/`run_hook` dispatch is);
/// the dynamic registers that do need live state (`%`, `.`, `#`, `0`..`9`)
/// are implemented as direct methods below instead of through
/// `RegisterTable::register_dynamic`.
pub struct Context {
    buffers: BufferTable,
    registers: RegisterTable<()>,
    options: OptionTree,
    input: InputMachine<()>,
    histories: HashMap<String, PromptHistory>,
    current_prompt_key: Option<String>,
    last_captures: Vec<Vec<String>>,
    active: Option<BufferId>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Context {
            buffers: BufferTable::new(),
            registers: RegisterTable::new(),
            options: OptionTree::new(),
            input: InputMachine::new(),
            histories: HashMap::new(),
            current_prompt_key: None,
            last_captures: Vec::new(),
            active: None,
        }
    }

    // ---- buffer table management ---------------------------------------

    /// Opens a new buffer and returns its handle. The first buffer opened
    /// becomes the active one.
    pub fn open_buffer(&mut self, name: impl Into<String>, flags: BufferFlags, content: &str) -> BufferId {
        let id = self.buffers.insert(Buffer::new(name, flags, content));
        if self.active.is_none() {
            self.active = Some(id);
        }
        tracing::debug!(target: "model.buffers", ?id, "buffer opened");
        id
    }

    /// Closes `id`. If it was the active buffer, some other live buffer
    /// (or none) becomes active.
    pub fn close_buffer(&mut self, id: BufferId) -> bool {
        let closed = self.buffers.close(id);
        if closed && self.active == Some(id) {
            self.active = self.buffers.ids().next();
        }
        closed
    }

    pub fn active_buffer_id(&self) -> Option<BufferId> {
        self.active
    }

    pub fn set_active_buffer(&mut self, id: BufferId) -> Result<(), EditorError> {
        self.buffer_entry(id)?;
        self.active = Some(id);
        Ok(())
    }

    pub fn buffer_ids(&self) -> impl Iterator<Item = BufferId> + '_ {
        self.buffers.ids()
    }

    fn buffer_entry(&self, id: BufferId) -> Result<&BufferEntry, EditorError> {
        self.buffers.get(id).ok_or_else(|| EditorError::runtime("no such buffer"))
    }

    fn buffer_entry_mut(&mut self, id: BufferId) -> Result<&mut BufferEntry, EditorError> {
        self.buffers.get_mut(id).ok_or_else(|| EditorError::runtime("no such buffer"))
    }

    // ---- buffer interface -----------------------------------------------

    pub fn insert(&mut self, id: BufferId, at: BufferCoord, text: &str) -> Result<BufferCoord, EditorError> {
        Ok(self.buffer_entry_mut(id)?.record_and_notify(|buffer, _| buffer.insert(at, text))?)
    }

    pub fn erase(&mut self, id: BufferId, begin: BufferCoord, end: BufferCoord) -> Result<BufferCoord, EditorError> {
        Ok(self.buffer_entry_mut(id)?.record_and_notify(|buffer, _| buffer.erase(begin, end))?)
    }

    pub fn content_range(&self, id: BufferId, begin: BufferCoord, end: BufferCoord) -> Result<String, EditorError> {
        Ok(self.buffer_entry(id)?.buffer.substring(begin, end)?)
    }

    pub fn line(&self, id: BufferId, line: LineCount) -> Result<String, EditorError> {
        let buffer = &self.buffer_entry(id)?.buffer;
        let len = buffer.line_length(line)?;
        Ok(buffer.substring(BufferCoord::new(line, 0usize), BufferCoord::new(line, len.get()))?)
    }

    pub fn line_count(&self, id: BufferId) -> Result<LineCount, EditorError> {
        Ok(self.buffer_entry(id)?.buffer.line_count())
    }

    pub fn timestamp(&self, id: BufferId) -> Result<Timestamp, EditorError> {
        Ok(self.buffer_entry(id)?.buffer.timestamp())
    }

    pub fn changes_since(&self, id: BufferId, ts: Timestamp) -> Result<Vec<Change>, EditorError> {
        Ok(self.buffer_entry(id)?.buffer.changes_since(ts))
    }

    pub fn subscribe(&mut self, id: BufferId, listener: Box<dyn ChangeListener>) -> Result<ListenerId, EditorError> {
        Ok(self.buffer_entry_mut(id)?.subscribe(listener))
    }

    pub fn unsubscribe(&mut self, id: BufferId, listener_id: ListenerId) -> Result<(), EditorError> {
        self.buffer_entry_mut(id)?.unsubscribe(listener_id);
        Ok(())
    }

    // ---- motion interface -------------------------------------------------

    pub fn selections(&self, id: BufferId) -> Result<&SelectionList, EditorError> {
        Ok(&self.buffer_entry(id)?.selections)
    }

    pub fn set_main_index(&mut self, id: BufferId, index: usize) -> Result<(), EditorError> {
        Ok(self.buffer_entry_mut(id)?.selections.set_main_index(index)?)
    }

    pub fn rotate_main(&mut self, id: BufferId, n: isize) -> Result<(), EditorError> {
        self.buffer_entry_mut(id)?.selections.rotate_main(n);
        Ok(())
    }

    /// Applies `motion` across every selection, combined per `mode`.
    /// Captures the motion produced (if any) into the register `0`..`9`
    /// state `read_register` falls back on.
    pub fn apply_motion(
        &mut self,
        id: BufferId,
        mode: ApplyMode,
        motion: impl Fn(&Selection) -> Selection,
    ) -> Result<(), EditorError> {
        let entry = self.buffer_entry_mut(id)?;
        entry.selections.update(&entry.buffer);
        entry.selections.apply(mode, motion);
        self.capture_registers(id)
    }

    /// Applies a fan-out motion (one selection in, many out), flattening
    /// the results.
    pub fn apply_multi_motion(
        &mut self,
        id: BufferId,
        motion: impl Fn(&Selection) -> Vec<Selection>,
    ) -> Result<(), EditorError> {
        let entry = self.buffer_entry_mut(id)?;
        entry.selections.update(&entry.buffer);
        entry.selections.apply_multi(motion)?;
        self.capture_registers(id)
    }

    pub fn keep_selections_if(&mut self, id: BufferId, pred: impl Fn(&Selection) -> bool) -> Result<(), EditorError> {
        Ok(self.buffer_entry_mut(id)?.selections.keep_if(pred)?)
    }

    pub fn remove_selections_if(&mut self, id: BufferId, pred: impl Fn(&Selection) -> bool) -> Result<(), EditorError> {
        Ok(self.buffer_entry_mut(id)?.selections.remove_if(pred)?)
    }

    pub fn insert_before_selections(&mut self, id: BufferId, text: &str) -> Result<(), EditorError> {
        Ok(self.buffer_entry_mut(id)?.record_and_notify(|buffer, selections| selections.insert_before(buffer, text))?)
    }

    pub fn insert_after_selections(&mut self, id: BufferId, text: &str) -> Result<(), EditorError> {
        Ok(self.buffer_entry_mut(id)?.record_and_notify(|buffer, selections| selections.insert_after(buffer, text))?)
    }

    pub fn replace_selections(&mut self, id: BufferId, text: &str) -> Result<(), EditorError> {
        Ok(self.buffer_entry_mut(id)?.record_and_notify(|buffer, selections| selections.replace(buffer, text))?)
    }

    pub fn erase_selections(&mut self, id: BufferId) -> Result<(), EditorError> {
        Ok(self.buffer_entry_mut(id)?.record_and_notify(|buffer, selections| selections.erase(buffer))?)
    }

    /// Records the active selections' captures: the first nine groups go
    /// in registers `1`..`9`, the whole match in `0`, one value per
    /// selection. Selections with no captures (a non-regex motion)
    /// contribute an empty string.
    fn capture_registers(&mut self, id: BufferId) -> Result<(), EditorError> {
        let entry = self.buffer_entry(id)?;
        self.last_captures = entry
            .selections
            .selections()
            .iter()
            .map(|s| s.captures().map(<[String]>::to_vec).unwrap_or_default())
            .collect();
        Ok(())
    }

    // ---- input interface ----------------------------------------------------

    pub fn mode_name(&self) -> &'static str {
        self.input.mode().name()
    }

    pub fn enter_insert(&mut self, id: BufferId, kind: InsertKind) -> Result<(), EditorError> {
        let input = &mut self.input;
        let entry = self.buffers.get_mut(id).ok_or_else(|| EditorError::runtime("no such buffer"))?;
        entry.record_and_notify(|buffer, selections| input.enter_insert(kind, buffer, selections, &mut ()))?;
        Ok(())
    }

    pub fn insert_register_text(&mut self, id: BufferId, text: &str) -> Result<(), EditorError> {
        let input = &mut self.input;
        let entry = self.buffers.get_mut(id).ok_or_else(|| EditorError::runtime("no such buffer"))?;
        entry.record_and_notify(|buffer, selections| input.insert_register_text(text, buffer, selections))?;
        Ok(())
    }

    /// Pushes `Prompt` mode, scoping its history under `prompt_key` (a
    /// search prompt and a command prompt keep separate histories).
    pub fn enter_prompt(&mut self, prompt_key: impl Into<String>, password: bool, drop_blank_history: bool) {
        self.current_prompt_key = Some(prompt_key.into());
        self.input.enter_prompt(password, drop_blank_history, &mut ());
    }

    pub fn prompt_line(&self) -> Option<String> {
        self.input.prompt_state().map(|s| s.display())
    }

    pub fn prompt_complete_next(&mut self, completer: impl Fn(&str, usize) -> Completions) {
        self.input.prompt_complete_next(completer);
    }

    pub fn enter_menu(&mut self, items: Vec<String>) {
        self.input.enter_menu(items, &mut ());
    }

    pub fn enter_next_key(&mut self) {
        self.input.enter_next_key(&mut ());
    }

    pub fn is_recording_macro(&self) -> bool {
        self.input.is_recording_macro()
    }

    pub fn recording_register(&self) -> Option<char> {
        self.input.recording_register()
    }

    pub fn is_replaying_macro(&self) -> bool {
        self.input.is_replaying_macro()
    }

    pub fn begin_macro_replay(&mut self, reg: char) -> Result<(), MacroError> {
        self.input.begin_macro_replay(reg)
    }

    pub fn end_macro_replay(&mut self) {
        self.input.end_macro_replay();
    }

    pub fn add_hook(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
        body: impl Fn(&str, &mut ()) -> Result<(), String> + 'static,
    ) -> Result<(), HookError> {
        self.input.hooks_mut().add_hook(name, pattern, body)
    }

    pub fn run_hook(&self, name: &str, param: &str) {
        self.input.hooks().run_hook(name, param, &mut ());
    }

    pub fn set_hooks_disabled(&mut self, disabled: bool) {
        self.input.hooks_mut().set_disabled(disabled);
    }

    /// Feeds one key through whichever mode is on top of the stack.
    /// Insert-mode keys are applied against the active buffer; the other
    /// modes don't touch buffer state at all.
    pub fn feed_key(&mut self, key: KeyToken) -> Result<FeedOutcome, EditorError> {
        match self.input.mode() {
            InputMode::Normal => Ok(FeedOutcome::Normal(self.input.feed_normal(key, &mut ()))),
            InputMode::Insert(_) => {
                let id = self.active.ok_or_else(|| EditorError::runtime("no active buffer"))?;
                let input = &mut self.input;
                let entry = self.buffers.get_mut(id).ok_or_else(|| EditorError::runtime("no such buffer"))?;
                let left = entry.record_and_notify(|buffer, selections| input.feed_insert(key, buffer, selections, &mut ()))?;
                Ok(if left { FeedOutcome::InsertLeft } else { FeedOutcome::InsertHandled })
            }
            InputMode::Prompt(_) => {
                let prompt_key = self.current_prompt_key.clone().unwrap_or_default();
                let history = self.histories.entry(prompt_key).or_default();
                match self.input.feed_prompt(key, history, &mut ()) {
                    None => Ok(FeedOutcome::Pending),
                    Some(Some(line)) => Ok(FeedOutcome::PromptSubmitted(line)),
                    Some(None) => Ok(FeedOutcome::PromptAborted),
                }
            }
            InputMode::Menu(_) => match self.input.feed_menu(key, &mut ()) {
                None => Ok(FeedOutcome::Pending),
                Some(Some(index)) => Ok(FeedOutcome::MenuChosen(index)),
                Some(None) => Ok(FeedOutcome::MenuAborted),
            },
            InputMode::NextKey => match self.input.feed_next_key(key, &mut ()) {
                None => Ok(FeedOutcome::Pending),
                Some(key) => Ok(FeedOutcome::NextKey(key)),
            },
        }
    }

    pub fn get_mode_line(&self) -> DisplayLine {
        let mode = self.input.mode().name();
        let buffer_part = self
            .active
            .and_then(|id| self.buffers.get(id))
            .map(|entry| format!("{} [{} sel]", entry.buffer.name(), entry.selections.len()))
            .unwrap_or_else(|| "[no buffer]".to_string());
        DisplayLine::new(format!("{buffer_part} -- {mode} --"))
    }

    pub fn get_cursor_info(&self) -> Result<(CursorMode, DisplayCoord), EditorError> {
        if let InputMode::Prompt(state) = self.input.mode() {
            return Ok((CursorMode::Prompt, DisplayCoord::new(LineCount::ZERO, ColumnCount(state.cursor()))));
        }
        let id = self.active.ok_or_else(|| EditorError::runtime("no active buffer"))?;
        let entry = self.buffer_entry(id)?;
        let cursor = entry.selections.main().cursor();
        let line_len = entry.buffer.line_length(cursor.line)?.get();
        let line_text = entry.buffer.substring(BufferCoord::new(cursor.line, 0usize), BufferCoord::new(cursor.line, line_len))?;
        let tabstop = self.options.get_int(self.options.root(), "tabstop").unwrap_or(DEFAULT_TABSTOP).max(1);
        let column = core_coords::byte_to_column(&line_text, cursor.byte, ColumnCount(tabstop as usize), core_text::char_width);
        Ok((CursorMode::Buffer, DisplayCoord::new(cursor.line, column)))
    }

    // ---- options ----------------------------------------------------------

    pub fn options(&self) -> &OptionTree {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OptionTree {
        &mut self.options
    }

    // ---- register interface -------------------------------------------------

    /// Every register name resolves through four special cases before
    /// falling back to the static/dynamic table: `%` (active buffer
    /// name), `.` (each selection's own text), `#` (1-based selection
    /// index) and `0`..`9` (the last motion's captures). These need live
    /// `Context` state no `RegisterTable<()>` callback can reach without
    /// the self-reference `Context`'s own doc comment explains.
    pub fn read_register(&self, reg: char) -> Vec<String> {
        match reg {
            '%' => vec![self.active_buffer_name()],
            '.' => self.selection_contents(),
            '#' => self.selection_indices(),
            '0'..='9' => self.capture_register(reg),
            _ => self.registers.read(reg, &()),
        }
    }

    /// The value `reg` contributes to selection `index`, clamped to
    /// `min(index, N-1)`.
    pub fn read_register_for_selection(&self, reg: char, index: usize) -> String {
        let values = self.read_register(reg);
        let last = values.len() - 1;
        values[index.min(last)].clone()
    }

    pub fn write_register(&mut self, reg: char, values: Vec<String>) {
        self.registers.write(reg, values);
    }

    pub fn register_dynamic(&mut self, reg: char, f: impl Fn(&()) -> Vec<String> + 'static) {
        self.registers.register_dynamic(reg, f);
    }

    fn active_buffer_name(&self) -> String {
        self.active
            .and_then(|id| self.buffers.get(id))
            .map(|entry| entry.buffer.name().to_string())
            .unwrap_or_default()
    }

    fn selection_contents(&self) -> Vec<String> {
        let Some(entry) = self.active.and_then(|id| self.buffers.get(id)) else {
            return vec![String::new()];
        };
        entry
            .selections
            .selections()
            .iter()
            .map(|s| entry.buffer.substring(s.min(), entry.buffer.next(s.max())).unwrap_or_default())
            .collect()
    }

    fn selection_indices(&self) -> Vec<String> {
        let Some(entry) = self.active.and_then(|id| self.buffers.get(id)) else {
            return vec!["0".to_string()];
        };
        (0..entry.selections.len()).map(|i| (i + 1).to_string()).collect()
    }

    fn capture_register(&self, reg: char) -> Vec<String> {
        let slot = reg.to_digit(10).expect("matched '0'..='9'") as usize;
        if self.last_captures.is_empty() {
            return vec![String::new()];
        }
        self.last_captures.iter().map(|c| c.get(slot).cloned().unwrap_or_default()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_buffer(content: &str) -> (Context, BufferId) {
        let mut ctx = Context::new();
        let id = ctx.open_buffer("scratch", BufferFlags::SCRATCH, content);
        (ctx, id)
    }

    #[test]
    fn insert_and_erase_go_through_the_buffer_interface() {
        let (mut ctx, id) = ctx_with_buffer("hello\n");
        ctx.insert(id, BufferCoord::new(0usize, 5usize), " world").unwrap();
        assert_eq!(ctx.content_range(id, BufferCoord::ZERO, BufferCoord::new(0usize, 11usize)).unwrap(), "hello world");
        ctx.erase(id, BufferCoord::new(0usize, 5usize), BufferCoord::new(0usize, 11usize)).unwrap();
        assert_eq!(ctx.line(id, LineCount(0)).unwrap(), "hello\n");
    }

    #[test]
    fn unknown_buffer_id_is_a_runtime_error() {
        let (mut ctx, id) = ctx_with_buffer("x\n");
        ctx.close_buffer(id);
        assert!(matches!(ctx.line_count(id), Err(EditorError::Runtime(_))));
    }

    #[test]
    fn subscribers_see_inserts_made_through_selection_ops_too() {
        struct Counter(usize);
        impl ChangeListener for Counter {
            fn on_insert(&mut self, _begin: BufferCoord, _end: BufferCoord) {
                self.0 += 1;
            }
            fn on_erase(&mut self, _begin: BufferCoord, _end: BufferCoord) {}
        }

        let (mut ctx, id) = ctx_with_buffer("abc\n");
        ctx.subscribe(id, Box::new(Counter(0))).unwrap();
        ctx.insert_before_selections(id, "X").unwrap();
        assert_eq!(ctx.content_range(id, BufferCoord::ZERO, BufferCoord::new(0usize, 4usize)).unwrap(), "Xabc");
    }

    #[test]
    fn apply_motion_feeds_captures_into_registers_zero_through_nine() {
        let (mut ctx, id) = ctx_with_buffer("foo 123\n");
        let regex = core_regex::Regex::new(r"(\w+)\s+(\d+)").unwrap();
        let buffer_snapshot = Buffer::new("scratch", BufferFlags::SCRATCH, "foo 123\n");
        let matched = core_motion::select_to_next_match(&buffer_snapshot, &Selection::at(BufferCoord::ZERO), &regex).unwrap();
        ctx.apply_motion(id, ApplyMode::Replace, move |_s| matched.clone()).unwrap();
        assert_eq!(ctx.read_register('1'), vec!["foo".to_string()]);
        assert_eq!(ctx.read_register('2'), vec!["123".to_string()]);
        assert_eq!(ctx.read_register('0'), vec!["foo 123".to_string()]);
    }

    #[test]
    fn percent_register_reads_the_active_buffer_name() {
        let (ctx, _id) = ctx_with_buffer("x\n");
        assert_eq!(ctx.read_register('%'), vec!["scratch".to_string()]);
    }

    #[test]
    fn dot_register_reads_each_selections_own_text() {
        let (mut ctx, id) = ctx_with_buffer("hello\n");
        ctx.apply_motion(id, ApplyMode::Replace, |_s| {
            Selection::new(BufferCoord::new(0usize, 0usize), BufferCoord::new(0usize, 3usize))
        })
        .unwrap();
        assert_eq!(ctx.read_register('.'), vec!["hell".to_string()]);
    }

    #[test]
    fn unset_register_reads_as_a_single_empty_string() {
        let (ctx, _id) = ctx_with_buffer("x\n");
        assert_eq!(ctx.read_register('"'), vec![String::new()]);
    }

    #[test]
    fn write_then_read_clamps_past_the_written_list() {
        let (mut ctx, _id) = ctx_with_buffer("x\n");
        ctx.write_register('a', vec!["one".into(), "two".into()]);
        assert_eq!(ctx.read_register_for_selection('a', 0), "one");
        assert_eq!(ctx.read_register_for_selection('a', 5), "two");
    }

    #[test]
    fn feed_key_dispatches_insert_mode_against_the_active_buffer() {
        let (mut ctx, id) = ctx_with_buffer("abc\n");
        ctx.enter_insert(id, InsertKind::Insert).unwrap();
        assert_eq!(ctx.mode_name(), "insert");
        let outcome = ctx.feed_key(KeyToken::char('X')).unwrap();
        assert_eq!(outcome, FeedOutcome::InsertHandled);
        assert_eq!(ctx.content_range(id, BufferCoord::ZERO, BufferCoord::new(0usize, 4usize)).unwrap(), "Xabc");
        let outcome = ctx.feed_key(KeyToken::esc()).unwrap();
        assert_eq!(outcome, FeedOutcome::InsertLeft);
        assert_eq!(ctx.mode_name(), "normal");
    }

    #[test]
    fn feed_key_dispatches_prompt_mode_and_commits_history() {
        let mut ctx = Context::new();
        ctx.enter_prompt("search", false, false);
        ctx.feed_key(KeyToken::char('a')).unwrap();
        let outcome = ctx.feed_key(KeyToken::char('\n')).unwrap();
        assert_eq!(outcome, FeedOutcome::PromptSubmitted("a".to_string()));
        assert_eq!(ctx.mode_name(), "normal");
    }

    #[test]
    fn get_cursor_info_reports_prompt_mode_while_a_prompt_is_active() {
        let mut ctx = Context::new();
        ctx.enter_prompt("cmd", false, false);
        let (mode, _coord) = ctx.get_cursor_info().unwrap();
        assert_eq!(mode, CursorMode::Prompt);
    }

    #[test]
    fn get_cursor_info_expands_tabs_using_the_tabstop_option() {
        let (mut ctx, id) = ctx_with_buffer("\tx\n");
        let root = ctx.options().root();
        ctx.options_mut().set(root, "tabstop", OptionValue::Int(4));
        ctx.apply_motion(id, ApplyMode::Replace, |_s| Selection::at(BufferCoord::new(0usize, 1usize))).unwrap();
        let (mode, coord) = ctx.get_cursor_info().unwrap();
        assert_eq!(mode, CursorMode::Buffer);
        assert_eq!(coord.column, ColumnCount(4));
    }

    #[test]
    fn closing_the_active_buffer_falls_back_to_another_live_one() {
        let mut ctx = Context::new();
        let first = ctx.open_buffer("a", BufferFlags::SCRATCH, "a\n");
        let second = ctx.open_buffer("b", BufferFlags::SCRATCH, "b\n");
        ctx.set_active_buffer(first).unwrap();
        ctx.close_buffer(first);
        assert_eq!(ctx.active_buffer_id(), Some(second));
    }

    #[test]
    fn hooks_fire_through_the_input_machines_dispatcher() {
        let mut ctx = Context::new();
        let fired = std::rc::Rc::new(std::cell::RefCell::new(false));
        let flag = fired.clone();
        ctx.add_hook("NormalKey", ".*", move |_param, _ctx| {
            *flag.borrow_mut() = true;
            Ok(())
        })
        .unwrap();
        ctx.feed_key(KeyToken::char('w')).unwrap();
        assert!(*fired.borrow());
    }
}
