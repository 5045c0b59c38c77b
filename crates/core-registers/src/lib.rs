//! Named registers and the event-hook dispatcher.
//!
//! Grounded on Kakoune's `register.hh`/`register_manager.hh` for the
//! register shape, generalized from one `String` per register to
//! `Vec<String>` (the dynamic `.` register needs one value per selection,
//! not one value total) and on `hook_manager.hh` for `add_hook`/`run_hook`.
//! Kakoune's source carries a second, incompatible `HooksManager`
//! (window/buffer-typed context rather than a regex-matched string
//! payload); this crate implements only the `HookManager` contract, the one
//! whose `(name, pattern, body)` / `run_hook(name, param, ctx)` shape
//! matches a string-payload-matched-by-regex dispatcher.

mod hooks;
mod registers;

pub use hooks::{HookError, HookManager};
pub use registers::RegisterTable;
