use core_coords::BufferCoord;

/// Strictly monotonic counter bumped on every applied modification,
/// including ones replayed by undo/redo. Meaningful only relative to a
/// specific buffer: a stored `Timestamp` must be paired with `changes_since`
/// on the buffer it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Erase,
}

/// A record of one applied primitive, used by `SelectionList::update` (and
/// any other change-log consumer) to remap stale coordinates.
///
/// `end` is always the *pre-application* extent of the affected span: for an
/// insert, `begin` is where the text went in and `end` is the first coord
/// past it; for an erase, `begin`/`end` are the range that got removed (not
/// collapsed to `begin`), so a remapper can still tell "inside the erased
/// text" from "after it" and size the backward translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    pub begin: BufferCoord,
    pub end: BufferCoord,
    pub at_end_of_buffer: bool,
}

/// One atomic text change, undoable by keeping enough information to derive
/// its inverse without touching the buffer again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modification {
    Insert { at: BufferCoord, text: String },
    Erase { at: BufferCoord, text: String },
}
