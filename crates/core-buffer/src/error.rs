use core_coords::BufferCoord;

/// The single-trailing-newline invariant is enforced by silently patching
/// the rope rather than raising an error -- there is no `Invariant` variant
/// here because the buffer never reaches a state that would need one.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("coordinate {0} is out of range")]
    CoordOutOfRange(BufferCoord),
    #[error("erase range is inverted: begin {begin} > end {end}")]
    InvalidRange {
        begin: BufferCoord,
        end: BufferCoord,
    },
}

/// The editor-wide error taxonomy (spec §7): every crate's own error type
/// converts into this one at the point it crosses into `core-model`, so a
/// command layer can match on kind (`runtime` reports on the status line
/// and keeps going, `invariant` is fatal, ...) instead of each crate's
/// internal error shape.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("{0}")]
    Runtime(String),
    #[error("{0}")]
    Invariant(String),
    #[error("parse error at {pos}: {message}")]
    Parse { pos: usize, message: String },
    #[error("{0}")]
    Disconnected(String),
}

impl EditorError {
    pub fn runtime(message: impl Into<String>) -> Self {
        EditorError::Runtime(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        EditorError::Invariant(message.into())
    }

    pub fn parse(pos: usize, message: impl Into<String>) -> Self {
        EditorError::Parse { pos, message: message.into() }
    }

    pub fn disconnected(message: impl Into<String>) -> Self {
        EditorError::Disconnected(message.into())
    }
}

/// A bad coordinate or an inverted range is always caller error surfaced at
/// a command boundary, never a fatal internal-consistency failure.
impl From<BufferError> for EditorError {
    fn from(e: BufferError) -> Self {
        EditorError::Runtime(e.to_string())
    }
}
