#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("empty selection set")]
    EmptySelectionSet,
    #[error("nothing selected")]
    NothingSelected,
    #[error("main index {0} out of range")]
    MainIndexOutOfRange(usize),
}

/// An emptied selection set or an out-of-range main index are user-visible
/// command failures (spec §7's runtime kind), not internal-consistency
/// breaks.
impl From<SelectionError> for core_buffer::EditorError {
    fn from(e: SelectionError) -> Self {
        core_buffer::EditorError::Runtime(e.to_string())
    }
}
