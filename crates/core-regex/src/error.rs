#[derive(Debug, thiserror::Error)]
pub enum RegexError {
    #[error("regex parse error at offset {pos}: {message}")]
    Parse { pos: usize, message: String },
}
