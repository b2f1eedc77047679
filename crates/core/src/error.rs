/// Failures raised by the domain layer: input validation, processing state
/// transitions and file storage.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid processing state transition: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}
