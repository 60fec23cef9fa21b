use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("empty data: a write operation needs at least one column")]
    EmptyInput,

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
