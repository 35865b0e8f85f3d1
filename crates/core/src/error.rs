#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown resize algorithm: '{0}'")]
    InvalidAlgorithm(String),

    #[error("Decode error: {0}")]
    Decode(String),
}
