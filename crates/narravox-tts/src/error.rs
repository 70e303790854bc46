//! Error types for synthesis

use thiserror::Error;

/// Synthesis gateway errors.
///
/// The gateway contract carries no retriable/non-retriable classification, so
/// callers treat every variant as retriable within their own retry budget.
#[derive(Error, Debug)]
pub enum TtsError {
    #[error("TTS engine not available: {0}")]
    EngineNotAvailable(String),

    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    #[error("Invalid text input: {0}")]
    InvalidInput(String),

    #[error("Synthesis call timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for synthesis operations.
pub type TtsResult<T> = Result<T, TtsError>;
