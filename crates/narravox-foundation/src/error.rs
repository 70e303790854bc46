use narravox_audio::AudioError;
use narravox_script::ScriptError;
use narravox_tts::TtsError;
use thiserror::Error;

/// Run-aborting errors.
///
/// Per-segment synthesis failures and encoder fallbacks are deliberately not
/// represented here: they are absorbed by the pipeline, logged, and reported
/// in the run's result alongside the output.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Script produced no segments, nothing to synthesize")]
    EmptyScript,

    #[error("Required credential not configured: {0}")]
    UnconfiguredCredential(String),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Synthesis error: {0}")]
    Tts(#[from] TtsError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether the error was raised before any synthesis was attempted.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            AppError::EmptyScript
                | AppError::UnconfiguredCredential(_)
                | AppError::UnsupportedFormat(_)
                | AppError::Config(_)
        )
    }
}
