use thiserror::Error;

/// Errors from buffer operations and WAV I/O.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Buffer format mismatch: expected {expected}, got {actual}")]
    FormatMismatch { expected: String, actual: String },

    #[error("Overlay exceeds destination: base ends at {base_ms}ms, layer would end at {end_ms}ms")]
    OverlayOutOfRange { base_ms: u64, end_ms: u64 },

    #[error("Cannot decode {0} audio in-process")]
    UndecodableFormat(String),

    #[error("WAV error: {0}")]
    Wav(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<hound::Error> for AudioError {
    fn from(e: hound::Error) -> Self {
        AudioError::Wav(e.to_string())
    }
}
