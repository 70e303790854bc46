use thiserror::Error;

/// Errors raised while reading or parsing script input.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Unsupported document format: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
