//! Document input dispatch.
//!
//! Rich-document extraction (Word, cloud document APIs) is an external
//! capability: implementations hand back plain text behind [`DocumentReader`].
//! This module owns only the extension dispatch and the plain-text reader.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ScriptError;

/// A source of script text.
pub trait DocumentReader {
    fn read(&self) -> Result<String, ScriptError>;
}

/// Reads UTF-8 text files.
pub struct PlainTextFile {
    path: PathBuf,
}

impl PlainTextFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentReader for PlainTextFile {
    fn read(&self) -> Result<String, ScriptError> {
        debug!(path = %self.path.display(), "reading plain text document");
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// Read a document by extension.
///
/// `.txt`, `.md` and `.markdown` are read as UTF-8 text. Anything else is
/// rejected; rich formats come in through a caller-provided
/// [`DocumentReader`] instead.
pub fn read_document(path: &Path) -> Result<String, ScriptError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "md" | "markdown" => PlainTextFile::new(path).read(),
        _ => Err(ScriptError::UnsupportedFormat { extension }),
    }
}
