//! Script parsing for NarraVox
//!
//! Turns raw text into structured dialogue lines or narration sections.
//! Author-dialect spellings of speaker tags are rewritten to the canonical
//! `[speaker]:` form before pattern matching, so the rest of the pipeline
//! only ever sees one script format.

pub mod dialogue;
pub mod document;
pub mod error;
pub mod gdocs;
pub mod narration;
pub mod normalize;

pub use dialogue::{parse_dialogue, DialogueLine, DialogueScript};
pub use document::{read_document, DocumentReader, PlainTextFile};
pub use error::ScriptError;
pub use narration::{parse_narration, Section};
pub use normalize::normalize_dialects;
