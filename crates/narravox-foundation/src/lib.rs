//! Foundation types for NarraVox
//!
//! Shared error taxonomy and configuration loading used by the pipeline
//! orchestrator. Leaf crates define their own error types; this crate is the
//! aggregation point that decides which failures abort a run.

pub mod error;
pub mod settings;

pub use error::AppError;
pub use settings::Settings;
