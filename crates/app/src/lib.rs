//! NarraVox pipeline orchestration
//!
//! Drives parsing → voice assignment → per-segment synthesis → assembly →
//! export. Per-segment synthesis failures are absorbed and reported; the run
//! only fails when nothing at all could be synthesized.

pub mod export;
pub mod pipeline;
