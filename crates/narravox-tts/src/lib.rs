//! Text-to-speech gateway abstraction for NarraVox
//!
//! This crate owns the synthesis contract (text + voice parameters in, audio
//! bytes out), the voice configuration value types, and the speaker-to-voice
//! casting logic. Backends live behind [`SynthesisEngine`]; the engine handle
//! is constructed once and passed explicitly wherever synthesis happens.

pub mod engine;
pub mod error;
pub mod types;
pub mod voices;

pub use engine::SynthesisEngine;
pub use error::{TtsError, TtsResult};
pub use types::{
    english_presets, japanese_presets, narrator_preset, presets_for_language, AudioData,
    AudioEncoding, VoiceConfig,
};
pub use voices::{AlternatingCast, CastMember, CastStrategy, RoundRobinCast, VoiceManager};
