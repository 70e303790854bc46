//! Voice configuration and synthesis payload types

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Voice parameters for one synthesis call.
///
/// A value object: two configs with the same fields are the same voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Backend voice identifier.
    pub name: String,
    /// BCP-47 language code.
    pub language_code: String,
    /// Speaking rate multiplier, 1.0 is normal.
    pub speaking_rate: f32,
    /// Pitch shift in backend units, 0.0 is neutral.
    pub pitch: f32,
}

impl VoiceConfig {
    pub fn new(name: impl Into<String>, language_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language_code: language_code.into(),
            speaking_rate: 1.0,
            pitch: 0.0,
        }
    }

    pub fn with_rate(mut self, speaking_rate: f32) -> Self {
        self.speaking_rate = speaking_rate;
        self
    }
}

/// Output encoding requested from a configurable backend.
///
/// Selection follows the output file extension, not an explicit parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioEncoding {
    Mp3,
    Linear16,
    OggOpus,
}

impl AudioEncoding {
    /// Sniff the encoding from an output path's extension. Unknown
    /// extensions fall back to MP3.
    pub fn for_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("wav") => AudioEncoding::Linear16,
            Some("ogg") => AudioEncoding::OggOpus,
            _ => AudioEncoding::Mp3,
        }
    }
}

/// One synthesized segment as returned by a gateway.
#[derive(Debug, Clone)]
pub struct AudioData {
    pub bytes: Vec<u8>,
    pub encoding: AudioEncoding,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Preset voices for Japanese scripts: two male, two female, and a slightly
/// slower narrator.
pub fn japanese_presets() -> Vec<VoiceConfig> {
    vec![
        VoiceConfig::new("ja-JP-Neural2-C", "ja-JP"),
        VoiceConfig::new("ja-JP-Neural2-D", "ja-JP"),
        VoiceConfig::new("ja-JP-Neural2-B", "ja-JP"),
        VoiceConfig::new("ja-JP-Wavenet-A", "ja-JP"),
        VoiceConfig::new("ja-JP-Neural2-B", "ja-JP").with_rate(0.9),
    ]
}

/// Preset voices for English scripts.
pub fn english_presets() -> Vec<VoiceConfig> {
    vec![
        VoiceConfig::new("en-US-Neural2-D", "en-US"),
        VoiceConfig::new("en-US-Neural2-J", "en-US"),
        VoiceConfig::new("en-US-Neural2-F", "en-US"),
        VoiceConfig::new("en-US-Neural2-C", "en-US"),
        VoiceConfig::new("en-US-Neural2-F", "en-US").with_rate(0.9),
    ]
}

/// Preset list for a language code, selected by primary-subtag prefix.
pub fn presets_for_language(language_code: &str) -> Vec<VoiceConfig> {
    if language_code.starts_with("ja") {
        japanese_presets()
    } else {
        english_presets()
    }
}

/// The narrator preset for a language: last entry of the preset list.
pub fn narrator_preset(language_code: &str) -> VoiceConfig {
    presets_for_language(language_code)
        .pop()
        .expect("preset lists are non-empty")
}
