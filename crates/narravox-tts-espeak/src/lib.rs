//! eSpeak synthesis engine for NarraVox
//!
//! A local, external-process backend implementing the synthesis gateway
//! contract over `espeak`/`espeak-ng`. Useful for offline runs and for
//! exercising the full pipeline without cloud credentials. Style hints are
//! ignored; espeak has no delivery-instruction support.

use async_trait::async_trait;
use narravox_tts::{AudioData, AudioEncoding, SynthesisEngine, TtsError, TtsResult, VoiceConfig};
use tokio::process::Command;
use tracing::{debug, error};

#[cfg(test)]
mod tests;

/// espeak speaks ~175 words per minute at its default rate.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

pub struct EspeakEngine;

impl EspeakEngine {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the installed command name, preferring `espeak`.
    async fn resolve_command() -> Option<&'static str> {
        for cmd in ["espeak", "espeak-ng"] {
            if Command::new(cmd).arg("--version").output().await.is_ok() {
                return Some(cmd);
            }
        }
        None
    }

    /// Map a voice config onto espeak flags.
    ///
    /// espeak voices are selected by language, so the primary language
    /// subtag stands in for the backend voice name. Rate is a multiplier on
    /// the 175 wpm baseline; pitch maps the -20..20 backend range onto
    /// espeak's 0..99 around the 50 midpoint.
    fn build_args(text: &str, voice: &VoiceConfig) -> Vec<String> {
        let language = voice
            .language_code
            .split('-')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("en")
            .to_ascii_lowercase();

        let rate = (voice.speaking_rate * BASE_WORDS_PER_MINUTE).round() as u32;
        let pitch = (50.0 + voice.pitch * 2.45).clamp(0.0, 99.0).round() as u32;

        vec![
            "--stdout".to_string(),
            "-v".to_string(),
            language,
            "-s".to_string(),
            rate.to_string(),
            "-p".to_string(),
            pitch.to_string(),
            text.to_string(),
        ]
    }
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SynthesisEngine for EspeakEngine {
    fn name(&self) -> &str {
        "espeak"
    }

    async fn is_available(&self) -> bool {
        Self::resolve_command().await.is_some()
    }

    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceConfig,
        style: Option<&str>,
    ) -> TtsResult<AudioData> {
        if text.trim().is_empty() {
            return Err(TtsError::InvalidInput("empty text".to_string()));
        }
        if let Some(style) = style {
            debug!(style, "espeak has no style support, ignoring hint");
        }

        let cmd = Self::resolve_command().await.ok_or_else(|| {
            TtsError::EngineNotAvailable(
                "espeak not found, install espeak or espeak-ng".to_string(),
            )
        })?;

        let args = Self::build_args(text, voice);
        debug!(%cmd, voice = %voice.name, "running espeak synthesis");

        let output = Command::new(cmd).args(&args).output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(%stderr, "espeak synthesis failed");
            return Err(TtsError::Synthesis(format!("espeak: {}", stderr.trim())));
        }
        if output.stdout.is_empty() {
            return Err(TtsError::Synthesis("espeak produced no audio".to_string()));
        }

        // espeak writes a complete WAV stream to stdout: 22050 Hz 16-bit mono.
        Ok(AudioData {
            bytes: output.stdout,
            encoding: AudioEncoding::Linear16,
            sample_rate: 22_050,
            channels: 1,
        })
    }
}
