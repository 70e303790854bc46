//! Pipeline orchestrator.
//!
//! Segments are synthesized strictly in script order and assembly consumes
//! them in that same order. A failed segment is reported and skipped rather
//! than aborting the run; the run fails only when no segment at all could be
//! synthesized. Per-segment buffers are dropped as soon as they are folded
//! into the combined output.

use std::time::Duration;

use narravox_audio::{insert_silence_between, EncodedAudio, EncodedFormat, PcmBuffer, TrackBuilder};
use narravox_foundation::{AppError, Settings};
use narravox_script::{parse_dialogue, parse_narration};
use narravox_tts::{
    narrator_preset, AudioData, AudioEncoding, SynthesisEngine, TtsError, VoiceConfig,
    VoiceManager,
};
use tracing::{info, warn};

/// One absorbed segment failure, for user-visible reporting.
#[derive(Debug, Clone)]
pub struct SegmentReport {
    /// Position in the synthesis sequence, 0-based.
    pub index: usize,
    /// Source line for dialogue segments.
    pub line_number: Option<u32>,
    /// Speaker name or section title.
    pub label: String,
    pub error: String,
}

#[derive(Debug)]
pub struct DialogueOutput {
    pub audio: PcmBuffer,
    pub synthesized: usize,
    pub skipped: Vec<SegmentReport>,
}

#[derive(Debug)]
pub struct NarrationOutput {
    /// Combined audio, unless chapter splitting was requested.
    pub combined: Option<PcmBuffer>,
    /// Per-section audio with sanitized titles, when splitting.
    pub chapters: Vec<(String, PcmBuffer)>,
    pub skipped: Vec<SegmentReport>,
}

/// Drives one run: parse → cast → synthesize → assemble.
///
/// The engine handle is injected and constructed once; the pipeline never
/// reaches for a hidden process-wide client.
pub struct Pipeline {
    settings: Settings,
    engine: Box<dyn SynthesisEngine>,
    voices: VoiceManager,
}

impl Pipeline {
    pub fn new(settings: Settings, engine: Box<dyn SynthesisEngine>) -> Self {
        let voices = VoiceManager::new(settings.default_language.clone());
        Self {
            settings,
            engine,
            voices,
        }
    }

    pub fn voices_mut(&mut self) -> &mut VoiceManager {
        &mut self.voices
    }

    /// Fail fast when the engine cannot serve requests at all.
    pub async fn ensure_ready(&self) -> Result<(), AppError> {
        if self.engine.is_available().await {
            Ok(())
        } else {
            Err(AppError::Tts(TtsError::EngineNotAvailable(
                self.engine.name().to_string(),
            )))
        }
    }

    /// Dialogue script → one buffer with a silence gap between lines.
    pub async fn run_dialogue(
        &mut self,
        text: &str,
        gap_ms: u32,
    ) -> Result<DialogueOutput, AppError> {
        let script = parse_dialogue(text);
        if script.is_empty() {
            return Err(AppError::EmptyScript);
        }
        self.voices.assign_all(&script.speakers);
        info!(
            lines = script.lines.len(),
            speakers = script.speakers.len(),
            "dialogue script parsed"
        );

        let mut segments = Vec::new();
        let mut skipped = Vec::new();
        for (index, line) in script.lines.iter().enumerate() {
            let voice = self.voices.voice_for(&line.speaker);
            match self.synthesize_segment(&line.text, &voice, None).await {
                Ok(buffer) => segments.push(buffer),
                Err(e) => self.report_skip(&mut skipped, index, Some(line.line_number), &line.speaker, e),
            }
        }
        let audio = self.assemble(segments, gap_ms, &skipped)?;
        Ok(DialogueOutput {
            audio,
            synthesized: script.lines.len() - skipped.len(),
            skipped,
        })
    }

    /// Narration text → combined buffer, or per-chapter buffers when
    /// `split_chapters` is set.
    pub async fn run_narration(
        &mut self,
        text: &str,
        voice_name: Option<&str>,
        gap_ms: u32,
        split_chapters: bool,
    ) -> Result<NarrationOutput, AppError> {
        let sections = parse_narration(text);
        if sections.is_empty() {
            return Err(AppError::EmptyScript);
        }

        // Explicit voice beats the configured default voice beats the
        // language's narrator preset.
        let voice = match voice_name {
            Some(name) => VoiceConfig::new(name, self.settings.default_language.clone()),
            None if !self.settings.default_voice.is_empty() => {
                VoiceConfig::new(
                    self.settings.default_voice.clone(),
                    self.settings.default_language.clone(),
                )
                .with_rate(self.settings.default_rate)
            }
            None => narrator_preset(&self.settings.default_language),
        };
        info!(sections = sections.len(), voice = %voice.name, "narration parsed");

        let mut chapters = Vec::new();
        let mut skipped = Vec::new();
        for (index, section) in sections.iter().enumerate() {
            match self.synthesize_segment(&section.text, &voice, None).await {
                Ok(buffer) => chapters.push((sanitize_title(&section.title), buffer)),
                Err(e) => self.report_skip(&mut skipped, index, None, &section.title, e),
            }
        }
        if chapters.is_empty() {
            return Err(all_failed_error(sections.len(), &skipped));
        }

        if split_chapters {
            Ok(NarrationOutput {
                combined: None,
                chapters,
                skipped,
            })
        } else {
            let buffers: Vec<PcmBuffer> = chapters.into_iter().map(|(_, b)| b).collect();
            let combined = insert_silence_between(&buffers, gap_ms)?;
            Ok(NarrationOutput {
                combined: Some(combined),
                chapters: Vec::new(),
                skipped,
            })
        }
    }

    /// Dialogue script → timeline track, optionally bedded on background
    /// music. Clips go on the track back to back with a fixed gap, as
    /// explicit timestamps.
    pub async fn run_track(
        &mut self,
        text: &str,
        gap_ms: u64,
        bgm: Option<&PcmBuffer>,
        bgm_volume_db: f64,
    ) -> Result<DialogueOutput, AppError> {
        let script = parse_dialogue(text);
        if script.is_empty() {
            return Err(AppError::EmptyScript);
        }
        self.voices.assign_all(&script.speakers);

        let mut builder = TrackBuilder::new();
        let mut clips = Vec::new();
        let mut skipped = Vec::new();
        for (index, line) in script.lines.iter().enumerate() {
            let voice = self.voices.voice_for(&line.speaker);
            match self.synthesize_segment(&line.text, &voice, None).await {
                Ok(buffer) => clips.push((buffer, line.speaker.clone())),
                Err(e) => self.report_skip(&mut skipped, index, Some(line.line_number), &line.speaker, e),
            }
        }
        if clips.is_empty() {
            return Err(all_failed_error(script.lines.len(), &skipped));
        }
        let synthesized = clips.len();
        builder.add_sequential(clips, gap_ms, 0);

        let audio = match bgm {
            Some(bgm) => builder.build_with_bgm(bgm, bgm_volume_db, 2000, 2000)?,
            None => builder.build(true)?,
        };
        Ok(DialogueOutput {
            audio,
            synthesized,
            skipped,
        })
    }

    /// One gateway call with a per-call timeout and bounded retry, then
    /// decode to PCM for assembly.
    async fn synthesize_segment(
        &self,
        text: &str,
        voice: &VoiceConfig,
        style: Option<&str>,
    ) -> Result<PcmBuffer, TtsError> {
        let timeout = Duration::from_secs(self.settings.synthesis_timeout_secs);
        let mut backoff = Duration::from_millis(500);
        let mut attempt = 0u32;
        loop {
            let outcome =
                tokio::time::timeout(timeout, self.engine.synthesize(text, voice, style)).await;
            let error = match outcome {
                Ok(Ok(audio)) => return decode_segment(audio),
                Ok(Err(e)) => e,
                Err(_) => TtsError::Timeout {
                    seconds: timeout.as_secs(),
                },
            };
            if attempt >= self.settings.synthesis_retries {
                return Err(error);
            }
            attempt += 1;
            warn!(%error, attempt, "synthesis failed, retrying");
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }
    }

    fn report_skip(
        &self,
        skipped: &mut Vec<SegmentReport>,
        index: usize,
        line_number: Option<u32>,
        label: &str,
        error: TtsError,
    ) {
        warn!(
            engine = self.engine.name(),
            index,
            label,
            %error,
            "segment skipped after synthesis failure"
        );
        skipped.push(SegmentReport {
            index,
            line_number,
            label: label.to_string(),
            error: error.to_string(),
        });
    }

    fn assemble(
        &self,
        segments: Vec<PcmBuffer>,
        gap_ms: u32,
        skipped: &[SegmentReport],
    ) -> Result<PcmBuffer, AppError> {
        if segments.is_empty() {
            return Err(all_failed_error(skipped.len(), skipped));
        }
        info!(segments = segments.len(), gap_ms, "assembling output");
        Ok(insert_silence_between(&segments, gap_ms)?)
    }
}

/// Terminal error for a run where not a single segment survived, carrying
/// the first failure's detail.
fn all_failed_error(total: usize, skipped: &[SegmentReport]) -> AppError {
    let detail = skipped
        .first()
        .map(|r| r.error.clone())
        .unwrap_or_else(|| "no segments".to_string());
    AppError::Tts(TtsError::Synthesis(format!(
        "all {total} segments failed, first error: {detail}"
    )))
}

/// Decode a gateway segment into PCM for assembly.
///
/// The pipeline always requests Linear16 (WAV) for intermediate segments;
/// compressed encodings only appear at export time.
fn decode_segment(audio: AudioData) -> Result<PcmBuffer, TtsError> {
    match audio.encoding {
        AudioEncoding::Linear16 => EncodedAudio::new(EncodedFormat::Wav, audio.bytes)
            .decode()
            .map_err(|e| TtsError::Synthesis(format!("undecodable segment: {e}"))),
        other => Err(TtsError::Synthesis(format!(
            "gateway returned {:?}, expected Linear16 for intermediate segments",
            other
        ))),
    }
}

/// Keep only filename-safe characters of a section title.
fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_sanitized_for_filenames() {
        assert_eq!(sanitize_title("A/B: intro?"), "AB intro");
        assert_eq!(sanitize_title("第1章 - はじめに"), "第1章 - はじめに");
    }

    #[test]
    fn unexpected_encoding_is_a_synthesis_error() {
        let audio = AudioData {
            bytes: vec![0xff],
            encoding: AudioEncoding::Mp3,
            sample_rate: 24_000,
            channels: 1,
        };
        assert!(decode_segment(audio).is_err());
    }
}
