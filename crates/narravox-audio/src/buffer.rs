//! PCM buffer model.

use crate::error::AudioError;
use crate::wav;

/// Interleaved 16-bit PCM audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl PcmBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        debug_assert!(sample_rate > 0 && channels > 0);
        debug_assert_eq!(samples.len() % channels as usize, 0);
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// A zero-length buffer in the given format.
    pub fn empty(sample_rate: u32, channels: u16) -> Self {
        Self::new(Vec::new(), sample_rate, channels)
    }

    /// A silence buffer of the given duration.
    pub fn silence(duration_ms: u64, sample_rate: u32, channels: u16) -> Self {
        let frames = duration_ms * sample_rate as u64 / 1000;
        Self::new(vec![0; frames as usize * channels as usize], sample_rate, channels)
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_ms(&self) -> u64 {
        self.frames() as u64 * 1000 / self.sample_rate as u64
    }

    /// Index into `samples` for a millisecond position.
    pub(crate) fn offset_for_ms(&self, position_ms: u64) -> usize {
        (position_ms * self.sample_rate as u64 / 1000) as usize * self.channels as usize
    }

    pub fn format_label(&self) -> String {
        format!("{} Hz / {} ch", self.sample_rate, self.channels)
    }

    /// Loudness relative to full scale, in dBFS. `None` for empty or
    /// all-zero buffers, whose level is undefined.
    pub fn dbfs(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum_squares: f64 = self
            .samples
            .iter()
            .map(|&s| {
                let x = s as f64 / i16::MAX as f64;
                x * x
            })
            .sum();
        let rms = (sum_squares / self.samples.len() as f64).sqrt();
        if rms == 0.0 {
            None
        } else {
            Some(20.0 * rms.log10())
        }
    }

    /// Apply a uniform gain shift, saturating at full scale.
    pub fn apply_gain_db(&mut self, gain_db: f64) {
        if gain_db == 0.0 {
            return;
        }
        let factor = 10f64.powf(gain_db / 20.0);
        for sample in &mut self.samples {
            let scaled = (*sample as f64 * factor).round();
            *sample = scaled.clamp(i16::MIN as f64, i16::MAX as f64) as i16;
        }
    }

    pub(crate) fn matches_format(&self, other: &PcmBuffer) -> Result<(), AudioError> {
        if self.sample_rate != other.sample_rate || self.channels != other.channels {
            return Err(AudioError::FormatMismatch {
                expected: self.format_label(),
                actual: other.format_label(),
            });
        }
        Ok(())
    }
}

/// Opaque encoded audio with a declared container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedFormat {
    Wav,
    Mp3,
    OggOpus,
}

#[derive(Debug, Clone)]
pub struct EncodedAudio {
    pub format: EncodedFormat,
    pub bytes: Vec<u8>,
}

impl EncodedAudio {
    pub fn new(format: EncodedFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    /// Decode to raw PCM. Assembly operations require PCM, so encoded blobs
    /// pass through here first. Compressed formats are handed to the external
    /// encoder instead of being decoded in-process.
    pub fn decode(&self) -> Result<PcmBuffer, AudioError> {
        match self.format {
            EncodedFormat::Wav => wav::decode_wav_bytes(&self.bytes),
            EncodedFormat::Mp3 => Err(AudioError::UndecodableFormat("MP3".to_string())),
            EncodedFormat::OggOpus => Err(AudioError::UndecodableFormat("Ogg/Opus".to_string())),
        }
    }
}
