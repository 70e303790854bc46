//! Assembly operations over PCM buffers.
//!
//! All operations are pure given their inputs. Cross-buffer operations
//! require matching sample rate and channel count; resampling is not this
//! crate's job.

use crate::buffer::PcmBuffer;
use crate::error::AudioError;
use crate::{DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE_HZ};

fn check_uniform_format(buffers: &[PcmBuffer]) -> Result<(), AudioError> {
    if let Some((first, rest)) = buffers.split_first() {
        for other in rest {
            first.matches_format(other)?;
        }
    }
    Ok(())
}

/// Append buffers back to back. Empty input yields an explicit empty buffer.
pub fn concatenate(buffers: &[PcmBuffer]) -> Result<PcmBuffer, AudioError> {
    insert_silence_between(buffers, 0)
}

/// Concatenate with a silence gap between every adjacent pair — not before
/// the first buffer or after the last. A zero gap degenerates to plain
/// concatenation.
pub fn insert_silence_between(buffers: &[PcmBuffer], gap_ms: u32) -> Result<PcmBuffer, AudioError> {
    let Some(first) = buffers.first() else {
        return Ok(PcmBuffer::empty(DEFAULT_SAMPLE_RATE_HZ, DEFAULT_CHANNELS));
    };
    check_uniform_format(buffers)?;

    let sample_rate = first.sample_rate();
    let channels = first.channels();
    let gap_samples =
        (gap_ms as u64 * sample_rate as u64 / 1000) as usize * channels as usize;

    let total: usize = buffers.iter().map(|b| b.samples().len()).sum::<usize>()
        + gap_samples * (buffers.len() - 1);

    let mut samples = Vec::with_capacity(total);
    for (i, buffer) in buffers.iter().enumerate() {
        if i > 0 {
            samples.resize(samples.len() + gap_samples, 0);
        }
        samples.extend_from_slice(buffer.samples());
    }
    Ok(PcmBuffer::new(samples, sample_rate, channels))
}

/// Linear amplitude ramp over the leading `ms`, clamped to the buffer length.
pub fn fade_in(buffer: &mut PcmBuffer, ms: u64) {
    let channels = buffer.channels() as usize;
    let ramp_frames = ((ms * buffer.sample_rate() as u64 / 1000) as usize).min(buffer.frames());
    if ramp_frames == 0 {
        return;
    }
    let samples = buffer.samples_mut();
    for frame in 0..ramp_frames {
        let factor = frame as f64 / ramp_frames as f64;
        for ch in 0..channels {
            let idx = frame * channels + ch;
            samples[idx] = (samples[idx] as f64 * factor).round() as i16;
        }
    }
}

/// Linear amplitude ramp over the trailing `ms`, clamped to the buffer length.
pub fn fade_out(buffer: &mut PcmBuffer, ms: u64) {
    let channels = buffer.channels() as usize;
    let total_frames = buffer.frames();
    let ramp_frames = ((ms * buffer.sample_rate() as u64 / 1000) as usize).min(total_frames);
    if ramp_frames == 0 {
        return;
    }
    let start = total_frames - ramp_frames;
    let samples = buffer.samples_mut();
    for i in 0..ramp_frames {
        let factor = (ramp_frames - 1 - i) as f64 / ramp_frames as f64;
        for ch in 0..channels {
            let idx = (start + i) * channels + ch;
            samples[idx] = (samples[idx] as f64 * factor).round() as i16;
        }
    }
}

/// Shift the buffer so its RMS level matches `target_dbfs`. A buffer of
/// total silence has no defined level and is left unchanged.
pub fn normalize(buffer: &mut PcmBuffer, target_dbfs: f64) {
    if let Some(level) = buffer.dbfs() {
        buffer.apply_gain_db(target_dbfs - level);
    }
}

/// Mix `layer` into `base` starting at `position_ms`, with an optional gain
/// shift on the layer. Saturating 16-bit addition.
///
/// The destination is never grown: callers pre-size `base` (the track
/// builder allocates to max clip extent; BGM overlay truncates the music to
/// the track first), so a layer that would run past the end is an error.
pub fn overlay(
    base: &mut PcmBuffer,
    layer: &PcmBuffer,
    position_ms: u64,
    gain_db: f64,
) -> Result<(), AudioError> {
    base.matches_format(layer)?;

    let offset = base.offset_for_ms(position_ms);
    if offset + layer.samples().len() > base.samples().len() {
        return Err(AudioError::OverlayOutOfRange {
            base_ms: base.duration_ms(),
            end_ms: position_ms + layer.duration_ms(),
        });
    }

    let factor = if gain_db == 0.0 {
        1.0
    } else {
        10f64.powf(gain_db / 20.0)
    };
    let dst = &mut base.samples_mut()[offset..offset + layer.samples().len()];
    for (d, &s) in dst.iter_mut().zip(layer.samples()) {
        let mixed = *d as f64 + s as f64 * factor;
        *d = mixed.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16;
    }
    Ok(())
}

/// Repeat the buffer whole times until it reaches `target_ms`, then truncate
/// to exactly that length. A buffer already long enough is only truncated.
pub fn loop_to_length(buffer: &PcmBuffer, target_ms: u64) -> PcmBuffer {
    let target_frames = (target_ms * buffer.sample_rate() as u64 / 1000) as usize;
    loop_to_frames(buffer, target_frames)
}

/// Like [`loop_to_length`], but with an exact frame count. Callers that size
/// a companion buffer (the track builder's BGM bed) use this so the result
/// matches sample for sample rather than to floored milliseconds.
pub fn loop_to_frames(buffer: &PcmBuffer, target_frames: usize) -> PcmBuffer {
    let channels = buffer.channels() as usize;
    let target_samples = target_frames * channels;

    if buffer.is_empty() || target_samples == 0 {
        return PcmBuffer::new(
            vec![0; target_samples],
            buffer.sample_rate(),
            buffer.channels(),
        );
    }

    let mut samples = Vec::with_capacity(target_samples);
    while samples.len() < target_samples {
        samples.extend_from_slice(buffer.samples());
    }
    samples.truncate(target_samples);
    PcmBuffer::new(samples, buffer.sample_rate(), buffer.channels())
}
