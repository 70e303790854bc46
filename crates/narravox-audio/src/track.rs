//! Timeline track builder.
//!
//! Clips are positioned at explicit millisecond timestamps and mixed into a
//! pre-sized destination buffer. Building never consumes the clip list, so a
//! rebuild after adding more clips is just another `build` call.

use tracing::debug;

use crate::buffer::PcmBuffer;
use crate::error::AudioError;
use crate::ops;
use crate::{DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE_HZ, DEFAULT_TARGET_DBFS};

/// A positioned clip, owned by its track.
#[derive(Debug, Clone)]
pub struct Clip {
    pub audio: PcmBuffer,
    pub start_ms: u64,
    pub label: String,
}

/// Builds one audio track from positioned clips.
#[derive(Debug, Default)]
pub struct TrackBuilder {
    clips: Vec<Clip>,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a clip at an explicit timestamp.
    pub fn add_clip(
        &mut self,
        audio: PcmBuffer,
        start_ms: u64,
        label: impl Into<String>,
    ) -> &mut Self {
        self.clips.push(Clip {
            audio,
            start_ms,
            label: label.into(),
        });
        self
    }

    /// Place clips back to back from `start_ms`, with a fixed gap between
    /// each: every clip starts where the previous one ended plus the gap.
    /// The same layout as silence-gap concatenation, but as explicit
    /// timestamps so independently positioned clips can share the track.
    pub fn add_sequential<I>(&mut self, buffers: I, gap_ms: u64, start_ms: u64) -> &mut Self
    where
        I: IntoIterator<Item = (PcmBuffer, String)>,
    {
        let mut position = start_ms;
        for (audio, label) in buffers {
            let duration = audio.duration_ms();
            self.add_clip(audio, position, label);
            position += duration + gap_ms;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Track extent: the furthest clip end, 0 when empty.
    pub fn duration_ms(&self) -> u64 {
        self.clips
            .iter()
            .map(|c| c.start_ms + c.audio.duration_ms())
            .max()
            .unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.clips.clear();
    }

    /// Mix all clips into one buffer.
    ///
    /// The destination is pre-sized to the maximum clip extent and clips are
    /// overlaid in ascending `start_ms`; the sort is stable, so clips at the
    /// same position mix in insertion order. Non-destructive: calling
    /// `build` again with an unchanged clip list yields the same buffer.
    pub fn build(&self, normalize: bool) -> Result<PcmBuffer, AudioError> {
        let Some(first) = self.clips.first() else {
            return Ok(PcmBuffer::empty(DEFAULT_SAMPLE_RATE_HZ, DEFAULT_CHANNELS));
        };

        // Size the destination in exact samples. Millisecond durations floor,
        // which would cut the sub-millisecond tail off any clip whose length
        // is not a whole number of milliseconds.
        let total_samples = self
            .clips
            .iter()
            .map(|c| first.audio.offset_for_ms(c.start_ms) + c.audio.samples().len())
            .max()
            .unwrap_or(0);
        let mut result = PcmBuffer::new(
            vec![0; total_samples],
            first.audio.sample_rate(),
            first.audio.channels(),
        );

        let mut order: Vec<usize> = (0..self.clips.len()).collect();
        order.sort_by_key(|&i| self.clips[i].start_ms);

        for index in order {
            let clip = &self.clips[index];
            debug!(label = %clip.label, start_ms = clip.start_ms, "overlaying clip");
            ops::overlay(&mut result, &clip.audio, clip.start_ms, 0.0)?;
        }

        if normalize {
            ops::normalize(&mut result, DEFAULT_TARGET_DBFS);
        }
        Ok(result)
    }

    /// Build the normalized voice track and bed it on background music.
    ///
    /// The BGM is looped or truncated to exactly the voice-track duration,
    /// then gain-shifted, faded in, and faded out, in that order. The voice
    /// is overlaid on top of the processed BGM, so the voice itself is never
    /// attenuated. Output duration equals the voice-track duration.
    pub fn build_with_bgm(
        &self,
        bgm: &PcmBuffer,
        bgm_volume_db: f64,
        fade_in_ms: u64,
        fade_out_ms: u64,
    ) -> Result<PcmBuffer, AudioError> {
        let voice = self.build(true)?;
        if voice.is_empty() {
            return Ok(voice);
        }

        // Bed length matches the voice in exact frames, not floored ms.
        let mut bed = ops::loop_to_frames(bgm, voice.frames());
        bed.apply_gain_db(bgm_volume_db);
        ops::fade_in(&mut bed, fade_in_ms);
        ops::fade_out(&mut bed, fade_out_ms);

        ops::overlay(&mut bed, &voice, 0, 0.0)?;
        Ok(bed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(duration_ms: u64, value: i16) -> PcmBuffer {
        PcmBuffer::new(vec![value; (duration_ms * 24) as usize], 24_000, 1)
    }

    #[test]
    fn empty_track_builds_to_empty_buffer() {
        let builder = TrackBuilder::new();
        assert_eq!(builder.duration_ms(), 0);
        assert!(builder.build(false).unwrap().is_empty());
    }

    #[test]
    fn duration_is_furthest_clip_extent() {
        let mut builder = TrackBuilder::new();
        builder.add_clip(tone(500, 1), 0, "a");
        builder.add_clip(tone(200, 1), 1000, "b");
        assert_eq!(builder.duration_ms(), 1200);
    }

    #[test]
    fn sequential_placement_matches_gap_arithmetic() {
        let mut builder = TrackBuilder::new();
        builder.add_sequential(
            vec![
                (tone(100, 1), "a".to_string()),
                (tone(200, 2), "b".to_string()),
                (tone(150, 3), "c".to_string()),
            ],
            300,
            0,
        );
        assert_eq!(builder.duration_ms(), 100 + 300 + 200 + 300 + 150);
    }

    #[test]
    fn overlapping_clips_mix_deterministically() {
        let mut builder = TrackBuilder::new();
        builder.add_clip(tone(100, 100), 0, "first");
        builder.add_clip(tone(200, 50), 0, "second");

        let built = builder.build(false).unwrap();
        // Later-finishing clip sets the extent.
        assert_eq!(built.duration_ms(), 200);
        // Overlap region carries both clips, tail only the second.
        assert_eq!(built.samples()[0], 150);
        assert_eq!(*built.samples().last().unwrap(), 50);

        // Idempotent for an unchanged clip list.
        assert_eq!(built, builder.build(false).unwrap());
    }

    #[test]
    fn adding_clips_after_build_extends_the_next_build() {
        let mut builder = TrackBuilder::new();
        builder.add_clip(tone(100, 10), 0, "a");
        let first = builder.build(false).unwrap();
        assert_eq!(first.duration_ms(), 100);

        builder.add_clip(tone(100, 10), 100, "b");
        assert_eq!(builder.build(false).unwrap().duration_ms(), 200);
    }

    #[test]
    fn bgm_is_looped_to_the_voice_duration() {
        let mut builder = TrackBuilder::new();
        builder.add_sequential(
            vec![(tone(600, 2000), "v1".to_string()), (tone(600, 2000), "v2".to_string())],
            300,
            0,
        );
        let voice_ms = builder.duration_ms();

        let short_bgm = tone(200, 400);
        let track = builder.build_with_bgm(&short_bgm, -10.0, 50, 50).unwrap();
        assert_eq!(track.duration_ms(), voice_ms);
    }

    #[test]
    fn bgm_is_truncated_to_the_voice_duration() {
        let mut builder = TrackBuilder::new();
        builder.add_clip(tone(400, 2000), 0, "v");
        let long_bgm = tone(10_000, 400);
        let track = builder.build_with_bgm(&long_bgm, -10.0, 0, 0).unwrap();
        assert_eq!(track.duration_ms(), 400);
    }

    #[test]
    fn sub_millisecond_clip_tails_are_kept() {
        // 25 samples at 24 kHz is 1.04 ms; a floored-ms base would lose the
        // final sample and reject the overlay.
        let mut builder = TrackBuilder::new();
        builder.add_clip(PcmBuffer::new(vec![7; 25], 24_000, 1), 0, "a");
        let built = builder.build(false).unwrap();
        assert_eq!(built.samples().len(), 25);
        assert_eq!(*built.samples().last().unwrap(), 7);

        builder.add_clip(PcmBuffer::new(vec![3; 25], 24_000, 1), 10, "b");
        // Second clip starts at 10 ms = sample 240.
        assert_eq!(builder.build(false).unwrap().samples().len(), 265);
    }

    #[test]
    fn odd_sample_rate_clips_build_with_bgm() {
        // At 22 050 Hz almost no clip is a whole number of milliseconds.
        let clip = PcmBuffer::new(vec![2000; 15_503], 22_050, 1);
        let mut builder = TrackBuilder::new();
        builder.add_clip(clip, 0, "voice");

        let bgm = PcmBuffer::new(vec![400; 4_411], 22_050, 1);
        let track = builder.build_with_bgm(&bgm, -12.0, 50, 50).unwrap();
        assert_eq!(track.samples().len(), 15_503);
    }

    #[test]
    fn clear_resets_the_track() {
        let mut builder = TrackBuilder::new();
        builder.add_clip(tone(100, 1), 0, "a");
        builder.clear();
        assert!(builder.is_empty());
        assert_eq!(builder.duration_ms(), 0);
    }
}
