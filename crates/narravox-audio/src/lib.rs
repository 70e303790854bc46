//! Audio assembly engine for NarraVox
//!
//! A small clip/track model over interleaved 16-bit PCM: sequential
//! concatenation with silence gaps, timestamp-positioned overlay assembly,
//! background-music looping and fades, and gain normalization. All
//! operations are pure and deterministic given their inputs.

pub mod buffer;
pub mod error;
pub mod ops;
pub mod track;
pub mod wav;

pub use buffer::{EncodedAudio, EncodedFormat, PcmBuffer};
pub use error::AudioError;
pub use ops::{
    concatenate, fade_in, fade_out, insert_silence_between, loop_to_frames, loop_to_length,
    normalize, overlay,
};
pub use track::{Clip, TrackBuilder};

/// Default mono 24 kHz format, matching the fixed-format synthesis gateway.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 24_000;
pub const DEFAULT_CHANNELS: u16 = 1;

/// Normalization target used by the track builder.
pub const DEFAULT_TARGET_DBFS: f64 = -20.0;
