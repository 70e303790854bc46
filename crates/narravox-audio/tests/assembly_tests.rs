//! Cross-module assembly tests: encoded segments in, mixed track out.

use narravox_audio::{
    insert_silence_between, wav, EncodedAudio, EncodedFormat, PcmBuffer, TrackBuilder,
};

fn tone(duration_ms: u64, value: i16) -> PcmBuffer {
    PcmBuffer::new(vec![value; (duration_ms * 24) as usize], 24_000, 1)
}

#[test]
fn encoded_segments_feed_the_assembly() {
    // Segments arrive from a gateway as WAV blobs and must be decoded
    // before any assembly operation touches them.
    let segments: Vec<PcmBuffer> = [tone(100, 500), tone(200, 700)]
        .iter()
        .map(|buf| {
            let bytes = wav::encode_wav_bytes(buf).unwrap();
            EncodedAudio::new(EncodedFormat::Wav, bytes).decode().unwrap()
        })
        .collect();

    let combined = insert_silence_between(&segments, 300).unwrap();
    assert_eq!(combined.duration_ms(), 100 + 300 + 200);
}

#[test]
fn full_track_with_bgm_keeps_voice_extent() {
    let mut builder = TrackBuilder::new();
    builder.add_sequential(
        vec![
            (tone(500, 3000), "line 1".to_string()),
            (tone(400, 3000), "line 2".to_string()),
            (tone(600, 3000), "line 3".to_string()),
        ],
        300,
        0,
    );
    let voice_ms = builder.duration_ms();
    assert_eq!(voice_ms, 500 + 300 + 400 + 300 + 600);

    let bgm = tone(250, 800);
    let track = builder.build_with_bgm(&bgm, -12.0, 100, 100).unwrap();
    assert_eq!(track.duration_ms(), voice_ms);

    // The bed is quieter than the voice: a sample inside a gap region only
    // carries attenuated BGM.
    let gap_probe = track.samples()[(520 * 24) as usize];
    assert!(gap_probe.unsigned_abs() < 800);
}

#[test]
fn built_track_survives_a_wav_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("track.wav");

    let mut builder = TrackBuilder::new();
    builder.add_clip(tone(300, 1200), 0, "only");
    let built = builder.build(true).unwrap();

    wav::write_wav(&path, &built).unwrap();
    assert_eq!(wav::read_wav(&path).unwrap(), built);
}
