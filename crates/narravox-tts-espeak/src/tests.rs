//! Tests for the espeak engine

use crate::EspeakEngine;
use narravox_tts::{SynthesisEngine, VoiceConfig};

#[test]
fn engine_has_a_name() {
    assert_eq!(EspeakEngine::new().name(), "espeak");
}

#[tokio::test]
async fn availability_probe_does_not_panic() {
    // The test environment may or may not have espeak installed.
    let _ = EspeakEngine::new().is_available().await;
}

#[tokio::test]
async fn empty_text_is_rejected_before_spawning() {
    let engine = EspeakEngine::new();
    let voice = VoiceConfig::new("ja-JP-Neural2-B", "ja-JP");
    let result = engine.synthesize("   ", &voice, None).await;
    assert!(result.is_err());
}

#[test]
fn args_map_voice_parameters() {
    let voice = VoiceConfig::new("ja-JP-Neural2-B", "ja-JP")
        .with_rate(0.9);
    let args = EspeakEngine::build_args("こんにちは", &voice);

    let voice_flag = args.iter().position(|a| a == "-v").unwrap();
    assert_eq!(args[voice_flag + 1], "ja");

    let rate_flag = args.iter().position(|a| a == "-s").unwrap();
    assert_eq!(args[rate_flag + 1], "158"); // 0.9 * 175, rounded

    let pitch_flag = args.iter().position(|a| a == "-p").unwrap();
    assert_eq!(args[pitch_flag + 1], "50"); // neutral pitch is midpoint
}

#[test]
fn pitch_extremes_clamp_to_espeak_range() {
    let mut voice = VoiceConfig::new("en-US-Neural2-D", "en-US");
    voice.pitch = 20.0;
    let args = EspeakEngine::build_args("hi", &voice);
    let pitch_flag = args.iter().position(|a| a == "-p").unwrap();
    assert_eq!(args[pitch_flag + 1], "99");

    voice.pitch = -20.0;
    let args = EspeakEngine::build_args("hi", &voice);
    let pitch_flag = args.iter().position(|a| a == "-p").unwrap();
    assert_eq!(args[pitch_flag + 1], "1");
}
