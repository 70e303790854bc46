//! Output export with best-effort transcoding.
//!
//! The combined buffer is always written as WAV first. When the requested
//! path wants a compressed container, an external encoder is invoked; if the
//! encoder is missing or fails, the run keeps the WAV output and reports a
//! downgrade instead of failing.

use std::path::{Path, PathBuf};

use narravox_audio::{wav, PcmBuffer};
use narravox_foundation::AppError;
use narravox_tts::AudioEncoding;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Where the audio actually landed.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub path: PathBuf,
    /// Encoding actually delivered, `Linear16` after a fallback.
    pub encoding: AudioEncoding,
    /// True when the encoder was unavailable and the uncompressed format
    /// was emitted instead of the requested one.
    pub fell_back: bool,
}

/// Export using the standard encoder binary.
pub async fn export(buffer: &PcmBuffer, requested: &Path) -> Result<ExportOutcome, AppError> {
    export_with_encoder(buffer, requested, "ffmpeg").await
}

/// Export with an explicit encoder command, for tests and overrides.
pub async fn export_with_encoder(
    buffer: &PcmBuffer,
    requested: &Path,
    encoder: &str,
) -> Result<ExportOutcome, AppError> {
    let encoding = AudioEncoding::for_path(requested);
    let wav_path = requested.with_extension("wav");
    wav::write_wav(&wav_path, buffer)?;

    if encoding == AudioEncoding::Linear16 {
        info!(path = %wav_path.display(), "exported WAV");
        return Ok(ExportOutcome {
            path: wav_path,
            encoding: AudioEncoding::Linear16,
            fell_back: false,
        });
    }

    let codec_args: &[&str] = match encoding {
        AudioEncoding::Mp3 => &["-codec:a", "libmp3lame", "-q:a", "2"],
        AudioEncoding::OggOpus => &["-codec:a", "libopus"],
        AudioEncoding::Linear16 => unreachable!("handled above"),
    };

    debug!(%encoder, requested = %requested.display(), "transcoding");
    let result = Command::new(encoder)
        .arg("-y")
        .arg("-i")
        .arg(&wav_path)
        .args(codec_args)
        .arg(requested)
        .output()
        .await;

    match result {
        Ok(output) if output.status.success() => {
            let _ = tokio::fs::remove_file(&wav_path).await;
            info!(path = %requested.display(), "exported");
            Ok(ExportOutcome {
                path: requested.to_path_buf(),
                encoding,
                fell_back: false,
            })
        }
        Ok(output) => {
            warn!(
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "encoder failed, keeping uncompressed output"
            );
            Ok(ExportOutcome {
                path: wav_path,
                encoding: AudioEncoding::Linear16,
                fell_back: true,
            })
        }
        Err(e) => {
            warn!(%e, %encoder, "encoder unavailable, keeping uncompressed output");
            Ok(ExportOutcome {
                path: wav_path,
                encoding: AudioEncoding::Linear16,
                fell_back: true,
            })
        }
    }
}
