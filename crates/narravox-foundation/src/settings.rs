use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

/// Application configuration.
///
/// Loaded from an optional `narravox.toml` next to the working directory,
/// with `NARRAVOX_*` environment variables taking precedence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Path to the TTS backend credential file, when a cloud backend is used.
    pub credentials_path: String,
    /// OAuth client id for the document API.
    pub docs_client_id: String,
    /// OAuth client secret for the document API.
    pub docs_client_secret: String,
    /// OAuth refresh token for the document API.
    pub docs_refresh_token: String,
    /// Voice used when no speaker-specific voice applies.
    pub default_voice: String,
    /// BCP-47 language code driving preset selection.
    pub default_language: String,
    /// Default speaking rate multiplier.
    pub default_rate: f32,
    /// Directory for generated audio.
    pub output_dir: PathBuf,
    /// Timeout for a single synthesis call, in seconds.
    pub synthesis_timeout_secs: u64,
    /// Retries after a failed synthesis call, before the segment is skipped.
    pub synthesis_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials_path: String::new(),
            docs_client_id: String::new(),
            docs_client_secret: String::new(),
            docs_refresh_token: String::new(),
            default_voice: "ja-JP-Neural2-B".to_string(),
            default_language: "ja-JP".to_string(),
            default_rate: 1.0,
            output_dir: PathBuf::from("output"),
            synthesis_timeout_secs: 60,
            synthesis_retries: 2,
        }
    }
}

impl Settings {
    /// Load settings from `narravox.toml` (if present) and the environment.
    pub fn load() -> Result<Self, AppError> {
        let builder = Config::builder()
            .add_source(File::with_name("narravox").required(false))
            .add_source(Environment::with_prefix("NARRAVOX"));

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Fail fast when a cloud TTS backend is selected without credentials.
    pub fn require_tts_credentials(&self) -> Result<(), AppError> {
        if self.credentials_path.is_empty() {
            return Err(AppError::UnconfiguredCredential(
                "credentials_path (NARRAVOX_CREDENTIALS_PATH)".to_string(),
            ));
        }
        Ok(())
    }

    /// Fail fast when the document API is used without a full credential set.
    pub fn require_docs_credentials(&self) -> Result<(), AppError> {
        for (value, key) in [
            (&self.docs_client_id, "docs_client_id"),
            (&self.docs_client_secret, "docs_client_secret"),
            (&self.docs_refresh_token, "docs_refresh_token"),
        ] {
            if value.is_empty() {
                return Err(AppError::UnconfiguredCredential(key.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_japanese_narration() {
        let s = Settings::default();
        assert_eq!(s.default_language, "ja-JP");
        assert_eq!(s.default_rate, 1.0);
        assert_eq!(s.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn missing_tts_credentials_fail_fast() {
        let s = Settings::default();
        let err = s.require_tts_credentials().unwrap_err();
        assert!(matches!(err, AppError::UnconfiguredCredential(_)));
    }

    #[test]
    fn docs_credentials_must_be_complete() {
        let mut s = Settings::default();
        s.docs_client_id = "id".to_string();
        s.docs_client_secret = "secret".to_string();
        assert!(s.require_docs_credentials().is_err());

        s.docs_refresh_token = "token".to_string();
        assert!(s.require_docs_credentials().is_ok());
    }
}
