//! Synthesis gateway contract

use async_trait::async_trait;

use crate::error::TtsResult;
use crate::types::{AudioData, VoiceConfig};

/// A text-to-speech backend.
///
/// Backends are external collaborators: given text and voice parameters they
/// return audio bytes in a declared encoding. Implementations are constructed
/// once and shared for the whole run; there is no hidden process-wide client.
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    /// Engine name, for logs and segment failure reports.
    fn name(&self) -> &str;

    /// Whether the backend can currently serve requests.
    async fn is_available(&self) -> bool;

    /// Synthesize one segment.
    ///
    /// `style` is an optional delivery instruction ("cheerfully", "as a calm
    /// expert"); engines without style support ignore it.
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceConfig,
        style: Option<&str>,
    ) -> TtsResult<AudioData>;
}
