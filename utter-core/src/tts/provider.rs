use async_trait::async_trait;

use crate::audio::AudioProfile;
use crate::error::SpeechError;

/// Trait for text-to-speech providers.
///
/// A provider turns text into the base64-encoded PCM payload its service
/// returns. Decoding and container encoding stay with the request lifecycle,
/// so an implementation only deals with its own wire format.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Provider name for logs and error messages
    fn name(&self) -> &'static str;

    /// Fixed format of the PCM the service emits
    fn output_profile(&self) -> AudioProfile;

    /// Synthesize text, returning base64-encoded little-endian 16-bit PCM
    async fn synthesize(&self, text: &str) -> Result<String, SpeechError>;
}
