use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::SpeechError;

/// Decode the base64 PCM payload returned by the synthesis service.
///
/// Accepts exactly what the standard-alphabet engine accepts; a character
/// outside the alphabet fails the whole payload with no partial output.
pub fn decode_pcm_payload(payload: &str) -> Result<Vec<u8>, SpeechError> {
    Ok(STANDARD.decode(payload)?)
}
