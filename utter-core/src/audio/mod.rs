//! PCM payload decoding, WAV container encoding, and clip playback

pub mod decode;
#[cfg(feature = "playback")]
pub mod playback;
pub mod wav;

/// Audio format profile specifying sample rate and channel count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioProfile {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Output format of the synthesis model: 24 kHz mono. This is a contract
/// with the remote service and is never decoded from its responses.
pub const MODEL_OUTPUT_PROFILE: AudioProfile = AudioProfile {
    sample_rate: 24_000,
    channels: 1,
};
