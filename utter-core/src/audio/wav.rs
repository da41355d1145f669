//! Minimal uncompressed WAV container: a fixed 44-byte header followed by
//! little-endian 16-bit PCM samples.

use std::time::Duration;

use crate::audio::AudioProfile;

/// Length of the descriptive header preceding the sample data.
pub const HEADER_LEN: usize = 44;

/// Bit depth is fixed; the synthesis service only ever emits 16-bit samples.
pub const BITS_PER_SAMPLE: u16 = 16;

/// A playable WAV clip, openable by any standard audio tool.
///
/// One clip is produced per successful request cycle and handed to exactly
/// one playback consumer; the next cycle supersedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavClip {
    bytes: Vec<u8>,
}

impl WavClip {
    /// Wrap raw PCM in a RIFF/WAVE header.
    ///
    /// The PCM length is not checked against the block alignment: a stray
    /// trailing byte still produces well-formed container bytes, they just
    /// will not be meaningful audio.
    pub fn from_pcm(pcm: &[u8], profile: AudioProfile) -> Self {
        let data_len = pcm.len() as u32;
        let sample_bytes = BITS_PER_SAMPLE / 8;
        let byte_rate =
            profile.sample_rate * u32::from(profile.channels) * u32::from(sample_bytes);
        let block_align = profile.channels * sample_bytes;

        let mut bytes = Vec::with_capacity(HEADER_LEN + pcm.len());
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM format code
        bytes.extend_from_slice(&profile.channels.to_le_bytes());
        bytes.extend_from_slice(&profile.sample_rate.to_le_bytes());
        bytes.extend_from_slice(&byte_rate.to_le_bytes());
        bytes.extend_from_slice(&block_align.to_le_bytes());
        bytes.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.extend_from_slice(pcm);

        Self { bytes }
    }

    /// Full container bytes, header included
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The sample region past the header
    pub fn pcm(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    pub fn sample_rate(&self) -> u32 {
        self.u32_at(24)
    }

    pub fn channels(&self) -> u16 {
        self.u16_at(22)
    }

    pub fn data_len(&self) -> u32 {
        self.u32_at(40)
    }

    pub fn profile(&self) -> AudioProfile {
        AudioProfile {
            sample_rate: self.sample_rate(),
            channels: self.channels(),
        }
    }

    /// Playback length derived from the header's byte rate
    pub fn duration(&self) -> Duration {
        let byte_rate = self.u32_at(28);
        if byte_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(f64::from(self.data_len()) / f64::from(byte_rate))
    }

    pub fn mime_type(&self) -> &'static str {
        "audio/wav"
    }

    fn u16_at(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.bytes[offset], self.bytes[offset + 1]])
    }

    fn u32_at(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
            self.bytes[offset + 3],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MODEL_OUTPUT_PROFILE;
    use rstest::rstest;
    use std::io::Cursor;

    #[test]
    fn empty_clip_header_is_byte_exact() {
        let clip = WavClip::from_pcm(&[], MODEL_OUTPUT_PROFILE);

        #[rustfmt::skip]
        let expected: [u8; HEADER_LEN] = [
            0x52, 0x49, 0x46, 0x46, // "RIFF"
            36, 0, 0, 0,            // file size - 8
            0x57, 0x41, 0x56, 0x45, // "WAVE"
            0x66, 0x6d, 0x74, 0x20, // "fmt "
            16, 0, 0, 0,            // format sub-chunk size
            1, 0,                   // PCM format code
            1, 0,                   // channels
            0xC0, 0x5D, 0, 0,       // 24000 Hz
            0x80, 0xBB, 0, 0,       // byte rate 48000
            2, 0,                   // block align
            16, 0,                  // bits per sample
            0x64, 0x61, 0x74, 0x61, // "data"
            0, 0, 0, 0,             // data size
        ];
        assert_eq!(clip.bytes(), expected.as_slice());
    }

    #[rstest]
    #[case(480, 24_000, 1)]
    #[case(4, 44_100, 2)]
    #[case(0, 16_000, 1)]
    fn hound_reads_back_the_header(
        #[case] pcm_len: usize,
        #[case] sample_rate: u32,
        #[case] channels: u16,
    ) {
        let pcm: Vec<u8> = (0..pcm_len).map(|i| i as u8).collect();
        let clip = WavClip::from_pcm(
            &pcm,
            AudioProfile {
                sample_rate,
                channels,
            },
        );
        assert_eq!(clip.bytes().len(), HEADER_LEN + pcm_len);
        assert_eq!(clip.data_len() as usize, pcm_len);

        let reader = hound::WavReader::new(Cursor::new(clip.into_bytes())).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, sample_rate);
        assert_eq!(spec.channels, channels);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
        assert_eq!(reader.len() as usize, pcm_len / 2);
    }

    #[test]
    fn accessors_read_the_fixed_offsets() {
        let pcm = [1u8, 2, 3, 4, 5, 6];
        let clip = WavClip::from_pcm(&pcm, MODEL_OUTPUT_PROFILE);

        assert_eq!(clip.sample_rate(), 24_000);
        assert_eq!(clip.channels(), 1);
        assert_eq!(clip.data_len(), 6);
        assert_eq!(clip.pcm(), pcm.as_slice());
        assert_eq!(clip.profile(), MODEL_OUTPUT_PROFILE);
        assert_eq!(clip.mime_type(), "audio/wav");
    }

    #[test]
    fn unaligned_pcm_still_wraps() {
        let clip = WavClip::from_pcm(&[1, 2, 3], MODEL_OUTPUT_PROFILE);
        assert_eq!(clip.bytes().len(), HEADER_LEN + 3);
        assert_eq!(clip.data_len(), 3);
    }

    #[test]
    fn one_second_of_model_output_reports_one_second() {
        let pcm = vec![0u8; 48_000];
        let clip = WavClip::from_pcm(&pcm, MODEL_OUTPUT_PROFILE);
        assert_eq!(clip.duration(), Duration::from_secs(1));
    }
}
