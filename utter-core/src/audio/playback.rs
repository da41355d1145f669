//! Clip playback using cpal
//! Resamples from the clip rate to the native device rate if needed

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig, SupportedStreamConfig,
};
use rubato::{FftFixedIn, Resampler};

use crate::audio::wav::WavClip;

/// Plays finished clips on the default output device
pub struct AudioPlayer {
    device: Device,
    supported_config: SupportedStreamConfig,
}

/// Playback handle - dropping stops playback (RAII)
pub struct AudioPlayback {
    _stream: Stream,
    finished: Arc<AtomicBool>,
}

impl AudioPlayback {
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Wait for playback to run out of samples
    pub async fn wait(&self) {
        while !self.is_finished() {
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }
    }
}

impl AudioPlayer {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no output device available")?;

        let supported_config = device
            .default_output_config()
            .context("failed to get default output config")?;

        Ok(Self {
            device,
            supported_config,
        })
    }

    /// Play a clip, returning a handle that stops on drop.
    ///
    /// Only mono clips are accepted; the synthesis model emits mono and the
    /// output callback fans one sample across every device channel.
    pub fn play(&self, clip: &WavClip) -> Result<AudioPlayback> {
        anyhow::ensure!(
            clip.channels() == 1,
            "only mono clips are supported, got {} channels",
            clip.channels()
        );

        let native_rate = self.supported_config.sample_rate().0;
        let frame_channels = self.supported_config.channels() as usize;
        let sample_format = self.supported_config.sample_format();
        let config: StreamConfig = self.supported_config.clone().into();

        let source = i16_bytes_to_f32(clip.pcm());
        let samples = if clip.sample_rate() == native_rate {
            source
        } else {
            resample(&source, clip.sample_rate(), native_rate)?
        };

        let samples = Arc::new(samples);
        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let stream = match sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(
                &config,
                frame_channels,
                samples,
                position,
                finished.clone(),
            )?,
            SampleFormat::I16 => self.build_stream::<i16>(
                &config,
                frame_channels,
                samples,
                position,
                finished.clone(),
            )?,
            format => anyhow::bail!("unsupported sample format: {format:?}"),
        };

        stream.play().context("failed to start playback stream")?;

        Ok(AudioPlayback {
            _stream: stream,
            finished,
        })
    }

    fn build_stream<T>(
        &self,
        config: &StreamConfig,
        frame_channels: usize,
        samples: Arc<Vec<f32>>,
        position: Arc<AtomicUsize>,
        finished: Arc<AtomicBool>,
    ) -> Result<Stream>
    where
        T: SizedSample + FromSample<f32> + Default + Send + 'static,
    {
        self.device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let mut pos = position.load(Ordering::SeqCst);
                    for frame in data.chunks_mut(frame_channels) {
                        match samples.get(pos) {
                            Some(&sample) => {
                                frame.fill(T::from_sample(sample));
                                pos += 1;
                            }
                            None => {
                                frame.fill(T::default());
                                finished.store(true, Ordering::SeqCst);
                            }
                        }
                    }
                    position.store(pos, Ordering::SeqCst);
                },
                move |err| {
                    tracing::error!(error = ?err, "playback stream error");
                },
                None,
            )
            .context("failed to build output stream")
    }
}

fn i16_bytes_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|chunk| {
            let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
            f32::from(sample) / 32768.0
        })
        .collect()
}

fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    let chunk_size = 1024;
    let mut resampler =
        FftFixedIn::<f32>::new(source_rate as usize, target_rate as usize, chunk_size, 2, 1)
            .context("failed to create resampler")?;

    let mut output = Vec::new();
    let mut pos = 0;

    while pos < samples.len() {
        let frames_needed = resampler.input_frames_next();
        let end = (pos + frames_needed).min(samples.len());

        let mut chunk = samples[pos..end].to_vec();
        chunk.resize(frames_needed, 0.0);

        let resampled = resampler
            .process(&[chunk], None)
            .map_err(|e| anyhow::anyhow!("resampling failed: {e:?}"))?;
        if let Some(channel) = resampled.into_iter().next() {
            output.extend(channel);
        }

        pos = end;
    }

    Ok(output)
}
