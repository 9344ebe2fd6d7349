//! Audio output boundary - opens the default cpal device and runs the
//! renderer inside its callback.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::Producer;
use tracing::{error, info};

use theremin_dsp::{ToneRenderer, MAX_BLOCK_SIZE};

/// The default output device and the stream format it wants.
pub struct OutputDevice {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_format: cpal::SampleFormat,
    name: String,
}

impl OutputDevice {
    pub fn open_default() -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let supported = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;
        let name = device.name().unwrap_or_else(|_| "unknown device".into());

        Ok(Self {
            device,
            sample_format: supported.sample_format(),
            config: supported.into(),
            name,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate.0 as f32
    }

    pub fn channels(&self) -> usize {
        self.config.channels as usize
    }

    /// Build and start the stream. The renderer moves into the callback.
    pub fn start(self, renderer: ToneRenderer, scope: Producer<f32>) -> EyreResult<AudioOutput> {
        let stream = match self.sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&self.device, &self.config, renderer, scope),
            cpal::SampleFormat::I16 => build_stream::<i16>(&self.device, &self.config, renderer, scope),
            cpal::SampleFormat::U16 => build_stream::<u16>(&self.device, &self.config, renderer, scope),
            other => Err(eyre!("unsupported sample format {other:?}")),
        }?;
        stream.play().wrap_err("failed to start output stream")?;

        info!(
            device = %self.name,
            sample_rate = self.config.sample_rate.0,
            channels = self.config.channels,
            format = ?self.sample_format,
            "audio output started"
        );

        Ok(AudioOutput {
            stream: Some(stream),
            name: self.name,
        })
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut renderer: ToneRenderer,
    mut scope: Producer<f32>,
) -> EyreResult<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = (config.channels as usize).max(1);
    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE * channels];

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                renderer.render_blocks(data, &mut render_buf, channels, &mut scope, |sample| {
                    T::from_sample(sample)
                });
            },
            |err| error!(%err, "audio stream error"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    Ok(stream)
}

/// A running output stream.
pub struct AudioOutput {
    stream: Option<cpal::Stream>,
    name: String,
}

impl AudioOutput {
    /// Stop the callback and release the device. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(err) = stream.pause() {
                error!(%err, "failed to pause output stream");
            }
            drop(stream);
            info!(device = %self.name, "audio output stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.shutdown();
    }
}
