//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::traits::{AudioError, AudioOutput, RenderFn, CHANNELS};

/// CPAL-based audio output. The render closure runs inside the device callback.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    running: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Open the default output device.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        if supported.sample_format() != SampleFormat::F32 {
            let has_f32 = device
                .supported_output_configs()
                .map_err(|e| AudioError::DeviceInit(e.to_string()))?
                .any(|range| range.sample_format() == SampleFormat::F32);
            if !has_f32 {
                return Err(AudioError::UnsupportedFormat(format!(
                    "{:?}",
                    supported.sample_format()
                )));
            }
            warn!(
                "default output format is {:?}, requesting f32 instead",
                supported.sample_format()
            );
        }

        let mut config: StreamConfig = supported.into();
        // Force stereo output; the render closure assumes 2-channel interleaving
        config.channels = CHANNELS as u16;

        info!(
            "audio device {}: {} Hz, {} channels",
            device.name().unwrap_or_else(|_| "<unnamed>".into()),
            config.sample_rate.0,
            config.channels
        );

        Ok(Self {
            device,
            config,
            stream: None,
            running: Arc::new(AtomicBool::new(false)),
        })
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn start(&mut self, mut render: RenderFn) -> Result<(), AudioError> {
        self.stream = None;
        let running = self.running.clone();

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !running.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }
                    render(data);
                },
                |err| warn!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        self.running.store(true, Ordering::Relaxed);
        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        self.stream = Some(stream);
        info!("audio stream started");

        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        if let Some(stream) = self.stream.take() {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
            info!("audio stream stopped");
        }
        Ok(())
    }
}
