//! Microphone capture via `cpal`.
//!
//! [`AudioCapture`] wraps the cpal host/device/stream lifecycle.
//! [`AudioCapture::start`] appends every callback buffer to a shared sample
//! buffer.  The returned [`StreamHandle`] is a RAII guard: dropping it stops
//! the hardware stream and releases the microphone.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

/// Interleaved `f32` samples written by the audio thread.
pub type SharedSamples = Arc<Mutex<Vec<f32>>>;

/// Keeps the cpal stream alive.  Not `Send` on every platform, so it stays
/// on the thread that opened it.
pub struct StreamHandle {
    _stream: cpal::Stream,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// The default input device and its preferred stream format.
pub struct AudioCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl AudioCapture {
    /// Open the system default input device.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoDevice`] when there is no microphone, or
    /// [`CaptureError::DefaultConfig`] when it cannot report a format.
    pub fn new() -> Result<Self, CaptureError> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;
        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;

        if let Ok(name) = device.name() {
            log::debug!("capture: using {name} ({sample_rate} Hz, {channels} ch)");
        }

        Ok(Self {
            device,
            config: supported.into(),
            sample_rate,
            channels,
        })
    }

    /// Start streaming into `sink`.
    ///
    /// A poisoned `sink` silently drops the buffer so the audio thread never
    /// panics.
    pub fn start(&self, sink: SharedSamples) -> Result<StreamHandle, CaptureError> {
        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if let Ok(mut samples) = sink.lock() {
                    samples.extend_from_slice(data);
                }
            },
            |err: cpal::StreamError| {
                log::error!("capture: stream error: {err}");
            },
            None,
        )?;

        stream.play()?;
        Ok(StreamHandle { _stream: stream })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}
