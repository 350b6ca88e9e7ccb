//! Press-to-start / press-to-stop voice recorder.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::media::MediaPayload;

use super::capture::{AudioCapture, CaptureError, SharedSamples, StreamHandle};
use super::wav::voice_note_wav;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("failed to encode recording: {0}")]
    Encode(#[from] hound::Error),
}

struct ActiveRecording {
    _handle: StreamHandle,
    samples: SharedSamples,
    sample_rate: u32,
    channels: u16,
}

/// Owns at most one live microphone stream.
///
/// Lives on the UI thread; the stream handle is not `Send` everywhere.
#[derive(Default)]
pub struct VoiceRecorder {
    active: Option<ActiveRecording>,
}

impl VoiceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Open the default microphone and start buffering.  No-op when already
    /// recording.
    pub fn start(&mut self) -> Result<(), RecordError> {
        if self.active.is_some() {
            return Ok(());
        }

        let capture = AudioCapture::new()?;
        let samples: SharedSamples = Arc::new(Mutex::new(Vec::new()));
        let handle = capture.start(Arc::clone(&samples))?;
        log::info!("recorder: started");

        self.active = Some(ActiveRecording {
            _handle: handle,
            samples,
            sample_rate: capture.sample_rate(),
            channels: capture.channels(),
        });
        Ok(())
    }

    /// Stop recording, release the microphone and return the take as a WAV
    /// payload.  `None` when nothing was recorded.
    pub fn stop(&mut self) -> Result<Option<MediaPayload>, RecordError> {
        let Some(recording) = self.active.take() else {
            return Ok(None);
        };
        let ActiveRecording {
            _handle: handle,
            samples,
            sample_rate,
            channels,
        } = recording;
        // Release the microphone before encoding.
        drop(handle);

        let interleaved = std::mem::take(
            &mut *samples
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        if interleaved.is_empty() {
            log::warn!("recorder: stopped with no audio");
            return Ok(None);
        }

        let wav = voice_note_wav(&interleaved, channels, sample_rate)?;
        log::info!(
            "recorder: captured {:.1}s",
            interleaved.len() as f32 / (sample_rate.max(1) as f32 * f32::from(channels.max(1)))
        );
        Ok(Some(MediaPayload::from_bytes(&wav, "audio/wav", "voz.wav")))
    }
}
