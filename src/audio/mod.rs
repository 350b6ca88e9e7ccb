//! Voice input: microphone capture → 16 kHz mono WAV → [`MediaPayload`].
//!
//! ```text
//! Microphone → cpal callback → SharedSamples → to_mono → resample → encode_wav
//! ```
//!
//! ```rust,no_run
//! use cinema_socrates::audio::VoiceRecorder;
//!
//! let mut recorder = VoiceRecorder::new();
//! recorder.start().unwrap();
//! // ... user talks ...
//! let note = recorder.stop().unwrap(); // Some(MediaPayload) tagged audio/wav
//! ```
//!
//! [`MediaPayload`]: crate::media::MediaPayload

pub mod capture;
pub mod recorder;
pub mod wav;

pub use capture::{AudioCapture, CaptureError, SharedSamples, StreamHandle};
pub use recorder::{RecordError, VoiceRecorder};
pub use wav::{encode_wav, resample, to_mono, voice_note_wav, VOICE_SAMPLE_RATE};
