//! Generation client.
//!
//! [`GenerationClient`] exposes the five capabilities the panels need:
//! transcription, concept inference, image synthesis, music analysis and the
//! persona chat.  It owns prompt construction, reply parsing and the local
//! fallbacks; the raw HTTP calls go through the [`Provider`] trait so tests
//! can swap in a scripted double.
//!
//! Failures come in two flavours:
//!
//! * recovered operations (concept inference) return [`Outcome`], which is
//!   either `Complete` or `Degraded` with a placeholder value;
//! * hard failures return [`GenerationError`].

pub mod chat;
pub mod client;
pub mod concept;
pub mod error;
pub mod gemini;
pub mod image;
pub mod outcome;
pub mod prompt;
pub mod provider;
pub mod style;
pub mod wire;

pub use chat::ChatSession;
pub use client::{GenerationClient, ModelSet};
pub use concept::{Concept, MovieMetadata};
pub use error::{GenerationError, ProviderError};
pub use gemini::GeminiProvider;
pub use image::GeneratedImage;
pub use outcome::Outcome;
pub use provider::Provider;
pub use style::{ArtifactStyle, Genre};

#[cfg(test)]
pub use provider::ScriptedProvider;
