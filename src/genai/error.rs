//! Error types for the generation client.

use thiserror::Error;

use crate::messages;

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// Transport-level failures talking to the generation provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// No credential was supplied at startup.
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("provider request timed out")]
    Timeout,

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("failed to parse provider response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationError
// ---------------------------------------------------------------------------

/// Failures of the four generation capabilities.
///
/// [`ConceptInference`](Self::ConceptInference) and
/// [`ChatSend`](Self::ChatSend) are never surfaced to the user; they travel
/// inside [`Outcome::Degraded`](super::Outcome::Degraded) next to the
/// substitute value.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("transcription failed: {0}")]
    Transcription(#[source] ProviderError),

    #[error("concept inference failed: {0}")]
    ConceptInference(String),

    /// Both the primary and the fallback image model came back empty.
    #[error("failed to generate image with all available models (primary: {primary}; fallback: {fallback})")]
    ImageGeneration { primary: String, fallback: String },

    #[error("music analysis failed: {0}")]
    Analysis(#[source] ProviderError),

    #[error("chat message failed: {0}")]
    ChatSend(#[source] ProviderError),
}

impl GenerationError {
    /// Localised banner text for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::Transcription(_) => messages::TRANSCRIPTION_FAILED,
            GenerationError::ConceptInference(_) | GenerationError::ImageGeneration { .. } => {
                messages::POSTER_FAILED
            }
            GenerationError::Analysis(_) => messages::MUSIC_FAILED,
            GenerationError::ChatSend(_) => messages::CHAT_FALLBACK_REPLY,
        }
    }
}
