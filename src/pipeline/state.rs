//! Status enums, run tokens and the shared error banner.
//!
//! Each panel owns its own state behind an `Arc<Mutex<…>>`; the only piece
//! of state shared between panels is the [`ErrorBanner`].

use std::sync::{Arc, Mutex, MutexGuard};

// ---------------------------------------------------------------------------
// PipelineStatus
// ---------------------------------------------------------------------------

/// States of the poster/meme pipeline.
///
/// ```text
/// Idle | Completed | Error ──submit──▶ InferringConcept
///                                      ──concept ready──▶ GeneratingImage
///                                                         ──image──▶ Completed
///                                      any failure ──────────────▶ Error
/// Idle | Completed | Error ──voice──▶ Transcribing ──text──▶ Idle
///                                                  ──fail──▶ Error
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineStatus {
    #[default]
    Idle,
    Transcribing,
    InferringConcept,
    GeneratingImage,
    Completed,
    Error,
}

impl PipelineStatus {
    /// `true` while a provider call is in flight; submission is blocked.
    ///
    /// ```
    /// use cinema_socrates::pipeline::PipelineStatus;
    ///
    /// assert!(!PipelineStatus::Idle.is_busy());
    /// assert!(PipelineStatus::Transcribing.is_busy());
    /// assert!(PipelineStatus::InferringConcept.is_busy());
    /// assert!(PipelineStatus::GeneratingImage.is_busy());
    /// assert!(!PipelineStatus::Completed.is_busy());
    /// assert!(!PipelineStatus::Error.is_busy());
    /// ```
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            PipelineStatus::Transcribing
                | PipelineStatus::InferringConcept
                | PipelineStatus::GeneratingImage
        )
    }

    /// Status line shown under the submit button.
    pub fn label(self) -> &'static str {
        match self {
            PipelineStatus::Idle => "Listo",
            PipelineStatus::Transcribing => "Escuchando tu voz...",
            PipelineStatus::InferringConcept => "Pensando el concepto...",
            PipelineStatus::GeneratingImage => "Revelando la imagen...",
            PipelineStatus::Completed => "¡Listo!",
            PipelineStatus::Error => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// States of the single-call panels (music, chat).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskStatus {
    #[default]
    Idle,
    Loading,
    Done,
    Error,
}

impl TaskStatus {
    pub fn is_busy(self) -> bool {
        self == TaskStatus::Loading
    }
}

// ---------------------------------------------------------------------------
// RunToken
// ---------------------------------------------------------------------------

/// Identifies one run of a panel.  A response is applied only while its
/// token is still the panel's active token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunToken(u64);

impl RunToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Hands out tokens and remembers which one is current.
#[derive(Debug, Default)]
pub(crate) struct RunTracker {
    issued: u64,
    active: Option<RunToken>,
}

impl RunTracker {
    /// Issue a new token and make it the active one.
    pub(crate) fn start(&mut self) -> RunToken {
        self.issued += 1;
        let token = RunToken(self.issued);
        self.active = Some(token);
        token
    }

    pub(crate) fn is_current(&self, token: RunToken) -> bool {
        self.active == Some(token)
    }

    /// Mark `token` as finished.  No-op for stale tokens.
    pub(crate) fn finish(&mut self, token: RunToken) {
        if self.is_current(token) {
            self.active = None;
        }
    }

    /// Forget the active run; its response will be discarded.
    pub(crate) fn invalidate(&mut self) {
        self.active = None;
    }
}

// ---------------------------------------------------------------------------
// ErrorBanner
// ---------------------------------------------------------------------------

/// The top-level error message shared by every panel.
///
/// Cheap to clone (`Arc` clone).
#[derive(Debug, Clone, Default)]
pub struct ErrorBanner(Arc<Mutex<Option<String>>>);

impl ErrorBanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("banner: {message}");
        *lock(&self.0) = Some(message);
    }

    pub fn clear(&self) {
        *lock(&self.0) = None;
    }

    pub fn current(&self) -> Option<String> {
        lock(&self.0).clone()
    }
}

/// Lock `mutex`, recovering the data if a previous holder panicked.
///
/// Panel state stays consistent between statements, so a poisoned lock
/// carries no torn data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
