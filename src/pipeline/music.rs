//! Music Hall panel: one philosophical critique per run.

use std::sync::{Arc, Mutex};

use crate::genai::GenerationClient;
use crate::media::{LoadedInput, MediaPayload};
use crate::messages;

use super::state::{lock, ErrorBanner, RunToken, RunTracker, TaskStatus};

#[derive(Debug, Default)]
pub struct MusicState {
    pub status: TaskStatus,
    /// Song name, lyrics or a link.
    pub input_text: String,
    pub media: Option<MediaPayload>,
    /// Critique from the latest run; cleared when a new run starts.
    pub analysis: Option<String>,
    runs: RunTracker,
}

#[derive(Clone)]
pub struct MusicPanel {
    state: Arc<Mutex<MusicState>>,
    client: Arc<GenerationClient>,
    banner: ErrorBanner,
}

impl MusicPanel {
    pub fn new(client: Arc<GenerationClient>, banner: ErrorBanner) -> Self {
        Self {
            state: Arc::new(Mutex::new(MusicState::default())),
            client,
            banner,
        }
    }

    pub fn view<R>(&self, f: impl FnOnce(&MusicState) -> R) -> R {
        f(&lock(&self.state))
    }

    pub fn status(&self) -> TaskStatus {
        lock(&self.state).status
    }

    pub fn analysis(&self) -> Option<String> {
        lock(&self.state).analysis.clone()
    }

    pub fn set_input_text(&self, text: impl Into<String>) {
        lock(&self.state).input_text = text.into();
    }

    pub fn apply_input(&self, input: LoadedInput) {
        let mut st = lock(&self.state);
        match input {
            LoadedInput::Text { text, .. } => {
                st.input_text = text;
                st.media = None;
            }
            LoadedInput::Media(payload) => st.media = Some(payload),
        }
    }

    pub fn clear_media(&self) {
        lock(&self.state).media = None;
    }

    /// Guard and enter `Loading`.
    ///
    /// Empty input raises the banner and returns `None`; so does nothing
    /// while busy, minus the banner.
    pub fn begin(&self) -> Option<(RunToken, String, Option<MediaPayload>)> {
        let mut st = lock(&self.state);
        if st.status.is_busy() {
            return None;
        }
        if st.input_text.trim().is_empty() && st.media.is_none() {
            drop(st);
            self.banner.raise(messages::MUSIC_INPUT_MISSING);
            return None;
        }

        let token = st.runs.start();
        st.status = TaskStatus::Loading;
        st.analysis = None;
        let request = (token, st.input_text.trim().to_string(), st.media.clone());
        drop(st);

        self.banner.clear();
        Some(request)
    }

    pub async fn execute(&self, token: RunToken, text: String, media: Option<MediaPayload>) {
        let analysis = self.client.analyze_music(&text, media.as_ref()).await;

        let mut st = lock(&self.state);
        if !st.runs.is_current(token) {
            return;
        }
        st.runs.finish(token);

        match analysis {
            Ok(critique) => {
                st.analysis = Some(critique);
                st.status = TaskStatus::Done;
            }
            Err(e) => {
                log::error!("music: {e}");
                st.status = TaskStatus::Error;
                drop(st);
                self.banner.raise(messages::MUSIC_FAILED);
            }
        }
    }

    pub async fn analyze(&self) -> Option<RunToken> {
        let (token, text, media) = self.begin()?;
        self.execute(token, text, media).await;
        Some(token)
    }

    /// Forget the critique and any in-flight run.
    pub fn reset(&self) {
        let mut st = lock(&self.state);
        st.runs.invalidate();
        st.status = TaskStatus::Idle;
        st.analysis = None;
    }
}
