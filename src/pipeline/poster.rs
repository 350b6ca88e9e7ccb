//! Poster/meme orchestration: input → concept → image.
//!
//! [`PosterPipeline`] owns the Cine panel's state and drives it through
//! [`PipelineStatus`].  A run is split into a synchronous [`begin`] (guard,
//! state reset, token issue) and an async [`execute`] so the UI thread can
//! flip the status immediately and spawn the provider work.
//!
//! [`begin`]: PosterPipeline::begin
//! [`execute`]: PosterPipeline::execute

use std::sync::{Arc, Mutex};

use crate::genai::{ArtifactStyle, GeneratedImage, GenerationClient, Genre, MovieMetadata};
use crate::media::{LoadedInput, MediaPayload};
use crate::messages;

use super::state::{lock, ErrorBanner, PipelineStatus, RunToken, RunTracker};

/// Shown as the original input when media has no display name.
const MEDIA_PLACEHOLDER: &str = "Media Content";

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

/// Everything one run needs, captured when it starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub text: String,
    pub media: Option<MediaPayload>,
    pub style: ArtifactStyle,
    /// Only used for posters.
    pub genre: Genre,
}

impl GenerationRequest {
    /// Nothing to generate from: blank text and no media.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.media.is_none()
    }

    /// The text if present, else the media name, else a placeholder.
    pub fn original_input(&self) -> String {
        let text = self.text.trim();
        if !text.is_empty() {
            return text.to_string();
        }
        self.media
            .as_ref()
            .map(|m| m.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(MEDIA_PLACEHOLDER)
            .to_string()
    }
}

/// A finished poster or meme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub image: GeneratedImage,
    pub original_input: String,
    /// Visual prompt produced by concept inference.
    pub enhanced_prompt: String,
    /// Present for posters only.
    pub movie_metadata: Option<MovieMetadata>,
    /// Run that produced this result; doubles as an image cache key.
    pub run: RunToken,
}

// ---------------------------------------------------------------------------
// PosterState
// ---------------------------------------------------------------------------

/// Cine panel state.  Read by the UI every frame.
#[derive(Debug, Default)]
pub struct PosterState {
    pub status: PipelineStatus,
    pub input_text: String,
    pub media: Option<MediaPayload>,
    pub style: ArtifactStyle,
    pub genre: Genre,
    pub result: Option<Arc<GenerationResult>>,
    pub error_message: Option<String>,
    runs: RunTracker,
}

impl PosterState {
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest {
            text: self.input_text.clone(),
            media: self.media.clone(),
            style: self.style,
            genre: self.genre,
        }
    }
}

// ---------------------------------------------------------------------------
// PosterPipeline
// ---------------------------------------------------------------------------

/// Drives the Cine panel.  Cheap to clone; clones share state.
#[derive(Clone)]
pub struct PosterPipeline {
    state: Arc<Mutex<PosterState>>,
    client: Arc<GenerationClient>,
    banner: ErrorBanner,
}

impl PosterPipeline {
    pub fn new(client: Arc<GenerationClient>, banner: ErrorBanner) -> Self {
        Self {
            state: Arc::new(Mutex::new(PosterState::default())),
            client,
            banner,
        }
    }

    /// Run `f` against the current state.  Keep `f` short.
    pub fn view<R>(&self, f: impl FnOnce(&PosterState) -> R) -> R {
        f(&lock(&self.state))
    }

    pub fn status(&self) -> PipelineStatus {
        lock(&self.state).status
    }

    pub fn result(&self) -> Option<Arc<GenerationResult>> {
        lock(&self.state).result.clone()
    }

    // -----------------------------------------------------------------------
    // Input editing
    // -----------------------------------------------------------------------

    pub fn set_input_text(&self, text: impl Into<String>) {
        lock(&self.state).input_text = text.into();
    }

    pub fn set_style(&self, style: ArtifactStyle) {
        lock(&self.state).style = style;
    }

    pub fn set_genre(&self, genre: Genre) {
        lock(&self.state).genre = genre;
    }

    pub fn clear_media(&self) {
        lock(&self.state).media = None;
    }

    /// Apply a picked file: text files replace the input text and drop any
    /// media; everything else becomes the attached media.
    pub fn apply_input(&self, input: LoadedInput) {
        let mut st = lock(&self.state);
        match input {
            LoadedInput::Text { text, name } => {
                log::info!("poster: loaded text from {name}");
                st.input_text = text;
                st.media = None;
            }
            LoadedInput::Media(payload) => {
                log::info!("poster: attached {} ({})", payload.name, payload.mime_type);
                st.media = Some(payload);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Start a run from the current inputs.
    ///
    /// Returns `None` (and changes nothing) when the input is empty or a run
    /// is already in flight.
    pub fn begin(&self) -> Option<(RunToken, GenerationRequest)> {
        let mut st = lock(&self.state);
        let request = st.request();

        if request.is_empty() {
            log::debug!("poster: submit ignored, nothing to generate from");
            return None;
        }
        if st.status.is_busy() {
            log::debug!("poster: submit ignored while {:?}", st.status);
            return None;
        }

        let token = st.runs.start();
        st.status = PipelineStatus::InferringConcept;
        st.result = None;
        st.error_message = None;
        drop(st);

        self.banner.clear();
        log::info!("poster: run {} started ({:?})", token.id(), request.style);
        Some((token, request))
    }

    /// Provider half of a run started with [`begin`](Self::begin).
    pub async fn execute(&self, token: RunToken, request: GenerationRequest) {
        if !lock(&self.state).runs.is_current(token) {
            return;
        }

        let text = request.text.trim();
        let concept = self
            .client
            .infer_concept(text, request.style, request.genre, request.media.as_ref())
            .await;
        if let Some(cause) = concept.cause() {
            log::info!("poster: run {} continues with placeholder concept ({cause})", token.id());
        }
        let (prompt, metadata) = concept.into_value().into_parts();

        {
            let mut st = lock(&self.state);
            if !st.runs.is_current(token) {
                log::debug!("poster: run {} superseded after concept", token.id());
                return;
            }
            st.status = PipelineStatus::GeneratingImage;
        }

        let genre = (request.style == ArtifactStyle::Poster).then_some(request.genre);
        let image = self.client.generate_image(&prompt, request.style, genre).await;

        let mut st = lock(&self.state);
        if !st.runs.is_current(token) {
            log::debug!("poster: run {} superseded after image", token.id());
            return;
        }
        st.runs.finish(token);

        match image {
            Ok(image) => {
                log::info!("poster: run {} completed with {}", token.id(), image.model);
                st.result = Some(Arc::new(GenerationResult {
                    image,
                    original_input: request.original_input(),
                    enhanced_prompt: prompt,
                    movie_metadata: metadata,
                    run: token,
                }));
                st.status = PipelineStatus::Completed;
            }
            Err(e) => {
                log::error!("poster: run {} failed: {e}", token.id());
                st.status = PipelineStatus::Error;
                st.error_message = Some(messages::POSTER_FAILED.to_string());
                drop(st);
                self.banner.raise(messages::POSTER_FAILED);
            }
        }
    }

    /// [`begin`](Self::begin) then [`execute`](Self::execute) on the
    /// current task.
    pub async fn submit(&self) -> Option<RunToken> {
        let (token, request) = self.begin()?;
        self.execute(token, request).await;
        Some(token)
    }

    // -----------------------------------------------------------------------
    // Voice input
    // -----------------------------------------------------------------------

    /// Enter `Transcribing`.  `None` while another run is in flight.
    pub fn begin_transcription(&self) -> Option<RunToken> {
        let mut st = lock(&self.state);
        if st.status.is_busy() {
            return None;
        }
        let token = st.runs.start();
        st.status = PipelineStatus::Transcribing;
        st.result = None;
        st.error_message = None;
        drop(st);

        self.banner.clear();
        Some(token)
    }

    /// Transcribe `audio` and write the text into the input field.
    pub async fn execute_transcription(&self, token: RunToken, audio: MediaPayload) {
        let transcript = self.client.transcribe(&audio).await;

        let mut st = lock(&self.state);
        if !st.runs.is_current(token) {
            log::debug!("poster: transcription {} discarded", token.id());
            return;
        }
        st.runs.finish(token);

        match transcript {
            Ok(text) => {
                log::info!("poster: transcribed {} chars", text.chars().count());
                st.input_text = text;
                st.status = PipelineStatus::Idle;
            }
            Err(e) => {
                log::error!("poster: {e}");
                st.status = PipelineStatus::Error;
                st.error_message = Some(messages::TRANSCRIPTION_FAILED.to_string());
                drop(st);
                self.banner.raise(messages::TRANSCRIPTION_FAILED);
            }
        }
    }

    pub async fn transcribe_into_input(&self, audio: MediaPayload) -> Option<RunToken> {
        let token = self.begin_transcription()?;
        self.execute_transcription(token, audio).await;
        Some(token)
    }

    /// Dismiss the current result or error.  Any in-flight response is
    /// discarded when it arrives.
    pub fn reset(&self) {
        let mut st = lock(&self.state);
        st.runs.invalidate();
        st.status = PipelineStatus::Idle;
        st.result = None;
        st.error_message = None;
        st.media = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::{GenerationError, ModelSet, ProviderError, ScriptedProvider};

    const TITLE_REPLY: &str = r#"{"title":"Sentido y Sensibilidad Existencial","actors":"Jean-Paul Sartrevolta, Simone de Beauvoirson","visualPrompt":"Movie poster, a lone figure under a vast starry sky"}"#;

    fn pipeline_with(provider: ScriptedProvider) -> (PosterPipeline, Arc<ScriptedProvider>, ErrorBanner) {
        let provider = Arc::new(provider);
        let client = Arc::new(GenerationClient::new(provider.clone(), ModelSet::default()));
        let banner = ErrorBanner::new();
        (PosterPipeline::new(client, banner.clone()), provider, banner)
    }

    fn working_provider() -> ScriptedProvider {
        ScriptedProvider::new()
            .with_content(|_, _| Ok(ScriptedProvider::text_reply(TITLE_REPLY)))
            .with_images(|_, _| Ok(ScriptedProvider::prediction("/9j/4AAQ")))
    }

    fn failing_images() -> ScriptedProvider {
        ScriptedProvider::new()
            .with_content(|model, _| {
                if model == "gemini-2.5-flash-image" {
                    Err(ProviderError::Status {
                        status: 503,
                        body: "overloaded".into(),
                    })
                } else {
                    Ok(ScriptedProvider::text_reply(TITLE_REPLY))
                }
            })
            .with_images(|_, _| Err(ProviderError::Timeout))
    }

    #[tokio::test]
    async fn text_poster_run_completes_with_metadata() {
        let (pipeline, _, banner) = pipeline_with(working_provider());
        pipeline.set_input_text("el sentido de la vida");
        pipeline.set_style(ArtifactStyle::Poster);
        pipeline.set_genre(Genre::Epic);

        let token = pipeline.submit().await.expect("run should start");

        assert_eq!(pipeline.status(), PipelineStatus::Completed);
        let result = pipeline.result().expect("result");
        assert!(!result.image.data.is_empty());
        assert_eq!(result.original_input, "el sentido de la vida");
        assert_eq!(result.run, token);
        let title = &result.movie_metadata.as_ref().unwrap().title;
        assert!(!title.is_empty());
        assert_ne!(title, "el sentido de la vida");
        assert!(banner.current().is_none());
    }

    #[tokio::test]
    async fn empty_input_is_a_no_op() {
        let (pipeline, provider, _) = pipeline_with(working_provider());
        pipeline.set_input_text("   ");

        assert!(pipeline.submit().await.is_none());
        assert_eq!(pipeline.status(), PipelineStatus::Idle);
        assert_eq!(provider.content_calls(), 0);
        assert_eq!(provider.image_calls(), 0);
    }

    #[tokio::test]
    async fn both_image_models_failing_ends_in_error() {
        let (pipeline, provider, banner) = pipeline_with(failing_images());
        pipeline.set_input_text("la angustia");

        pipeline.submit().await;

        assert_eq!(pipeline.status(), PipelineStatus::Error);
        assert!(pipeline.result().is_none());
        assert_eq!(
            pipeline.view(|st| st.error_message.clone()).as_deref(),
            Some(messages::POSTER_FAILED)
        );
        assert_eq!(banner.current().as_deref(), Some(messages::POSTER_FAILED));
        assert_eq!(provider.image_calls(), 1);
        assert_eq!(provider.content_calls(), 2);
    }

    #[tokio::test]
    async fn concept_failure_still_produces_a_poster() {
        let (pipeline, _, _) = pipeline_with(
            ScriptedProvider::new()
                .with_content(|_, _| Err(ProviderError::Timeout))
                .with_images(|_, _| Ok(ScriptedProvider::prediction("/9j/4AAQ"))),
        );
        pipeline.set_input_text("el eterno retorno");

        pipeline.submit().await;

        assert_eq!(pipeline.status(), PipelineStatus::Completed);
        let result = pipeline.result().unwrap();
        assert_eq!(result.enhanced_prompt, "el eterno retorno, movie poster style");
        assert_eq!(
            result.movie_metadata.as_ref().unwrap().title,
            crate::genai::concept::FALLBACK_TITLE
        );
    }

    #[tokio::test]
    async fn meme_run_has_no_metadata_and_ignores_genre() {
        let (pipeline, provider, _) = pipeline_with(
            ScriptedProvider::new()
                .with_content(|_, _| Ok(ScriptedProvider::text_reply("Diogenes in a barrel")))
                .with_images(|_, _| Ok(ScriptedProvider::prediction("/9j/4AAQ"))),
        );
        pipeline.set_input_text("cinismo");
        pipeline.set_style(ArtifactStyle::Meme);
        pipeline.set_genre(Genre::Noir);

        pipeline.submit().await;

        let result = pipeline.result().unwrap();
        assert!(result.movie_metadata.is_none());
        assert_eq!(result.enhanced_prompt, "Diogenes in a barrel");
        let prompt = &provider.image_requests()[0].1.instances[0].prompt;
        assert!(!prompt.contains("chiaroscuro"));
    }

    #[tokio::test]
    async fn media_only_run_uses_media_name_as_original_input() {
        let (pipeline, provider, _) = pipeline_with(working_provider());
        pipeline.apply_input(LoadedInput::Media(MediaPayload::from_bytes(
            b"%PDF-1.7",
            "application/pdf",
            "tesis.pdf",
        )));

        pipeline.submit().await;

        assert_eq!(pipeline.result().unwrap().original_input, "tesis.pdf");
        let parts = &provider.content_requests()[0].1.contents[0].parts;
        assert!(parts[0].inline_data.is_some());
    }

    #[test]
    fn original_input_falls_back_to_placeholder() {
        let request = GenerationRequest {
            media: Some(MediaPayload::from_bytes(b"x", "video/mp4", "")),
            ..GenerationRequest::default()
        };
        assert!(!request.is_empty());
        assert_eq!(request.original_input(), "Media Content");
    }

    #[test]
    fn text_file_replaces_input_and_clears_media() {
        let (pipeline, _, _) = pipeline_with(ScriptedProvider::new());
        pipeline.apply_input(LoadedInput::Media(MediaPayload::from_bytes(
            b"x",
            "image/png",
            "a.png",
        )));
        pipeline.apply_input(LoadedInput::Text {
            text: "cogito".into(),
            name: "nota.txt".into(),
        });

        pipeline.view(|st| {
            assert_eq!(st.input_text, "cogito");
            assert!(st.media.is_none());
        });
    }

    #[test]
    fn submit_is_rejected_while_busy() {
        let (pipeline, _, _) = pipeline_with(working_provider());
        pipeline.set_input_text("la duda");

        let first = pipeline.begin();
        assert!(first.is_some());
        assert_eq!(pipeline.status(), PipelineStatus::InferringConcept);
        assert!(pipeline.begin().is_none());
        assert!(pipeline.begin_transcription().is_none());
    }

    #[tokio::test]
    async fn next_run_clears_previous_result_and_error() {
        let (pipeline, _, _) = pipeline_with(working_provider());
        pipeline.set_input_text("uno");
        pipeline.submit().await;
        assert!(pipeline.result().is_some());

        let (_token, _) = pipeline.begin().unwrap();
        pipeline.view(|st| {
            assert!(st.result.is_none());
            assert!(st.error_message.is_none());
            assert_eq!(st.status, PipelineStatus::InferringConcept);
        });
    }

    #[tokio::test]
    async fn stale_run_never_touches_state() {
        let (pipeline, _, _) = pipeline_with(working_provider());
        pipeline.set_input_text("la caverna");

        let (stale, request) = pipeline.begin().unwrap();
        pipeline.reset();
        let (fresh, fresh_request) = pipeline.begin().unwrap();

        pipeline.execute(stale, request).await;
        assert_eq!(pipeline.status(), PipelineStatus::InferringConcept);
        assert!(pipeline.result().is_none());

        pipeline.execute(fresh, fresh_request).await;
        assert_eq!(pipeline.status(), PipelineStatus::Completed);
        assert_eq!(pipeline.result().unwrap().run, fresh);
    }

    #[tokio::test]
    async fn reset_discards_in_flight_response() {
        let (pipeline, _, _) = pipeline_with(working_provider());
        pipeline.set_input_text("la caverna");

        let (token, request) = pipeline.begin().unwrap();
        pipeline.reset();
        pipeline.execute(token, request).await;

        assert_eq!(pipeline.status(), PipelineStatus::Idle);
        assert!(pipeline.result().is_none());
    }

    #[tokio::test]
    async fn transcription_fills_input_and_returns_to_idle() {
        let (pipeline, provider, _) = pipeline_with(
            ScriptedProvider::new()
                .with_content(|_, _| Ok(ScriptedProvider::text_reply("pienso, luego existo"))),
        );
        let audio = MediaPayload::from_bytes(b"RIFF", "audio/wav", "voz.wav");

        let token = pipeline.transcribe_into_input(audio).await;

        assert!(token.is_some());
        assert_eq!(pipeline.status(), PipelineStatus::Idle);
        assert_eq!(pipeline.view(|st| st.input_text.clone()), "pienso, luego existo");
        assert_eq!(provider.content_calls(), 1);
    }

    #[tokio::test]
    async fn transcription_clears_previous_poster_and_banner() {
        let (pipeline, _, banner) = pipeline_with(working_provider());
        pipeline.set_input_text("el sentido de la vida");
        pipeline.submit().await;
        assert!(pipeline.result().is_some());
        banner.raise(messages::SHARE_FAILED);

        let audio = MediaPayload::from_bytes(b"RIFF", "audio/wav", "voz.wav");
        let token = pipeline.begin_transcription().unwrap();
        assert!(pipeline.result().is_none());
        assert!(banner.current().is_none());

        pipeline.execute_transcription(token, audio).await;
        assert_eq!(pipeline.status(), PipelineStatus::Idle);
        assert!(pipeline.result().is_none());
    }

    #[tokio::test]
    async fn transcription_failure_sets_error() {
        let (pipeline, _, banner) = pipeline_with(
            ScriptedProvider::new().with_content(|_, _| Err(ProviderError::Timeout)),
        );
        pipeline.set_input_text("previo");
        let audio = MediaPayload::from_bytes(b"RIFF", "audio/wav", "voz.wav");

        pipeline.transcribe_into_input(audio).await;

        assert_eq!(pipeline.status(), PipelineStatus::Error);
        assert_eq!(pipeline.view(|st| st.input_text.clone()), "previo");
        assert_eq!(banner.current().as_deref(), Some(messages::TRANSCRIPTION_FAILED));
    }

    #[test]
    fn transcribing_blocks_submit() {
        let (pipeline, _, _) = pipeline_with(ScriptedProvider::new());
        pipeline.set_input_text("algo");

        pipeline.begin_transcription().unwrap();
        assert_eq!(pipeline.status(), PipelineStatus::Transcribing);
        assert!(pipeline.begin().is_none());
    }

    #[test]
    fn error_messages_match_generation_error() {
        let e = GenerationError::ImageGeneration {
            primary: "a".into(),
            fallback: "b".into(),
        };
        assert_eq!(e.user_message(), messages::POSTER_FAILED);
    }
}
