//! Typed generation client: prompt shaping, reply parsing, and fallbacks on
//! top of a raw [`Provider`].

use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::media::MediaPayload;
use crate::messages;

use super::chat::ChatSession;
use super::concept::{fallback_meme, fallback_poster, parse_poster_reply, Concept};
use super::error::{GenerationError, ProviderError};
use super::gemini::GeminiProvider;
use super::image::GeneratedImage;
use super::outcome::Outcome;
use super::prompt;
use super::provider::Provider;
use super::style::{ArtifactStyle, Genre};
use super::wire::{
    Content, GenerateContentRequest, OutputOptions, Part, PredictInstance, PredictParameters,
    PredictRequest,
};

/// Output format of the primary image model.
const PRIMARY_IMAGE_MIME: &str = "image/jpeg";

/// Model identifiers used for each capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSet {
    /// Transcription, concepts, music analysis and chat.
    pub text: String,
    /// High-quality image synthesis (`predict`).
    pub image: String,
    /// General-purpose multimodal model used when `image` yields nothing.
    pub fallback_image: String,
}

impl Default for ModelSet {
    fn default() -> Self {
        Self::from_config(&ProviderConfig::default())
    }
}

impl ModelSet {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            text: config.text_model.clone(),
            image: config.image_model.clone(),
            fallback_image: config.fallback_image_model.clone(),
        }
    }
}

/// The generation client shared by every panel.
///
/// Construct once at startup and hand out `Arc<GenerationClient>`.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use cinema_socrates::config::AppConfig;
/// use cinema_socrates::genai::GenerationClient;
///
/// let config = AppConfig::default().with_env_credentials();
/// let client = Arc::new(GenerationClient::from_config(&config.provider));
/// ```
pub struct GenerationClient {
    provider: Arc<dyn Provider>,
    models: ModelSet,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn Provider>, models: ModelSet) -> Self {
        Self { provider, models }
    }

    /// Production client talking to Gemini.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(
            Arc::new(GeminiProvider::from_config(config)),
            ModelSet::from_config(config),
        )
    }

    pub fn models(&self) -> &ModelSet {
        &self.models
    }

    // -----------------------------------------------------------------------
    // Transcription
    // -----------------------------------------------------------------------

    /// Verbatim transcription of `audio`.  An empty reply yields `""`.
    pub async fn transcribe(&self, audio: &MediaPayload) -> Result<String, GenerationError> {
        let mut audio = audio.clone();
        if audio.mime_type.is_empty() {
            audio.mime_type = "audio/wav".into();
        }

        let request = GenerateContentRequest::single(vec![
            Part::inline(&audio),
            Part::text(prompt::TRANSCRIBE_INSTRUCTION),
        ]);

        let response = self
            .provider
            .generate_content(&self.models.text, &request)
            .await
            .map_err(GenerationError::Transcription)?;

        Ok(response.text().unwrap_or_default())
    }

    // -----------------------------------------------------------------------
    // Concept inference
    // -----------------------------------------------------------------------

    /// Turn user input into an image concept.
    ///
    /// Never fails: provider errors and unparsable replies come back as
    /// [`Outcome::Degraded`] carrying a placeholder concept.
    pub async fn infer_concept(
        &self,
        text: &str,
        style: ArtifactStyle,
        genre: Genre,
        media: Option<&MediaPayload>,
    ) -> Outcome<Concept> {
        let mut parts = Vec::with_capacity(2);
        if let Some(media) = media {
            parts.push(Part::inline(media));
        }

        match style {
            ArtifactStyle::Meme => {
                parts.push(Part::text(prompt::meme_concept_instruction(text)));
                let request = GenerateContentRequest::single(parts);
                match self.provider.generate_content(&self.models.text, &request).await {
                    Ok(response) => {
                        let prompt = response.text().unwrap_or_else(|| text.to_string());
                        Outcome::Complete(Concept::Meme {
                            visual_prompt: prompt,
                        })
                    }
                    Err(e) => {
                        log::warn!("concept: meme inference failed, using raw input: {e}");
                        Outcome::Degraded {
                            value: fallback_meme(text),
                            cause: GenerationError::ConceptInference(e.to_string()),
                        }
                    }
                }
            }
            ArtifactStyle::Poster => {
                parts.push(Part::text(prompt::poster_concept_instruction(text, genre)));
                let request = GenerateContentRequest::single(parts).expect_json();
                let parsed = self
                    .provider
                    .generate_content(&self.models.text, &request)
                    .await
                    .map_err(|e| e.to_string())
                    .and_then(|response| {
                        parse_poster_reply(&response.text().unwrap_or_else(|| "{}".into()))
                    });

                match parsed {
                    Ok(concept) => Outcome::Complete(concept),
                    Err(reason) => {
                        log::warn!("concept: poster inference degraded to placeholder: {reason}");
                        Outcome::Degraded {
                            value: fallback_poster(text),
                            cause: GenerationError::ConceptInference(reason),
                        }
                    }
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Image synthesis
    // -----------------------------------------------------------------------

    /// Synthesize one image for `prompt`.
    ///
    /// Tries the primary image model first and falls back to the multimodal
    /// model on any error or empty result.
    ///
    /// # Errors
    ///
    /// [`GenerationError::ImageGeneration`] when both attempts yield nothing.
    pub async fn generate_image(
        &self,
        prompt: &str,
        style: ArtifactStyle,
        genre: Option<Genre>,
    ) -> Result<GeneratedImage, GenerationError> {
        let final_prompt = prompt::image_prompt(prompt, style, genre);

        let primary = match self.primary_image(&final_prompt, style).await {
            Ok(image) => return Ok(image),
            Err(reason) => {
                log::warn!(
                    "image: {} failed ({reason}), trying {}",
                    self.models.image,
                    self.models.fallback_image
                );
                reason
            }
        };

        match self.fallback_image(&final_prompt).await {
            Ok(image) => Ok(image),
            Err(fallback) => {
                log::error!("image: fallback {} failed too: {fallback}", self.models.fallback_image);
                Err(GenerationError::ImageGeneration { primary, fallback })
            }
        }
    }

    async fn primary_image(&self, prompt: &str, style: ArtifactStyle) -> Result<GeneratedImage, String> {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: style.aspect_ratio().to_string(),
                output_options: OutputOptions {
                    mime_type: PRIMARY_IMAGE_MIME.to_string(),
                },
            },
        };

        let response = self
            .provider
            .predict_images(&self.models.image, &request)
            .await
            .map_err(|e| e.to_string())?;

        response
            .predictions
            .into_iter()
            .find_map(|p| p.bytes_base64_encoded.filter(|b| !b.is_empty()))
            .map(|data| GeneratedImage {
                mime_type: PRIMARY_IMAGE_MIME.to_string(),
                data,
                model: self.models.image.clone(),
            })
            .ok_or_else(|| "no images returned".to_string())
    }

    async fn fallback_image(&self, prompt: &str) -> Result<GeneratedImage, String> {
        let request = GenerateContentRequest::single(vec![Part::text(prompt)]).expect_image();

        let response = self
            .provider
            .generate_content(&self.models.fallback_image, &request)
            .await
            .map_err(|e| e.to_string())?;

        response
            .first_inline_data()
            .filter(|blob| !blob.data.is_empty())
            .map(|blob| GeneratedImage {
                mime_type: if blob.mime_type.is_empty() {
                    "image/png".to_string()
                } else {
                    blob.mime_type.clone()
                },
                data: blob.data.clone(),
                model: self.models.fallback_image.clone(),
            })
            .ok_or_else(|| "no inline image in reply".to_string())
    }

    // -----------------------------------------------------------------------
    // Music analysis
    // -----------------------------------------------------------------------

    /// Philosophical critique of a song, album, or lyric.
    pub async fn analyze_music(
        &self,
        text: &str,
        media: Option<&MediaPayload>,
    ) -> Result<String, GenerationError> {
        let mut parts = Vec::with_capacity(2);
        if let Some(media) = media {
            parts.push(Part::inline(media));
        }
        parts.push(Part::text(prompt::music_analysis_instruction(text)));

        let response = self
            .provider
            .generate_content(&self.models.text, &GenerateContentRequest::single(parts))
            .await
            .map_err(GenerationError::Analysis)?;

        Ok(response
            .text()
            .unwrap_or_else(|| messages::MUSIC_EMPTY_REPLY.to_string()))
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    /// Open a session with the persona instruction.
    pub fn create_chat_session(&self) -> ChatSession {
        ChatSession::new(prompt::PERSONA_INSTRUCTION)
    }

    /// Send one user turn.  On success the exchange is appended to the
    /// session history; on failure the session is left untouched.
    pub async fn send_message(
        &self,
        session: &mut ChatSession,
        message: &str,
    ) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: session.contents_with(message),
            system_instruction: Some(Content::system(session.system_instruction())),
            generation_config: None,
        };

        let response = self
            .provider
            .generate_content(&self.models.text, &request)
            .await
            .map_err(GenerationError::ChatSend)?;

        let reply = response
            .text()
            .unwrap_or_else(|| messages::CHAT_EMPTY_REPLY.to_string());
        session.record_exchange(message, &reply);
        Ok(reply)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::concept::{FALLBACK_ACTORS, FALLBACK_TITLE};
    use crate::genai::provider::ScriptedProvider;

    fn client_with(provider: ScriptedProvider) -> (GenerationClient, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        let client = GenerationClient::new(provider.clone(), ModelSet::default());
        (client, provider)
    }

    fn status_500() -> ProviderError {
        ProviderError::Status {
            status: 500,
            body: "internal".into(),
        }
    }

    // ---- transcribe ---

    #[tokio::test]
    async fn transcribe_sends_audio_and_instruction() {
        let (client, provider) =
            client_with(ScriptedProvider::new().with_content(|_, _| Ok(ScriptedProvider::text_reply("hola mundo"))));
        let audio = MediaPayload::from_bytes(b"RIFF", "", "voz.wav");

        let text = client.transcribe(&audio).await.unwrap();
        assert_eq!(text, "hola mundo");

        let (model, req) = &provider.content_requests()[0];
        assert_eq!(model, "gemini-2.5-flash");
        let parts = &req.contents[0].parts;
        assert_eq!(parts[0].inline_data.as_ref().unwrap().mime_type, "audio/wav");
        assert_eq!(parts[1].text.as_deref(), Some(prompt::TRANSCRIBE_INSTRUCTION));
    }

    #[tokio::test]
    async fn transcribe_empty_reply_is_empty_string() {
        let (client, _) = client_with(ScriptedProvider::new().with_content(|_, _| {
            Ok(crate::genai::wire::GenerateContentResponse::default())
        }));
        let audio = MediaPayload::from_bytes(b"RIFF", "audio/webm", "voz.webm");
        assert_eq!(client.transcribe(&audio).await.unwrap(), "");
    }

    #[tokio::test]
    async fn transcribe_failure_is_transcription_error() {
        let (client, _) = client_with(ScriptedProvider::new().with_content(|_, _| Err(ProviderError::Timeout)));
        let audio = MediaPayload::from_bytes(b"RIFF", "audio/wav", "voz.wav");
        assert!(matches!(
            client.transcribe(&audio).await,
            Err(GenerationError::Transcription(ProviderError::Timeout))
        ));
    }

    // ---- infer_concept ---

    #[tokio::test]
    async fn poster_concept_parses_fenced_json_and_requests_json() {
        let (client, provider) = client_with(ScriptedProvider::new().with_content(|_, _| {
            Ok(ScriptedProvider::text_reply(
                "```json\n{\"title\":\"El Mito de la Caverna 2\",\"actors\":\"Platón Pitt\",\"visualPrompt\":\"A cave\"}\n```",
            ))
        }));

        let outcome = client
            .infer_concept("sombras", ArtifactStyle::Poster, Genre::Noir, None)
            .await;
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.value().metadata().unwrap().title, "El Mito de la Caverna 2");

        let (_, req) = &provider.content_requests()[0];
        assert_eq!(
            req.generation_config.as_ref().unwrap().response_mime_type.as_deref(),
            Some("application/json")
        );
        assert!(req.prompt_text().contains("NOIR"));
    }

    #[tokio::test]
    async fn poster_concept_malformed_json_degrades() {
        let (client, _) = client_with(
            ScriptedProvider::new().with_content(|_, _| Ok(ScriptedProvider::text_reply("{oops"))),
        );
        let outcome = client
            .infer_concept("la nada", ArtifactStyle::Poster, Genre::Epic, None)
            .await;

        assert!(outcome.is_degraded());
        assert!(matches!(outcome.cause(), Some(GenerationError::ConceptInference(_))));
        let meta = outcome.value().metadata().unwrap();
        assert_eq!(meta.title, FALLBACK_TITLE);
        assert_eq!(meta.actors, FALLBACK_ACTORS);
        assert_eq!(outcome.value().visual_prompt(), "la nada, movie poster style");
    }

    #[tokio::test]
    async fn poster_concept_provider_error_degrades() {
        let (client, _) = client_with(ScriptedProvider::new().with_content(|_, _| Err(status_500())));
        let outcome = client
            .infer_concept("x", ArtifactStyle::Poster, Genre::Indie, None)
            .await;
        assert!(outcome.is_degraded());
        assert!(outcome.value().metadata().is_some());
    }

    #[tokio::test]
    async fn meme_concept_is_plain_text_without_json_mode() {
        let (client, provider) = client_with(
            ScriptedProvider::new()
                .with_content(|_, _| Ok(ScriptedProvider::text_reply("A cat reading Kant"))),
        );
        let outcome = client
            .infer_concept("gatos", ArtifactStyle::Meme, Genre::Epic, None)
            .await;

        assert_eq!(
            outcome.into_value(),
            Concept::Meme {
                visual_prompt: "A cat reading Kant".into()
            }
        );
        assert!(provider.content_requests()[0].1.generation_config.is_none());
    }

    #[tokio::test]
    async fn meme_concept_empty_reply_uses_input() {
        let (client, _) = client_with(ScriptedProvider::new().with_content(|_, _| {
            Ok(crate::genai::wire::GenerateContentResponse::default())
        }));
        let outcome = client
            .infer_concept("gatos", ArtifactStyle::Meme, Genre::Epic, None)
            .await;
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.value().visual_prompt(), "gatos");
    }

    #[tokio::test]
    async fn concept_includes_media_part_first() {
        let (client, provider) = client_with(ScriptedProvider::new());
        let media = MediaPayload::from_bytes(b"%PDF", "application/pdf", "tesis.pdf");
        let _ = client
            .infer_concept("", ArtifactStyle::Meme, Genre::Epic, Some(&media))
            .await;

        let parts = &provider.content_requests()[0].1.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[0].inline_data.as_ref().unwrap().mime_type,
            "application/pdf"
        );
    }

    // ---- generate_image ---

    #[tokio::test]
    async fn primary_image_success_skips_fallback() {
        let (client, provider) = client_with(
            ScriptedProvider::new().with_images(|_, _| Ok(ScriptedProvider::prediction("aGVsbG8="))),
        );

        let image = client
            .generate_image("A poster", ArtifactStyle::Poster, Some(Genre::Epic))
            .await
            .unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "aGVsbG8=");
        assert_eq!(provider.content_calls(), 0);

        let (model, req) = &provider.image_requests()[0];
        assert_eq!(model, "imagen-4.0-generate-001");
        assert_eq!(req.parameters.sample_count, 1);
        assert_eq!(req.parameters.aspect_ratio, "3:4");
        assert_eq!(req.parameters.output_options.mime_type, "image/jpeg");
        assert!(req.instances[0].prompt.starts_with("A poster. high quality movie poster"));
        assert!(req.instances[0].prompt.contains("IMAX quality"));
    }

    #[tokio::test]
    async fn empty_primary_falls_back_to_inline_image() {
        let (client, provider) = client_with(ScriptedProvider::new().with_content(|_, _| {
            Ok(ScriptedProvider::inline_image_reply("image/png", "iVBO"))
        }));

        let image = client
            .generate_image("A meme", ArtifactStyle::Meme, None)
            .await
            .unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.model, "gemini-2.5-flash-image");
        assert_eq!(provider.image_calls(), 1);
        assert_eq!(provider.image_requests()[0].1.parameters.aspect_ratio, "1:1");

        let (model, req) = &provider.content_requests()[0];
        assert_eq!(model, "gemini-2.5-flash-image");
        assert_eq!(
            req.generation_config.as_ref().unwrap().response_modalities,
            Some(vec!["IMAGE".to_string()])
        );
    }

    #[tokio::test]
    async fn primary_error_falls_back() {
        let (client, provider) = client_with(
            ScriptedProvider::new()
                .with_images(|_, _| Err(status_500()))
                .with_content(|_, _| Ok(ScriptedProvider::inline_image_reply("image/png", "iVBO"))),
        );
        assert!(client.generate_image("p", ArtifactStyle::Meme, None).await.is_ok());
        assert_eq!(provider.content_calls(), 1);
    }

    #[tokio::test]
    async fn both_models_failing_is_image_generation_error() {
        let (client, provider) = client_with(
            ScriptedProvider::new()
                .with_images(|_, _| Err(status_500()))
                .with_content(|_, _| Ok(ScriptedProvider::text_reply("I cannot draw that"))),
        );
        let err = client
            .generate_image("p", ArtifactStyle::Poster, Some(Genre::Noir))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::ImageGeneration { .. }));
        assert_eq!(provider.image_calls(), 1);
        assert_eq!(provider.content_calls(), 1);
    }

    // ---- analyze_music ---

    #[tokio::test]
    async fn music_analysis_returns_text() {
        let (client, provider) = client_with(ScriptedProvider::new().with_content(|_, _| {
            Ok(ScriptedProvider::text_reply("Nietzsche aprobaría este riff."))
        }));
        let critique = client.analyze_music("Bohemian Rhapsody", None).await.unwrap();
        assert_eq!(critique, "Nietzsche aprobaría este riff.");
        assert!(provider.content_requests()[0]
            .1
            .prompt_text()
            .contains("Contexto adicional o Link: Bohemian Rhapsody"));
    }

    #[tokio::test]
    async fn music_analysis_empty_reply_uses_placeholder() {
        let (client, _) = client_with(ScriptedProvider::new().with_content(|_, _| {
            Ok(crate::genai::wire::GenerateContentResponse::default())
        }));
        assert_eq!(
            client.analyze_music("x", None).await.unwrap(),
            messages::MUSIC_EMPTY_REPLY
        );
    }

    #[tokio::test]
    async fn music_analysis_failure_is_analysis_error() {
        let (client, _) = client_with(ScriptedProvider::new().with_content(|_, _| Err(ProviderError::Timeout)));
        assert!(matches!(
            client.analyze_music("x", None).await,
            Err(GenerationError::Analysis(_))
        ));
    }

    // ---- chat ---

    #[tokio::test]
    async fn chat_replays_history_with_persona() {
        let (client, provider) = client_with(
            ScriptedProvider::new().with_content(|_, _| Ok(ScriptedProvider::text_reply("Mirá, che..."))),
        );
        let mut session = client.create_chat_session();

        client.send_message(&mut session, "hola").await.unwrap();
        client.send_message(&mut session, "¿y la libertad?").await.unwrap();

        let requests = provider.content_requests();
        let last = &requests[1].1;
        assert_eq!(last.contents.len(), 3);
        assert!(last
            .system_instruction
            .as_ref()
            .unwrap()
            .parts[0]
            .text
            .as_deref()
            .unwrap()
            .contains("PROFESOR DE FILOSOFÍA"));
        assert_eq!(session.history().len(), 4);
    }

    #[tokio::test]
    async fn chat_failure_leaves_history_untouched() {
        let (client, _) = client_with(ScriptedProvider::new().with_content(|_, _| Err(ProviderError::Timeout)));
        let mut session = client.create_chat_session();
        assert!(matches!(
            client.send_message(&mut session, "hola").await,
            Err(GenerationError::ChatSend(_))
        ));
        assert!(session.history().is_empty());
    }
}
