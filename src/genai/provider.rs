//! The provider seam.
//!
//! [`Provider`] is the raw HTTP boundary: one method per endpoint, no prompt
//! logic.  [`GeminiProvider`](super::GeminiProvider) is the production
//! implementation; `ScriptedProvider` (test-only) answers from closures and
//! counts calls.

use async_trait::async_trait;

use super::error::ProviderError;
use super::wire::{GenerateContentRequest, GenerateContentResponse, PredictRequest, PredictResponse};

/// Object-safe async interface to a generative-AI provider.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Multimodal content generation (text, JSON, or inline images).
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError>;

    /// Dedicated image synthesis.
    async fn predict_images(
        &self,
        model: &str,
        request: &PredictRequest,
    ) -> Result<PredictResponse, ProviderError>;
}

// ---------------------------------------------------------------------------
// ScriptedProvider  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use scripted::ScriptedProvider;

#[cfg(test)]
mod scripted {
    use std::sync::Mutex;

    use super::*;
    use crate::genai::wire::{Blob, Candidate, Content, Part, Prediction};

    type ContentFn = dyn Fn(&str, &GenerateContentRequest) -> Result<GenerateContentResponse, ProviderError>
        + Send
        + Sync;
    type ImagesFn =
        dyn Fn(&str, &PredictRequest) -> Result<PredictResponse, ProviderError> + Send + Sync;

    /// Test double answering from closures.  Every request is recorded.
    pub struct ScriptedProvider {
        content: Box<ContentFn>,
        images: Box<ImagesFn>,
        content_log: Mutex<Vec<(String, GenerateContentRequest)>>,
        image_log: Mutex<Vec<(String, PredictRequest)>>,
    }

    impl ScriptedProvider {
        /// Text replies "ok"; image synthesis returns no images.
        pub fn new() -> Self {
            Self {
                content: Box::new(|_, _| Ok(Self::text_reply("ok"))),
                images: Box::new(|_, _| Ok(PredictResponse::default())),
                content_log: Mutex::new(Vec::new()),
                image_log: Mutex::new(Vec::new()),
            }
        }

        pub fn with_content<F>(mut self, f: F) -> Self
        where
            F: Fn(&str, &GenerateContentRequest) -> Result<GenerateContentResponse, ProviderError>
                + Send
                + Sync
                + 'static,
        {
            self.content = Box::new(f);
            self
        }

        pub fn with_images<F>(mut self, f: F) -> Self
        where
            F: Fn(&str, &PredictRequest) -> Result<PredictResponse, ProviderError>
                + Send
                + Sync
                + 'static,
        {
            self.images = Box::new(f);
            self
        }

        pub fn content_calls(&self) -> usize {
            self.content_log.lock().unwrap().len()
        }

        pub fn image_calls(&self) -> usize {
            self.image_log.lock().unwrap().len()
        }

        pub fn content_requests(&self) -> Vec<(String, GenerateContentRequest)> {
            self.content_log.lock().unwrap().clone()
        }

        pub fn image_requests(&self) -> Vec<(String, PredictRequest)> {
            self.image_log.lock().unwrap().clone()
        }

        pub fn text_reply(text: &str) -> GenerateContentResponse {
            GenerateContentResponse {
                candidates: vec![Candidate {
                    content: Some(Content::model(text)),
                }],
            }
        }

        pub fn inline_image_reply(mime_type: &str, data: &str) -> GenerateContentResponse {
            GenerateContentResponse {
                candidates: vec![Candidate {
                    content: Some(Content {
                        role: Some("model".into()),
                        parts: vec![Part {
                            text: None,
                            inline_data: Some(Blob {
                                mime_type: mime_type.into(),
                                data: data.into(),
                            }),
                        }],
                    }),
                }],
            }
        }

        pub fn prediction(data: &str) -> PredictResponse {
            PredictResponse {
                predictions: vec![Prediction {
                    bytes_base64_encoded: Some(data.into()),
                    mime_type: Some("image/jpeg".into()),
                }],
            }
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn generate_content(
            &self,
            model: &str,
            request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, ProviderError> {
            self.content_log
                .lock()
                .unwrap()
                .push((model.to_string(), request.clone()));
            (self.content)(model, request)
        }

        async fn predict_images(
            &self,
            model: &str,
            request: &PredictRequest,
        ) -> Result<PredictResponse, ProviderError> {
            self.image_log
                .lock()
                .unwrap()
                .push((model.to_string(), request.clone()));
            (self.images)(model, request)
        }
    }
}
