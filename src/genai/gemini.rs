//! Google Gemini REST provider.
//!
//! All connection details (`base_url`, credential, timeout) come from
//! [`ProviderConfig`]; nothing is hardcoded here.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ProviderConfig;

use super::error::ProviderError;
use super::provider::Provider;
use super::wire::{GenerateContentRequest, GenerateContentResponse, PredictRequest, PredictResponse};

/// Calls the Gemini `v1beta` REST API with `reqwest`.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiProvider {
    /// Build a provider from configuration.
    ///
    /// A missing API key is not an error here; every call then fails with
    /// [`ProviderError::MissingApiKey`].
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{model}:{method}", self.base_url)
    }

    async fn post<B, R>(&self, url: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingApiKey)?;

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("provider: {url} answered HTTP {}", status.as_u16());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

/// HTTP client with a per-request timeout.  Falls back to reqwest's
/// defaults (no timeout) if the builder fails.
fn http_client(timeout_secs: u64) -> reqwest::Client {
    match reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            log::warn!("provider: cannot build HTTP client ({e}); requests will have no timeout");
            reqwest::Client::new()
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = self.endpoint(model, "generateContent");
        log::debug!("provider: generateContent on {model}");
        self.post(&url, request).await
    }

    async fn predict_images(
        &self,
        model: &str,
        request: &PredictRequest,
    ) -> Result<PredictResponse, ProviderError> {
        let url = self.endpoint(model, "predict");
        log::debug!("provider: predict on {model}");
        self.post(&url, request).await
    }
}
