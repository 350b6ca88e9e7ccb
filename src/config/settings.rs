//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML and shared across tasks.  The
//! API key is the one exception to persistence: it is read from the
//! environment and never written to disk.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::media::DEFAULT_MAX_VIDEO_BYTES;

/// Environment variables consulted for the provider credential, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

/// Connection and model settings for the generative-AI provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the REST API, without the `/v1beta` suffix.
    pub base_url: String,
    /// Credential, filled from the environment at startup.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Transcription, concepts, music analysis and chat.
    pub text_model: String,
    /// Primary image synthesis model.
    pub image_model: String,
    /// Multimodal model used when the primary image model yields nothing.
    pub fallback_image_model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            text_model: "gemini-2.5-flash".into(),
            image_model: "imagen-4.0-generate-001".into(),
            fallback_image_model: "gemini-2.5-flash-image".into(),
            timeout_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// InputConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Largest accepted video upload in mebibytes.
    pub max_video_mb: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_video_mb: DEFAULT_MAX_VIDEO_BYTES / (1024 * 1024),
        }
    }
}

impl InputConfig {
    pub fn max_video_bytes(&self) -> u64 {
        self.max_video_mb.saturating_mul(1024 * 1024)
    }
}

// ---------------------------------------------------------------------------
// ExportConfig
// ---------------------------------------------------------------------------

/// Download and share settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where downloaded images go.  `None` uses the platform download dir.
    pub download_dir: Option<PathBuf>,
    /// Link attached to shared posters.
    pub share_url: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            share_url: crate::export::DEFAULT_SHARE_URL.into(),
        }
    }
}

impl ExportConfig {
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().downloads_dir)
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial window size in logical pixels.
    pub window_size: (f32, f32),
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (960.0, 760.0),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use cinema_socrates::config::AppConfig;
///
/// // Defaults when the file is missing, then the key from the environment.
/// let config = AppConfig::load().unwrap().with_env_credentials();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub input: InputConfig,
    pub export: ExportConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Creates parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Fill the provider credential from the process environment.
    pub fn with_env_credentials(self) -> Self {
        self.with_credentials_from(|name| std::env::var(name).ok())
    }

    /// Fill the provider credential from `lookup`, trying each of
    /// [`API_KEY_VARS`] in turn.  Blank values are ignored.
    pub fn with_credentials_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.provider.api_key = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty());
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
