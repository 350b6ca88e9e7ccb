//! Sharing a finished poster.
//!
//! Desktop platforms have no native share sheet, so the default target puts
//! the share text on the clipboard.  Other targets plug in through
//! [`ShareTarget`].

use thiserror::Error;

use crate::genai::concept::FALLBACK_TITLE;
use crate::messages;
use crate::pipeline::GenerationResult;

/// Link used when the configured one is not an http(s) URL.
pub const DEFAULT_SHARE_URL: &str = "https://www.instagram.com/elprofedefilosofia";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareRequest {
    /// Share payload for `result`; memes and blank titles use the app name.
    pub fn for_result(result: &GenerationResult, page_url: &str) -> Self {
        let title = result
            .movie_metadata
            .as_ref()
            .map(|m| m.title.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or(FALLBACK_TITLE)
            .to_string();

        Self {
            text: format!("Mira esta película filosófica generada por IA: {title}"),
            title,
            url: share_url(page_url).to_string(),
        }
    }

    /// Single block of text for clipboard-style targets.
    pub fn to_clipboard_text(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.text, self.url)
    }
}

/// `page_url` if it is http(s), else [`DEFAULT_SHARE_URL`].
pub fn share_url(page_url: &str) -> &str {
    let url = page_url.trim();
    if url.starts_with("https://") || url.starts_with("http://") {
        url
    } else {
        DEFAULT_SHARE_URL
    }
}

#[derive(Debug, Error)]
pub enum ShareError {
    /// The user backed out; not worth an alert.
    #[error("share cancelled")]
    Cancelled,

    #[error("no share target available")]
    Unavailable,

    #[error("share failed: {0}")]
    Failed(String),
}

impl ShareError {
    /// Alert text, `None` for a cancelled share.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            ShareError::Cancelled => None,
            ShareError::Unavailable => Some(messages::SHARE_UNAVAILABLE),
            ShareError::Failed(_) => Some(messages::SHARE_FAILED),
        }
    }
}

pub trait ShareTarget {
    fn share(&mut self, request: &ShareRequest) -> Result<(), ShareError>;
}

/// Copies the share text to the system clipboard.
///
/// Opens a fresh `arboard::Clipboard` per share; handles are not `Send` on
/// every platform.
#[derive(Debug, Default)]
pub struct ClipboardShare;

impl ShareTarget for ClipboardShare {
    fn share(&mut self, request: &ShareRequest) -> Result<(), ShareError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| {
            log::warn!("share: clipboard unavailable: {e}");
            ShareError::Unavailable
        })?;
        clipboard
            .set_text(request.to_clipboard_text())
            .map_err(|e| ShareError::Failed(e.to_string()))?;
        log::info!("share: copied \"{}\" to clipboard", request.title);
        Ok(())
    }
}

/// Share `result` through `target`, returning the alert to show, if any.
pub fn share_result(
    target: &mut dyn ShareTarget,
    result: &GenerationResult,
    page_url: &str,
) -> Option<&'static str> {
    let request = ShareRequest::for_result(result, page_url);
    match target.share(&request) {
        Ok(()) => None,
        Err(e) => {
            log::warn!("share: {e}");
            e.user_message()
        }
    }
}
