//! File input classification.
//!
//! Plain-text files become free text for the prompt.  Everything else
//! (documents, audio, video, images) is encoded into a [`MediaPayload`] and
//! sent to the provider as an inline part.

use std::path::Path;

use super::codec::{mime_for_path, MediaError, MediaPayload};

/// Largest accepted video upload: 20 MB.
pub const DEFAULT_MAX_VIDEO_BYTES: u64 = 20 * 1024 * 1024;

/// What a picked file turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedInput {
    /// A `.txt` file, read as UTF-8.  The caller replaces its input text and
    /// clears any attached media.
    Text { text: String, name: String },
    /// Any other file, encoded for inline transport.
    Media(MediaPayload),
}

/// Load `path` as prompt input.
///
/// Videos larger than `max_video_bytes` are rejected from their metadata
/// alone, before the content is read.
///
/// # Errors
///
/// * [`MediaError::TooLarge`]: oversized video.
/// * [`MediaError::Read`]: the file could not be read.
///
/// Invalid UTF-8 in text files is replaced with U+FFFD.
pub fn load_input(path: &Path, max_video_bytes: u64) -> Result<LoadedInput, MediaError> {
    let mime = mime_for_path(path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if mime == "text/plain" {
        let text = String::from_utf8_lossy(&std::fs::read(path)?).into_owned();
        log::debug!("input: read {} chars of text from {name}", text.chars().count());
        return Ok(LoadedInput::Text { text, name });
    }

    if mime.starts_with("video/") {
        let size = std::fs::metadata(path)?.len();
        if size > max_video_bytes {
            log::warn!("input: rejected {name} ({size} bytes > {max_video_bytes})");
            return Err(MediaError::TooLarge {
                size,
                limit: max_video_bytes,
            });
        }
    }

    let payload = MediaPayload::from_path(path)?;
    log::debug!("input: encoded {name} as {}", payload.mime_type);
    Ok(LoadedInput::Media(payload))
}
