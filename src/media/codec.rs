//! Base64 transport encoding for media payloads.

use std::io::Read;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

use crate::messages;

// ---------------------------------------------------------------------------
// MediaError
// ---------------------------------------------------------------------------

/// Errors raised while reading or encoding a media source.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The underlying platform read failed.
    #[error("failed to read media source: {0}")]
    Read(#[from] std::io::Error),

    /// A payload could not be decoded back to bytes.
    #[error("payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The file is larger than the accepted limit for its kind.
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
}

impl MediaError {
    /// Localised message for the error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            MediaError::TooLarge { .. } => messages::VIDEO_TOO_LARGE,
            MediaError::Read(_) | MediaError::Decode(_) => messages::FILE_READ_FAILED,
        }
    }
}

// ---------------------------------------------------------------------------
// MediaPayload
// ---------------------------------------------------------------------------

/// An encoded media attachment: `{encoded bytes, media-type tag, display name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    /// Standard-alphabet base64 of the raw bytes, without any data-URL header.
    pub data: String,
    /// Media type, e.g. `audio/wav` or `application/pdf`.
    pub mime_type: String,
    /// Name shown to the user (usually the file name).
    pub name: String,
}

impl MediaPayload {
    pub fn from_bytes(
        bytes: &[u8],
        mime_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            data: encode(bytes),
            mime_type: mime_type.into(),
            name: name.into(),
        }
    }

    /// Read everything from `reader` and encode it.
    ///
    /// # Errors
    ///
    /// [`MediaError::Read`] when the reader fails.
    pub fn from_reader<R: Read>(
        mut reader: R,
        mime_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, MediaError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::from_bytes(&bytes, mime_type, name))
    }

    /// Read and encode a file, guessing its media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, MediaError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(&bytes, mime_for_path(path), name))
    }

    /// Build a payload from a `data:<mime>;base64,<data>` URL.
    ///
    /// A string without a header is taken as bare base64 with the given
    /// fallback media type.
    pub fn from_data_url(url: &str, fallback_mime: &str, name: impl Into<String>) -> Self {
        let mime_type = url
            .strip_prefix("data:")
            .and_then(|rest| rest.split([';', ',']).next())
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback_mime)
            .to_string();

        Self {
            data: strip_data_url_header(url).to_string(),
            mime_type,
            name: name.into(),
        }
    }

    /// Decode the transport string back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, MediaError> {
        Ok(BASE64.decode(self.data.as_bytes())?)
    }

    /// `data:` URL suitable for previews.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Encode raw bytes as standard base64.
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Drop a leading `data:…,` header, returning the bare payload.
///
/// Strings without the header are returned unchanged.
pub fn strip_data_url_header(value: &str) -> &str {
    if value.starts_with("data:") {
        if let Some((_, payload)) = value.split_once(',') {
            return payload;
        }
    }
    value
}

/// Media type for `path`, guessed from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "webm" => "video/webm",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
