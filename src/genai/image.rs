//! Generated image reference.

use crate::media::{MediaError, MediaPayload};

/// A displayable encoded image returned by one of the image models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    /// Base64 image bytes.
    pub data: String,
    /// Model that produced the image.
    pub model: String,
}

impl GeneratedImage {
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, MediaError> {
        MediaPayload {
            data: self.data.clone(),
            mime_type: self.mime_type.clone(),
            name: String::new(),
        }
        .decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_and_decode() {
        let img = GeneratedImage {
            mime_type: "image/jpeg".into(),
            data: "aGVsbG8=".into(),
            model: "imagen".into(),
        };
        assert_eq!(img.to_data_url(), "data:image/jpeg;base64,aGVsbG8=");
        assert_eq!(img.decode().unwrap(), b"hello");
    }
}
