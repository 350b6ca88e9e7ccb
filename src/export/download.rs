//! Saving a generated image to disk.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use crate::genai::GeneratedImage;

/// `cinema-socrates-<unix-millis>.jpg`
pub fn download_filename(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("cinema-socrates-{millis}.jpg")
}

/// Decode `image` and write it into `dir`, creating the directory if needed.
/// Returns the written path.
pub fn save_image(image: &GeneratedImage, dir: &Path) -> Result<PathBuf> {
    let bytes = image.decode().context("generated image is not valid base64")?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create {}", dir.display()))?;
    let path = dir.join(download_filename(SystemTime::now()));
    std::fs::write(&path, bytes).with_context(|| format!("cannot write {}", path.display()))?;

    log::info!("download: saved {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn image() -> GeneratedImage {
        GeneratedImage {
            mime_type: "image/jpeg".into(),
            data: "/9j/4AAQ".into(),
            model: "imagen-4.0-generate-001".into(),
        }
    }

    #[test]
    fn filename_uses_unix_millis() {
        let at = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        assert_eq!(download_filename(at), "cinema-socrates-1700000000123.jpg");
    }

    #[test]
    fn saves_decoded_bytes() {
        let dir = tempdir().expect("temp dir");
        let target = dir.path().join("posters");

        let path = save_image(&image(), &target).expect("save");

        assert!(path.starts_with(&target));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("cinema-socrates-") && name.ends_with(".jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);
    }

    #[test]
    fn invalid_base64_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let mut bad = image();
        bad.data = "not base64!".into();
        assert!(save_image(&bad, dir.path()).is_err());
    }
}
