//! Cross-platform application paths using the `dirs` crate.
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\cinema-socrates\
//!   macOS:   ~/Library/Application Support/cinema-socrates/
//!   Linux:   ~/.config/cinema-socrates/
//!
//! Downloads go to the user's download directory unless overridden in
//! `[export] download_dir`.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Default target for saved images.
    pub downloads_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "cinema-socrates";

    /// Falls back to the current directory when the platform has no
    /// standard location.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let downloads_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        let settings_file = config_dir.join("settings.toml");

        Self {
            config_dir,
            settings_file,
            downloads_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_live_under_app_dir() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.ends_with("cinema-socrates"));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths.settings_file.starts_with(&paths.config_dir));
        assert!(paths.downloads_dir.to_str().is_some_and(|s| !s.is_empty()));
    }
}
