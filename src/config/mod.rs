//! Configuration module for Cinema Sócrates.
//!
//! Provides `AppConfig` (top-level settings), one sub-config per concern,
//! `AppPaths` for cross-platform directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, ExportConfig, InputConfig, ProviderConfig, UiConfig};
