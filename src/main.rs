//! Application entry point for Cinema Sócrates.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (defaults on first run) and pick up the
//!    API key from the environment.
//! 3. Create the tokio runtime that runs every provider call.
//! 4. Build one [`GenerationClient`] and hand it to the three panels.
//! 5. Run [`eframe::run_native`]; blocks until the window is closed.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use eframe::egui;

use cinema_socrates::{
    app::CinemaApp,
    config::AppConfig,
    genai::GenerationClient,
    pipeline::{ChatPanel, ErrorBanner, MusicPanel, PosterPipeline},
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let viewport = egui::ViewportBuilder::default()
        .with_title("Cinema Sócrates")
        .with_inner_size([width, height])
        .with_min_inner_size([480.0, 420.0]);

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cinema Sócrates starting up");

    // 2. Configuration
    let config = AppConfig::load()
        .unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        })
        .with_env_credentials();

    if config.provider.api_key.is_none() {
        log::warn!("GEMINI_API_KEY is not set; every generation request will fail");
    }

    // 3. Tokio runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Client and panels
    let client = Arc::new(GenerationClient::from_config(&config.provider));
    log::info!(
        "models: text={} image={} fallback={}",
        client.models().text,
        client.models().image,
        client.models().fallback_image
    );

    let banner = ErrorBanner::new();
    let poster = PosterPipeline::new(Arc::clone(&client), banner.clone());
    let music = MusicPanel::new(Arc::clone(&client), banner.clone());
    let chat = ChatPanel::new(Arc::clone(&client), banner.clone());

    // 5. Window
    let app = CinemaApp::new(
        poster,
        music,
        chat,
        banner,
        runtime.handle().clone(),
        config.clone(),
    );

    eframe::run_native(
        "Cinema Sócrates",
        native_options(&config),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("window closed with an error: {e}"))
}
