//! Application entry point — ShelfLife desktop client.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime that runs all network work.
//! 4. Build the backend client ([`ApiClient`]) and audio output
//!    ([`RodioPlayer`]) from config.
//! 5. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use shelflife_client::{
    api::{ApiClient, ShelfLifeApi},
    app::ShelfLifeApp,
    config::AppConfig,
    voice::{AudioPlayer, RodioPlayer},
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let viewport = egui::ViewportBuilder::default()
        .with_title("ShelfLife AI")
        .with_inner_size([width, height])
        .with_min_inner_size([640.0, 480.0]);

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("ShelfLife client starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Backend client + audio output
    let api = ApiClient::from_config(&config.api);
    log::info!("Prediction backend: {}", api.base_url());
    let api: Arc<dyn ShelfLifeApi> = Arc::new(api);
    let player: Arc<dyn AudioPlayer> = Arc::new(RodioPlayer::new(config.voice.volume));

    // 5. Build the egui app and run it (blocks until the window is closed)
    let app = ShelfLifeApp::new(api, player, rt.handle().clone(), &config);
    let options = native_options(&config);

    eframe::run_native(
        "ShelfLife",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
