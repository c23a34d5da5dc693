//! Crew Deck - Main Entry Point
//!
//! Desktop dashboard for crew rostering operations.

use std::sync::Arc;

use anyhow::Context;
use crewdeck::{
    config::{self, AppConfig, AppState},
    frontend::CrewDeckApp,
    source::{HttpDataSource, InMemoryDataSource, RosterApi},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Log to stderr and, when the data directory is available, to a daily file
    let (file_layer, _log_guard) = match config::log_dir() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "crewdeck.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,crewdeck=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    tracing::info!("Starting Crew Deck");

    let config = AppConfig::load_or_default();
    let app_state = AppState::load_or_default();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("crewdeck-io")
        .build()
        .context("Failed to start the async runtime")?;

    let api: Arc<dyn RosterApi> = if config.ui.offline_demo {
        tracing::info!("Using the offline demo data set");
        Arc::new(InMemoryDataSource::demo())
    } else {
        tracing::info!("Using API at {}", config.api.base_url);
        Arc::new(HttpDataSource::new(&config.api).context("Failed to create the HTTP client")?)
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 780.0])
            .with_min_inner_size([900.0, 560.0])
            .with_title("Crew Deck"),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    let dark_mode = config.ui.dark_mode;
    eframe::run_native(
        "Crew Deck",
        native_options,
        Box::new(move |cc| {
            let mut style = (*cc.egui_ctx.style()).clone();
            style.visuals.window_shadow.offset = [0, 0];
            cc.egui_ctx.set_style(style);
            if dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }

            Ok(Box::new(CrewDeckApp::new(cc, api, handle, config, app_state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run the dashboard: {e}"))?;

    tracing::info!("Shutting down...");
    runtime.shutdown_timeout(std::time::Duration::from_secs(2));
    Ok(())
}
