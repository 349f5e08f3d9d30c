//! Snapbook: take photos with a camera and browse them in a local gallery.

mod app;
mod app_command;
mod camera_source;
mod config;
mod error;
mod input_handler;
mod render;
mod screen;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    input_handler::InputHandler,
    screen::Screen,
};

use crate::{camera_source::AppCamera, config::Config};

use std::{sync::Arc, time::Duration};

use snapbook_core::{
    CaptureServices, CaptureSettings, CollectingNotices, DirectoryExporter, FileSlot,
    SlotPhotoStore, SystemClock,
};
use tokio::{
    io::BufReader,
    sync::{mpsc, watch},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "snapbook=info,snapbook_core=info";

/// Application entry point.
fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Logs go to stderr; stdout carries the screens.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let (app, input_handler, shutdown_rx) = match build_app(&config) {
        Ok(parts) => parts,
        Err(e) => {
            error!("Failed to initialise: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        tokio::join!(
            async {
                let stdin = BufReader::new(tokio::io::stdin());
                if let Err(e) = input_handler.run(stdin, shutdown_rx).await {
                    error!(error = ?e, "Input handler error");
                }
            },
            async {
                if let Err(e) = app.run().await {
                    error!(error = ?e, "App error");
                }
            }
        );
    });

    // A pending stdin read would otherwise hold the runtime open.
    rt.shutdown_timeout(Duration::from_secs(1));
}

/// Wire the configured camera, file-backed store and exporter into an app.
fn build_app(config: &Config) -> AppResult<(App, InputHandler, watch::Receiver<bool>)> {
    let data_dir = config.data_dir()?;
    let download_dir = config.download_dir()?;

    let slot = FileSlot::with_capacity(&data_dir, config.storage.capacity_bytes)?;
    let camera = AppCamera::from_config(&config.camera)?;
    let notices = Arc::new(CollectingNotices::new());

    let services = CaptureServices {
        store: Arc::new(SlotPhotoStore::new(slot)),
        notices: notices.clone(),
        clock: Arc::new(SystemClock),
        exporter: Arc::new(DirectoryExporter::new(&download_dir)),
    };

    let settings = CaptureSettings {
        facing: config.camera.facing,
        timestamp_format: config.display.timestamp_format.clone(),
    };

    info!(
        data_dir = ?data_dir,
        download_dir = ?download_dir,
        capacity_bytes = config.storage.capacity_bytes,
        "Storage ready"
    );

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let app = App {
        camera,
        services,
        notices,
        settings,
        command_rx,
        shutdown_tx,
        output: Box::new(std::io::stdout()),
    };

    Ok((app, InputHandler::new(command_tx), shutdown_rx))
}
