use crate::{App, AppCommand, camera_source::AppCamera};

use std::{
    io::Write,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::{Local, TimeZone};
use snapbook_core::{
    CaptureServices, CaptureSettings, CollectingNotices, DirectoryExporter, FixedClock,
    MemorySlot, PatternCamera, SlotPhotoStore,
};
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

/// Output sink whose contents stay readable after the app consumed it.
#[derive(Clone, Default)]
pub(crate) struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Unique scratch directory under the system temp dir.
pub(crate) fn scratch_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("snapbook-app-{}-{}", label, Uuid::new_v4()))
}

/// An app over a pattern camera and an in-memory store, with handles kept
/// for assertions.
pub(crate) struct AppHarness {
    pub camera: PatternCamera,
    pub store: Arc<SlotPhotoStore<MemorySlot>>,
    pub output: SharedOutput,
    pub downloads: PathBuf,
    pub command_tx: mpsc::Sender<AppCommand>,
    pub shutdown_rx: watch::Receiver<bool>,
}

impl AppHarness {
    pub fn build() -> (Self, App) {
        let camera = PatternCamera::new(16, 8);
        let store = Arc::new(SlotPhotoStore::new(MemorySlot::new()));
        let notices = Arc::new(CollectingNotices::new());
        let clock = Arc::new(FixedClock::new(
            Local.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        ));
        let downloads = scratch_dir("downloads");
        let output = SharedOutput::default();

        let services = CaptureServices {
            store: store.clone(),
            notices: notices.clone(),
            clock,
            exporter: Arc::new(DirectoryExporter::new(&downloads)),
        };

        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let app = App {
            camera: AppCamera::Pattern(camera.clone()),
            services,
            notices,
            settings: CaptureSettings::default(),
            command_rx,
            shutdown_tx,
            output: Box::new(output.clone()),
        };

        let harness = Self {
            camera,
            store,
            output,
            downloads,
            command_tx,
            shutdown_rx,
        };

        (harness, app)
    }

    /// Queue `commands` followed by `quit`.
    pub async fn script(&self, commands: &[AppCommand]) {
        for command in commands {
            self.command_tx.send(command.clone()).await.unwrap();
        }
        self.command_tx.send(AppCommand::Shutdown).await.unwrap();
    }
}
