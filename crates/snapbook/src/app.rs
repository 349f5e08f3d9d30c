use crate::{
    AppCommand, AppResult, Screen,
    app_command::DeleteTarget,
    camera_source::AppCamera,
    render,
};

use std::{io::Write, sync::Arc};

use snapbook_core::{
    CaptureController, CaptureDevice, CaptureServices, CaptureSettings, CollectingNotices,
    GalleryController, ImageSurface, PhotoCollection, PhotoId,
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};

type CameraScreen = CaptureController<AppCamera, ImageSurface>;

/// Controller of the screen currently shown.
enum Mounted {
    Camera(Box<CameraScreen>),
    Gallery(GalleryController),
}

/// Main application state.
///
/// Owns one screen at a time. Switching screens tears the old controller
/// down first, so the camera is released whenever the gallery is shown.
pub struct App {
    pub(crate) camera: AppCamera,
    pub(crate) services: CaptureServices,
    /// Same sink as `services.notices`, drained before each render.
    pub(crate) notices: Arc<CollectingNotices>,
    pub(crate) settings: CaptureSettings,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) output: Box<dyn Write + Send>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!(camera = %self.camera_label(), "Snapbook starting");

        let mut screen = Screen::camera();
        let mut mounted = self.mount_camera().await;
        self.show(&mounted)?;

        while let Some(cmd) = self.command_rx.recv().await {
            if cmd == AppCommand::Shutdown {
                info!("Shutdown requested");
                break;
            }
            self.handle(cmd, &mut screen, &mut mounted).await?;
        }

        self.leave(&screen, &mut mounted);

        let _ = self.shutdown_tx.send(true);
        info!("Snapbook shut down successfully");

        Ok(())
    }

    async fn handle(
        &mut self,
        command: AppCommand,
        screen: &mut Screen,
        mounted: &mut Mounted,
    ) -> AppResult<()> {
        match command {
            AppCommand::Help => self.write_line(AppCommand::USAGE),
            AppCommand::ShowCamera if !screen.is_camera() => {
                self.leave(screen, mounted);
                *screen = Screen::camera();
                *mounted = self.mount_camera().await;
                self.show(mounted)
            }
            AppCommand::ShowGallery if screen.is_camera() => {
                self.leave(screen, mounted);
                *screen = Screen::gallery();
                *mounted = Mounted::Gallery(GalleryController::mount(Arc::clone(
                    &self.services.store,
                )));
                self.show(mounted)
            }
            AppCommand::ShowCamera | AppCommand::ShowGallery => self.show(mounted),
            AppCommand::Capture | AppCommand::Retake | AppCommand::Download => match mounted {
                Mounted::Camera(controller) => self.on_camera(command, controller).await,
                Mounted::Gallery(_) => self.write_line("Switch to the camera first (`camera`)."),
            },
            AppCommand::Delete(_) | AppCommand::Clear => match mounted {
                Mounted::Gallery(gallery) => self.on_gallery(command, gallery),
                Mounted::Camera(_) => self.write_line("Open the gallery first (`gallery`)."),
            },
            AppCommand::Shutdown => Ok(()),
        }
    }

    async fn on_camera(
        &mut self,
        command: AppCommand,
        controller: &mut CameraScreen,
    ) -> AppResult<()> {
        match command {
            AppCommand::Capture => {
                let outcome = controller.capture();
                if let Some(text) = render::capture_outcome(&outcome) {
                    self.write_line(&text)?;
                }
            }
            AppCommand::Retake => {
                // The failure is already reported as a notice.
                if let Err(e) = controller.retake().await {
                    warn!(error = ?e, "Retake could not restart the camera");
                }
            }
            AppCommand::Download => match controller.download() {
                Ok(Some(path)) => self.write_line(&format!("Saved {}", path.display()))?,
                Ok(None) => self.write_line("Take a photo first.")?,
                Err(e) => {
                    error!(error = ?e, "Download failed");
                    self.write_line("The photo could not be downloaded.")?;
                }
            },
            _ => {}
        }

        self.show_camera(controller)
    }

    fn on_gallery(
        &mut self,
        command: AppCommand,
        gallery: &mut GalleryController,
    ) -> AppResult<()> {
        let result = match command {
            AppCommand::Delete(target) => match resolve_target(gallery.photos(), target) {
                Some(id) => gallery.delete_one(id),
                None => return self.write_line("No such photo."),
            },
            AppCommand::Clear => gallery.delete_all(),
            _ => Ok(()),
        };

        if let Err(e) = result {
            error!(error = ?e, "Gallery update failed");
            self.write_line("The gallery could not be updated.")?;
        }

        self.show_gallery(gallery)
    }

    async fn mount_camera(&self) -> Mounted {
        let mut controller = CaptureController::new(
            self.camera.clone(),
            self.services.clone(),
            self.settings.clone(),
        );
        controller.mount_raster(ImageSurface::new());

        // A failed start leaves the controller Idle with a notice queued.
        if let Err(e) = controller.start_capture().await {
            warn!(error = ?e, "Camera unavailable");
        }

        Mounted::Camera(Box::new(controller))
    }

    fn leave(&self, screen: &Screen, mounted: &mut Mounted) {
        if let Mounted::Camera(controller) = mounted {
            controller.shutdown();
        }

        info!(
            screen = screen.name(),
            visit_id = %screen.visit_id(),
            duration_ms = screen.entered_at().elapsed().as_millis(),
            "Screen left"
        );
    }

    fn show(&mut self, mounted: &Mounted) -> AppResult<()> {
        match mounted {
            Mounted::Camera(controller) => self.show_camera(controller),
            Mounted::Gallery(gallery) => self.show_gallery(gallery),
        }
    }

    fn show_camera(&mut self, controller: &CameraScreen) -> AppResult<()> {
        self.flush_notices()?;
        let text = render::camera_screen(
            controller.state(),
            controller.stored_count(),
            controller.frozen(),
        );
        self.write_line(&text)
    }

    fn show_gallery(&mut self, gallery: &GalleryController) -> AppResult<()> {
        self.flush_notices()?;
        self.write_line(&render::gallery_screen(&gallery.view()))
    }

    fn flush_notices(&mut self) -> AppResult<()> {
        for notice in self.notices.drain() {
            self.write_line(&render::notice(&notice))?;
        }
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> AppResult<()> {
        writeln!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    fn camera_label(&self) -> String {
        self.camera.label().to_string()
    }
}

/// Record id for a delete target, if it names a photo in `photos`.
pub(crate) fn resolve_target(photos: &PhotoCollection, target: DeleteTarget) -> Option<PhotoId> {
    match target {
        DeleteTarget::Position(position) => photos
            .get(position.checked_sub(1)?)
            .map(|record| record.id),
        DeleteTarget::Id(id) => photos.contains(id).then_some(id),
    }
}
