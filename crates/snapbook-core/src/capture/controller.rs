//! Capture screen controller.
//!
//! Owns the stream lifecycle `Idle -> Streaming -> Frozen -> Streaming -> ...`
//! and the freeze / encode / persist workflow. Every collaborator is injected:
//! the camera and raster surface as generic capabilities, the store, notice
//! sink, clock and exporter as shared trait objects.

use crate::{
    CoreResult,
    capture::{
        CaptureDevice, Clock, DEFAULT_TIMESTAMP_FORMAT, FacingMode, FileExporter, Notice,
        NoticeSink, RasterSurface, StreamConstraints, StreamGuard, VideoStream, format_timestamp,
        render_mirrored,
    },
    photo::PhotoRecord,
    store::PhotoStore,
};

use std::{path::PathBuf, sync::Arc};

use tracing::{debug, error, info, instrument, warn};

/// Externally visible capture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No stream. Initial state, and where acquisition failures land.
    Idle,
    /// Live stream bound to the video surface.
    Streaming,
    /// A frame was captured and is shown instead of the live preview.
    Frozen,
}

/// Whether a frozen photo made it into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    /// Appended to the store.
    Persisted,
    /// The store rejected the write (e.g. quota exceeded).
    Unpersisted {
        /// Description of the store failure.
        reason: String,
    },
}

impl PersistStatus {
    /// Whether the record reached the store.
    pub fn is_persisted(&self) -> bool {
        matches!(self, PersistStatus::Persisted)
    }
}

/// The frame held while `Frozen`.
#[derive(Debug, Clone)]
pub struct FrozenPhoto {
    /// Record built from the frame (stored unless `status` says otherwise).
    pub record: PhotoRecord,
    /// Encoded PNG, used for downloads.
    pub png: Vec<u8>,
    /// Persistence outcome.
    pub status: PersistStatus,
}

/// Why `capture` did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not in `Streaming`.
    NotStreaming,
    /// The stream is bound but no track delivers frames.
    MissingVideoSurface,
    /// No raster surface mounted.
    MissingRasterSurface,
    /// The stream reports no resolution yet.
    VideoNotReady,
    /// Reading the current frame failed.
    FrameUnavailable,
    /// PNG encoding failed.
    EncodingFailed,
}

/// Result of [`CaptureController::capture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A frame was frozen. `status` reports whether it was stored.
    Captured {
        /// The new record.
        record: PhotoRecord,
        /// Persistence outcome.
        status: PersistStatus,
    },
    /// Nothing happened; a diagnostic was logged.
    Skipped(SkipReason),
}

/// Capture behaviour settings.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    /// Preferred camera facing.
    pub facing: FacingMode,
    /// strftime pattern for `captured_at`.
    pub timestamp_format: String,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            facing: FacingMode::Environment,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Shared collaborators of the capture screen.
#[derive(Clone)]
pub struct CaptureServices {
    /// Gallery persistence.
    pub store: Arc<dyn PhotoStore>,
    /// Where user-facing notices go.
    pub notices: Arc<dyn NoticeSink>,
    /// Source of capture timestamps and ids.
    pub clock: Arc<dyn Clock>,
    /// Target of downloads.
    pub exporter: Arc<dyn FileExporter>,
}

enum Session<V: VideoStream> {
    Idle,
    Streaming(StreamGuard<V>),
    Frozen(FrozenPhoto),
}

/// Drives one capture screen.
///
/// Dropping the controller stops every track of an active stream.
pub struct CaptureController<D: CaptureDevice, R: RasterSurface> {
    device: D,
    raster: Option<R>,
    services: CaptureServices,
    settings: CaptureSettings,
    session: Session<D::Stream>,
}

impl<D: CaptureDevice, R: RasterSurface> CaptureController<D, R> {
    /// New controller in `Idle` with no raster surface mounted.
    pub fn new(device: D, services: CaptureServices, settings: CaptureSettings) -> Self {
        info!(device = device.label(), "CaptureController initialized");

        Self {
            device,
            raster: None,
            services,
            settings,
            session: Session::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CaptureState {
        match self.session {
            Session::Idle => CaptureState::Idle,
            Session::Streaming(_) => CaptureState::Streaming,
            Session::Frozen(_) => CaptureState::Frozen,
        }
    }

    /// Frozen photo, if any.
    pub fn frozen(&self) -> Option<&FrozenPhoto> {
        match &self.session {
            Session::Frozen(frozen) => Some(frozen),
            _ => None,
        }
    }

    /// Number of photos currently in the store.
    pub fn stored_count(&self) -> usize {
        self.services.store.load().len()
    }

    /// The camera this controller opens streams from.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Attach the off-screen raster surface.
    pub fn mount_raster(&mut self, raster: R) {
        self.raster = Some(raster);
    }

    /// Detach the raster surface, returning it.
    pub fn unmount_raster(&mut self) -> Option<R> {
        self.raster.take()
    }

    /// Acquire a video-only stream, preferring the configured facing.
    ///
    /// On failure a blocking [`Notice::CameraUnavailable`] is raised, the
    /// controller stays `Idle` and the device error is returned. Already
    /// streaming is a no-op; from `Frozen` the frozen image is discarded.
    #[instrument(skip(self))]
    pub async fn start_capture(&mut self) -> CoreResult<()> {
        if let Session::Streaming(guard) = &self.session {
            debug!(session_id = %guard.session_id(), "Already streaming");
            return Ok(());
        }

        self.session = Session::Idle;

        let constraints = StreamConstraints::video_only(self.settings.facing);
        match self.device.open(constraints).await {
            Ok(stream) => {
                let guard = StreamGuard::new(stream);
                let (width, height) = guard.stream().native_resolution();
                info!(
                    session_id = %guard.session_id(),
                    width,
                    height,
                    "Camera streaming"
                );
                self.session = Session::Streaming(guard);
                Ok(())
            }
            Err(e) => {
                error!(error = ?e, "Failed to start camera");
                self.services.notices.notify(Notice::camera_unavailable());
                Err(e)
            }
        }
    }

    /// Freeze the current frame, encode it and append it to the store.
    ///
    /// Never fails: precondition violations and capture errors are logged
    /// and reported as [`CaptureOutcome::Skipped`]. A store failure still
    /// freezes the frame, flagged [`PersistStatus::Unpersisted`].
    #[instrument(skip(self))]
    pub fn capture(&mut self) -> CaptureOutcome {
        let state = self.state();
        let Session::Streaming(guard) = &mut self.session else {
            debug!(?state, "Capture ignored outside Streaming");
            return CaptureOutcome::Skipped(SkipReason::NotStreaming);
        };

        if !guard.stream().is_live() {
            error!("Video surface not available");
            return CaptureOutcome::Skipped(SkipReason::MissingVideoSurface);
        }

        let Some(raster) = self.raster.as_mut() else {
            error!("Raster surface not mounted");
            return CaptureOutcome::Skipped(SkipReason::MissingRasterSurface);
        };

        let (width, height) = guard.stream().native_resolution();
        if width == 0 || height == 0 {
            warn!("Video has no frame yet");
            return CaptureOutcome::Skipped(SkipReason::VideoNotReady);
        }

        let frame = match guard.stream_mut().read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = ?e, "Failed to read frame");
                return CaptureOutcome::Skipped(SkipReason::FrameUnavailable);
            }
        };

        let png = match render_mirrored(raster, &frame, width, height) {
            Ok(png) => png,
            Err(e) => {
                error!(error = ?e, "Failed to encode frame");
                return CaptureOutcome::Skipped(SkipReason::EncodingFailed);
            }
        };

        let session_id = guard.session_id();
        let now = self.services.clock.now();
        let existing = self.services.store.load();
        let id = existing.next_id(now.timestamp_millis());
        let captured_at = format_timestamp(&now, &self.settings.timestamp_format);
        let record = PhotoRecord::from_png(id, &png, captured_at);

        let status = match self.services.store.append(record.clone()) {
            Ok(()) => {
                self.services.notices.notify(Notice::PhotoSaved {
                    total: existing.len() + 1,
                });
                PersistStatus::Persisted
            }
            Err(e) => {
                error!(error = ?e, id, "Photo captured but not saved");
                self.services.notices.notify(Notice::photo_not_saved());
                PersistStatus::Unpersisted {
                    reason: e.to_string(),
                }
            }
        };

        info!(
            session_id = %session_id,
            id,
            width,
            height,
            png_bytes = png.len(),
            persisted = status.is_persisted(),
            "Photo captured"
        );

        // Replacing the session drops the guard, releasing the camera while
        // the frozen image is shown.
        self.session = Session::Frozen(FrozenPhoto {
            record: record.clone(),
            png,
            status: status.clone(),
        });

        CaptureOutcome::Captured { record, status }
    }

    /// Discard the frozen photo and start streaming again.
    ///
    /// Ignored outside `Frozen`.
    #[instrument(skip(self))]
    pub async fn retake(&mut self) -> CoreResult<()> {
        if !matches!(self.session, Session::Frozen(_)) {
            debug!(state = ?self.state(), "Retake ignored outside Frozen");
            return Ok(());
        }

        self.session = Session::Idle;
        self.start_capture().await
    }

    /// Export the frozen PNG as `photo-<timestamp>.png`.
    ///
    /// Returns `Ok(None)` outside `Frozen`. No state change, no store access.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn download(&self) -> CoreResult<Option<PathBuf>> {
        let Session::Frozen(frozen) = &self.session else {
            debug!(state = ?self.state(), "Download ignored outside Frozen");
            return Ok(None);
        };

        let filename = format!("photo-{}.png", self.services.clock.now().timestamp_millis());
        let path = self.services.exporter.export(&filename, &frozen.png)?;

        Ok(Some(path))
    }

    /// Tear down: stop every track of an active stream and return to `Idle`.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        if let Session::Streaming(mut guard) = std::mem::replace(&mut self.session, Session::Idle)
        {
            let stopped = guard.stop_all();
            debug!(stopped, "Capture controller shut down");
        }
    }
}
