use crate::{
    CoreError, CoreResult,
    capture::{CaptureDevice, StreamConstraints, TrackInfo, TrackState, VideoStream},
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use image::RgbaImage;
use tracing::{info, instrument};

/// Camera that serves a still image file as its only frame.
///
/// Stands in for hardware on machines without a webcam. A missing file
/// reports `NoCameraFound`, an undecodable one `DeviceError`. The file is
/// decoded on tokio's blocking pool, so `open` needs a tokio runtime.
#[derive(Debug, Clone)]
pub struct StillImageCamera {
    path: PathBuf,
    label: String,
}

impl StillImageCamera {
    /// Camera serving the image at `path`, labelled with its file name.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "still-image".to_string());
        Self { path, label }
    }
}

#[async_trait]
impl CaptureDevice for StillImageCamera {
    type Stream = StillImageStream;

    #[instrument(skip(self), fields(path = ?self.path))]
    async fn open(&self, constraints: StreamConstraints) -> CoreResult<StillImageStream> {
        if !self.path.exists() {
            return Err(CoreError::NoCameraFound {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // Decoding is blocking file I/O; keep it off the async workers.
        let path = self.path.clone();
        let decoded = tokio::task::spawn_blocking(move || image::open(path))
            .await
            .map_err(|e| CoreError::DeviceError {
                reason: format!("Still image decode task failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let frame = decoded
            .map_err(|e| CoreError::DeviceError {
                reason: format!("Failed to decode still image: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .into_rgba8();

        info!(
            width = frame.width(),
            height = frame.height(),
            facing = ?constraints.facing,
            "Still image stream opened"
        );

        Ok(StillImageStream {
            frame,
            track: TrackInfo {
                label: self.label.clone(),
                state: TrackState::Live,
            },
        })
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Single-track stream produced by [`StillImageCamera`].
#[derive(Debug)]
pub struct StillImageStream {
    frame: RgbaImage,
    track: TrackInfo,
}

impl VideoStream for StillImageStream {
    fn native_resolution(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    #[track_caller]
    fn read_frame(&mut self) -> CoreResult<RgbaImage> {
        if self.track.state == TrackState::Ended {
            return Err(CoreError::FrameUnavailable {
                reason: "track ended".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(self.frame.clone())
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        vec![self.track.clone()]
    }

    fn stop_track(&mut self, index: usize) {
        if index == 0 {
            self.track.state = TrackState::Ended;
        }
    }
}
