//! Camera chosen by the `[camera]` config section.

use crate::{
    AppError, AppResult,
    config::{CameraConfig, CameraSource},
};

use std::panic::Location;

use async_trait::async_trait;
use error_location::ErrorLocation;
use image::RgbaImage;
use snapbook_core::{
    CaptureDevice, CoreResult, PatternCamera, PatternStream, StillImageCamera, StillImageStream,
    StreamConstraints, TrackInfo, VideoStream,
};

/// Either frame source, behind one `CaptureDevice` type.
#[derive(Debug, Clone)]
pub enum AppCamera {
    /// Synthetic test pattern.
    Pattern(PatternCamera),
    /// Still image file.
    StillImage(StillImageCamera),
}

impl AppCamera {
    /// Build the camera described by `config`.
    #[track_caller]
    pub fn from_config(config: &CameraConfig) -> AppResult<Self> {
        match config.source {
            CameraSource::Pattern => Ok(AppCamera::Pattern(PatternCamera::new(
                config.width,
                config.height,
            ))),
            CameraSource::StillImage => {
                let path = config
                    .image_path
                    .as_ref()
                    .ok_or_else(|| AppError::ConfigError {
                        reason: "camera.source = \"still-image\" requires camera.image_path"
                            .to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    })?;
                Ok(AppCamera::StillImage(StillImageCamera::new(path)))
            }
        }
    }
}

#[async_trait]
impl CaptureDevice for AppCamera {
    type Stream = AppStream;

    async fn open(&self, constraints: StreamConstraints) -> CoreResult<AppStream> {
        match self {
            AppCamera::Pattern(camera) => camera.open(constraints).await.map(AppStream::Pattern),
            AppCamera::StillImage(camera) => {
                camera.open(constraints).await.map(AppStream::StillImage)
            }
        }
    }

    fn label(&self) -> &str {
        match self {
            AppCamera::Pattern(camera) => camera.label(),
            AppCamera::StillImage(camera) => camera.label(),
        }
    }
}

/// Stream handed out by [`AppCamera`].
pub enum AppStream {
    /// From [`AppCamera::Pattern`].
    Pattern(PatternStream),
    /// From [`AppCamera::StillImage`].
    StillImage(StillImageStream),
}

impl VideoStream for AppStream {
    fn native_resolution(&self) -> (u32, u32) {
        match self {
            AppStream::Pattern(stream) => stream.native_resolution(),
            AppStream::StillImage(stream) => stream.native_resolution(),
        }
    }

    fn read_frame(&mut self) -> CoreResult<RgbaImage> {
        match self {
            AppStream::Pattern(stream) => stream.read_frame(),
            AppStream::StillImage(stream) => stream.read_frame(),
        }
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        match self {
            AppStream::Pattern(stream) => stream.tracks(),
            AppStream::StillImage(stream) => stream.tracks(),
        }
    }

    fn stop_track(&mut self, index: usize) {
        match self {
            AppStream::Pattern(stream) => stream.stop_track(index),
            AppStream::StillImage(stream) => stream.stop_track(index),
        }
    }
}
