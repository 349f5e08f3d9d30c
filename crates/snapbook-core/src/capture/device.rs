use crate::CoreResult;

use async_trait::async_trait;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Which way the requested camera should face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacingMode {
    /// Rear camera, pointing away from the user.
    #[default]
    Environment,
    /// Front camera, pointing at the user.
    User,
}

/// Constraints passed to [`CaptureDevice::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    /// Preferred facing. A hint: devices without a choice ignore it.
    pub facing: FacingMode,
    /// Request an audio track alongside video.
    pub audio: bool,
}

impl StreamConstraints {
    /// Video-only stream preferring `facing`.
    pub fn video_only(facing: FacingMode) -> Self {
        Self {
            facing,
            audio: false,
        }
    }
}

/// Lifecycle state of one media track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Delivering frames; holds the device.
    Live,
    /// Stopped; the device is released.
    Ended,
}

/// Description of one track inside a [`VideoStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    /// Device-provided label.
    pub label: String,
    /// Current state.
    pub state: TrackState,
}

/// Platform camera that hands out live video streams.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Stream type produced by this device.
    type Stream: VideoStream + 'static;

    /// Acquire a stream. Suspends while the platform negotiates
    /// permission and device selection.
    ///
    /// # Errors
    ///
    /// `CameraPermissionDenied`, `NoCameraFound`, `CameraBusy` or
    /// `DeviceError` when no stream can be handed out.
    async fn open(&self, constraints: StreamConstraints) -> CoreResult<Self::Stream>;

    /// Human-readable device name for logs.
    fn label(&self) -> &str;
}

/// A live stream bound to the video surface.
pub trait VideoStream: Send {
    /// Native frame size in pixels. `(0, 0)` until the first frame arrives.
    fn native_resolution(&self) -> (u32, u32);

    /// Frame currently shown on the video surface.
    fn read_frame(&mut self) -> CoreResult<RgbaImage>;

    /// Every constituent track.
    fn tracks(&self) -> Vec<TrackInfo>;

    /// Stop the track at `index`, releasing its share of the device.
    /// Stopping an ended track does nothing.
    fn stop_track(&mut self, index: usize);

    /// Whether any track still delivers frames.
    fn is_live(&self) -> bool {
        self.tracks()
            .iter()
            .any(|track| track.state == TrackState::Live)
    }
}
