use crate::{
    CoreError, CoreResult,
    capture::{CaptureDevice, StreamConstraints, TrackInfo, TrackState, VideoStream},
};

use std::{
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use image::{Rgba, RgbaImage};
use tracing::{info, instrument, warn};

/// Colour of the marker band along the left edge of every pattern frame.
pub const PATTERN_MARKER: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Why a simulated acquisition fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionFailure {
    /// The user refused camera access.
    PermissionDenied,
    /// No camera attached.
    NoDevice,
    /// Another consumer holds the camera.
    Busy,
}

#[derive(Debug, Default)]
struct PatternState {
    failure: Mutex<Option<AcquisitionFailure>>,
    last_constraints: Mutex<Option<StreamConstraints>>,
    opened: AtomicUsize,
    live_tracks: AtomicUsize,
}

/// Synthetic camera producing a vertical gradient with a marker band on the
/// left edge, so mirrored captures are easy to recognise.
///
/// Clones share state: a clone kept by the caller observes how many streams
/// were opened and how many tracks are still live.
#[derive(Debug, Clone)]
pub struct PatternCamera {
    width: u32,
    height: u32,
    state: Arc<PatternState>,
}

impl PatternCamera {
    /// Camera producing `width` x `height` pattern frames.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: Arc::new(PatternState::default()),
        }
    }

    /// Make future `open` calls fail (or succeed again with `None`).
    pub fn set_failure(&self, failure: Option<AcquisitionFailure>) {
        *self.state.failure.lock().unwrap_or_else(|e| e.into_inner()) = failure;
    }

    /// Number of streams handed out so far.
    pub fn opened(&self) -> usize {
        self.state.opened.load(Ordering::Acquire)
    }

    /// Number of tracks across all streams that have not been stopped.
    pub fn live_tracks(&self) -> usize {
        self.state.live_tracks.load(Ordering::Acquire)
    }

    /// Constraints of the most recent `open` call.
    pub fn last_constraints(&self) -> Option<StreamConstraints> {
        *self
            .state
            .last_constraints
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CaptureDevice for PatternCamera {
    type Stream = PatternStream;

    #[instrument(skip(self))]
    async fn open(&self, constraints: StreamConstraints) -> CoreResult<PatternStream> {
        *self
            .state
            .last_constraints
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(constraints);

        let failure = *self.state.failure.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(failure) = failure {
            warn!(?failure, "Pattern camera refusing stream");
            return Err(failure_error(failure));
        }

        self.state.opened.fetch_add(1, Ordering::AcqRel);
        self.state.live_tracks.fetch_add(1, Ordering::AcqRel);

        info!(
            width = self.width,
            height = self.height,
            facing = ?constraints.facing,
            "Pattern stream opened"
        );

        Ok(PatternStream {
            frame: pattern_frame(self.width, self.height),
            track: TrackInfo {
                label: "pattern-video".to_string(),
                state: TrackState::Live,
            },
            state: Arc::clone(&self.state),
        })
    }

    fn label(&self) -> &str {
        "pattern"
    }
}

/// Single-track stream produced by [`PatternCamera`].
#[derive(Debug)]
pub struct PatternStream {
    frame: RgbaImage,
    track: TrackInfo,
    state: Arc<PatternState>,
}

impl VideoStream for PatternStream {
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
        if index == 0 && self.track.state == TrackState::Live {
            self.track.state = TrackState::Ended;
            self.state.live_tracks.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

/// Gradient frame with a [`PATTERN_MARKER`] band over the left eighth.
pub fn pattern_frame(width: u32, height: u32) -> RgbaImage {
    let marker_width = (width / 8).max(1);

    RgbaImage::from_fn(width, height, |x, y| {
        if x < marker_width {
            PATTERN_MARKER
        } else {
            let shade = (y * 255 / height.max(1)) as u8;
            Rgba([0, shade, 255, 255])
        }
    })
}

#[track_caller]
fn failure_error(failure: AcquisitionFailure) -> CoreError {
    let location = ErrorLocation::from(Location::caller());
    match failure {
        AcquisitionFailure::PermissionDenied => CoreError::CameraPermissionDenied {
            reason: "Permission denied by user".to_string(),
            location,
        },
        AcquisitionFailure::NoDevice => CoreError::NoCameraFound { location },
        AcquisitionFailure::Busy => CoreError::CameraBusy {
            reason: "Device in use by another application".to_string(),
            location,
        },
    }
}
