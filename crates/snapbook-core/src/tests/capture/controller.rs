use crate::{
    AcquisitionFailure, CaptureController, CaptureDevice, CaptureOutcome, CaptureSettings,
    CaptureState, Clock, CoreError, CoreResult, FacingMode, ImageSurface, MemorySlot, Notice,
    PATTERN_MARKER, PatternCamera, PersistStatus, PhotoStore, SkipReason, StreamConstraints,
    TrackInfo, TrackState, VideoStream, pattern_frame,
};

use crate::tests::support::Harness;

use async_trait::async_trait;
use chrono::TimeDelta;
use image::RgbaImage;

type Controller = CaptureController<PatternCamera, ImageSurface>;

fn controller(harness: &Harness, camera: &PatternCamera) -> Controller {
    let mut controller = CaptureController::new(
        camera.clone(),
        harness.services(),
        CaptureSettings::default(),
    );
    controller.mount_raster(ImageSurface::new());
    controller
}

/// WHAT: Successful acquisition moves Idle -> Streaming with a rear-camera hint
/// WHY: The capture screen starts the camera on mount
#[tokio::test]
async fn given_idle_controller_when_starting_capture_then_streaming_with_environment_facing() {
    // Given: An idle controller
    let harness = Harness::new();
    let camera = PatternCamera::new(16, 8);
    let mut controller = controller(&harness, &camera);
    assert_eq!(controller.state(), CaptureState::Idle);

    // When: Starting capture
    controller.start_capture().await.unwrap();

    // Then: Streaming, video-only, environment facing
    assert_eq!(controller.state(), CaptureState::Streaming);
    let constraints = camera.last_constraints().unwrap();
    assert_eq!(constraints.facing, FacingMode::Environment);
    assert!(!constraints.audio);
}

/// WHAT: Scenario - permission denial keeps Idle, raises a notice, stores nothing
/// WHY: Acquisition failure must be surfaced without crashing the view
#[tokio::test]
async fn given_permission_denied_when_starting_capture_then_idle_with_notice_and_no_record() {
    // Given: A camera that refuses access
    let harness = Harness::new();
    let camera = PatternCamera::new(16, 8);
    camera.set_failure(Some(AcquisitionFailure::PermissionDenied));
    let mut controller = controller(&harness, &camera);

    // When: Starting capture, then attempting a capture anyway
    let result = controller.start_capture().await;
    let outcome = controller.capture();

    // Then: Error returned, Idle, blocking notice, empty store
    assert!(matches!(result, Err(CoreError::CameraPermissionDenied { .. })));
    assert_eq!(controller.state(), CaptureState::Idle);
    assert_eq!(outcome, CaptureOutcome::Skipped(SkipReason::NotStreaming));
    let notices = harness.notices.drain();
    assert_eq!(notices, vec![Notice::camera_unavailable()]);
    assert!(notices[0].is_blocking());
    assert!(harness.store.load().is_empty());
}

/// WHAT: Capture freezes, stores the record and releases the camera
/// WHY: Core capture-and-persist workflow
#[tokio::test]
async fn given_streaming_when_capturing_then_frozen_record_persisted_and_camera_released() {
    // Given: A streaming controller
    let harness = Harness::new();
    let camera = PatternCamera::new(16, 8);
    let mut controller = controller(&harness, &camera);
    controller.start_capture().await.unwrap();

    // When: Capturing
    let outcome = controller.capture();

    // Then: Frozen, persisted, timestamped from the clock, camera off
    let CaptureOutcome::Captured { record, status } = outcome else {
        panic!("expected a capture");
    };
    assert_eq!(status, PersistStatus::Persisted);
    assert_eq!(controller.state(), CaptureState::Frozen);
    assert_eq!(record.id, harness.clock.now().timestamp_millis());
    assert_eq!(record.captured_at, "01/01/2024 10:00:00");
    assert_eq!(harness.store.load().last(), Some(&record));
    assert_eq!(camera.live_tracks(), 0);
    assert_eq!(controller.stored_count(), 1);
    assert_eq!(harness.notices.drain(), vec![Notice::PhotoSaved { total: 1 }]);
}

/// WHAT: Stored image is the mirrored frame at native resolution
/// WHY: Saved photos must match the mirrored preview
#[tokio::test]
async fn given_marker_on_left_when_capturing_then_stored_image_has_marker_on_right() {
    // Given: A streaming pattern camera (marker on the left eighth)
    let harness = Harness::new();
    let camera = PatternCamera::new(16, 8);
    let mut controller = controller(&harness, &camera);
    controller.start_capture().await.unwrap();

    // When: Capturing and decoding the stored image
    controller.capture();
    let stored = harness.store.load();
    let png = stored.last().unwrap().decode_png().unwrap();
    let image = image::load_from_memory(&png).unwrap().into_rgba8();

    // Then: Native size, marker flipped to the right edge
    assert_eq!(image.dimensions(), (16, 8));
    assert_eq!(*image.get_pixel(15, 0), PATTERN_MARKER);
    assert_ne!(*image.get_pixel(0, 0), PATTERN_MARKER);
}

/// WHAT: Capture without a raster surface is a logged no-op
/// WHY: Missing surfaces must never throw to the caller
#[tokio::test]
async fn given_no_raster_surface_when_capturing_then_skipped_and_still_streaming() {
    // Given: A streaming controller with the raster surface unmounted
    let harness = Harness::new();
    let camera = PatternCamera::new(16, 8);
    let mut controller = controller(&harness, &camera);
    controller.start_capture().await.unwrap();
    controller.unmount_raster();

    // When: Capturing
    let outcome = controller.capture();

    // Then: Skipped, nothing stored, still streaming
    assert_eq!(
        outcome,
        CaptureOutcome::Skipped(SkipReason::MissingRasterSurface)
    );
    assert_eq!(controller.state(), CaptureState::Streaming);
    assert!(harness.store.load().is_empty());
}

/// WHAT: A full store still freezes the frame, flagged unpersisted
/// WHY: Storage ceiling must not abort the visible capture
#[tokio::test]
async fn given_full_store_when_capturing_then_frozen_but_unpersisted_with_notice() {
    // Given: A store that cannot hold any photo
    let harness = Harness::with_slot(MemorySlot::with_capacity(16));
    let camera = PatternCamera::new(16, 8);
    let mut controller = controller(&harness, &camera);
    controller.start_capture().await.unwrap();

    // When: Capturing
    let outcome = controller.capture();

    // Then: Frozen with Unpersisted status and a notice, store empty
    assert!(matches!(
        outcome,
        CaptureOutcome::Captured {
            status: PersistStatus::Unpersisted { .. },
            ..
        }
    ));
    assert_eq!(controller.state(), CaptureState::Frozen);
    assert!(!controller.frozen().unwrap().status.is_persisted());
    assert_eq!(harness.notices.drain(), vec![Notice::photo_not_saved()]);
    assert!(harness.store.load().is_empty());
}

/// WHAT: Two captures in the same millisecond get distinct ids
/// WHY: Ids are removal keys
#[tokio::test]
async fn given_frozen_clock_when_capturing_twice_then_ids_distinct_and_ascending() {
    // Given: A controller with a clock that does not move
    let harness = Harness::new();
    let camera = PatternCamera::new(8, 8);
    let mut controller = controller(&harness, &camera);

    // When: Capture, retake, capture
    controller.start_capture().await.unwrap();
    controller.capture();
    controller.retake().await.unwrap();
    controller.capture();

    // Then: Second id is first + 1
    let ids: Vec<i64> = harness.store.load().iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[1], ids[0] + 1);
}

/// WHAT: Retake discards the frozen photo and streams again
/// WHY: Frozen -> Streaming transition
#[tokio::test]
async fn given_frozen_when_retaking_then_streaming_with_new_stream() {
    // Given: A frozen controller
    let harness = Harness::new();
    let camera = PatternCamera::new(8, 8);
    let mut controller = controller(&harness, &camera);
    controller.start_capture().await.unwrap();
    controller.capture();

    // When: Retaking
    controller.retake().await.unwrap();

    // Then: Streaming on a second stream, frozen photo gone, photo still stored
    assert_eq!(controller.state(), CaptureState::Streaming);
    assert!(controller.frozen().is_none());
    assert_eq!(camera.opened(), 2);
    assert_eq!(camera.live_tracks(), 1);
    assert_eq!(harness.store.load().len(), 1);
}

/// WHAT: Retake outside Frozen does nothing
/// WHY: Retake is only offered after a capture
#[tokio::test]
async fn given_idle_when_retaking_then_still_idle() {
    // Given: An idle controller
    let harness = Harness::new();
    let camera = PatternCamera::new(8, 8);
    let mut controller = controller(&harness, &camera);

    // When: Retaking
    controller.retake().await.unwrap();

    // Then: Idle, no stream requested
    assert_eq!(controller.state(), CaptureState::Idle);
    assert_eq!(camera.opened(), 0);
}

/// WHAT: Download exports the frozen PNG under a timestamped name
/// WHY: Users can save the captured photo as a file
#[tokio::test]
async fn given_frozen_when_downloading_then_png_written_without_touching_store() {
    // Given: A frozen controller
    let harness = Harness::new();
    let camera = PatternCamera::new(8, 8);
    let mut controller = controller(&harness, &camera);
    controller.start_capture().await.unwrap();
    controller.capture();
    harness.clock.advance(TimeDelta::milliseconds(250));

    // When: Downloading
    let path = controller.download().unwrap().unwrap();

    // Then: File named after the current time holds the frozen bytes
    let expected_name = format!("photo-{}.png", harness.clock.now().timestamp_millis());
    assert_eq!(path.file_name().unwrap().to_string_lossy(), expected_name);
    assert_eq!(
        std::fs::read(&path).unwrap(),
        controller.frozen().unwrap().png
    );
    assert_eq!(controller.state(), CaptureState::Frozen);
    assert_eq!(harness.store.load().len(), 1);

    let _ = std::fs::remove_dir_all(&harness.downloads);
}

/// WHAT: Download outside Frozen exports nothing
/// WHY: There is no image to export while streaming
#[tokio::test]
async fn given_streaming_when_downloading_then_none() {
    // Given: A streaming controller
    let harness = Harness::new();
    let camera = PatternCamera::new(8, 8);
    let mut controller = controller(&harness, &camera);
    controller.start_capture().await.unwrap();

    // When: Downloading
    let result = controller.download().unwrap();

    // Then: Nothing exported
    assert!(result.is_none());
    assert!(!harness.downloads.exists());
}

/// WHAT: Shutdown and drop both release the camera
/// WHY: Leaving the capture screen must switch the camera off
#[tokio::test]
async fn given_streaming_when_tearing_down_then_all_tracks_stopped() {
    // Given: Two streaming controllers on the same camera
    let harness = Harness::new();
    let camera = PatternCamera::new(8, 8);
    let mut first = controller(&harness, &camera);
    let mut second = controller(&harness, &camera);
    first.start_capture().await.unwrap();
    second.start_capture().await.unwrap();
    assert_eq!(camera.live_tracks(), 2);

    // When: Explicit shutdown of one, drop of the other
    first.shutdown();
    assert_eq!(first.state(), CaptureState::Idle);
    drop(second);

    // Then: No live tracks
    assert_eq!(camera.live_tracks(), 0);
}

/// WHAT: Starting while streaming does not open a second stream
/// WHY: Repeated start requests must not leak camera handles
#[tokio::test]
async fn given_streaming_when_starting_again_then_no_new_stream() {
    // Given: A streaming controller
    let harness = Harness::new();
    let camera = PatternCamera::new(8, 8);
    let mut controller = controller(&harness, &camera);
    controller.start_capture().await.unwrap();

    // When: Starting again
    controller.start_capture().await.unwrap();

    // Then: Still one stream
    assert_eq!(camera.opened(), 1);
    assert_eq!(camera.live_tracks(), 1);
}

/// Camera whose stream reports a fixed resolution and track state.
struct ScriptedCamera {
    resolution: (u32, u32),
    track_state: TrackState,
}

struct ScriptedStream {
    resolution: (u32, u32),
    track: TrackInfo,
}

#[async_trait]
impl CaptureDevice for ScriptedCamera {
    type Stream = ScriptedStream;

    async fn open(&self, _constraints: StreamConstraints) -> CoreResult<ScriptedStream> {
        Ok(ScriptedStream {
            resolution: self.resolution,
            track: TrackInfo {
                label: "scripted".to_string(),
                state: self.track_state,
            },
        })
    }

    fn label(&self) -> &str {
        "scripted"
    }
}

impl VideoStream for ScriptedStream {
    fn native_resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn read_frame(&mut self) -> CoreResult<RgbaImage> {
        Ok(pattern_frame(self.resolution.0.max(1), self.resolution.1.max(1)))
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        vec![self.track.clone()]
    }

    fn stop_track(&mut self, _index: usize) {
        self.track.state = TrackState::Ended;
    }
}

async fn scripted_controller(
    harness: &Harness,
    resolution: (u32, u32),
    track_state: TrackState,
) -> CaptureController<ScriptedCamera, ImageSurface> {
    let camera = ScriptedCamera {
        resolution,
        track_state,
    };
    let mut controller =
        CaptureController::new(camera, harness.services(), CaptureSettings::default());
    controller.mount_raster(ImageSurface::new());
    controller.start_capture().await.unwrap();
    controller
}

/// WHAT: A stream whose only track has ended skips capture
/// WHY: A dead video surface has no frame to freeze
#[tokio::test]
async fn given_ended_track_when_capturing_then_skipped_missing_video_surface() {
    // Given: A streaming controller whose track already ended
    let harness = Harness::new();
    let mut controller = scripted_controller(&harness, (16, 8), TrackState::Ended).await;

    // When: Capturing
    let outcome = controller.capture();

    // Then: Skipped without notice, nothing stored, still streaming
    assert_eq!(
        outcome,
        CaptureOutcome::Skipped(SkipReason::MissingVideoSurface)
    );
    assert_eq!(controller.state(), CaptureState::Streaming);
    assert!(harness.notices.drain().is_empty());
    assert!(harness.store.load().is_empty());
}

/// WHAT: A stream without its first frame skips capture
/// WHY: A zero-sized canvas cannot be encoded into a photo
#[tokio::test]
async fn given_zero_resolution_when_capturing_then_skipped_video_not_ready() {
    // Given: A live stream that still reports (0, 0)
    let harness = Harness::new();
    let mut controller = scripted_controller(&harness, (0, 0), TrackState::Live).await;

    // When: Capturing
    let outcome = controller.capture();

    // Then: Skipped without notice, nothing stored, still streaming
    assert_eq!(outcome, CaptureOutcome::Skipped(SkipReason::VideoNotReady));
    assert_eq!(controller.state(), CaptureState::Streaming);
    assert!(harness.notices.drain().is_empty());
    assert!(harness.store.load().is_empty());
}
