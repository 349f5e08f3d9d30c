mod clock;
mod controller;
mod device;
mod export;
mod notice;
mod pattern_camera;
mod raster;
mod still_camera;
mod stream_guard;

pub use {
    clock::{Clock, DEFAULT_TIMESTAMP_FORMAT, FixedClock, SystemClock, format_timestamp},
    controller::{
        CaptureController, CaptureOutcome, CaptureServices, CaptureSettings, CaptureState,
        FrozenPhoto, PersistStatus, SkipReason,
    },
    device::{CaptureDevice, FacingMode, StreamConstraints, TrackInfo, TrackState, VideoStream},
    export::{DirectoryExporter, FileExporter},
    notice::{CollectingNotices, Notice, NoticeSink},
    pattern_camera::{AcquisitionFailure, PATTERN_MARKER, PatternCamera, PatternStream, pattern_frame},
    raster::{ImageSurface, RasterSurface, Transform2D, render_mirrored},
    still_camera::{StillImageCamera, StillImageStream},
    stream_guard::StreamGuard,
};
