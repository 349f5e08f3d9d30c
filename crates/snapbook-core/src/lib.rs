//! Snapbook Core Library
//!
//! Camera capture and a locally persisted photo gallery. The capture screen
//! freezes a mirrored frame, encodes it as a PNG data URI and appends it to a
//! [`PhotoStore`]; the gallery screen reads, lists and deletes from the same
//! store. The two screens never talk to each other directly.
//!
//! # Example
//!
//! ```no_run
//! use snapbook_core::{
//!     CaptureController, CaptureServices, CaptureSettings, CollectingNotices, CoreResult,
//!     DirectoryExporter, GalleryController, ImageSurface, MemorySlot, PatternCamera,
//!     SlotPhotoStore, SystemClock,
//! };
//!
//! use std::sync::Arc;
//!
//! async fn run() -> CoreResult<()> {
//!     let store = Arc::new(SlotPhotoStore::new(MemorySlot::new()));
//!     let services = CaptureServices {
//!         store: store.clone(),
//!         notices: Arc::new(CollectingNotices::new()),
//!         clock: Arc::new(SystemClock),
//!         exporter: Arc::new(DirectoryExporter::new("downloads")),
//!     };
//!
//!     let mut camera = CaptureController::new(
//!         PatternCamera::new(640, 480),
//!         services,
//!         CaptureSettings::default(),
//!     );
//!     camera.mount_raster(ImageSurface::new());
//!     camera.start_capture().await?;
//!     camera.capture();
//!
//!     let gallery = GalleryController::mount(store);
//!     println!("{:?}", gallery.view());
//!     Ok(())
//! }
//! ```

mod capture;
mod error;
mod gallery;
mod photo;
mod store;

pub use {
    capture::{
        AcquisitionFailure, CaptureController, CaptureDevice, CaptureOutcome, CaptureServices,
        CaptureSettings, CaptureState, Clock, CollectingNotices, DEFAULT_TIMESTAMP_FORMAT,
        DirectoryExporter, FacingMode, FileExporter, FixedClock, FrozenPhoto, ImageSurface, Notice,
        NoticeSink, PATTERN_MARKER, PatternCamera, PatternStream, PersistStatus, RasterSurface,
        SkipReason, StillImageCamera, StillImageStream, StreamConstraints, StreamGuard,
        SystemClock, TrackInfo, TrackState, Transform2D, VideoStream, format_timestamp,
        pattern_frame, render_mirrored,
    },
    error::{CoreError, Result as CoreResult},
    gallery::{GalleryController, GalleryView, Tile},
    photo::{
        PNG_DATA_URI_PREFIX, PhotoCollection, PhotoId, PhotoRecord, decode_png_data_uri,
        encode_png_data_uri,
    },
    store::{
        DEFAULT_SLOT_CAPACITY, FileSlot, MemorySlot, PHOTO_SLOT_KEY, PersistentSlot, PhotoStore,
        SlotPhotoStore,
    },
};
