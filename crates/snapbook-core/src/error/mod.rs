use error_location::ErrorLocation;
use thiserror::Error;

/// Capture and storage errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The user or platform refused access to the camera.
    #[error("Camera permission denied: {reason} {location}")]
    CameraPermissionDenied {
        /// Description reported by the device layer.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No video input device found.
    #[error("No camera found {location}")]
    NoCameraFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The camera exists but is held by another consumer.
    #[error("Camera busy: {reason} {location}")]
    CameraBusy {
        /// Description of what holds the device.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Camera device operation failed.
    #[error("Camera device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The stream could not deliver a frame.
    #[error("Frame unavailable: {reason} {location}")]
    FrameUnavailable {
        /// Description of why no frame was read.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Raster surface could not be encoded.
    #[error("Image encoding failed: {source} {location}")]
    EncodingFailed {
        /// Underlying encoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A slot write would exceed the storage ceiling. The slot is untouched.
    #[error("Storage quota exceeded: need {required} bytes, capacity {capacity} {location}")]
    StorageQuotaExceeded {
        /// Bytes the slots would hold after the write.
        required: usize,
        /// Configured ceiling in bytes.
        capacity: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Persistent slot read or write failed.
    #[error("Storage error: {reason} {location}")]
    StorageError {
        /// Description of the storage failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Collection could not be serialized.
    #[error("Serialization failed: {source} {location}")]
    SerializationFailed {
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// File export (download) failed.
    #[error("Export failed for {filename}: {reason} {location}")]
    ExportFailed {
        /// Name of the file being exported.
        filename: String,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A record's image data is not a PNG data URI.
    #[error("Invalid image data: {reason} {location}")]
    InvalidImageData {
        /// Description of what is malformed.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl CoreError {
    /// Whether this error came from acquiring the capture device.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            CoreError::CameraPermissionDenied { .. }
                | CoreError::NoCameraFound { .. }
                | CoreError::CameraBusy { .. }
                | CoreError::DeviceError { .. }
        )
    }
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
