use crate::{CoreError, CoreResult};

use std::panic::Location;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Prefix of every embeddable PNG payload.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Identifier of a stored photo: the capture time in epoch milliseconds.
pub type PhotoId = i64;

/// One persisted photo entry.
///
/// Serialized as `{ "id": .., "imageData": .., "capturedAt": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Removal key, ascending with capture time.
    pub id: PhotoId,
    /// PNG data URI of the captured bitmap.
    pub image_data: String,
    /// Human-readable capture time. Display only, never used for ordering.
    pub captured_at: String,
}

impl PhotoRecord {
    /// Create a record from raw PNG bytes.
    pub fn from_png(id: PhotoId, png: &[u8], captured_at: impl Into<String>) -> Self {
        Self {
            id,
            image_data: encode_png_data_uri(png),
            captured_at: captured_at.into(),
        }
    }

    /// Decode the PNG bytes behind `image_data`.
    #[track_caller]
    pub fn decode_png(&self) -> CoreResult<Vec<u8>> {
        decode_png_data_uri(&self.image_data)
    }
}

/// Wrap PNG bytes in a `data:image/png;base64,` URI.
pub fn encode_png_data_uri(png: &[u8]) -> String {
    let mut uri = String::with_capacity(PNG_DATA_URI_PREFIX.len() + png.len().div_ceil(3) * 4);
    uri.push_str(PNG_DATA_URI_PREFIX);
    STANDARD.encode_string(png, &mut uri);
    uri
}

/// Extract the PNG bytes from a `data:image/png;base64,` URI.
#[track_caller]
pub fn decode_png_data_uri(uri: &str) -> CoreResult<Vec<u8>> {
    let payload = uri
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .ok_or_else(|| CoreError::InvalidImageData {
            reason: "missing PNG data URI prefix".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    STANDARD
        .decode(payload)
        .map_err(|e| CoreError::InvalidImageData {
            reason: format!("Invalid base64 payload: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}
