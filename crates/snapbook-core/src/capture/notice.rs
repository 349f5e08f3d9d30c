use std::sync::{Arc, Mutex};

/// User-facing message raised by the capture screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The camera could not be opened. Blocks until acknowledged.
    CameraUnavailable {
        /// Text shown to the user.
        message: String,
    },
    /// A photo was frozen but could not be written to the gallery.
    PhotoNotSaved {
        /// Text shown to the user.
        message: String,
    },
    /// A photo was written to the gallery.
    PhotoSaved {
        /// Number of photos now stored.
        total: usize,
    },
}

impl Notice {
    /// Camera could not be acquired.
    pub fn camera_unavailable() -> Self {
        Notice::CameraUnavailable {
            message: "Could not access the camera. Check the permissions.".to_string(),
        }
    }

    /// Capture succeeded but the store rejected the record.
    pub fn photo_not_saved() -> Self {
        Notice::PhotoNotSaved {
            message: "The photo was taken but could not be saved to the gallery.".to_string(),
        }
    }

    /// Whether the user has to dismiss this notice.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Notice::PhotoSaved { .. })
    }

    /// Text shown to the user.
    pub fn message(&self) -> String {
        match self {
            Notice::CameraUnavailable { message } | Notice::PhotoNotSaved { message } => {
                message.clone()
            }
            Notice::PhotoSaved { total } => format!("Photo saved! Total photos: {}", total),
        }
    }
}

/// Receives notices for presentation.
pub trait NoticeSink: Send + Sync {
    /// Present or queue `notice`.
    fn notify(&self, notice: Notice);
}

impl<T: NoticeSink + ?Sized> NoticeSink for Arc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Keeps every notice until drained.
#[derive(Debug, Default)]
pub struct CollectingNotices {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotices {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything collected so far.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Copy of everything collected, leaving it in place.
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl NoticeSink for CollectingNotices {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}
