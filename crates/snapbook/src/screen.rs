use std::time::Instant;

use uuid::Uuid;

/// Which screen is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Live preview / frozen photo.
    Camera {
        /// When the screen was entered.
        entered_at: Instant,
        /// Unique visit id for log correlation.
        visit_id: Uuid,
    },
    /// Grid of stored photos.
    Gallery {
        /// When the screen was entered.
        entered_at: Instant,
        /// Unique visit id for log correlation.
        visit_id: Uuid,
    },
}

impl Screen {
    /// A fresh camera-screen visit.
    pub fn camera() -> Self {
        Screen::Camera {
            entered_at: Instant::now(),
            visit_id: Uuid::new_v4(),
        }
    }

    /// A fresh gallery-screen visit.
    pub fn gallery() -> Self {
        Screen::Gallery {
            entered_at: Instant::now(),
            visit_id: Uuid::new_v4(),
        }
    }

    /// Whether this is the camera screen.
    pub fn is_camera(&self) -> bool {
        matches!(self, Screen::Camera { .. })
    }

    /// Screen name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Camera { .. } => "camera",
            Screen::Gallery { .. } => "gallery",
        }
    }

    /// Id of this visit.
    pub fn visit_id(&self) -> Uuid {
        match self {
            Screen::Camera { visit_id, .. } | Screen::Gallery { visit_id, .. } => *visit_id,
        }
    }

    /// When this visit began.
    pub fn entered_at(&self) -> Instant {
        match self {
            Screen::Camera { entered_at, .. } | Screen::Gallery { entered_at, .. } => *entered_at,
        }
    }
}
