//! Text rendering of both screens and of capture notices.
//!
//! Every function returns the text instead of printing it, so the app loop
//! decides where output goes.

use snapbook_core::{
    CaptureOutcome, CaptureState, FrozenPhoto, GalleryView, Notice, PersistStatus, SkipReason,
};

/// Camera screen: current state, stored count and the actions on offer.
pub fn camera_screen(state: CaptureState, stored: usize, frozen: Option<&FrozenPhoto>) -> String {
    let mut lines = vec![format!("== Camera ==  ({} in gallery)", stored)];

    match (state, frozen) {
        (CaptureState::Streaming, _) => {
            lines.push("[live preview]".to_string());
            lines.push("actions: capture | gallery".to_string());
        }
        (CaptureState::Frozen, Some(frozen)) => {
            lines.push(format!(
                "[photo {}]  {}",
                frozen.record.id, frozen.record.captured_at
            ));
            if let PersistStatus::Unpersisted { .. } = frozen.status {
                lines.push("(not saved to the gallery)".to_string());
            }
            lines.push("actions: retake | download | gallery".to_string());
        }
        _ => {
            lines.push("[camera off]".to_string());
            lines.push("actions: retake | gallery".to_string());
        }
    }

    lines.join("\n")
}

/// Gallery screen: empty-state hint, or header plus one line per tile.
pub fn gallery_screen(view: &GalleryView) -> String {
    match view {
        GalleryView::Empty => format!(
            "== Gallery ==\n{}\n{}\nactions: camera",
            GalleryView::EMPTY_TITLE,
            GalleryView::EMPTY_HINT
        ),
        GalleryView::Grid { count_label, tiles } => {
            let mut lines = vec![format!("== Gallery ==  {}", count_label)];
            lines.extend(tiles.iter().map(|tile| {
                format!(
                    "Photo {}  {}  id={}",
                    tile.position, tile.captured_at, tile.id
                )
            }));
            lines.push("actions: delete <n> | clear | camera".to_string());
            lines.join("\n")
        }
    }
}

/// One notice. Blocking notices are marked so they stand out.
pub fn notice(notice: &Notice) -> String {
    if notice.is_blocking() {
        format!("[!] {}", notice.message())
    } else {
        notice.message()
    }
}

/// Short feedback for a capture attempt that did nothing.
pub fn capture_outcome(outcome: &CaptureOutcome) -> Option<String> {
    let CaptureOutcome::Skipped(reason) = outcome else {
        return None;
    };

    let text = match reason {
        SkipReason::NotStreaming => "The camera is not streaming.",
        SkipReason::MissingVideoSurface | SkipReason::VideoNotReady => {
            "The video is not ready yet."
        }
        SkipReason::MissingRasterSurface
        | SkipReason::FrameUnavailable
        | SkipReason::EncodingFailed => "The photo could not be taken.",
    };

    Some(text.to_string())
}
