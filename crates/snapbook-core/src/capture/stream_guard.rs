use crate::capture::{TrackState, VideoStream};

use tracing::{debug, info};
use uuid::Uuid;

/// RAII owner of a live stream that stops every track when dropped.
///
/// Leaving a track running keeps the camera switched on after the capture
/// screen goes away. Dropping the guard (or calling [`stop_all`]) releases it
/// no matter how the controller is torn down.
///
/// [`stop_all`]: StreamGuard::stop_all
pub struct StreamGuard<V: VideoStream> {
    stream: V,
    session_id: Uuid,
}

impl<V: VideoStream> StreamGuard<V> {
    /// Take ownership of a freshly acquired stream.
    pub fn new(stream: V) -> Self {
        let session_id = Uuid::new_v4();
        debug!(session_id = %session_id, tracks = stream.tracks().len(), "Stream bound");
        Self { stream, session_id }
    }

    /// Log correlation id of this streaming session.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The guarded stream.
    pub fn stream(&self) -> &V {
        &self.stream
    }

    /// Mutable access, for reading frames.
    pub fn stream_mut(&mut self) -> &mut V {
        &mut self.stream
    }

    /// Stop every live track. Returns how many were stopped.
    pub fn stop_all(&mut self) -> usize {
        let live: Vec<usize> = self
            .stream
            .tracks()
            .iter()
            .enumerate()
            .filter(|(_, track)| track.state == TrackState::Live)
            .map(|(index, _)| index)
            .collect();

        for &index in &live {
            self.stream.stop_track(index);
        }

        if !live.is_empty() {
            info!(session_id = %self.session_id, stopped = live.len(), "Camera released");
        }

        live.len()
    }
}

impl<V: VideoStream> Drop for StreamGuard<V> {
    fn drop(&mut self) {
        self.stop_all();
    }
}
