use log::debug;

use crate::dom::NodeId;

/// Playback model for the teaser's own `<video>` element.
///
/// Direct-file sources keep their element alive for the block's whole
/// lifetime; the modal controller only plays it on open and pauses
/// plus rewinds it on close.
#[derive(Debug)]
pub struct NativeVideoPlayer {
    element: NodeId,
    position_secs: f64,
    paused: bool,
}

impl NativeVideoPlayer {
    pub fn new(element: NodeId) -> Self {
        Self {
            element,
            position_secs: 0.0,
            paused: true,
        }
    }

    /// The `<video>` element this player drives.
    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn play(&mut self) {
        debug!("native video: play at {:.2}s", self.position_secs);
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Move the play position; clamped at 0.
    pub fn seek(&mut self, position_secs: f64) {
        self.position_secs = position_secs.max(0.0);
    }

    pub fn position(&self) -> f64 {
        self.position_secs
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
