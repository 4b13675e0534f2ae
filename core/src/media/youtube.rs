use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::EmbedDefaults;

/// URL shapes a YouTube video id can be pulled from, tried in order:
/// `?v=`/`&v=` query parameter, `/embed/ID`, legacy `/v/ID`, and the
/// `youtu.be/ID` short form.
static ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[?&]v=([A-Za-z0-9_-]+)",
        r"/embed/([A-Za-z0-9_-]+)",
        r"/v/([A-Za-z0-9_-]+)",
        r"youtu\.be/([A-Za-z0-9_-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static id pattern"))
    .collect()
});

/// Extract the video id from a YouTube URL.
///
/// Returns `None` for malformed or unsupported URLs; callers degrade
/// to a modal without a playable id rather than treating this as an
/// error.
pub fn extract_youtube_id(href: &str) -> Option<String> {
    ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(href))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Element id of the container a player instance is constructed into.
pub fn frame_container_id(video_id: &str) -> String {
    format!("ytFrame-{video_id}")
}

/// Model of one third-party embedded player instance.
///
/// The real instance lives inside the SDK; this carries the state the
/// modal controller is responsible for: which container and video the
/// instance is bound to, and whether it is currently playing. Every
/// creation auto-starts (per [`EmbedDefaults`]) from the configured
/// offset.
#[derive(Debug)]
pub struct EmbedPlayer {
    container_id: String,
    video_id: String,
    playing: bool,
    position_secs: f64,
}

impl EmbedPlayer {
    /// Construct a player bound to `container_id`, playing `video_id`.
    pub fn create(container_id: &str, video_id: &str, defaults: &EmbedDefaults) -> Self {
        debug!("creating embedded player for {video_id} in #{container_id}");
        Self {
            container_id: container_id.to_string(),
            video_id: video_id.to_string(),
            playing: defaults.autoplay,
            position_secs: defaults.start_seconds,
        }
    }

    /// Halt playback. Safe to call on an already-stopped instance.
    pub fn stop(&mut self) {
        if self.playing {
            debug!("stopping embedded player for {}", self.video_id);
        }
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> f64 {
        self.position_secs
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }
}
