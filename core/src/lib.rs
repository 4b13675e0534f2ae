pub mod config;
pub mod dom;
pub mod media;
pub mod modal;
pub mod sdk;
pub mod teaser;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

// Re-exports
pub use config::{EmbedDefaults, SdkConfig};
pub use media::{EmbedPlayer, NativeVideoPlayer, extract_youtube_id, frame_container_id};
pub use modal::{ModalController, ModalError, ToggleOutcome, build_modal};
pub use sdk::{SdkLoadState, SdkLoader};
pub use teaser::{DecoratedTeaser, TeaserError, decorate};

/// How a teaser's linked video has to be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoKind {
    /// Played through the lazily loaded third-party SDK.
    Youtube,
    /// Embeddable elsewhere; opened in a new browsing context, never
    /// in the modal.
    ExternalEmbeddable,
    /// Played by a native `<video>` element inside the modal.
    DirectFile,
}

/// Ordered classification table; the first kind with a matching
/// pattern wins. Deliberately permissive substring matches, not URL
/// parsing.
static KIND_PATTERNS: Lazy<Vec<(VideoKind, Vec<Regex>)>> = Lazy::new(|| {
    let table = [
        (VideoKind::Youtube, vec![r"youtube\.com", r"youtu\.be"]),
        (VideoKind::ExternalEmbeddable, vec![r"vimeo\.com"]),
        (
            VideoKind::DirectFile,
            vec![r"\.(mp4|webm|ogv|ogg|mov|m4v)(\?[^#]*)?(#.*)?$"],
        ),
    ];
    table
        .into_iter()
        .map(|(kind, patterns)| {
            let compiled = patterns
                .into_iter()
                .map(|p| Regex::new(p).expect("static kind pattern"))
                .collect();
            (kind, compiled)
        })
        .collect()
});

/// Classify an href against the provider table.
///
/// `None` means the link is not a video at all; callers fall back to
/// plain-hyperlink behavior. That is an expected outcome, not an
/// error.
pub fn detect_video_kind(href: &str) -> Option<VideoKind> {
    KIND_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| p.is_match(href)))
        .map(|(kind, _)| *kind)
}

/// A classified teaser link. Immutable once built.
#[derive(Debug, Clone)]
pub struct VideoSource {
    pub href: String,
    pub kind: VideoKind,
    /// Derived for [`VideoKind::Youtube`] only. `None` means the id
    /// could not be parsed; the modal opens but never constructs a
    /// player.
    pub video_id: Option<String>,
}

impl VideoSource {
    /// Classify `href`, deriving the video id for YouTube sources.
    pub fn classify(href: &str) -> Option<Self> {
        let kind = detect_video_kind(href)?;
        let video_id = match kind {
            VideoKind::Youtube => {
                let id = extract_youtube_id(href);
                if id.is_none() {
                    debug!("YouTube href with no parsable video id: {href}");
                }
                id
            }
            _ => None,
        };
        Some(Self {
            href: href.to_string(),
            kind,
            video_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_youtube_hosts() {
        assert_eq!(
            detect_video_kind("https://www.youtube.com/watch?v=abc123"),
            Some(VideoKind::Youtube)
        );
        assert_eq!(
            detect_video_kind("https://youtu.be/abc123"),
            Some(VideoKind::Youtube)
        );
    }

    #[test]
    fn test_detect_embeddable_host() {
        assert_eq!(
            detect_video_kind("https://vimeo.com/123456"),
            Some(VideoKind::ExternalEmbeddable)
        );
    }

    #[test]
    fn test_detect_direct_file() {
        assert_eq!(
            detect_video_kind("https://example.com/clip.mp4"),
            Some(VideoKind::DirectFile)
        );
        assert_eq!(
            detect_video_kind("https://example.com/clip.webm?cache=1"),
            Some(VideoKind::DirectFile)
        );
    }

    #[test]
    fn test_detect_unknown_is_none() {
        assert_eq!(detect_video_kind("https://example.com/about"), None);
    }

    #[test]
    fn test_first_matching_kind_wins() {
        // A YouTube URL that also ends in a file extension still
        // classifies as YouTube because the table is ordered.
        assert_eq!(
            detect_video_kind("https://youtube.com/files/promo.mp4"),
            Some(VideoKind::Youtube)
        );
    }

    #[test]
    fn test_classify_derives_video_id() {
        let source = VideoSource::classify("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(source.kind, VideoKind::Youtube);
        assert_eq!(source.video_id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_classify_tolerates_missing_id() {
        let source = VideoSource::classify("https://www.youtube.com/feed/trending").unwrap();
        assert_eq!(source.kind, VideoKind::Youtube);
        assert!(source.video_id.is_none());
    }
}
