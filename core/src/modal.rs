//! The modal overlay state machine.
//!
//! A [`ModalController`] is bound one-to-one to an overlay subtree and
//! toggles it between `Closed` and `Open` for the block's entire
//! lifetime. Opening routes by source kind: YouTube sources rebuild a
//! hosting container and go through the lazy SDK loader; direct files
//! play their native `<video>` element. Closing stops whatever is
//! playing, discards the hosting container, and cancels any wait for
//! a not-yet-ready SDK.

use log::{debug, info, warn};
use thiserror::Error;

use crate::dom::{Document, NodeId};
use crate::media::{EmbedPlayer, NativeVideoPlayer, frame_container_id};
use crate::sdk::{SdkLoadState, SdkLoader};
use crate::{VideoKind, VideoSource};

/// Class present on the overlay root while the modal is open.
pub const OPEN_CLASS: &str = "open";
pub const OVERLAY_CLASS: &str = "video-overlay";
pub const CONTENT_CLASS: &str = "video-content";
pub const CLOSE_CLASS: &str = "video-close";
/// Content-pane attributes consumed by styling.
pub const VIDEO_TYPE_ATTR: &str = "data-videoType";
pub const VIDEO_ID_ATTR: &str = "data-videoId";

#[derive(Debug, Error)]
pub enum ModalError {
    /// The overlay subtree is gone from the page; the host removed it.
    #[error("modal overlay is not attached to the page")]
    MissingOverlay,
    /// The content pane is gone from the page.
    #[error("modal content pane is not attached to the page")]
    MissingContentPane,
    /// Embeddable links open in a new browsing context and never get
    /// a modal.
    #[error("source kind {0:?} is not played in a modal")]
    NotModalSource(VideoKind),
}

/// What a [`ModalController::toggle`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Modal is open; playback started, or there was nothing playable
    /// to start.
    Opened,
    /// Modal is open; player creation is deferred until the SDK
    /// reports ready.
    OpenedAwaitingSdk,
    /// Modal is closed.
    Closed,
}

/// Live binding between a hosting container and an embedded player
/// instance. At most one exists per controller, and the single-open-
/// modal rule makes that process-wide.
#[derive(Debug)]
struct PlayerSession {
    container: NodeId,
    player: EmbedPlayer,
}

/// Owns one modal subtree's open/closed state and orchestrates player
/// lifecycle on each transition.
pub struct ModalController {
    overlay: NodeId,
    content: NodeId,
    source: VideoSource,
    is_open: bool,
    session: Option<PlayerSession>,
    native: Option<NativeVideoPlayer>,
    sdk_pending: bool,
}

/// Build the modal subtree for `source` under `parent` and return its
/// controller.
///
/// The produced markup contract: an overlay root, a header with a
/// close control, and a content pane carrying `data-videoType` (plus
/// `data-videoId` for YouTube). Direct-file sources get their
/// `<video>` element up front; the YouTube hosting container is only
/// created on open.
pub fn build_modal(
    doc: &mut Document,
    parent: NodeId,
    source: VideoSource,
) -> Result<ModalController, ModalError> {
    if source.kind == VideoKind::ExternalEmbeddable {
        return Err(ModalError::NotModalSource(source.kind));
    }

    let overlay = doc.create_element("div");
    doc.add_class(overlay, OVERLAY_CLASS);

    let header = doc.create_element("div");
    doc.add_class(header, "video-header");
    let close = doc.create_element("button");
    doc.add_class(close, CLOSE_CLASS);
    doc.set_text(close, "Close");
    doc.append_child(header, close);
    doc.append_child(overlay, header);

    let content = doc.create_element("div");
    doc.add_class(content, CONTENT_CLASS);

    let mut native = None;
    match source.kind {
        VideoKind::Youtube => {
            doc.set_attr(content, VIDEO_TYPE_ATTR, "youtube");
            if let Some(video_id) = &source.video_id {
                doc.set_attr(content, VIDEO_ID_ATTR, video_id);
            }
        }
        VideoKind::DirectFile => {
            doc.set_attr(content, VIDEO_TYPE_ATTR, "video");
            let video = doc.create_element("video");
            doc.set_attr(video, "src", &source.href);
            doc.append_child(content, video);
            native = Some(NativeVideoPlayer::new(video));
        }
        VideoKind::ExternalEmbeddable => unreachable!("rejected above"),
    }
    doc.append_child(overlay, content);
    doc.append_child(parent, overlay);

    Ok(ModalController {
        overlay,
        content,
        source,
        is_open: false,
        session: None,
        native,
        sdk_pending: false,
    })
}

impl ModalController {
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn source(&self) -> &VideoSource {
        &self.source
    }

    pub fn overlay(&self) -> NodeId {
        self.overlay
    }

    pub fn content_pane(&self) -> NodeId {
        self.content
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a player creation is parked on the SDK becoming ready.
    pub fn is_awaiting_sdk(&self) -> bool {
        self.sdk_pending
    }

    pub fn native(&self) -> Option<&NativeVideoPlayer> {
        self.native.as_ref()
    }

    pub fn native_mut(&mut self) -> Option<&mut NativeVideoPlayer> {
        self.native.as_mut()
    }

    /// The one externally invoked operation: transition to open or
    /// closed. Calling open on an already-open modal re-runs the open
    /// branch and re-initializes the player (source behavior,
    /// intentionally preserved); the prior session is disposed first
    /// so no instance leaks.
    pub fn toggle(
        &mut self,
        doc: &mut Document,
        sdk: &SdkLoader,
        open: bool,
    ) -> Result<ToggleOutcome, ModalError> {
        if !doc.is_attached(self.overlay) {
            return Err(ModalError::MissingOverlay);
        }
        if open {
            self.open(doc, sdk)
        } else {
            self.close(doc)
        }
    }

    fn open(&mut self, doc: &mut Document, sdk: &SdkLoader) -> Result<ToggleOutcome, ModalError> {
        doc.add_class(self.overlay, OPEN_CLASS);
        self.is_open = true;

        match self.source.kind {
            VideoKind::Youtube => {
                let Some(video_id) = self.source.video_id.clone() else {
                    // Unparsable id: the modal opens, nothing plays.
                    warn!(
                        "opened YouTube modal with no parsable video id ({})",
                        self.source.href
                    );
                    return Ok(ToggleOutcome::Opened);
                };
                if !doc.is_attached(self.content) {
                    return Err(ModalError::MissingContentPane);
                }

                // Re-opening rebuilds the hosting container from
                // scratch; any prior session goes with it.
                self.dispose_session(doc);
                doc.clear_children(self.content);
                let container = doc.create_element("div");
                doc.set_attr(container, "id", &frame_container_id(&video_id));
                doc.append_child(self.content, container);

                let rx = sdk.ensure_loaded(doc);
                if *rx.borrow() == SdkLoadState::Ready {
                    self.create_session(sdk, container, &video_id);
                    Ok(ToggleOutcome::Opened)
                } else {
                    self.sdk_pending = true;
                    debug!("player creation deferred until SDK is ready");
                    Ok(ToggleOutcome::OpenedAwaitingSdk)
                }
            }
            VideoKind::DirectFile => {
                if let Some(native) = &mut self.native {
                    native.play();
                }
                Ok(ToggleOutcome::Opened)
            }
            VideoKind::ExternalEmbeddable => {
                // Unreachable through build_modal; left as a no-op.
                warn!("toggle(open) on an embeddable source does nothing");
                Ok(ToggleOutcome::Opened)
            }
        }
    }

    fn close(&mut self, doc: &mut Document) -> Result<ToggleOutcome, ModalError> {
        doc.remove_class(self.overlay, OPEN_CLASS);
        self.is_open = false;

        match self.source.kind {
            VideoKind::Youtube => {
                // A ready notification arriving from here on finds the
                // wait cancelled and constructs nothing.
                self.sdk_pending = false;
                self.dispose_session(doc);
                // A container built while the SDK was still loading
                // has no session yet; remove it by its derived id.
                if let Some(video_id) = &self.source.video_id {
                    if let Some(container) =
                        doc.find_by_id(self.content, &frame_container_id(video_id))
                    {
                        doc.detach(container);
                    }
                }
            }
            VideoKind::DirectFile => {
                if let Some(native) = &mut self.native {
                    native.pause();
                    native.seek(0.0);
                }
            }
            VideoKind::ExternalEmbeddable => {}
        }
        Ok(ToggleOutcome::Closed)
    }

    /// Deliver the SDK's ready notification.
    ///
    /// Creates the deferred player session if this modal is still open
    /// and still waiting; returns `false` (and does nothing) for a
    /// late notification after close or when no wait is outstanding.
    pub fn handle_sdk_ready(&mut self, doc: &mut Document, sdk: &SdkLoader) -> bool {
        if !self.sdk_pending || !self.is_open {
            debug!("SDK ready notification with no outstanding wait; ignoring");
            return false;
        }
        self.sdk_pending = false;

        let Some(video_id) = self.source.video_id.clone() else {
            return false;
        };
        match doc.find_by_id(self.content, &frame_container_id(&video_id)) {
            Some(container) => {
                self.create_session(sdk, container, &video_id);
                true
            }
            None => {
                warn!("hosting container vanished before the SDK became ready");
                false
            }
        }
    }

    fn create_session(&mut self, sdk: &SdkLoader, container: NodeId, video_id: &str) {
        // Paired create/dispose keeps the single-session invariant.
        if let Some(mut stale) = self.session.take() {
            stale.player.stop();
        }
        let container_id = frame_container_id(video_id);
        let player = EmbedPlayer::create(&container_id, video_id, sdk.embed_defaults());
        info!("player session created for {video_id}");
        self.session = Some(PlayerSession { container, player });
    }

    fn dispose_session(&mut self, doc: &mut Document) {
        if let Some(mut session) = self.session.take() {
            session.player.stop();
            // Removing the hosting container is what actually discards
            // the player instance.
            doc.detach(session.container);
            debug!("player session disposed for {}", session.player.video_id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SdkConfig;
    use crate::dom::Document;

    fn setup(href: &str) -> (Document, SdkLoader, ModalController) {
        let mut doc = Document::new();
        let root = doc.root();
        let source = VideoSource::classify(href).expect("classifiable href");
        let modal = build_modal(&mut doc, root, source).expect("modal builds");
        (doc, SdkLoader::new(SdkConfig::default()), modal)
    }

    #[test]
    fn test_embeddable_source_is_rejected() {
        let mut doc = Document::new();
        let root = doc.root();
        let source = VideoSource::classify("https://vimeo.com/123").unwrap();
        assert!(matches!(
            build_modal(&mut doc, root, source),
            Err(ModalError::NotModalSource(_))
        ));
    }

    #[test]
    fn test_youtube_open_close_cycle() {
        let (mut doc, sdk, mut modal) = setup("https://youtu.be/dQw4w9WgXcQ");
        let root = doc.root();

        let outcome = modal.toggle(&mut doc, &sdk, true).unwrap();
        assert_eq!(outcome, ToggleOutcome::OpenedAwaitingSdk);
        assert!(doc.has_class(modal.overlay(), OPEN_CLASS));
        assert!(doc.find_by_id(root, "ytFrame-dQw4w9WgXcQ").is_some());
        assert!(!modal.has_session());

        sdk.notify_ready();
        assert!(modal.handle_sdk_ready(&mut doc, &sdk));
        assert!(modal.has_session());

        let outcome = modal.toggle(&mut doc, &sdk, false).unwrap();
        assert_eq!(outcome, ToggleOutcome::Closed);
        assert!(!doc.has_class(modal.overlay(), OPEN_CLASS));
        assert!(doc.find_by_id(root, "ytFrame-dQw4w9WgXcQ").is_none());
        assert!(!modal.has_session());
    }

    #[test]
    fn test_sdk_loaded_once_across_cycles() {
        let (mut doc, sdk, mut modal) = setup("https://youtu.be/dQw4w9WgXcQ");

        modal.toggle(&mut doc, &sdk, true).unwrap();
        sdk.notify_ready();
        modal.handle_sdk_ready(&mut doc, &sdk);
        modal.toggle(&mut doc, &sdk, false).unwrap();

        // Later cycles find the SDK already loaded.
        for _ in 0..3 {
            let outcome = modal.toggle(&mut doc, &sdk, true).unwrap();
            assert_eq!(outcome, ToggleOutcome::Opened);
            assert!(modal.has_session());
            modal.toggle(&mut doc, &sdk, false).unwrap();
        }
        assert_eq!(sdk.state(), SdkLoadState::Ready);

        let scripts = doc
            .descendants(doc.root())
            .into_iter()
            .filter(|&n| doc.tag(n) == "script")
            .count();
        assert_eq!(scripts, 1);
    }

    #[test]
    fn test_double_open_reinitializes_player() {
        let (mut doc, sdk, mut modal) = setup("https://youtu.be/dQw4w9WgXcQ");
        let root = doc.root();

        modal.toggle(&mut doc, &sdk, true).unwrap();
        sdk.notify_ready();
        modal.handle_sdk_ready(&mut doc, &sdk);
        let first_container = doc.find_by_id(root, "ytFrame-dQw4w9WgXcQ").unwrap();

        // Open again without closing: the container is rebuilt and a
        // fresh session replaces the old one.
        let outcome = modal.toggle(&mut doc, &sdk, true).unwrap();
        assert_eq!(outcome, ToggleOutcome::Opened);
        let second_container = doc.find_by_id(root, "ytFrame-dQw4w9WgXcQ").unwrap();
        assert_ne!(first_container, second_container);
        assert!(modal.has_session());
        assert!(!doc.is_attached(first_container));
    }

    #[test]
    fn test_close_while_awaiting_sdk_removes_container() {
        let (mut doc, sdk, mut modal) = setup("https://youtu.be/dQw4w9WgXcQ");
        let root = doc.root();

        modal.toggle(&mut doc, &sdk, true).unwrap();
        assert!(doc.find_by_id(root, "ytFrame-dQw4w9WgXcQ").is_some());

        // No session exists yet; the container still has to go.
        modal.toggle(&mut doc, &sdk, false).unwrap();
        assert!(doc.find_by_id(root, "ytFrame-dQw4w9WgXcQ").is_none());
    }

    #[test]
    fn test_late_sdk_ready_after_close_is_noop() {
        let (mut doc, sdk, mut modal) = setup("https://youtu.be/dQw4w9WgXcQ");

        modal.toggle(&mut doc, &sdk, true).unwrap();
        modal.toggle(&mut doc, &sdk, false).unwrap();

        sdk.notify_ready();
        assert!(!modal.handle_sdk_ready(&mut doc, &sdk));
        assert!(!modal.has_session());
    }

    #[test]
    fn test_unparsable_id_opens_without_player() {
        let (mut doc, sdk, mut modal) = setup("https://www.youtube.com/feed/trending");

        let outcome = modal.toggle(&mut doc, &sdk, true).unwrap();
        assert_eq!(outcome, ToggleOutcome::Opened);
        assert!(modal.is_open());
        assert!(!modal.has_session());
        // Nothing to play, so the SDK was never requested.
        assert_eq!(sdk.state(), SdkLoadState::NotRequested);
    }

    #[test]
    fn test_direct_file_close_resets_position() {
        let (mut doc, sdk, mut modal) = setup("https://example.com/clip.mp4");

        modal.toggle(&mut doc, &sdk, true).unwrap();
        assert!(!modal.native().unwrap().is_paused());

        // Simulate playback progress, then close.
        modal.native_mut().unwrap().seek(42.0);
        modal.toggle(&mut doc, &sdk, false).unwrap();
        let native = modal.native().unwrap();
        assert!(native.is_paused());
        assert_eq!(native.position(), 0.0);

        // Reopening starts from the beginning.
        modal.toggle(&mut doc, &sdk, true).unwrap();
        assert_eq!(modal.native().unwrap().position(), 0.0);
    }

    #[test]
    fn test_toggle_on_detached_overlay_fails() {
        let (mut doc, sdk, mut modal) = setup("https://example.com/clip.mp4");
        doc.detach(modal.overlay());
        assert!(matches!(
            modal.toggle(&mut doc, &sdk, true),
            Err(ModalError::MissingOverlay)
        ));
    }
}
