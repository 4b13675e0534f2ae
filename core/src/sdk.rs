use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::config::{EmbedDefaults, SdkConfig};
use crate::dom::Document;

/// Lifecycle of the external player SDK within this process.
///
/// Transitions are monotonic: `NotRequested -> Loading -> Ready`,
/// never backwards, so the script tag is injected at most once no
/// matter how many open/close cycles the modal goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkLoadState {
    NotRequested,
    Loading,
    Ready,
}

/// Lazy, at-most-once loader for the third-party player SDK.
///
/// Readiness is published on a watch channel, so any number of
/// concurrent open requests can wait on the one in-flight load
/// instead of overwriting each other. There is no timeout: if the SDK
/// never calls back, waiters stall and the modal stays open with no
/// player.
pub struct SdkLoader {
    config: SdkConfig,
    state: Mutex<SdkLoadState>,
    tx: watch::Sender<SdkLoadState>,
}

impl SdkLoader {
    pub fn new(config: SdkConfig) -> Self {
        let (tx, _rx) = watch::channel(SdkLoadState::NotRequested);
        Self {
            config,
            state: Mutex::new(SdkLoadState::NotRequested),
            tx,
        }
    }

    pub fn state(&self) -> SdkLoadState {
        *self.state.lock()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == SdkLoadState::Ready
    }

    pub fn embed_defaults(&self) -> &EmbedDefaults {
        &self.config.embed
    }

    /// Request the SDK, injecting its script tag into `doc` on the
    /// first call only. The returned receiver already reads the
    /// current state; waiters watch it until it reports
    /// [`SdkLoadState::Ready`].
    pub fn ensure_loaded(&self, doc: &mut Document) -> watch::Receiver<SdkLoadState> {
        let mut state = self.state.lock();
        if *state == SdkLoadState::NotRequested {
            *state = SdkLoadState::Loading;
            self.inject_script(doc);
            let _ = self.tx.send_replace(SdkLoadState::Loading);
            info!(
                "player SDK load requested: {} (ready callback {})",
                self.config.script_url, self.config.ready_callback
            );
        }
        self.tx.subscribe()
    }

    /// Subscribe to readiness without requesting a load.
    pub fn subscribe(&self) -> watch::Receiver<SdkLoadState> {
        self.tx.subscribe()
    }

    /// Entry point for the SDK's global ready callback.
    ///
    /// Only a `Loading -> Ready` transition is accepted; the state
    /// never reverts and stray callbacks are ignored.
    pub fn notify_ready(&self) {
        let mut state = self.state.lock();
        match *state {
            SdkLoadState::Loading => {
                *state = SdkLoadState::Ready;
                let _ = self.tx.send_replace(SdkLoadState::Ready);
                info!("player SDK ready");
            }
            SdkLoadState::NotRequested => {
                warn!("SDK ready callback fired before any load request; ignoring");
            }
            SdkLoadState::Ready => {
                debug!("duplicate SDK ready callback ignored");
            }
        }
    }

    fn inject_script(&self, doc: &mut Document) {
        let script = doc.create_element("script");
        doc.set_attr(script, "src", &self.config.script_url);
        doc.set_attr(script, "data-ready-callback", &self.config.ready_callback);
        let root = doc.root();
        doc.append_child(root, script);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_tag_count(doc: &Document) -> usize {
        doc.descendants(doc.root())
            .into_iter()
            .filter(|&n| doc.tag(n) == "script")
            .count()
    }

    #[test]
    fn test_script_injected_exactly_once() {
        let loader = SdkLoader::new(SdkConfig::default());
        let mut doc = Document::new();

        let _rx = loader.ensure_loaded(&mut doc);
        loader.notify_ready();
        let _rx = loader.ensure_loaded(&mut doc);
        let _rx = loader.ensure_loaded(&mut doc);

        assert_eq!(script_tag_count(&doc), 1);
        assert_eq!(loader.state(), SdkLoadState::Ready);
    }

    #[test]
    fn test_ready_before_request_is_ignored() {
        let loader = SdkLoader::new(SdkConfig::default());
        loader.notify_ready();
        assert_eq!(loader.state(), SdkLoadState::NotRequested);
    }

    #[test]
    fn test_waiter_sees_ready_after_notify() {
        let loader = SdkLoader::new(SdkConfig::default());
        let mut doc = Document::new();

        let rx = loader.ensure_loaded(&mut doc);
        assert_eq!(*rx.borrow(), SdkLoadState::Loading);

        loader.notify_ready();
        assert_eq!(*rx.borrow(), SdkLoadState::Ready);
    }

    #[test]
    fn test_state_is_monotonic_across_duplicate_callbacks() {
        let loader = SdkLoader::new(SdkConfig::default());
        let mut doc = Document::new();
        let _rx = loader.ensure_loaded(&mut doc);
        loader.notify_ready();
        loader.notify_ready();
        assert_eq!(loader.state(), SdkLoadState::Ready);
    }
}
