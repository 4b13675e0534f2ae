use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use teaser_core::dom::{Document, NodeId};
use teaser_core::{DecoratedTeaser, SdkConfig, SdkLoadState, SdkLoader, ToggleOutcome, decorate};

use crate::events::Action;

/// Demo-page state: one teaser block, its decorated result and the
/// process-wide SDK loader.
pub struct App {
    doc: Document,
    teaser: DecoratedTeaser,
    sdk: Arc<SdkLoader>,
    /// Simulated latency between the SDK load request and its ready
    /// callback. `None` means the callback only fires on an explicit
    /// `ready` action.
    ready_delay: Option<Duration>,
}

impl App {
    /// Build the demo page around `href` and decorate it.
    pub fn new(
        href: &str,
        heading: Option<&str>,
        config: SdkConfig,
        ready_delay: Option<Duration>,
    ) -> Result<Self> {
        let mut doc = Document::new();
        let block = build_demo_block(&mut doc, href, heading);
        let teaser = decorate(&mut doc, block).context("failed to decorate teaser block")?;
        Ok(Self {
            doc,
            teaser,
            sdk: Arc::new(SdkLoader::new(config)),
            ready_delay,
        })
    }

    pub async fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Open => self.open().await,
            Action::Close => self.close(),
            Action::SdkReady => {
                self.sdk.notify_ready();
                self.deliver_ready();
                Ok(())
            }
            Action::Seek(secs) => {
                match self.modal_mut()?.native_mut() {
                    Some(native) => native.seek(secs),
                    None => warn!("seek only applies to direct-file teasers"),
                }
                Ok(())
            }
        }
    }

    async fn open(&mut self) -> Result<()> {
        let modal = self
            .teaser
            .modal
            .as_mut()
            .ok_or_else(|| anyhow!("this teaser has no modal to open"))?;
        let outcome = modal.toggle(&mut self.doc, &self.sdk, true)?;
        info!("modal open: {outcome:?}");

        if outcome == ToggleOutcome::OpenedAwaitingSdk {
            if let Some(delay) = self.ready_delay {
                // Simulated SDK: call back after the configured delay.
                let sdk = Arc::clone(&self.sdk);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    sdk.notify_ready();
                });
                self.wait_for_sdk().await?;
                self.deliver_ready();
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let modal = self
            .teaser
            .modal
            .as_mut()
            .ok_or_else(|| anyhow!("this teaser has no modal"))?;
        modal.toggle(&mut self.doc, &self.sdk, false)?;
        info!("modal closed");
        Ok(())
    }

    async fn wait_for_sdk(&self) -> Result<()> {
        let mut rx = self.sdk.subscribe();
        while *rx.borrow_and_update() != SdkLoadState::Ready {
            rx.changed()
                .await
                .map_err(|_| anyhow!("SDK loader went away"))?;
        }
        Ok(())
    }

    /// Route the readiness notification to the modal; late deliveries
    /// after close are dropped by the controller itself.
    fn deliver_ready(&mut self) {
        if let Some(modal) = self.teaser.modal.as_mut() {
            if modal.handle_sdk_ready(&mut self.doc, &self.sdk) {
                info!("deferred player session created");
            }
        }
    }

    fn modal_mut(&mut self) -> Result<&mut teaser_core::ModalController> {
        self.teaser
            .modal
            .as_mut()
            .ok_or_else(|| anyhow!("this teaser has no modal"))
    }

    pub fn render(&self) -> String {
        self.doc.render_html(self.doc.root())
    }

    /// One status line per applied action, printed by the demo loop.
    pub fn status(&self) -> String {
        match &self.teaser.modal {
            None => "no modal (plain link teaser)".to_string(),
            Some(modal) => {
                let video = modal
                    .native()
                    .map(|n| {
                        format!(
                            " | video at {:.1}s{}",
                            n.position(),
                            if n.is_paused() { " (paused)" } else { "" }
                        )
                    })
                    .unwrap_or_default();
                format!(
                    "modal {} | sdk {:?} | session {}{}",
                    if modal.is_open() { "open" } else { "closed" },
                    self.sdk.state(),
                    if modal.has_session() { "active" } else { "none" },
                    video,
                )
            }
        }
    }
}

/// The teaser block from the spec's end-to-end scenario: a single
/// image+link column, optionally preceded by a heading column.
fn build_demo_block(doc: &mut Document, href: &str, heading: Option<&str>) -> NodeId {
    let block = doc.create_element("div");
    doc.add_class(block, "video-teaser");
    let root = doc.root();
    doc.append_child(root, block);

    if let Some(text) = heading {
        let column = doc.create_element("div");
        let h2 = doc.create_element("h2");
        doc.set_text(h2, text);
        doc.append_child(column, h2);
        doc.append_child(block, column);
    }

    let column = doc.create_element("div");
    let paragraph = doc.create_element("p");
    let anchor = doc.create_element("a");
    doc.set_attr(anchor, "href", href);
    let img = doc.create_element("img");
    doc.set_attr(img, "src", "poster.jpg");
    doc.append_child(anchor, img);
    doc.append_child(paragraph, anchor);
    doc.append_child(column, paragraph);
    doc.append_child(block, column);
    block
}
