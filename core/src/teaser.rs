//! One-time transform of a raw teaser block into text pane, image
//! pane and play control, with a modal wired up for sources that play
//! in one.
//!
//! Decoration is stateless and runs exactly once per block at mount
//! time. Missing pieces (no heading, no image, no anchor) are each
//! tolerated on their own; whatever is present still gets decorated.

use log::{debug, info};
use thiserror::Error;

use crate::dom::{Document, NodeId};
use crate::modal::{self, ModalController};
use crate::{VideoKind, VideoSource};

pub const TEXT_PANE_CLASS: &str = "video-text";
pub const IMAGE_PANE_CLASS: &str = "video-image";
pub const SINGLE_CLASS: &str = "single";
pub const LEFT_ALIGN_CLASS: &str = "align-left";
pub const PLAY_CLASS: &str = "video-play";
pub const EXTERNAL_CLASS: &str = "video-external";

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

#[derive(Debug, Error)]
pub enum TeaserError {
    /// The block was removed from the page before decoration ran; a
    /// host-page programming error.
    #[error("teaser block is not attached to the page")]
    DetachedBlock,
}

/// Result of decorating one teaser block.
///
/// The caller wires its activation events to the controller: play
/// control -> `toggle(open)`, close control -> `toggle(closed)`.
/// External-embeddable links get no modal; their anchor becomes a
/// new-tab link instead.
pub struct DecoratedTeaser {
    pub block: NodeId,
    pub text_pane: Option<NodeId>,
    pub image_pane: Option<NodeId>,
    pub play_control: Option<NodeId>,
    pub modal: Option<ModalController>,
}

/// Decorate `block` in place.
pub fn decorate(doc: &mut Document, block: NodeId) -> Result<DecoratedTeaser, TeaserError> {
    if !doc.is_attached(block) {
        return Err(TeaserError::DetachedBlock);
    }

    let columns: Vec<NodeId> = doc.children(block).to_vec();
    if columns.len() == 1 {
        unwrap_paragraphs(doc, columns[0]);
    }

    // Pane classification: a heading marks the text pane, an image the
    // image pane. Either may be absent.
    let text_pane = columns.iter().copied().find(|&col| contains_heading(doc, col));
    let image_pane = columns
        .iter()
        .copied()
        .find(|&col| doc.find_by_tag(col, "img").is_some());

    if let Some(pane) = text_pane {
        doc.add_class(pane, TEXT_PANE_CLASS);
        if doc.children(block).first() == Some(&pane) {
            doc.add_class(pane, LEFT_ALIGN_CLASS);
        }
    }
    if let Some(pane) = image_pane {
        doc.add_class(pane, IMAGE_PANE_CLASS);
        if text_pane.is_none() {
            doc.add_class(pane, SINGLE_CLASS);
        }
    }

    let mut play_control = None;
    let mut modal = None;
    if let Some(pane) = image_pane {
        if let Some((anchor, source)) = classified_anchor(doc, pane) {
            match source.kind {
                VideoKind::ExternalEmbeddable => {
                    // Plain new-tab link; the modal is never built.
                    doc.set_attr(anchor, "target", "_blank");
                    doc.set_attr(anchor, "rel", "noopener");
                    doc.add_class(anchor, EXTERNAL_CLASS);
                    info!("teaser links an embeddable provider; opening in a new tab");
                }
                VideoKind::Youtube | VideoKind::DirectFile => {
                    let button = replace_anchor_with_button(doc, anchor);
                    play_control = Some(button);
                    modal = Some(
                        modal::build_modal(doc, block, source)
                            .expect("modal sources are never embeddable"),
                    );
                }
            }
        } else {
            debug!("image pane has no classifiable video link; leaving it as-is");
        }
    }

    Ok(DecoratedTeaser {
        block,
        text_pane,
        image_pane,
        play_control,
        modal,
    })
}

/// Markup normalization for single-column teasers: paragraph wrappers
/// are dropped and their content hoisted into the column.
fn unwrap_paragraphs(doc: &mut Document, column: NodeId) {
    let children: Vec<NodeId> = doc.children(column).to_vec();
    if !children.iter().any(|&c| doc.tag(c) == "p") {
        return;
    }
    let mut hoisted = Vec::new();
    for child in children {
        if doc.tag(child) == "p" {
            hoisted.extend(doc.children(child).to_vec());
        } else {
            hoisted.push(child);
        }
    }
    doc.clear_children(column);
    for node in hoisted {
        doc.append_child(column, node);
    }
}

fn contains_heading(doc: &Document, node: NodeId) -> bool {
    HEADING_TAGS
        .iter()
        .any(|tag| doc.find_by_tag(node, tag).is_some())
}

/// The image pane's anchor together with its classified source, if
/// both the anchor and a classification exist.
fn classified_anchor(doc: &Document, pane: NodeId) -> Option<(NodeId, VideoSource)> {
    let anchor = doc.find_by_tag(pane, "a")?;
    let href = doc.attr(anchor, "href")?;
    let source = VideoSource::classify(href)?;
    Some((anchor, source))
}

/// Swap the anchor for a play button, keeping the anchor's content
/// (the teaser image) inside the new control.
fn replace_anchor_with_button(doc: &mut Document, anchor: NodeId) -> NodeId {
    let button = doc.create_element("button");
    doc.add_class(button, PLAY_CLASS);
    for child in doc.children(anchor).to_vec() {
        doc.append_child(button, child);
    }
    doc.replace(anchor, button);
    button
}
