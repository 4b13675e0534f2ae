//! Minimal end-to-end cycle: decorate a YouTube teaser, open the
//! modal, deliver the SDK ready callback, close again.

use anyhow::Result;
use teaser_core::dom::Document;
use teaser_core::{SdkConfig, SdkLoader, decorate};

fn main() -> Result<()> {
    let mut doc = Document::new();

    // A raw teaser block: one column with a paragraph-wrapped link.
    let block = doc.create_element("div");
    doc.add_class(block, "video-teaser");
    let root = doc.root();
    doc.append_child(root, block);
    let column = doc.create_element("div");
    let paragraph = doc.create_element("p");
    let anchor = doc.create_element("a");
    doc.set_attr(anchor, "href", "https://youtu.be/dQw4w9WgXcQ");
    let img = doc.create_element("img");
    doc.set_attr(img, "src", "poster.jpg");
    doc.append_child(anchor, img);
    doc.append_child(paragraph, anchor);
    doc.append_child(column, paragraph);
    doc.append_child(block, column);

    let mut teaser = decorate(&mut doc, block)?;
    let sdk = SdkLoader::new(SdkConfig::default());

    if let Some(modal) = teaser.modal.as_mut() {
        modal.toggle(&mut doc, &sdk, true)?;
        sdk.notify_ready();
        modal.handle_sdk_ready(&mut doc, &sdk);
        println!("--- open ---");
        println!("{}", doc.render_html(root));

        modal.toggle(&mut doc, &sdk, false)?;
        println!("--- closed ---");
        println!("{}", doc.render_html(root));
    }

    Ok(())
}
