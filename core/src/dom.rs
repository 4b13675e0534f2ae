//! Minimal mutable element tree the decorator and modal controller
//! operate on.
//!
//! The real page owns the markup; this arena models just enough of it
//! (tags, classes, attributes, text, parent/child links) for the state
//! machine to create, re-parent and discard elements, and for callers
//! to inspect the result. Detaching a subtree makes it unreachable
//! from the root, which is how a hosting container and the player
//! bound to it are actually discarded.

use std::collections::BTreeMap;

/// Handle to an element in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: None,
            children: Vec::new(),
            parent: None,
        }
    }
}

/// Arena-backed element tree with a fixed root.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root_node = Node::new("body");
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element. It is invisible to lookups until
    /// appended somewhere under the root.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(tag));
        id
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Append `child` as the last child of `parent`, detaching it from
    /// any previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Swap `new` into `old`'s position; `old` ends up detached.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        let Some(parent) = self.nodes[old.0].parent else {
            return;
        };
        self.detach(new);
        let children = &mut self.nodes[parent.0].children;
        if let Some(pos) = children.iter().position(|&c| c == old) {
            children[pos] = new;
            self.nodes[new.0].parent = Some(parent);
            self.nodes[old.0].parent = None;
        }
    }

    /// Remove `node` from its parent. The subtree stays intact but is
    /// no longer reachable from the root.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Whether `node` is reachable from the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.0].text = Some(text.to_string());
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].text.as_deref()
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attrs.get(name).map(String::as_str)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    /// Descendants of `start` in document order, excluding `start`.
    pub fn descendants(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[start.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    pub fn find_by_tag(&self, start: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(start)
            .into_iter()
            .find(|&n| self.nodes[n.0].tag == tag)
    }

    pub fn find_by_id(&self, start: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(start)
            .into_iter()
            .find(|&n| self.attr(n, "id") == Some(id))
    }

    /// Serialize a subtree as indented HTML-ish markup.
    pub fn render_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.render_into(node, 0, &mut out);
        out
    }

    fn render_into(&self, node: NodeId, depth: usize, out: &mut String) {
        let data = &self.nodes[node.0];
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&data.tag);
        if !data.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", data.classes.join(" ")));
        }
        for (name, value) in &data.attrs {
            out.push_str(&format!(" {}=\"{}\"", name, value));
        }
        out.push('>');
        if let Some(text) = &data.text {
            out.push_str(text);
        }
        if data.children.is_empty() {
            out.push_str(&format!("</{}>\n", data.tag));
        } else {
            out.push('\n');
            for &child in &data.children {
                self.render_into(child, depth + 1, out);
            }
            out.push_str(&format!("{}</{}>\n", indent, data.tag));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detach_makes_subtree_unreachable() {
        let mut doc = Document::new();
        let pane = doc.create_element("div");
        let frame = doc.create_element("div");
        doc.set_attr(frame, "id", "ytFrame-abc");
        let root = doc.root();
        doc.append_child(root, pane);
        doc.append_child(pane, frame);

        assert!(doc.is_attached(frame));
        assert_eq!(doc.find_by_id(root, "ytFrame-abc"), Some(frame));

        doc.detach(frame);
        assert!(!doc.is_attached(frame));
        assert_eq!(doc.find_by_id(root, "ytFrame-abc"), None);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.create_element("span");
        let anchor = doc.create_element("a");
        let last = doc.create_element("span");
        doc.append_child(root, first);
        doc.append_child(root, anchor);
        doc.append_child(root, last);

        let button = doc.create_element("button");
        doc.replace(anchor, button);

        assert_eq!(doc.children(root), &[first, button, last]);
        assert!(!doc.is_attached(anchor));
    }

    #[test]
    fn test_class_toggling() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.add_class(root, "open");
        doc.add_class(root, "open");
        assert!(doc.has_class(root, "open"));
        doc.remove_class(root, "open");
        assert!(!doc.has_class(root, "open"));
    }
}
