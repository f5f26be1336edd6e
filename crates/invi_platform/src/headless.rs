//! In-memory document host
//!
//! `HeadlessDocument` keeps a tree of elements with tags, ids, classes,
//! attributes, inline styles and fixed widths. It records which pointer
//! listeners are bound and which elements have an armed transition-end
//! request, so a driver (test, simulator) can play the part of the browser:
//! forward pointer events, and fire [`finish_transition`] when an animation
//! would have completed.
//!
//! [`finish_transition`]: HeadlessDocument::finish_transition

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::error::{PlatformError, Result};
use crate::host::{Capabilities, Host, NodeId, PointerListener};
use crate::selector::{Matchable, Selector};
use crate::style::StyleProperty;

struct Node {
    tag: String,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    attributes: FxHashMap<String, String>,
    styles: FxHashMap<&'static str, String>,
    text: String,
    width: f32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: SmallVec::new(),
            attributes: FxHashMap::default(),
            styles: FxHashMap::default(),
            text: String::new(),
            width: 0.0,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl Matchable for Node {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// In-memory [`Host`] implementation
pub struct HeadlessDocument {
    nodes: SlotMap<NodeId, Node>,
    body: NodeId,
    listeners: FxHashSet<(NodeId, PointerListener)>,
    armed: FxHashSet<NodeId>,
    capabilities: Capabilities,
    /// Count of style, class and tree mutations applied through [`Host`]
    mutations: u64,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    /// Empty document with a `body` element and default capabilities
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::default())
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node::new("body"));
        Self {
            nodes,
            body,
            listeners: FxHashSet::default(),
            armed: FxHashSet::default(),
            capabilities,
            mutations: 0,
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(Node::new(tag))
    }

    /// Create an element and append it to `parent`
    pub fn append_new(&mut self, parent: NodeId, tag: &str) -> Result<NodeId> {
        let node = self.create_element(tag);
        self.append_child(parent, node)?;
        Ok(node)
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) -> Result<()> {
        self.node_mut(node)?.id = Some(id.to_string());
        Ok(())
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.node_mut(node)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.node_mut(node)?.text = text.to_string();
        Ok(())
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|n| n.text.as_str())
    }

    /// Fix the measured width of an element
    pub fn set_width(&mut self, node: NodeId, width: f32) -> Result<()> {
        self.node_mut(node)?.width = width;
        Ok(())
    }

    /// Inline style value by standard property name
    pub fn style(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node)
            .and_then(|n| n.styles.get(name))
            .map(String::as_str)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes.get(node).is_some_and(|n| n.has_class(class))
    }

    pub fn is_listening(&self, node: NodeId, listener: PointerListener) -> bool {
        self.listeners.contains(&(node, listener))
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_armed(&self, node: NodeId) -> bool {
        self.armed.contains(&node)
    }

    /// Complete the transition running on `node`
    ///
    /// Returns `true` if a transition-end request was armed; the request is
    /// consumed, so the caller should forward exactly one notification to
    /// the widget.
    pub fn finish_transition(&mut self, node: NodeId) -> bool {
        self.armed.remove(&node)
    }

    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    /// Texts of `parent`'s children, in order
    pub fn child_texts(&self, parent: NodeId) -> Vec<&str> {
        self.children(parent)
            .into_iter()
            .filter_map(|child| self.text(child))
            .collect()
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(node)
            .ok_or(PlatformError::UnknownNode(node))
    }

    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = &Node> + '_ {
        std::iter::successors(self.nodes.get(node).and_then(|n| n.parent), move |id| {
            self.nodes.get(*id).and_then(|n| n.parent)
        })
        .filter_map(move |id| self.nodes.get(id))
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        std::iter::successors(Some(node), |id| self.nodes.get(*id).and_then(|n| n.parent))
            .any(|id| id == candidate)
    }

    /// Descendants of `scope` in document (pre-)order, excluding `scope`
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .nodes
            .get(scope)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn matching(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(selector) = Selector::parse(selector) else {
            tracing::warn!("unsupported selector `{}`", selector);
            return Vec::new();
        };
        self.descendants(scope)
            .into_iter()
            .filter(|id| {
                self.nodes
                    .get(*id)
                    .is_some_and(|node| selector.matches(node, self.ancestors(*id)))
            })
            .collect()
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|child| *child != node);
        }
        if let Some(node) = self.nodes.get_mut(node) {
            node.parent = None;
        }
    }

    fn check_move(&self, parent: NodeId, node: NodeId) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(PlatformError::UnknownNode(parent));
        }
        if !self.nodes.contains_key(node) {
            return Err(PlatformError::UnknownNode(node));
        }
        if self.is_ancestor_or_self(node, parent) {
            return Err(PlatformError::Cycle(node));
        }
        Ok(())
    }
}

impl Host for HeadlessDocument {
    fn query_selector(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.matching(scope, selector).into_iter().next()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.matching(self.body, selector)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn offset_width(&self, node: NodeId) -> f32 {
        self.nodes.get(node).map_or(0.0, |n| n.width)
    }

    fn set_style(&mut self, node: NodeId, property: StyleProperty) -> Result<()> {
        self.node_mut(node)?
            .styles
            .insert(property.name(), property.value());
        self.mutations += 1;
        Ok(())
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        let node = self.node_mut(node)?;
        if !node.has_class(class) {
            node.classes.push(class.to_string());
        }
        self.mutations += 1;
        Ok(())
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.node_mut(node)?.classes.retain(|c| c != class);
        self.mutations += 1;
        Ok(())
    }

    fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: NodeId) -> Result<()> {
        self.check_move(parent, node)?;
        if node == reference {
            return Ok(());
        }
        if self.parent(reference) != Some(parent) {
            return Err(PlatformError::NotAChild {
                parent,
                node: reference,
            });
        }

        self.detach(node);
        let siblings = &mut self.node_mut(parent)?.children;
        let index = siblings
            .iter()
            .position(|child| *child == reference)
            .unwrap_or(siblings.len());
        siblings.insert(index, node);
        self.node_mut(node)?.parent = Some(parent);
        self.mutations += 1;
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        self.check_move(parent, node)?;
        self.detach(node);
        self.node_mut(parent)?.children.push(node);
        self.node_mut(node)?.parent = Some(parent);
        self.mutations += 1;
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn arm_transition_end(&mut self, node: NodeId) -> Result<()> {
        if !self.capabilities.transition_end {
            return Err(PlatformError::Unsupported("transition end".to_string()));
        }
        self.node_mut(node)?;
        self.armed.insert(node);
        Ok(())
    }

    fn disarm_transition_end(&mut self, node: NodeId) {
        self.armed.remove(&node);
    }

    fn listen(&mut self, node: NodeId, listener: PointerListener) -> Result<()> {
        self.node_mut(node)?;
        self.listeners.insert((node, listener));
        Ok(())
    }

    fn unlisten(&mut self, node: NodeId, listener: PointerListener) {
        self.listeners.remove(&(node, listener));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(doc: &mut HeadlessDocument, count: usize) -> (NodeId, Vec<NodeId>) {
        let body = doc.body();
        let ul = doc.append_new(body, "ul").unwrap();
        let items = (0..count)
            .map(|i| {
                let li = doc.append_new(ul, "li").unwrap();
                doc.set_text(li, &format!("item {}", i + 1)).unwrap();
                li
            })
            .collect();
        (ul, items)
    }

    #[test]
    fn test_query_in_document_order() {
        let mut doc = HeadlessDocument::new();
        let (ul, items) = list(&mut doc, 3);
        doc.add_class(items[1], "on").unwrap();

        assert_eq!(doc.query_selector(doc.body(), "li"), Some(items[0]));
        assert_eq!(doc.query_selector(doc.body(), "ul .on"), Some(items[1]));
        assert_eq!(doc.query_selector_all("li"), items);
        assert_eq!(doc.parent(items[0]), Some(ul));
        assert_eq!(doc.query_selector(items[0], "li"), None);
    }

    #[test]
    fn test_reorder_children() {
        let mut doc = HeadlessDocument::new();
        let (ul, items) = list(&mut doc, 3);

        doc.insert_before(ul, items[2], items[0]).unwrap();
        assert_eq!(doc.child_texts(ul), vec!["item 3", "item 1", "item 2"]);

        doc.append_child(ul, items[2]).unwrap();
        assert_eq!(doc.child_texts(ul), vec!["item 1", "item 2", "item 3"]);

        let stray = doc.create_element("li");
        assert!(matches!(
            doc.insert_before(ul, items[0], stray),
            Err(PlatformError::NotAChild { .. })
        ));
        assert!(matches!(
            doc.append_child(items[0], ul),
            Err(PlatformError::Cycle(_))
        ));
    }

    #[test]
    fn test_styles_and_classes_count_mutations() {
        let mut doc = HeadlessDocument::new();
        let (ul, _) = list(&mut doc, 1);
        let baseline = doc.mutation_count();

        doc.set_style(ul, StyleProperty::TranslateX(-20)).unwrap();
        doc.add_class(ul, "x").unwrap();
        doc.add_class(ul, "x").unwrap();

        assert_eq!(doc.style(ul, "transform"), Some("translateX(-20px)"));
        assert!(doc.has_class(ul, "x"));
        assert_eq!(doc.mutation_count() - baseline, 3);
    }

    #[test]
    fn test_transition_end_is_one_shot() {
        let mut doc = HeadlessDocument::new();
        let (ul, _) = list(&mut doc, 1);

        doc.arm_transition_end(ul).unwrap();
        assert!(doc.finish_transition(ul));
        assert!(!doc.finish_transition(ul));

        let mut bare = HeadlessDocument::with_capabilities(Capabilities {
            transition_end: false,
            touch: false,
        });
        let body = bare.body();
        assert!(bare.arm_transition_end(body).is_err());
    }
}
