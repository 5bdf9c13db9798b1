//! Minimal browser-window document: a palette, two toolbars, and elements.

use std::collections::BTreeMap;

use crate::host::{HostError, NodeId, Window, WindowId};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    live: bool,
}

/// In-memory window with a `navigator-toolbox` holding a palette, a `nav-bar`
/// (back button, URL bar, search box) and an empty `addon-bar`.
#[derive(Debug)]
pub struct HeadlessWindow {
    id: WindowId,
    location: String,
    closed: bool,
    broken: bool,
    nodes: Vec<Node>,
    /// Slots released by `remove_children`, reused by later creations.
    free: Vec<NodeId>,
    root: NodeId,
    palette: NodeId,
    toolbars: Vec<NodeId>,
    persisted: Vec<(String, String, String)>,
    dialogs: Vec<String>,
}

impl HeadlessWindow {
    pub fn new(id: WindowId, location: &str) -> Self {
        let mut window = Self {
            id,
            location: location.to_string(),
            closed: false,
            broken: false,
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            palette: NodeId(0),
            toolbars: Vec::new(),
            persisted: Vec::new(),
            dialogs: Vec::new(),
        };
        window.root = window.push_node("window", None);
        let toolbox = window.push_node("toolbox", Some("navigator-toolbox"));
        window.attach(window.root, toolbox);
        window.palette = window.push_node("toolbarpalette", Some("BrowserToolbarPalette"));
        window.attach(toolbox, window.palette);

        let nav_bar = window.push_node("toolbar", Some("nav-bar"));
        window.attach(toolbox, nav_bar);
        for item in ["back-button", "urlbar-container", "search-container"] {
            let node = window.push_node("toolbaritem", Some(item));
            window.attach(nav_bar, node);
        }
        window.set_attr(nav_bar, "currentset", "back-button,urlbar-container,search-container");

        let addon_bar = window.push_node("toolbar", Some("addon-bar"));
        window.attach(toolbox, addon_bar);
        window.set_attr(addon_bar, "currentset", "__empty");

        window.toolbars = vec![nav_bar, addon_bar];
        window
    }

    /// Sets a toolbar's saved `currentset`, as restored from a previous session.
    pub fn set_saved_layout(&mut self, toolbar_id: &str, currentset: &str) {
        if let Some(node) = self.element_by_id(toolbar_id) {
            self.set_attr(node, "currentset", currentset);
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Makes every later element creation fail.
    pub fn break_document(&mut self) {
        self.broken = true;
    }

    /// Dialog URIs opened so far.
    pub fn dialogs(&self) -> &[String] {
        &self.dialogs
    }

    /// `(element id, attribute, value)` triples persisted so far.
    pub fn persisted(&self) -> &[(String, String, String)] {
        &self.persisted
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.live_node(node).map(|n| n.tag.as_str())
    }

    /// Number of arena slots in use or free; does not grow across menu rebuilds.
    pub fn node_slots(&self) -> usize {
        self.nodes.len()
    }

    /// Id of the element `id`'s parent, if both exist.
    pub fn parent_id(&self, id: &str) -> Option<String> {
        let node = self.element_by_id(id)?;
        let parent = self.nodes[node.0].parent?;
        self.attribute(parent, "id")
    }

    fn push_node(&mut self, tag: &str, id: Option<&str>) -> NodeId {
        let mut attrs = BTreeMap::new();
        if let Some(id) = id {
            attrs.insert("id".to_string(), id.to_string());
        }
        let fresh = Node {
            tag: tag.to_string(),
            attrs,
            children: Vec::new(),
            parent: None,
            live: true,
        };
        match self.free.pop() {
            Some(node) => {
                self.nodes[node.0] = fresh;
                node
            }
            None => {
                self.nodes.push(fresh);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn live_node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.0).filter(|n| n.live)
    }

    /// Frees `node` and its whole subtree.
    fn release(&mut self, node: NodeId) {
        let slot = &mut self.nodes[node.0];
        let children = std::mem::take(&mut slot.children);
        slot.attrs.clear();
        slot.parent = None;
        slot.live = false;
        self.free.push(node);
        for child in children {
            self.release(child);
        }
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
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

    fn check(&self, node: NodeId) -> Result<(), HostError> {
        if self.closed {
            return Err(HostError::WindowClosed(self.id));
        }
        if self.live_node(node).is_none() {
            return Err(HostError::NoSuchElement(format!("node {}", node.0)));
        }
        Ok(())
    }
}

impl Window for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn location(&self) -> String {
        self.location.clone()
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError> {
        if self.closed {
            return Err(HostError::WindowClosed(self.id));
        }
        if self.broken {
            return Err(HostError::NoSuchElement(format!("cannot create <{tag}>")));
        }
        Ok(self.push_node(tag, None))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), HostError> {
        self.check(node)?;
        self.set_attr(node, name, value);
        Ok(())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.live_node(node)?.attrs.get(name).cloned()
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        self.check(parent)?;
        self.check(child)?;
        self.attach(parent, child);
        Ok(())
    }

    fn remove_children(&mut self, parent: NodeId) -> Result<(), HostError> {
        self.check(parent)?;
        for child in std::mem::take(&mut self.nodes[parent.0].children) {
            self.release(child);
        }
        Ok(())
    }

    fn remove_element(&mut self, node: NodeId) -> Result<(), HostError> {
        self.check(node)?;
        if self.nodes[node.0].parent.is_none() {
            return Err(HostError::NoSuchElement(format!("node {} has no parent", node.0)));
        }
        self.detach(node);
        Ok(())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        (0..self.nodes.len()).map(NodeId).find(|node| {
            let n = &self.nodes[node.0];
            n.live
                && n.attrs.get("id").map(String::as_str) == Some(id)
                && self.is_attached(*node)
        })
    }

    fn toolbars(&self) -> Vec<NodeId> {
        self.toolbars.clone()
    }

    fn palette(&self) -> Result<NodeId, HostError> {
        Ok(self.palette)
    }

    fn insert_toolbar_item(
        &mut self,
        toolbar: NodeId,
        item: NodeId,
        before: Option<NodeId>,
    ) -> Result<(), HostError> {
        self.check(toolbar)?;
        self.check(item)?;
        self.detach(item);
        let children = &mut self.nodes[toolbar.0].children;
        let pos = before
            .and_then(|b| children.iter().position(|c| *c == b))
            .unwrap_or(children.len());
        children.insert(pos, item);
        self.nodes[item.0].parent = Some(toolbar);
        Ok(())
    }

    fn live_toolbar_set(&self, toolbar: NodeId) -> String {
        let ids: Vec<String> = self
            .children(toolbar)
            .into_iter()
            .filter_map(|c| self.attribute(c, "id"))
            .collect();
        if ids.is_empty() {
            "__empty".to_string()
        } else {
            ids.join(",")
        }
    }

    fn persist_attribute(&mut self, node: NodeId, name: &str) -> Result<(), HostError> {
        self.check(node)?;
        let id = self
            .attribute(node, "id")
            .ok_or_else(|| HostError::NoSuchElement("persisted node has no id".to_string()))?;
        let value = self.attribute(node, name).unwrap_or_default();
        self.persisted.push((id, name.to_string(), value));
        Ok(())
    }

    fn open_dialog(&mut self, uri: &str) -> Result<(), HostError> {
        if self.closed {
            return Err(HostError::WindowClosed(self.id));
        }
        self.dialogs.push(uri.to_string());
        Ok(())
    }
}
