//! Arena backed document tree with attribute storage, form values and event
//! dispatch.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::element::{Content, Element};
use crate::event::{Event, EventKind, Handler};
use crate::{DomError, Selector};

/// Handle to a node of one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) attributes: Vec<(String, String)>,
    /// Value property written through [`Document::set_value`]. Shadows the
    /// markup-derived value once set.
    value: Option<String>,
}

impl ElementData {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

struct Delegated {
    kind: EventKind,
    selector: Selector,
    handler: Handler,
}

/// An in-memory page.
///
/// Nodes live in an arena and are never freed; removing a node only detaches
/// it, so handles stay valid for the document's lifetime.
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    listeners: HashMap<(NodeId, EventKind), Vec<Handler>>,
    delegated: Vec<Delegated>,
    serial: u64,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("body", &self.body)
            .field("listeners", &self.listeners.len())
            .field("delegated", &self.delegated.len())
            .field("serial", &self.serial)
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            body: NodeId(0),
            listeners: HashMap::new(),
            delegated: Vec::new(),
            serial: 0,
        };
        doc.body = doc.push_element("body", Vec::new());
        doc
    }

    /// The root of the connected tree.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Next value of a counter shared by everything working on this page.
    /// Never repeats within one document.
    pub fn next_serial(&mut self) -> u64 {
        let serial = self.serial;
        self.serial += 1;
        serial
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Materialize a detached subtree. Attach it with [`append_child`] or
    /// [`insert_after`].
    ///
    /// [`append_child`]: Document::append_child
    /// [`insert_after`]: Document::insert_after
    pub fn create(&mut self, element: Element) -> NodeId {
        let id = self.push_element(&element.tag, element.attributes);
        for child in element.children {
            let child_id = match child {
                Content::Element(el) => self.create(el),
                Content::Text(text) => self.create_text(text),
            };
            self.nodes[child_id.0].parent = Some(id);
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    fn push_element(&mut self, tag: &str, attributes: Vec<(String, String)>) -> NodeId {
        self.push(NodeKind::Element(ElementData {
            tag: tag.to_string(),
            attributes,
            value: None,
        }))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // =========================================================================
    // Node access
    // =========================================================================

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    pub(crate) fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        match &self.node(id)?.kind {
            NodeKind::Element(data) => Ok(data),
            NodeKind::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(data)) => Ok(data),
            Some(NodeKind::Text(_)) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::UnknownNode(id)),
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Tag of an element, or why `id` is not one.
    pub fn require_element(&self, id: NodeId) -> Result<&str, DomError> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_ok()
    }

    /// Lowercase tag name, `None` for text nodes and unknown handles.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|e| e.tag.as_str())
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// All descendants in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// `id` followed by its ancestors up to the topmost one.
    pub fn ancestors_inclusive(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.contains(id).then_some(id);
        while let Some(node) = current {
            path.push(node);
            current = self.parent(node);
        }
        path
    }

    /// Whether the node is attached (directly or through ancestors) to the body.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.ancestors_inclusive(id).last() == Some(&self.body)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.element(parent)?;
        self.check_insertable(parent, child)?;
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Insert `node` as the next sibling of `reference`.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        let parent = self
            .node(reference)?
            .parent
            .ok_or(DomError::Detached(reference))?;
        self.check_insertable(parent, node)?;
        self.detach(node);
        let siblings = &mut self.nodes[parent.0].children;
        let position = siblings
            .iter()
            .position(|&c| c == reference)
            .map(|i| i + 1)
            .unwrap_or(siblings.len());
        siblings.insert(position, node);
        self.nodes[node.0].parent = Some(parent);
        Ok(())
    }

    /// Detach a node (and its subtree) from its parent.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        self.node(id)?;
        self.detach(id);
        Ok(())
    }

    fn check_insertable(&self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        self.node(node)?;
        if node == self.body || self.ancestors_inclusive(parent).contains(&node) {
            return Err(DomError::HierarchyRequest { node });
        }
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        match self.element(id) {
            Ok(el) => selector.matches_parts(&el.tag, |c| el.has_class(c), |name| el.attr(name)),
            Err(_) => false,
        }
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        self.ancestors_inclusive(id)
            .into_iter()
            .find(|&node| self.matches(node, selector))
    }

    /// Connected elements matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.query_selector_all_in(self.body, selector)
    }

    /// Descendants of `root` matching `selector`, in document order.
    pub fn query_selector_all_in(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&node| self.matches(node, selector))
            .collect()
    }

    pub fn query_selector(&self, selector: &Selector) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|&node| self.matches(node, selector))
    }

    // =========================================================================
    // Attributes and classes
    // =========================================================================

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok()?.attr(name)
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Attributes in source order. Empty for text nodes.
    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        self.element(id)
            .map(|e| e.attributes.as_slice())
            .unwrap_or_default()
    }

    pub fn set_attr(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match el.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => el.attributes.push((name, value)),
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        self.element_mut(id)?.attributes.retain(|(n, _)| n != name);
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_ok_and(|e| e.has_class(class))
    }

    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        self.attr(id, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Add whitespace separated classes that are not present yet.
    pub fn add_class(&mut self, id: NodeId, classes: &str) -> Result<(), DomError> {
        let mut current: Vec<String> = self.classes(id).into_iter().map(str::to_string).collect();
        self.element(id)?;
        let before = current.len();
        for class in classes.split_whitespace() {
            if !current.iter().any(|c| c == class) {
                current.push(class.to_string());
            }
        }
        if current.len() == before {
            return Ok(());
        }
        self.set_attr(id, "class", current.join(" "))
    }

    /// Remove whitespace separated classes. The attribute stays, possibly empty.
    pub fn remove_class(&mut self, id: NodeId, classes: &str) -> Result<(), DomError> {
        self.element(id)?;
        let Some(current) = self.attr(id, "class") else {
            return Ok(());
        };
        let remove: Vec<&str> = classes.split_whitespace().collect();
        let kept: Vec<&str> = current
            .split_whitespace()
            .filter(|c| !remove.contains(c))
            .collect();
        let joined = kept.join(" ");
        self.set_attr(id, "class", joined)
    }

    // =========================================================================
    // Text and form values
    // =========================================================================

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => text.clone(),
            Some(NodeKind::Element(_)) => self
                .descendants(id)
                .into_iter()
                .filter_map(|node| match &self.nodes[node.0].kind {
                    NodeKind::Text(text) => Some(text.as_str()),
                    NodeKind::Element(_) => None,
                })
                .collect(),
            None => String::new(),
        }
    }

    /// Current form value of an element.
    ///
    /// - `option`: its `value` attribute, else its text.
    /// - `select`: the last value written with [`set_value`], else the first
    ///   option carrying a `selected` attribute, else the first option, else
    ///   the empty string.
    /// - anything else: the written value, else the `value` attribute.
    ///
    /// [`set_value`]: Document::set_value
    pub fn value(&self, id: NodeId) -> String {
        let Ok(el) = self.element(id) else {
            return String::new();
        };
        match el.tag.as_str() {
            "option" => el
                .attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| self.text_content(id)),
            "select" => {
                if let Some(value) = &el.value {
                    return value.clone();
                }
                let options = self.options_of(id);
                options
                    .iter()
                    .find(|&&o| self.has_attr(o, "selected"))
                    .or(options.first())
                    .map(|&o| self.value(o))
                    .unwrap_or_default()
            }
            _ => el
                .value
                .clone()
                .or_else(|| el.attr("value").map(str::to_string))
                .unwrap_or_default(),
        }
    }

    /// Write an element's value property. Markup is left untouched.
    ///
    /// A `select` only takes values of its options; anything else leaves it
    /// with an empty value.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> Result<(), DomError> {
        let value = value.into();
        let value = if self.element(id)?.tag == "select" {
            let known = self
                .options_of(id)
                .into_iter()
                .any(|o| self.value(o) == value);
            if known { value } else { String::new() }
        } else {
            value
        };
        self.element_mut(id)?.value = Some(value);
        Ok(())
    }

    fn options_of(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|&n| self.tag(n) == Some("option"))
            .collect()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Listen for `kind` events reaching `node` (dispatched on it or bubbling
    /// from a descendant).
    pub fn on(
        &mut self,
        node: NodeId,
        kind: EventKind,
        handler: impl Fn(&mut Document, &Event) + 'static,
    ) -> Result<(), DomError> {
        self.node(node)?;
        self.listeners
            .entry((node, kind))
            .or_default()
            .push(Rc::new(handler));
        Ok(())
    }

    /// Listen at document level for `kind` events whose propagation path
    /// contains an element matching `selector`, now or added later.
    pub fn delegate(
        &mut self,
        kind: EventKind,
        selector: Selector,
        handler: impl Fn(&mut Document, &Event) + 'static,
    ) {
        self.delegated.push(Delegated {
            kind,
            selector,
            handler: Rc::new(handler),
        });
    }

    /// Number of delegated listeners installed for `kind`.
    pub fn delegated_count(&self, kind: EventKind) -> usize {
        self.delegated.iter().filter(|d| d.kind == kind).count()
    }

    /// Dispatch an event on `target` and let it bubble.
    ///
    /// Direct listeners run first, innermost node first. Delegated listeners
    /// run after, once per matching node on the path, innermost first. The
    /// set of invocations is fixed before the first listener runs.
    pub fn dispatch(&mut self, kind: EventKind, target: NodeId) -> Result<(), DomError> {
        self.node(target)?;
        let path = self.ancestors_inclusive(target);
        trace!("dispatch {} on {target} (path of {})", kind.name(), path.len());

        let mut queue: Vec<(Handler, NodeId)> = Vec::new();
        for &node in &path {
            if let Some(handlers) = self.listeners.get(&(node, kind)) {
                queue.extend(handlers.iter().map(|h| (Rc::clone(h), node)));
            }
        }
        for delegated in self.delegated.iter().filter(|d| d.kind == kind) {
            for &node in &path {
                if self.matches(node, &delegated.selector) {
                    queue.push((Rc::clone(&delegated.handler), node));
                }
            }
        }

        for (handler, current_target) in queue {
            let event = Event {
                kind,
                target,
                current_target,
            };
            handler(self, &event);
        }
        Ok(())
    }

    pub fn click(&mut self, target: NodeId) -> Result<(), DomError> {
        self.dispatch(EventKind::Click, target)
    }

    pub fn trigger_change(&mut self, target: NodeId) -> Result<(), DomError> {
        self.dispatch(EventKind::Change, target)
    }
}
