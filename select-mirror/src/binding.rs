//! Correlation between a control and its mirror list.
//!
//! Both sides carry the same key in [`CORRELATION_ATTR`], which is what the
//! page sees. The registry keeps the authoritative association so lookups
//! are a map access instead of a document-wide query.

use std::collections::HashMap;
use std::fmt;
use std::num::ParseIntError;
use std::rc::Rc;
use std::str::FromStr;

use log::debug;
use pagedom::{Document, DomError, NodeId};

use crate::config::Config;

/// Attribute holding the binding key on the control and on the list root.
pub const CORRELATION_ATTR: &str = "data-rel";

/// Opaque identifier shared by one control and its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey(u64);

impl BindingKey {
    /// Reserve a fresh key from the page's counter, so keys never collide on
    /// one page however many registries are bound to it.
    pub fn allocate(doc: &mut Document) -> Self {
        Self(doc.next_serial())
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BindingKey {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// One control/list pair and the configuration it was rendered with.
#[derive(Debug, Clone)]
pub struct Binding {
    pub key: BindingKey,
    pub control: NodeId,
    pub list: NodeId,
    pub config: Rc<Config>,
}

/// Registry of the bindings one engine created.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: HashMap<BindingKey, Binding>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `key` on both elements and record the pair.
    pub fn bind(
        &mut self,
        doc: &mut Document,
        control: NodeId,
        list: NodeId,
        key: BindingKey,
        config: Rc<Config>,
    ) -> Result<(), DomError> {
        doc.set_attr(control, CORRELATION_ATTR, key.to_string())?;
        doc.set_attr(list, CORRELATION_ATTR, key.to_string())?;
        if let Some(previous) = self.bindings.insert(
            key,
            Binding {
                key,
                control,
                list,
                config,
            },
        ) {
            debug!("binding {key} rebound (was control {})", previous.control);
        }
        Ok(())
    }

    pub fn get(&self, key: BindingKey) -> Option<&Binding> {
        self.bindings.get(&key)
    }

    pub fn control_for(&self, key: BindingKey) -> Option<NodeId> {
        self.get(key).map(|b| b.control)
    }

    pub fn list_for(&self, key: BindingKey) -> Option<NodeId> {
        self.get(key).map(|b| b.list)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Key stamped on `node`, if any.
    pub fn key_of(doc: &Document, node: NodeId) -> Option<BindingKey> {
        doc.attr(node, CORRELATION_ATTR)?.parse().ok()
    }

    /// Find the live binding an item belongs to.
    ///
    /// `item` must be a direct child of a recorded list root. Returns `None`
    /// if the key is unknown or if the control left the document or no longer
    /// carries the key.
    pub fn resolve(&self, doc: &Document, item: NodeId) -> Option<Binding> {
        let list = doc.parent(item)?;
        let key = Self::key_of(doc, list)?;
        let binding = self.get(key)?;

        if binding.list != list {
            return None;
        }
        if !doc.is_connected(binding.control) || Self::key_of(doc, binding.control) != Some(key) {
            debug!("binding {key}: control {} is gone", binding.control);
            return None;
        }
        Some(binding.clone())
    }
}
