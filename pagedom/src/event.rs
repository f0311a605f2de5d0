use std::rc::Rc;

use crate::{Document, NodeId};

/// Event types the document can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer activation of an element.
    Click,
    /// A form control's value was committed.
    Change,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Change => "change",
        }
    }
}

/// An event as seen by one listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// The node the event was dispatched on.
    pub target: NodeId,
    /// The node the listener is attached to, or for delegated listeners the
    /// node on the propagation path that matched the selector.
    pub current_target: NodeId,
}

/// Event listener.
///
/// Listeners get mutable access to the document, so they may change the tree
/// and dispatch further events while being invoked.
pub type Handler = Rc<dyn Fn(&mut Document, &Event)>;
