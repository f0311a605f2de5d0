use thiserror::Error;

use crate::NodeId;

/// Failures of document manipulation and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("node {0} does not exist in this document")]
    UnknownNode(NodeId),

    #[error("node {0} is a text node, expected an element")]
    NotAnElement(NodeId),

    #[error("node {0} has no parent")]
    Detached(NodeId),

    #[error("node {node} cannot be placed inside its own subtree")]
    HierarchyRequest { node: NodeId },

    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}
