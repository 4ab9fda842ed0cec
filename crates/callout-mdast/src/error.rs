//! Error types for tree edits.

use crate::tree::NodeId;

/// Error while editing a [`Document`](crate::Document).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TreeError {
    /// Node has no parent (the root, or a node already replaced).
    #[error("node {} is not attached to the document", .0.index())]
    Detached(NodeId),

    /// Handle does not belong to this document.
    #[error("node {} does not exist", .0.index())]
    UnknownNode(NodeId),
}
