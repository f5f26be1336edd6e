//! Platform error types

use thiserror::Error;

use crate::host::NodeId;

/// Host-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The node handle does not refer to a live element
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// A reference node is not a child of the given parent
    #[error("node {node:?} is not a child of {parent:?}")]
    NotAChild {
        /// Parent element
        parent: NodeId,
        /// The offending reference node
        node: NodeId,
    },

    /// The operation would make a node its own ancestor
    #[error("cannot move {0:?} into its own subtree")]
    Cycle(NodeId),

    /// Operation not supported by this host
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Result type for host operations
pub type Result<T> = std::result::Result<T, PlatformError>;
