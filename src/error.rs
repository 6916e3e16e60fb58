//! Error types for ring operations.

use std::fmt::Debug;

/// Errors reported by [`HashRing`](crate::HashRing) operations.
///
/// Failed mutations leave the ring exactly as it was. The offending node is
/// handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError<N: Debug> {
    /// The ring has no nodes, so there is no owner for any key.
    #[error("no node available: the ring is empty")]
    EmptyRing,

    /// The node is not on the ring.
    #[error("node not found: {0:?}")]
    NodeNotFound(N),

    /// The node is already on the ring.
    #[error("duplicate node: {0:?}")]
    DuplicateNode(N),

    /// Ring configuration is unusable.
    #[error("invalid ring config: {0}")]
    InvalidConfig(&'static str),
}
