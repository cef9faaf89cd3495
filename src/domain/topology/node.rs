use crate::domain::utils::id::NodeIndex;

/// A router in the network topology.
#[derive(Debug, Clone)]
pub struct Node {
    pub index: NodeIndex,

    /// Identifier from the topology file, kept for logging.
    pub name: String,
}

impl Node {
    pub fn new(index: NodeIndex, name: impl Into<String>) -> Self {
        Self { index, name: name.into() }
    }
}

/// Per-episode markers of a node. They live in the episode state rather than
/// on [`Node`] so the topology itself never changes after construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeFlags {
    pub is_start: bool,
    pub is_end: bool,
    pub visited: bool,
}
