//! Node types for the layered graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::edge::{EdgeSide, EdgeState};

/// Handle of a node inside a [`NodeRegistry`](crate::registry::NodeRegistry).
///
/// Wraps an arena index and implements `Ord` for deterministic ordering.
/// Handles are only meaningful for the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Handle of the empty-string node. Every registry creates it first.
    pub const EMPTY: NodeId = NodeId(0);

    /// Create a handle from a raw arena index.
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the arena index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One string of the layered graph.
///
/// Structural fields (value, links, parents) are fixed once the node is
/// registered. The two edge multiplicities are the only mutable state.
#[derive(Debug, Clone)]
pub struct Node {
    value: String,
    len: usize,
    prefix: Option<NodeId>,
    suffix: Option<NodeId>,
    pub(crate) prefix_parents: Vec<NodeId>,
    pub(crate) suffix_parents: Vec<NodeId>,
    pub(crate) from_prefix: u64,
    pub(crate) to_suffix: u64,
    pub(crate) is_root: bool,
}

impl Node {
    /// Create the empty-string node.
    pub(crate) fn empty() -> Self {
        Self {
            value: String::new(),
            len: 0,
            prefix: None,
            suffix: None,
            prefix_parents: Vec::new(),
            suffix_parents: Vec::new(),
            from_prefix: 0,
            to_suffix: 0,
            is_root: false,
        }
    }

    /// Create a non-empty node whose prefix and suffix are already registered.
    pub(crate) fn with_links(value: String, prefix: NodeId, suffix: NodeId) -> Self {
        let len = value.chars().count();
        Self {
            value,
            len,
            prefix: Some(prefix),
            suffix: Some(suffix),
            ..Self::empty()
        }
    }

    /// String the node represents.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Length in chars; also the node's layer index.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True only for the empty-string node.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_none()
    }

    /// True if the string was supplied by the caller.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Node of the first `len - 1` chars.
    pub fn prefix(&self) -> Option<NodeId> {
        self.prefix
    }

    /// Node of the last `len - 1` chars.
    pub fn suffix(&self) -> Option<NodeId> {
        self.suffix
    }

    /// Nodes whose prefix is this node.
    pub fn prefix_parents(&self) -> &[NodeId] {
        &self.prefix_parents
    }

    /// Nodes whose suffix is this node.
    pub fn suffix_parents(&self) -> &[NodeId] {
        &self.suffix_parents
    }

    /// Weight flowing in from the prefix side.
    pub fn from_prefix(&self) -> u64 {
        self.from_prefix
    }

    /// Weight flowing out toward the suffix side.
    pub fn to_suffix(&self) -> u64 {
        self.to_suffix
    }

    /// True if incoming and outgoing weights match.
    pub fn is_balanced(&self) -> bool {
        self.from_prefix == self.to_suffix
    }

    /// Number of matched in/out pairs.
    pub fn pairs(&self) -> u64 {
        self.from_prefix.min(self.to_suffix)
    }

    /// Add `cnt` edges on one side.
    pub fn add_edges(&mut self, side: EdgeSide, cnt: u64) {
        match side {
            EdgeSide::Prefix => self.from_prefix += cnt,
            EdgeSide::Suffix => self.to_suffix += cnt,
        }
    }

    /// Remove all edges.
    pub fn clear_edges(&mut self) {
        self.from_prefix = 0;
        self.to_suffix = 0;
    }

    /// Snapshot of the node's multiplicities.
    pub fn edge_state(&self) -> EdgeState {
        EdgeState::new(self.value.clone(), self.from_prefix, self.to_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_node() {
        let node = Node::empty();
        assert!(node.is_empty());
        assert_eq!(node.len(), 0);
        assert!(node.prefix().is_none());
        assert!(node.suffix().is_none());
    }

    #[test]
    fn test_len_counts_chars() {
        let node = Node::with_links("żab".to_string(), NodeId::new(1), NodeId::new(2));
        assert_eq!(node.len(), 3);
        assert!(!node.is_empty());
    }

    #[test]
    fn test_add_edges_and_pairs() {
        let mut node = Node::with_links("ab".to_string(), NodeId::new(1), NodeId::new(2));
        node.add_edges(EdgeSide::Prefix, 2);
        node.add_edges(EdgeSide::Suffix, 4);

        assert_eq!(node.from_prefix(), 2);
        assert_eq!(node.to_suffix(), 4);
        assert_eq!(node.pairs(), 2);
        assert!(!node.is_balanced());

        node.clear_edges();
        assert!(node.is_balanced());
        assert_eq!(node.pairs(), 0);
    }
}
