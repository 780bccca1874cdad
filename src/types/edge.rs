//! Edge types for the layered graph.

use serde::{Deserialize, Serialize};

/// Side of a node that an edge multiplicity is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeSide {
    /// Weight flowing into the node from its prefix side.
    Prefix,
    /// Weight flowing out of the node toward its suffix side.
    Suffix,
}

/// Edge multiplicities of one node, detached from the arena.
///
/// Field order is the serialized order, so fingerprints built from these
/// stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeState {
    /// String the node represents.
    pub value: String,
    /// Weight flowing in from the prefix side.
    pub from_prefix: u64,
    /// Weight flowing out toward the suffix side.
    pub to_suffix: u64,
}

impl EdgeState {
    /// Create a new edge state.
    pub fn new(value: impl Into<String>, from_prefix: u64, to_suffix: u64) -> Self {
        Self {
            value: value.into(),
            from_prefix,
            to_suffix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_str_and_string() {
        assert_eq!(EdgeState::new("ab", 2, 1), EdgeState::new(String::from("ab"), 2, 1));
    }
}
