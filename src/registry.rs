//! Arena of string nodes.

use std::collections::BTreeMap;

use crate::types::{Node, NodeId};

/// Arena owning one node per distinct string, the empty string included.
///
/// Nodes are addressed by [`NodeId`] handles; prefix/suffix links and the
/// parent back-references are handles too, so the arena is the single owner
/// and is torn down as one value. Uses a BTreeMap index for deterministic
/// iteration order.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    /// Node storage, indexed by `NodeId`.
    nodes: Vec<Node>,
    /// String -> handle mapping.
    index: BTreeMap<String, NodeId>,
}

impl NodeRegistry {
    /// Create a registry holding only the empty-string node.
    pub fn new() -> Self {
        let mut index = BTreeMap::new();
        index.insert(String::new(), NodeId::EMPTY);
        Self {
            nodes: vec![Node::empty()],
            index,
        }
    }

    /// Get the node for `s`, creating it and its whole prefix/suffix chain
    /// if it does not exist yet.
    ///
    /// Missing strings are created prefix chain first, then suffix chain,
    /// then the string itself, using an explicit stack.
    pub fn get_or_create(&mut self, s: &str) -> NodeId {
        let mut pending = vec![s];

        while let Some(&top) = pending.last() {
            if self.index.contains_key(top) {
                pending.pop();
                continue;
            }

            // `top` is non-empty here: the empty node is created in `new`.
            let prefix_str = drop_last_char(top);
            let suffix_str = drop_first_char(top);
            match (self.get(prefix_str), self.get(suffix_str)) {
                (Some(prefix), Some(suffix)) => {
                    pending.pop();
                    self.insert(top, prefix, suffix);
                }
                (prefix, suffix) => {
                    if suffix.is_none() {
                        pending.push(suffix_str);
                    }
                    if prefix.is_none() {
                        pending.push(prefix_str);
                    }
                }
            }
        }

        self.index[s]
    }

    fn insert(&mut self, s: &str, prefix: NodeId, suffix: NodeId) -> NodeId {
        let raw = u32::try_from(self.nodes.len()).expect("node arena exceeds u32 handles");
        let id = NodeId::new(raw);
        self.nodes.push(Node::with_links(s.to_string(), prefix, suffix));
        self.nodes[prefix.index()].prefix_parents.push(id);
        self.nodes[suffix.index()].suffix_parents.push(id);
        self.index.insert(s.to_string(), id);
        id
    }

    /// Look up an existing node.
    pub fn get(&self, s: &str) -> Option<NodeId> {
        self.index.get(s).copied()
    }

    /// Borrow a node by handle.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Mutably borrow a node by handle.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes, the empty node included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the empty-string node exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes ordered by string value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.index.iter().map(|(s, id)| (s.as_str(), *id))
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutably borrow all nodes in arena order.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Move up to `n` matched in/out pairs from `id` one layer down.
    ///
    /// Each moved pair leaves the node and lands as one unit on the prefix
    /// node's outgoing side and one unit on the suffix node's incoming side.
    /// Returns the number of pairs actually moved; the empty node has no
    /// links and never moves anything.
    pub fn collapse(&mut self, id: NodeId, n: u64) -> u64 {
        let node = &self.nodes[id.index()];
        let (Some(prefix), Some(suffix)) = (node.prefix(), node.suffix()) else {
            return 0;
        };
        let n = n.min(node.pairs());
        if n == 0 {
            return 0;
        }

        let node = &mut self.nodes[id.index()];
        node.from_prefix -= n;
        node.to_suffix -= n;
        self.nodes[prefix.index()].to_suffix += n;
        self.nodes[suffix.index()].from_prefix += n;
        n
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn drop_last_char(s: &str) -> &str {
    match s.char_indices().next_back() {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn drop_first_char(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next();
    chars.as_str()
}
