//! Layered prefix/suffix graph.
//!
//! Every supplied string and all of its substrings obtained by repeatedly
//! dropping the first or last char are nodes. Layer `l` holds the nodes of
//! length `l`, sorted lexicographically; layer 0 is the empty string.
//!
//! ## Trial protocol
//!
//! ```text
//! add_cycle(order)
//! for l in max_layer..=1:
//!     check_weak_components(l)   // false = conjecture falsified
//!     collapse_layer(l)
//! clear()
//! ```
//!
//! Collapse and the component checks are order-sensitive; layers are
//! always iterated in sorted order so that a given edge state produces the
//! same result no matter which trials ran before.

use std::collections::BTreeSet;
use std::fmt;

use crate::canonical::canonical_hash_hex;
use crate::config::CheckerConfig;
use crate::registry::NodeRegistry;
use crate::traversal::{has_parents, lower_component, reaches_empty, upper_component};
use crate::types::{EdgeSide, EdgeState, Node, NodeId};

/// Upper and lower partitions of one layer.
#[derive(Debug, Clone)]
pub struct WeakComponents {
    /// Layer the partitions were computed for.
    pub layer: usize,
    /// Upper components, each restricted to nodes of this layer.
    pub upper: Vec<Vec<NodeId>>,
    /// Lower-component color per arena slot (`None` outside the layer).
    pub lower: Vec<Option<usize>>,
    /// Number of lower components.
    pub lower_count: usize,
}

impl WeakComponents {
    /// Lower-component color of a node.
    pub fn lower_color(&self, id: NodeId) -> Option<usize> {
        self.lower.get(id.index()).copied().flatten()
    }

    /// First adjacent pair of an upper component with differing colors.
    ///
    /// Uncolored nodes (created by `add_path` outside every layer) compare
    /// as color 0.
    pub fn violation(&self) -> Option<(NodeId, NodeId)> {
        let color = |id: NodeId| self.lower_color(id).unwrap_or(0);
        self.upper.iter().find_map(|component| {
            component
                .windows(2)
                .find(|pair| color(pair[0]) != color(pair[1]))
                .map(|pair| (pair[0], pair[1]))
        })
    }

    /// True if every upper component lies inside a single lower component.
    pub fn is_consistent(&self) -> bool {
        self.violation().is_none()
    }
}

/// Graph of all prefixes/suffixes of a string set, partitioned into layers.
#[derive(Debug, Clone)]
pub struct LayeredGraph {
    registry: NodeRegistry,
    layers: Vec<Vec<NodeId>>,
    max_layer: usize,
    config: CheckerConfig,
}

impl LayeredGraph {
    /// Build the graph with the default conjecture constants.
    pub fn new<S: AsRef<str>>(strings: &[S]) -> Self {
        Self::with_config(strings, CheckerConfig::default())
    }

    /// Build the graph for `strings`, marking each of them as a root.
    pub fn with_config<S: AsRef<str>>(strings: &[S], config: CheckerConfig) -> Self {
        let mut registry = NodeRegistry::new();
        let mut max_layer = 0;

        for s in strings {
            let id = registry.get_or_create(s.as_ref());
            let node = registry.node_mut(id);
            node.is_root = true;
            max_layer = max_layer.max(node.len());
        }

        // The registry iterates by value, so each layer comes out sorted.
        let mut layers = vec![Vec::new(); max_layer + 1];
        for (_, id) in registry.iter() {
            layers[registry.node(id).len()].push(id);
        }

        tracing::debug!(
            nodes = registry.len(),
            max_layer,
            roots = strings.len(),
            "built layered graph"
        );

        Self {
            registry,
            layers,
            max_layer,
            config,
        }
    }

    /// Length of the longest overlap: a suffix of `a` that is a prefix of `b`.
    pub fn overlap_length(a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let max_len = a.len().min(b.len());

        (1..=max_len)
            .rev()
            .find(|&k| a[a.len() - k..] == b[..k])
            .unwrap_or(0)
    }

    /// Overlay the doubled transition from `a` to `b`.
    ///
    /// Every suffix of `a` longer than the overlap gains outgoing weight and
    /// every prefix of `b` longer than the overlap gains incoming weight; the
    /// shared overlap itself is left alone. Strings outside the graph get
    /// nodes of their own, but those nodes belong to no layer and never get
    /// a lower color of their own.
    pub fn add_path(&mut self, a: &str, b: &str) {
        let overlap = Self::overlap_length(a, b);
        let weight = self.config.path_multiplicity;

        let a_bounds = char_bounds(a);
        let a_len = a_bounds.len() - 1;
        for len in overlap + 1..=a_len {
            let id = self.registry.get_or_create(&a[a_bounds[a_len - len]..]);
            self.registry.node_mut(id).add_edges(EdgeSide::Suffix, weight);
        }

        let b_bounds = char_bounds(b);
        let b_len = b_bounds.len() - 1;
        for len in overlap + 1..=b_len {
            let id = self.registry.get_or_create(&b[..b_bounds[len]]);
            self.registry.node_mut(id).add_edges(EdgeSide::Prefix, weight);
        }
    }

    /// Overlay the closed walk through `elements`, wrapping from last to first.
    pub fn add_cycle<S: AsRef<str>>(&mut self, elements: &[S]) {
        for (i, a) in elements.iter().enumerate() {
            let b = &elements[(i + 1) % elements.len()];
            self.add_path(a.as_ref(), b.as_ref());
        }
    }

    /// Zero every edge counter. Structure and roots are untouched.
    pub fn clear(&mut self) {
        for node in self.registry.nodes_mut() {
            node.clear_edges();
        }
    }

    /// Move matched pairs of every node in layer `l` one layer down.
    ///
    /// A node keeps `retained_pairs` of its pairs when it is balanced, still
    /// attached from above, and cannot reach the empty string except through
    /// its own links; every other node gives up all of its pairs. Returns the
    /// number of pairs moved.
    ///
    /// # Panics
    ///
    /// Panics if `l > max_layer`.
    pub fn collapse_layer(&mut self, l: usize) -> u64 {
        assert!(
            l <= self.max_layer,
            "collapse_layer: layer {} out of range 0..={}",
            l,
            self.max_layer
        );

        let mut moved = 0;
        for &id in &self.layers[l] {
            let node = self.registry.node(id);
            let pairs = node.pairs();
            let at_risk = node.is_balanced()
                && has_parents(&self.registry, id)
                && !reaches_empty(&self.registry, id);

            let n = if at_risk {
                pairs.saturating_sub(self.config.retained_pairs)
            } else {
                pairs
            };
            moved += self.registry.collapse(id, n);
        }

        tracing::trace!(layer = l, moved, "collapsed layer");
        moved
    }

    /// Compute the upper and lower partitions of layer `l`.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= l <= max_layer`.
    pub fn weak_components(&self, l: usize) -> WeakComponents {
        assert!(
            l >= 1 && l <= self.max_layer,
            "weak_components: layer {} out of range 1..={}",
            l,
            self.max_layer
        );
        let layer = &self.layers[l];

        let mut visited: BTreeSet<NodeId> = BTreeSet::new();
        let mut upper = Vec::new();
        for &id in layer {
            if visited.contains(&id) {
                continue;
            }
            let reached = upper_component(&self.registry, id, l);
            upper.push(
                reached
                    .iter()
                    .copied()
                    .filter(|&r| self.registry.node(r).len() == l)
                    .collect::<Vec<_>>(),
            );
            visited.extend(reached);
        }

        let mut lower = vec![None; self.registry.len()];
        let mut lower_count = 0;
        for &id in layer {
            if lower[id.index()].is_some() {
                continue;
            }
            lower_component(&self.registry, id, &mut lower, lower_count);
            lower_count += 1;
        }

        WeakComponents {
            layer: l,
            upper,
            lower,
            lower_count,
        }
    }

    /// Check that every upper component of layer `l` is one lower component.
    ///
    /// A `false` result falsifies the conjecture for the current walk.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= l <= max_layer`.
    pub fn check_weak_components(&self, l: usize) -> bool {
        let components = self.weak_components(l);
        match components.violation() {
            None => true,
            Some((left, right)) => {
                tracing::debug!(
                    layer = l,
                    left = self.registry.node(left).value(),
                    right = self.registry.node(right).value(),
                    upper = components.upper.len(),
                    lower = components.lower_count,
                    "upper component spans several lower components"
                );
                false
            }
        }
    }

    /// Index of the top layer (length of the longest string).
    pub fn max_layer(&self) -> usize {
        self.max_layer
    }

    /// Nodes of layer `l` in lexicographic order.
    pub fn layer(&self, l: usize) -> &[NodeId] {
        &self.layers[l]
    }

    /// Handle of the node for `s`, if the graph knows it.
    pub fn node_id(&self, s: &str) -> Option<NodeId> {
        self.registry.get(s)
    }

    /// Borrow a node by handle.
    pub fn node(&self, id: NodeId) -> &Node {
        self.registry.node(id)
    }

    /// Edge multiplicities of the node for `s`.
    pub fn edges(&self, s: &str) -> Option<EdgeState> {
        self.node_id(s).map(|id| self.registry.node(id).edge_state())
    }

    /// Overwrite the multiplicities of one node.
    pub fn set_edges(&mut self, id: NodeId, from_prefix: u64, to_suffix: u64) {
        let node = self.registry.node_mut(id);
        node.from_prefix = from_prefix;
        node.to_suffix = to_suffix;
    }

    /// Underlying node arena.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Constants the graph was built with.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Sum of both counters over every node.
    pub fn total_weight(&self) -> u64 {
        self.registry
            .nodes()
            .iter()
            .map(|n| n.from_prefix() + n.to_suffix())
            .sum()
    }

    /// Sum of both counters over layer `l`.
    pub fn layer_weight(&self, l: usize) -> u64 {
        self.layers[l]
            .iter()
            .map(|&id| {
                let n = self.registry.node(id);
                n.from_prefix() + n.to_suffix()
            })
            .sum()
    }

    /// Multiplicities of every layered node, top layer first.
    pub fn edge_state(&self) -> Vec<EdgeState> {
        self.layers
            .iter()
            .rev()
            .flatten()
            .map(|&id| self.registry.node(id).edge_state())
            .collect()
    }

    /// Hash of the current edge state.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(&self.edge_state())
    }
}

impl fmt::Display for LayeredGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for layer in self.layers.iter().skip(1).rev() {
            for &id in layer {
                let node = self.registry.node(id);
                writeln!(
                    f,
                    "String: {}, from prefix: {}, to suffix: {}",
                    node.value(),
                    node.from_prefix(),
                    node.to_suffix()
                )?;
            }
        }
        Ok(())
    }
}

/// Byte offsets of every char boundary of `s`, `s.len()` included.
fn char_bounds(s: &str) -> Vec<usize> {
    s.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .collect()
}
