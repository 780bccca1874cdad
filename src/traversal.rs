//! Traversals over the node arena.
//!
//! All traversals are free functions taking the registry explicitly, so no
//! node ever reaches into its neighbours on its own. They use explicit
//! stacks instead of recursion; each computes a reachability set, so the
//! visiting order does not affect the result.
//!
//! ## Edge rules
//!
//! A positive `from_prefix` on node `x` is an edge between `x` and its
//! prefix node; a positive `to_suffix` is an edge between `x` and its suffix
//! node. Traversals walk these edges in both directions, downward through
//! the node's own links and upward through the parent back-references.

use std::collections::BTreeSet;

use crate::registry::NodeRegistry;
use crate::types::NodeId;

/// Nodes reachable from `start` without descending below `min_level`.
///
/// From a node longer than `min_level` the walk descends to its prefix (if
/// `from_prefix > 0`) and suffix (if `to_suffix > 0`). From any node it
/// ascends to prefix-parents with positive `from_prefix` and suffix-parents
/// with positive `to_suffix`. The result includes `start` and may contain
/// nodes of any length ≥ `min_level`.
pub fn upper_component(registry: &NodeRegistry, start: NodeId, min_level: usize) -> BTreeSet<NodeId> {
    let mut visited = BTreeSet::new();
    let mut stack = vec![start];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let node = registry.node(id);

        if node.len() > min_level {
            if node.from_prefix() > 0 {
                stack.extend(node.prefix());
            }
            if node.to_suffix() > 0 {
                stack.extend(node.suffix());
            }
        }

        push_weighted_parents(registry, node.prefix_parents(), node.suffix_parents(), &visited, &mut stack);
    }

    visited
}

/// Color every node reachable from `start` through sibling relations.
///
/// If `start` has incoming weight, the walk steps to its prefix node and
/// back up to that node's other weighted parents; symmetrically through
/// the suffix node for outgoing weight. Siblings of a node of length `l`
/// have length `l` too, so a lower component never leaves its layer.
/// Nodes that already carry a color are skipped.
pub fn lower_component(
    registry: &NodeRegistry,
    start: NodeId,
    colors: &mut [Option<usize>],
    color: usize,
) {
    let mut stack = vec![start];

    while let Some(id) = stack.pop() {
        if colors[id.index()].is_some() {
            continue;
        }
        colors[id.index()] = Some(color);
        let node = registry.node(id);

        let mut through = Vec::with_capacity(2);
        if node.from_prefix() > 0 {
            through.extend(node.prefix());
        }
        if node.to_suffix() > 0 {
            through.extend(node.suffix());
        }

        for child in through {
            let child = registry.node(child);
            stack.extend(
                child
                    .suffix_parents()
                    .iter()
                    .copied()
                    .filter(|&p| registry.node(p).to_suffix() > 0 && colors[p.index()].is_none()),
            );
            stack.extend(
                child
                    .prefix_parents()
                    .iter()
                    .copied()
                    .filter(|&p| registry.node(p).from_prefix() > 0 && colors[p.index()].is_none()),
            );
        }
    }
}

/// True if the empty-string node can be reached from `start`.
///
/// Every node except `start` may descend through its own weighted links;
/// every node, `start` included, may ascend through weighted parent links.
/// Blocking the start's own links keeps a node from trivially reaching the
/// empty string through the very edges a collapse is about to remove.
pub fn reaches_empty(registry: &NodeRegistry, start: NodeId) -> bool {
    let mut visited = BTreeSet::new();
    let mut stack = vec![start];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let node = registry.node(id);
        if node.is_empty() {
            return true;
        }

        if id != start {
            if node.from_prefix() > 0 {
                stack.extend(node.prefix());
            }
            if node.to_suffix() > 0 {
                stack.extend(node.suffix());
            }
        }

        push_weighted_parents(registry, node.prefix_parents(), node.suffix_parents(), &visited, &mut stack);
    }

    false
}

/// True if `id` is a root or some parent carries weight toward it.
pub fn has_parents(registry: &NodeRegistry, id: NodeId) -> bool {
    let node = registry.node(id);
    node.is_root()
        || node.prefix_parents().iter().any(|&p| registry.node(p).from_prefix() > 0)
        || node.suffix_parents().iter().any(|&p| registry.node(p).to_suffix() > 0)
}

fn push_weighted_parents(
    registry: &NodeRegistry,
    prefix_parents: &[NodeId],
    suffix_parents: &[NodeId],
    visited: &BTreeSet<NodeId>,
    stack: &mut Vec<NodeId>,
) {
    stack.extend(
        prefix_parents
            .iter()
            .copied()
            .filter(|&p| registry.node(p).from_prefix() > 0 && !visited.contains(&p)),
    );
    stack.extend(
        suffix_parents
            .iter()
            .copied()
            .filter(|&p| registry.node(p).to_suffix() > 0 && !visited.contains(&p)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EdgeSide;

    fn set(registry: &mut NodeRegistry, s: &str, from_prefix: u64, to_suffix: u64) -> NodeId {
        let id = registry.get_or_create(s);
        let node = registry.node_mut(id);
        node.clear_edges();
        node.add_edges(EdgeSide::Prefix, from_prefix);
        node.add_edges(EdgeSide::Suffix, to_suffix);
        id
    }

    fn values(registry: &NodeRegistry, ids: &BTreeSet<NodeId>) -> Vec<String> {
        let mut v: Vec<String> = ids.iter().map(|&id| registry.node(id).value().to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn test_upper_component_ascends_through_weighted_parents() {
        let mut registry = NodeRegistry::new();
        set(&mut registry, "ab", 2, 2);
        let a = registry.get("a").unwrap();

        let component = upper_component(&registry, a, 1);
        assert_eq!(values(&registry, &component), vec!["a", "ab", "b"]);
    }

    #[test]
    fn test_upper_component_stops_at_min_level() {
        let mut registry = NodeRegistry::new();
        set(&mut registry, "ab", 2, 2);
        set(&mut registry, "a", 1, 1);
        let ab = registry.get("ab").unwrap();

        // Layer-2 nodes may not descend when min_level is 2
        let component = upper_component(&registry, ab, 2);
        assert_eq!(values(&registry, &component), vec!["ab"]);
    }

    #[test]
    fn test_upper_component_ignores_weightless_links() {
        let mut registry = NodeRegistry::new();
        set(&mut registry, "ab", 2, 0);
        let b = registry.get("b").unwrap();

        // ab carries no outgoing weight, so b cannot climb to it
        let component = upper_component(&registry, b, 1);
        assert_eq!(values(&registry, &component), vec!["b"]);
    }

    #[test]
    fn test_lower_component_colors_siblings() {
        let mut registry = NodeRegistry::new();
        let ab = set(&mut registry, "ab", 2, 2);
        let bc = set(&mut registry, "bc", 2, 2);
        let cb = set(&mut registry, "cb", 0, 0);

        let mut colors = vec![None; registry.len()];
        lower_component(&registry, ab, &mut colors, 7);

        // ab -> suffix b -> prefix-parent bc (weighted)
        assert_eq!(colors[ab.index()], Some(7));
        assert_eq!(colors[bc.index()], Some(7));
        assert_eq!(colors[cb.index()], None);
    }

    #[test]
    fn test_lower_component_skips_colored() {
        let mut registry = NodeRegistry::new();
        let ab = set(&mut registry, "ab", 2, 2);
        let bc = set(&mut registry, "bc", 2, 2);

        let mut colors = vec![None; registry.len()];
        colors[bc.index()] = Some(0);
        lower_component(&registry, ab, &mut colors, 1);

        assert_eq!(colors[ab.index()], Some(1));
        assert_eq!(colors[bc.index()], Some(0));
    }

    #[test]
    fn test_reaches_empty_blocks_own_links() {
        let mut registry = NodeRegistry::new();
        let a = set(&mut registry, "a", 1, 1);

        // Only its own links lead to the empty node
        assert!(!reaches_empty(&registry, a));
    }

    #[test]
    fn test_reaches_empty_through_parent() {
        let mut registry = NodeRegistry::new();
        set(&mut registry, "ab", 1, 1);
        set(&mut registry, "b", 1, 0);
        let a = set(&mut registry, "a", 1, 1);

        // a -> ab (weighted prefix-parent) -> b -> "" via b's own link
        assert!(reaches_empty(&registry, a));
    }

    #[test]
    fn test_reaches_empty_from_empty() {
        let registry = NodeRegistry::new();
        assert!(reaches_empty(&registry, NodeId::EMPTY));
    }

    #[test]
    fn test_has_parents() {
        let mut registry = NodeRegistry::new();
        let ab = set(&mut registry, "ab", 0, 2);
        let a = registry.get("a").unwrap();
        let b = registry.get("b").unwrap();

        // ab -> b carries weight, ab -> a does not
        assert!(has_parents(&registry, b));
        assert!(!has_parents(&registry, a));

        registry.node_mut(ab).is_root = true;
        assert!(has_parents(&registry, ab));
    }
}
