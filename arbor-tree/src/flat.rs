use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::node::{Node, Tree};

/// Rebuild a hierarchy from flat entries carrying a parent reference.
///
/// Each entry names its parent through the `parent_key` attribute; a missing
/// attribute reads as `null`. Entries whose parent equals `root_parent`
/// become roots. Incoming `children` are discarded.
///
/// Data repair: an entry whose parent is absent is promoted to a root
/// instead of being dropped. When parent references form a cycle, the
/// first-seen entry of the cycle is promoted to a root and the cycle is cut
/// there. Roots and siblings keep their input order.
pub fn build_tree_from_flat_array(
    nodes: Vec<Node>,
    parent_key: &str,
    root_parent: &Value,
) -> Tree {
    let mut index_by_id: HashMap<String, usize> = HashMap::new();
    for (index, node) in nodes.iter().enumerate() {
        index_by_id.entry(node.id.clone()).or_insert(index);
    }

    let mut parent_of: Vec<Option<usize>> = nodes
        .iter()
        .map(|node| {
            let declared = node.attribute(parent_key).unwrap_or(Value::Null);
            if declared == *root_parent {
                return None;
            }
            let parent = parent_reference(&declared)
                .and_then(|id| index_by_id.get(&id).copied());
            if parent.is_none() {
                log::debug!(
                    "node {} references missing parent {declared}; \
                     promoting to root",
                    node.id
                );
            }
            parent
        })
        .collect();

    break_cycles(&nodes, &mut parent_of);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut roots = Vec::new();
    for (index, parent) in parent_of.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(index),
            None => roots.push(index),
        }
    }

    let mut slots: Vec<Option<Node>> = nodes
        .into_iter()
        .map(|mut node| {
            node.children.clear();
            Some(node)
        })
        .collect();

    roots
        .into_iter()
        .filter_map(|index| assemble(index, &mut slots, &children))
        .collect()
}

fn parent_reference(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Cut every parent cycle so that each entry reaches a root.
fn break_cycles(nodes: &[Node], parent_of: &mut [Option<usize>]) {
    let mut settled: HashSet<usize> = HashSet::new();

    for start in 0..parent_of.len() {
        loop {
            let mut walk = Vec::new();
            let mut seen = HashSet::new();
            let mut current = start;
            let cycle_entry = loop {
                if settled.contains(&current) {
                    break None;
                }
                if !seen.insert(current) {
                    break Some(current);
                }
                walk.push(current);
                match parent_of[current] {
                    Some(parent) => current = parent,
                    None => break None,
                }
            };

            let Some(entry) = cycle_entry else {
                settled.extend(walk);
                break;
            };

            let cycle_start = walk
                .iter()
                .position(|index| *index == entry)
                .unwrap_or_default();
            let promoted = walk[cycle_start..]
                .iter()
                .copied()
                .min()
                .unwrap_or(entry);
            log::warn!(
                "parent cycle through node {}; promoting it to root",
                nodes[promoted].id
            );
            parent_of[promoted] = None;
        }
    }
}

fn assemble(
    index: usize,
    slots: &mut [Option<Node>],
    children: &[Vec<usize>],
) -> Option<Node> {
    let mut node = slots[index].take()?;
    node.children = children[index]
        .iter()
        .filter_map(|child| assemble(*child, slots, children))
        .collect();
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::flatten_tree;

    fn entry(id: &str, parent: Option<&str>) -> Node {
        let node = Node::folder(id, id.to_uppercase());
        match parent {
            Some(parent) => node.with_attribute("parentId", parent),
            None => node,
        }
    }

    fn ids(tree: &[Node]) -> Vec<String> {
        flatten_tree(tree)
            .into_iter()
            .map(|node| node.id.clone())
            .collect()
    }

    #[test]
    fn given_parent_links_when_building_then_hierarchy_is_restored() {
        let flat = vec![
            entry("a", None),
            entry("b", Some("a")),
            entry("c", Some("b")),
            entry("d", Some("a")),
            entry("e", None),
        ];
        let tree = build_tree_from_flat_array(flat, "parentId", &Value::Null);
        assert_eq!(tree.len(), 2);
        assert_eq!(ids(&tree), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(tree[0].children[0].children[0].id, "c");
    }

    #[test]
    fn given_missing_parent_when_building_then_entry_becomes_root() {
        let flat = vec![entry("a", None), entry("orphan", Some("ghost"))];
        let tree = build_tree_from_flat_array(flat, "parentId", &Value::Null);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].id, "orphan");
    }

    #[test]
    fn given_custom_root_value_when_building_then_it_marks_roots() {
        let flat = vec![entry("a", Some("")), entry("b", Some("a"))];
        let root = Value::from("");
        let tree = build_tree_from_flat_array(flat, "parentId", &root);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children[0].id, "b");
    }

    #[test]
    fn given_parent_cycle_when_building_then_first_seen_entry_is_root() {
        let flat = vec![
            entry("x", Some("z")),
            entry("y", Some("x")),
            entry("z", Some("y")),
            entry("tail", Some("y")),
        ];
        let tree = build_tree_from_flat_array(flat, "parentId", &Value::Null);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, "x");
        assert_eq!(ids(&tree), vec!["x", "y", "z", "tail"]);
    }

    #[test]
    fn given_stale_children_when_building_then_they_are_discarded() {
        let flat = vec![
            entry("a", None).with_children(vec![Node::file("stale", "S")]),
        ];
        let tree = build_tree_from_flat_array(flat, "parentId", &Value::Null);
        assert!(!tree[0].has_children());
    }

    #[test]
    fn given_self_parent_when_building_then_entry_becomes_root() {
        let flat = vec![entry("loop", Some("loop"))];
        let tree = build_tree_from_flat_array(flat, "parentId", &Value::Null);
        assert_eq!(ids(&tree), vec!["loop"]);
    }
}
