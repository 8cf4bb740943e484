//! Property-based invariant tests for the tree algebra.
//!
//! 1. add_node keeps identifiers unique.
//! 2. Flattening with parent links and rebuilding restores the tree.
//! 3. Moving a node relative to itself is a no-op.
//! 4. Moving a node inside one of its descendants is a no-op.
//! 5. Keep-path filtering retains exactly the matches and their ancestors.
//! 6. Sorting puts folders first and keeps equal keys in order.

use std::collections::HashSet;

use arbor_tree::{
    DropPosition, Node, add_node, build_tree_from_flat_array, filter_tree,
    find_node_by_id, flatten_tree, get_path_to_node, is_descendant, move_node,
    sort_tree,
};
use proptest::prelude::*;
use proptest::sample::Index;
use serde_json::Value;

const PARENT_KEY: &str = "parentId";

// ── Helpers ─────────────────────────────────────────────────────────────

type Shape = Vec<(Index, bool, String, u8)>;

fn shapes(max_len: usize) -> impl Strategy<Value = Shape> {
    proptest::collection::vec(
        (any::<Index>(), any::<bool>(), "[a-cA-C0-9]{0,4}", 0u8..4),
        0..=max_len,
    )
}

/// Build a well-formed tree: each entry hangs under an earlier folder or
/// becomes a root.
fn build(shape: &Shape) -> Vec<Node> {
    let mut folders: Vec<usize> = Vec::new();
    let mut parent_of: Vec<Option<usize>> = Vec::new();
    let mut nodes: Vec<Node> = Vec::new();

    for (position, (choice, is_folder, name, rank)) in shape.iter().enumerate()
    {
        let slot = choice.index(folders.len() + 1);
        parent_of.push(folders.get(slot).copied());
        let id = format!("n{position}");
        let node = if *is_folder {
            folders.push(position);
            Node::folder(id, name.clone())
        } else {
            Node::file(id, name.clone())
        };
        nodes.push(
            node.with_attribute("rank", *rank)
                .with_attribute("pos", position),
        );
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut roots = Vec::new();
    for (index, parent) in parent_of.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(index),
            None => roots.push(index),
        }
    }

    fn assemble(index: usize, nodes: &[Node], children: &[Vec<usize>]) -> Node {
        let mut node = nodes[index].clone();
        node.children = children[index]
            .iter()
            .map(|child| assemble(*child, nodes, children))
            .collect();
        node
    }

    roots
        .into_iter()
        .map(|index| assemble(index, &nodes, &children))
        .collect()
}

fn all_ids(tree: &[Node]) -> Vec<String> {
    flatten_tree(tree)
        .into_iter()
        .map(|node| node.id.clone())
        .collect()
}

fn with_parent_links(tree: &[Node]) -> Vec<Node> {
    fn walk(nodes: &[Node], parent: Option<&str>, out: &mut Vec<Node>) {
        for node in nodes {
            let mut entry = node.clone();
            entry.children.clear();
            entry.attributes.insert(
                PARENT_KEY.to_owned(),
                parent.map_or(Value::Null, Value::from),
            );
            out.push(entry);
            walk(&node.children, Some(&node.id), out);
        }
    }
    let mut out = Vec::new();
    walk(tree, None, &mut out);
    out
}

fn strip_parent_links(nodes: &mut [Node]) {
    for node in nodes {
        node.attributes.remove(PARENT_KEY);
        strip_parent_links(&mut node.children);
    }
}

fn pos(node: &Node) -> u64 {
    node.attribute("pos").and_then(|v| v.as_u64()).unwrap_or_default()
}

fn rank(node: &Node) -> u64 {
    node.attribute("rank").and_then(|v| v.as_u64()).unwrap_or_default()
}

fn check_sorted_level(nodes: &[Node]) -> Result<(), TestCaseError> {
    for pair in nodes.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        prop_assert!(
            left.is_folder() || !right.is_folder(),
            "file {} precedes folder {}",
            left.id,
            right.id
        );
        if left.is_folder() == right.is_folder() {
            prop_assert!(rank(left) <= rank(right));
            if rank(left) == rank(right) {
                prop_assert!(pos(left) < pos(right), "unstable tie");
            }
        }
    }
    for node in nodes {
        check_sorted_level(&node.children)?;
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. add_node keeps identifiers unique
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn add_node_preserves_unique_ids(
        shape in shapes(30),
        additions in proptest::collection::vec(
            ("(n[0-9]{1,2})?", any::<Index>(), any::<bool>()),
            1..10,
        ),
    ) {
        let mut tree = build(&shape);
        for (id, parent, with_child) in additions {
            let existing = all_ids(&tree);
            let parent_id = (!existing.is_empty())
                .then(|| existing[parent.index(existing.len())].clone());
            let mut node = Node::folder(id.clone(), "added");
            if with_child {
                node = node.with_children(vec![Node::file(id, "child")]);
            }
            tree = add_node(&tree, node, parent_id.as_deref());
        }

        let ids = all_ids(&tree);
        let unique: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert!(ids.iter().all(|id| !id.is_empty()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Flat round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn flat_round_trip_restores_tree(shape in shapes(40)) {
        let tree = build(&shape);
        let flat = with_parent_links(&tree);

        let mut rebuilt =
            build_tree_from_flat_array(flat, PARENT_KEY, &Value::Null);
        strip_parent_links(&mut rebuilt);

        prop_assert_eq!(rebuilt, tree);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-4. Move no-op and move legality
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn move_after_self_is_noop(shape in shapes(30)) {
        let tree = build(&shape);
        for id in all_ids(&tree) {
            let moved = move_node(&tree, &id, &id, DropPosition::After);
            prop_assert_eq!(&moved, &tree);
        }
    }

    #[test]
    fn move_inside_descendant_is_noop(shape in shapes(30)) {
        let tree = build(&shape);
        for node in flatten_tree(&tree) {
            for descendant in flatten_tree(&node.children) {
                prop_assert!(is_descendant(node, &descendant.id));
                let moved = move_node(
                    &tree,
                    &node.id,
                    &descendant.id,
                    DropPosition::Inside,
                );
                prop_assert_eq!(&moved, &tree);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Filter soundness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn keep_path_filter_is_sound(shape in shapes(40), needle in "[abc0-9]") {
        let tree = build(&shape);
        let matches = |node: &Node| node.name.contains(needle.as_str());
        let filtered = filter_tree(&tree, matches, true);

        for node in flatten_tree(&filtered) {
            let matched_below =
                flatten_tree(&node.children).into_iter().any(matches);
            prop_assert!(matches(node) || matched_below);
        }

        for node in flatten_tree(&tree).into_iter().filter(|n| matches(*n)) {
            prop_assert!(find_node_by_id(&filtered, &node.id).is_some());
            prop_assert_eq!(
                get_path_to_node(&filtered, &node.id),
                get_path_to_node(&tree, &node.id)
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Sort stability
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sort_is_stable_and_folders_first(shape in shapes(40)) {
        let tree = build(&shape);
        let sorted = sort_tree(&tree, "rank", true, true);

        check_sorted_level(&sorted)?;
        prop_assert_eq!(all_ids(&sorted).len(), all_ids(&tree).len());
    }
}
