use std::collections::HashSet;

use crate::node::{Node, NodeId};

/// Result of looking up the parent of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParentLookup<'a> {
    /// The node exists and sits in the root sequence.
    Root,
    /// The node exists under this parent.
    Child(&'a Node),
    /// No node carries the identifier.
    NotFound,
}

impl<'a> ParentLookup<'a> {
    /// Return the parent node, if the target has one.
    pub fn parent(self) -> Option<&'a Node> {
        match self {
            Self::Child(parent) => Some(parent),
            Self::Root | Self::NotFound => None,
        }
    }

    pub fn is_found(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Depth-first pre-order search for a node.
pub fn find_node_by_id<'a>(tree: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node_by_id(&node.children, id) {
            return Some(found);
        }
    }
    None
}

pub(crate) fn find_node_by_id_mut<'a>(
    tree: &'a mut [Node],
    id: &str,
) -> Option<&'a mut Node> {
    for node in tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node_by_id_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Find the immediate parent of a node.
pub fn find_parent_node<'a>(tree: &'a [Node], id: &str) -> ParentLookup<'a> {
    if tree.iter().any(|node| node.id == id) {
        return ParentLookup::Root;
    }
    find_parent_in(tree, id).map_or(ParentLookup::NotFound, ParentLookup::Child)
}

fn find_parent_in<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.children.iter().any(|child| child.id == id) {
            return Some(node);
        }
        if let Some(found) = find_parent_in(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Return ancestor identifiers from the root down to the immediate parent.
///
/// Empty when the node is a root or absent.
pub fn get_path_to_node(tree: &[Node], id: &str) -> Vec<NodeId> {
    let mut path = Vec::new();
    if path_to(tree, id, &mut path) {
        path
    } else {
        Vec::new()
    }
}

fn path_to(nodes: &[Node], id: &str, path: &mut Vec<NodeId>) -> bool {
    for node in nodes {
        if node.id == id {
            return true;
        }
        if node.has_children() {
            path.push(node.id.clone());
            if path_to(&node.children, id, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}

/// Identifiers that must be expanded for `id` to become visible.
pub fn get_expanded_for_node(tree: &[Node], id: &str) -> HashSet<NodeId> {
    get_path_to_node(tree, id).into_iter().collect()
}

/// Whether `id` names a node strictly inside `node`'s subtree.
pub fn is_descendant(node: &Node, id: &str) -> bool {
    node.children
        .iter()
        .any(|child| child.id == id || is_descendant(child, id))
}

/// Full pre-order traversal, independent of any expansion state.
pub fn flatten_tree(tree: &[Node]) -> Vec<&Node> {
    let mut result = Vec::new();
    let mut stack: Vec<&Node> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        result.push(node);
        stack.extend(node.children.iter().rev());
    }
    result
}

/// Collect every identifier in the tree.
pub(crate) fn collect_ids(tree: &[Node]) -> HashSet<NodeId> {
    flatten_tree(tree)
        .into_iter()
        .map(|node| node.id.clone())
        .collect()
}
