use std::collections::HashSet;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::node::{DropPosition, Node, NodeId, NodeKind, Tree};
use crate::query::{collect_ids, find_node_by_id, find_node_by_id_mut};

const ID_PREFIX: &str = "tree_";

/// Generate a fresh node identifier.
pub fn generate_id() -> NodeId {
    format!("{ID_PREFIX}{}", Uuid::new_v4().simple())
}

/// Relocate `source_id` relative to `target_id`.
///
/// Returns an unchanged copy when either node is missing, when `Inside`
/// targets a non-folder, or when the target lives inside the moved subtree.
pub fn move_node(
    tree: &[Node],
    source_id: &str,
    target_id: &str,
    position: DropPosition,
) -> Tree {
    let Some(target) = find_node_by_id(tree, target_id) else {
        log::debug!("move skipped: target {target_id} not found");
        return tree.to_vec();
    };
    if position == DropPosition::Inside && !target.is_folder() {
        log::debug!("move skipped: target {target_id} is not a folder");
        return tree.to_vec();
    }

    let mut working = tree.to_vec();
    let Some(source) = detach(&mut working, source_id) else {
        log::debug!("move skipped: source {source_id} not found");
        return tree.to_vec();
    };

    let inserted = match position {
        DropPosition::Inside => match find_node_by_id_mut(&mut working, target_id)
        {
            Some(folder) => {
                folder.children.insert(0, source);
                true
            },
            None => false,
        },
        DropPosition::Before | DropPosition::After => {
            insert_relative(&mut working, source, target_id, position).is_ok()
        },
    };

    if inserted {
        working
    } else {
        log::warn!(
            "move rejected: {target_id} is {source_id} or one of its descendants"
        );
        tree.to_vec()
    }
}

fn detach(nodes: &mut Vec<Node>, id: &str) -> Option<Node> {
    if let Some(index) = nodes.iter().position(|node| node.id == id) {
        return Some(nodes.remove(index));
    }
    nodes
        .iter_mut()
        .find_map(|node| detach(&mut node.children, id))
}

fn insert_relative(
    nodes: &mut Vec<Node>,
    node: Node,
    target_id: &str,
    position: DropPosition,
) -> Result<(), Node> {
    if let Some(index) = nodes.iter().position(|item| item.id == target_id) {
        let at = match position {
            DropPosition::Before => index,
            DropPosition::After | DropPosition::Inside => index + 1,
        };
        nodes.insert(at, node);
        return Ok(());
    }

    let mut pending = node;
    for item in nodes.iter_mut() {
        match insert_relative(&mut item.children, pending, target_id, position)
        {
            Ok(()) => return Ok(()),
            Err(back) => pending = back,
        }
    }
    Err(pending)
}

/// Append `node` to the children of `parent_id`, or to the roots.
///
/// The node and its descendants receive generated identifiers when theirs
/// are empty or already taken. A missing or non-folder parent appends to
/// the root sequence.
pub fn add_node(tree: &[Node], node: Node, parent_id: Option<&str>) -> Tree {
    let mut result = tree.to_vec();
    let mut taken = collect_ids(tree);
    let mut node = node;
    assign_ids(&mut node, &mut taken);

    let parent = parent_id.and_then(|id| find_node_by_id_mut(&mut result, id));
    match parent {
        Some(parent) if parent.is_folder() => parent.children.push(node),
        Some(parent) => {
            log::warn!(
                "node {} is not a folder; appending {} to the roots",
                parent.id,
                node.id
            );
            result.push(node);
        },
        None => result.push(node),
    }
    result
}

fn assign_ids(node: &mut Node, taken: &mut HashSet<NodeId>) {
    if node.id.is_empty() || taken.contains(&node.id) {
        let id = generate_id();
        log::debug!("assigned id {id} to node {:?}", node.name);
        node.id = id;
    }
    taken.insert(node.id.clone());
    for child in &mut node.children {
        assign_ids(child, taken);
    }
}

/// Delete a node and its subtree.
pub fn remove_node(tree: &[Node], id: &str) -> Tree {
    let mut result = tree.to_vec();
    if detach(&mut result, id).is_none() {
        log::debug!("remove skipped: {id} not found");
    }
    result
}

/// Shallow-merge `changes` into the node carrying `id`.
///
/// `name`, `type`, `expanded` and `children` update the typed fields;
/// `id` is never rewritten. Other keys land in the extra attributes.
pub fn update_node(tree: &[Node], id: &str, changes: &Map<String, Value>) -> Tree {
    let mut result = tree.to_vec();
    let Some(node) = find_node_by_id_mut(&mut result, id) else {
        log::debug!("update skipped: {id} not found");
        return result;
    };

    for (key, value) in changes {
        match key.as_str() {
            "id" => {
                if value.as_str() != Some(id) {
                    log::warn!("ignoring id change for node {id}");
                }
            },
            "name" => match value.as_str() {
                Some(name) => node.name = name.to_owned(),
                None => warn_ill_typed(id, key),
            },
            "type" => match value.as_str() {
                Some(kind) => node.kind = NodeKind::from(kind),
                None => warn_ill_typed(id, key),
            },
            "expanded" => match value {
                Value::Bool(flag) => node.expanded = Some(*flag),
                Value::Null => node.expanded = None,
                _ => warn_ill_typed(id, key),
            },
            "children" => {
                match serde_json::from_value::<Vec<Node>>(value.clone()) {
                    Ok(children) => node.children = children,
                    Err(err) => {
                        log::warn!("invalid children for node {id}: {err}")
                    },
                }
            },
            _ => {
                node.attributes.insert(key.clone(), value.clone());
            },
        }
    }
    result
}

fn warn_ill_typed(id: &str, key: &str) {
    log::warn!("ignoring ill-typed {key} for node {id}");
}
