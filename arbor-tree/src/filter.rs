use serde_json::Value;

use crate::node::{Node, Tree};

/// Attributes searched when the caller names none.
pub const DEFAULT_SEARCH_ATTRIBUTES: &[&str] = &["name"];

/// Keep the nodes accepted by `predicate`.
///
/// With `keep_path`, every ancestor of a surviving node survives too.
/// Without it, a node survives only when it matches and its parent
/// survives. Survivors keep their relative order.
pub fn filter_tree<F>(tree: &[Node], predicate: F, keep_path: bool) -> Tree
where
    F: Fn(&Node) -> bool,
{
    prune(tree, &predicate, keep_path)
}

fn prune<F>(nodes: &[Node], predicate: &F, keep_path: bool) -> Vec<Node>
where
    F: Fn(&Node) -> bool,
{
    nodes
        .iter()
        .filter_map(|node| {
            let children = prune(&node.children, predicate, keep_path);
            let keep =
                predicate(node) || (keep_path && !children.is_empty());
            keep.then(|| Node {
                id: node.id.clone(),
                name: node.name.clone(),
                kind: node.kind.clone(),
                children,
                expanded: node.expanded,
                attributes: node.attributes.clone(),
            })
        })
        .collect()
}

/// Case-insensitive substring search over the named attributes.
///
/// An empty query returns the tree unchanged; an empty attribute list
/// searches [`DEFAULT_SEARCH_ATTRIBUTES`].
pub fn search_tree(
    tree: &[Node],
    text: &str,
    attributes: &[&str],
    keep_path: bool,
) -> Tree {
    if text.trim().is_empty() {
        return tree.to_vec();
    }
    let needle = text.to_lowercase();
    let attributes = if attributes.is_empty() {
        DEFAULT_SEARCH_ATTRIBUTES
    } else {
        attributes
    };
    filter_tree(
        tree,
        |node| matches_text(node, &needle, attributes),
        keep_path,
    )
}

/// Whether any named attribute contains `needle` (already lowercased).
pub fn matches_text(node: &Node, needle: &str, attributes: &[&str]) -> bool {
    attributes.iter().any(|key| {
        searchable_text(node.attribute(key).as_ref())
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

fn searchable_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
