use std::collections::HashSet;

use crate::errors::TreeError;
use crate::node::{Node, Tree};

/// Render a tree as pretty-printed JSON.
pub fn export_to_json(tree: &[Node]) -> Result<String, TreeError> {
    Ok(serde_json::to_string_pretty(tree)?)
}

/// Parse and validate a JSON tree.
///
/// Blank input is a legitimately empty tree. Malformed JSON and payloads
/// violating the tree invariants are errors.
pub fn import_from_json(text: &str) -> Result<Tree, TreeError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tree: Tree = serde_json::from_str(text).map_err(|err| {
        log::warn!("failed to parse tree JSON: {err}");
        TreeError::from(err)
    })?;

    if let Err(err) = validate_tree(&tree) {
        log::warn!("rejected imported tree: {err}");
        return Err(err);
    }
    Ok(tree)
}

/// Check identifier uniqueness and folder-only containment.
pub fn validate_tree(tree: &[Node]) -> Result<(), TreeError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&Node> = tree.iter().collect();
    while let Some(node) = stack.pop() {
        if node.id.is_empty() {
            return Err(TreeError::MissingId);
        }
        if !seen.insert(node.id.as_str()) {
            return Err(TreeError::DuplicateId(node.id.clone()));
        }
        if node.has_children() && !node.is_folder() {
            return Err(TreeError::ChildrenOnNonFolder(node.id.clone()));
        }
        stack.extend(node.children.iter());
    }
    Ok(())
}
