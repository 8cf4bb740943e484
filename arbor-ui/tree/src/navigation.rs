use std::collections::HashSet;

use arbor_tree::{Node, NodeId};
use iced::keyboard::Key;
use iced::keyboard::key::Named;

/// Keys understood by tree keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
}

impl NavKey {
    /// Map an `iced` key to a navigation key.
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Named(Named::ArrowUp) => Some(Self::Up),
            Key::Named(Named::ArrowDown) => Some(Self::Down),
            Key::Named(Named::ArrowLeft) => Some(Self::Left),
            Key::Named(Named::ArrowRight) => Some(Self::Right),
            Key::Named(Named::Enter) => Some(Self::Enter),
            Key::Named(Named::Space) => Some(Self::Space),
            Key::Character(text) if text.as_str() == " " => Some(Self::Space),
            _ => None,
        }
    }
}

/// A node reachable from the roots through expanded folders only.
#[derive(Debug, Clone, Copy)]
pub struct VisibleNode<'a> {
    pub node: &'a Node,
    pub depth: usize,
}

/// Pre-order sequence of visible nodes.
pub fn visible_nodes<'a>(
    tree: &'a [Node],
    expanded: &HashSet<NodeId>,
) -> Vec<VisibleNode<'a>> {
    let mut result = Vec::new();
    let mut stack: Vec<VisibleNode<'a>> = tree
        .iter()
        .rev()
        .map(|node| VisibleNode { node, depth: 0 })
        .collect();

    while let Some(entry) = stack.pop() {
        result.push(entry);
        if entry.node.has_children() && expanded.contains(&entry.node.id) {
            stack.extend(entry.node.children.iter().rev().map(|node| {
                VisibleNode {
                    node,
                    depth: entry.depth + 1,
                }
            }));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(visible: &[VisibleNode<'_>]) -> Vec<String> {
        visible.iter().map(|entry| entry.node.id.clone()).collect()
    }

    #[test]
    fn given_collapsed_folder_when_listing_visible_then_children_are_hidden() {
        let tree = vec![
            Node::folder("r", "R").with_children(vec![
                Node::folder("x", "X").with_children(vec![Node::file("p", "P")]),
                Node::file("y", "Y"),
            ]),
        ];
        let mut expanded = HashSet::from([String::from("r")]);
        assert_eq!(ids(&visible_nodes(&tree, &expanded)), vec!["r", "x", "y"]);

        expanded.insert(String::from("x"));
        let visible = visible_nodes(&tree, &expanded);
        assert_eq!(ids(&visible), vec!["r", "x", "p", "y"]);
        assert_eq!(visible[2].depth, 2);
    }

    #[test]
    fn given_expanded_child_under_collapsed_parent_then_it_stays_hidden() {
        let tree = vec![Node::folder("r", "R").with_children(vec![
            Node::folder("x", "X").with_children(vec![Node::file("p", "P")]),
        ])];
        let expanded = HashSet::from([String::from("x")]);
        assert_eq!(ids(&visible_nodes(&tree, &expanded)), vec!["r"]);
    }

    #[test]
    fn given_named_keys_when_mapped_then_navigation_keys_are_returned() {
        assert_eq!(
            NavKey::from_key(&Key::Named(Named::ArrowDown)),
            Some(NavKey::Down)
        );
        assert_eq!(NavKey::from_key(&Key::Named(Named::Enter)), Some(NavKey::Enter));
        assert_eq!(NavKey::from_key(&Key::Named(Named::Escape)), None);
    }
}
