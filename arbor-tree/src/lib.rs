//! Structural operations over folder/item trees.
//!
//! Every operation takes a borrowed [`Tree`] and returns a new value; the
//! input is never mutated. Lookups that miss are signalled with `None`,
//! [`ParentLookup::NotFound`] or an unchanged copy, never with an error.
//! Only the JSON boundary ([`import_from_json`], [`export_to_json`])
//! returns [`TreeError`].
//!
//! # Quick Example
//!
//! ```
//! use arbor_tree::{DropPosition, Node, move_node, search_tree};
//!
//! let tree = vec![
//!     Node::folder("a", "Documents")
//!         .with_children(vec![Node::file("b", "notes.txt")]),
//!     Node::file("c", "todo.txt"),
//! ];
//!
//! let moved = move_node(&tree, "c", "a", DropPosition::Inside);
//! assert_eq!(moved[0].children[0].id, "c");
//!
//! let found = search_tree(&moved, "notes", &[], true);
//! assert_eq!(found[0].children.len(), 1);
//! ```

mod edit;
mod errors;
mod filter;
mod flat;
mod interchange;
mod node;
mod order;
mod query;

pub use edit::{add_node, generate_id, move_node, remove_node, update_node};
pub use errors::TreeError;
pub use filter::{
    DEFAULT_SEARCH_ATTRIBUTES, filter_tree, matches_text, search_tree,
};
pub use flat::build_tree_from_flat_array;
pub use interchange::{export_to_json, import_from_json, validate_tree};
pub use node::{DropPosition, Node, NodeId, NodeKind, Tree};
pub use order::{compare_natural, compare_values, sort_tree};
pub use query::{
    ParentLookup, find_node_by_id, find_parent_node, flatten_tree,
    get_expanded_for_node, get_path_to_node, is_descendant,
};
