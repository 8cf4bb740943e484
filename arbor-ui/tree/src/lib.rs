//! Interactive [`iced`] tree widget over [`arbor_tree`] values.
//!
//! The crate is split into two layers:
//! - [`TreeWidget`] holds expansion, selection, filter, drag and keyboard
//!   state and can be driven without a window;
//! - [`view`] renders that state and emits [`TreeMessage`]s, which the host
//!   routes back through [`TreeWidget::update`].
//!
//! The widget never edits its tree. Drops and actions arrive at the host as
//! [`TreeEvent`]s (or through closures registered on [`TreeCallbacks`]); the
//! host applies them with `arbor_tree` operations and pushes the result back
//! with [`TreeWidget::update_data`].
//!
//! See `examples/tree_view.rs` for a complete runnable example.
//!
//! # Quick Example
//!
//! ```no_run
//! use std::sync::mpsc;
//!
//! use arbor_tree::{Node, move_node};
//! use arbor_ui_tree::{TreeCallbacks, TreeEvent, TreeOptions, TreeWidget};
//!
//! let (sender, events) = mpsc::channel();
//! let mut widget = TreeWidget::new(TreeOptions {
//!     data: vec![
//!         Node::folder("a", "Documents"),
//!         Node::file("b", "todo.txt"),
//!     ],
//!     callbacks: TreeCallbacks::forward_to(sender),
//!     ..Default::default()
//! });
//!
//! for event in events.try_iter() {
//!     if let TreeEvent::Dropped { dragged, target, position } = event {
//!         let moved = move_node(widget.data(), &dragged.id, &target.id, position);
//!         widget.update_data(moved);
//!     }
//! }
//! ```

mod callbacks;
mod drag;
mod errors;
mod event;
mod navigation;
mod reducer;
mod rows;
mod settings;
mod view;
mod widget;

pub use callbacks::{TreeCallbacks, TreeEvent};
pub use drag::{
    DragSession, DropCandidate, DropIndicator, can_drop, hit_test,
};
pub use errors::SettingsError;
pub use event::TreeMessage;
pub use navigation::{NavKey, VisibleNode, visible_nodes};
pub use rows::{LabelSegment, RowIcon, RowPresentation, highlight};
pub use settings::{
    DEFAULT_INDENT_WIDTH, DEFAULT_ROW_HEIGHT, NodeAction, TreeSettings,
};
pub use view::view;
pub use widget::{TreeOptions, TreeWidget};
