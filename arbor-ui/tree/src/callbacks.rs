use std::sync::mpsc::Sender;

use arbor_tree::{DropPosition, Node};
use iced::Point;

type NodeSink = Box<dyn FnMut(&Node)>;
type ToggleSink = Box<dyn FnMut(&Node, bool)>;
type ContextMenuSink = Box<dyn FnMut(&Node, Point)>;
type ActionSink = Box<dyn FnMut(&str, &Node)>;
type DropSink = Box<dyn FnMut(&Node, &Node, DropPosition)>;

/// Owned notification emitted by a tree widget.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    Selected(Node),
    Activated(Node),
    Toggled {
        node: Node,
        expanded: bool,
    },
    ContextMenu {
        node: Node,
        position: Point,
    },
    Action {
        action_id: String,
        node: Node,
    },
    Dropped {
        dragged: Node,
        target: Node,
        position: DropPosition,
    },
}

/// Notification sinks. Every sink defaults to a no-op.
pub struct TreeCallbacks {
    on_select: NodeSink,
    on_activate: Option<NodeSink>,
    on_toggle: ToggleSink,
    on_context_menu: ContextMenuSink,
    on_node_action: ActionSink,
    on_drop: DropSink,
}

impl Default for TreeCallbacks {
    fn default() -> Self {
        Self {
            on_select: Box::new(|_| {}),
            on_activate: None,
            on_toggle: Box::new(|_, _| {}),
            on_context_menu: Box::new(|_, _| {}),
            on_node_action: Box::new(|_, _| {}),
            on_drop: Box::new(|_, _, _| {}),
        }
    }
}

impl TreeCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build sinks that forward every notification as a [`TreeEvent`].
    ///
    /// Enter activations arrive as [`TreeEvent::Activated`].
    pub fn forward_to(sender: Sender<TreeEvent>) -> Self {
        let select = sender.clone();
        let activate = sender.clone();
        let toggle = sender.clone();
        let menu = sender.clone();
        let action = sender.clone();
        let dropped = sender;

        Self::new()
            .on_select(move |node| {
                forward(&select, TreeEvent::Selected(node.clone()))
            })
            .on_activate(move |node| {
                forward(&activate, TreeEvent::Activated(node.clone()))
            })
            .on_toggle(move |node, expanded| {
                forward(
                    &toggle,
                    TreeEvent::Toggled {
                        node: node.clone(),
                        expanded,
                    },
                )
            })
            .on_context_menu(move |node, position| {
                forward(
                    &menu,
                    TreeEvent::ContextMenu {
                        node: node.clone(),
                        position,
                    },
                )
            })
            .on_node_action(move |action_id, node| {
                forward(
                    &action,
                    TreeEvent::Action {
                        action_id: action_id.to_owned(),
                        node: node.clone(),
                    },
                )
            })
            .on_drop(move |dragged, target, position| {
                forward(
                    &dropped,
                    TreeEvent::Dropped {
                        dragged: dragged.clone(),
                        target: target.clone(),
                        position,
                    },
                )
            })
    }

    pub fn on_select(mut self, sink: impl FnMut(&Node) + 'static) -> Self {
        self.on_select = Box::new(sink);
        self
    }

    /// Receive Enter activations separately from selections.
    pub fn on_activate(mut self, sink: impl FnMut(&Node) + 'static) -> Self {
        self.on_activate = Some(Box::new(sink));
        self
    }

    pub fn on_toggle(mut self, sink: impl FnMut(&Node, bool) + 'static) -> Self {
        self.on_toggle = Box::new(sink);
        self
    }

    pub fn on_context_menu(
        mut self,
        sink: impl FnMut(&Node, Point) + 'static,
    ) -> Self {
        self.on_context_menu = Box::new(sink);
        self
    }

    pub fn on_node_action(
        mut self,
        sink: impl FnMut(&str, &Node) + 'static,
    ) -> Self {
        self.on_node_action = Box::new(sink);
        self
    }

    pub fn on_drop(
        mut self,
        sink: impl FnMut(&Node, &Node, DropPosition) + 'static,
    ) -> Self {
        self.on_drop = Box::new(sink);
        self
    }

    pub(crate) fn selected(&mut self, node: &Node) {
        (self.on_select)(node);
    }

    pub(crate) fn activated(&mut self, node: &Node) {
        match self.on_activate.as_mut() {
            Some(sink) => sink(node),
            None => (self.on_select)(node),
        }
    }

    pub(crate) fn toggled(&mut self, node: &Node, expanded: bool) {
        (self.on_toggle)(node, expanded);
    }

    pub(crate) fn context_menu(&mut self, node: &Node, position: Point) {
        (self.on_context_menu)(node, position);
    }

    pub(crate) fn action(&mut self, action_id: &str, node: &Node) {
        (self.on_node_action)(action_id, node);
    }

    pub(crate) fn dropped(
        &mut self,
        dragged: &Node,
        target: &Node,
        position: DropPosition,
    ) {
        (self.on_drop)(dragged, target, position);
    }
}

impl std::fmt::Debug for TreeCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeCallbacks")
            .field("on_activate", &self.on_activate.is_some())
            .finish_non_exhaustive()
    }
}

fn forward(sender: &Sender<TreeEvent>, event: TreeEvent) {
    if sender.send(event).is_err() {
        log::debug!("tree event dropped: receiver closed");
    }
}
