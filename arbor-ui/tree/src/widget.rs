use std::collections::HashSet;

use arbor_tree::{
    Node, NodeId, Tree, find_node_by_id, find_parent_node, flatten_tree,
    search_tree,
};
use iced::Point;

use crate::callbacks::TreeCallbacks;
use crate::drag::{DragSession, DropCandidate, DropIndicator, can_drop, hit_test};
use crate::navigation::{NavKey, VisibleNode, visible_nodes};
use crate::rows::{
    PresentationContext, RowCache, RowPresentation, RowSlot, layout,
};
use crate::settings::{NodeAction, TreeSettings};

/// Construction options for [`TreeWidget`].
#[derive(Debug, Default)]
pub struct TreeOptions {
    pub data: Tree,
    pub settings: TreeSettings,
    pub actions: Vec<NodeAction>,
    pub callbacks: TreeCallbacks,
}

/// Interactive tree state: expansion, selection, filter, rendered rows and
/// the drag session over a host-owned tree snapshot.
///
/// The widget never edits its data. Drops, actions and context menus are
/// reported through [`TreeCallbacks`]; the host applies changes and pushes
/// the result back with [`TreeWidget::update_data`].
#[derive(Debug)]
pub struct TreeWidget {
    data: Tree,
    filtered: Option<Tree>,
    filter_text: String,
    expanded: HashSet<NodeId>,
    selected: Option<NodeId>,
    drag: DragSession,
    cursor: Point,
    settings: TreeSettings,
    actions: Vec<NodeAction>,
    callbacks: TreeCallbacks,
    cache: RowCache,
    rows: Vec<RowSlot>,
    destroyed: bool,
}

impl TreeWidget {
    pub fn new(options: TreeOptions) -> Self {
        let TreeOptions {
            data,
            settings,
            actions,
            callbacks,
        } = options;

        let mut widget = Self {
            data,
            filtered: None,
            filter_text: String::new(),
            expanded: HashSet::new(),
            selected: None,
            drag: DragSession::Idle,
            cursor: Point::ORIGIN,
            settings: settings.normalized(),
            actions,
            callbacks,
            cache: RowCache::default(),
            rows: Vec::new(),
            destroyed: false,
        };
        widget.render();
        widget
    }

    // --- Data ---

    /// Full, unfiltered tree.
    pub fn data(&self) -> &[Node] {
        &self.data
    }

    /// Tree currently shown: the filtered view when a filter is active.
    pub fn displayed_tree(&self) -> &[Node] {
        self.filtered.as_deref().unwrap_or(&self.data)
    }

    /// Replace the tree and re-apply the current filter.
    ///
    /// Expansion and selection identifiers are kept even when they no
    /// longer name a node.
    pub fn update_data(&mut self, tree: Tree) {
        if self.destroyed {
            return;
        }
        self.data = tree;
        self.apply_filter();
        self.render();
    }

    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    pub fn actions(&self) -> &[NodeAction] {
        &self.actions
    }

    pub fn action(&self, id: &str) -> Option<&NodeAction> {
        self.actions.iter().find(|action| action.id() == id)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // --- Filter ---

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered.is_some()
    }

    /// Show only nodes whose name contains `text`, with their ancestors.
    ///
    /// Folders in the filtered view are expanded so every match is visible.
    pub fn filter_tree(&mut self, text: &str) {
        if self.destroyed {
            return;
        }
        self.filter_text = text.to_owned();
        self.apply_filter();
        self.render();
    }

    fn apply_filter(&mut self) {
        if self.filter_text.trim().is_empty() {
            self.filtered = None;
            return;
        }
        let filtered = search_tree(&self.data, &self.filter_text, &[], true);
        for node in flatten_tree(&filtered) {
            if node.has_children() {
                self.expanded.insert(node.id.clone());
            }
        }
        self.filtered = Some(filtered);
    }

    // --- Expansion ---

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Expanded identifiers in sorted order.
    pub fn expanded_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.expanded.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn set_expanded_node_ids(
        &mut self,
        ids: impl IntoIterator<Item = NodeId>,
    ) {
        if self.destroyed {
            return;
        }
        self.expanded = ids.into_iter().collect();
        self.render();
    }

    /// Expand every node with children in the full data.
    pub fn expand_all(&mut self) {
        if self.destroyed {
            return;
        }
        let ids = flatten_tree(&self.data)
            .into_iter()
            .filter(|node| node.has_children())
            .map(|node| node.id.clone());
        self.expanded.extend(ids);
        self.render();
    }

    pub fn collapse_all(&mut self) {
        if self.destroyed {
            return;
        }
        self.expanded.clear();
        self.render();
    }

    /// Flip the expansion of `id` and notify the host.
    pub fn toggle_node(&mut self, id: &str) {
        if self.destroyed {
            return;
        }
        let Some(node) = find_node_by_id(&self.data, id) else {
            log::debug!("toggle ignored: {id} not found");
            return;
        };
        let expanded = !self.expanded.contains(id);
        if expanded {
            self.expanded.insert(id.to_owned());
        } else {
            self.expanded.remove(id);
        }
        self.callbacks.toggled(node, expanded);
        self.refresh_rows();
    }

    // --- Selection ---

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selected node resolved from the full data.
    pub fn selected_node(&self) -> Option<&Node> {
        self.selected
            .as_deref()
            .and_then(|id| find_node_by_id(&self.data, id))
    }

    /// Select `id` and notify the host. Absent identifiers are ignored.
    pub fn select_node(&mut self, id: &str) {
        if self.destroyed {
            return;
        }
        let Some(node) = find_node_by_id(&self.data, id) else {
            log::debug!("selection ignored: {id} not found");
            return;
        };
        self.selected = Some(id.to_owned());
        self.callbacks.selected(node);
    }

    // --- Rows ---

    pub fn rendered_rows(&self) -> impl Iterator<Item = &RowPresentation> {
        self.rows.iter().filter_map(|slot| self.cache.get(slot))
    }

    pub fn row(&self, index: usize) -> Option<&RowPresentation> {
        self.rows.get(index).and_then(|slot| self.cache.get(slot))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of sibling blocks built so far.
    pub fn row_builds(&self) -> usize {
        self.cache.builds()
    }

    /// Visible nodes of the displayed tree, in navigation order.
    pub fn visible_nodes(&self) -> Vec<VisibleNode<'_>> {
        visible_nodes(self.displayed_tree(), &self.expanded)
    }

    /// Drop cached blocks and lay rows out again.
    fn render(&mut self) {
        self.cache.clear();
        self.refresh_rows();
    }

    fn refresh_rows(&mut self) {
        let context = PresentationContext {
            settings: &self.settings,
            actions: &self.actions,
            filter: &self.filter_text,
        };
        let tree = self.filtered.as_deref().unwrap_or(&self.data);
        self.rows = layout(tree, &self.expanded, &mut self.cache, &context);
    }

    fn row_id(&self, index: usize) -> Option<NodeId> {
        self.row(index).map(|row| row.id.clone())
    }

    // --- Pointer ---

    /// Last pointer position relative to the row list.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    /// Overlay for the recorded drop candidate, if any.
    pub fn drop_indicator(&self) -> Option<DropIndicator> {
        self.drag.candidate().map(|candidate| DropIndicator {
            row: candidate.row,
            position: candidate.position,
            row_height: self.settings.row_height(),
        })
    }

    /// Press on a row body: selects the node and starts a drag.
    pub fn press_row(&mut self, index: usize) {
        if self.destroyed {
            return;
        }
        let id = self.row_id(index);
        if !self.settings.drag_enabled() {
            if let Some(id) = id {
                self.select_node(&id);
            }
            return;
        }

        let Some(id) =
            id.filter(|id| find_node_by_id(&self.data, id).is_some())
        else {
            log::debug!("drag start failed: no node at row {index}");
            self.drag.cancel();
            return;
        };
        self.drag.begin(id.clone());
        self.select_node(&id);
    }

    /// Press on a row's expansion toggle.
    pub fn press_toggle(&mut self, index: usize) {
        if let Some(id) = self.row_id(index) {
            self.toggle_node(&id);
        }
    }

    /// Press on a per-row action button.
    pub fn invoke_action(&mut self, index: usize, action_id: &str) {
        if self.destroyed {
            return;
        }
        let Some(row) = self.row(index) else {
            return;
        };
        if !row.actions.iter().any(|id| id == action_id) {
            log::debug!("action {action_id} is not offered on {}", row.id);
            return;
        }
        let Some(node) = find_node_by_id(&self.data, &row.id) else {
            return;
        };
        self.callbacks.action(action_id, node);
    }

    /// Secondary press on a row; reports the last pointer position.
    pub fn request_context_menu(&mut self, index: usize) {
        if self.destroyed {
            return;
        }
        let Some(row) = self.row(index) else {
            return;
        };
        let Some(node) = find_node_by_id(&self.data, &row.id) else {
            return;
        };
        self.callbacks.context_menu(node, self.cursor);
    }

    /// Track the pointer and recompute the drop candidate while dragging.
    pub fn move_pointer(&mut self, position: Point) {
        if self.destroyed {
            return;
        }
        self.cursor = position;
        let Some(source) = self.drag.source().map(str::to_owned) else {
            return;
        };
        let candidate = self.candidate_at(&source, position);
        self.drag.hover(candidate);
    }

    /// The pointer left the row list.
    pub fn leave_pointer(&mut self) {
        if self.destroyed {
            return;
        }
        self.drag.hover(None);
    }

    /// End a drag. Emits a drop only for a candidate that is legal now.
    pub fn release_pointer(&mut self) {
        if self.destroyed || !self.drag.is_dragging() {
            return;
        }
        let Some((source, candidate)) = self.drag.release() else {
            log::debug!("drag cancelled without a drop target");
            return;
        };
        let (Some(dragged), Some(target)) = (
            find_node_by_id(&self.data, &source),
            find_node_by_id(&self.data, &candidate.target),
        ) else {
            return;
        };
        log::debug!(
            "drop {source} {} {}",
            candidate.position,
            candidate.target
        );
        self.callbacks.dropped(dragged, target, candidate.position);
    }

    fn candidate_at(&self, source: &str, point: Point) -> Option<DropCandidate> {
        let folders: Vec<bool> =
            self.rendered_rows().map(RowPresentation::is_folder).collect();
        let (row, position) =
            hit_test(point, self.settings.row_height(), &folders)?;
        let target = self.row_id(row)?;
        if !can_drop(&self.data, source, &target, position) {
            return None;
        }
        Some(DropCandidate {
            target,
            position,
            row,
        })
    }

    // --- Keyboard ---

    pub fn handle_key(&mut self, key: NavKey) {
        if self.destroyed || !self.settings.keyboard_navigation() {
            return;
        }
        match key {
            NavKey::Up | NavKey::Down => self.step_selection(key),
            NavKey::Left | NavKey::Right | NavKey::Enter | NavKey::Space => {
                self.act_on_selection(key)
            },
        }
    }

    fn step_selection(&mut self, key: NavKey) {
        let visible: Vec<NodeId> = self
            .visible_nodes()
            .into_iter()
            .map(|entry| entry.node.id.clone())
            .collect();
        let current = self
            .selected
            .as_ref()
            .and_then(|id| visible.iter().position(|item| item == id));

        let next = match (key, current) {
            (NavKey::Up, Some(index)) => index.checked_sub(1),
            (NavKey::Up, None) => visible.len().checked_sub(1),
            (_, Some(index)) => Some(index + 1),
            (_, None) => Some(0),
        };
        if let Some(id) = next.and_then(|index| visible.get(index)) {
            self.select_node(id);
        }
    }

    fn act_on_selection(&mut self, key: NavKey) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        let (has_children, first_child, parent) = {
            let tree = self.displayed_tree();
            let Some(node) = find_node_by_id(tree, &id) else {
                return;
            };
            (
                node.has_children(),
                node.children.first().map(|child| child.id.clone()),
                find_parent_node(tree, &id)
                    .parent()
                    .map(|parent| parent.id.clone()),
            )
        };

        match key {
            NavKey::Right if has_children => {
                if !self.is_expanded(&id) {
                    self.toggle_node(&id);
                } else if let Some(child) = first_child {
                    self.select_node(&child);
                }
            },
            NavKey::Left => {
                if has_children && self.is_expanded(&id) {
                    self.toggle_node(&id);
                } else if let Some(parent) = parent {
                    self.select_node(&parent);
                }
            },
            NavKey::Enter => {
                if let Some(node) = find_node_by_id(&self.data, &id) {
                    self.callbacks.activated(node);
                }
            },
            NavKey::Space if has_children => self.toggle_node(&id),
            _ => {},
        }
    }

    // --- Teardown ---

    /// Clear all state and silence every sink. Later input is ignored.
    pub fn destroy(&mut self) {
        self.data.clear();
        self.filtered = None;
        self.filter_text.clear();
        self.expanded.clear();
        self.selected = None;
        self.drag = DragSession::Idle;
        self.cache.clear();
        self.rows.clear();
        self.callbacks = TreeCallbacks::default();
        self.destroyed = true;
    }
}
