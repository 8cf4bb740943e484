use crate::event::TreeMessage;
use crate::widget::TreeWidget;

impl TreeWidget {
    /// Apply a view message.
    pub fn update(&mut self, message: TreeMessage) {
        use TreeMessage::*;

        match message {
            FilterChanged(text) => {
                if self.settings().search_enabled() {
                    self.filter_tree(&text);
                }
            },
            FilterCleared => self.filter_tree(""),
            RowPressed(row) => self.press_row(row),
            ToggleClicked(row) => self.press_toggle(row),
            ActionClicked { row, action_id } => {
                self.invoke_action(row, &action_id)
            },
            RowRightClicked(row) => self.request_context_menu(row),
            CursorMoved(position) => self.move_pointer(position),
            CursorLeft => self.leave_pointer(),
            PointerReleased => self.release_pointer(),
            Key(key) => self.handle_key(key),
            ExpandAll => self.expand_all(),
            CollapseAll => self.collapse_all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use arbor_tree::{DropPosition, Node, move_node};
    use iced::keyboard::Key;
    use iced::{Point, mouse};
    use iced::keyboard::key::Named;

    use crate::callbacks::{TreeCallbacks, TreeEvent};
    use crate::drag::DragSession;
    use crate::event::TreeMessage;
    use crate::navigation::NavKey;
    use crate::settings::TreeSettings;
    use crate::widget::{TreeOptions, TreeWidget};

    fn tree() -> Vec<Node> {
        vec![
            Node::folder("docs", "Documents")
                .with_children(vec![Node::file("cv", "cv.pdf")]),
            Node::file("todo", "todo.txt"),
        ]
    }

    #[test]
    fn given_drop_messages_when_host_applies_move_then_widget_shows_new_tree() {
        let (sender, receiver) = mpsc::channel();
        let mut widget = TreeWidget::new(TreeOptions {
            data: tree(),
            callbacks: TreeCallbacks::forward_to(sender),
            ..Default::default()
        });

        widget.update(TreeMessage::RowPressed(1));
        widget.update(TreeMessage::CursorMoved(Point::new(8.0, 12.0)));
        widget.update(TreeMessage::PointerReleased);

        let dropped = receiver
            .try_iter()
            .find_map(|event| match event {
                TreeEvent::Dropped {
                    dragged,
                    target,
                    position,
                } => Some((dragged.id, target.id, position)),
                _ => None,
            })
            .expect("drop should be emitted");
        assert_eq!(
            dropped,
            (String::from("todo"), String::from("docs"), DropPosition::Inside)
        );

        let moved =
            move_node(widget.data(), &dropped.0, &dropped.1, dropped.2);
        widget.update_data(moved);
        widget.update(TreeMessage::ExpandAll);
        let ids: Vec<&str> =
            widget.rendered_rows().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["docs", "todo", "cv"]);
    }

    #[test]
    fn given_search_disabled_when_filter_changes_then_view_is_unfiltered() {
        let mut widget = TreeWidget::new(TreeOptions {
            data: tree(),
            settings: TreeSettings::default().with_search_enabled(false),
            ..Default::default()
        });
        widget.update(TreeMessage::FilterChanged(String::from("cv")));
        assert!(!widget.is_filtered());
    }

    #[test]
    fn given_filter_messages_when_cleared_then_full_tree_returns() {
        let mut widget = TreeWidget::new(TreeOptions {
            data: tree(),
            ..Default::default()
        });
        widget.update(TreeMessage::FilterChanged(String::from("cv")));
        assert_eq!(widget.row_count(), 2);
        widget.update(TreeMessage::FilterCleared);
        assert!(!widget.is_filtered());
        assert_eq!(widget.filter_text(), "");
    }

    #[test]
    fn given_release_below_rows_when_pointer_returns_then_no_drop_follows() {
        let (sender, receiver) = mpsc::channel();
        let mut widget = TreeWidget::new(TreeOptions {
            data: tree(),
            callbacks: TreeCallbacks::forward_to(sender),
            ..Default::default()
        });

        widget.update(TreeMessage::RowPressed(1));
        widget.update(TreeMessage::CursorMoved(Point::new(8.0, 12.0)));
        widget.update(TreeMessage::CursorLeft);
        widget.update(TreeMessage::PointerReleased);
        assert_eq!(widget.drag_session(), &DragSession::Cancelled);

        widget.update(TreeMessage::CursorMoved(Point::new(8.0, 12.0)));
        assert_eq!(widget.drop_indicator(), None);
        widget.update(TreeMessage::PointerReleased);
        assert_eq!(widget.drag_session(), &DragSession::Cancelled);

        let drops = receiver
            .try_iter()
            .filter(|event| matches!(event, TreeEvent::Dropped { .. }))
            .count();
        assert_eq!(drops, 0);
    }

    #[test]
    fn given_window_left_release_when_translated_then_drag_ends() {
        let release = mouse::Event::ButtonReleased(mouse::Button::Left);
        assert_eq!(
            TreeMessage::from_mouse(&release),
            Some(TreeMessage::PointerReleased)
        );
        let right = mouse::Event::ButtonReleased(mouse::Button::Right);
        assert_eq!(TreeMessage::from_mouse(&right), None);

        let mut widget = TreeWidget::new(TreeOptions {
            data: tree(),
            ..Default::default()
        });
        widget.update(TreeMessage::RowPressed(1));
        widget.update(TreeMessage::CursorLeft);
        if let Some(message) = TreeMessage::from_mouse(&release) {
            widget.update(message);
        }
        assert!(!widget.drag_session().is_dragging());
    }

    #[test]
    fn given_modifier_change_when_translated_then_no_message_results() {
        let event = iced::keyboard::Event::ModifiersChanged(
            iced::keyboard::Modifiers::SHIFT,
        );
        assert_eq!(TreeMessage::from_keyboard(&event), None);
    }

    #[test]
    fn given_arrow_messages_when_updating_then_selection_follows_rows() {
        let mut widget = TreeWidget::new(TreeOptions {
            data: tree(),
            ..Default::default()
        });
        widget.update(TreeMessage::Key(NavKey::Down));
        assert_eq!(widget.selected_id(), Some("docs"));
        widget.update(TreeMessage::Key(NavKey::Right));
        widget.update(TreeMessage::Key(NavKey::Down));
        assert_eq!(widget.selected_id(), Some("cv"));
        assert_eq!(
            NavKey::from_key(&Key::Named(Named::ArrowUp)),
            Some(NavKey::Up)
        );
    }
}
