use iced::Point;
use iced::{keyboard, mouse};

use crate::navigation::NavKey;

/// Messages produced by the tree view and consumed by
/// [`TreeWidget::update`](crate::TreeWidget::update).
#[derive(Debug, Clone, PartialEq)]
pub enum TreeMessage {
    FilterChanged(String),
    FilterCleared,
    RowPressed(usize),
    ToggleClicked(usize),
    ActionClicked { row: usize, action_id: String },
    RowRightClicked(usize),
    /// Pointer position relative to the row list.
    CursorMoved(Point),
    CursorLeft,
    PointerReleased,
    Key(NavKey),
    ExpandAll,
    CollapseAll,
}

impl TreeMessage {
    /// Translate a key press into a navigation message.
    pub fn from_keyboard(event: &keyboard::Event) -> Option<Self> {
        match event {
            keyboard::Event::KeyPressed { key, .. } => {
                NavKey::from_key(key).map(Self::Key)
            },
            _ => None,
        }
    }

    /// Translate a window-level mouse event. A left release ends any drag,
    /// even when it happens outside the tree.
    pub fn from_mouse(event: &mouse::Event) -> Option<Self> {
        match event {
            mouse::Event::ButtonReleased(mouse::Button::Left) => {
                Some(Self::PointerReleased)
            },
            _ => None,
        }
    }
}
