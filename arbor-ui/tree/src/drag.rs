use arbor_tree::{DropPosition, Node, NodeId, find_node_by_id, is_descendant};
use iced::{Point, Rectangle};

const INDICATOR_THICKNESS: f32 = 2.0;

/// Candidate drop recorded while dragging.
#[derive(Debug, Clone, PartialEq)]
pub struct DropCandidate {
    pub target: NodeId,
    pub position: DropPosition,
    /// Index of the hovered row among rendered rows.
    pub row: usize,
}

/// Pointer-driven drag state machine.
///
/// `Dropped` and `Cancelled` are terminal until the next press.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging {
        source: NodeId,
        candidate: Option<DropCandidate>,
    },
    Dropped {
        source: NodeId,
        target: NodeId,
        position: DropPosition,
    },
    Cancelled,
}

impl DragSession {
    /// Start dragging `source`.
    pub(crate) fn begin(&mut self, source: NodeId) {
        *self = Self::Dragging {
            source,
            candidate: None,
        };
    }

    /// Record the hovered candidate, or clear it when `None`.
    pub(crate) fn hover(&mut self, next: Option<DropCandidate>) {
        if let Self::Dragging { candidate, .. } = self {
            *candidate = next;
        }
    }

    /// Finish a drag. Returns the source and the recorded drop, if any.
    pub(crate) fn release(&mut self) -> Option<(NodeId, DropCandidate)> {
        if !self.is_dragging() {
            return None;
        }
        let Self::Dragging { source, candidate } = std::mem::take(self) else {
            return None;
        };
        match candidate {
            Some(candidate) => {
                *self = Self::Dropped {
                    source: source.clone(),
                    target: candidate.target.clone(),
                    position: candidate.position,
                };
                Some((source, candidate))
            },
            None => {
                *self = Self::Cancelled;
                None
            },
        }
    }

    pub(crate) fn cancel(&mut self) {
        *self = Self::Cancelled;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Identifier of the dragged node while a drag is in progress.
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Dragging { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn candidate(&self) -> Option<&DropCandidate> {
        match self {
            Self::Dragging { candidate, .. } => candidate.as_ref(),
            _ => None,
        }
    }
}

/// Overlay geometry for the recorded drop candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropIndicator {
    pub row: usize,
    pub position: DropPosition,
    pub row_height: f32,
}

impl DropIndicator {
    /// Bounds relative to the row list: the whole row for `Inside`, a thin
    /// line on the top or bottom edge otherwise.
    pub fn bounds(&self, width: f32) -> Rectangle {
        let top = self.row as f32 * self.row_height;
        let half = INDICATOR_THICKNESS / 2.0;
        let (y, height) = match self.position {
            DropPosition::Inside => (top, self.row_height),
            DropPosition::Before => (top - half, INDICATOR_THICKNESS),
            DropPosition::After => {
                (top + self.row_height - half, INDICATOR_THICKNESS)
            },
        };
        Rectangle {
            x: 0.0,
            y,
            width,
            height,
        }
    }
}

/// Resolve a list-relative pointer position into `(row, position)`.
///
/// Each row is split into three equal bands. The middle band means
/// `Inside` for folders and `After` for anything else.
pub fn hit_test(
    point: Point,
    row_height: f32,
    row_is_folder: &[bool],
) -> Option<(usize, DropPosition)> {
    if point.y < 0.0 || row_height <= 0.0 {
        return None;
    }
    let row = (point.y / row_height).floor() as usize;
    let is_folder = *row_is_folder.get(row)?;
    let offset = point.y - row as f32 * row_height;
    let band = row_height / 3.0;

    let position = if offset < band {
        DropPosition::Before
    } else if offset >= band * 2.0 {
        DropPosition::After
    } else if is_folder {
        DropPosition::Inside
    } else {
        DropPosition::After
    };
    Some((row, position))
}

/// Whether dropping `source_id` at `position` relative to `target_id` is
/// allowed.
pub fn can_drop(
    tree: &[Node],
    source_id: &str,
    target_id: &str,
    position: DropPosition,
) -> bool {
    if source_id == target_id {
        return false;
    }
    let (Some(source), Some(target)) = (
        find_node_by_id(tree, source_id),
        find_node_by_id(tree, target_id),
    ) else {
        return false;
    };
    if is_descendant(source, target_id) {
        return false;
    }
    position != DropPosition::Inside || target.is_folder()
}
