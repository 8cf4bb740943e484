use std::collections::{HashMap, HashSet};

use arbor_tree::{Node, NodeId, NodeKind};

use crate::settings::{NodeAction, TreeSettings};

const FILE_GLYPH: &str = "📄";
const FOLDER_OPEN_GLYPH: &str = "📂";
const FOLDER_CLOSED_GLYPH: &str = "📁";

/// Part of a row label, highlighted when it matches the filter text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSegment {
    pub text: String,
    pub highlighted: bool,
}

/// Glyph shown before a row label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIcon {
    Fixed(String),
    Folder { open: String, closed: String },
}

impl RowIcon {
    pub fn glyph(&self, expanded: bool) -> &str {
        match self {
            Self::Fixed(glyph) => glyph,
            Self::Folder { open, .. } if expanded => open,
            Self::Folder { closed, .. } => closed,
        }
    }
}

/// Render-ready data for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPresentation {
    pub id: NodeId,
    pub depth: usize,
    pub kind: NodeKind,
    pub has_children: bool,
    pub label: Vec<LabelSegment>,
    pub icon: RowIcon,
    /// Identifiers of the actions whose condition accepts the node.
    pub actions: Vec<String>,
}

impl RowPresentation {
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

/// Owner of a block of sibling rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum BlockKey {
    Roots,
    Children(NodeId),
}

/// Position of a rendered row inside the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowSlot {
    block: BlockKey,
    index: usize,
}

/// Inputs needed to present rows.
pub(crate) struct PresentationContext<'a> {
    pub(crate) settings: &'a TreeSettings,
    pub(crate) actions: &'a [NodeAction],
    pub(crate) filter: &'a str,
}

/// Memoized sibling blocks.
///
/// A folder's child block is built the first time the folder is shown
/// expanded and reused until the cache is cleared.
#[derive(Debug, Default)]
pub(crate) struct RowCache {
    blocks: HashMap<BlockKey, Vec<RowPresentation>>,
    builds: usize,
}

impl RowCache {
    pub(crate) fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Number of blocks built since creation.
    pub(crate) fn builds(&self) -> usize {
        self.builds
    }

    pub(crate) fn get(&self, slot: &RowSlot) -> Option<&RowPresentation> {
        self.blocks.get(&slot.block)?.get(slot.index)
    }

    fn ensure(
        &mut self,
        key: &BlockKey,
        nodes: &[Node],
        depth: usize,
        context: &PresentationContext<'_>,
    ) {
        if self.blocks.contains_key(key) {
            return;
        }
        let block = nodes
            .iter()
            .map(|node| present(node, depth, context))
            .collect();
        self.blocks.insert(key.clone(), block);
        self.builds += 1;
    }
}

/// Compute the rendered row order, building missing blocks on the way.
pub(crate) fn layout(
    tree: &[Node],
    expanded: &HashSet<NodeId>,
    cache: &mut RowCache,
    context: &PresentationContext<'_>,
) -> Vec<RowSlot> {
    let mut rows = Vec::new();
    push_block(
        BlockKey::Roots,
        tree,
        0,
        expanded,
        cache,
        context,
        &mut rows,
    );
    rows
}

fn push_block(
    key: BlockKey,
    nodes: &[Node],
    depth: usize,
    expanded: &HashSet<NodeId>,
    cache: &mut RowCache,
    context: &PresentationContext<'_>,
    rows: &mut Vec<RowSlot>,
) {
    cache.ensure(&key, nodes, depth, context);
    for (index, node) in nodes.iter().enumerate() {
        rows.push(RowSlot {
            block: key.clone(),
            index,
        });
        if node.has_children() && expanded.contains(&node.id) {
            push_block(
                BlockKey::Children(node.id.clone()),
                &node.children,
                depth + 1,
                expanded,
                cache,
                context,
                rows,
            );
        }
    }
}

fn present(
    node: &Node,
    depth: usize,
    context: &PresentationContext<'_>,
) -> RowPresentation {
    RowPresentation {
        id: node.id.clone(),
        depth,
        kind: node.kind.clone(),
        has_children: node.has_children(),
        label: highlight(&node.name, context.filter),
        icon: icon_for(node, context.settings),
        actions: context
            .actions
            .iter()
            .filter(|action| action.applies_to(node))
            .map(|action| action.id().to_owned())
            .collect(),
    }
}

fn icon_for(node: &Node, settings: &TreeSettings) -> RowIcon {
    if let Some(glyph) = settings.icon(node.kind.as_str()) {
        return RowIcon::Fixed(glyph.to_owned());
    }
    if node.is_folder() {
        return RowIcon::Folder {
            open: String::from(FOLDER_OPEN_GLYPH),
            closed: String::from(FOLDER_CLOSED_GLYPH),
        };
    }
    RowIcon::Fixed(String::from(FILE_GLYPH))
}

/// Split `text` around the first case-insensitive occurrence of `needle`.
pub fn highlight(text: &str, needle: &str) -> Vec<LabelSegment> {
    let plain = |text: &str| LabelSegment {
        text: text.to_owned(),
        highlighted: false,
    };
    if needle.is_empty() {
        return vec![plain(text)];
    }
    let Some((start, end)) = find_case_insensitive(text, needle) else {
        return vec![plain(text)];
    };

    let mut segments = Vec::with_capacity(3);
    if start > 0 {
        segments.push(plain(&text[..start]));
    }
    segments.push(LabelSegment {
        text: text[start..end].to_owned(),
        highlighted: true,
    });
    if end < text.len() {
        segments.push(plain(&text[end..]));
    }
    segments
}

/// Byte range of the first case-insensitive match.
fn find_case_insensitive(text: &str, needle: &str) -> Option<(usize, usize)> {
    let wanted: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();

    text.char_indices().find_map(|(start, _)| {
        let mut seen = Vec::with_capacity(wanted.len());
        for (offset, ch) in text[start..].char_indices() {
            seen.extend(ch.to_lowercase());
            if seen.len() >= wanted.len() {
                return (seen == wanted)
                    .then_some((start, start + offset + ch.len_utf8()));
            }
        }
        None
    })
}
