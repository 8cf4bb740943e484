use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque node identifier, unique across a whole tree.
pub type NodeId = String;

/// Ordered forest of root nodes.
pub type Tree = Vec<Node>;

const KIND_FOLDER: &str = "folder";
const KIND_FILE: &str = "file";

/// Node type. Only folders may own children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Folder,
    #[default]
    File,
    Other(String),
}

impl NodeKind {
    /// Return the textual type name used in the interchange format.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Folder => KIND_FOLDER,
            Self::File => KIND_FILE,
            Self::Other(name) => name,
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            KIND_FOLDER => Self::Folder,
            KIND_FILE => Self::File,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for NodeKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        match value {
            NodeKind::Other(name) => name,
            other => other.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement of a moved node relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
    Inside,
}

impl std::fmt::Display for DropPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Inside => "inside",
        };
        f.write_str(label)
    }
}

/// One entry of the hierarchy.
///
/// `children` is never serialized when empty, so a folder without children
/// carries no children attribute at all. Unknown keys are kept in
/// `attributes` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    /// Presentational hint only; widgets keep their own expansion state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Node {
    /// Create a node of the given kind without children.
    pub fn new(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            children: Vec::new(),
            expanded: None,
            attributes: Map::new(),
        }
    }

    /// Create an empty folder.
    pub fn folder(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Folder)
    }

    /// Create a file.
    pub fn file(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::File)
    }

    /// Replace the children of this node.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Set an extra attribute.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Read a named attribute, covering the typed fields as well as the
    /// extra attributes.
    pub fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "id" => Some(Value::String(self.id.clone())),
            "name" => Some(Value::String(self.name.clone())),
            "type" => Some(Value::String(self.kind.as_str().to_owned())),
            "expanded" => self.expanded.map(Value::Bool),
            _ => self.attributes.get(key).cloned(),
        }
    }
}
