use thiserror::Error;

/// Errors emitted at the interchange boundary.
///
/// Structural lookups never fail: a missing identifier is a no-op or a
/// sentinel result, not an error.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Node identifier must not be empty.")]
    MissingId,
    #[error("Duplicate node identifier: {0}")]
    DuplicateId(String),
    #[error("Node {0} owns children but is not a folder.")]
    ChildrenOnNonFolder(String),
}
