use thiserror::Error;

/// Errors emitted while reading widget settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
