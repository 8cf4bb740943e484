use std::collections::HashMap;
use std::sync::Arc;

use arbor_tree::Node;
use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

pub const DEFAULT_ROW_HEIGHT: f32 = 24.0;
pub const DEFAULT_INDENT_WIDTH: f32 = 14.0;
const DEFAULT_SEARCH_PLACEHOLDER: &str = "Search...";
const DEFAULT_EMPTY_TEXT: &str = "No items to display";
const MIN_ROW_HEIGHT: f32 = 8.0;
const MAX_ROW_HEIGHT: f32 = 256.0;
const MAX_INDENT_WIDTH: f32 = 128.0;

/// Feature toggles, glyphs and geometry for a tree widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    drag_enabled: bool,
    search_enabled: bool,
    keyboard_navigation: bool,
    icons: HashMap<String, String>,
    row_height: f32,
    indent_width: f32,
    search_placeholder: String,
    empty_text: String,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            drag_enabled: true,
            search_enabled: true,
            keyboard_navigation: true,
            icons: HashMap::new(),
            row_height: DEFAULT_ROW_HEIGHT,
            indent_width: DEFAULT_INDENT_WIDTH,
            search_placeholder: String::from(DEFAULT_SEARCH_PLACEHOLDER),
            empty_text: String::from(DEFAULT_EMPTY_TEXT),
        }
    }
}

impl TreeSettings {
    /// Read settings from JSON; missing keys take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text)?;
        Ok(settings.normalized())
    }

    /// Replace out-of-range geometry and blank texts with defaults.
    pub fn normalized(&self) -> Self {
        let defaults = Self::default();
        let mut settings = self.clone();

        if !(MIN_ROW_HEIGHT..=MAX_ROW_HEIGHT).contains(&settings.row_height) {
            log::warn!(
                "row height {} out of range, using {}",
                settings.row_height,
                defaults.row_height
            );
            settings.row_height = defaults.row_height;
        }
        if !(0.0..=MAX_INDENT_WIDTH).contains(&settings.indent_width) {
            log::warn!(
                "indent width {} out of range, using {}",
                settings.indent_width,
                defaults.indent_width
            );
            settings.indent_width = defaults.indent_width;
        }
        if settings.search_placeholder.trim().is_empty() {
            settings.search_placeholder = defaults.search_placeholder;
        }
        if settings.empty_text.trim().is_empty() {
            settings.empty_text = defaults.empty_text;
        }
        settings
    }

    pub fn with_drag_enabled(mut self, enabled: bool) -> Self {
        self.drag_enabled = enabled;
        self
    }

    pub fn with_search_enabled(mut self, enabled: bool) -> Self {
        self.search_enabled = enabled;
        self
    }

    pub fn with_keyboard_navigation(mut self, enabled: bool) -> Self {
        self.keyboard_navigation = enabled;
        self
    }

    /// Use `glyph` for nodes of type `kind`.
    pub fn with_icon(
        mut self,
        kind: impl Into<String>,
        glyph: impl Into<String>,
    ) -> Self {
        self.icons.insert(kind.into(), glyph.into());
        self
    }

    pub fn with_row_height(mut self, height: f32) -> Self {
        self.row_height = height;
        self.normalized()
    }

    pub fn with_indent_width(mut self, width: f32) -> Self {
        self.indent_width = width;
        self.normalized()
    }

    pub fn with_search_placeholder(mut self, text: impl Into<String>) -> Self {
        self.search_placeholder = text.into();
        self
    }

    pub fn with_empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }

    pub fn drag_enabled(&self) -> bool {
        self.drag_enabled
    }

    pub fn search_enabled(&self) -> bool {
        self.search_enabled
    }

    pub fn keyboard_navigation(&self) -> bool {
        self.keyboard_navigation
    }

    /// Custom glyph registered for a node type.
    pub fn icon(&self, kind: &str) -> Option<&str> {
        self.icons.get(kind).map(String::as_str)
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn indent_width(&self) -> f32 {
        self.indent_width
    }

    pub fn search_placeholder(&self) -> &str {
        &self.search_placeholder
    }

    pub fn empty_text(&self) -> &str {
        &self.empty_text
    }
}

type ActionCondition = dyn Fn(&Node) -> bool;

/// Per-row button shown on nodes accepted by its condition.
#[derive(Clone)]
pub struct NodeAction {
    id: String,
    icon: String,
    title: String,
    class: Option<String>,
    condition: Option<Arc<ActionCondition>>,
}

impl NodeAction {
    pub fn new(
        id: impl Into<String>,
        icon: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            icon: icon.into(),
            title: title.into(),
            class: None,
            condition: None,
        }
    }

    /// Style hint forwarded to the host's renderer.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Show the action only on nodes accepted by `condition`.
    pub fn with_condition(
        mut self,
        condition: impl Fn(&Node) -> bool + 'static,
    ) -> Self {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Whether the action is offered for `node`. Unconditional actions
    /// apply everywhere.
    pub fn applies_to(&self, node: &Node) -> bool {
        self.condition
            .as_ref()
            .is_none_or(|condition| condition(node))
    }
}

impl std::fmt::Debug for NodeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeAction")
            .field("id", &self.id)
            .field("icon", &self.icon)
            .field("title", &self.title)
            .field("class", &self.class)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_partial_json_when_parsed_then_missing_fields_use_defaults() {
        let settings =
            TreeSettings::from_json_str(r#"{"drag_enabled": false}"#)
                .expect("settings should parse");
        assert!(!settings.drag_enabled());
        assert!(settings.search_enabled());
        assert!(settings.keyboard_navigation());
        assert_eq!(settings.row_height(), DEFAULT_ROW_HEIGHT);
        assert_eq!(settings.empty_text(), DEFAULT_EMPTY_TEXT);
    }

    #[test]
    fn given_out_of_range_geometry_when_parsed_then_defaults_are_used() {
        let settings = TreeSettings::from_json_str(
            r#"{"row_height": 0.5, "indent_width": -3.0, "empty_text": " "}"#,
        )
        .expect("settings should parse");
        assert_eq!(settings.row_height(), DEFAULT_ROW_HEIGHT);
        assert_eq!(settings.indent_width(), DEFAULT_INDENT_WIDTH);
        assert_eq!(settings.empty_text(), DEFAULT_EMPTY_TEXT);
    }

    #[test]
    fn given_malformed_json_when_parsed_then_error_is_returned() {
        let err = TreeSettings::from_json_str("{").expect_err("should fail");
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn given_icons_when_configured_then_lookup_returns_glyph() {
        let settings = TreeSettings::default().with_icon("note", "📝");
        assert_eq!(settings.icon("note"), Some("📝"));
        assert_eq!(settings.icon("file"), None);
    }

    #[test]
    fn given_conditional_action_when_checked_then_condition_is_applied() {
        let action = NodeAction::new("delete", "🗑", "Delete")
            .with_condition(|node| !node.is_folder());
        assert!(action.applies_to(&Node::file("f", "F")));
        assert!(!action.applies_to(&Node::folder("d", "D")));
        assert!(NodeAction::new("x", "x", "X").applies_to(&Node::folder("d", "D")));
    }
}
