//! Editor configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::ConfigError;
use crate::menu::Submenu;
use crate::scheduler::TimingPolicy;

/// Class marking an editable container.
pub const EDITOR_CLASS: &str = "notebook-editor";
/// Class marking the shared toolbar element.
pub const TOOLBAR_CLASS: &str = "notebook-toolbar";
/// Class of the paragraph shown while the editor is empty.
pub const PLACEHOLDER_CLASS: &str = "placeholder";
/// Attribute carrying the editor mode on the container.
pub const MODE_ATTRIBUTE: &str = "data-editor-mode";
/// Attribute carrying the placeholder text on the container.
pub const PLACEHOLDER_ATTRIBUTE: &str = "data-editor-placeholder";

/// How the Enter key behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Enter opens a new paragraph at the end of the document.
    #[default]
    Multiline,
    /// Enter is suppressed.
    Inline,
}

impl EditorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EditorMode::Multiline => "multiline",
            EditorMode::Inline => "inline",
        }
    }
}

/// Key code to command table for modifier chords.
///
/// Serialized as an object with numeric string keys, the shape JS and JSON
/// callers use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, SmolStr>",
    into = "BTreeMap<String, SmolStr>"
)]
pub struct HotKeys(BTreeMap<u32, SmolStr>);

impl HotKeys {
    pub fn get(&self, key_code: u32) -> Option<&SmolStr> {
        self.0.get(&key_code)
    }

    pub fn insert(&mut self, key_code: u32, command: impl Into<SmolStr>) {
        self.0.insert(key_code, command.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for HotKeys {
    fn default() -> Self {
        Self(
            [
                (66, "bold"),
                (73, "italic"),
                (85, "underline"),
                (90, "undo"),
                (89, "redo"),
                (76, "justifyleft"),
                (82, "justifyright"),
                (69, "justifycenter"),
                (74, "justifyfull"),
            ]
            .into_iter()
            .map(|(code, command)| (code, SmolStr::new_static(command)))
            .collect(),
        )
    }
}

impl TryFrom<BTreeMap<String, SmolStr>> for HotKeys {
    type Error = ConfigError;

    fn try_from(raw: BTreeMap<String, SmolStr>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(key, command)| {
                key.trim()
                    .parse::<u32>()
                    .map(|code| (code, command))
                    .map_err(|_| ConfigError::InvalidHotKey(key))
            })
            .collect::<Result<_, _>>()
            .map(HotKeys)
    }
}

impl From<HotKeys> for BTreeMap<String, SmolStr> {
    fn from(keys: HotKeys) -> Self {
        keys.0
            .into_iter()
            .map(|(code, command)| (code.to_string(), command))
            .collect()
    }
}

fn default_command_map() -> BTreeMap<SmolStr, SmolStr> {
    [
        ("font", "FontName"),
        ("size", "fontSize"),
        ("bold", "bold"),
        ("italic", "italic"),
        ("underline", "underline"),
        ("color", "ForeColor"),
        ("bgcolor", "BackColor"),
        ("indent", "Indent"),
        ("outdent", "Outdent"),
        ("left", "JustifyLeft"),
        ("center", "JustifyCenter"),
        ("right", "JustifyRight"),
        ("justify", "JustifyFull"),
        ("ol", "insertOrderedList"),
        ("ul", "insertUnorderedList"),
        ("anchor", "createLink"),
        ("clear", "RemoveFormat"),
    ]
    .into_iter()
    .map(|(class, command)| (SmolStr::new_static(class), SmolStr::new_static(command)))
    .collect()
}

fn default_modifiers() -> Vec<SmolStr> {
    [
        "font",
        "size",
        "bold",
        "italic",
        "underline",
        "color",
        "bgcolor",
        "indent",
        "outdent",
        "left",
        "center",
        "right",
        "justify",
        "ol",
        "ul",
        "anchor",
        "clear",
    ]
    .into_iter()
    .map(SmolStr::new_static)
    .collect()
}

/// Options for one editor instance.
///
/// Any field left out when deserializing keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotebookOptions {
    /// Key code to command, applied while the primary modifier is held.
    pub hot_keys: HotKeys,
    /// Toolbar button class to document command.
    pub command_map: BTreeMap<SmolStr, SmolStr>,
    /// Extra class identifying the shared toolbar.
    pub toolbar_selector: SmolStr,
    /// Put the cursor in the first paragraph on init.
    pub auto_focus: bool,
    /// Text shown while the editor is empty.
    pub placeholder: String,
    pub mode: EditorMode,
    /// Toolbar buttons to render, in order.
    pub modifiers: Vec<SmolStr>,
    pub timing: TimingPolicy,
}

impl Default for NotebookOptions {
    fn default() -> Self {
        Self {
            hot_keys: HotKeys::default(),
            command_map: default_command_map(),
            toolbar_selector: SmolStr::new_static("bubble"),
            auto_focus: false,
            placeholder: "请在此输入文字".to_string(),
            mode: EditorMode::Multiline,
            modifiers: default_modifiers(),
            timing: TimingPolicy::default(),
        }
    }
}

impl NotebookOptions {
    /// Parse options from JSON, filling absent fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toolbar_selector.trim().is_empty() {
            return Err(ConfigError::EmptyToolbarSelector);
        }
        if let Some(unmapped) = self.modifiers.iter().find(|m| {
            Submenu::from_modifier(m).is_none() && !self.command_map.contains_key(*m)
        }) {
            return Err(ConfigError::UnmappedModifier(unmapped.to_string()));
        }
        Ok(())
    }

    /// Command bound to a key code, if any.
    pub fn hot_key(&self, key_code: u32) -> Option<&str> {
        self.hot_keys.get(key_code).map(SmolStr::as_str)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_default_options_snapshot() {
        insta::assert_yaml_snapshot!(NotebookOptions::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options =
            NotebookOptions::from_json(r#"{"mode": "inline", "autoFocus": true}"#).unwrap();
        assert_eq!(options.mode, EditorMode::Inline);
        assert!(options.auto_focus);
        assert_eq!(options.toolbar_selector, "bubble");
        assert_eq!(options.hot_key(66), Some("bold"));
        assert_eq!(options.timing.hide_debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_hot_keys_from_string_keys() {
        let options =
            NotebookOptions::from_json(r#"{"hotKeys": {"83": "strikeThrough"}}"#).unwrap();
        assert_eq!(options.hot_key(83), Some("strikeThrough"));
        // A provided table replaces the default one.
        assert_eq!(options.hot_key(66), None);
    }

    #[test]
    fn test_non_numeric_hot_key_rejected() {
        let err = NotebookOptions::from_json(r#"{"hotKeys": {"b": "bold"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_rejects_unmapped_modifier() {
        let mut options = NotebookOptions::default();
        options.modifiers.push("sparkle".into());
        assert!(matches!(
            options.validate(),
            Err(ConfigError::UnmappedModifier(m)) if m == "sparkle"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_selector() {
        let options = NotebookOptions {
            toolbar_selector: " ".into(),
            ..NotebookOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::EmptyToolbarSelector)
        ));
    }

    #[test]
    fn test_submenu_modifiers_need_no_mapping() {
        let mut options = NotebookOptions::default();
        options.command_map.remove("anchor");
        assert!(options.validate().is_ok());
    }
}
