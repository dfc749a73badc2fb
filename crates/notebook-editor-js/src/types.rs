//! Types exposed to JavaScript via wasm-bindgen.

use std::collections::BTreeMap;
use std::time::Duration;

use notebook_editor_browser::{
    ConfigError, EditorMode, HotKeys, NotebookOptions, SmolStr, TimingPolicy,
};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Editor options as passed from JavaScript.
///
/// Every field is optional; anything left out keeps its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsNotebookOptions {
    /// Key code (as a string) to command, e.g. `{ "66": "bold" }`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hot_keys: Option<BTreeMap<String, String>>,
    /// Entries merged over the default button-to-command map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_map: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbar_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_focus: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// `"multiline"` or `"inline"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<JsEditorMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<JsTiming>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "lowercase")]
pub enum JsEditorMode {
    Multiline,
    Inline,
}

impl From<JsEditorMode> for EditorMode {
    fn from(mode: JsEditorMode) -> Self {
        match mode {
            JsEditorMode::Multiline => EditorMode::Multiline,
            JsEditorMode::Inline => EditorMode::Inline,
        }
    }
}

/// Delay overrides in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct JsTiming {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_debounce: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_settle: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_all_settle: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouse_settle: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paste_capture: Option<u32>,
}

impl JsTiming {
    fn apply(self, timing: &mut TimingPolicy) {
        let slots = [
            (self.hide_debounce, &mut timing.hide_debounce),
            (self.selection_settle, &mut timing.selection_settle),
            (self.select_all_settle, &mut timing.select_all_settle),
            (self.mouse_settle, &mut timing.mouse_settle),
            (self.paste_capture, &mut timing.paste_capture),
        ];
        for (ms, slot) in slots {
            if let Some(ms) = ms {
                *slot = Duration::from_millis(u64::from(ms));
            }
        }
    }
}

impl JsNotebookOptions {
    /// Merge over the defaults and validate.
    pub fn into_options(self) -> Result<NotebookOptions, ConfigError> {
        let mut options = NotebookOptions::default();

        if let Some(hot_keys) = self.hot_keys {
            let raw: BTreeMap<String, SmolStr> = hot_keys
                .into_iter()
                .map(|(code, command)| (code, command.into()))
                .collect();
            options.hot_keys = HotKeys::try_from(raw)?;
        }
        if let Some(command_map) = self.command_map {
            options.command_map.extend(
                command_map
                    .into_iter()
                    .map(|(class, command)| (class.into(), command.into())),
            );
        }
        if let Some(selector) = self.toolbar_selector {
            options.toolbar_selector = selector.into();
        }
        if let Some(auto_focus) = self.auto_focus {
            options.auto_focus = auto_focus;
        }
        if let Some(placeholder) = self.placeholder {
            options.placeholder = placeholder;
        }
        if let Some(mode) = self.mode {
            options.mode = mode.into();
        }
        if let Some(modifiers) = self.modifiers {
            options.modifiers = modifiers.into_iter().map(SmolStr::from).collect();
        }
        if let Some(timing) = self.timing {
            timing.apply(&mut options.timing);
        }

        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_are_defaults() {
        let options = JsNotebookOptions::default().into_options().unwrap();
        assert_eq!(options, NotebookOptions::default());
    }

    #[test]
    fn test_overrides_merge_over_defaults() {
        let js = JsNotebookOptions {
            command_map: Some(BTreeMap::from([("strike".into(), "strikeThrough".into())])),
            modifiers: Some(vec!["bold".into(), "strike".into(), "anchor".into()]),
            mode: Some(JsEditorMode::Inline),
            timing: Some(JsTiming {
                hide_debounce: Some(200),
                ..JsTiming::default()
            }),
            ..JsNotebookOptions::default()
        };
        let options = js.into_options().unwrap();

        assert_eq!(options.mode, EditorMode::Inline);
        assert_eq!(options.modifiers.len(), 3);
        assert_eq!(options.command_map.get("bold").map(SmolStr::as_str), Some("bold"));
        assert_eq!(options.timing.hide_debounce, Duration::from_millis(200));
        assert_eq!(options.timing.paste_capture, Duration::from_millis(500));
    }

    #[test]
    fn test_bad_hot_key_rejected() {
        let js = JsNotebookOptions {
            hot_keys: Some(BTreeMap::from([("b".into(), "bold".into())])),
            ..JsNotebookOptions::default()
        };
        assert!(matches!(
            js.into_options(),
            Err(ConfigError::InvalidHotKey(_))
        ));
    }

    #[test]
    fn test_unmapped_modifier_rejected() {
        let js = JsNotebookOptions {
            modifiers: Some(vec!["sparkle".into()]),
            ..JsNotebookOptions::default()
        };
        assert!(matches!(
            js.into_options(),
            Err(ConfigError::UnmappedModifier(_))
        ));
    }
}
