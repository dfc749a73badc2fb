//! Toolbar menu model: buttons, submenus and their contents.

use smol_str::SmolStr;

use crate::color::{ColorRole, Rgba};
use crate::config::NotebookOptions;

/// Dropdowns a toolbar button can open instead of running a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Submenu {
    Font,
    Size,
    Color,
    BackgroundColor,
    Link,
}

impl Submenu {
    /// Submenu opened by a modifier pseudo-entry, if any.
    pub fn from_modifier(modifier: &str) -> Option<Self> {
        match modifier {
            "font" => Some(Submenu::Font),
            "size" => Some(Submenu::Size),
            "color" => Some(Submenu::Color),
            "bgcolor" => Some(Submenu::BackgroundColor),
            "anchor" => Some(Submenu::Link),
            _ => None,
        }
    }

    /// Class of the panel element holding this submenu.
    ///
    /// Both color submenus share one panel.
    pub fn panel_class(self) -> &'static str {
        match self {
            Submenu::Font => "family-panel",
            Submenu::Size => "size-panel",
            Submenu::Color | Submenu::BackgroundColor => "color-panel",
            Submenu::Link => "link-area",
        }
    }

    /// Color role for the color submenus.
    pub fn color_role(self) -> Option<ColorRole> {
        match self {
            Submenu::Color => Some(ColorRole::Foreground),
            Submenu::BackgroundColor => Some(ColorRole::Background),
            _ => None,
        }
    }
}

/// What pressing a toolbar button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Run a document command (possibly with arguments, `"fontName Arial"`).
    Command(SmolStr),
    /// Open a submenu.
    Submenu(Submenu),
}

/// One rendered toolbar button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    /// Button class, same as the modifier name.
    pub class: SmolStr,
    pub action: ButtonAction,
}

/// Resolve the configured modifiers into buttons, in order.
///
/// Modifiers with neither a submenu nor a command mapping are skipped.
pub fn build_buttons(options: &NotebookOptions) -> Vec<ToolbarButton> {
    options
        .modifiers
        .iter()
        .filter_map(|modifier| {
            let action = match Submenu::from_modifier(modifier) {
                Some(submenu) => ButtonAction::Submenu(submenu),
                None => match options.command_map.get(modifier) {
                    Some(command) => ButtonAction::Command(command.clone()),
                    None => {
                        tracing::warn!(
                            target: "notebook::toolbar",
                            %modifier,
                            "modifier has no command mapping, skipping"
                        );
                        return None;
                    }
                },
            };
            Some(ToolbarButton {
                class: modifier.clone(),
                action,
            })
        })
        .collect()
}

/// Font families offered by the font submenu.
pub const FONT_FAMILIES: [&str; 16] = [
    "微软雅黑",
    "Serif",
    "Sans",
    "Arial",
    "Arial Black",
    "Courier",
    "Courier New",
    "Comic Sans MS",
    "Helvetica",
    "Impact",
    "Lucida Grande",
    "Lucida Sans",
    "Tahoma",
    "Times",
    "Times New Roman",
    "Verdana",
];

/// Pixel sizes offered by the size submenu.
pub const FONT_SIZES_PX: [u32; 12] = [12, 14, 16, 18, 20, 21, 22, 24, 26, 28, 32, 36];

/// Swatches offered by the color submenus, packed as 0xRRGGBBAA.
pub const SWATCHES: [u32; 18] = [
    0x00000000, // transparent
    0xF96E57FF, 0x5F9CEFFF, 0x8EC965FF, 0x47C1A8FF, 0xFFFFFFFF, 0xA0A0A0FF, 0xFF8124FF,
    0xA65BCBFF, 0xFFCA00FF, 0xD3AD1CFF, 0x9C8428FF, 0x0E174AFF, 0x1630C1FF, 0xD80303FF,
    0x9A0B35FF, 0x000000FF, 0x6228A5FF,
];

/// Initial color of the custom color preview.
pub const DEFAULT_CUSTOM_COLOR: u32 = 0x0E174AFF;

/// Swatch colors as CSS values, the way a rendered swatch reports them.
pub fn swatch_css() -> Vec<String> {
    SWATCHES
        .iter()
        .map(|&c| {
            let color = Rgba::from_u32(c);
            if color.a == 0.0 {
                "transparent".to_string()
            } else {
                color.to_css_rgb()
            }
        })
        .collect()
}

/// Command string for choosing a font family.
pub fn font_command(family: &str) -> String {
    format!("fontName {family}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_buttons() {
        let options = NotebookOptions::default();
        let buttons = build_buttons(&options);
        assert_eq!(buttons.len(), options.modifiers.len());
        assert_eq!(buttons[0].action, ButtonAction::Submenu(Submenu::Font));
        let bold = buttons.iter().find(|b| b.class == "bold").unwrap();
        assert_eq!(bold.action, ButtonAction::Command("bold".into()));
        let clear = buttons.iter().find(|b| b.class == "clear").unwrap();
        assert_eq!(clear.action, ButtonAction::Command("RemoveFormat".into()));
    }

    #[test]
    fn test_unmapped_modifier_skipped() {
        let mut options = NotebookOptions::default();
        options.modifiers = vec!["bold".into(), "sparkle".into(), "anchor".into()];
        let classes: Vec<_> = build_buttons(&options)
            .into_iter()
            .map(|b| b.class)
            .collect();
        assert_eq!(classes, vec!["bold", "anchor"]);
    }

    #[test]
    fn test_color_submenus_share_panel() {
        assert_eq!(
            Submenu::Color.panel_class(),
            Submenu::BackgroundColor.panel_class()
        );
        assert_eq!(
            Submenu::BackgroundColor.color_role(),
            Some(ColorRole::Background)
        );
        assert_eq!(Submenu::Link.color_role(), None);
    }

    #[test]
    fn test_swatch_css() {
        let swatches = swatch_css();
        assert_eq!(swatches[0], "transparent");
        assert_eq!(swatches[1], "rgb(249, 110, 87)");
        assert_eq!(swatches.len(), SWATCHES.len());
    }
}
