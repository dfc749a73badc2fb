//! Browser event extraction.
//!
//! Converts DOM events into the core's platform-neutral inputs: key events,
//! page mouse-up targets and toolbar clicks.

use notebook_editor_core::command::PanelChoice;
use notebook_editor_core::config::{EDITOR_CLASS, TOOLBAR_CLASS};
use notebook_editor_core::menu::Submenu;
use notebook_editor_core::{Key, KeyEvent, Modifiers, PointerTarget, SmolStr};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, KeyboardEvent, Node};

use crate::toolbar::{
    ACTION_ATTRIBUTE, COLOR_ATTRIBUTE, CUSTOM_PREVIEW_CLASS, FONT_ATTRIBUTE, LINK_CLOSE_CLASS,
    SIZE_ATTRIBUTE, custom_color,
};

/// Map a DOM `KeyboardEvent.key` value to a `Key`.
pub fn parse_key(key: &str) -> Key {
    match key {
        "Backspace" => Key::Backspace,
        "Delete" => Key::Delete,
        "Enter" => Key::Enter,
        "Tab" => Key::Tab,
        "Escape" | "Esc" => Key::Escape,
        "ArrowLeft" | "Left" => Key::ArrowLeft,
        "ArrowRight" | "Right" => Key::ArrowRight,
        "ArrowUp" | "Up" => Key::ArrowUp,
        "ArrowDown" | "Down" => Key::ArrowDown,
        "Home" => Key::Home,
        "End" => Key::End,
        "Alt" => Key::Alt,
        "Control" => Key::Control,
        "Meta" | "OS" => Key::Meta,
        "Shift" => Key::Shift,
        "" | "Unidentified" => Key::Unidentified,
        other if other.chars().count() == 1 => Key::character(other),
        _ => Key::Unidentified,
    }
}

/// Convert a DOM keyboard event.
///
/// The browser's own key code wins; it is only derived from the key when the
/// browser reports none.
pub fn key_event(event: &KeyboardEvent) -> KeyEvent {
    let key = parse_key(&event.key());
    let modifiers = Modifiers {
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        shift: event.shift_key(),
        meta: event.meta_key(),
    };
    match event.key_code() {
        0 => KeyEvent::from_key(key, modifiers),
        code => KeyEvent::new(key, code, modifiers),
    }
}

fn element_of(target: &EventTarget) -> Option<Element> {
    match target.dyn_ref::<Element>() {
        Some(el) => Some(el.clone()),
        None => target.dyn_ref::<Node>()?.parent_element(),
    }
}

/// Classify where a page-level mouse-up landed.
pub fn pointer_target(target: Option<EventTarget>, document: &Document) -> PointerTarget {
    let Some(target) = target else {
        return PointerTarget::Outside;
    };
    let document_node: &Node = document.as_ref();
    if target.dyn_ref::<Node>() == Some(document_node) {
        return PointerTarget::Document;
    }
    let notebook = format!(".{EDITOR_CLASS}, .{TOOLBAR_CLASS}");
    match element_of(&target).and_then(|el| el.closest(&notebook).ok().flatten()) {
        Some(_) => PointerTarget::Notebook,
        None => PointerTarget::Outside,
    }
}

/// A click inside the toolbar, decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarClick {
    /// A toolbar button, by modifier class.
    Button(SmolStr),
    Panel(PanelChoice),
    LinkClose,
}

fn closest(el: &Element, selector: &str) -> Option<Element> {
    el.closest(selector).ok().flatten()
}

/// Background color a swatch actually renders with.
fn swatch_color(swatch: &Element) -> Option<String> {
    let computed = web_sys::window()
        .and_then(|w| w.get_computed_style(swatch).ok().flatten())
        .and_then(|style| style.get_property_value("background-color").ok())
        .filter(|v| !v.is_empty());
    computed.or_else(|| swatch.get_attribute(COLOR_ATTRIBUTE))
}

/// Decode a click on or inside the toolbar element.
pub fn toolbar_click(target: &EventTarget) -> Option<ToolbarClick> {
    let el = element_of(target)?;

    let link_close = format!(".{} .{LINK_CLOSE_CLASS}", Submenu::Link.panel_class());
    if closest(&el, &link_close).is_some() {
        return Some(ToolbarClick::LinkClose);
    }
    if let Some(button) = closest(&el, &format!("[{ACTION_ATTRIBUTE}]")) {
        let class = button.get_attribute(ACTION_ATTRIBUTE)?;
        return Some(ToolbarClick::Button(class.into()));
    }
    if let Some(item) = closest(&el, &format!("[{FONT_ATTRIBUTE}]")) {
        let family = item.get_attribute(FONT_ATTRIBUTE)?;
        return Some(ToolbarClick::Panel(PanelChoice::FontFamily(family)));
    }
    if let Some(item) = closest(&el, &format!("[{SIZE_ATTRIBUTE}]")) {
        let px = item.get_attribute(SIZE_ATTRIBUTE)?.parse().ok()?;
        return Some(ToolbarClick::Panel(PanelChoice::FontSize(px)));
    }
    if let Some(swatch) = closest(&el, &format!("[{COLOR_ATTRIBUTE}]")) {
        return Some(ToolbarClick::Panel(PanelChoice::Swatch(swatch_color(&swatch)?)));
    }
    if closest(&el, &format!(".{CUSTOM_PREVIEW_CLASS}")).is_some() {
        let panel = closest(&el, &format!(".{}", Submenu::Color.panel_class()))?;
        return Some(ToolbarClick::Panel(PanelChoice::CustomColor(custom_color(&panel)?)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(parse_key("Enter"), Key::Enter);
        assert_eq!(parse_key("Esc"), Key::Escape);
        assert_eq!(parse_key("Left"), Key::ArrowLeft);
        assert_eq!(parse_key("b"), Key::character("b"));
        assert_eq!(parse_key("F5"), Key::Unidentified);
    }
}
