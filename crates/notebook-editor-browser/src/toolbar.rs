//! DOM rendering of the shared toolbar.
//!
//! `DomToolbar` only draws. Clicks are delegated from the document (see
//! `crate::notebook`), so the element can be rebuilt on every show without
//! re-binding listeners.

use notebook_editor_core::config::TOOLBAR_CLASS;
use notebook_editor_core::menu::{DEFAULT_CUSTOM_COLOR, FONT_FAMILIES, FONT_SIZES_PX, swatch_css};
use notebook_editor_core::{
    ButtonAction, PlatformError, Rgba, Size, SmolStr, Submenu, ToolbarButton, ToolbarSurface,
    TransformTarget,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::dom::warn_on_err;

/// Class shared by every submenu panel.
pub const PANEL_CLASS: &str = "toolbar-panel";
/// Attribute carrying a button's modifier name.
pub const ACTION_ATTRIBUTE: &str = "data-action";
pub const FONT_ATTRIBUTE: &str = "data-font";
pub const SIZE_ATTRIBUTE: &str = "data-size";
pub const COLOR_ATTRIBUTE: &str = "data-color";
pub const CUSTOM_PREVIEW_CLASS: &str = "custom-preview";
pub const OPACITY_CLASS: &str = "opacity";
pub const LINK_CLOSE_CLASS: &str = "close";

/// The toolbar element of one page.
pub struct DomToolbar {
    document: Document,
    selector: SmolStr,
    element: Option<HtmlElement>,
}

impl DomToolbar {
    pub fn new(document: Document, selector: impl Into<SmolStr>) -> Self {
        Self {
            document,
            selector: selector.into(),
            element: None,
        }
    }

    /// The toolbar element, once built.
    pub fn element(&self) -> Option<&HtmlElement> {
        self.element.as_ref()
    }

    /// Selector matching the toolbar element.
    pub fn css_selector(&self) -> String {
        format!(".{TOOLBAR_CLASS}.{}", self.selector)
    }

    fn create(&self, tag: &str, class: Option<&str>) -> Result<Element, PlatformError> {
        let el = self
            .document
            .create_element(tag)
            .map_err(|e| format!("create {tag} failed: {:?}", e))?;
        if let Some(class) = class {
            el.set_class_name(class);
        }
        Ok(el)
    }

    fn append(parent: &Element, child: &Element) -> Result<(), PlatformError> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|e| format!("append failed: {:?}", e).into())
    }

    fn set_attr(el: &Element, name: &str, value: &str) -> Result<(), PlatformError> {
        el.set_attribute(name, value)
            .map_err(|e| format!("set {name} failed: {:?}", e).into())
    }

    fn set_css(el: &Element, property: &str, value: &str) -> Result<(), PlatformError> {
        match el.dyn_ref::<HtmlElement>() {
            Some(el) => el
                .style()
                .set_property(property, value)
                .map_err(|e| format!("set {property} failed: {:?}", e).into()),
            None => Ok(()),
        }
    }

    fn find(&self, selector: &str) -> Option<Element> {
        self.element.as_ref()?.query_selector(selector).ok().flatten()
    }

    fn find_all(&self, selector: &str) -> Vec<Element> {
        let Some(list) = self
            .element
            .as_ref()
            .and_then(|el| el.query_selector_all(selector).ok())
        else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .collect()
    }

    fn panel(&self, class: &str) -> Result<Element, PlatformError> {
        let panel = self.create("div", Some(&format!("{class} {PANEL_CLASS}")))?;
        Self::set_css(&panel, "display", "none")?;
        Ok(panel)
    }

    fn family_panel(&self) -> Result<Element, PlatformError> {
        let panel = self.panel(Submenu::Font.panel_class())?;
        let list = self.create("ul", None)?;
        for family in FONT_FAMILIES {
            let item = self.create("li", None)?;
            Self::set_attr(&item, FONT_ATTRIBUTE, family)?;
            Self::set_css(&item, "font-family", family)?;
            item.set_text_content(Some(family));
            Self::append(&list, &item)?;
        }
        Self::append(&panel, &list)?;
        Ok(panel)
    }

    fn size_panel(&self) -> Result<Element, PlatformError> {
        let panel = self.panel(Submenu::Size.panel_class())?;
        let list = self.create("ul", None)?;
        for px in FONT_SIZES_PX {
            let size = format!("{px}px");
            let item = self.create("li", None)?;
            Self::set_attr(&item, SIZE_ATTRIBUTE, &px.to_string())?;
            Self::set_css(&item, "font-size", &size)?;
            item.set_text_content(Some(&size));
            Self::append(&list, &item)?;
        }
        Self::append(&panel, &list)?;
        Ok(panel)
    }

    fn color_panel(&self) -> Result<Element, PlatformError> {
        let panel = self.panel(Submenu::Color.panel_class())?;
        let swatches = self.create("div", Some("swatches"))?;
        for css in swatch_css() {
            let swatch = self.create("span", Some("swatch"))?;
            Self::set_attr(&swatch, COLOR_ATTRIBUTE, &css)?;
            Self::set_css(&swatch, "background-color", &css)?;
            Self::append(&swatches, &swatch)?;
        }
        Self::append(&panel, &swatches)?;

        let default = Rgba::from_u32(DEFAULT_CUSTOM_COLOR);
        let custom = self.create("div", Some("custom-color"))?;
        let picker = self.create("input", Some("picker"))?;
        Self::set_attr(&picker, "type", "color")?;
        Self::set_attr(&picker, "value", &default.to_hex())?;
        let opacity = self.create("input", Some(OPACITY_CLASS))?;
        Self::set_attr(&opacity, "type", "range")?;
        Self::set_attr(&opacity, "min", "0")?;
        Self::set_attr(&opacity, "max", "100")?;
        Self::set_attr(&opacity, "value", "100")?;
        let preview = self.create("span", Some(CUSTOM_PREVIEW_CLASS))?;
        Self::set_css(&preview, "background-color", &default.to_css())?;
        for child in [&picker, &opacity, &preview] {
            Self::append(&custom, child)?;
        }
        Self::append(&panel, &custom)?;
        Ok(panel)
    }

    fn link_area(&self) -> Result<Element, PlatformError> {
        let panel = self.panel(Submenu::Link.panel_class())?;
        let input = self.create("input", None)?;
        Self::set_attr(&input, "type", "text")?;
        let close = self.create("button", Some(LINK_CLOSE_CLASS))?;
        Self::set_attr(&close, "type", "button")?;
        close.set_text_content(Some("×"));
        Self::append(&panel, &input)?;
        Self::append(&panel, &close)?;
        Ok(panel)
    }
}

/// Color currently set in a color panel's custom picker.
pub fn custom_color(panel: &Element) -> Option<Rgba> {
    let value = |selector: &str| {
        panel
            .query_selector(selector)
            .ok()
            .flatten()?
            .dyn_into::<HtmlInputElement>()
            .ok()
            .map(|input| input.value())
    };
    let color = Rgba::parse_css(&value(".picker")?)?;
    let opacity = value(format!(".{OPACITY_CLASS}").as_str())
        .and_then(|v| v.parse::<f32>().ok())
        .unwrap_or(100.0);
    Some(color.with_alpha(opacity / 100.0))
}

impl TransformTarget for DomToolbar {
    fn style_property(&self, name: &str) -> Option<String> {
        self.element
            .as_ref()?
            .style()
            .get_property_value(name)
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        if let Some(el) = &self.element {
            if let Err(e) = el.style().set_property(name, value) {
                tracing::warn!(target: "notebook::toolbar", error = ?e, name, "set style failed");
            }
        }
    }
}

impl ToolbarSurface for DomToolbar {
    fn prepare(&mut self) -> Result<(), PlatformError> {
        if self.element.is_none() {
            let existing = self
                .document
                .query_selector(&self.css_selector())
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            let element = match existing {
                Some(el) => el,
                None => {
                    let el = self
                        .create("div", Some(&format!("{TOOLBAR_CLASS} {}", self.selector)))?
                        .dyn_into::<HtmlElement>()
                        .map_err(|_| "toolbar is not HtmlElement")?;
                    let body = self.document.body().ok_or("no body")?;
                    body.append_child(&el)
                        .map_err(|e| format!("append toolbar failed: {:?}", e))?;
                    tracing::debug!(target: "notebook::toolbar", "toolbar element created");
                    el
                }
            };
            self.element = Some(element);
        }
        if let Some(el) = &self.element {
            el.set_inner_html("");
        }
        Ok(())
    }

    fn render_buttons(&mut self, buttons: &[ToolbarButton]) -> Result<(), PlatformError> {
        let root: Element = self
            .element
            .clone()
            .ok_or("toolbar not prepared")?
            .into();

        let list = self.create("ul", Some("toolbar-buttons"))?;
        for button in buttons {
            let item = self.create("li", None)?;
            let el = self.create("button", Some(&button.class))?;
            Self::set_attr(&el, "type", "button")?;
            Self::set_attr(&el, ACTION_ATTRIBUTE, &button.class)?;
            Self::append(&item, &el)?;
            Self::append(&list, &item)?;
        }
        Self::append(&root, &list)?;

        let mut panels: Vec<&'static str> = Vec::new();
        for submenu in buttons.iter().filter_map(|b| match b.action {
            ButtonAction::Submenu(s) => Some(s),
            _ => None,
        }) {
            if panels.contains(&submenu.panel_class()) {
                continue;
            }
            panels.push(submenu.panel_class());
            let panel = match submenu {
                Submenu::Font => self.family_panel()?,
                Submenu::Size => self.size_panel()?,
                Submenu::Color | Submenu::BackgroundColor => self.color_panel()?,
                Submenu::Link => self.link_area()?,
            };
            Self::append(&root, &panel)?;
        }
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) {
        let display = if visible { "block" } else { "none" };
        self.set_style_property("display", display);
    }

    fn set_class(&mut self, class: &str, on: bool) {
        if let Some(el) = &self.element {
            warn_on_err(el.class_list().toggle_with_force(class, on), "toolbar class toggle");
        }
    }

    fn set_button_active(&mut self, class: &str, active: bool) {
        if let Some(button) = self.find(&format!("button[{ACTION_ATTRIBUTE}=\"{class}\"]")) {
            warn_on_err(
                button.class_list().toggle_with_force("active", active),
                "button highlight",
            );
        }
    }

    fn clear_active_buttons(&mut self) {
        for button in self.find_all("button.active") {
            warn_on_err(button.class_list().remove_1("active"), "button highlight reset");
        }
    }

    fn size(&self) -> Size {
        self.element
            .as_ref()
            .map(|el| Size::new(el.offset_width() as f64, el.offset_height() as f64))
            .unwrap_or_default()
    }

    fn show_panel(&mut self, submenu: Submenu) {
        if let Some(panel) = self.find(&format!(".{}", submenu.panel_class())) {
            warn_on_err(Self::set_css(&panel, "display", "block"), "panel show");
        }
    }

    fn hide_panels(&mut self) {
        for panel in self.find_all(&format!(".{PANEL_CLASS}")) {
            warn_on_err(Self::set_css(&panel, "display", "none"), "panel hide");
        }
    }

    fn set_link_input(&mut self, text: &str) {
        let Some(input) = self
            .find(&format!(".{} input", Submenu::Link.panel_class()))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        input.set_value(text);
        warn_on_err(input.focus(), "link input focus");
    }
}
