//! The live DOM as a notebook editor host.
//!
//! `DomHost` implements the core's document, command, geometry and paste
//! traits over `web_sys`. DOM calls that can throw are logged and skipped;
//! nothing on these paths reaches the host page.

use notebook_editor_core::{
    CommandTarget, DocumentTree, Geometry, NodeKind, PasteArea, PlatformError, Rect,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlTextAreaElement, Node};

use crate::selection::SelectionApi;

/// Id of the off-screen textarea pastes are redirected into.
pub const CAPTURE_AREA_ID: &str = "notebook-temparea";

/// Browser implementation of `EditorHost`.
pub struct DomHost {
    pub(crate) document: Document,
    pub(crate) selection_api: SelectionApi,
}

impl DomHost {
    /// Host for the window's document, probing which selection API it has.
    pub fn new() -> Result<Self, PlatformError> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let selection_api = SelectionApi::probe(&window, &document);
        tracing::debug!(target: "notebook::selection", api = ?selection_api, "selection api");
        Ok(Self {
            document,
            selection_api,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection_api(&self) -> SelectionApi {
        self.selection_api
    }

    fn capture_area(&self) -> Option<HtmlTextAreaElement> {
        self.document
            .get_element_by_id(CAPTURE_AREA_ID)?
            .dyn_into::<HtmlTextAreaElement>()
            .ok()
    }

    fn create_capture_area(&self) -> Result<HtmlTextAreaElement, PlatformError> {
        let area = self
            .document
            .create_element("textarea")
            .map_err(|e| format!("create textarea failed: {:?}", e))?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| "textarea is not HtmlTextAreaElement")?;
        area.set_id(CAPTURE_AREA_ID);
        let style = area.style();
        style
            .set_property("position", "absolute")
            .and_then(|_| style.set_property("left", "-1000px"))
            .map_err(|e| format!("style textarea failed: {:?}", e))?;
        let body = self.document.body().ok_or("no body")?;
        body.append_child(&area)
            .map_err(|e| format!("append textarea failed: {:?}", e))?;
        Ok(area)
    }
}

pub(crate) fn as_element(node: &Node) -> Option<&Element> {
    node.dyn_ref::<Element>()
}

/// Log a failed DOM call and carry on.
pub(crate) fn warn_on_err<T, E: std::fmt::Debug>(result: Result<T, E>, what: &str) {
    if let Err(e) = result {
        tracing::warn!(target: "notebook::dom", error = ?e, "{what} failed");
    }
}

impl DocumentTree for DomHost {
    type Node = Node;

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn children(&self, node: &Node) -> Vec<Node> {
        let list = node.child_nodes();
        (0..list.length()).filter_map(|i| list.get(i)).collect()
    }

    fn next_sibling(&self, node: &Node) -> Option<Node> {
        node.next_sibling()
    }

    fn kind(&self, node: &Node) -> NodeKind {
        match node.node_type() {
            Node::TEXT_NODE => NodeKind::Text,
            Node::ELEMENT_NODE => match as_element(node) {
                Some(el) => NodeKind::Element(el.tag_name().to_ascii_lowercase().into()),
                None => NodeKind::Other,
            },
            _ => NodeKind::Other,
        }
    }

    fn text_content(&self, node: &Node) -> String {
        node.text_content().unwrap_or_default()
    }

    fn is_attached(&self, node: &Node) -> bool {
        node.is_connected()
    }

    fn has_class(&self, node: &Node, class: &str) -> bool {
        as_element(node).is_some_and(|el| el.class_list().contains(class))
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        as_element(node)?.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) {
        if let Some(el) = as_element(node) {
            warn_on_err(el.set_attribute(name, value), "set_attribute");
        }
    }

    fn remove_attribute(&mut self, node: &Node, name: &str) {
        if let Some(el) = as_element(node) {
            warn_on_err(el.remove_attribute(name), "remove_attribute");
        }
    }

    fn add_class(&mut self, node: &Node, class: &str) {
        if let Some(el) = as_element(node) {
            warn_on_err(el.class_list().add_1(class), "add class");
        }
    }

    fn set_style(&mut self, node: &Node, property: &str, value: &str) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            warn_on_err(el.style().set_property(property, value), "set style");
        }
    }

    fn create_element(&mut self, tag: &str) -> Node {
        match self.document.create_element(tag) {
            Ok(el) => el.into(),
            Err(e) => {
                // Keeps callers going with a harmless detached node.
                tracing::warn!(target: "notebook::dom", error = ?e, tag, "create_element failed");
                self.document.create_text_node("").into()
            }
        }
    }

    fn append_child(&mut self, parent: &Node, child: &Node) {
        warn_on_err(parent.append_child(child), "append_child");
    }

    fn set_text(&mut self, node: &Node, text: &str) {
        node.set_text_content(Some(text));
    }

    fn remove(&mut self, node: &Node) {
        if let Some(parent) = node.parent_node() {
            warn_on_err(parent.remove_child(node), "remove_child");
        }
    }

    fn clear_children(&mut self, node: &Node) {
        while let Some(child) = node.first_child() {
            if let Err(e) = node.remove_child(&child) {
                tracing::warn!(target: "notebook::dom", error = ?e, "clear_children failed");
                return;
            }
        }
    }

    fn unwrap_element(&mut self, node: &Node) {
        let Some(parent) = node.parent_node() else {
            return;
        };
        while let Some(child) = node.first_child() {
            if let Err(e) = parent.insert_before(&child, Some(node)) {
                tracing::warn!(target: "notebook::dom", error = ?e, "unwrap_element failed");
                return;
            }
        }
        warn_on_err(parent.remove_child(node), "remove_child");
    }

    fn descendants_with_tag(&self, root: &Node, tag: &str) -> Vec<Node> {
        let Some(el) = as_element(root) else {
            return Vec::new();
        };
        match el.query_selector_all(tag) {
            Ok(list) => (0..list.length()).filter_map(|i| list.get(i)).collect(),
            Err(e) => {
                tracing::warn!(target: "notebook::dom", error = ?e, tag, "query_selector_all failed");
                Vec::new()
            }
        }
    }
}

impl CommandTarget for DomHost {
    fn apply_command(&mut self, name: &str, value: &str) {
        let Some(document) = self.document.dyn_ref::<web_sys::HtmlDocument>() else {
            tracing::warn!(target: "notebook::command", name, "document has no execCommand");
            return;
        };
        match document.exec_command_with_show_ui_and_value(name, false, value) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(target: "notebook::command", name, "command not applied")
            }
            Err(e) => tracing::warn!(target: "notebook::command", name, error = ?e, "execCommand failed"),
        }
    }
}

impl Geometry for DomHost {
    fn selection_bounds(&self) -> Option<Rect> {
        self.selection_rect()
    }

    fn scroll_top(&self) -> f64 {
        self.document
            .default_view()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0)
    }
}

impl PasteArea for DomHost {
    fn focus_capture_area(&mut self) {
        let area = match self.capture_area() {
            Some(area) => area,
            None => match self.create_capture_area() {
                Ok(area) => area,
                Err(e) => {
                    tracing::warn!(target: "notebook::session", error = %e, "no paste capture area");
                    return;
                }
            },
        };
        area.set_value("");
        warn_on_err(area.focus(), "focus capture area");
    }

    fn take_captured_text(&mut self) -> Option<String> {
        let area = self.capture_area()?;
        let text = area.value();
        area.set_value("");
        Some(text).filter(|t| !t.is_empty())
    }
}
