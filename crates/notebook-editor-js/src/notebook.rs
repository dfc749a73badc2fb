//! JsNotebook - an editor mounted on a page element, for JavaScript.

use notebook_editor_browser::{BrowserNotebook, NotebookOptions};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::types::JsNotebookOptions;

/// A notebook editor exposed to JavaScript.
///
/// Calling `destroy` (or letting the object be freed) removes the editor's
/// listeners; the element keeps its content.
#[wasm_bindgen]
pub struct JsNotebook {
    inner: Option<BrowserNotebook>,
}

#[wasm_bindgen]
impl JsNotebook {
    /// Turn `element` into an editor.
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlElement, options: JsNotebookOptions) -> Result<JsNotebook, JsError> {
        let options = options
            .into_options()
            .map_err(|e| JsError::new(&e.to_string()))?;
        mount(&element, options)
    }

    /// Numeric id of this editor on the page.
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> Option<u32> {
        self.inner.as_ref().map(|n| n.id().0)
    }

    #[wasm_bindgen(getter)]
    pub fn element(&self) -> Option<HtmlElement> {
        self.inner.as_ref().map(|n| n.element().clone())
    }

    /// Run a command string, e.g. `"bold"` or `"createLink http://a.b"`.
    #[wasm_bindgen(js_name = execCommand)]
    pub fn exec_command(&self, command: &str) {
        if let Some(notebook) = &self.inner {
            notebook.exec_command(command);
        }
    }

    #[wasm_bindgen(js_name = showToolbar)]
    pub fn show_toolbar(&self) {
        if let Some(notebook) = &self.inner {
            notebook.show_toolbar();
        }
    }

    #[wasm_bindgen(js_name = hideToolbar)]
    pub fn hide_toolbar(&self) {
        if let Some(notebook) = &self.inner {
            notebook.hide_toolbar();
        }
    }

    /// Whether the toolbar is currently showing for this editor.
    #[wasm_bindgen(getter, js_name = toolbarActive)]
    pub fn toolbar_active(&self) -> bool {
        self.inner.as_ref().is_some_and(BrowserNotebook::toolbar_active)
    }

    /// Detach the editor. Further calls are no-ops.
    pub fn destroy(&mut self) {
        if let Some(notebook) = self.inner.take() {
            notebook.destroy();
        }
    }
}

fn mount(element: &HtmlElement, options: NotebookOptions) -> Result<JsNotebook, JsError> {
    let notebook =
        BrowserNotebook::mount(element, options).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(JsNotebook {
        inner: Some(notebook),
    })
}

/// Mount an editor on every element matching `selector`.
///
/// Returns an array of `JsNotebook`, one per matched element, in document
/// order. Elements that are not HTML elements are skipped.
#[wasm_bindgen(js_name = mountAll)]
pub fn mount_all(selector: &str, options: JsNotebookOptions) -> Result<js_sys::Array, JsError> {
    let options = options
        .into_options()
        .map_err(|e| JsError::new(&e.to_string()))?;
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsError::new("no document"))?;
    let nodes = document
        .query_selector_all(selector)
        .map_err(|_| JsError::new(&format!("invalid selector: {selector}")))?;

    let mounted = js_sys::Array::new();
    for i in 0..nodes.length() {
        let Some(element) = nodes
            .item(i)
            .and_then(|n| n.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        mounted.push(&JsValue::from(mount(&element, options.clone())?));
    }
    tracing::debug!(
        target: "notebook::session",
        selector,
        count = mounted.length(),
        "mounted editors"
    );
    Ok(mounted)
}

/// The full default options, as a plain object.
#[wasm_bindgen(js_name = defaultOptions)]
pub fn default_options() -> Result<JsValue, JsError> {
    NotebookOptions::default()
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Failed to serialize options: {}", e)))
}
