//! Selection handling over the two browser selection API families.
//!
//! Modern browsers expose `window.getSelection()` and DOM `Range`s. Old IE
//! only has `document.selection` with text ranges, reached through
//! `js_sys::Reflect`. Which one is used is probed once per host; callers only
//! ever see `BrowserSnapshot`.

use js_sys::{Array, Function, Reflect};
use notebook_editor_core::{CursorTarget, DocumentTree, Rect, SelectionStore};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node, Range, Selection, Window};

use crate::dom::{DomHost, warn_on_err};

/// Which selection API the page provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionApi {
    /// `window.getSelection()` with DOM ranges.
    Range,
    /// Legacy `document.selection` text ranges.
    TextRange,
    /// Neither; every read returns nothing.
    Unsupported,
}

impl SelectionApi {
    pub fn probe(window: &Window, document: &Document) -> Self {
        if Reflect::has(window, &JsValue::from_str("getSelection")).unwrap_or(false) {
            return SelectionApi::Range;
        }
        let has_text_ranges = legacy_selection(document).is_some_and(|sel| {
            Reflect::get(&sel, &JsValue::from_str("createRange")).is_ok_and(|f| f.is_function())
        });
        if has_text_ranges {
            SelectionApi::TextRange
        } else {
            SelectionApi::Unsupported
        }
    }
}

/// A captured selection.
#[derive(Debug, Clone)]
pub enum BrowserSnapshot {
    Range(Range),
    /// Legacy text range object.
    TextRange(JsValue),
}

fn legacy_selection(document: &Document) -> Option<JsValue> {
    Reflect::get(document, &JsValue::from_str("selection"))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let f: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    f.apply(target, &args.iter().collect::<Array>())
}

fn number(target: &JsValue, property: &str) -> f64 {
    Reflect::get(target, &JsValue::from_str(property))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

impl DomHost {
    fn dom_selection(&self) -> Option<Selection> {
        self.document.default_view()?.get_selection().ok().flatten()
    }

    fn text_range(&self) -> Option<JsValue> {
        let selection = legacy_selection(&self.document)?;
        call(&selection, "createRange", &[]).ok()
    }

    fn text_range_parent(range: &JsValue) -> Option<Node> {
        call(range, "parentElement", &[]).ok()?.dyn_into::<Node>().ok()
    }

    /// Bounding box of the live selection, in viewport coordinates.
    pub(crate) fn selection_rect(&self) -> Option<Rect> {
        match self.save()? {
            BrowserSnapshot::Range(range) => {
                let rect = range.get_bounding_client_rect();
                Some(Rect::new(rect.left(), rect.top(), rect.width(), rect.height()))
            }
            BrowserSnapshot::TextRange(range) => Some(Rect::new(
                number(&range, "boundingLeft"),
                number(&range, "boundingTop"),
                number(&range, "boundingWidth"),
                number(&range, "boundingHeight"),
            )),
        }
    }

    fn select_range(&self, range: &Range) {
        let Some(selection) = self.dom_selection() else {
            return;
        };
        if let Err(e) = selection
            .remove_all_ranges()
            .and_then(|_| selection.add_range(range))
        {
            tracing::warn!(target: "notebook::selection", error = ?e, "failed to select range");
        }
    }

    fn place_legacy_cursor(&self, target: CursorTarget<Node>) {
        let (node, at_start) = match target {
            CursorTarget::Within { node, offset } => (node, offset == 0),
            CursorTarget::After(node) => (node, false),
        };
        let Some(body) = self.document.body() else {
            return;
        };
        let result = call(&body, "createTextRange", &[]).and_then(|range| {
            call(&range, "moveToElementText", &[node.into()])?;
            call(&range, "collapse", &[JsValue::from_bool(at_start)])?;
            call(&range, "select", &[])
        });
        if let Err(e) = result {
            tracing::warn!(target: "notebook::selection", error = ?e, "failed to place legacy cursor");
        }
    }
}

impl SelectionStore for DomHost {
    type Snapshot = BrowserSnapshot;

    fn save(&self) -> Option<BrowserSnapshot> {
        match self.selection_api {
            SelectionApi::Range => {
                let selection = self.dom_selection()?;
                if selection.range_count() == 0 {
                    return None;
                }
                selection.get_range_at(0).ok().map(BrowserSnapshot::Range)
            }
            SelectionApi::TextRange => self.text_range().map(BrowserSnapshot::TextRange),
            SelectionApi::Unsupported => None,
        }
    }

    fn restore(&mut self, snapshot: Option<&BrowserSnapshot>) {
        match snapshot {
            None => {}
            Some(BrowserSnapshot::Range(range)) => {
                let attached = |node: Result<Node, JsValue>| {
                    node.is_ok_and(|n| self.is_attached(&n))
                };
                if !attached(range.start_container()) || !attached(range.end_container()) {
                    tracing::debug!(
                        target: "notebook::selection",
                        "snapshot refers to removed nodes, not restoring"
                    );
                    return;
                }
                self.select_range(range);
            }
            Some(BrowserSnapshot::TextRange(range)) => {
                if let Err(e) = call(range, "select", &[]) {
                    tracing::warn!(target: "notebook::selection", error = ?e, "text range select failed");
                }
            }
        }
    }

    fn plain_text(&self) -> String {
        match self.selection_api {
            SelectionApi::Range => self
                .dom_selection()
                .map(|s| String::from(s.to_string()))
                .unwrap_or_default(),
            SelectionApi::TextRange => self
                .text_range()
                .and_then(|r| Reflect::get(&r, &JsValue::from_str("text")).ok())
                .and_then(|t| t.as_string())
                .unwrap_or_default(),
            SelectionApi::Unsupported => String::new(),
        }
    }

    fn clear(&mut self) {
        match self.selection_api {
            SelectionApi::Range => {
                if let Some(selection) = self.dom_selection() {
                    warn_on_err(selection.remove_all_ranges(), "selection clear");
                }
            }
            SelectionApi::TextRange => {
                if let Some(selection) = legacy_selection(&self.document) {
                    warn_on_err(call(&selection, "empty", &[]), "legacy selection clear");
                }
            }
            SelectionApi::Unsupported => {}
        }
    }

    fn is_collapsed(&self, snapshot: &BrowserSnapshot) -> bool {
        match snapshot {
            BrowserSnapshot::Range(range) => range.collapsed(),
            BrowserSnapshot::TextRange(range) => Reflect::get(range, &JsValue::from_str("text"))
                .ok()
                .and_then(|t| t.as_string())
                .is_none_or(|t| t.is_empty()),
        }
    }

    fn common_ancestor(&self, snapshot: &BrowserSnapshot) -> Option<Node> {
        match snapshot {
            BrowserSnapshot::Range(range) => range.common_ancestor_container().ok(),
            BrowserSnapshot::TextRange(range) => Self::text_range_parent(range),
        }
    }

    fn anchor_node(&self) -> Option<Node> {
        match self.selection_api {
            SelectionApi::Range => self.dom_selection()?.anchor_node(),
            SelectionApi::TextRange => Self::text_range_parent(&self.text_range()?),
            SelectionApi::Unsupported => None,
        }
    }

    fn focus_node(&self) -> Option<Node> {
        match self.selection_api {
            SelectionApi::Range => self.dom_selection()?.focus_node(),
            SelectionApi::TextRange => Self::text_range_parent(&self.text_range()?),
            SelectionApi::Unsupported => None,
        }
    }

    fn place_cursor(&mut self, target: CursorTarget<Node>) {
        match self.selection_api {
            SelectionApi::Range => {
                let range = match self.document.create_range() {
                    Ok(range) => range,
                    Err(e) => {
                        tracing::warn!(target: "notebook::selection", error = ?e, "create_range failed");
                        return;
                    }
                };
                let placed = match &target {
                    CursorTarget::Within { node, offset } => range.set_start(node, *offset as u32),
                    CursorTarget::After(node) => range.set_start_after(node),
                };
                if let Err(e) = placed {
                    tracing::warn!(target: "notebook::selection", error = ?e, "failed to place cursor");
                    return;
                }
                range.collapse_with_to_start(true);
                self.select_range(&range);
            }
            SelectionApi::TextRange => self.place_legacy_cursor(target),
            SelectionApi::Unsupported => {}
        }
    }
}
