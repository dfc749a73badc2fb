//! WASM browser tests for notebook-editor-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use notebook_editor_browser::{
    BrowserNotebook, DomHost, DomToolbar, Key, MountError, PointerTarget, SelectionApi,
    ToolbarClick, parse_key, pointer_target, toolbar_click,
};
use notebook_editor_core::config::{EDITOR_CLASS, MODE_ATTRIBUTE, PLACEHOLDER_CLASS};
use notebook_editor_core::transform;
use notebook_editor_core::{
    CursorTarget, DocumentTree, NotebookOptions, SelectionStore, Submenu, ToolbarSurface,
    build_buttons,
};
use web_sys::{Document, HtmlElement, Node};

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn container(html: &str) -> HtmlElement {
    let doc = document();
    let el: HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
    el.set_inner_html(html);
    doc.body().unwrap().append_child(&el).unwrap();
    el
}

// === Key parsing ===

#[wasm_bindgen_test]
fn test_parse_key() {
    assert_eq!(parse_key("Enter"), Key::Enter);
    assert_eq!(parse_key("ArrowLeft"), Key::ArrowLeft);
    assert_eq!(parse_key("v"), Key::character("v"));
}

// === DomHost ===

#[wasm_bindgen_test]
fn test_dom_host_probes_range_api() {
    let host = DomHost::new().unwrap();
    assert_eq!(host.selection_api(), SelectionApi::Range);
}

#[wasm_bindgen_test]
fn test_dom_tree_navigation() {
    let el = container("<p>one <b>two</b></p><ul><li>x</li></ul>");
    let host = DomHost::new().unwrap();
    let root: Node = el.clone().into();

    let children = host.children(&root);
    assert_eq!(children.len(), 2);
    assert!(host.kind(&children[0]).is_tag("p"));
    assert_eq!(host.descendants_with_tag(&root, "b").len(), 1);
    assert_eq!(host.text_content(&root), "one twox");
    el.remove();
}

#[wasm_bindgen_test]
fn test_unwrap_element_keeps_text() {
    let el = container(r#"<p>see <a href="http://example.com">here</a> now</p>"#);
    let mut host = DomHost::new().unwrap();
    let root: Node = el.clone().into();
    let anchor = host.descendants_with_tag(&root, "a").remove(0);

    host.unwrap_element(&anchor);

    assert_eq!(el.inner_html(), "<p>see here now</p>");
    el.remove();
}

#[wasm_bindgen_test]
fn test_cursor_round_trip() {
    let el = container("<p>hello</p>");
    let mut host = DomHost::new().unwrap();
    let root: Node = el.clone().into();
    let text = host.children(&host.children(&root)[0])[0].clone();

    host.place_cursor(CursorTarget::Within {
        node: text.clone(),
        offset: 2,
    });
    let saved = host.save().unwrap();
    assert!(host.is_collapsed(&saved));

    host.clear();
    assert!(host.save().is_none());
    host.restore(Some(&saved));
    assert_eq!(host.focus_node(), Some(text));
    el.remove();
}

// === Toolbar ===

#[wasm_bindgen_test]
fn test_toolbar_renders_buttons_and_panels() {
    let options = NotebookOptions {
        toolbar_selector: "render-test".into(),
        ..NotebookOptions::default()
    };
    let mut toolbar = DomToolbar::new(document(), options.toolbar_selector.clone());
    toolbar.prepare().unwrap();
    toolbar.render_buttons(&build_buttons(&options)).unwrap();

    let el = toolbar.element().unwrap().clone();
    assert_eq!(el.query_selector_all("button[data-action]").unwrap().length(), 17);
    assert_eq!(el.query_selector_all(".color-panel").unwrap().length(), 1);

    toolbar.show_panel(Submenu::Link);
    let link_area: HtmlElement = el
        .query_selector(".link-area")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    assert_eq!(link_area.style().get_property_value("display").unwrap(), "block");

    let bold = el.query_selector("button.bold").unwrap().unwrap();
    assert_eq!(toolbar_click(&bold), Some(ToolbarClick::Button("bold".into())));
    el.remove();
}

#[wasm_bindgen_test]
fn test_toolbar_class_and_panel_toggles() {
    let options = NotebookOptions {
        toolbar_selector: "toggle-test".into(),
        ..NotebookOptions::default()
    };
    let mut toolbar = DomToolbar::new(document(), options.toolbar_selector.clone());
    toolbar.prepare().unwrap();
    toolbar.render_buttons(&build_buttons(&options)).unwrap();
    let el = toolbar.element().unwrap().clone();

    toolbar.set_class("active", true);
    assert!(el.class_list().contains("active"));
    toolbar.set_class("active", false);
    assert!(!el.class_list().contains("active"));

    toolbar.set_button_active("bold", true);
    toolbar.set_button_active("italic", true);
    assert_eq!(el.query_selector_all("button.active").unwrap().length(), 2);
    toolbar.clear_active_buttons();
    assert_eq!(el.query_selector_all("button.active").unwrap().length(), 0);

    toolbar.show_panel(Submenu::Size);
    toolbar.hide_panels();
    let size_panel: HtmlElement = el
        .query_selector(".size-panel")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    assert_eq!(size_panel.style().get_property_value("display").unwrap(), "none");

    toolbar.set_link_input("http://example.com");
    let input: web_sys::HtmlInputElement = el
        .query_selector(".link-area input")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    assert_eq!(input.value(), "http://example.com");
    el.remove();
}

#[wasm_bindgen_test]
fn test_toolbar_translation_round_trip() {
    let mut toolbar = DomToolbar::new(document(), "transform-test");
    toolbar.prepare().unwrap();
    transform::translate(&mut toolbar, 40.0, 12.0);
    transform::scale(&mut toolbar, 2.0);
    let t = transform::translation(&toolbar);
    assert_eq!((t.x, t.y), (40, 12));
    toolbar.element().unwrap().remove();
}

// === Mounting ===

#[wasm_bindgen_test]
fn test_mount_prepares_container() {
    let el = container("   ");
    let notebook = BrowserNotebook::mount(&el, NotebookOptions::default()).unwrap();

    assert!(el.class_list().contains(EDITOR_CLASS));
    assert_eq!(el.get_attribute(MODE_ATTRIBUTE).as_deref(), Some("multiline"));
    let placeholder = el.first_element_child().unwrap();
    assert!(placeholder.class_list().contains(PLACEHOLDER_CLASS));
    assert!(!notebook.toolbar_active());

    notebook.destroy();
    el.remove();
}

#[wasm_bindgen_test]
fn test_mount_rejects_bad_options() {
    let el = container("<p>x</p>");
    let mut options = NotebookOptions::default();
    options.modifiers.push("sparkle".into());
    assert!(matches!(
        BrowserNotebook::mount(&el, options),
        Err(MountError::Config(_))
    ));
    el.remove();
}

#[wasm_bindgen_test]
fn test_pointer_targets() {
    let doc = document();
    let editor_el = container("<p>inside</p>");
    let notebook = BrowserNotebook::mount(&editor_el, NotebookOptions::default()).unwrap();
    let outside = container("<p>outside</p>");

    assert_eq!(
        pointer_target(Some(doc.clone().into()), &doc),
        PointerTarget::Document
    );
    let inner = editor_el.first_element_child().unwrap();
    assert_eq!(
        pointer_target(Some(inner.into()), &doc),
        PointerTarget::Notebook
    );
    assert_eq!(
        pointer_target(Some(outside.clone().into()), &doc),
        PointerTarget::Outside
    );

    notebook.destroy();
    editor_el.remove();
    outside.remove();
}
