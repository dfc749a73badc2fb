//! Command dispatch: toolbar actions to document mutations.
//!
//! Every dispatch follows the same protocol: restore the selection the action
//! was made against, apply the command, refresh the toolbar's button state.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::color::{ColorRole, Rgba};
use crate::config::EDITOR_CLASS;
use crate::format::FormatTag;
use crate::platform::{EditorHost, ToolbarSurface};
use crate::selection::find_editor_root;
use crate::toolbar::ToolbarController;

/// Scheme-optional host-and-path URL shape accepted by the link submenu.
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$").unwrap()
});

/// Prefill for the link input when no link is active.
pub const DEFAULT_LINK_TEXT: &str = "http://";

/// Ordinal passed to the native size command before it is rewritten to px.
const SIZE_SENTINEL: &str = "1";

/// A command name and its argument string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    pub name: &'a str,
    pub value: String,
}

impl<'a> Command<'a> {
    /// Split `"fontName Arial Black"` into `fontName` and `Arial Black`,
    /// appending `extra` to the value.
    pub fn parse(command: &'a str, extra: Option<&str>) -> Self {
        let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
        let mut value = rest.to_string();
        if let Some(extra) = extra {
            value.push_str(extra);
        }
        Self { name, value }
    }
}

pub fn is_url(input: &str) -> bool {
    URL.is_match(input)
}

/// Drop the doubled scheme a paste into the prefilled input produces
/// (`http://https://...`).
pub fn clean_pasted_url(text: &str) -> &str {
    match text.strip_prefix(DEFAULT_LINK_TEXT) {
        Some(rest) if rest.starts_with("http://") || rest.starts_with("https://") => rest,
        _ => text,
    }
}

/// A choice made inside a submenu panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelChoice {
    FontFamily(String),
    /// Pixel size.
    FontSize(u32),
    /// A swatch, as its CSS color value.
    Swatch(String),
    /// A color from the custom picker.
    CustomColor(Rgba),
}

/// Result of submitting the link input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// `createLink` was dispatched with this URL.
    Created(String),
    /// The input was emptied over an existing link, which was removed.
    Unlinked,
    /// Not a URL; nothing happened and the submenu stays open.
    Rejected,
}

type Toolbar<H, S> = ToolbarController<S, <H as crate::selection::SelectionStore>::Snapshot>;

/// Restore `snapshot`, apply `command`, refresh the toolbar.
///
/// Without a snapshot the command runs against whatever the platform
/// currently has selected.
pub fn execute<H: EditorHost, S: ToolbarSurface>(
    host: &mut H,
    toolbar: &mut Toolbar<H, S>,
    snapshot: Option<&H::Snapshot>,
    command: &str,
    extra: Option<&str>,
) {
    let command = Command::parse(command, extra);
    host.restore(snapshot);
    tracing::debug!(
        target: "notebook::command",
        name = command.name,
        value = %command.value,
        "applying command"
    );
    host.apply_command(command.name, &command.value);
    toolbar.update_state(&*host);
}

/// Initial text for the link input: the active link's href, or `http://`.
pub fn link_prefill<H: EditorHost, S: ToolbarSurface>(
    host: &H,
    toolbar: &Toolbar<H, S>,
    snapshot: Option<&H::Snapshot>,
) -> String {
    if !toolbar.is_format_active(FormatTag::Link) {
        return DEFAULT_LINK_TEXT.to_string();
    }
    snapshot
        .and_then(|s| enclosing_link(host, s))
        .and_then(|a| host.attribute(&a, "href"))
        .filter(|href| !href.is_empty())
        .unwrap_or_else(|| DEFAULT_LINK_TEXT.to_string())
}

fn enclosing_link<H: EditorHost>(host: &H, snapshot: &H::Snapshot) -> Option<H::Node> {
    let ancestor = host.common_ancestor(snapshot)?;
    host.closest_tag(&ancestor, "a")
}

/// Handle Enter in the link input.
pub fn submit_link<H: EditorHost, S: ToolbarSurface>(
    host: &mut H,
    toolbar: &mut Toolbar<H, S>,
    input: &str,
) -> LinkOutcome {
    let had_link = toolbar.is_format_active(FormatTag::Link);

    if is_url(input) {
        let snapshot = toolbar.take_submenu().and_then(|(_, s)| s);
        execute(host, toolbar, snapshot.as_ref(), "createLink", Some(input));
        return LinkOutcome::Created(input.to_string());
    }

    if input.is_empty() && had_link {
        let snapshot = toolbar.take_submenu().and_then(|(_, s)| s);
        if let Some(anchor) = snapshot.as_ref().and_then(|s| enclosing_link(&*host, s)) {
            host.unwrap_element(&anchor);
        }
        toolbar.update_state(&*host);
        return LinkOutcome::Unlinked;
    }

    tracing::debug!(target: "notebook::command", input, "link input is not a url");
    LinkOutcome::Rejected
}

/// Apply a pixel font size to the selection.
///
/// The native size command only takes small ordinals, so it runs with a
/// sentinel and every resulting `<font size="1">` under the editor root is
/// rewritten to an explicit `font-size`.
pub fn apply_font_size<H: EditorHost, S: ToolbarSurface>(
    host: &mut H,
    toolbar: &mut Toolbar<H, S>,
    snapshot: Option<&H::Snapshot>,
    px: u32,
    fallback_root: &H::Node,
) {
    let root = snapshot
        .and_then(|s| find_editor_root(&*host, s, EDITOR_CLASS))
        .unwrap_or_else(|| fallback_root.clone());

    host.restore(snapshot);
    host.apply_command("fontSize", SIZE_SENTINEL);

    let size = format!("{px}px");
    for font in host.descendants_with_tag(&root, "font") {
        if host.attribute(&font, "size").as_deref() == Some(SIZE_SENTINEL) {
            host.remove_attribute(&font, "size");
            host.set_style(&font, "font-size", &size);
        }
    }
    toolbar.update_state(&*host);
}

/// Apply a color to the selection.
pub fn apply_color<H: EditorHost, S: ToolbarSurface>(
    host: &mut H,
    toolbar: &mut Toolbar<H, S>,
    snapshot: Option<&H::Snapshot>,
    role: ColorRole,
    value: &str,
) {
    execute(host, toolbar, snapshot, role.command(), Some(value));
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::NotebookOptions;
    use crate::geometry::Size;
    use crate::memory::{MemoryDocument, MemoryToolbar, NodeId};
    use crate::menu::{Submenu, build_buttons};
    use crate::selection::{SelectionSnapshot, SelectionStore};
    use crate::toolbar::EditorId;
    use crate::tree::DocumentTree;

    type Controller = ToolbarController<MemoryToolbar, SelectionSnapshot<NodeId>>;

    fn controller() -> Controller {
        ToolbarController::new(
            MemoryToolbar::new(Size::new(100.0, 30.0)),
            Duration::from_millis(500),
        )
    }

    fn commands(doc: &MemoryDocument) -> Vec<(String, String)> {
        doc.commands()
            .iter()
            .map(|(n, v)| (n.to_string(), v.clone()))
            .collect()
    }

    struct Fixture {
        doc: MemoryDocument,
        editor: NodeId,
        text: NodeId,
        toolbar: Controller,
    }

    /// `<div class="notebook-editor"><p>some text</p></div>`, "some" selected,
    /// toolbar shown.
    fn fixture() -> Fixture {
        let mut doc = MemoryDocument::new();
        let editor = doc.append_element(&doc.root(), "div");
        doc.add_class(&editor, EDITOR_CLASS);
        let p = doc.append_element(&editor, "p");
        let text = doc.append_text(&p, "some text");
        doc.select(
            crate::selection::Boundary::new(text, 0),
            crate::selection::Boundary::new(text, 4),
        );
        let mut toolbar = controller();
        toolbar.show(
            EditorId(1),
            &doc,
            &build_buttons(&NotebookOptions::default()),
        );
        Fixture {
            doc,
            editor,
            text,
            toolbar,
        }
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            Command::parse("fontName Arial Black", None),
            Command {
                name: "fontName",
                value: "Arial Black".into()
            }
        );
        assert_eq!(Command::parse("bold", None).value, "");
        assert_eq!(
            Command::parse("createLink", Some("http://a.com")).value,
            "http://a.com"
        );
    }

    #[test]
    fn test_url_validation() {
        assert!(is_url("http://example.com"));
        assert!(is_url("https://example.com/path/to.html"));
        assert!(is_url("example.org"));
        assert!(!is_url("notaurl"));
        assert!(!is_url(""));
        assert!(!is_url("http://"));
    }

    #[test]
    fn test_clean_pasted_url() {
        assert_eq!(clean_pasted_url("http://https://a.com"), "https://a.com");
        assert_eq!(clean_pasted_url("http://http://a.com"), "http://a.com");
        assert_eq!(clean_pasted_url("http://a.com"), "http://a.com");
    }

    #[test]
    fn test_execute_restores_then_applies() {
        let mut f = fixture();
        let saved = f.doc.save();
        f.doc.clear();

        execute(&mut f.doc, &mut f.toolbar, saved.as_ref(), "bold", None);

        assert_eq!(f.doc.save(), saved);
        assert_eq!(commands(&f.doc), vec![("bold".into(), "".into())]);
    }

    #[test]
    fn test_execute_refreshes_toolbar() {
        let mut f = fixture();
        // Simulate the command wrapping the selection in <b>.
        let p = f.doc.parent(&f.text).unwrap();
        let b = f.doc.create_element("b");
        f.doc.append_child(&p, &b);
        f.doc.append_child(&b, &f.text);
        assert!(!f.toolbar.surface().is_button_active("bold"));

        execute(&mut f.doc, &mut f.toolbar, None, "bold", None);
        assert!(f.toolbar.surface().is_button_active("bold"));
    }

    #[test]
    fn test_invalid_link_rejected_and_submenu_stays() {
        let mut f = fixture();
        let saved = f.doc.save();
        f.toolbar.open_submenu(Submenu::Link, saved.clone());

        let outcome = submit_link(&mut f.doc, &mut f.toolbar, "notaurl");

        assert_eq!(outcome, LinkOutcome::Rejected);
        assert!(f.doc.commands().is_empty());
        assert_eq!(f.doc.save(), saved);
        assert_eq!(f.toolbar.open_submenu_kind(), Some(Submenu::Link));
    }

    #[test]
    fn test_valid_link_dispatched_against_restored_selection() {
        let mut f = fixture();
        let saved = f.doc.save();
        f.toolbar.open_submenu(Submenu::Link, saved.clone());
        // Focus moved into the link input.
        f.doc.clear();

        let outcome = submit_link(&mut f.doc, &mut f.toolbar, "http://example.com");

        assert_eq!(outcome, LinkOutcome::Created("http://example.com".into()));
        assert_eq!(
            commands(&f.doc),
            vec![("createLink".into(), "http://example.com".into())]
        );
        assert_eq!(f.doc.save(), saved);
        assert_eq!(f.toolbar.open_submenu_kind(), None);
    }

    #[test]
    fn test_empty_link_input_unwraps_active_link() {
        let mut f = fixture();
        let p = f.doc.parent(&f.text).unwrap();
        let a = f.doc.create_element("a");
        f.doc.set_attribute(&a, "href", "http://old.example");
        f.doc.append_child(&p, &a);
        f.doc.append_child(&a, &f.text);
        f.toolbar.update_state(&f.doc);

        let saved = f.doc.save();
        assert_eq!(
            link_prefill(&f.doc, &f.toolbar, saved.as_ref()),
            "http://old.example"
        );
        f.toolbar.open_submenu(Submenu::Link, saved);

        let outcome = submit_link(&mut f.doc, &mut f.toolbar, "");

        assert_eq!(outcome, LinkOutcome::Unlinked);
        assert!(f.doc.commands().is_empty());
        assert_eq!(f.doc.inner_html(&p), "some text");
        assert!(!f.toolbar.is_format_active(FormatTag::Link));
    }

    #[test]
    fn test_empty_link_input_without_link_rejected() {
        let mut f = fixture();
        f.toolbar.open_submenu(Submenu::Link, f.doc.save());
        assert_eq!(
            submit_link(&mut f.doc, &mut f.toolbar, ""),
            LinkOutcome::Rejected
        );
    }

    #[test]
    fn test_link_prefill_default() {
        let f = fixture();
        let saved = f.doc.save();
        assert_eq!(
            link_prefill(&f.doc, &f.toolbar, saved.as_ref()),
            DEFAULT_LINK_TEXT
        );
    }

    #[test]
    fn test_font_size_rewrites_sentinel() {
        let mut f = fixture();
        let p = f.doc.parent(&f.text).unwrap();
        // What the native command leaves behind.
        let marked = f.doc.create_element("font");
        f.doc.set_attribute(&marked, "size", "1");
        f.doc.append_child(&p, &marked);
        let other = f.doc.append_element(&p, "font");
        f.doc.set_attribute(&other, "size", "3");

        let saved = f.doc.save();
        apply_font_size(&mut f.doc, &mut f.toolbar, saved.as_ref(), 18, &f.editor);

        assert_eq!(commands(&f.doc), vec![("fontSize".into(), "1".into())]);
        assert_eq!(f.doc.attribute(&marked, "size"), None);
        assert_eq!(f.doc.style_of(&marked, "font-size"), Some("18px"));
        assert_eq!(f.doc.attribute(&other, "size").as_deref(), Some("3"));
        assert_eq!(f.doc.style_of(&other, "font-size"), None);
    }

    #[test]
    fn test_font_size_only_touches_own_editor() {
        let mut f = fixture();
        let root = f.doc.root();
        let elsewhere = f.doc.append_element(&root, "div");
        let stray = f.doc.append_element(&elsewhere, "font");
        f.doc.set_attribute(&stray, "size", "1");

        let saved = f.doc.save();
        apply_font_size(&mut f.doc, &mut f.toolbar, saved.as_ref(), 24, &f.editor);
        assert_eq!(f.doc.attribute(&stray, "size").as_deref(), Some("1"));
    }

    #[test]
    fn test_colors() {
        let mut f = fixture();
        let saved = f.doc.save();
        apply_color(
            &mut f.doc,
            &mut f.toolbar,
            saved.as_ref(),
            ColorRole::Foreground,
            "rgb(249, 110, 87)",
        );
        let custom = ColorRole::Background.format_custom(Rgba::rgb(14, 23, 74));
        apply_color(
            &mut f.doc,
            &mut f.toolbar,
            saved.as_ref(),
            ColorRole::Background,
            &custom,
        );
        assert_eq!(
            commands(&f.doc),
            vec![
                ("ForeColor".into(), "rgb(249, 110, 87)".into()),
                ("BackColor".into(), "rgba(14, 23, 74, 1)".into()),
            ]
        );
    }
}
