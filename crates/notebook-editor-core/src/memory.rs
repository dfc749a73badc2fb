//! In-memory platform.
//!
//! `MemoryDocument` is an arena-backed document tree with its own selection,
//! command log, geometry and paste capture area. `MemoryToolbar` records what
//! the toolbar controller asked it to draw. Together they implement every
//! platform trait, so sessions run headless in tests and non-browser hosts.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::error::PlatformError;
use crate::geometry::{Geometry, Rect, Size};
use crate::menu::{Submenu, ToolbarButton};
use crate::platform::{CommandTarget, PasteArea, ToolbarSurface};
use crate::selection::{Boundary, CursorTarget, SelectionSnapshot, SelectionStore};
use crate::transform::TransformTarget;
use crate::tree::{DocumentTree, NodeKind};

/// Handle to a node in a `MemoryDocument`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Inline style declarations, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    properties: Vec<(SmolStr, String)>,
}

impl StyleMap {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, name: &str, value: &str) {
        match self.properties.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.properties.push((name.into(), value.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn clear(&mut self) {
        self.properties.clear();
    }

    /// Serialize as a `style` attribute value.
    pub fn to_css(&self) -> String {
        self.properties
            .iter()
            .map(|(k, v)| format!("{k}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TransformTarget for StyleMap {
    fn style_property(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        self.set(name, value);
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<SmolStr>,
    attributes: Vec<(SmolStr, String)>,
    style: StyleMap,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: String::new(),
            parent: None,
            children: Vec::new(),
            classes: Vec::new(),
            attributes: Vec::new(),
            style: StyleMap::default(),
        }
    }
}

/// Arena-backed document with a `body` root.
///
/// Removed nodes stay in the arena, detached, so stale handles keep resolving
/// and `is_attached` can answer for them.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    root: NodeId,
    selection: Option<SelectionSnapshot<NodeId>>,
    commands: Vec<(SmolStr, String)>,
    selection_rect: Option<Rect>,
    scroll_top: f64,
    capture_focused: bool,
    captured: Option<String>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Element("body".into()))],
            root: NodeId(0),
            selection: None,
            commands: Vec::new(),
            selection_rect: Some(Rect::new(0.0, 0.0, 0.0, 0.0)),
            scroll_top: 0.0,
            capture_focused: false,
            captured: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn data(&self, id: &NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn data_mut(&mut self, id: &NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(data);
        NodeId(self.nodes.len() - 1)
    }

    fn detach(&mut self, id: &NodeId) {
        if let Some(parent) = self.data_mut(id).parent.take() {
            self.data_mut(&parent).children.retain(|c| c != id);
        }
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: &NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, &id);
        id
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: &NodeId, text: &str) -> NodeId {
        let mut data = NodeData::new(NodeKind::Text);
        data.text = text.to_string();
        let id = self.alloc(data);
        self.append_child(parent, &id);
        id
    }

    /// Replace the selection outright.
    pub fn select(&mut self, anchor: Boundary<NodeId>, focus: Boundary<NodeId>) {
        self.selection = Some(SelectionSnapshot::new(anchor, focus));
    }

    /// Select the whole text of a text node.
    pub fn select_text(&mut self, text: &NodeId) {
        let len = self.data(text).text.chars().count();
        self.select(Boundary::new(*text, 0), Boundary::new(*text, len));
    }

    pub fn selection(&self) -> Option<&SelectionSnapshot<NodeId>> {
        self.selection.as_ref()
    }

    /// Commands applied so far, as `(name, value)`.
    pub fn commands(&self) -> &[(SmolStr, String)] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<(SmolStr, String)> {
        std::mem::take(&mut self.commands)
    }

    /// Bounding box reported for any live selection.
    pub fn set_selection_rect(&mut self, rect: Option<Rect>) {
        self.selection_rect = rect;
    }

    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top;
    }

    /// Simulate the platform pasting `text`. It only lands if the capture
    /// area has focus.
    pub fn paste(&mut self, text: &str) {
        if self.capture_focused {
            self.captured = Some(text.to_string());
        }
    }

    pub fn capture_focused(&self) -> bool {
        self.capture_focused
    }

    pub fn style_of(&self, node: &NodeId, property: &str) -> Option<&str> {
        self.data(node).style.get(property)
    }

    /// Preorder descendants of `node`, excluding `node` itself.
    fn descendants(&self, node: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.data(node).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.data(&id).children.iter().rev().copied());
        }
        out
    }

    /// Serialize the children of `node` as HTML.
    pub fn inner_html(&self, node: &NodeId) -> String {
        let mut out = String::new();
        for child in &self.data(node).children {
            self.write_html(child, &mut out);
        }
        out
    }

    fn write_html(&self, node: &NodeId, out: &mut String) {
        let data = self.data(node);
        match &data.kind {
            NodeKind::Text => out.push_str(&data.text),
            NodeKind::Other => {}
            NodeKind::Element(tag) => {
                out.push('<');
                out.push_str(tag);
                if !data.classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", data.classes.join(" ")));
                }
                for (name, value) in &data.attributes {
                    out.push_str(&format!(" {name}=\"{value}\""));
                }
                if !data.style.is_empty() {
                    out.push_str(&format!(" style=\"{}\"", data.style.to_css()));
                }
                out.push('>');
                for child in &data.children {
                    self.write_html(child, out);
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
    }

    /// Character spans of every node in document order, plus the full text.
    fn text_layout(&self) -> (Vec<char>, HashMap<NodeId, (usize, usize)>) {
        enum Visit {
            Enter(NodeId),
            Exit(NodeId),
        }

        let mut chars = Vec::new();
        let mut starts = HashMap::new();
        let mut spans = HashMap::new();
        let mut stack = vec![Visit::Enter(self.root)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id) => {
                    starts.insert(id, chars.len());
                    let data = self.data(&id);
                    if data.kind.is_text() {
                        chars.extend(data.text.chars());
                    }
                    stack.push(Visit::Exit(id));
                    stack.extend(data.children.iter().rev().map(|c| Visit::Enter(*c)));
                }
                Visit::Exit(id) => {
                    let start = starts.get(&id).copied().unwrap_or(0);
                    spans.insert(id, (start, chars.len()));
                }
            }
        }
        (chars, spans)
    }

    fn position(
        &self,
        boundary: &Boundary<NodeId>,
        spans: &HashMap<NodeId, (usize, usize)>,
    ) -> Option<usize> {
        let (start, end) = *spans.get(&boundary.node)?;
        let data = self.data(&boundary.node);
        if data.kind.is_text() {
            return Some((start + boundary.offset).min(end));
        }
        match data.children.get(boundary.offset) {
            Some(child) => spans.get(child).map(|(s, _)| *s),
            None => Some(end),
        }
    }
}

impl DocumentTree for MemoryDocument {
    type Node = NodeId;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.data(node).children.clone()
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.data(node).parent?;
        let siblings = &self.data(&parent).children;
        let index = siblings.iter().position(|c| c == node)?;
        siblings.get(index + 1).copied()
    }

    fn kind(&self, node: &NodeId) -> NodeKind {
        self.data(node).kind.clone()
    }

    fn text_content(&self, node: &NodeId) -> String {
        let data = self.data(node);
        if data.kind.is_text() {
            return data.text.clone();
        }
        self.descendants(node)
            .iter()
            .map(|id| self.data(id))
            .filter(|d| d.kind.is_text())
            .map(|d| d.text.as_str())
            .collect()
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        self.ancestors_inclusive(node).last() == Some(&self.root)
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.data(node).classes.iter().any(|c| c == class)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let data = self.data(node);
        match name {
            "class" if !data.classes.is_empty() => Some(data.classes.join(" ")),
            "style" if !data.style.is_empty() => Some(data.style.to_css()),
            _ => data
                .attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
        }
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let data = self.data_mut(node);
        if name == "class" {
            data.classes = value.split_whitespace().map(SmolStr::from).collect();
            return;
        }
        match data.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => data.attributes.push((name.into(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        let data = self.data_mut(node);
        match name {
            "class" => data.classes.clear(),
            "style" => data.style.clear(),
            _ => data.attributes.retain(|(k, _)| k != name),
        }
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        let data = self.data_mut(node);
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.into());
        }
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        self.data_mut(node).style.set(property, value);
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::new(NodeKind::Element(
            tag.to_ascii_lowercase().into(),
        )))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.detach(child);
        self.data_mut(child).parent = Some(*parent);
        self.data_mut(parent).children.push(*child);
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        if self.data(node).kind.is_text() {
            self.data_mut(node).text = text.to_string();
            return;
        }
        self.clear_children(node);
        self.append_text(node, text);
    }

    fn remove(&mut self, node: &NodeId) {
        self.detach(node);
    }

    fn clear_children(&mut self, node: &NodeId) {
        for child in self.children(node) {
            self.detach(&child);
        }
    }

    fn unwrap_element(&mut self, node: &NodeId) {
        let Some(parent) = self.data(node).parent else {
            return;
        };
        let children = std::mem::take(&mut self.data_mut(node).children);
        for child in &children {
            self.data_mut(child).parent = Some(parent);
        }
        let siblings = &mut self.data_mut(&parent).children;
        if let Some(index) = siblings.iter().position(|c| c == node) {
            siblings.remove(index);
            for (i, child) in children.into_iter().enumerate() {
                siblings.insert(index + i, child);
            }
        }
        self.data_mut(node).parent = None;
    }

    fn descendants_with_tag(&self, root: &NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.data(id).kind.is_tag(tag))
            .collect()
    }
}

impl SelectionStore for MemoryDocument {
    type Snapshot = SelectionSnapshot<NodeId>;

    fn save(&self) -> Option<Self::Snapshot> {
        self.selection.clone()
    }

    fn restore(&mut self, snapshot: Option<&Self::Snapshot>) {
        let Some(snapshot) = snapshot else {
            return;
        };
        if !self.is_attached(&snapshot.anchor.node) || !self.is_attached(&snapshot.focus.node) {
            tracing::debug!(
                target: "notebook::selection",
                "snapshot refers to removed nodes, not restoring"
            );
            return;
        }
        self.selection = Some(snapshot.clone());
        self.capture_focused = false;
    }

    fn plain_text(&self) -> String {
        let Some(selection) = self.selection.as_ref().filter(|s| !s.is_collapsed()) else {
            return String::new();
        };
        let (chars, spans) = self.text_layout();
        let (Some(a), Some(b)) = (
            self.position(&selection.anchor, &spans),
            self.position(&selection.focus, &spans),
        ) else {
            return String::new();
        };
        chars[a.min(b)..a.max(b)].iter().collect()
    }

    fn clear(&mut self) {
        self.selection = None;
    }

    fn is_collapsed(&self, snapshot: &Self::Snapshot) -> bool {
        snapshot.is_collapsed()
    }

    fn common_ancestor(&self, snapshot: &Self::Snapshot) -> Option<NodeId> {
        let focus_chain = self.ancestors_inclusive(&snapshot.focus.node);
        self.ancestors_inclusive(&snapshot.anchor.node)
            .into_iter()
            .find(|n| focus_chain.contains(n))
    }

    fn anchor_node(&self) -> Option<NodeId> {
        self.selection.as_ref().map(|s| s.anchor.node)
    }

    fn focus_node(&self) -> Option<NodeId> {
        self.selection.as_ref().map(|s| s.focus.node)
    }

    fn place_cursor(&mut self, target: CursorTarget<NodeId>) {
        let (node, offset) = match target {
            CursorTarget::Within { node, offset } => (node, offset),
            CursorTarget::After(node) => {
                let Some(parent) = self.parent(&node) else {
                    return;
                };
                let index = self
                    .data(&parent)
                    .children
                    .iter()
                    .position(|c| *c == node)
                    .map_or(0, |i| i + 1);
                (parent, index)
            }
        };
        self.selection = Some(SelectionSnapshot::caret(node, offset));
        self.capture_focused = false;
    }
}

impl CommandTarget for MemoryDocument {
    fn apply_command(&mut self, name: &str, value: &str) {
        self.commands.push((name.into(), value.to_string()));
    }
}

impl Geometry for MemoryDocument {
    fn selection_bounds(&self) -> Option<Rect> {
        self.selection.as_ref().and(self.selection_rect)
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }
}

impl PasteArea for MemoryDocument {
    fn focus_capture_area(&mut self) {
        self.capture_focused = true;
        self.captured = None;
    }

    fn take_captured_text(&mut self) -> Option<String> {
        self.capture_focused = false;
        self.captured.take()
    }
}

/// Toolbar surface that records what it was asked to draw.
#[derive(Debug, Clone, Default)]
pub struct MemoryToolbar {
    built: bool,
    prepare_count: usize,
    buttons: Vec<ToolbarButton>,
    visible: bool,
    classes: Vec<SmolStr>,
    active_buttons: Vec<SmolStr>,
    size: Size,
    panel: Option<Submenu>,
    link_input: String,
    style: StyleMap,
}

impl MemoryToolbar {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// How many times the toolbar was prepared for a show.
    pub fn prepare_count(&self) -> usize {
        self.prepare_count
    }

    pub fn buttons(&self) -> &[ToolbarButton] {
        &self.buttons
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_button_active(&self, class: &str) -> bool {
        self.active_buttons.iter().any(|c| c == class)
    }

    pub fn active_buttons(&self) -> &[SmolStr] {
        &self.active_buttons
    }

    pub fn open_panel(&self) -> Option<Submenu> {
        self.panel
    }

    pub fn link_input(&self) -> &str {
        &self.link_input
    }

    pub fn style(&self) -> &StyleMap {
        &self.style
    }
}

impl TransformTarget for MemoryToolbar {
    fn style_property(&self, name: &str) -> Option<String> {
        self.style.style_property(name)
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        self.style.set_style_property(name, value);
    }
}

impl ToolbarSurface for MemoryToolbar {
    fn prepare(&mut self) -> Result<(), PlatformError> {
        self.built = true;
        self.prepare_count += 1;
        self.buttons.clear();
        self.active_buttons.clear();
        self.panel = None;
        Ok(())
    }

    fn render_buttons(&mut self, buttons: &[ToolbarButton]) -> Result<(), PlatformError> {
        if !self.built {
            return Err("toolbar rendered before it was prepared".into());
        }
        self.buttons = buttons.to_vec();
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_class(&mut self, class: &str, on: bool) {
        self.classes.retain(|c| c != class);
        if on {
            self.classes.push(class.into());
        }
    }

    fn set_button_active(&mut self, class: &str, active: bool) {
        self.active_buttons.retain(|c| c != class);
        if active && self.buttons.iter().any(|b| b.class == class) {
            self.active_buttons.push(class.into());
        }
    }

    fn clear_active_buttons(&mut self) {
        self.active_buttons.clear();
    }

    fn size(&self) -> Size {
        self.size
    }

    fn show_panel(&mut self, submenu: Submenu) {
        self.panel = Some(submenu);
    }

    fn hide_panels(&mut self) {
        self.panel = None;
    }

    fn set_link_input(&mut self, text: &str) {
        self.link_input = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::set_cursor;

    /// `<div class="notebook"><p>hello</p><p>world</p></div>`
    fn two_paragraphs() -> (MemoryDocument, NodeId, NodeId, NodeId) {
        let mut doc = MemoryDocument::new();
        let editor = doc.append_element(&doc.root(), "div");
        doc.add_class(&editor, "notebook");
        let p1 = doc.append_element(&editor, "p");
        let hello = doc.append_text(&p1, "hello");
        let p2 = doc.append_element(&editor, "p");
        let world = doc.append_text(&p2, "world");
        (doc, editor, hello, world)
    }

    #[test]
    fn test_restore_save_round_trip() {
        let (mut doc, _, hello, world) = two_paragraphs();
        doc.select(Boundary::new(hello, 2), Boundary::new(world, 3));
        let saved = doc.save();

        doc.clear();
        assert!(doc.save().is_none());
        doc.restore(saved.as_ref());

        assert_eq!(doc.save(), saved);
        assert_eq!(doc.anchor_node(), Some(hello));
        assert_eq!(doc.focus_node(), Some(world));
    }

    #[test]
    fn test_restore_none_is_noop() {
        let (mut doc, _, hello, _) = two_paragraphs();
        doc.select_text(&hello);
        let before = doc.save();
        doc.restore(None);
        assert_eq!(doc.save(), before);
    }

    #[test]
    fn test_restore_detached_snapshot_is_noop() {
        let (mut doc, editor, hello, _) = two_paragraphs();
        doc.select_text(&hello);
        let stale = doc.save();
        doc.clear_children(&editor);
        doc.clear();

        doc.restore(stale.as_ref());
        assert!(doc.save().is_none());
    }

    #[test]
    fn test_plain_text_across_paragraphs() {
        let (mut doc, _, hello, world) = two_paragraphs();
        doc.select(Boundary::new(hello, 3), Boundary::new(world, 2));
        assert_eq!(doc.plain_text(), "lowo");

        // Backwards selections read the same text.
        doc.select(Boundary::new(world, 2), Boundary::new(hello, 3));
        assert_eq!(doc.plain_text(), "lowo");

        doc.select(Boundary::new(hello, 1), Boundary::new(hello, 1));
        assert_eq!(doc.plain_text(), "");
    }

    #[test]
    fn test_common_ancestor() {
        let (mut doc, editor, hello, world) = two_paragraphs();
        doc.select(Boundary::new(hello, 0), Boundary::new(world, 1));
        let snapshot = doc.save().unwrap();
        assert_eq!(doc.common_ancestor(&snapshot), Some(editor));
    }

    #[test]
    fn test_set_cursor_clamps_offset() {
        let (mut doc, editor, _, _) = two_paragraphs();
        let p2 = doc.last_child(&editor).unwrap();
        let world = doc.last_child(&p2).unwrap();

        set_cursor(&mut doc, &p2, Some(99), None);
        assert_eq!(doc.save(), Some(SelectionSnapshot::caret(world, 5)));

        set_cursor(&mut doc, &p2, None, None);
        assert_eq!(doc.save(), Some(SelectionSnapshot::caret(world, 5)));

        set_cursor(&mut doc, &editor, Some(0), Some(&p2));
        assert_eq!(doc.save(), Some(SelectionSnapshot::caret(editor, 2)));
    }

    #[test]
    fn test_set_cursor_in_empty_container() {
        let mut doc = MemoryDocument::new();
        let p = doc.append_element(&doc.root(), "p");
        set_cursor(&mut doc, &p, Some(3), None);
        assert_eq!(doc.save(), Some(SelectionSnapshot::caret(p, 0)));
    }

    #[test]
    fn test_unwrap_element_keeps_text() {
        let mut doc = MemoryDocument::new();
        let p = doc.append_element(&doc.root(), "p");
        doc.append_text(&p, "see ");
        let a = doc.append_element(&p, "a");
        doc.set_attribute(&a, "href", "http://example.com");
        doc.append_text(&a, "here");
        doc.append_text(&p, "!");

        doc.unwrap_element(&a);
        assert_eq!(doc.inner_html(&p), "see here!");
        assert!(!doc.is_attached(&a));
    }

    #[test]
    fn test_inner_html() {
        let mut doc = MemoryDocument::new();
        let p = doc.append_element(&doc.root(), "p");
        doc.add_class(&p, "placeholder");
        let font = doc.append_element(&p, "font");
        doc.set_style(&font, "font-size", "14px");
        doc.append_text(&font, "x");
        assert_eq!(
            doc.inner_html(&doc.root()),
            r#"<p class="placeholder"><font style="font-size: 14px;">x</font></p>"#
        );
    }

    #[test]
    fn test_paste_needs_capture_focus() {
        let mut doc = MemoryDocument::new();
        doc.paste("ignored");
        assert_eq!(doc.take_captured_text(), None);

        doc.focus_capture_area();
        doc.paste("a\nb");
        assert_eq!(doc.take_captured_text().as_deref(), Some("a\nb"));
        assert!(!doc.capture_focused());
    }

    #[test]
    fn test_toolbar_render_requires_prepare() {
        let mut toolbar = MemoryToolbar::default();
        assert!(toolbar.render_buttons(&[]).is_err());
        toolbar.prepare().unwrap();
        assert!(toolbar.render_buttons(&[]).is_ok());
        assert_eq!(toolbar.prepare_count(), 1);
    }
}
