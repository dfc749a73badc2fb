//! Selection capture and restore.
//!
//! `SelectionStore` exposes one abstraction over whatever selection API the
//! platform offers. Snapshots are opaque to callers: they are taken before
//! focus moves into toolbar UI and restored once when a command is dispatched.

use crate::tree::{DocumentTree, NodeKind};

/// One end of a selection range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary<N> {
    pub node: N,
    /// Character offset for text nodes, child index for elements.
    pub offset: usize,
}

impl<N> Boundary<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Range-based snapshot used by `MemoryDocument` and the browser's modern
/// selection API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot<N> {
    /// Where the selection started.
    pub anchor: Boundary<N>,
    /// Where the selection currently ends.
    pub focus: Boundary<N>,
}

impl<N: PartialEq + Clone> SelectionSnapshot<N> {
    pub fn new(anchor: Boundary<N>, focus: Boundary<N>) -> Self {
        Self { anchor, focus }
    }

    /// A collapsed cursor.
    pub fn caret(node: N, offset: usize) -> Self {
        Self {
            anchor: Boundary::new(node.clone(), offset),
            focus: Boundary::new(node, offset),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Where to place a collapsed cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorTarget<N> {
    /// At an offset inside a node.
    Within { node: N, offset: usize },
    /// Immediately after a node, in its parent.
    After(N),
}

/// Capture, restore and query the live selection.
pub trait SelectionStore: DocumentTree {
    /// Opaque, restorable capture of a selection.
    type Snapshot: Clone + std::fmt::Debug;

    /// Capture the current selection, or `None` if the document has none.
    fn save(&self) -> Option<Self::Snapshot>;

    /// Re-establish a captured selection. `None` is a no-op, and so is a
    /// snapshot whose anchor nodes have been removed from the document.
    fn restore(&mut self, snapshot: Option<&Self::Snapshot>);

    /// Currently selected text, empty when collapsed or absent.
    fn plain_text(&self) -> String;

    /// Empty the platform selection.
    fn clear(&mut self);

    fn is_collapsed(&self, snapshot: &Self::Snapshot) -> bool;

    /// Deepest node containing the whole snapshot.
    fn common_ancestor(&self, snapshot: &Self::Snapshot) -> Option<Self::Node>;

    fn anchor_node(&self) -> Option<Self::Node>;

    fn focus_node(&self) -> Option<Self::Node>;

    /// Replace the selection with a collapsed cursor.
    fn place_cursor(&mut self, target: CursorTarget<Self::Node>);
}

/// Place a collapsed cursor inside `container`.
///
/// With `target`, the cursor goes immediately after it. Otherwise it goes into
/// the container's last child at `offset`, clamped to that child's length, or
/// at its end when no offset is given.
pub fn set_cursor<S: SelectionStore>(
    store: &mut S,
    container: &S::Node,
    offset: Option<usize>,
    target: Option<&S::Node>,
) {
    if let Some(target) = target {
        store.place_cursor(CursorTarget::After(target.clone()));
        return;
    }

    let Some(last) = store.last_child(container) else {
        store.place_cursor(CursorTarget::Within {
            node: container.clone(),
            offset: 0,
        });
        return;
    };

    let max = node_length(store, &last);
    let offset = offset.map_or(max, |o| o.min(max));
    store.place_cursor(CursorTarget::Within { node: last, offset });
}

/// Length of a node in selection-offset units.
pub fn node_length<T: DocumentTree>(tree: &T, node: &T::Node) -> usize {
    match tree.kind(node) {
        NodeKind::Text => tree.text_content(node).chars().count(),
        _ => tree.children(node).len(),
    }
}

/// Resolve which editor a selection belongs to.
///
/// Walks up from the snapshot's common ancestor until a node carrying
/// `editor_class` is found; gives up at the document root.
pub fn find_editor_root<S: SelectionStore>(
    store: &S,
    snapshot: &S::Snapshot,
    editor_class: &str,
) -> Option<S::Node> {
    let ancestor = store.common_ancestor(snapshot)?;
    let root = store.closest_with_class(&ancestor, editor_class);
    if root.is_none() {
        tracing::debug!(
            target: "notebook::selection",
            editor_class,
            "selection is not inside any editor"
        );
    }
    root
}
