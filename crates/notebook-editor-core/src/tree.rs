//! Document tree abstraction.
//!
//! The `DocumentTree` trait is the interface between the formatting engine and
//! whatever holds the live document: the browser DOM, or `MemoryDocument` for
//! tests and headless use. Every ancestor walk in this crate is iterative and
//! bounded by `MAX_ANCESTOR_DEPTH`.

use smol_str::SmolStr;

/// Upper bound on any upward walk through the tree.
pub const MAX_ANCESTOR_DEPTH: usize = 512;

/// What kind of node a handle refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A text node.
    Text,
    /// An element, with its tag name in lowercase.
    Element(SmolStr),
    /// Comments, documents, fragments.
    Other,
}

impl NodeKind {
    /// The lowercase tag name, if this is an element.
    pub fn tag(&self) -> Option<&str> {
        match self {
            NodeKind::Element(tag) => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text)
    }

    /// Whether this is an element with the given (lowercase) tag.
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag() == Some(tag)
    }
}

/// Navigation and mutation over a live document.
///
/// Node handles are cheap to clone and compare by identity.
pub trait DocumentTree {
    type Node: Clone + PartialEq + std::fmt::Debug;

    // === Navigation ===

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    fn kind(&self, node: &Self::Node) -> NodeKind;

    /// Concatenated text of the node and all its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Whether the node is still reachable from the document root.
    fn is_attached(&self, node: &Self::Node) -> bool;

    // === Attributes ===

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    fn add_class(&mut self, node: &Self::Node, class: &str);

    /// Set an inline style property (`font-size`, `transform`, ...).
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    // === Structure ===

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Replace all children of `node` with a single text node.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn remove(&mut self, node: &Self::Node);

    fn clear_children(&mut self, node: &Self::Node);

    /// Replace an element by its children, keeping their order.
    fn unwrap_element(&mut self, node: &Self::Node);

    /// All descendant elements of `root` with the given tag, in document order.
    fn descendants_with_tag(&self, root: &Self::Node, tag: &str) -> Vec<Self::Node>;

    // === Provided helpers ===

    fn last_child(&self, node: &Self::Node) -> Option<Self::Node> {
        self.children(node).pop()
    }

    fn tag_of(&self, node: &Self::Node) -> Option<SmolStr> {
        match self.kind(node) {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    /// Whether `node` is `ancestor` or sits somewhere beneath it.
    fn is_inside(&self, node: &Self::Node, ancestor: &Self::Node) -> bool {
        self.ancestors_inclusive(node).iter().any(|n| n == ancestor)
    }

    /// `node` followed by its ancestors up to the root, bounded.
    fn ancestors_inclusive(&self, node: &Self::Node) -> Vec<Self::Node> {
        let mut out = vec![node.clone()];
        let mut current = node.clone();
        while out.len() < MAX_ANCESTOR_DEPTH {
            match self.parent(&current) {
                Some(parent) => {
                    out.push(parent.clone());
                    current = parent;
                }
                None => break,
            }
        }
        out
    }

    /// Nearest inclusive ancestor element with the given tag.
    fn closest_tag(&self, node: &Self::Node, tag: &str) -> Option<Self::Node> {
        self.ancestors_inclusive(node)
            .into_iter()
            .find(|n| self.kind(n).is_tag(tag))
    }

    /// Nearest inclusive ancestor carrying the given class.
    ///
    /// Stops at the document root and returns `None` if nothing matches.
    fn closest_with_class(&self, node: &Self::Node, class: &str) -> Option<Self::Node> {
        self.ancestors_inclusive(node)
            .into_iter()
            .find(|n| self.has_class(n, class))
    }

    /// Whether the node's text is empty or whitespace only.
    fn is_blank(&self, node: &Self::Node) -> bool {
        self.text_content(node).trim().is_empty()
    }
}
