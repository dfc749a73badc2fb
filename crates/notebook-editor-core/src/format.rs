//! Active-format detection for the current selection.

use crate::tree::{DocumentTree, MAX_ANCESTOR_DEPTH, NodeKind};

/// A structural tag whose presence above the selection marks a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Bold,
    Italic,
    Underline,
    Link,
    OrderedList,
    UnorderedList,
}

impl FormatTag {
    pub const ALL: [FormatTag; 6] = [
        FormatTag::Bold,
        FormatTag::Italic,
        FormatTag::Underline,
        FormatTag::Link,
        FormatTag::OrderedList,
        FormatTag::UnorderedList,
    ];

    /// Map a lowercase element tag to a format.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "b" => Some(FormatTag::Bold),
            "i" => Some(FormatTag::Italic),
            "u" => Some(FormatTag::Underline),
            "a" => Some(FormatTag::Link),
            "ol" => Some(FormatTag::OrderedList),
            "ul" => Some(FormatTag::UnorderedList),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            FormatTag::Bold => "b",
            FormatTag::Italic => "i",
            FormatTag::Underline => "u",
            FormatTag::Link => "a",
            FormatTag::OrderedList => "ol",
            FormatTag::UnorderedList => "ul",
        }
    }

    /// Class of the toolbar button highlighted for this format.
    pub fn button_class(self) -> &'static str {
        match self {
            FormatTag::Bold => "bold",
            FormatTag::Italic => "italic",
            FormatTag::Underline => "underline",
            FormatTag::Link => "anchor",
            FormatTag::OrderedList => "ol",
            FormatTag::UnorderedList => "ul",
        }
    }
}

/// Insertion-ordered set of formats.
///
/// Order is innermost first, as encountered during the walk. Consumers only
/// rely on membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSet {
    tags: Vec<FormatTag>,
}

impl FormatSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a format. Returns false if it was already present.
    pub fn insert(&mut self, tag: FormatTag) -> bool {
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn contains(&self, tag: FormatTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = FormatTag> + '_ {
        self.tags.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<FormatTag> for FormatSet {
    fn from_iter<I: IntoIterator<Item = FormatTag>>(iter: I) -> Self {
        let mut set = FormatSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

/// Collect the formats enclosing `focus`.
///
/// Walks upward from the focus node. Text nodes are passed through without
/// being recorded; recognized format elements are recorded; the walk stops at
/// the first node that is neither.
pub fn compute_active_formats<T: DocumentTree>(tree: &T, focus: Option<&T::Node>) -> FormatSet {
    let mut formats = FormatSet::new();
    let Some(mut current) = focus.cloned() else {
        return formats;
    };

    for _ in 0..MAX_ANCESTOR_DEPTH {
        match tree.kind(&current) {
            NodeKind::Text => {}
            NodeKind::Element(tag) => match FormatTag::from_tag(&tag) {
                Some(format) => {
                    formats.insert(format);
                }
                None => break,
            },
            NodeKind::Other => break,
        }
        match tree.parent(&current) {
            Some(parent) => current = parent,
            None => break,
        }
    }

    formats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;

    #[test]
    fn test_nested_bold_italic() {
        let mut doc = MemoryDocument::new();
        let editor = doc.append_element(&doc.root(), "div");
        doc.add_class(&editor, "notebook");
        let p = doc.append_element(&editor, "p");
        let i = doc.append_element(&p, "i");
        let b = doc.append_element(&i, "b");
        let text = doc.append_text(&b, "hello");

        let formats = compute_active_formats(&doc, Some(&text));
        assert_eq!(formats.len(), 2);
        assert!(formats.contains(FormatTag::Bold));
        assert!(formats.contains(FormatTag::Italic));
        assert!(!formats.contains(FormatTag::Underline));
    }

    #[test]
    fn test_innermost_first() {
        let mut doc = MemoryDocument::new();
        let p = doc.append_element(&doc.root(), "p");
        let ul = doc.append_element(&p, "ul");
        let a = doc.append_element(&ul, "a");
        let text = doc.append_text(&a, "link");

        let order: Vec<_> = compute_active_formats(&doc, Some(&text)).iter().collect();
        assert_eq!(order, vec![FormatTag::Link, FormatTag::UnorderedList]);
    }

    #[test]
    fn test_stops_at_first_unrecognized() {
        // The outer <b> is above a <span>, so it is never reached.
        let mut doc = MemoryDocument::new();
        let b = doc.append_element(&doc.root(), "b");
        let span = doc.append_element(&b, "span");
        let u = doc.append_element(&span, "u");
        let text = doc.append_text(&u, "x");

        let formats = compute_active_formats(&doc, Some(&text));
        assert!(formats.contains(FormatTag::Underline));
        assert!(!formats.contains(FormatTag::Bold));
    }

    #[test]
    fn test_focus_on_plain_paragraph() {
        let mut doc = MemoryDocument::new();
        let p = doc.append_element(&doc.root(), "p");
        let text = doc.append_text(&p, "plain");
        assert!(compute_active_formats(&doc, Some(&text)).is_empty());
        assert!(compute_active_formats(&doc, None).is_empty());
    }

    #[test]
    fn test_format_set_dedupes() {
        let set: FormatSet = [FormatTag::Bold, FormatTag::Bold, FormatTag::Italic]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_button_classes() {
        assert_eq!(FormatTag::Link.button_class(), "anchor");
        for tag in FormatTag::ALL {
            assert_eq!(FormatTag::from_tag(tag.tag()), Some(tag));
        }
    }
}
