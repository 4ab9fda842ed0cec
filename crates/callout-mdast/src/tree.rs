//! Arena-backed markdown syntax tree.
//!
//! Nodes live in a single `Vec` owned by [`Document`] and are addressed by
//! [`NodeId`] handles. Two nodes with identical content are still distinct
//! nodes, which lets tree edits target a node by identity.

use crate::error::TreeError;

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of the node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Source position of a node's first byte (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number.
    pub line: usize,
    /// Column number, counted in bytes.
    pub column: usize,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Kind and payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root.
    Root,
    /// Paragraph containing inline nodes.
    Paragraph,
    /// ATX or setext heading (`level` is 1-6).
    Heading { level: u8 },
    /// Block quote.
    BlockQuote,
    /// Bullet list (`start` is `None`) or ordered list.
    List { start: Option<u64> },
    /// List item, optionally a task item.
    ListItem { checked: Option<bool> },
    /// Fenced or indented code block.
    Code { info: Option<String>, value: String },
    /// Raw markup, emitted verbatim by serializers.
    Html(String),
    /// Thematic break (`***`).
    ThematicBreak,
    /// Literal text, possibly spanning several lines.
    Text(String),
    /// Line ending between inline siblings.
    SoftBreak,
    /// Hard line break.
    Break,
    /// Inline code span.
    InlineCode(String),
    /// Emphasis.
    Emphasis,
    /// Strong emphasis.
    Strong,
    /// Strikethrough.
    Strikethrough,
    /// Link; `autolink` marks `<https://...>` style links.
    Link {
        url: String,
        title: String,
        autolink: bool,
    },
    /// Image with collected alt text.
    Image {
        url: String,
        title: String,
        alt: String,
    },
}

impl NodeKind {
    /// Whether this kind may appear inside a paragraph.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Self::Text(_)
                | Self::SoftBreak
                | Self::Break
                | Self::InlineCode(_)
                | Self::Emphasis
                | Self::Strong
                | Self::Strikethrough
                | Self::Link { .. }
                | Self::Image { .. }
                | Self::Html(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    position: Option<Position>,
}

/// Markdown document tree.
///
/// # Example
///
/// ```
/// use callout_mdast::{Document, NodeKind};
///
/// let mut doc = Document::new();
/// let paragraph = doc.append(doc.root(), NodeKind::Paragraph);
/// let text = doc.append(paragraph, NodeKind::Text("Hello".to_owned()));
///
/// assert_eq!(doc.text(text), Some("Hello"));
/// assert_eq!(doc.text_nodes(), vec![text]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
                position: Some(Position::new(1, 1)),
            }],
        }
    }

    /// Root node handle.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Kind of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this document.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    /// Children of a node, in document order.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this document.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Parent of a node, `None` for the root, detached nodes and handles
    /// from another document.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    /// Source position of a node, if known.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.nodes.get(id.0)?.position
    }

    /// Text content of a `Text` node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Append a new child to `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        self.append_with_position(parent, kind, None)
    }

    /// Append a new child to `parent`, recording its source position.
    pub fn append_with_position(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        position: Option<Position>,
    ) -> NodeId {
        let id = self.alloc(kind, Some(parent), position);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>, position: Option<Position>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
            position,
        });
        id
    }

    /// Current index of a node in its parent's child list.
    ///
    /// Looked up on every call, so the result reflects earlier edits.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.nodes.get(id.0)?.parent?;
        self.nodes[parent.0].children.iter().position(|&c| c == id)
    }

    /// Nodes under `id` (inclusive) in depth-first document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![id],
        }
    }

    /// Every attached `Text` node, in document order.
    #[must_use]
    pub fn text_nodes(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&id| matches!(self.kind(id), NodeKind::Text(_)))
            .collect()
    }

    /// Replace `target` with freshly allocated nodes of the given kinds.
    ///
    /// The new nodes take the target's place in its parent's current child
    /// list and inherit its source position. The target is detached: it stays
    /// in the arena but is no longer reachable from the root.
    ///
    /// Returns the handles of the inserted nodes.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `target` does not belong to this
    /// document, or [`TreeError::Detached`] if it has no parent.
    pub fn replace(
        &mut self,
        target: NodeId,
        kinds: Vec<NodeKind>,
    ) -> Result<Vec<NodeId>, TreeError> {
        let node = self.nodes.get(target.0).ok_or(TreeError::UnknownNode(target))?;
        let parent = node.parent.ok_or(TreeError::Detached(target))?;
        let position = node.position;
        let index = self
            .index_in_parent(target)
            .ok_or(TreeError::Detached(target))?;

        let inserted: Vec<NodeId> = kinds
            .into_iter()
            .map(|kind| self.alloc(kind, Some(parent), position))
            .collect();

        self.nodes[parent.0]
            .children
            .splice(index..=index, inserted.iter().copied());
        self.nodes[target.0].parent = None;

        Ok(inserted)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> NodeKind {
        NodeKind::Text(value.to_owned())
    }

    #[test]
    fn test_new_document_has_root_only() {
        let doc = Document::new();
        assert_eq!(doc.kind(doc.root()), &NodeKind::Root);
        assert!(doc.children(doc.root()).is_empty());
        assert_eq!(doc.parent(doc.root()), None);
    }

    #[test]
    fn test_descendants_document_order() {
        let mut doc = Document::new();
        let p1 = doc.append(doc.root(), NodeKind::Paragraph);
        let a = doc.append(p1, text("a"));
        let em = doc.append(p1, NodeKind::Emphasis);
        let b = doc.append(em, text("b"));
        let p2 = doc.append(doc.root(), NodeKind::Paragraph);
        let c = doc.append(p2, text("c"));

        let order: Vec<NodeId> = doc.descendants(doc.root()).collect();
        assert_eq!(order, vec![doc.root(), p1, a, em, b, p2, c]);
        assert_eq!(doc.text_nodes(), vec![a, b, c]);
    }

    #[test]
    fn test_index_in_parent() {
        let mut doc = Document::new();
        let p = doc.append(doc.root(), NodeKind::Paragraph);
        let a = doc.append(p, text("a"));
        let b = doc.append(p, text("b"));

        assert_eq!(doc.index_in_parent(a), Some(0));
        assert_eq!(doc.index_in_parent(b), Some(1));
        assert_eq!(doc.index_in_parent(doc.root()), None);
    }

    #[test]
    fn test_replace_splices_at_live_index() {
        let mut doc = Document::new();
        let p = doc.append(doc.root(), NodeKind::Paragraph);
        let a = doc.append(p, text("a"));
        let b = doc.append(p, text("b"));

        // Growing the child list before `b` must not confuse the later edit.
        doc.replace(a, vec![text("a1"), text("a2"), text("a3")])
            .unwrap();
        let inserted = doc.replace(b, vec![text("b1")]).unwrap();

        let values: Vec<&str> = doc
            .children(p)
            .iter()
            .filter_map(|&id| doc.text(id))
            .collect();
        assert_eq!(values, vec!["a1", "a2", "a3", "b1"]);
        assert_eq!(doc.parent(inserted[0]), Some(p));
        assert_eq!(doc.parent(b), None);
    }

    #[test]
    fn test_replace_distinguishes_equal_nodes() {
        let mut doc = Document::new();
        let p = doc.append(doc.root(), NodeKind::Paragraph);
        let first = doc.append(p, text("same"));
        let second = doc.append(p, text("same"));

        doc.replace(second, vec![text("changed")]).unwrap();

        assert_eq!(doc.children(p)[0], first);
        assert_eq!(doc.text(doc.children(p)[1]), Some("changed"));
    }

    #[test]
    fn test_replace_inherits_position() {
        let mut doc = Document::new();
        let p = doc.append(doc.root(), NodeKind::Paragraph);
        let t = doc.append_with_position(p, text("x"), Some(Position::new(4, 1)));

        let inserted = doc.replace(t, vec![NodeKind::Html("<hr>".to_owned())]).unwrap();
        assert_eq!(doc.position(inserted[0]), Some(Position::new(4, 1)));
    }

    #[test]
    fn test_replace_detached_node_fails() {
        let mut doc = Document::new();
        let p = doc.append(doc.root(), NodeKind::Paragraph);
        let t = doc.append(p, text("x"));
        doc.replace(t, vec![]).unwrap();

        assert!(matches!(
            doc.replace(t, vec![text("y")]),
            Err(TreeError::Detached(id)) if id == t
        ));
        assert!(matches!(
            doc.replace(doc.root(), vec![]),
            Err(TreeError::Detached(_))
        ));
    }

    #[test]
    fn test_replace_unknown_node_fails() {
        let mut doc = Document::new();
        let foreign = NodeId(42);
        assert!(matches!(
            doc.replace(foreign, vec![]),
            Err(TreeError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_optional_accessors_reject_foreign_handle() {
        let doc = Document::new();
        let foreign = NodeId(7);
        assert_eq!(doc.parent(foreign), None);
        assert_eq!(doc.position(foreign), None);
        assert_eq!(doc.text(foreign), None);
        assert_eq!(doc.index_in_parent(foreign), None);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_kind_panics_on_foreign_handle() {
        let doc = Document::new();
        let _ = doc.kind(NodeId(7));
    }

    #[test]
    fn test_detached_nodes_are_not_traversed() {
        let mut doc = Document::new();
        let p = doc.append(doc.root(), NodeKind::Paragraph);
        let t = doc.append(p, text("old"));
        let inserted = doc.replace(t, vec![text("new")]).unwrap();

        assert_eq!(doc.text_nodes(), inserted);
    }
}
