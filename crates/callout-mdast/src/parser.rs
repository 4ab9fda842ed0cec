//! Markdown to [`Document`] conversion.
//!
//! Builds the tree from pulldown-cmark events. Consecutive text events and
//! soft breaks are folded into a single multi-line `Text` node so each run of
//! prose is one text-bearing node. Text values are taken from the source, so
//! backslash escapes and entities are kept as written.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};

use crate::tree::{Document, NodeId, NodeKind, Position};

/// Parser options used by [`parse`].
#[must_use]
pub fn default_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Parse markdown into a document tree.
///
/// # Example
///
/// ```
/// use callout_mdast::{parse, NodeKind};
///
/// let doc = parse("Hello\nworld");
/// let texts = doc.text_nodes();
/// assert_eq!(doc.text(texts[0]), Some("Hello\nworld"));
/// ```
#[must_use]
pub fn parse(markdown: &str) -> Document {
    parse_with_options(markdown, default_options())
}

/// Parse markdown with explicit pulldown-cmark options.
///
/// Extensions without a tree representation (tables, footnotes, definition
/// lists, metadata blocks) are transparent: their text is kept, their
/// structure is not.
#[must_use]
pub fn parse_with_options(markdown: &str, options: Options) -> Document {
    let mut builder = TreeBuilder::new(markdown);
    for (event, range) in Parser::new_ext(markdown, options).into_offset_iter() {
        builder.event(event, range);
    }
    builder.doc
}

/// Maps byte offsets to line/column positions.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn position(&self, offset: usize) -> Position {
        let line = self.starts.partition_point(|&start| start <= offset).max(1);
        Position::new(line, offset - self.starts[line - 1] + 1)
    }
}

struct TreeBuilder<'a> {
    source: &'a str,
    doc: Document,
    stack: Vec<NodeId>,
    lines: LineIndex,
    /// Code block, HTML block or image currently collecting raw text.
    leaf: Option<NodeId>,
    /// Images nested inside the open image leaf.
    nested_images: usize,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str) -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            source,
            doc,
            stack: vec![root],
            lines: LineIndex::new(source),
            leaf: None,
            nested_images: 0,
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        let position = self.lines.position(range.start);
        match event {
            Event::Start(tag) => self.start_tag(tag, position),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                if self.in_code_block() {
                    self.push_leaf_text(&text);
                } else {
                    let raw = source_text(self.source, &range).unwrap_or(&*text);
                    self.text(raw, position);
                }
            }
            Event::SoftBreak => self.text("\n", position),
            Event::Code(code) => {
                if self.leaf.is_some() {
                    self.push_leaf_text(&code);
                } else {
                    self.append_inline(NodeKind::InlineCode(code.into_string()), position);
                }
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                if self.leaf.is_some() {
                    self.push_leaf_text(&html);
                } else {
                    self.append_inline(NodeKind::Html(html.into_string()), position);
                }
            }
            Event::HardBreak => {
                if self.leaf.is_some() {
                    self.push_leaf_text(" ");
                } else {
                    self.append_inline(NodeKind::Break, position);
                }
            }
            Event::Rule => self.append_inline(NodeKind::ThematicBreak, position),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(text) | Event::InlineMath(text) | Event::DisplayMath(text) => {
                self.text(&text, position);
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>, position: Position) {
        if self.leaf.is_some() {
            if matches!(tag, Tag::Image { .. }) {
                self.nested_images += 1;
            }
            return;
        }

        let kind = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading {
                level: heading_level_to_num(level),
            },
            Tag::BlockQuote(_) => NodeKind::BlockQuote,
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) if !info.is_empty() => Some(info.into_string()),
                    _ => None,
                };
                self.open_leaf(
                    NodeKind::Code {
                        info,
                        value: String::new(),
                    },
                    position,
                );
                return;
            }
            Tag::HtmlBlock => {
                self.open_leaf(NodeKind::Html(String::new()), position);
                return;
            }
            Tag::List(start) => NodeKind::List { start },
            Tag::Item => NodeKind::ListItem { checked: None },
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => NodeKind::Link {
                url: dest_url.into_string(),
                title: title.into_string(),
                autolink: matches!(link_type, LinkType::Autolink | LinkType::Email),
            },
            Tag::Image {
                dest_url, title, ..
            } => {
                self.open_leaf(
                    NodeKind::Image {
                        url: dest_url.into_string(),
                        title: title.into_string(),
                        alt: String::new(),
                    },
                    position,
                );
                return;
            }
            Tag::FootnoteDefinition(_)
            | Tag::Table(_)
            | Tag::TableHead
            | Tag::TableRow
            | Tag::TableCell
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript
            | Tag::MetadataBlock(_) => return,
        };

        let id = self
            .doc
            .append_with_position(self.current(), kind, Some(position));
        self.stack.push(id);
    }

    fn end_tag(&mut self, tag: TagEnd) {
        if self.leaf.is_some() {
            match tag {
                TagEnd::Image if self.nested_images > 0 => self.nested_images -= 1,
                TagEnd::Image | TagEnd::CodeBlock | TagEnd::HtmlBlock => self.close_leaf(),
                _ => {}
            }
            return;
        }

        match tag {
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link => {
                self.stack.pop();
            }
            _ => {}
        }
    }

    fn open_leaf(&mut self, kind: NodeKind, position: Position) {
        let id = self
            .doc
            .append_with_position(self.current(), kind, Some(position));
        self.leaf = Some(id);
        self.nested_images = 0;
    }

    fn close_leaf(&mut self) {
        if let Some(id) = self.leaf.take()
            && let NodeKind::Html(value) = self.doc.kind_mut(id)
        {
            let trimmed = value.trim_end_matches('\n').len();
            value.truncate(trimmed);
        }
    }

    fn in_code_block(&self) -> bool {
        self.leaf
            .is_some_and(|id| matches!(self.doc.kind(id), NodeKind::Code { .. }))
    }

    fn push_leaf_text(&mut self, text: &str) {
        let Some(id) = self.leaf else {
            return;
        };
        match self.doc.kind_mut(id) {
            NodeKind::Code { value, .. } | NodeKind::Html(value) => value.push_str(text),
            NodeKind::Image { alt, .. } => alt.push_str(text),
            _ => {}
        }
    }

    fn text(&mut self, text: &str, position: Position) {
        if self.leaf.is_some() {
            self.push_leaf_text(text);
            return;
        }

        let parent = self.current();
        let last = self.doc.children(parent).last().copied();
        if let Some(last) = last
            && let NodeKind::Text(value) = self.doc.kind_mut(last)
        {
            value.push_str(text);
            return;
        }

        self.doc.append_with_position(
            parent,
            NodeKind::Text(text.to_owned()),
            Some(position),
        );
    }

    fn append_inline(&mut self, kind: NodeKind, position: Position) {
        self.doc
            .append_with_position(self.current(), kind, Some(position));
    }

    fn task_list_marker(&mut self, value: bool) {
        let item = self
            .stack
            .iter()
            .rev()
            .copied()
            .find(|&id| matches!(self.doc.kind(id), NodeKind::ListItem { .. }));
        if let Some(item) = item
            && let NodeKind::ListItem { checked } = self.doc.kind_mut(item)
        {
            *checked = Some(value);
        }
    }
}

/// Source slice of a text event, including the backslash of an escape that
/// pulldown-cmark leaves out of the range.
///
/// Text keeps its escapes and entities so that serializing it verbatim
/// reproduces the input.
fn source_text<'s>(source: &'s str, range: &Range<usize>) -> Option<&'s str> {
    let raw = source.get(range.clone())?;
    let backslashes = source
        .get(..range.start)?
        .bytes()
        .rev()
        .take_while(|&b| b == b'\\')
        .count();
    let escaped =
        backslashes % 2 == 1 && raw.bytes().next().is_some_and(|b| b.is_ascii_punctuation());
    if escaped {
        source.get(range.start - 1..range.end)
    } else {
        Some(raw)
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(doc: &Document) -> Vec<&str> {
        doc.text_nodes()
            .into_iter()
            .filter_map(|id| doc.text(id))
            .collect()
    }

    #[test]
    fn test_paragraph_lines_fold_into_one_text_node() {
        let doc = parse(":::message\nWarning\n:::");

        let paragraph = doc.children(doc.root())[0];
        assert_eq!(doc.kind(paragraph), &NodeKind::Paragraph);
        assert_eq!(doc.children(paragraph).len(), 1);
        assert_eq!(texts(&doc), vec![":::message\nWarning\n:::"]);
    }

    #[test]
    fn test_separate_paragraphs_are_separate_text_nodes() {
        let doc = parse(":::details Title\n\nBody\n\n:::");
        assert_eq!(texts(&doc), vec![":::details Title", "Body", ":::"]);
        assert_eq!(doc.children(doc.root()).len(), 3);
    }

    #[test]
    fn test_inline_markup_splits_text_nodes() {
        let doc = parse("before [link](https://example.com) after");
        let paragraph = doc.children(doc.root())[0];
        let kinds: Vec<&NodeKind> = doc
            .children(paragraph)
            .iter()
            .map(|&id| doc.kind(id))
            .collect();

        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[1], NodeKind::Link { url, .. } if url == "https://example.com"));
        assert_eq!(texts(&doc), vec!["before ", "link", " after"]);
    }

    #[test]
    fn test_text_keeps_escapes_and_entities() {
        let doc = parse("a \\*b\\* &lt;script&gt; &amp; \\\\");
        assert_eq!(texts(&doc), vec!["a \\*b\\* &lt;script&gt; &amp; \\\\"]);
    }

    #[test]
    fn test_escaped_marker_line_stays_escaped() {
        let doc = parse("\\:::message\nX");
        assert_eq!(texts(&doc), vec!["\\:::message\nX"]);
    }

    #[test]
    fn test_source_text_adds_escape_backslash() {
        let source = "x \\* y";
        assert_eq!(source_text(source, &(3..6)), Some("\\* y"));
        assert_eq!(source_text(source, &(0..2)), Some("x "));
    }

    #[test]
    fn test_source_text_ignores_escaped_backslash() {
        // `\\` is an escaped backslash, so the `*` after it is not escaped.
        let source = "\\\\*";
        assert_eq!(source_text(source, &(2..3)), Some("*"));
        assert_eq!(source_text(source, &(1..2)), Some("\\\\"));
    }

    #[test]
    fn test_heading_level() {
        let doc = parse("### Title");
        let heading = doc.children(doc.root())[0];
        assert_eq!(doc.kind(heading), &NodeKind::Heading { level: 3 });
    }

    #[test]
    fn test_code_block_collects_value() {
        let doc = parse("```rust\nfn main() {}\n```");
        let code = doc.children(doc.root())[0];
        assert_eq!(
            doc.kind(code),
            &NodeKind::Code {
                info: Some("rust".to_owned()),
                value: "fn main() {}\n".to_owned(),
            }
        );
        assert!(doc.text_nodes().is_empty());
    }

    #[test]
    fn test_html_block_trims_trailing_newline() {
        let doc = parse("<div>\nhi\n</div>\n");
        let html = doc.children(doc.root())[0];
        assert_eq!(doc.kind(html), &NodeKind::Html("<div>\nhi\n</div>".to_owned()));
    }

    #[test]
    fn test_image_alt_is_collected() {
        let doc = parse("![a *b* c](img.png \"T\")");
        let paragraph = doc.children(doc.root())[0];
        let image = doc.children(paragraph)[0];
        assert_eq!(
            doc.kind(image),
            &NodeKind::Image {
                url: "img.png".to_owned(),
                title: "T".to_owned(),
                alt: "a b c".to_owned(),
            }
        );
    }

    #[test]
    fn test_task_list_marker() {
        let doc = parse("- [x] done\n- [ ] todo");
        let list = doc.children(doc.root())[0];
        let items: Vec<&NodeKind> = doc.children(list).iter().map(|&id| doc.kind(id)).collect();
        assert_eq!(
            items,
            vec![
                &NodeKind::ListItem { checked: Some(true) },
                &NodeKind::ListItem { checked: Some(false) },
            ]
        );
    }

    #[test]
    fn test_positions() {
        let doc = parse("first\n\n  second");
        let nodes = doc.text_nodes();
        assert_eq!(doc.position(nodes[0]), Some(Position::new(1, 1)));
        assert_eq!(doc.position(nodes[1]), Some(Position::new(3, 3)));
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("ab\ncd\n");
        assert_eq!(index.position(0), Position::new(1, 1));
        assert_eq!(index.position(1), Position::new(1, 2));
        assert_eq!(index.position(3), Position::new(2, 1));
        assert_eq!(index.position(6), Position::new(3, 1));
    }
}
