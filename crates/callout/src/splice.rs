//! Markup insertion at marker lines.
//!
//! Each text node holding markers is replaced exactly once by a sequence of
//! `Text` segments and `Html` fragments. Every line break of the original
//! value becomes a `SoftBreak`, so content lines survive byte-for-byte and
//! each marker line is swapped for a fragment on its own line.

use std::collections::BTreeMap;

use callout_mdast::{Document, NodeId, NodeKind, TreeError};

use crate::markup::MarkupPair;
use crate::stack::Directive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Open,
    Close,
}

/// A marker line to be swapped for a fragment.
#[derive(Debug)]
struct Cut<'a> {
    line: usize,
    edge: Edge,
    /// Index of the owning directive.
    directive: usize,
    fragment: &'a str,
}

/// Replace every marker line of `planned` with its fragment.
///
/// Returns the number of text nodes rewritten.
pub(crate) fn splice(
    doc: &mut Document,
    planned: &[(Directive, MarkupPair)],
) -> Result<usize, TreeError> {
    let mut cuts: BTreeMap<NodeId, Vec<Cut<'_>>> = BTreeMap::new();
    for (index, (directive, markup)) in planned.iter().enumerate() {
        cuts.entry(directive.start.node).or_default().push(Cut {
            line: directive.start.line,
            edge: Edge::Open,
            directive: index,
            fragment: &markup.open,
        });
        cuts.entry(directive.end.node).or_default().push(Cut {
            line: directive.end.line,
            edge: Edge::Close,
            directive: index,
            fragment: &markup.close,
        });
    }

    let mut rewritten = 0;
    for (node, mut node_cuts) in cuts {
        node_cuts.sort_by_key(|cut| cut.line);
        let Some(text) = doc.text(node) else {
            continue;
        };
        let kinds = split_node(text, &node_cuts);
        doc.replace(node, kinds)?;
        rewritten += 1;
    }

    Ok(rewritten)
}

/// Split one text value at its cuts. `cuts` must be sorted by line.
fn split_node(text: &str, cuts: &[Cut<'_>]) -> Vec<NodeKind> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut kinds = Vec::with_capacity(cuts.len() * 4 + 1);
    let mut cursor = 0;
    let mut previous: Option<&Cut<'_>> = None;

    for cut in cuts {
        if cut.line > cursor {
            push_lines(&mut kinds, lines.get(cursor..cut.line).unwrap_or_default());
            kinds.push(NodeKind::SoftBreak);
        } else if previous.is_some_and(|prev| {
            prev.edge == Edge::Open && cut.edge == Edge::Close && prev.directive == cut.directive
        }) {
            // Empty interior of a directive opened in this node.
            kinds.push(NodeKind::Text(String::new()));
        }

        kinds.push(NodeKind::Html(cut.fragment.to_owned()));
        if cut.line + 1 < lines.len() {
            kinds.push(NodeKind::SoftBreak);
        }
        cursor = cut.line + 1;
        previous = Some(cut);
    }

    push_lines(&mut kinds, lines.get(cursor..).unwrap_or_default());
    kinds
}

/// Push `lines` as one `Text` node. A run that is a single empty line only
/// contributes the surrounding line breaks.
fn push_lines(kinds: &mut Vec<NodeKind>, lines: &[&str]) {
    let value = lines.join("\n");
    if !value.is_empty() {
        kinds.push(NodeKind::Text(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cut(line: usize, edge: Edge, directive: usize, fragment: &str) -> Cut<'_> {
        Cut {
            line,
            edge,
            directive,
            fragment,
        }
    }

    fn text(value: &str) -> NodeKind {
        NodeKind::Text(value.to_owned())
    }

    fn html(value: &str) -> NodeKind {
        NodeKind::Html(value.to_owned())
    }

    #[test]
    fn test_split_whole_directive() {
        let cuts = [cut(0, Edge::Open, 0, "<div>"), cut(2, Edge::Close, 0, "</div>")];
        assert_eq!(
            split_node(":::message\nWarning\n:::", &cuts),
            vec![
                html("<div>"),
                NodeKind::SoftBreak,
                text("Warning"),
                NodeKind::SoftBreak,
                html("</div>"),
            ]
        );
    }

    #[test]
    fn test_split_keeps_surrounding_text() {
        let cuts = [cut(1, Edge::Open, 0, "<div>"), cut(3, Edge::Close, 0, "</div>")];
        assert_eq!(
            split_node("Intro\n:::message\nBody\n:::\nOutro", &cuts),
            vec![
                text("Intro"),
                NodeKind::SoftBreak,
                html("<div>"),
                NodeKind::SoftBreak,
                text("Body"),
                NodeKind::SoftBreak,
                html("</div>"),
                NodeKind::SoftBreak,
                text("Outro"),
            ]
        );
    }

    #[test]
    fn test_split_empty_interior() {
        let cuts = [cut(0, Edge::Open, 0, "<div>"), cut(1, Edge::Close, 0, "</div>")];
        assert_eq!(
            split_node(":::message\n:::", &cuts),
            vec![
                html("<div>"),
                NodeKind::SoftBreak,
                text(""),
                html("</div>"),
            ]
        );
    }

    #[test]
    fn test_split_open_only() {
        let cuts = [cut(0, Edge::Open, 0, "<details>")];
        assert_eq!(
            split_node(":::details\nFirst", &cuts),
            vec![html("<details>"), NodeKind::SoftBreak, text("First")]
        );
    }

    #[test]
    fn test_split_close_only() {
        let cuts = [cut(0, Edge::Close, 0, "</details>")];
        assert_eq!(split_node(":::", &cuts), vec![html("</details>")]);
    }

    #[test]
    fn test_split_adjacent_fragments() {
        let cuts = [
            cut(0, Edge::Open, 1, "<details>"),
            cut(1, Edge::Open, 0, "<div>"),
            cut(3, Edge::Close, 0, "</div>"),
            cut(4, Edge::Close, 1, "</details>"),
        ];
        assert_eq!(
            split_node(":::::details\n::::message\nInner\n::::\n:::::", &cuts),
            vec![
                html("<details>"),
                NodeKind::SoftBreak,
                html("<div>"),
                NodeKind::SoftBreak,
                text("Inner"),
                NodeKind::SoftBreak,
                html("</div>"),
                NodeKind::SoftBreak,
                html("</details>"),
            ]
        );
    }

    #[test]
    fn test_split_keeps_break_after_leading_inline() {
        // Value of a text node that follows `**bold**` on the previous line.
        let cuts = [cut(1, Edge::Close, 0, "</div>")];
        assert_eq!(
            split_node("\n:::", &cuts),
            vec![NodeKind::SoftBreak, html("</div>")]
        );
    }

    #[test]
    fn test_split_keeps_break_before_trailing_inline() {
        // Value of a text node followed by `**bold**` on the next line.
        let cuts = [cut(0, Edge::Open, 0, "<div>")];
        assert_eq!(
            split_node(":::message\n", &cuts),
            vec![html("<div>"), NodeKind::SoftBreak]
        );
    }

    #[test]
    fn test_split_keeps_text_around_inline_boundaries() {
        let cuts = [cut(1, Edge::Open, 0, "<div>")];
        assert_eq!(
            split_node("\n:::message\nSee ", &cuts),
            vec![
                NodeKind::SoftBreak,
                html("<div>"),
                NodeKind::SoftBreak,
                text("See "),
            ]
        );
    }

    #[test]
    fn test_splice_replaces_node_once() {
        let mut doc = callout_mdast::parse(":::message\nHi\n:::");
        let node = doc.text_nodes()[0];
        let planned = vec![(
            Directive {
                name: "message".to_owned(),
                option: None,
                level: 3,
                start: crate::stack::Location::new(node, 0),
                end: crate::stack::Location::new(node, 2),
            },
            MarkupPair {
                open: "<div>".to_owned(),
                close: "</div>".to_owned(),
            },
        )];

        let rewritten = splice(&mut doc, &planned).unwrap();

        assert_eq!(rewritten, 1);
        assert_eq!(doc.parent(node), None);
        assert_eq!(callout_mdast::to_markdown(&doc), "<div>\nHi\n</div>\n");
    }
}
