//! [`Document`] to markdown serialization.
//!
//! Text and raw markup are written verbatim: no escaping, no reflow. This keeps
//! content that was never touched by a transform byte-identical, at the cost of
//! not re-escaping characters pulldown-cmark unescaped while parsing.

use std::fmt::Write;

use crate::tree::{Document, NodeId, NodeKind};

/// Serialize a document to markdown.
///
/// Blocks are separated by one blank line and the output ends with a single
/// newline. An empty document serializes to an empty string.
///
/// # Example
///
/// ```
/// use callout_mdast::{parse, to_markdown};
///
/// let doc = parse("# Title\n\nSome *emphasis* here.");
/// assert_eq!(to_markdown(&doc), "# Title\n\nSome *emphasis* here.\n");
/// ```
#[must_use]
pub fn to_markdown(doc: &Document) -> String {
    let mut out = serialize_blocks(doc, doc.children(doc.root()), "\n\n", false);
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Serialize a sequence of sibling nodes as blocks.
///
/// With `group_inline`, runs of inline siblings (as found in tight list items)
/// form one block.
fn serialize_blocks(
    doc: &Document,
    children: &[NodeId],
    separator: &str,
    group_inline: bool,
) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut inline_run: Vec<NodeId> = Vec::new();

    for &child in children {
        if group_inline && doc.kind(child).is_inline() {
            inline_run.push(child);
            continue;
        }
        if !inline_run.is_empty() {
            blocks.push(serialize_inlines(doc, &inline_run));
            inline_run.clear();
        }
        blocks.push(serialize_block(doc, child));
    }
    if !inline_run.is_empty() {
        blocks.push(serialize_inlines(doc, &inline_run));
    }

    blocks.join(separator)
}

fn serialize_block(doc: &Document, id: NodeId) -> String {
    match doc.kind(id) {
        NodeKind::Root => serialize_blocks(doc, doc.children(id), "\n\n", false),
        NodeKind::Paragraph => serialize_inlines(doc, doc.children(id)),
        NodeKind::Heading { level } => {
            let marker = "#".repeat(usize::from(*level));
            let content = serialize_inlines(doc, doc.children(id));
            if content.is_empty() {
                marker
            } else {
                format!("{marker} {content}")
            }
        }
        NodeKind::BlockQuote => {
            let content = serialize_blocks(doc, doc.children(id), "\n\n", false);
            prefix_lines(&content, "> ", ">")
        }
        NodeKind::List { start } => serialize_list(doc, id, *start),
        NodeKind::ListItem { .. } => serialize_item(doc, id, "- "),
        NodeKind::Code { info, value } => serialize_code(info.as_deref(), value),
        NodeKind::ThematicBreak => "***".to_owned(),
        _ => serialize_inline(doc, id),
    }
}

fn serialize_list(doc: &Document, id: NodeId, start: Option<u64>) -> String {
    let items = doc.children(id);
    let loose = items.iter().any(|&item| {
        doc.children(item)
            .iter()
            .any(|&child| matches!(doc.kind(child), NodeKind::Paragraph))
    });

    let mut number = start;
    let rendered: Vec<String> = items
        .iter()
        .map(|&item| {
            let marker = match number {
                Some(n) => {
                    number = Some(n + 1);
                    format!("{n}. ")
                }
                None => "- ".to_owned(),
            };
            serialize_item(doc, item, &marker)
        })
        .collect();

    rendered.join(if loose { "\n\n" } else { "\n" })
}

fn serialize_item(doc: &Document, id: NodeId, marker: &str) -> String {
    let children = doc.children(id);
    let loose = children
        .iter()
        .any(|&child| matches!(doc.kind(child), NodeKind::Paragraph));

    let mut content = String::new();
    if let NodeKind::ListItem {
        checked: Some(checked),
    } = doc.kind(id)
    {
        content.push_str(if *checked { "[x] " } else { "[ ] " });
    }
    content.push_str(&serialize_blocks(
        doc,
        children,
        if loose { "\n\n" } else { "\n" },
        true,
    ));

    let indent = " ".repeat(marker.len());
    let mut out = String::with_capacity(content.len() + marker.len());
    for (i, line) in content.split('\n').enumerate() {
        if i == 0 {
            out.push_str(marker.trim_end());
            if !line.is_empty() {
                out.push(' ');
                out.push_str(line);
            }
        } else {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&indent);
                out.push_str(line);
            }
        }
    }
    out
}

fn serialize_code(info: Option<&str>, value: &str) -> String {
    let fence = "`".repeat(longest_run(value, '`').max(2) + 1);
    let mut out = format!("{fence}{}\n{value}", info.unwrap_or_default());
    if !value.is_empty() && !value.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&fence);
    out
}

fn serialize_inlines(doc: &Document, ids: &[NodeId]) -> String {
    ids.iter().map(|&id| serialize_inline(doc, id)).collect()
}

fn serialize_inline(doc: &Document, id: NodeId) -> String {
    let children = || serialize_inlines(doc, doc.children(id));
    match doc.kind(id) {
        NodeKind::Text(value) | NodeKind::Html(value) => value.clone(),
        NodeKind::SoftBreak => "\n".to_owned(),
        NodeKind::Break => "\\\n".to_owned(),
        NodeKind::InlineCode(value) => {
            let fence = "`".repeat(longest_run(value, '`') + 1);
            let pad = if value.starts_with('`') || value.ends_with('`') {
                " "
            } else {
                ""
            };
            format!("{fence}{pad}{value}{pad}{fence}")
        }
        NodeKind::Emphasis => format!("*{}*", children()),
        NodeKind::Strong => format!("**{}**", children()),
        NodeKind::Strikethrough => format!("~~{}~~", children()),
        NodeKind::Link {
            url,
            title,
            autolink,
        } => {
            if *autolink {
                format!("<{url}>")
            } else {
                let mut out = format!("[{}]({url}", children());
                write_title(&mut out, title);
                out.push(')');
                out
            }
        }
        NodeKind::Image { url, title, alt } => {
            let mut out = format!("![{alt}]({url}");
            write_title(&mut out, title);
            out.push(')');
            out
        }
        _ => serialize_block(doc, id),
    }
}

fn write_title(out: &mut String, title: &str) {
    if !title.is_empty() {
        // Writing to a `String` cannot fail.
        let _ = write!(out, " \"{}\"", title.replace('"', "\\\""));
    }
}

/// Prefix every line, using `empty_prefix` for blank lines.
fn prefix_lines(content: &str, prefix: &str, empty_prefix: &str) -> String {
    content
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                empty_prefix.to_owned()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Length of the longest run of `ch` in `text`.
fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
