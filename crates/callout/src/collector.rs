//! Marker collection over a document's text nodes.

use callout_mdast::Document;

use crate::marker::{Marker, classify};
use crate::stack::{Directive, DirectiveStack, Location};

/// Outcome of a collection pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Collected {
    /// Matched pairs in the order their end marker was found, so inner
    /// directives precede the directives enclosing them.
    pub directives: Vec<Directive>,
    /// End markers that closed nothing.
    pub stray_ends: Vec<Location>,
    /// Start markers rejected by the nesting rule.
    pub rejected_starts: Vec<Location>,
}

/// Walk every text node in document order and pair start/end markers.
///
/// Lines are obtained by splitting each text value on `\n`. The document is
/// not modified. Directives still open when the walk finishes remain on
/// `stack`.
pub fn collect(doc: &Document, stack: &mut DirectiveStack) -> Collected {
    let mut collected = Collected::default();

    for node in doc.text_nodes() {
        let Some(text) = doc.text(node) else {
            continue;
        };

        for (line, content) in text.split('\n').enumerate() {
            let at = Location::new(node, line);
            match classify(content) {
                Some(Marker::End { level }) => match stack.close(level, at) {
                    Some(directive) => collected.directives.push(directive),
                    None => collected.stray_ends.push(at),
                },
                Some(Marker::Start {
                    level,
                    name,
                    option,
                }) => {
                    if !stack.open(level, name, option, at) {
                        collected.rejected_starts.push(at);
                    }
                }
                None => {}
            }
        }
    }

    collected
}
