//! Open-directive tracking.
//!
//! The stack is an explicit value threaded through traversal by the caller,
//! so separate runs never share state.

use callout_mdast::NodeId;

/// Line within a text node's value, split on `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub node: NodeId,
    /// Zero-based index of the line within the node's value.
    pub line: usize,
}

impl Location {
    #[must_use]
    pub fn new(node: NodeId, line: usize) -> Self {
        Self { node, line }
    }
}

/// Directive whose start marker has not been closed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDirective {
    pub name: String,
    pub option: Option<String>,
    /// Colon count of the start marker.
    pub level: usize,
    pub start: Location,
}

/// Matched start/end marker pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub option: Option<String>,
    pub level: usize,
    pub start: Location,
    pub end: Location,
}

/// LIFO stack of open directives.
#[derive(Debug, Default)]
pub struct DirectiveStack {
    entries: Vec<OpenDirective>,
}

impl DirectiveStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a start marker.
    ///
    /// A start nests only inside a directive of equal or higher level. When
    /// the top of the stack has fewer colons the marker is rejected and
    /// `false` is returned; the line then stays ordinary content.
    pub fn open(&mut self, level: usize, name: &str, option: Option<&str>, at: Location) -> bool {
        if self.entries.last().is_some_and(|top| top.level < level) {
            return false;
        }
        self.entries.push(OpenDirective {
            name: name.to_owned(),
            option: option.map(str::to_owned),
            level,
            start: at,
        });
        true
    }

    /// Close the top directive if its level equals `level`.
    ///
    /// Returns `None` for an end marker that matches nothing; such a marker
    /// is inert and the stack is left untouched.
    pub fn close(&mut self, level: usize, at: Location) -> Option<Directive> {
        if self.entries.last()?.level != level {
            return None;
        }
        let open = self.entries.pop()?;
        Some(Directive {
            name: open.name,
            option: open.option,
            level: open.level,
            start: open.start,
            end: at,
        })
    }

    /// Directive at the top of the stack.
    #[must_use]
    pub fn top(&self) -> Option<&OpenDirective> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the stack, returning directives that were never closed,
    /// outermost first.
    #[must_use]
    pub fn into_unterminated(self) -> Vec<OpenDirective> {
        self.entries
    }
}
