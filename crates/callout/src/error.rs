//! Directive processing errors.

use callout_mdast::TreeError;

/// Error raised while processing directives.
///
/// Any error aborts the whole transform before the document is mutated.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DirectiveError {
    /// A `:::message` directive carried an option other than `alert`.
    #[error(
        "{}invalid option \"{option}\" for :::{name} directive (expected \"alert\" or no option)",
        line_prefix(.line)
    )]
    InvalidOption {
        name: String,
        option: String,
        /// 1-based source line of the start marker, when known.
        line: Option<usize>,
    },
    /// Splicing markup into the tree failed.
    #[error("failed to rewrite document tree: {0}")]
    Tree(#[from] TreeError),
}

impl DirectiveError {
    /// Source line the error points at, if known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidOption { line, .. } => *line,
            Self::Tree(_) => None,
        }
    }

    /// Attach a source line to the error.
    #[must_use]
    pub(crate) fn at_line(mut self, source_line: Option<usize>) -> Self {
        if let Self::InvalidOption { line, .. } = &mut self {
            *line = source_line;
        }
        self
    }
}

/// `"line N: "` when a line is known, otherwise empty.
#[allow(clippy::ref_option)]
pub(crate) fn line_prefix(line: &Option<usize>) -> String {
    line.map(|line| format!("line {line}: "))
        .unwrap_or_default()
}
