//! Directive processor.
//!
//! Runs the collection pass, resolves every matched directive to markup and
//! only then rewrites the tree. A fatal error leaves the document untouched.

use callout_mdast::Document;

use crate::collector::collect;
use crate::error::{DirectiveError, line_prefix};
use crate::markup::{DirectiveKind, MarkupConfig, MarkupEmitter};
use crate::splice::splice;
use crate::stack::{DirectiveStack, Location};

/// Summary of one processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    /// Directives replaced with markup.
    pub spliced: usize,
    /// Text nodes rewritten.
    pub rewritten_nodes: usize,
    /// Non-fatal diagnostics, ordered by source line.
    pub warnings: Vec<String>,
}

/// Rewrites `:::message` and `:::details` directives into HTML containers.
///
/// # Example
///
/// ```
/// use callout::DirectiveProcessor;
/// use callout_mdast::{parse, to_markdown};
///
/// let mut doc = parse(":::message alert\nCareful\n:::");
/// let result = DirectiveProcessor::new().process(&mut doc).unwrap();
///
/// assert_eq!(result.spliced, 1);
/// assert_eq!(
///     to_markdown(&doc),
///     "<div class=\"message-alert\">\nCareful\n</div>\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectiveProcessor {
    emitter: MarkupEmitter,
}

impl DirectiveProcessor {
    /// Create a processor with default markup settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with the given markup settings.
    #[must_use]
    pub fn with_config(config: MarkupConfig) -> Self {
        Self {
            emitter: MarkupEmitter::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &MarkupConfig {
        self.emitter.config()
    }

    /// Process all directives in `doc`.
    ///
    /// Unterminated directives, stray end markers and unknown directive
    /// types are left as text and reported in [`ProcessResult::warnings`].
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::InvalidOption`] for a `:::message` with an
    /// option other than `alert`. The document is not modified in that case.
    pub fn process(&self, doc: &mut Document) -> Result<ProcessResult, DirectiveError> {
        let mut stack = DirectiveStack::new();
        let collected = collect(doc, &mut stack);
        let mut warnings: Vec<(Option<usize>, String)> = Vec::new();

        let mut planned = Vec::with_capacity(collected.directives.len());
        for directive in collected.directives {
            let line = source_line(doc, directive.start);
            let kind = DirectiveKind::resolve(&directive.name, directive.option.as_deref())
                .map_err(|err| err.at_line(line))?;

            if let Some(markup) = self.emitter.markup(&kind) {
                planned.push((directive, markup));
            } else {
                tracing::warn!(name = %directive.name, line = ?line, "Unknown directive type");
                warnings.push((
                    line,
                    format!(
                        "{}unknown directive type :::{}",
                        line_prefix(&line),
                        directive.name
                    ),
                ));
            }
        }

        for open in stack.into_unterminated() {
            let line = source_line(doc, open.start);
            tracing::debug!(name = %open.name, line = ?line, "Unclosed directive");
            warnings.push((
                line,
                format!(
                    "{}unclosed directive :::{} (expected a closing {})",
                    line_prefix(&line),
                    open.name,
                    ":".repeat(open.level)
                ),
            ));
        }

        for at in collected.stray_ends {
            let line = source_line(doc, at);
            tracing::debug!(line = ?line, "Stray closing marker");
            warnings.push((
                line,
                format!(
                    "{}stray closing marker with no matching directive",
                    line_prefix(&line)
                ),
            ));
        }

        for at in collected.rejected_starts {
            tracing::debug!(line = ?source_line(doc, at), "Start marker exceeds enclosing level");
        }

        let spliced = planned.len();
        let rewritten_nodes = splice(doc, &planned)?;
        tracing::debug!(spliced, rewritten_nodes, "Processed directives");

        warnings.sort_by_key(|(line, _)| *line);
        Ok(ProcessResult {
            spliced,
            rewritten_nodes,
            warnings: warnings.into_iter().map(|(_, message)| message).collect(),
        })
    }
}

/// Process `doc` with the given markup settings.
///
/// Shorthand for `DirectiveProcessor::with_config(config.clone()).process(doc)`.
pub fn transform(doc: &mut Document, config: &MarkupConfig) -> Result<ProcessResult, DirectiveError> {
    DirectiveProcessor::with_config(config.clone()).process(doc)
}

/// 1-based source line of a marker.
fn source_line(doc: &Document, at: Location) -> Option<usize> {
    doc.position(at.node).map(|position| position.line + at.line)
}
