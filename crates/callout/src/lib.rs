//! Colon-fenced directives for markdown trees.
//!
//! This crate rewrites `:::message` and `:::details` blocks in a parsed
//! [`callout_mdast::Document`] into raw HTML containers:
//!
//! ```text
//! :::message alert          <div class="message-alert">
//! Be careful                Be careful
//! :::                       </div>
//! ```
//!
//! # Architecture
//!
//! Processing runs in two phases over the document's text nodes:
//! - **Collection**: every line is classified as a start marker, an end
//!   marker or content, and markers are paired with a [`DirectiveStack`].
//!   A directive nests only inside one with at least as many colons, and an
//!   end marker closes the innermost directive only on an exact colon match.
//! - **Splicing**: each text node holding a marker is replaced once by
//!   text segments and HTML fragments. Content between markers, including
//!   whole paragraphs and inline formatting, is never touched.
//!
//! Unknown directive names, unterminated directives and stray end markers
//! stay in the output as ordinary text and are reported as warnings.
//!
//! # Example
//!
//! ```
//! use callout::{MarkupConfig, transform};
//! use callout_mdast::{parse, to_markdown};
//!
//! let mut doc = parse(":::details Click me\n\nHidden text\n\n:::");
//! let result = transform(&mut doc, &MarkupConfig::default()).unwrap();
//!
//! assert!(result.warnings.is_empty());
//! assert_eq!(
//!     to_markdown(&doc),
//!     "<details><summary>Click me</summary>\n\nHidden text\n\n</details>\n"
//! );
//! ```

mod collector;
mod error;
mod marker;
mod markup;
mod processor;
mod splice;
mod stack;

pub use collector::{Collected, collect};
pub use error::DirectiveError;
pub use markup::{
    DEFAULT_CLASS_PREFIX, DirectiveKind, MarkupConfig, MarkupEmitter, MarkupPair, MessageLevel,
};
pub use processor::{DirectiveProcessor, ProcessResult, transform};
pub use stack::{Directive, DirectiveStack, Location, OpenDirective};
