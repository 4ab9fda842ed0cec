//! Markdown syntax tree for directive transforms.
//!
//! This crate provides the document model the `callout` transform operates on:
//!
//! - [`Document`]: arena tree with stable [`NodeId`] handles and in-place
//!   node replacement
//! - [`parse`]: builds a [`Document`] from markdown using pulldown-cmark
//! - [`to_markdown`]: writes a [`Document`] back to markdown, emitting
//!   [`NodeKind::Html`] nodes verbatim
//!
//! # Example
//!
//! ```
//! use callout_mdast::{parse, to_markdown, NodeKind};
//!
//! let mut doc = parse("Hello *world*");
//! let text = doc.text_nodes()[0];
//! doc.replace(text, vec![NodeKind::Html("<b>Hi</b> ".to_owned())]).unwrap();
//!
//! assert_eq!(to_markdown(&doc), "<b>Hi</b> *world*\n");
//! ```

mod error;
mod parser;
mod serializer;
mod tree;

pub use error::TreeError;
pub use parser::{default_options, parse, parse_with_options};
pub use serializer::to_markdown;
pub use tree::{Descendants, Document, NodeId, NodeKind, Position};

/// Re-exported so callers can build custom [`parse_with_options`] flags.
pub use pulldown_cmark::Options;
