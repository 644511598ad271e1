//! Markdown parsing for the documentation builder.
//!
//! [`MarkupParser`] turns one markdown source into a [`ParsedPage`]:
//!
//! - the page title (first H1)
//! - the heading [`outline`](ParsedPage::outline), nested by level
//! - an ordered list of [`Segment`]s: rendered HTML runs interleaved with
//!   the `:::toc` directives found between them
//!
//! The crate also owns the string helpers every later stage must agree on:
//! [`slugify`] for anchors, [`escape_html`], [`relative_path`] for
//! page-relative URLs and [`join_reference`] for resolving a referenced
//! document against the referencing one.
//!
//! # Example
//!
//! ```
//! use docs_markup::{MarkupParser, Segment};
//!
//! let page = MarkupParser::new()
//!     .parse("# Guide\n\n:::toc{maxdepth=1}\ninstall\n:::\n")
//!     .unwrap();
//!
//! assert_eq!(page.title.as_deref(), Some("Guide"));
//! assert!(matches!(page.segments[1], Segment::Toc(_)));
//! ```

pub mod directive;
mod outline;
mod parser;
mod slug;
mod util;

pub use directive::TocDirective;
pub use outline::{Title, TitleEntry};
pub use parser::{MarkupParser, ParseError, ParsedPage, Segment};
pub use slug::{escape_html, slugify};
pub use util::{join_reference, relative_path};
