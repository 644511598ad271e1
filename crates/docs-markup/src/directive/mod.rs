//! Container directives embedded in markdown.
//!
//! Only one directive is interpreted, the table of contents:
//!
//! ```text
//! :::toc[Contents]{maxdepth=2 hidden}
//! install
//! /reference/index
//! :::
//! ```
//!
//! Other container directives are left in the markdown untouched.

mod args;
mod parser;

pub use args::DirectiveArgs;
pub(crate) use parser::{ParsedDirective, parse_container_line};

/// A table of contents directive as written in a page.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocDirective {
    /// Referenced documents, as written (relative or `/`-absolute).
    pub files: Vec<String>,
    /// Deepest outline level shown (at least 1).
    pub max_depth: usize,
    /// Hidden TOCs shape navigation but render nothing.
    pub hidden: bool,
    /// Optional caption from `[...]`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub caption: Option<String>,
    /// 1-based source line of the opening fence.
    pub line: usize,
}
