//! Cross-document TOC resolution, rendering and output for the
//! documentation builder.
//!
//! [`SiteBuilder`] runs one build: discover sources, load or parse their
//! metadata into a frozen [`MetaStore`](docs_meta::MetaStore), render every
//! page (TOC directives resolve through an [`Environment`] bound to the page),
//! check references, dispatch JSON or combined-HTML output, and persist the
//! metadata cache.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use docs_config::BuildContext;
//! use docs_site::SiteBuilder;
//!
//! let context = BuildContext::new("docs", "docs/html");
//! let report = SiteBuilder::new(context).build()?;
//! assert_eq!(report.parsed + report.from_cache, report.documents);
//! # Ok(())
//! # }
//! ```

mod assets;
mod builder;
mod checker;
mod environment;
mod error;
mod navigation;
mod order;
mod output;
mod renderer;
mod scanner;
mod template;
mod toc;

pub use assets::{IMAGES_DIR, copy_images};
pub use builder::{BuildReport, SiteBuilder};
pub use checker::{MissingReference, MissingReferenceReport, check_references};
pub use environment::{Environment, Reference, ReferenceKind};
pub use error::BuildError;
pub use navigation::{NavLink, Navigation};
pub use order::DocumentOrder;
pub use output::{DispatchSummary, JsonPage, OutputMode, dispatch};
pub use renderer::{PageRenderer, RenderedPage};
pub use scanner::SourceFile;
pub use template::{PageData, render_page, render_toc};
pub use toc::{Toc, TocBuilder, TocItem, TocOptions, TocSize};
