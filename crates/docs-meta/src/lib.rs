//! Cross-document metadata for one build.
//!
//! Every source file becomes a [`Document`] keyed by its logical path
//! (`guide/install` for `guide/install.md`). Documents are collected in a
//! [`MetaStoreBuilder`] and then frozen into a read-only [`MetaStore`] that
//! the render pass, the missing-reference check and output dispatch share.
//!
//! [`MetaCache`] persists the frozen store between runs so unchanged files
//! skip parsing.

mod cache;
mod document;
mod store;

pub use cache::MetaCache;
pub use document::{Document, document_url};
pub use store::{MetaStore, MetaStoreBuilder};
