//! Reference resolution relative to the page being rendered.

use docs_markup::{TitleEntry, join_reference, relative_path};
use docs_meta::{MetaStore, document_url};

/// What a reference points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A whole document, by logical path.
    Doc,
}

/// A resolved reference into the metadata store.
#[derive(Clone, Copy, Debug)]
pub struct Reference<'a> {
    /// Logical path of the target document.
    pub path: &'a str,
    /// Root-relative output URL of the target document.
    pub url: &'a str,
    /// Target document title.
    pub title: &'a str,
    /// Target document outline.
    pub outline: &'a [TitleEntry],
}

/// Resolution context for one page.
///
/// Resolves references written in the current page against a frozen
/// [`MetaStore`] and turns root-relative URLs into page-relative ones.
pub struct Environment<'a> {
    store: &'a MetaStore,
    current_path: &'a str,
    current_url: String,
}

impl<'a> Environment<'a> {
    /// Environment for rendering the document at `current_path`.
    pub fn new(store: &'a MetaStore, current_path: &'a str) -> Self {
        Self {
            store,
            current_path,
            current_url: document_url(current_path),
        }
    }

    /// Logical path of the page being rendered.
    pub fn current_path(&self) -> &'a str {
        self.current_path
    }

    /// Resolve `target` as written in the current page.
    ///
    /// Returns `None` when the target is not in the store. That is an
    /// expected outcome (partial and sub-path builds), never an error.
    pub fn resolve(&self, kind: ReferenceKind, target: &str) -> Option<Reference<'a>> {
        self.resolve_from(kind, self.current_path, target)
    }

    /// Resolve `target` as written in the document at `base_path`.
    pub fn resolve_from(
        &self,
        kind: ReferenceKind,
        base_path: &str,
        target: &str,
    ) -> Option<Reference<'a>> {
        match kind {
            ReferenceKind::Doc => {
                let Some(path) = join_reference(base_path, target) else {
                    tracing::debug!(reference = target, base_path, "Reference leaves the source root");
                    return None;
                };
                let Some(document) = self.store.lookup(&path) else {
                    tracing::debug!(
                        path = %path,
                        page = self.current_path,
                        "Unresolved document reference"
                    );
                    return None;
                };
                Some(Reference {
                    path: &document.path,
                    url: &document.url,
                    title: &document.title,
                    outline: &document.outline,
                })
            }
        }
    }

    /// Rewrite a root-relative output URL relative to the current page.
    ///
    /// ```
    /// # use docs_meta::MetaStoreBuilder;
    /// # use docs_site::Environment;
    /// let store = MetaStoreBuilder::new().freeze();
    /// let env = Environment::new(&store, "guide/setup/linux");
    /// assert_eq!(env.relative_url("/index.html"), "../../index.html");
    /// ```
    pub fn relative_url(&self, absolute_url: &str) -> String {
        relative_path(&self.current_url, absolute_url.trim_start_matches('/'))
    }

    /// Anchor slug for `text`.
    pub fn slugify(&self, text: &str) -> String {
        docs_markup::slugify(text)
    }
}
