//! Breadcrumbs and previous/next links.

use docs_markup::relative_path;
use docs_meta::{MetaStore, document_url};
use serde::Serialize;

use crate::order::DocumentOrder;

/// A link to another page, relative to the page it appears on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub link: String,
}

/// Navigation around one page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// TOC ancestors, outermost first.
    pub parents: Vec<NavLink>,
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

impl Navigation {
    /// Navigation for `path` according to `order`.
    pub fn for_page(store: &MetaStore, order: &DocumentOrder, path: &str) -> Self {
        let page_url = document_url(path);
        let link = |target: &str| {
            store.lookup(target).map(|document| NavLink {
                title: document.title.clone(),
                link: relative_path(&page_url, &document.url),
            })
        };

        Self {
            parents: order.ancestors(path).into_iter().filter_map(link).collect(),
            prev: order.previous(path).and_then(link),
            next: order.next(path).and_then(link),
        }
    }
}
