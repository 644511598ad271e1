//! Page rendering against the frozen metadata store.

use docs_markup::Segment;
use docs_meta::{Document, MetaStore};
use rayon::prelude::*;

use crate::environment::Environment;
use crate::navigation::Navigation;
use crate::order::DocumentOrder;
use crate::template::{PageData, render_page, render_toc};
use crate::toc::{TocBuilder, TocOptions};

/// One rendered page.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    pub path: String,
    pub url: String,
    pub title: String,
    /// Article body without the page chrome.
    pub body: String,
    /// Options of every visible TOC on the page, in document order.
    pub toc_options: Vec<TocOptions>,
    pub navigation: Navigation,
}

impl RenderedPage {
    /// Full standalone HTML page.
    pub fn to_html(&self, site_name: &str) -> String {
        render_page(&PageData {
            title: &self.title,
            site_name,
            body: &self.body,
            navigation: &self.navigation,
        })
    }
}

/// Renders documents. Holds only shared references, so pages render in
/// parallel.
pub struct PageRenderer<'a> {
    store: &'a MetaStore,
    order: &'a DocumentOrder,
}

impl<'a> PageRenderer<'a> {
    pub fn new(store: &'a MetaStore, order: &'a DocumentOrder) -> Self {
        Self { store, order }
    }

    /// Render one document.
    pub fn render(&self, document: &Document) -> RenderedPage {
        let env = Environment::new(self.store, &document.path);
        let toc_builder = TocBuilder::new(&env);

        let mut body = String::new();
        let mut toc_options = Vec::new();
        for segment in &document.segments {
            match segment {
                Segment::Html(html) => body.push_str(html),
                Segment::Toc(directive) => {
                    if let Some(toc) = toc_builder.build(directive) {
                        body.push_str(&render_toc(&toc));
                        toc_options.push(toc.options);
                    }
                }
            }
        }

        RenderedPage {
            path: document.path.clone(),
            url: document.url.clone(),
            title: document.title.clone(),
            body,
            toc_options,
            navigation: Navigation::for_page(self.store, self.order, &document.path),
        }
    }

    /// Render every ordered document, in order.
    pub fn render_all(&self) -> Vec<RenderedPage> {
        self.order
            .paths()
            .par_iter()
            .filter_map(|path| self.store.lookup(path))
            .map(|document| self.render(document))
            .collect()
    }
}
