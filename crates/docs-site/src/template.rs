//! HTML templates for pages and TOCs.

use std::fmt::Write;

use docs_markup::escape_html as escape;

use crate::navigation::{NavLink, Navigation};
use crate::toc::{Toc, TocItem};

/// Everything needed to render a standalone page.
pub struct PageData<'a> {
    pub title: &'a str,
    pub site_name: &'a str,
    pub body: &'a str,
    pub navigation: &'a Navigation,
}

/// Render a complete HTML page.
pub fn render_page(page: &PageData<'_>) -> String {
    let mut html = String::with_capacity(page.body.len() + 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(
        html,
        "<title>{} | {}</title>",
        escape(page.title),
        escape(page.site_name)
    );
    html.push_str("</head>\n<body>\n");

    render_breadcrumbs(&mut html, &page.navigation.parents);

    html.push_str("<main>\n<article class=\"document\">\n");
    html.push_str(page.body);
    html.push_str("\n</article>\n</main>\n");

    render_pager(&mut html, page.navigation);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_breadcrumbs(html: &mut String, parents: &[NavLink]) {
    if parents.is_empty() {
        return;
    }
    html.push_str("<nav class=\"breadcrumbs\">\n<ol>\n");
    for parent in parents {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape(&parent.link),
            escape(&parent.title)
        );
    }
    html.push_str("</ol>\n</nav>\n");
}

fn render_pager(html: &mut String, navigation: &Navigation) {
    if navigation.prev.is_none() && navigation.next.is_none() {
        return;
    }
    html.push_str("<nav class=\"pager\">\n");
    if let Some(prev) = &navigation.prev {
        let _ = writeln!(
            html,
            "<a class=\"prev\" rel=\"prev\" href=\"{}\">{}</a>",
            escape(&prev.link),
            escape(&prev.title)
        );
    }
    if let Some(next) = &navigation.next {
        let _ = writeln!(
            html,
            "<a class=\"next\" rel=\"next\" href=\"{}\">{}</a>",
            escape(&next.link),
            escape(&next.title)
        );
    }
    html.push_str("</nav>\n");
}

/// Render a built TOC.
///
/// The wrapper carries the size bucket as a class and the raw numbers as
/// data attributes, matching the JSON export.
pub fn render_toc(toc: &Toc) -> String {
    let mut html = String::with_capacity(256 + toc.options.num_visible_items * 128);

    let _ = writeln!(
        html,
        "<div class=\"toctree-wrapper toc-size-{}\" data-max-depth=\"{}\" data-visible-items=\"{}\">",
        toc.options.size.as_str(),
        toc.options.max_depth,
        toc.options.num_visible_items
    );
    if let Some(caption) = &toc.caption {
        let _ = writeln!(html, "<p class=\"caption\">{}</p>", escape(caption));
    }
    render_toc_items(&mut html, &toc.items, 1);
    html.push_str("</div>\n");
    html
}

fn render_toc_items(html: &mut String, items: &[TocItem], level: usize) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(html, "<ul class=\"toctree toctree-level-{level}\">");
    for item in items {
        let _ = write!(
            html,
            "<li class=\"toctree-l{}\"><a class=\"reference internal\" href=\"{}\" data-target-id=\"{}\">{}</a>",
            item.level,
            escape(&item.target_url),
            item.target_id,
            escape(&item.title)
        );
        if item.children.is_empty() {
            html.push_str("</li>\n");
        } else {
            html.push('\n');
            render_toc_items(html, &item.children, level + 1);
            html.push_str("</li>\n");
        }
    }
    html.push_str("</ul>\n");
}
