use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use docs_markup::{join_reference, slugify};
use regex::{Captures, Regex};

use super::write_file;
use crate::error::BuildError;
use crate::navigation::Navigation;
use crate::renderer::RenderedPage;
use crate::template::{PageData, render_page};

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="([^"]*)""#).unwrap());
static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(\s)id="([^"]*)""#).unwrap());

/// File name of the combined document for `sub_path` (`a/b` -> `a-b.html`).
pub(super) fn file_name(sub_path: &str) -> String {
    format!("{}.html", sub_path.replace('/', "-"))
}

/// Concatenate `pages` into one HTML document.
///
/// Each page becomes a `<section>` whose id is the slug of its logical path.
/// Element ids inside a page are prefixed with that slug (`book-ch1--setup`)
/// so pages sharing a heading keep distinct anchors, and links between
/// concatenated pages turn into anchors of the combined document.
pub(super) fn export(
    pages: &[RenderedPage],
    sub_path: &str,
    output_dir: &Path,
    site_name: &str,
) -> Result<PathBuf, BuildError> {
    let included: HashSet<&str> = pages.iter().map(|page| page.path.as_str()).collect();

    let mut body = String::new();
    for page in pages {
        let section = slugify(&page.path);
        body.push_str(&format!("<section id=\"{section}\">\n"));
        let page_body = prefix_ids(&page.body, &section);
        body.push_str(&rewrite_links(&page_body, &page.path, &included));
        body.push_str("\n</section>\n");
    }

    let title = pages.first().map_or(sub_path, |page| page.title.as_str());
    let navigation = Navigation::default();
    let html = render_page(&PageData {
        title,
        site_name,
        body: &body,
        navigation: &navigation,
    });

    let file = output_dir.join(file_name(sub_path));
    write_file(&file, html.as_bytes())?;
    Ok(file)
}

/// Id of the element `id` from the page whose section is `section`.
fn scoped_id(section: &str, id: &str) -> String {
    format!("{section}--{id}")
}

fn prefix_ids(body: &str, section: &str) -> String {
    ID_RE
        .replace_all(body, |caps: &Captures<'_>| {
            format!("{}id=\"{}\"", &caps[1], scoped_id(section, &caps[2]))
        })
        .into_owned()
}

/// Point links at concatenated pages to anchors in the combined document.
fn rewrite_links(body: &str, page_path: &str, included: &HashSet<&str>) -> String {
    HREF_RE
        .replace_all(body, |caps: &Captures<'_>| {
            let href = &caps[1];
            match internal_anchor(href, page_path, included) {
                Some(anchor) => format!("href=\"#{anchor}\""),
                None => caps[0].to_owned(),
            }
        })
        .into_owned()
}

fn internal_anchor(href: &str, page_path: &str, included: &HashSet<&str>) -> Option<String> {
    if let Some(fragment) = href.strip_prefix('#') {
        return (!fragment.is_empty()).then(|| scoped_id(&slugify(page_path), fragment));
    }
    if href.is_empty() || href.contains("://") || href.starts_with("mailto:") {
        return None;
    }
    let (file, fragment) = match href.split_once('#') {
        Some((file, fragment)) => (file, Some(fragment)),
        None => (href, None),
    };
    let stem = file.strip_suffix(".html")?;
    let target = join_reference(page_path, stem)?;
    if !included.contains(target.as_str()) {
        return None;
    }

    let section = slugify(&target);
    Some(match fragment {
        Some(fragment) if !fragment.is_empty() => scoped_id(&section, fragment),
        _ => section,
    })
}
