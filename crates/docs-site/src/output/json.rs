use std::path::{Path, PathBuf};

use serde::Serialize;

use super::write_file;
use crate::error::BuildError;
use crate::navigation::NavLink;
use crate::renderer::RenderedPage;
use crate::toc::TocOptions;

/// JSON record for one page, read by a separate front-end.
#[derive(Debug, Serialize)]
pub struct JsonPage<'a> {
    pub title: &'a str,
    pub current_page_name: &'a str,
    pub body: &'a str,
    pub toc_options: &'a [TocOptions],
    pub parents: &'a [NavLink],
    pub prev: Option<&'a NavLink>,
    pub next: Option<&'a NavLink>,
}

impl<'a> From<&'a RenderedPage> for JsonPage<'a> {
    fn from(page: &'a RenderedPage) -> Self {
        Self {
            title: &page.title,
            current_page_name: &page.path,
            body: &page.body,
            toc_options: &page.toc_options,
            parents: &page.navigation.parents,
            prev: page.navigation.prev.as_ref(),
            next: page.navigation.next.as_ref(),
        }
    }
}

/// Write `_json/<path>.json` for every page.
pub(super) fn export(pages: &[RenderedPage], output_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let json_dir = output_dir.join("_json");
    let mut files = Vec::with_capacity(pages.len());

    for page in pages {
        let record = JsonPage::from(page);
        let data = serde_json::to_vec_pretty(&record).map_err(|source| BuildError::Json {
            path: page.path.clone(),
            source,
        })?;
        let file = json_dir.join(format!("{}.json", page.path));
        write_file(&file, &data)?;
        files.push(file);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::navigation::Navigation;
    use crate::toc::TocSize;

    #[test]
    fn test_export_writes_one_record_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let page = RenderedPage {
            path: "guide/install".to_owned(),
            url: "guide/install.html".to_owned(),
            title: "Install".to_owned(),
            body: "<h1 id=\"install\">Install</h1>".to_owned(),
            toc_options: vec![TocOptions {
                max_depth: 2,
                num_visible_items: 12,
                size: TocSize::Medium,
            }],
            navigation: Navigation {
                parents: vec![NavLink {
                    title: "Home".to_owned(),
                    link: "../index.html".to_owned(),
                }],
                prev: None,
                next: None,
            },
        };

        let files = export(std::slice::from_ref(&page), dir.path()).unwrap();

        assert_eq!(files, vec![dir.path().join("_json/guide/install.json")]);
        let value: Value = serde_json::from_slice(&std::fs::read(&files[0]).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Install",
                "current_page_name": "guide/install",
                "body": "<h1 id=\"install\">Install</h1>",
                "toc_options": [{"maxDepth": 2, "numVisibleItems": 12, "size": "medium"}],
                "parents": [{"title": "Home", "link": "../index.html"}],
                "prev": null,
                "next": null,
            })
        );
    }
}
