//! Per-file metadata.

use std::path::PathBuf;

use docs_markup::{ParsedPage, Segment, TitleEntry, TocDirective, join_reference};
use serde::{Deserialize, Serialize};

/// Output URL for a logical path (`guide/install` -> `guide/install.html`).
pub fn document_url(path: &str) -> String {
    format!("{path}.html")
}

/// Metadata of one source file.
///
/// Holds everything needed to render the page again without reading the
/// source: the outline other pages' TOCs walk, and the parsed body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Logical path, unique within a store.
    pub path: String,
    /// Root-relative output URL.
    pub url: String,
    /// Page title (first H1, else the file stem).
    pub title: String,
    /// Source file the document was parsed from.
    pub source_path: PathBuf,
    /// Source modification time in nanoseconds since the Unix epoch.
    pub mtime_ns: u64,
    /// Heading tree.
    pub outline: Vec<TitleEntry>,
    /// Parsed body in document order.
    pub segments: Vec<Segment>,
}

impl Document {
    /// Document with the given outline and no body.
    ///
    /// The title is taken from the first outline entry.
    pub fn new(path: impl Into<String>, outline: Vec<TitleEntry>) -> Self {
        let path = path.into();
        let title = outline
            .first()
            .map_or_else(|| fallback_title(&path), |entry| entry.title.text().to_owned());
        Self {
            url: document_url(&path),
            source_path: PathBuf::from(format!("{path}.md")),
            mtime_ns: 0,
            title,
            outline,
            segments: Vec::new(),
            path,
        }
    }

    /// Document built from a parsed source file.
    pub fn from_parsed(
        path: impl Into<String>,
        source_path: PathBuf,
        mtime_ns: u64,
        page: ParsedPage,
    ) -> Self {
        let path = path.into();
        let title = page.title.unwrap_or_else(|| fallback_title(&path));
        Self {
            url: document_url(&path),
            title,
            source_path,
            mtime_ns,
            outline: page.outline,
            segments: page.segments,
            path,
        }
    }

    /// TOC directives in document order.
    pub fn toc_directives(&self) -> impl Iterator<Item = &TocDirective> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Toc(directive) => Some(directive),
            Segment::Html(_) => None,
        })
    }

    /// Logical paths referenced by this document's TOCs, in order.
    ///
    /// References that cannot be resolved to a path (empty, or climbing
    /// above the source root) are skipped.
    pub fn references(&self) -> impl Iterator<Item = String> + '_ {
        self.toc_directives()
            .flat_map(|toc| toc.files.iter())
            .filter_map(|file| join_reference(&self.path, file))
    }
}

/// Title for a page without an H1: its file stem, or its directory for `index`.
fn fallback_title(path: &str) -> String {
    let mut segments = path.rsplit('/');
    let stem = segments.next().unwrap_or(path);
    if stem == "index" {
        segments.next().unwrap_or(stem).to_owned()
    } else {
        stem.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use docs_markup::MarkupParser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_url_from_path() {
        assert_eq!(document_url("index"), "index.html");
        assert_eq!(document_url("guide/setup/linux"), "guide/setup/linux.html");
    }

    #[test]
    fn test_new_takes_title_from_outline() {
        let doc = Document::new("guide/install", vec![TitleEntry::leaf("Installing")]);

        assert_eq!(doc.title, "Installing");
        assert_eq!(doc.url, "guide/install.html");
        assert_eq!(doc.source_path, PathBuf::from("guide/install.md"));
    }

    #[test]
    fn test_fallback_title() {
        assert_eq!(Document::new("guide/install", Vec::new()).title, "install");
        assert_eq!(Document::new("guide/index", Vec::new()).title, "guide");
        assert_eq!(Document::new("index", Vec::new()).title, "index");
    }

    #[test]
    fn test_from_parsed() {
        let page = MarkupParser::new()
            .parse("# Setup\n\n## Linux\n\n:::toc\nlinux\n../faq.md\n:::\n")
            .unwrap();
        let doc = Document::from_parsed("guide/setup", PathBuf::from("/src/guide/setup.md"), 7, page);

        assert_eq!(doc.title, "Setup");
        assert_eq!(doc.mtime_ns, 7);
        assert_eq!(doc.toc_directives().count(), 1);
        assert_eq!(
            doc.references().collect::<Vec<_>>(),
            vec!["guide/linux".to_owned(), "faq".to_owned()]
        );
    }

    #[test]
    fn test_references_skip_escaping_paths() {
        let page = MarkupParser::new()
            .parse(":::toc\n../../nowhere\n/abs/page\n:::\n")
            .unwrap();
        let doc = Document::from_parsed("index", PathBuf::from("index.md"), 0, page);

        assert_eq!(doc.references().collect::<Vec<_>>(), vec!["abs/page".to_owned()]);
    }
}
