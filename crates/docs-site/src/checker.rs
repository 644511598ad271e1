//! Post-build reference diagnostics.

use std::collections::HashSet;

use docs_markup::join_reference;
use docs_meta::MetaStore;

/// A TOC entry naming a document that was not discovered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingReference {
    /// Logical path of the document holding the TOC.
    pub source: String,
    /// Referenced logical path, or the entry as written if it leaves the
    /// source root.
    pub target: String,
    /// Line of the TOC directive in the source file.
    pub line: usize,
}

/// Result of [`check_references`]. Diagnostic only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MissingReferenceReport {
    pub missing: Vec<MissingReference>,
    /// Discovered documents no TOC references.
    pub orphans: Vec<String>,
}

impl MissingReferenceReport {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.orphans.is_empty()
    }
}

/// Compare every TOC reference in `store` against the discovered documents.
///
/// Hidden TOCs count as references. `root` (and a top-level `index`) are
/// never reported as orphans.
pub fn check_references(store: &MetaStore, root: &str) -> MissingReferenceReport {
    let mut report = MissingReferenceReport::default();
    let mut referenced: HashSet<String> = HashSet::new();

    for document in store.all() {
        for directive in document.toc_directives() {
            for file in &directive.files {
                match join_reference(&document.path, file) {
                    Some(target) if store.contains(&target) => {
                        referenced.insert(target);
                    }
                    target => report.missing.push(MissingReference {
                        source: document.path.clone(),
                        target: target.unwrap_or_else(|| file.clone()),
                        line: directive.line,
                    }),
                }
            }
        }
    }

    report.orphans = store
        .all()
        .map(|document| document.path.as_str())
        .filter(|path| *path != root && *path != "index" && !referenced.contains(*path))
        .map(str::to_owned)
        .collect();

    report
}
