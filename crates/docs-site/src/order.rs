//! Reading order of documents.
//!
//! The order is a depth-first walk of TOC references starting at the root
//! document, visiting each document once. Hidden TOCs count: they shape
//! navigation even though they render nothing. Documents the walk never
//! reaches follow in store order.

use std::collections::{HashMap, HashSet};

use docs_meta::MetaStore;

/// Document order plus the TOC parent of each reached document.
#[derive(Debug, Default)]
pub struct DocumentOrder {
    sequence: Vec<String>,
    position: HashMap<String, usize>,
    parents: HashMap<String, String>,
}

impl DocumentOrder {
    /// Walk `store` from `root`, keeping only documents under `scope`.
    pub fn compute(store: &MetaStore, root: &str, scope: Option<&str>) -> Self {
        let scoped = |path: &str| in_scope(path, scope);

        let mut order = Self::default();
        let mut visited: HashSet<String> = HashSet::new();

        if let Some(root_doc) = store.lookup(root).filter(|d| scoped(&d.path)) {
            visited.insert(root_doc.path.clone());
            order.push(&root_doc.path);

            // Explicit stack of (document, its references, next reference index).
            let mut stack = vec![(root_doc.path.clone(), root_doc.references().collect::<Vec<_>>(), 0)];
            while let Some((current, references, next)) = stack.last_mut() {
                let Some(reference) = references.get(*next) else {
                    stack.pop();
                    continue;
                };
                *next += 1;

                if visited.contains(reference) || !scoped(reference) {
                    continue;
                }
                let Some(child) = store.lookup(reference) else {
                    continue;
                };

                visited.insert(child.path.clone());
                order.parents.insert(child.path.clone(), current.clone());
                order.push(&child.path);
                stack.push((child.path.clone(), child.references().collect(), 0));
            }
        }

        for document in store.all() {
            if scoped(&document.path) && !visited.contains(&document.path) {
                order.push(&document.path);
            }
        }

        order
    }

    fn push(&mut self, path: &str) {
        self.position.insert(path.to_owned(), self.sequence.len());
        self.sequence.push(path.to_owned());
    }

    /// Logical paths in reading order.
    pub fn paths(&self) -> &[String] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.position.contains_key(path)
    }

    /// Document whose TOC first reached `path`.
    pub fn parent(&self, path: &str) -> Option<&str> {
        self.parents.get(path).map(String::as_str)
    }

    /// Ancestors of `path`, outermost first.
    pub fn ancestors(&self, path: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = path;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    pub fn previous(&self, path: &str) -> Option<&str> {
        let idx = *self.position.get(path)?;
        idx.checked_sub(1)
            .and_then(|prev| self.sequence.get(prev))
            .map(String::as_str)
    }

    pub fn next(&self, path: &str) -> Option<&str> {
        let idx = *self.position.get(path)?;
        self.sequence.get(idx + 1).map(String::as_str)
    }
}

/// Whether `path` lies under the sub-path `scope` (always, without one).
pub(crate) fn in_scope(path: &str, scope: Option<&str>) -> bool {
    match scope {
        None => true,
        Some(sub) => path == sub || path.strip_prefix(sub).is_some_and(|rest| rest.starts_with('/')),
    }
}
