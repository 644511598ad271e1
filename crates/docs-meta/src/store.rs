//! Two-phase metadata store.
//!
//! [`MetaStoreBuilder`] is the single-writer phase: parsed and cached
//! documents are registered one at a time through `&mut self`.
//! [`MetaStoreBuilder::freeze`] consumes it and yields a [`MetaStore`],
//! which has no mutating methods at all and can be shared across the
//! render workers.
//!
//! # Architecture
//!
//! Documents live in a flat `Vec` in insertion order with a `HashMap`
//! index from logical path to position. Each document is behind an `Arc`,
//! so overwriting a path swaps the whole document in one step and a
//! lookup never observes a mix of old and new fields.

use std::collections::HashMap;
use std::sync::Arc;

use crate::Document;

/// Mutable registry used while a build collects documents.
#[derive(Debug, Default)]
pub struct MetaStoreBuilder {
    documents: Vec<Arc<Document>>,
    index: HashMap<String, usize>,
}

impl MetaStoreBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `document`, replacing any document with the same path.
    ///
    /// A replaced document keeps its original insertion position. Returns
    /// the document that was replaced.
    pub fn register(&mut self, document: Document) -> Option<Arc<Document>> {
        self.register_shared(Arc::new(document))
    }

    /// [`register`](Self::register) for a document that is already shared,
    /// such as one carried over from a previous build's store.
    pub fn register_shared(&mut self, document: Arc<Document>) -> Option<Arc<Document>> {
        if let Some(&idx) = self.index.get(&document.path) {
            return Some(std::mem::replace(&mut self.documents[idx], document));
        }
        self.index
            .insert(document.path.clone(), self.documents.len());
        self.documents.push(document);
        None
    }

    /// Look up a registered document by logical path.
    pub fn lookup(&self, path: &str) -> Option<&Document> {
        self.index.get(path).map(|&idx| self.documents[idx].as_ref())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Finish the collection phase.
    #[must_use]
    pub fn freeze(self) -> MetaStore {
        tracing::debug!(documents = self.documents.len(), "Metadata store frozen");
        MetaStore {
            documents: self.documents,
            index: self.index,
        }
    }
}

/// Read-only document registry for the rest of a build.
#[derive(Debug, Default)]
pub struct MetaStore {
    documents: Vec<Arc<Document>>,
    index: HashMap<String, usize>,
}

impl MetaStore {
    /// Look up a document by logical path.
    pub fn lookup(&self, path: &str) -> Option<&Document> {
        self.index.get(path).map(|&idx| self.documents[idx].as_ref())
    }

    /// Shared handle to a document, for carrying it into a new builder.
    pub fn get_shared(&self, path: &str) -> Option<Arc<Document>> {
        self.index
            .get(path)
            .map(|&idx| Arc::clone(&self.documents[idx]))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// All documents in insertion order.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &Document> {
        self.documents.iter().map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
