//! The build pipeline.

use std::fs;
use std::sync::Arc;

use docs_config::BuildContext;
use docs_markup::MarkupParser;
use docs_meta::{Document, MetaCache, MetaStore, MetaStoreBuilder};
use rayon::prelude::*;

use crate::assets::copy_images;
use crate::checker::{MissingReferenceReport, check_references};
use crate::error::BuildError;
use crate::order::{DocumentOrder, in_scope};
use crate::output::{DispatchSummary, OutputMode, dispatch, write_file};
use crate::renderer::PageRenderer;
use crate::scanner::{Scanner, SourceFile};

/// Outcome of a successful build.
#[derive(Clone, Debug)]
pub struct BuildReport {
    /// Documents in the final store.
    pub documents: usize,
    /// Documents parsed in this run.
    pub parsed: usize,
    /// Documents reused from the metadata cache.
    pub from_cache: usize,
    pub cache_enabled: bool,
    pub images_copied: usize,
    pub references: MissingReferenceReport,
    pub dispatch: DispatchSummary,
}

/// Builds a site for one [`BuildContext`].
pub struct SiteBuilder {
    context: BuildContext,
    parser: MarkupParser,
}

impl SiteBuilder {
    pub fn new(context: BuildContext) -> Self {
        let parser = MarkupParser::new().with_default_toc_depth(context.toc_max_depth());
        Self { context, parser }
    }

    /// Cache version. Parsed documents embed the default TOC depth, so a
    /// depth change invalidates the cache like a tool upgrade does.
    fn cache_version(&self) -> String {
        format!(
            "{}+toc{}",
            env!("CARGO_PKG_VERSION"),
            self.context.toc_max_depth()
        )
    }

    /// Run the whole pipeline.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let ctx = &self.context;
        let source_dir = ctx.source_dir();
        let output_dir = ctx.output_dir();

        if !source_dir.is_dir() {
            return Err(BuildError::SourceNotFound(source_dir.to_path_buf()));
        }
        fs::create_dir_all(output_dir).map_err(|source| BuildError::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let files = Scanner::new(source_dir, output_dir).scan(&ctx.scan_root())?;
        tracing::info!(files = files.len(), source = %source_dir.display(), "Discovered sources");

        let cache = if ctx.cache_enabled() {
            MetaCache::open(&ctx.cache_dir(), &self.cache_version())
        } else {
            MetaCache::disabled()
        };
        let cached = cache.load();
        let (store, parsed, from_cache) = self.load_documents(&files, &cached)?;

        let root = ctx.root_document();
        let order = DocumentOrder::compute(&store, &root, ctx.sub_path());
        let pages = PageRenderer::new(&store, &order).render_all();
        pages.par_iter().try_for_each(|page| {
            let html = page.to_html(ctx.site_name());
            write_file(&output_dir.join(&page.url), html.as_bytes())
        })?;
        tracing::info!(pages = pages.len(), "Rendered pages");

        let images_copied = copy_images(source_dir, output_dir)?;

        let references = check_references(&store, &root);
        if !references.is_empty() {
            tracing::info!(
                missing = references.missing.len(),
                orphans = references.orphans.len(),
                "Reference check found problems"
            );
        }

        let mode = OutputMode::for_context(ctx);
        let summary = dispatch(&mode, &pages, output_dir, ctx.site_name())?;

        cache.save(&cache_snapshot(&store, &cached, ctx.sub_path()));

        Ok(BuildReport {
            documents: store.len(),
            parsed,
            from_cache,
            cache_enabled: ctx.cache_enabled(),
            images_copied,
            references,
            dispatch: summary,
        })
    }

    /// Reuse fresh cached documents, parse the rest, and freeze the result
    /// in discovery order.
    ///
    /// Returns the store with the parsed and cached counts.
    fn load_documents(
        &self,
        files: &[SourceFile],
        cached: &MetaStore,
    ) -> Result<(MetaStore, usize, usize), BuildError> {
        let mut documents: Vec<Option<Arc<Document>>> = files
            .iter()
            .map(|file| match cached.get_shared(&file.path) {
                Some(document) if is_fresh(&document, file) => Some(document),
                Some(_) => {
                    tracing::debug!(path = %file.path, "Cached document is stale");
                    None
                }
                None => None,
            })
            .collect();
        let cached_count = documents.iter().flatten().count();

        let parsed: Vec<(usize, Document)> = documents
            .iter()
            .enumerate()
            .filter(|(_, document)| document.is_none())
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|idx| self.parse_file(&files[idx]).map(|document| (idx, document)))
            .collect::<Result<_, _>>()?;
        let parsed_count = parsed.len();

        for (idx, document) in parsed {
            documents[idx] = Some(Arc::new(document));
        }

        let mut builder = MetaStoreBuilder::new();
        for document in documents.into_iter().flatten() {
            builder.register_shared(document);
        }

        tracing::info!(parsed = parsed_count, cached = cached_count, "Loaded documents");
        Ok((builder.freeze(), parsed_count, cached_count))
    }

    fn parse_file(&self, file: &SourceFile) -> Result<Document, BuildError> {
        let text = fs::read_to_string(&file.source_path).map_err(|source| BuildError::Read {
            path: file.source_path.clone(),
            source,
        })?;
        let page = self.parser.parse(&text).map_err(|source| BuildError::Parse {
            path: file.source_path.clone(),
            source,
        })?;
        Ok(Document::from_parsed(
            file.path.clone(),
            file.source_path.clone(),
            file.mtime_ns,
            page,
        ))
    }
}

/// Documents to persist: this build's store plus cached documents a
/// sub-path build did not scan.
fn cache_snapshot(store: &MetaStore, cached: &MetaStore, scope: Option<&str>) -> MetaStore {
    let mut builder = MetaStoreBuilder::new();
    for document in cached.all() {
        if !in_scope(&document.path, scope)
            && let Some(shared) = cached.get_shared(&document.path)
        {
            builder.register_shared(shared);
        }
    }
    for document in store.all() {
        if let Some(shared) = store.get_shared(&document.path) {
            builder.register_shared(shared);
        }
    }
    builder.freeze()
}

fn is_fresh(document: &Document, file: &SourceFile) -> bool {
    file.mtime_ns != 0 && document.mtime_ns == file.mtime_ns && document.source_path == file.source_path
}
