//! Immutable per-build settings.

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Default maximum depth of a TOC directive without `maxdepth`.
pub const DEFAULT_TOC_MAX_DEPTH: usize = 2;

/// Settings for one build invocation.
///
/// Created once from [`Config`](crate::Config) (or directly in tests) and
/// only read afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildContext {
    source_dir: PathBuf,
    output_dir: PathBuf,
    sub_path: Option<String>,
    cache_enabled: bool,
    toc_max_depth: usize,
    site_name: String,
}

impl BuildContext {
    /// Context with caching on, no sub-path, and default TOC depth.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            sub_path: None,
            cache_enabled: true,
            toc_max_depth: DEFAULT_TOC_MAX_DEPTH,
            site_name: "Documentation".to_owned(),
        }
    }

    /// Restrict the build to one subtree.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `sub_path` is empty or leaves
    /// the source root.
    pub fn with_sub_path(mut self, sub_path: &str) -> Result<Self, ConfigError> {
        self.sub_path = Some(normalize_sub_path(sub_path)?);
        Ok(self)
    }

    /// Set a sub-path that already went through [`normalize_sub_path`].
    pub(crate) fn with_normalized_sub_path(mut self, sub_path: String) -> Self {
        self.sub_path = Some(sub_path);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_toc_max_depth(mut self, depth: usize) -> Self {
        self.toc_max_depth = depth.max(1);
        self
    }

    #[must_use]
    pub fn with_site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = name.into();
        self
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Sub-path restriction, without leading or trailing slashes.
    pub fn sub_path(&self) -> Option<&str> {
        self.sub_path.as_deref()
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn toc_max_depth(&self) -> usize {
        self.toc_max_depth
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// Directory holding the metadata cache (`<output>/.cache`).
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.output_dir.join(".cache")
    }

    /// Directory discovery starts from: the source root or the sub-path inside it.
    #[must_use]
    pub fn scan_root(&self) -> PathBuf {
        match &self.sub_path {
            Some(sub) => self.source_dir.join(sub),
            None => self.source_dir.clone(),
        }
    }

    /// Logical path of the document the build is rooted at.
    #[must_use]
    pub fn root_document(&self) -> String {
        match &self.sub_path {
            Some(sub) => format!("{sub}/index"),
            None => "index".to_owned(),
        }
    }
}

/// Normalize a `--parse-sub-path` value to `a/b` form.
///
/// # Errors
///
/// Returns `ConfigError::Validation` for an empty path or one containing
/// `.` or `..` segments.
pub fn normalize_sub_path(sub_path: &str) -> Result<String, ConfigError> {
    let segments: Vec<&str> = sub_path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        return Err(ConfigError::Validation(
            "sub-path cannot be empty".to_owned(),
        ));
    }
    if segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(ConfigError::Validation(format!(
            "sub-path must stay inside the source directory: {sub_path}"
        )));
    }

    Ok(segments.join("/"))
}
