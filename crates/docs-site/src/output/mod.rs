//! Output dispatch after rendering.
//!
//! A full build exports one JSON record per page; a sub-path build
//! concatenates its pages into a single HTML file for PDF conversion.

mod json;
mod pdf;

use std::fs;
use std::path::{Path, PathBuf};

use docs_config::BuildContext;

use crate::error::BuildError;
use crate::renderer::RenderedPage;

pub use json::JsonPage;

/// Which export runs after rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// One JSON record per page under `_json/`.
    Json,
    /// The pages under `sub_path` concatenated into one HTML file.
    Pdf { sub_path: String },
}

impl OutputMode {
    pub fn for_context(context: &BuildContext) -> Self {
        match context.sub_path() {
            Some(sub_path) => Self::Pdf {
                sub_path: sub_path.to_owned(),
            },
            None => Self::Json,
        }
    }
}

/// What the dispatch wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchSummary {
    pub mode: OutputMode,
    pub files: Vec<PathBuf>,
}

/// Run the export for `mode` over pages in document order.
pub fn dispatch(
    mode: &OutputMode,
    pages: &[RenderedPage],
    output_dir: &Path,
    site_name: &str,
) -> Result<DispatchSummary, BuildError> {
    let files = match mode {
        OutputMode::Json => json::export(pages, output_dir)?,
        OutputMode::Pdf { sub_path } => vec![pdf::export(pages, sub_path, output_dir, site_name)?],
    };
    tracing::info!(mode = ?mode, files = files.len(), "Output dispatched");
    Ok(DispatchSummary {
        mode: mode.clone(),
        files,
    })
}

/// Write `contents`, creating parent directories.
pub(crate) fn write_file(path: &Path, contents: &[u8]) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}
