//! Static assets copied next to the rendered pages.

use std::fs;
use std::path::Path;

use crate::error::BuildError;

/// Directory at the source root whose contents are copied verbatim.
pub const IMAGES_DIR: &str = "_images";

/// Copy `<source>/_images` to `<output>/_images`.
///
/// Files whose copy is at least as new as the source are skipped. Returns
/// the number of files copied; a missing `_images` directory copies nothing.
pub fn copy_images(source_dir: &Path, output_dir: &Path) -> Result<usize, BuildError> {
    let src = source_dir.join(IMAGES_DIR);
    if !src.is_dir() {
        return Ok(0);
    }
    let mut count = 0;
    copy_dir_recursive(&src, &output_dir.join(IMAGES_DIR), &mut count)?;
    tracing::info!(files = count, "Copied images");
    Ok(count)
}

fn copy_dir_recursive(src_dir: &Path, dest_dir: &Path, count: &mut usize) -> Result<(), BuildError> {
    let entries = fs::read_dir(src_dir).map_err(|source| BuildError::Read {
        path: src_dir.to_path_buf(),
        source,
    })?;
    fs::create_dir_all(dest_dir).map_err(|source| BuildError::Write {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    for entry in entries.filter_map(Result::ok) {
        let src_path = entry.path();
        let dest_path = dest_dir.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path, count)?;
        } else if !is_fresh(&src_path, &dest_path) {
            fs::copy(&src_path, &dest_path).map_err(|source| BuildError::Write {
                path: dest_path.clone(),
                source,
            })?;
            *count += 1;
        }
    }
    Ok(())
}

/// Whether `dest` exists and is not older than `src`.
fn is_fresh(src: &Path, dest: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|meta| meta.modified()).ok();
    match (modified(src), modified(dest)) {
        (Some(src_time), Some(dest_time)) => dest_time >= src_time,
        _ => false,
    }
}
