//! High-level image operations.
//!
//! These functions decide where outputs go and whether they need
//! rebuilding, then hand the pixel work to the backend.

use super::backend::{BackendError, ImageBackend};
use super::params::{ConvertParams, ThumbnailParams};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Filename of the generated per-project thumbnail.
pub const THUMBNAIL_FILENAME: &str = "thumbnail.webp";

/// Sibling WebP path for a raster image: `images/a.png` → `images/a.webp`.
pub fn webp_path(source: &Path) -> PathBuf {
    source.with_extension("webp")
}

/// Thumbnail path for a project folder.
pub fn thumbnail_path(project_dir: &Path) -> PathBuf {
    project_dir.join(THUMBNAIL_FILENAME)
}

/// True when `output` exists and is at least as new as `source`.
///
/// Any metadata error counts as stale.
pub fn is_up_to_date(source: &Path, output: &Path) -> bool {
    let modified = |path: &Path| std::fs::metadata(path).and_then(|m| m.modified());
    match (modified(source), modified(output)) {
        (Ok(src), Ok(out)) => out >= src,
        _ => false,
    }
}

/// Convert `source` to its sibling WebP. Returns the written path.
pub fn create_webp(backend: &impl ImageBackend, source: &Path) -> Result<PathBuf> {
    let output = webp_path(source);
    backend.convert(&ConvertParams {
        source: source.to_path_buf(),
        output: output.clone(),
    })?;
    Ok(output)
}

/// Write `{project_dir}/thumbnail.webp`, a `size`×`size` center crop of `source`.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    project_dir: &Path,
    size: u32,
) -> Result<PathBuf> {
    let output = thumbnail_path(project_dir);
    backend.thumbnail(&ThumbnailParams {
        source: source.to_path_buf(),
        output: output.clone(),
        size,
    })?;
    Ok(output)
}
