//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`operations`](super::operations) module (which
//! decides which files to write) and the [`backend`](super::backend) (which
//! does the pixel work), so tests can swap in a recording backend.

use std::path::PathBuf;

/// Re-encode a raster image as WebP at full size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Square, center-cropped thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Edge length in pixels.
    pub size: u32,
}
