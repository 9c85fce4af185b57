//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the optimizer
//! needs: full-size WebP conversion and square thumbnails. The production
//! implementation is [`RustBackend`](super::rust_backend::RustBackend).

use super::params::{ConvertParams, ThumbnailParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// `Sync` so one backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Re-encode `params.source` as WebP at `params.output`.
    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError>;

    /// Execute a thumbnail operation (resize to fill + center crop).
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}
