//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image` crate (pure Rust decoders) |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder::new_lossless` |
//! | Thumbnail crop | `image::DynamicImage::resize_to_fill` (Lanczos3) |
//!
//! The `image` crate only ships a lossless WebP encoder, so converted files
//! keep every pixel of the source.

use super::backend::{BackendError, ImageBackend};
use super::params::{ConvertParams, ThumbnailParams};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode as lossless WebP.
///
/// The encoder takes 8-bit RGB or RGBA only; other layouts (16-bit PNG,
/// grayscale) are converted first. Alpha is kept only when the source has it.
fn save_webp(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let pixels = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    pixels
        .write_with_encoder(WebPEncoder::new_lossless(writer))
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        save_webp(&img, &params.output)
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let filled = img.resize_to_fill(params.size, params.size, FilterType::Lanczos3);
        save_webp(&filled, &params.output)
    }
}
