//! Image conversion in pure Rust, no system tools.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (PNG, JPEG, WebP) |
//! | **Convert → WebP** | `image::codecs::webp::WebPEncoder` (lossless) |
//! | **Thumbnail** | `resize_to_fill` (Lanczos3, center crop) → WebP |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Path planning and staleness checks around the backend

pub mod backend;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use operations::{
    create_thumbnail, create_webp, is_up_to_date, thumbnail_path, webp_path,
};
pub use params::{ConvertParams, ThumbnailParams};
pub use rust_backend::RustBackend;
