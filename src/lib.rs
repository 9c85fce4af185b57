//! # Portfolio Manifest
//!
//! Builds the `data.json` manifest a static portfolio gallery renders from.
//! Your filesystem is the data source: every `{category}/{project}/` folder
//! holding a `metadata.json` becomes a project, and its images are listed
//! with URLs pointing either at the site itself or at a versioned release of
//! the repository.
//!
//! # Pipeline
//!
//! ```text
//! optimize   images/*.png  →  images/*.webp + thumbnail.webp   (optional)
//! generate   portfolio/    →  data.json
//! ```
//!
//! Both commands read the same tree and share [`scan`]. Optimizing first
//! lets the manifest prefer the compressed WebP copies.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`manifest`] | Builds projects and categories, resolves image URLs, writes `data.json` |
//! | [`scan`] | Finds project folders, lists images, finds local thumbnails |
//! | [`metadata`] | Reads `metadata.json` and applies title/description fallbacks |
//! | [`naming`] | Category display names, release asset names, title ordering |
//! | [`types`] | Types serialized into `data.json` |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`optimize`] | WebP conversion and square thumbnails over the whole tree |
//! | [`imaging`] | Pure-Rust image operations behind a backend trait |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## One Hosting Strategy Per Project
//!
//! A project either serves images from the content tree or from a release,
//! never a mix. The choice ([`types::ImageSource`]) is made once from
//! `releaseVersion` and every URL of the project goes through it, so a
//! manifest can never point half a gallery at the wrong host.
//!
//! ## Skip, Don't Abort
//!
//! A broken `metadata.json` in one project must not take the whole gallery
//! down. Per-project failures are collected in
//! [`manifest::BuildResult::skipped`]; only an unreadable root or a write
//! failure stops a run.
//!
//! ## Deterministic Output
//!
//! Folders are read in sorted order, categories are keyed by name and
//! projects are sorted by title with category/id tie-breaks. Apart from the
//! `generated` timestamp, two runs over the same tree write the same file.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod manifest;
pub mod metadata;
pub mod naming;
pub mod optimize;
pub mod output;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
