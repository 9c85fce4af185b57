//! Filesystem scanning for portfolio projects.
//!
//! The filesystem half of the manifest build. Finds project descriptors,
//! lists each project's images and looks for a local thumbnail. Nothing in
//! here knows about URLs or hosting; see [`crate::manifest`] for that.
//!
//! ## Directory Structure
//!
//! ```text
//! portfolio/                       # Portfolio root
//! ├── config.toml                  # Optional configuration
//! ├── 3D/                          # Category
//! │   ├── robot/                   # Project (id = "robot")
//! │   │   ├── metadata.json        # Required: makes the folder a project
//! │   │   ├── thumbnail.webp       # Optional local thumbnail
//! │   │   └── images/
//! │   │       ├── front.png
//! │   │       ├── front.webp       # Wins over front.png
//! │   │       └── side.jpg
//! │   └── drafts/                  # No metadata.json = not a project
//! └── web-design/
//!     └── shop/
//!         └── metadata.json        # No images/ = zero images
//! ```
//!
//! ## Rules
//!
//! - Only the two-level `{category}/{project}/metadata.json` shape counts.
//! - Hidden entries (leading `.`) are ignored at every level.
//! - Names that are not valid UTF-8 cannot become URLs; they are logged and
//!   ignored, as are entries the OS fails to read.
//! - Accepted image extensions: webp, png, jpg, jpeg (case-insensitive).
//! - When a WebP and a raster file share a stem, only the WebP is kept.
//! - A missing `images/` folder means zero images, never an error.

use crate::metadata::METADATA_FILENAME;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("Portfolio root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Portfolio root name is not valid UTF-8: {0} (set [site] content_dir)")]
    NonUtf8Root(PathBuf),
}

/// Subfolder of a project holding its images.
pub const IMAGES_DIR: &str = "images";

pub const IMAGE_EXTENSIONS: &[&str] = &["webp", "png", "jpg", "jpeg"];

/// Local thumbnail filenames, in priority order.
pub const THUMBNAIL_CANDIDATES: &[&str] = &["thumbnail.webp", "thumbnail.jpg", "thumbnail.png"];

/// A project folder found under the portfolio root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDir {
    /// Category folder name.
    pub category: String,
    /// Project folder name.
    pub id: String,
    /// Absolute (or root-relative) path of the project folder.
    pub dir: PathBuf,
}

impl ProjectDir {
    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILENAME)
    }

    /// `category/id`, for messages.
    pub fn label(&self) -> String {
        format!("{}/{}", self.category, self.id)
    }
}

/// Find every `{category}/{project}/metadata.json` under `root`.
///
/// Results are ordered by category, then project folder name. An unreadable
/// category folder is logged and skipped; an unreadable root is fatal.
pub fn discover_projects(root: &Path) -> Result<Vec<ProjectDir>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut projects = Vec::new();
    for category in visible_entries(root)?.into_iter().filter(|e| e.path.is_dir()) {
        let project_dirs = match visible_entries(&category.path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %category.path.display(), error = %e, "skipping unreadable category");
                continue;
            }
        };
        for project in project_dirs.into_iter().filter(|e| e.path.is_dir()) {
            if !project.path.join(METADATA_FILENAME).is_file() {
                tracing::debug!(path = %project.path.display(), "no metadata.json, not a project");
                continue;
            }
            projects.push(ProjectDir {
                category: category.name.clone(),
                id: project.name,
                dir: project.path,
            });
        }
    }
    Ok(projects)
}

/// List a project's images, sorted by filename, WebP preferred.
///
/// Returns filenames relative to the `images/` folder.
pub fn discover_images(project_dir: &Path) -> io::Result<Vec<String>> {
    Ok(prefer_webp(list_images(project_dir)?))
}

/// Every image file in `images/`, sorted by filename, no de-duplication.
///
/// A missing `images/` folder yields an empty list.
pub fn list_images(project_dir: &Path) -> io::Result<Vec<String>> {
    let images_dir = project_dir.join(IMAGES_DIR);
    let entries = match visible_entries(&images_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    Ok(entries
        .into_iter()
        .filter(|e| e.path.is_file() && is_image(&e.path))
        .map(|e| e.name)
        .collect())
}

/// Drop raster files whose stem also exists as a WebP.
///
/// Order of the surviving names is preserved.
pub fn prefer_webp(filenames: Vec<String>) -> Vec<String> {
    let webp_stems: HashSet<String> = filenames
        .iter()
        .filter(|name| is_webp(Path::new(name)))
        .map(|name| stem(name))
        .collect();

    filenames
        .into_iter()
        .filter(|name| is_webp(Path::new(name)) || !webp_stems.contains(&stem(name)))
        .collect()
}

/// Map a filename listed in `metadata.images` onto a discovered file.
///
/// An exact match wins; otherwise a WebP with the same stem stands in for a
/// raster name that was dropped in favor of it.
pub fn resolve_listed_image<'a>(discovered: &'a [String], listed: &str) -> Option<&'a str> {
    if let Some(exact) = discovered.iter().find(|name| name.as_str() == listed) {
        return Some(exact.as_str());
    }
    let listed_stem = stem(listed);
    discovered
        .iter()
        .find(|name| is_webp(Path::new(name.as_str())) && stem(name) == listed_stem)
        .map(String::as_str)
}

/// Look for a local thumbnail next to `metadata.json`.
///
/// Returns the first existing candidate filename from [`THUMBNAIL_CANDIDATES`].
pub fn find_local_thumbnail(project_dir: &Path) -> Option<&'static str> {
    THUMBNAIL_CANDIDATES
        .iter()
        .copied()
        .find(|name| project_dir.join(name).is_file())
}

pub fn is_image(path: &Path) -> bool {
    extension(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

pub fn is_webp(path: &Path) -> bool {
    extension(path).is_some_and(|ext| ext == "webp")
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

fn stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A directory entry with a UTF-8 name.
#[derive(Debug)]
struct NamedEntry {
    name: String,
    path: PathBuf,
}

/// Sorted, non-hidden entries of a directory.
///
/// Only failing to open `path` is an error. Unreadable entries and names
/// that are not valid UTF-8 are logged and left out.
fn visible_entries(path: &Path) -> io::Result<Vec<NamedEntry>> {
    let mut entries: Vec<NamedEntry> = readable(path, fs::read_dir(path)?)
        .into_iter()
        .map(|e| e.path())
        .filter(|p| !is_hidden(p))
        .filter_map(named)
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Keep the entries that were read, warn about the rest.
fn readable<T>(dir: &Path, entries: impl IntoIterator<Item = io::Result<T>>) -> Vec<T> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .collect()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.as_encoded_bytes().starts_with(b"."))
}

fn named(path: PathBuf) -> Option<NamedEntry> {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => Some(NamedEntry {
            name: name.to_string(),
            path,
        }),
        None => {
            tracing::warn!(path = %path.display(), "skipping name that is not valid UTF-8");
            None
        }
    }
}
