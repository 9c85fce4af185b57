//! Manifest building: projects, categories and image URLs.
//!
//! Turns the folders found by [`crate::scan`] into the [`Manifest`] the
//! gallery client renders. Each project is built independently and yields a
//! `Result`; failures are logged and reported as [`SkippedProject`]s while
//! the rest of the run carries on.
//!
//! ## Image hosting
//!
//! Each project picks one [`ImageSource`] from its `releaseVersion`:
//!
//! | | Repo | Release |
//! |---|---|---|
//! | Image URL | `{base_path}{path}/images/{file}` | `{repository}/releases/download/{version}/{category}_{id}_{file}` |
//! | Image list | `metadata.images` order, else `images/` scan | `metadata.images`, else `images/` scan |
//! | Thumbnail | `thumbnail.{webp,jpg,png}` → first image → null | `metadata.thumbnail` → first image → null |
//!
//! In repo mode every listed name must exist on disk; a raster name is
//! served by its WebP sibling when the optimizer has produced one.
//!
//! ## Output order
//!
//! Categories are ordered by folder name. Projects are ordered by title
//! (see [`naming::TitleCollator`]), ties broken by category and id, so two
//! runs over the same tree produce identical arrays.

use crate::config::{self, SiteConfig};
use crate::metadata::{self, MetadataError, ProjectMetadata};
use crate::naming;
use crate::scan::{self, ProjectDir, ScanError};
use crate::types::{Category, ImageRef, ImageSource, Manifest, Project};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default output filename.
pub const OUTPUT_FILENAME: &str = "data.json";

/// Why a single project was left out of the manifest.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("cannot list images: {0}")]
    Images(#[source] io::Error),
}

#[derive(Debug)]
pub struct SkippedProject {
    /// The project's `metadata.json`.
    pub path: PathBuf,
    pub error: ProjectError,
}

/// Outcome of a manifest build.
#[derive(Debug)]
pub struct BuildResult {
    pub manifest: Manifest,
    pub skipped: Vec<SkippedProject>,
}

/// Build the manifest for the portfolio at `root`, using its `config.toml`.
pub fn build(root: &Path) -> Result<BuildResult, ScanError> {
    let config = config::load_config(root)?;
    build_with_config(root, &config)
}

pub fn build_with_config(root: &Path, config: &SiteConfig) -> Result<BuildResult, ScanError> {
    build_at(root, config, Utc::now())
}

/// Build with an explicit `generated` timestamp.
pub fn build_at(
    root: &Path,
    config: &SiteConfig,
    generated: DateTime<Utc>,
) -> Result<BuildResult, ScanError> {
    let content_dir = content_dir(root, config)?;
    let project_dirs = scan::discover_projects(root)?;
    tracing::info!(count = project_dirs.len(), root = %root.display(), "found projects");

    let mut categories: BTreeMap<String, Category> = BTreeMap::new();
    let mut projects = Vec::new();
    let mut skipped = Vec::new();

    for dir in &project_dirs {
        match build_project(dir, &content_dir, config) {
            Ok(project) => {
                tracing::debug!(project = %dir.label(), title = %project.title, images = project.images.len(), "built project");
                categories
                    .entry(project.category.clone())
                    .or_insert_with(|| Category {
                        name: project.category.clone(),
                        display_name: naming::format_category_name(&project.category),
                        project_count: 0,
                    })
                    .project_count += 1;
                projects.push(project);
            }
            Err(error) => {
                let path = dir.metadata_path();
                tracing::warn!(path = %path.display(), error = %error, "skipping project");
                skipped.push(SkippedProject { path, error });
            }
        }
    }

    let mut collator = naming::TitleCollator::new();
    projects.sort_by(|a, b| {
        collator
            .compare(&a.title, &b.title)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(BuildResult {
        manifest: Manifest {
            generated: generated.to_rfc3339_opts(SecondsFormat::Millis, true),
            categories: categories.into_values().collect(),
            projects,
        },
        skipped,
    })
}

/// Write the manifest as pretty-printed JSON, creating parent directories.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    std::fs::write(path, json)
}

/// Repository-relative prefix of project paths.
///
/// `site.content_dir` when configured, otherwise the name of the scanned
/// directory (resolving `.` and friends through the real path). A folder
/// name that is not valid UTF-8 cannot be a URL segment, so it must be
/// configured instead.
fn content_dir(root: &Path, config: &SiteConfig) -> Result<String, ScanError> {
    if let Some(dir) = &config.site.content_dir {
        return Ok(dir.trim().trim_matches('/').to_string());
    }
    let name = match root.file_name() {
        Some(name) => Some(name.to_os_string()),
        None => root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_os_string())),
    };
    match name {
        None => Ok(String::new()),
        Some(name) => name
            .into_string()
            .map_err(|_| ScanError::NonUtf8Root(root.to_path_buf())),
    }
}

fn build_project(
    dir: &ProjectDir,
    content_dir: &str,
    config: &SiteConfig,
) -> Result<Project, ProjectError> {
    let meta = metadata::read_metadata(&dir.metadata_path())?;
    let source = ImageSource::from_release_version(meta.release_version.as_deref());
    let discovered = scan::discover_images(&dir.dir).map_err(ProjectError::Images)?;

    let path = [content_dir, dir.category.as_str(), dir.id.as_str()]
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");

    let (images, thumbnail) = match &source {
        ImageSource::Repo => {
            let site_path = format!("{}{}", config.site.url_prefix(), path);
            let images = repo_images(dir, &meta, &discovered, &site_path);
            let thumbnail = scan::find_local_thumbnail(&dir.dir)
                .map(|name| format!("{site_path}/{name}"))
                .or_else(|| images.first().map(|img| img.url.clone()));
            (images, thumbnail)
        }
        ImageSource::Release(version) => {
            let base = config.release.download_base(version);
            let release_url =
                |name: &str| format!("{base}/{}", naming::release_asset_name(&dir.category, &dir.id, name));
            let names = meta.explicit_images().unwrap_or(discovered);
            let images: Vec<ImageRef> = names
                .into_iter()
                .map(|name| ImageRef {
                    url: release_url(&name),
                    name,
                    source: source.kind(),
                })
                .collect();
            let thumbnail = meta
                .thumbnail_name()
                .map(|name| release_url(&name))
                .or_else(|| images.first().map(|img| img.url.clone()));
            (images, thumbnail)
        }
    };

    Ok(Project {
        id: dir.id.clone(),
        title: meta.resolved_title(&dir.id),
        description: meta.resolved_description(),
        category: dir.category.clone(),
        path,
        thumbnail,
        images,
        release_version: source.release_version().map(String::from),
        image_source: source.kind(),
    })
}

/// Images served from the site, in `metadata.images` order when given.
fn repo_images(
    dir: &ProjectDir,
    meta: &ProjectMetadata,
    discovered: &[String],
    site_path: &str,
) -> Vec<ImageRef> {
    let names: Vec<&str> = match meta.explicit_images() {
        Some(listed) => listed
            .iter()
            .filter_map(|name| {
                let found = scan::resolve_listed_image(discovered, name);
                if found.is_none() {
                    tracing::warn!(project = %dir.label(), image = %name, "listed image not found in images/");
                }
                found
            })
            .collect(),
        None => discovered.iter().map(String::as_str).collect(),
    };

    names
        .into_iter()
        .map(|name| ImageRef {
            name: name.to_string(),
            url: format!("{site_path}/{}/{name}", scan::IMAGES_DIR),
            source: ImageSource::Repo.kind(),
        })
        .collect()
}
