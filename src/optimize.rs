//! WebP conversion and project thumbnails.
//!
//! Prepares a portfolio tree so the manifest build can prefer compressed
//! images. Two passes run over the portfolio root:
//!
//! 1. **Convert**: every `images/*.{png,jpg,jpeg}` gets a sibling `.webp`.
//!    Conversions run in parallel on the rayon pool.
//! 2. **Thumbnails**: every project gets `thumbnail.webp`, a square center
//!    crop of its first raster image (`[thumbnails] size` pixels per edge).
//!
//! ```text
//! 3D/robot/
//! ├── metadata.json
//! ├── thumbnail.webp       ← pass 2, from images/front.png
//! └── images/
//!     ├── front.png
//!     ├── front.webp       ← pass 1
//!     ├── side.jpg
//!     └── side.webp        ← pass 1
//! ```
//!
//! Outputs at least as new as their source are left alone unless `force` is
//! set. When two rasters share a stem (`a.jpg`, `a.png`) only the first by
//! filename is converted; the rest are reported as
//! [`OptimizeEvent::Collision`]. A failing image never aborts the run; it is reported as an
//! [`OptimizeEvent::Failed`] and counted in the [`OptimizeReport`].

use crate::config::{self, SiteConfig};
use crate::imaging::{
    ImageBackend, RustBackend, create_thumbnail, create_webp, is_up_to_date, thumbnail_path,
    webp_path,
};
use crate::scan::{self, IMAGES_DIR, ProjectDir, ScanError};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Raster formats that get a WebP sibling.
pub const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Progress of a single unit of optimizer work.
///
/// Paths are relative to the portfolio root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimizeEvent {
    Converted {
        source: String,
        original_bytes: u64,
        webp_bytes: u64,
    },
    /// WebP already newer than its source.
    Skipped { source: String },
    Failed { source: String, error: String },
    /// Another raster with the same stem already owns the `.webp` output.
    Collision { source: String, converted_from: String },
    ThumbnailCreated { project: String, source: String },
    ThumbnailSkipped { project: String },
    ThumbnailFailed { project: String, error: String },
    /// Project has no image to cut a thumbnail from.
    NoImages { project: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizeReport {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub collisions: usize,
    pub thumbnails: usize,
    pub thumbnails_skipped: usize,
    pub thumbnail_failures: usize,
    /// Sum of `original - webp` over converted images. Negative when WebP
    /// came out larger.
    pub bytes_saved: i64,
}

impl OptimizeReport {
    fn record(&mut self, event: &OptimizeEvent) {
        match event {
            OptimizeEvent::Converted {
                original_bytes,
                webp_bytes,
                ..
            } => {
                self.converted += 1;
                self.bytes_saved += *original_bytes as i64 - *webp_bytes as i64;
            }
            OptimizeEvent::Skipped { .. } => self.skipped += 1,
            OptimizeEvent::Failed { .. } => self.failed += 1,
            OptimizeEvent::Collision { .. } => self.collisions += 1,
            OptimizeEvent::ThumbnailCreated { .. } => self.thumbnails += 1,
            OptimizeEvent::ThumbnailSkipped { .. } => self.thumbnails_skipped += 1,
            OptimizeEvent::ThumbnailFailed { .. } => self.thumbnail_failures += 1,
            OptimizeEvent::NoImages { .. } => {}
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.thumbnail_failures > 0
    }
}

/// Optimize the portfolio at `root` with the pure Rust backend.
///
/// Reads `config.toml` from `root` for the thumbnail size.
pub fn optimize(
    root: &Path,
    force: bool,
    progress: Option<Sender<OptimizeEvent>>,
) -> Result<OptimizeReport, OptimizeError> {
    let config = config::load_config(root)?;
    optimize_with_backend(&RustBackend::new(), root, &config, force, progress)
}

/// Optimize using a specific backend (allows testing with mock).
pub fn optimize_with_backend(
    backend: &impl ImageBackend,
    root: &Path,
    config: &SiteConfig,
    force: bool,
    progress: Option<Sender<OptimizeEvent>>,
) -> Result<OptimizeReport, OptimizeError> {
    let emit = |event: OptimizeEvent| -> OptimizeEvent {
        if let Some(tx) = &progress {
            // Receiver gone means nobody is printing; keep working.
            tx.send(event.clone()).ok();
        }
        event
    };

    let (sources, shadowed) = claim_outputs(find_raster_images(root)?);
    tracing::info!(root = %root.display(), count = sources.len(), "converting images to WebP");

    let collisions: Vec<OptimizeEvent> = shadowed
        .iter()
        .map(|(source, owner)| {
            let (source, converted_from) = (relative(root, source), relative(root, owner));
            tracing::warn!(%source, %converted_from, "WebP name already taken, not converting");
            emit(OptimizeEvent::Collision {
                source,
                converted_from,
            })
        })
        .collect();

    let conversions: Vec<OptimizeEvent> = sources
        .par_iter()
        .map(|source| emit(convert_one(backend, root, source, force)))
        .collect();

    let projects = scan::discover_projects(root)?;
    tracing::info!(count = projects.len(), "generating project thumbnails");

    let thumbnails: Vec<OptimizeEvent> = projects
        .iter()
        .map(|project| emit(thumbnail_one(backend, root, project, config.thumbnails.size, force)))
        .collect();

    let mut report = OptimizeReport::default();
    for event in collisions.iter().chain(&conversions).chain(&thumbnails) {
        report.record(event);
    }
    Ok(report)
}

/// Every raster file directly inside an `images/` folder, sorted by path.
///
/// Hidden files and folders are skipped.
pub fn find_raster_images(root: &Path) -> Result<Vec<PathBuf>, OptimizeError> {
    let mut found = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_raster(entry.path()) {
            continue;
        }
        let in_images_dir = entry
            .path()
            .parent()
            .and_then(|p| p.file_name())
            .is_some_and(|name| name == IMAGES_DIR);
        if in_images_dir {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Give every `.webp` output exactly one source.
///
/// Returns the owners in input order, and every other source paired with
/// the owner it lost to. Input is sorted, so `a.jpg` beats `a.png`.
fn claim_outputs(sources: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<(PathBuf, PathBuf)>) {
    let mut owners: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
    let mut claimed = Vec::with_capacity(sources.len());
    let mut shadowed = Vec::new();
    for source in sources {
        match owners.entry(webp_path(&source)) {
            Entry::Vacant(slot) => {
                slot.insert(source.clone());
                claimed.push(source);
            }
            Entry::Occupied(slot) => shadowed.push((source, slot.get().clone())),
        }
    }
    (claimed, shadowed)
}

/// Pick the image a project thumbnail is cut from.
///
/// First raster image by filename; a WebP only when there is no raster.
pub fn thumbnail_source(project_dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let images = scan::list_images(project_dir)?;
    let pick = images
        .iter()
        .find(|name| is_raster(Path::new(name)))
        .or_else(|| images.first());
    Ok(pick.map(|name| project_dir.join(IMAGES_DIR).join(name)))
}

fn is_raster(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| RASTER_EXTENSIONS.contains(&ext.as_str()))
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn convert_one(
    backend: &impl ImageBackend,
    root: &Path,
    source: &Path,
    force: bool,
) -> OptimizeEvent {
    let label = relative(root, source);
    if !force && is_up_to_date(source, &webp_path(source)) {
        tracing::debug!(source = %label, "WebP up to date");
        return OptimizeEvent::Skipped { source: label };
    }

    let result = std::fs::metadata(source)
        .map_err(|e| e.to_string())
        .and_then(|original| {
            let output = create_webp(backend, source).map_err(|e| e.to_string())?;
            let webp = std::fs::metadata(&output).map_err(|e| e.to_string())?;
            Ok((original.len(), webp.len()))
        });

    match result {
        Ok((original_bytes, webp_bytes)) => OptimizeEvent::Converted {
            source: label,
            original_bytes,
            webp_bytes,
        },
        Err(error) => {
            tracing::warn!(source = %label, %error, "conversion failed");
            OptimizeEvent::Failed {
                source: label,
                error,
            }
        }
    }
}

fn thumbnail_one(
    backend: &impl ImageBackend,
    root: &Path,
    project: &ProjectDir,
    size: u32,
    force: bool,
) -> OptimizeEvent {
    let label = project.label();
    let source = match thumbnail_source(&project.dir) {
        Ok(Some(source)) => source,
        Ok(None) => return OptimizeEvent::NoImages { project: label },
        Err(e) => {
            tracing::warn!(project = %label, error = %e, "cannot list images");
            return OptimizeEvent::ThumbnailFailed {
                project: label,
                error: e.to_string(),
            };
        }
    };

    if !force && is_up_to_date(&source, &thumbnail_path(&project.dir)) {
        return OptimizeEvent::ThumbnailSkipped { project: label };
    }

    match create_thumbnail(backend, &source, &project.dir, size) {
        Ok(_) => OptimizeEvent::ThumbnailCreated {
            project: label,
            source: relative(root, &source),
        },
        Err(e) => {
            tracing::warn!(project = %label, error = %e, "thumbnail failed");
            OptimizeEvent::ThumbnailFailed {
                project: label,
                error: e.to_string(),
            }
        }
    }
}
