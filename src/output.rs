//! CLI output formatting for the manifest build and the optimizer.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (category, project) is its semantic identity (display
//! name or title and positional index), with filesystem paths shown as
//! secondary context via indented `Source:` lines.
//!
//! # Output Format
//!
//! ## Build (`generate` / `check`)
//!
//! ```text
//! Categories
//! 001 3D (2 projects)
//!     001 Robot
//!         Source: 3D/robot/
//!         Images: 3 (repo)
//!         Thumbnail: thumbnail.webp
//!     002 Spaceship
//!         Source: 3D/spaceship/
//!         Images: 2 (release v20240611)
//!         Thumbnail: first image
//!
//! Skipped
//!     illustration/broken/metadata.json
//!         Error: expected value at line 1 column 1
//!
//! Manifest: 2 projects in 1 category, 1 skipped
//! ```
//!
//! ## Optimize
//!
//! ```text
//! 3D/robot/images/front.png → front.webp
//!     1.50 KB → 512 B (66.7% smaller)
//! 3D/robot/images/side.jpg: up to date
//! 3D/robot → thumbnail.webp
//!     Source: 3D/robot/images/front.png
//!
//! Converted 1 image (1 up to date, 0 failed), saved 1.00 KB
//! Thumbnails: 1 created, 0 up to date, 0 failed
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::manifest::BuildResult;
use crate::optimize::{OptimizeEvent, OptimizeReport};
use crate::scan::{IMAGES_DIR, THUMBNAIL_CANDIDATES};
use crate::types::{Project, SourceKind};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 project`, `2 projects`.
fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// Human-readable byte count, 1024-based, two decimals above bytes.
///
/// ```text
/// 0 → "0 B"     1536 → "1.50 KB"     -2048 → "-2.00 KB"
/// ```
pub fn format_bytes(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let sign = if bytes < 0 { "-" } else { "" };
    let mut value = bytes.unsigned_abs() as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{}{} B", sign, bytes.unsigned_abs())
    } else {
        format!("{}{:.2} {}", sign, value, UNITS[unit])
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Describe where a project's thumbnail comes from.
fn thumbnail_label(project: &Project) -> String {
    let Some(url) = project.thumbnail.as_deref() else {
        return "none".to_string();
    };
    let first_image = project.images.first().map(|i| i.url.as_str());
    if first_image == Some(url) {
        return "first image".to_string();
    }
    // Local thumbnails sit next to metadata.json, not under images/
    let file = url.rsplit('/').next().unwrap_or(url);
    if project.image_source == SourceKind::Repo
        && THUMBNAIL_CANDIDATES.contains(&file)
        && !url.contains(&format!("/{}/", IMAGES_DIR))
    {
        file.to_string()
    } else {
        url.to_string()
    }
}

fn image_source_label(project: &Project) -> String {
    match &project.release_version {
        Some(version) if project.image_source == SourceKind::Release => {
            format!("release {}", version)
        }
        _ => "repo".to_string(),
    }
}

/// Format the result of a manifest build.
///
/// Projects are grouped under their category, in manifest order.
/// Skipped projects are listed with their error, paths shown relative to
/// `source_root`.
pub fn format_build_output(result: &BuildResult, source_root: &Path) -> Vec<String> {
    let manifest = &result.manifest;
    let mut lines = Vec::new();

    lines.push("Categories".to_string());
    for (i, category) in manifest.categories.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            category.display_name,
            plural(category.project_count, "project", "projects")
        ));

        let projects = manifest
            .projects
            .iter()
            .filter(|p| p.category == category.name);
        for (j, project) in projects.enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(j + 1), project.title));
            lines.push(format!(
                "{}Source: {}/{}/",
                indent(2),
                project.category,
                project.id
            ));
            lines.push(format!(
                "{}Images: {} ({})",
                indent(2),
                project.images.len(),
                image_source_label(project)
            ));
            lines.push(format!("{}Thumbnail: {}", indent(2), thumbnail_label(project)));
        }
    }

    if !result.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skipped in &result.skipped {
            let path = skipped
                .path
                .strip_prefix(source_root)
                .unwrap_or(&skipped.path);
            lines.push(format!("{}{}", indent(1), path.display()));
            lines.push(format!("{}Error: {}", indent(2), skipped.error));
        }
    }

    lines.push(String::new());
    let mut summary = format!(
        "Manifest: {} in {}",
        plural(manifest.projects.len(), "project", "projects"),
        plural(manifest.categories.len(), "category", "categories")
    );
    if !result.skipped.is_empty() {
        summary.push_str(&format!(", {} skipped", result.skipped.len()));
    }
    lines.push(summary);

    lines
}

/// Print build output to stdout.
pub fn print_build_output(result: &BuildResult, source_root: &Path) {
    for line in format_build_output(result, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Optimize output
// ============================================================================

/// Format a single optimizer progress event as display lines.
pub fn format_optimize_event(event: &OptimizeEvent) -> Vec<String> {
    match event {
        OptimizeEvent::Converted {
            source,
            original_bytes,
            webp_bytes,
        } => {
            let webp_name = Path::new(source)
                .with_extension("webp")
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            let saved = *original_bytes as i64 - *webp_bytes as i64;
            let percent = if *original_bytes == 0 {
                0.0
            } else {
                saved as f64 / *original_bytes as f64 * 100.0
            };
            let change = if saved >= 0 {
                format!("{:.1}% smaller", percent)
            } else {
                format!("{:.1}% larger", -percent)
            };
            vec![
                format!("{} \u{2192} {}", source, webp_name),
                format!(
                    "{}{} \u{2192} {} ({})",
                    indent(1),
                    format_bytes(*original_bytes as i64),
                    format_bytes(*webp_bytes as i64),
                    change
                ),
            ]
        }
        OptimizeEvent::Skipped { source } => vec![format!("{}: up to date", source)],
        OptimizeEvent::Failed { source, error } => vec![
            format!("{}: FAILED", source),
            format!("{}Error: {}", indent(1), error),
        ],
        OptimizeEvent::Collision {
            source,
            converted_from,
        } => vec![
            format!("{}: not converted", source),
            format!("{}WebP name taken by {}", indent(1), converted_from),
        ],
        OptimizeEvent::ThumbnailCreated { project, source } => vec![
            format!("{} \u{2192} thumbnail.webp", project),
            format!("{}Source: {}", indent(1), source),
        ],
        OptimizeEvent::ThumbnailSkipped { project } => {
            vec![format!("{}: thumbnail up to date", project)]
        }
        OptimizeEvent::ThumbnailFailed { project, error } => vec![
            format!("{}: thumbnail FAILED", project),
            format!("{}Error: {}", indent(1), error),
        ],
        OptimizeEvent::NoImages { project } => {
            vec![format!("{}: no images for a thumbnail", project)]
        }
    }
}

/// Format the closing summary of an optimizer run.
pub fn format_optimize_summary(report: &OptimizeReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Converted {} ({} up to date, {} failed), saved {}",
            plural(report.converted, "image", "images"),
            report.skipped,
            report.failed,
            format_bytes(report.bytes_saved)
        ),
        format!(
            "Thumbnails: {} created, {} up to date, {} failed",
            report.thumbnails, report.thumbnails_skipped, report.thumbnail_failures
        ),
    ];
    if report.collisions > 0 {
        lines.push(format!(
            "{} skipped: same name as another image, rename to convert",
            plural(report.collisions, "image", "images")
        ));
    }
    lines
}

/// Print the optimizer summary to stdout.
pub fn print_optimize_summary(report: &OptimizeReport) {
    for line in format_optimize_summary(report) {
        println!("{}", line);
    }
}
