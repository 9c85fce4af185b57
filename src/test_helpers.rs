//! Shared test utilities for the portfolio-manifest test suite.
//!
//! Provides portfolio-tree builders, fixture setup, manifest lookups and
//! invariant assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let dir = write_project(tmp.path(), "3D", "robot", r#"{"title":"Robot"}"#);
//! write_images(&dir, &["front.png", "front.webp"]);
//!
//! let manifest = build_with_config(tmp.path(), &SiteConfig::default()).unwrap().manifest;
//! assert_eq!(image_names(find_project(&manifest, "robot")), vec!["front.webp"]);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::types::{Category, Manifest, Project};

pub const REPO_URL: &str = "https://github.com/owner/portfolio";

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/portfolio/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/portfolio");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Create `{root}/{category}/{id}/metadata.json` and return the project folder.
pub fn write_project(root: &Path, category: &str, id: &str, metadata: &str) -> PathBuf {
    let dir = root.join(category).join(id);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("metadata.json"), metadata).unwrap();
    dir
}

/// Create placeholder files under `{project}/images/`.
///
/// The scanner only looks at extensions, so the content is not an image.
pub fn write_images(project_dir: &Path, names: &[&str]) {
    let images = project_dir.join("images");
    std::fs::create_dir_all(&images).unwrap();
    for name in names {
        std::fs::write(images.join(name), "fake image").unwrap();
    }
}

/// Default config with a release repository configured.
pub fn release_config(repository: &str) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.site.content_dir = Some("portfolio".to_string());
    config.release.repository = repository.to_string();
    config
}

// =========================================================================
// Manifest lookups (panic with a clear message on miss)
// =========================================================================

/// Find a project by id. Panics if not found or ambiguous.
pub fn find_project<'a>(manifest: &'a Manifest, id: &str) -> &'a Project {
    let matches: Vec<&Project> = manifest.projects.iter().filter(|p| p.id == id).collect();
    match matches.as_slice() {
        [project] => *project,
        [] => {
            let ids: Vec<&str> = manifest.projects.iter().map(|p| p.id.as_str()).collect();
            panic!("project '{id}' not found. Available: {ids:?}")
        }
        _ => panic!("project id '{id}' exists in several categories"),
    }
}

/// Find a category by folder name. Panics if not found.
pub fn find_category<'a>(manifest: &'a Manifest, name: &str) -> &'a Category {
    manifest
        .categories
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = manifest.categories.iter().map(|c| c.name.as_str()).collect();
            panic!("category '{name}' not found. Available: {names:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All project titles in manifest order.
pub fn project_titles(manifest: &Manifest) -> Vec<&str> {
    manifest.projects.iter().map(|p| p.title.as_str()).collect()
}

/// Image names of a project in order.
pub fn image_names(project: &Project) -> Vec<&str> {
    project.images.iter().map(|i| i.name.as_str()).collect()
}

/// Image URLs of a project in order.
pub fn image_urls(project: &Project) -> Vec<String> {
    project.images.iter().map(|i| i.url.clone()).collect()
}

// =========================================================================
// Invariants
// =========================================================================

/// Assert category counts agree with the project list.
pub fn assert_counts_consistent(manifest: &Manifest) {
    let total: usize = manifest.categories.iter().map(|c| c.project_count).sum();
    assert_eq!(total, manifest.projects.len(), "category counts vs projects");

    for project in &manifest.projects {
        let owners = manifest
            .categories
            .iter()
            .filter(|c| c.name == project.category)
            .count();
        assert_eq!(owners, 1, "project '{}' category owners", project.id);
    }
    for category in &manifest.categories {
        let count = manifest
            .projects
            .iter()
            .filter(|p| p.category == category.name)
            .count();
        assert_eq!(count, category.project_count, "count of '{}'", category.name);
    }
}
