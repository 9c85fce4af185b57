//! Manifest types serialized into `data.json`.
//!
//! Field names are camelCase on the wire because the gallery client reads
//! them straight out of the JSON. Changing a name here breaks the site.

use serde::{Deserialize, Serialize};

/// Where a project's binary assets are hosted.
///
/// Selected once per project from `metadata.releaseVersion` and threaded
/// through every URL built for that project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the same origin as the site, straight out of the content tree.
    Repo,
    /// Downloaded from a versioned release of the repository.
    Release(String),
}

impl ImageSource {
    /// Pick the strategy for a project. A blank version counts as absent.
    pub fn from_release_version(version: Option<&str>) -> Self {
        match version.map(str::trim) {
            Some(v) if !v.is_empty() => Self::Release(v.to_string()),
            _ => Self::Repo,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Repo => SourceKind::Repo,
            Self::Release(_) => SourceKind::Release,
        }
    }

    pub fn release_version(&self) -> Option<&str> {
        match self {
            Self::Repo => None,
            Self::Release(v) => Some(v),
        }
    }
}

/// Wire form of [`ImageSource`], without the version payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Repo,
    Release,
}

/// One image of a project, ready for the client to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Filename as it appears in `images/` or in `metadata.images`.
    pub name: String,
    pub url: String,
    pub source: SourceKind,
}

/// A portfolio project: one `{category}/{project}/` folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Folder name; unique within its category.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Parent folder name, matches a [`Category::name`].
    pub category: String,
    /// Repository-relative folder path, e.g. `portfolio/3D/robot`.
    pub path: String,
    pub thumbnail: Option<String>,
    pub images: Vec<ImageRef>,
    pub release_version: Option<String>,
    pub image_source: SourceKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub display_name: String,
    pub project_count: usize,
}

/// The whole `data.json` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// ISO-8601 UTC timestamp of the run.
    pub generated: String,
    pub categories: Vec<Category>,
    pub projects: Vec<Project>,
}
