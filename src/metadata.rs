//! Per-project `metadata.json` parsing and field resolution.
//!
//! Every project folder carries a small JSON descriptor:
//!
//! ```json
//! {
//!   "title": "Robot",
//!   "description": "Hard-surface model, 2024",
//!   "releaseVersion": "v20240611",
//!   "images": ["front.png", "side.png"],
//!   "thumbnail": "front.png"
//! }
//! ```
//!
//! Every field is optional. Unknown fields are ignored so descriptors can
//! carry notes for humans (older descriptors repeat the `category`, for
//! instance). Missing values are resolved against the folder:
//!
//! - **Title**: `title` → project folder name
//! - **Description**: `description` → empty string
//! - **Images**: `images` (nulls and blanks dropped) → filesystem discovery

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Filename of the per-project descriptor.
pub const METADATA_FILENAME: &str = "metadata.json";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("cannot read metadata: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw contents of a `metadata.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_version: Option<String>,
    pub images: Option<Vec<Option<String>>>,
    pub thumbnail: Option<String>,
}

impl ProjectMetadata {
    /// Display title, falling back to the project folder name.
    pub fn resolved_title(&self, project_id: &str) -> String {
        resolve(&[self.title.as_deref(), Some(project_id)]).unwrap_or_default()
    }

    pub fn resolved_description(&self) -> String {
        resolve(&[self.description.as_deref()]).unwrap_or_default()
    }

    /// Explicit image filenames in their listed order.
    ///
    /// Returns `None` when the descriptor does not enumerate any usable
    /// name, so callers fall back to scanning `images/`.
    pub fn explicit_images(&self) -> Option<Vec<String>> {
        let names: Vec<String> = self
            .images
            .as_ref()?
            .iter()
            .filter_map(|name| resolve(&[name.as_deref()]))
            .collect();
        if names.is_empty() { None } else { Some(names) }
    }

    /// Thumbnail filename, if one is named.
    pub fn thumbnail_name(&self) -> Option<String> {
        resolve(&[self.thumbnail.as_deref()])
    }
}

/// Resolve a field from several sources in priority order.
///
/// Returns the first value that is present and non-blank, trimmed.
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Read and parse a `metadata.json` file.
pub fn read_metadata(path: &Path) -> Result<ProjectMetadata, MetadataError> {
    let content = std::fs::read_to_string(path)?;
    parse_metadata(&content)
}

pub fn parse_metadata(content: &str) -> Result<ProjectMetadata, MetadataError> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // =========================================================================
    // resolve() tests
    // =========================================================================

    #[test]
    fn resolve_picks_first_non_none() {
        assert_eq!(
            resolve(&[Some("Explicit"), Some("folder")]),
            Some("Explicit".to_string())
        );
    }

    #[test]
    fn resolve_skips_blank() {
        assert_eq!(
            resolve(&[Some("   "), None, Some("folder")]),
            Some("folder".to_string())
        );
    }

    #[test]
    fn resolve_all_missing() {
        assert_eq!(resolve(&[None, Some("")]), None);
    }

    // =========================================================================
    // parsing tests
    // =========================================================================

    #[test]
    fn title_only_descriptor() {
        let meta = parse_metadata(r#"{"title":"X"}"#).unwrap();
        assert_eq!(meta.resolved_title("x-folder"), "X");
        assert_eq!(meta.resolved_description(), "");
        assert_eq!(meta.release_version, None);
        assert_eq!(meta.explicit_images(), None);
        assert_eq!(meta.thumbnail_name(), None);
    }

    #[test]
    fn title_falls_back_to_folder_name() {
        let meta = parse_metadata("{}").unwrap();
        assert_eq!(meta.resolved_title("robot"), "robot");
    }

    #[test]
    fn full_descriptor() {
        let meta = parse_metadata(
            r#"{
                "title": "Robot",
                "description": "Hard-surface model",
                "releaseVersion": "v20240611",
                "images": ["front.png", null, " ", "side.png"],
                "thumbnail": "front.png"
            }"#,
        )
        .unwrap();
        assert_eq!(meta.release_version.as_deref(), Some("v20240611"));
        assert_eq!(
            meta.explicit_images(),
            Some(vec!["front.png".to_string(), "side.png".to_string()])
        );
        assert_eq!(meta.thumbnail_name().as_deref(), Some("front.png"));
    }

    #[test]
    fn empty_image_list_is_not_explicit() {
        let meta = parse_metadata(r#"{"images": []}"#).unwrap();
        assert_eq!(meta.explicit_images(), None);
    }

    #[test]
    fn null_fields_are_absent() {
        let meta =
            parse_metadata(r#"{"title": null, "releaseVersion": null, "images": null}"#).unwrap();
        assert_eq!(meta, ProjectMetadata::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let meta = parse_metadata(r#"{"title":"A","category":"3D","tags":["x"]}"#).unwrap();
        assert_eq!(meta.title.as_deref(), Some("A"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let result = parse_metadata(r#"{"title": "#);
        assert!(matches!(result, Err(MetadataError::Parse(_))));
    }

    #[test]
    fn wrong_field_type_is_parse_error() {
        let result = parse_metadata(r#"{"title": 42}"#);
        assert!(matches!(result, Err(MetadataError::Parse(_))));
    }

    #[test]
    fn read_metadata_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = read_metadata(&tmp.path().join(METADATA_FILENAME));
        assert!(matches!(result, Err(MetadataError::Io(_))));
    }

    #[test]
    fn read_metadata_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(METADATA_FILENAME);
        fs::write(&path, r#"{"title":"On Disk","description":"d"}"#).unwrap();
        let meta = read_metadata(&path).unwrap();
        assert_eq!(meta.resolved_title("ignored"), "On Disk");
        assert_eq!(meta.resolved_description(), "d");
    }
}
