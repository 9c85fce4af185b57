//! Portfolio configuration module.
//!
//! Handles loading, validating, and merging the optional `config.toml` in
//! the portfolio root. Stock defaults are overridden by whatever the file
//! specifies; everything else keeps its default.
//!
//! ## Config File Location
//!
//! ```text
//! portfolio/
//! ├── config.toml              # Optional, overrides stock defaults
//! ├── 3D/
//! │   └── robot/
//! │       └── metadata.json
//! └── web-design/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! base_path = "/"           # URL prefix for images served from the site itself
//! # content_dir = "portfolio"  # Prefix of project paths (defaults to the source dir name)
//!
//! [release]
//! repository = "https://github.com/Confucii/portfolio_yarik"  # Release asset host
//!
//! [thumbnails]
//! size = 400                # Square thumbnail edge in pixels
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Filename of the portfolio configuration within the source root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Portfolio configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// How repo-hosted images are addressed.
    pub site: SiteSection,
    /// Where release-hosted images are downloaded from.
    pub release: ReleaseConfig,
    /// Thumbnail generation settings.
    pub thumbnails: ThumbnailsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.base_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.base_path must not be empty (use \"/\" for the site root)".into(),
            ));
        }
        if self.thumbnails.size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.size must be non-zero".into(),
            ));
        }
        let repo = self.release.repository.trim();
        if repo.is_empty() {
            return Err(ConfigError::Validation(
                "release.repository must not be empty".into(),
            ));
        }
        if !(repo.starts_with("http://") || repo.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "release.repository must be an http(s) URL".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// URL prefix the site is served under, e.g. `"/portfolio/"` on a project page host.
    pub base_path: String,
    /// Repository-relative directory holding the portfolio tree.
    /// When absent, the name of the scanned directory is used.
    pub content_dir: Option<String>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            content_dir: None,
        }
    }
}

impl SiteSection {
    /// `base_path` normalized to start and end with exactly one slash.
    pub fn url_prefix(&self) -> String {
        let trimmed = self.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        }
    }
}

/// Repository the gallery's release assets are published from.
pub const DEFAULT_REPOSITORY: &str = "https://github.com/Confucii/portfolio_yarik";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Repository URL; release assets live under `{repository}/releases/download/`.
    pub repository: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
        }
    }
}

impl ReleaseConfig {
    /// Download base for a release tag: `{repository}/releases/download/{version}`.
    pub fn download_base(&self, version: &str) -> String {
        let repo = self.repository.trim().trim_end_matches('/');
        format!("{repo}/releases/download/{version}")
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Edge length of the square `thumbnail.webp`, in pixels.
    pub size: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self { size: 400 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image conversion workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Portfolio Manifest Configuration
# ================================
# Place this file in the portfolio root (next to the category folders).
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# URL prefix the site is served under. Repo-hosted image URLs are built as
# {base_path}{content_dir}/{category}/{project}/images/{file}.
base_path = "/"

# Repository-relative directory of the portfolio tree. Defaults to the name
# of the scanned directory.
# content_dir = "portfolio"

# ---------------------------------------------------------------------------
# Release-hosted images
# ---------------------------------------------------------------------------
[release]
# Projects whose metadata.json sets "releaseVersion" load their images from
# {repository}/releases/download/{releaseVersion}/{category}_{project}_{file}.
repository = "https://github.com/Confucii/portfolio_yarik"

# ---------------------------------------------------------------------------
# Thumbnails (optimize command)
# ---------------------------------------------------------------------------
[thumbnails]
# Edge length of the square thumbnail.webp, in pixels.
size = 400

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-conversion workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site.base_path, "/");
        assert_eq!(config.site.content_dir, None);
        assert_eq!(config.release.repository, DEFAULT_REPOSITORY);
        assert_eq!(config.thumbnails.size, 400);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[release]
repository = "https://github.com/owner/repo"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.release.repository, "https://github.com/owner/repo");
        assert_eq!(config.site.base_path, "/");
        assert_eq!(config.thumbnails.size, 400);
    }

    #[test]
    fn url_prefix_normalizes_slashes() {
        let mut site = SiteSection::default();
        assert_eq!(site.url_prefix(), "/");
        site.base_path = "portfolio_site".to_string();
        assert_eq!(site.url_prefix(), "/portfolio_site/");
        site.base_path = "/portfolio_site/".to_string();
        assert_eq!(site.url_prefix(), "/portfolio_site/");
        site.base_path = "//".to_string();
        assert_eq!(site.url_prefix(), "/");
    }

    #[test]
    fn download_base_defaults_to_gallery_repository() {
        let release = ReleaseConfig::default();
        assert_eq!(
            release.download_base("v1"),
            "https://github.com/Confucii/portfolio_yarik/releases/download/v1"
        );
    }

    #[test]
    fn download_base_strips_trailing_slash() {
        let release = ReleaseConfig {
            repository: "https://github.com/owner/repo/".to_string(),
        };
        assert_eq!(
            release.download_base("v1"),
            "https://github.com/owner/repo/releases/download/v1"
        );
    }

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(cores + 64),
        };
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_never_zero() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.base_path, "/");
        assert_eq!(config.thumbnails.size, 400);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[site]
base_path = "/gallery/"
content_dir = "portfolio"

[thumbnails]
size = 320
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.base_path, "/gallery/");
        assert_eq!(config.site.content_dir.as_deref(), Some("portfolio"));
        assert_eq!(config.thumbnails.size, 320);
        assert_eq!(config.release.repository, DEFAULT_REPOSITORY);
    }

    #[test]
    fn load_config_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[site]\nbase_pth = \"/\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_rejects_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[site\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn validation_rejects_zero_thumbnail_size() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[thumbnails]\nsize = 0\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_non_url_repository() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[release]\nrepository = \"owner/repo\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_blank_repository() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[release]\nrepository = \"  \"\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_empty_base_path() {
        let mut config = SiteConfig::default();
        config.site.base_path = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_overlay_overrides_base() {
        let base: toml::Value = toml::from_str("a = 1\n[t]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[t]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.site.base_path, "/");
        assert_eq!(config.thumbnails.size, 400);
    }
}
