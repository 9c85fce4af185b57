//! Naming conventions shared by the builder and the optimizer.
//!
//! Folder names are the identity of categories and projects, so everything
//! user-visible is derived from them:
//!
//! - `web-design/` → "Web Design" (category display name)
//! - `3D/robot/images/shot.png` in release `v2` → `3D_robot_shot.png`
//!   (release asset filename)
//!
//! Project titles are ordered with [`TitleCollator`], Unicode collation
//! over the CLDR root order, so "Ébauche" sorts among the e's and
//! "banana" sits just before "Banana".

use feruca::Collator;
use std::cmp::Ordering;

/// Humanize a category folder name.
///
/// Splits on `-` and `_`, upper-cases the first character of every token
/// and joins the tokens with spaces. The rest of each token is kept as-is,
/// so acronyms survive:
/// - `"web-design"` → `"Web Design"`
/// - `"3D"` → `"3D"`
/// - `"motion_graphics"` → `"Motion Graphics"`
pub fn format_category_name(name: &str) -> String {
    name.split(['-', '_'])
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Filename of a project image once uploaded as a release asset.
///
/// Release assets live in one flat namespace, so the category and project
/// are baked into the name: `{category}_{project}_{filename}`.
pub fn release_asset_name(category: &str, project_id: &str, filename: &str) -> String {
    format!("{category}_{project_id}_{filename}")
}

/// Orders project titles for display.
///
/// Accents and case only decide between titles that are otherwise equal,
/// lowercase first. Titles that collate equal fall back to byte order, so
/// the order is total.
pub struct TitleCollator {
    collator: Collator,
}

impl TitleCollator {
    pub fn new() -> Self {
        Self {
            collator: Collator::default(),
        }
    }

    pub fn compare(&mut self, a: &str, b: &str) -> Ordering {
        self.collator.collate(a, b)
    }
}

impl Default for TitleCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off title comparison. Sorting should reuse a [`TitleCollator`].
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    TitleCollator::new().compare(a, b)
}
