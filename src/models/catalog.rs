// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Asset catalog.
//!
//! A read-only mapping from category key to ordered asset filenames. Each
//! filename resolves to `<root>/<category>/<filename>`.

use crate::config::{CategoryConfig, ComposerConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Category holding card backgrounds.
pub const BACKGROUND_CATEGORY: &str = "background";

/// Reference to one asset file inside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetRef {
    pub category: String,
    pub file: String,
}

impl AssetRef {
    pub fn new(category: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            file: file.into(),
        }
    }

    /// Resolve to a file path under `root`.
    pub fn path(&self, root: &Path) -> PathBuf {
        root.join(&self.category).join(&self.file)
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.file)
    }
}

/// Static catalog of palette categories and their assets.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    categories: Vec<CategoryConfig>,
    index: BTreeMap<String, Vec<String>>,
}

impl AssetCatalog {
    pub fn new(categories: Vec<CategoryConfig>, index: BTreeMap<String, Vec<String>>) -> Self {
        Self { categories, index }
    }

    pub fn from_config(config: &ComposerConfig) -> Self {
        Self::new(config.categories.clone(), config.assets.clone())
    }

    /// Palette tabs in display order.
    pub fn categories(&self) -> &[CategoryConfig] {
        &self.categories
    }

    /// Asset references of one category, in catalog order.
    pub fn assets(&self, category: &str) -> Vec<AssetRef> {
        self.index
            .get(category)
            .map(|files| {
                files
                    .iter()
                    .map(|file| AssetRef::new(category, file.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn backgrounds(&self) -> Vec<AssetRef> {
        self.assets(BACKGROUND_CATEGORY)
    }

    /// First background entry, loaded at startup.
    pub fn default_background(&self) -> Option<AssetRef> {
        self.backgrounds().into_iter().next()
    }

    /// Key of the first palette tab.
    pub fn first_category(&self) -> Option<&str> {
        self.categories.first().map(|c| c.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies_only() -> AssetCatalog {
        let mut index = BTreeMap::new();
        index.insert(
            "bodies".to_string(),
            vec!["body_1.png".to_string(), "body_2.png".to_string()],
        );
        AssetCatalog::new(
            vec![CategoryConfig {
                key: "bodies".to_string(),
                label: "Bodies".to_string(),
            }],
            index,
        )
    }

    #[test]
    fn test_assets_keep_catalog_order() {
        let catalog = bodies_only();
        let assets = catalog.assets("bodies");
        assert_eq!(
            assets,
            vec![
                AssetRef::new("bodies", "body_1.png"),
                AssetRef::new("bodies", "body_2.png"),
            ]
        );
        assert!(catalog.assets("heads").is_empty());
        assert_eq!(catalog.first_category(), Some("bodies"));
        assert_eq!(catalog.default_background(), None);
    }

    #[test]
    fn test_asset_path_layout() {
        let asset = AssetRef::new("hands", "h_open.png");
        assert_eq!(
            asset.path(Path::new("assets")),
            PathBuf::from("assets").join("hands").join("h_open.png")
        );
        assert_eq!(asset.to_string(), "hands/h_open.png");
    }

    #[test]
    fn test_default_config_background() {
        let catalog = AssetCatalog::from_config(&ComposerConfig::default());
        assert_eq!(
            catalog.default_background(),
            Some(AssetRef::new(BACKGROUND_CATEGORY, "background.png"))
        );
        assert_eq!(catalog.categories().len(), 6);
    }
}
