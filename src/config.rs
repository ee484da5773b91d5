// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Every constant the composer depends on lives here with a built-in
//! default, so a YAML or JSON file only needs to list what it changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Logical card dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 1000.0,
        }
    }
}

/// A palette tab: catalog key plus the label shown on the tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub key: String,
    pub label: String,
}

impl CategoryConfig {
    fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Complete composer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub canvas: CanvasSize,
    /// Lower bound for the on-screen display scale.
    pub min_display_scale: f64,
    /// Space kept free around the card inside the canvas panel.
    pub container_padding: f64,
    /// Largest width/height of a freshly placed asset.
    pub max_initial_size: f64,
    /// Smallest width/height a resize may produce.
    pub min_box_size: f64,
    /// Supersampling multiplier used when exporting.
    pub export_pixel_ratio: f64,
    /// File stem used when the title is blank.
    pub default_export_name: String,
    /// Directory holding `<category>/<filename>` assets.
    pub asset_root: PathBuf,
    /// Font file for exported text, relative to `asset_root` unless absolute.
    pub font: Option<PathBuf>,
    /// Palette tabs in display order.
    pub categories: Vec<CategoryConfig>,
    /// Category key to ordered asset filenames.
    pub assets: BTreeMap<String, Vec<String>>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        let assets = [
            ("background", vec!["background.png"]),
            ("bodies", vec!["body_1.png", "body_2.png"]),
            ("heads", vec!["head_1.png"]),
            (
                "hands",
                vec!["h_blessing.png", "h_grabing.png", "h_open.png", "h_signing.png"],
            ),
            ("objects", vec!["o_crown.png", "o_scepter.png", "o_aureole.png"]),
            ("creatures", vec!["a_lion.png", "a_beast.png"]),
            ("ornaments", vec!["ornament_1.png"]),
        ]
        .into_iter()
        .map(|(key, files)| {
            (
                key.to_string(),
                files.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();

        Self {
            canvas: CanvasSize::default(),
            min_display_scale: 0.12,
            container_padding: 32.0,
            max_initial_size: 300.0,
            min_box_size: 20.0,
            export_pixel_ratio: 2.0,
            default_export_name: "tarot".to_string(),
            asset_root: PathBuf::from("assets"),
            font: Some(PathBuf::from("fonts/title.ttf")),
            categories: vec![
                CategoryConfig::new("bodies", "Bodies"),
                CategoryConfig::new("heads", "Heads"),
                CategoryConfig::new("hands", "Hands"),
                CategoryConfig::new("objects", "Objects"),
                CategoryConfig::new("creatures", "Creatures"),
                CategoryConfig::new("ornaments", "Ornaments"),
            ],
            assets,
        }
    }
}

impl ComposerConfig {
    /// Resolved path of the export font, if one is configured.
    pub fn font_path(&self) -> Option<PathBuf> {
        self.font.as_ref().map(|font| {
            if font.is_absolute() {
                font.clone()
            } else {
                self.asset_root.join(font)
            }
        })
    }
}
