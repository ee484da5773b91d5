// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration file reading and writing.
//!
//! This module handles importing and exporting the composer configuration
//! in YAML and JSON formats, selected by file extension.

use crate::config::ComposerConfig;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            other => bail!("Unsupported config extension: {:?}", other),
        }
    }
}

/// Load a configuration file, picking the format from its extension.
pub fn load_config(path: &Path) -> Result<ComposerConfig> {
    let format = Format::of(path)?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = match format {
        Format::Yaml => serde_yaml::from_str(&text).map_err(anyhow::Error::from),
        Format::Json => serde_json::from_str(&text).map_err(anyhow::Error::from),
    }
    .with_context(|| format!("Failed to parse config {}", path.display()))?;

    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write a configuration file, picking the format from its extension.
pub fn save_config(config: &ComposerConfig, path: &Path) -> Result<()> {
    let text = match Format::of(path)? {
        Format::Yaml => serde_yaml::to_string(config)?,
        Format::Json => serde_json::to_string_pretty(config)?,
    };
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write config {}", path.display()))
}
