// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tarot Composer
//!
//! A desktop application for composing tarot cards from layered artwork:
//! place assets from a palette, move, scale, rotate, mirror and restack
//! them, add a title and number, and export the card as a PNG.

mod app;
mod config;
mod editor;
mod error;
mod io;
mod models;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::ComposerApp;
use clap::Parser;
use config::ComposerConfig;
use std::path::PathBuf;

/// Command line options.
#[derive(Debug, Parser)]
#[command(name = "tarot-composer", version, about)]
struct Args {
    /// Configuration file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Asset directory holding `<category>/<file>` images
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Save exported cards here instead of asking where to save
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => io::serialization::load_config(path)?,
        None => ComposerConfig::default(),
    };
    if let Some(assets) = args.assets {
        config.asset_root = assets;
    }

    if let Some(path) = &args.write_config {
        io::serialization::save_config(&config, path)?;
        log::info!("Wrote config to {}", path.display());
        return Ok(());
    }

    if let Some(dir) = &args.export_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create export directory {}", dir.display()))?;
    }

    log::info!("Using assets from {}", config.asset_root.display());

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Tarot Composer"),
        ..Default::default()
    };

    // Run the application
    let export_dir = args.export_dir;
    eframe::run_native(
        "Tarot Composer",
        options,
        Box::new(move |cc| Ok(Box::new(ComposerApp::new(&cc.egui_ctx, config, export_dir)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
