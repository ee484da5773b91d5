// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It routes asset-load completions and UI actions
//! into the [`Editor`], which owns all card state.

use crate::config::ComposerConfig;
use crate::editor::{EditCommand, Editor};
use crate::io::export::{CardFont, SceneRasterizer};
use crate::io::media::{AssetLoader, LoadPurpose, LoadedAsset};
use crate::models::catalog::{AssetCatalog, AssetRef};
use crate::ui::{canvas, palette, properties, textures::TextureCache, toolbar};
use std::collections::HashSet;
use std::path::PathBuf;

/// Main application state.
pub struct ComposerApp {
    /// Card state and editing operations
    editor: Editor,

    /// Palette categories and their assets
    catalog: AssetCatalog,

    /// Background image loader
    loader: AssetLoader,

    /// Uploaded textures for elements and thumbnails
    textures: TextureCache,

    /// Thumbnails already requested from the loader
    requested_thumbnails: HashSet<AssetRef>,

    /// Key of the palette tab being shown
    active_category: String,

    /// Title text field contents
    title_input: String,

    /// Card number text field contents
    number_input: String,

    /// Write exports here instead of asking with a save dialog
    export_dir: Option<PathBuf>,
}

impl ComposerApp {
    /// Create the application, install the card font and start loading the
    /// default background.
    pub fn new(ctx: &egui::Context, config: ComposerConfig, export_dir: Option<PathBuf>) -> Self {
        let catalog = AssetCatalog::from_config(&config);
        let mut loader = AssetLoader::new(config.asset_root.clone());

        let card_font = CardFont::load(config.font_path().as_deref());
        canvas::install_card_font(ctx, card_font.as_ref().and_then(CardFont::file_data));
        let rasterizer = SceneRasterizer::new(card_font.map(CardFont::into_font));

        match catalog.default_background() {
            Some(background) => loader.request(background, LoadPurpose::Background),
            None => log::warn!("No background listed in the catalog"),
        }

        let active_category = catalog.first_category().unwrap_or_default().to_string();

        Self {
            editor: Editor::new(config, rasterizer),
            catalog,
            loader,
            textures: TextureCache::default(),
            requested_thumbnails: HashSet::new(),
            active_category,
            title_input: String::new(),
            number_input: String::new(),
            export_dir,
        }
    }

    /// Apply every load that finished since the last frame.
    fn drain_loads(&mut self, ctx: &egui::Context) {
        for loaded in self.loader.poll() {
            match loaded {
                LoadedAsset {
                    asset,
                    purpose: LoadPurpose::Thumbnail,
                    result,
                } => match result {
                    Ok(image) => {
                        self.textures.get_or_upload(ctx, &asset, &image);
                    }
                    Err(e) => log::error!("Thumbnail load error: {}", e),
                },
                loaded => {
                    self.editor.on_asset_loaded(loaded);
                }
            }
        }
    }

    /// Make sure thumbnails of the visible palette tab are on their way.
    fn request_thumbnails(&mut self) {
        for asset in self.catalog.assets(&self.active_category) {
            if self.requested_thumbnails.insert(asset.clone()) {
                self.loader.request(asset, LoadPurpose::Thumbnail);
            }
        }
    }

    /// Export the card and save it.
    fn export_card(&mut self) {
        let exported = match self.editor.export() {
            Ok(exported) => exported,
            Err(e) => {
                log::error!("Export failed: {}", e);
                return;
            }
        };

        let saved = match &self.export_dir {
            Some(dir) => exported.save_in(dir).map(Some),
            None => match rfd::FileDialog::new()
                .add_filter("PNG", &["png"])
                .set_file_name(exported.file_name.as_str())
                .save_file()
            {
                Some(path) => exported.save(&path).map(|()| Some(path)),
                None => Ok(None),
            },
        };

        match saved {
            Ok(Some(path)) => log::info!("Saved card to {}", path.display()),
            Ok(None) => log::info!("Export cancelled"),
            Err(e) => log::error!("Failed to save card: {}", e),
        }
    }
}

impl eframe::App for ComposerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_loads(ctx);
        self.request_thumbnails();

        // Keep polling while images are decoding
        if self.loader.is_loading() {
            ctx.request_repaint();
        }

        // Toolbar
        let backgrounds = self.catalog.backgrounds();
        let current_background = self.editor.scene().background().map(|bg| bg.asset.clone());
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    self.editor.selected().is_some(),
                    !self.editor.scene().elements().is_empty(),
                    &backgrounds,
                    current_background.as_ref(),
                )
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::Edit(command) => {
                self.editor.apply(command);
            }
            toolbar::ToolbarAction::Export => self.export_card(),
            toolbar::ToolbarAction::SetBackground(asset) => {
                self.loader.request(asset, LoadPurpose::Background);
            }
            toolbar::ToolbarAction::None => {}
        }

        // Asset palette (left side)
        let palette_action = egui::SidePanel::left("palette")
            .default_width(260.0)
            .show(ctx, |ui| {
                palette::show(ui, &self.catalog, &mut self.active_category, &self.textures)
            })
            .inner;

        if let palette::PaletteAction::Place(asset) = palette_action {
            self.loader.request(asset, LoadPurpose::Element);
        }

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(220.0)
            .show(ctx, |ui| {
                let selected = self.editor.selected_element();
                let layer = selected.and_then(|e| self.editor.scene().z_index(e.id));
                properties::show(
                    ui,
                    &mut self.title_input,
                    &mut self.number_input,
                    selected,
                    layer,
                    self.editor.scene().elements().len(),
                    self.editor.exports_text(),
                )
            })
            .inner;

        match properties_action {
            properties::PropertiesAction::TitleChanged => self.editor.set_title(&self.title_input),
            properties::PropertiesAction::NumberChanged => {
                self.editor.set_number(&self.number_input)
            }
            properties::PropertiesAction::None => {}
        }

        // Delete / Backspace removes the selection.
        // Only process if no text field is focused (to avoid deleting while typing)
        if !ctx.wants_keyboard_input()
            && self.editor.selected().is_some()
            && ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace))
        {
            self.editor.apply(EditCommand::DeleteSelected);
        }

        // Card canvas (center)
        let canvas_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let available = ui.available_size();
                self.editor
                    .fit_viewport(f64::from(available.x), f64::from(available.y));
                canvas::show(ui, &self.editor, &mut self.textures)
            })
            .inner;

        for action in canvas_actions {
            match action {
                canvas::CanvasAction::Pressed(point) => self.editor.pointer_pressed(point),
                canvas::CanvasAction::Dragged(point) => {
                    self.editor.pointer_dragged(point);
                }
                canvas::CanvasAction::Released => self.editor.pointer_released(),
            }
        }
    }
}
