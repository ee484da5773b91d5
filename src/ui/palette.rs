// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Asset palette: category tabs and a thumbnail grid.

use super::textures::TextureCache;
use crate::models::catalog::{AssetCatalog, AssetRef};

const THUMBNAIL_SIZE: f32 = 72.0;

/// Result of palette interaction.
pub enum PaletteAction {
    None,
    Place(AssetRef),
}

/// Display the palette for `active_category`.
pub fn show(
    ui: &mut egui::Ui,
    catalog: &AssetCatalog,
    active_category: &mut String,
    textures: &TextureCache,
) -> PaletteAction {
    let mut action = PaletteAction::None;

    ui.horizontal_wrapped(|ui| {
        for category in catalog.categories() {
            if ui
                .selectable_label(*active_category == category.key, category.label.as_str())
                .clicked()
            {
                *active_category = category.key.clone();
            }
        }
    });

    ui.separator();

    let assets = catalog.assets(active_category.as_str());
    if assets.is_empty() {
        ui.label(
            egui::RichText::new("No assets listed for this category. Add file names to the config.")
                .weak(),
        );
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            for asset in assets {
                let clicked = match textures.get(&asset) {
                    Some(texture) => ui
                        .add(egui::ImageButton::new(egui::load::SizedTexture::new(
                            texture.id(),
                            thumbnail_size(texture.size_vec2()),
                        )))
                        .on_hover_text(asset.file.as_str())
                        .clicked(),
                    None => ui
                        .add_sized(
                            [THUMBNAIL_SIZE, THUMBNAIL_SIZE],
                            egui::Button::new(asset.file.as_str()),
                        )
                        .clicked(),
                };
                if clicked {
                    action = PaletteAction::Place(asset);
                }
            }
        });
    });

    action
}

/// Fit an image into the thumbnail square, keeping its aspect ratio.
fn thumbnail_size(size: egui::Vec2) -> egui::Vec2 {
    let scale = (THUMBNAIL_SIZE / size.x).min(THUMBNAIL_SIZE / size.y);
    size * scale
}
