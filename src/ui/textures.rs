// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! GPU textures for decoded assets, uploaded once per asset.

use crate::io::media::LoadedImage;
use crate::models::catalog::AssetRef;
use std::collections::HashMap;

#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<AssetRef, egui::TextureHandle>,
}

impl TextureCache {
    /// Upload `image` for `asset` unless a texture already exists.
    pub fn get_or_upload(
        &mut self,
        ctx: &egui::Context,
        asset: &AssetRef,
        image: &LoadedImage,
    ) -> egui::TextureId {
        self.textures
            .entry(asset.clone())
            .or_insert_with(|| {
                let size = [image.width as usize, image.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &image.pixels);
                ctx.load_texture(asset.to_string(), color_image, egui::TextureOptions::LINEAR)
            })
            .id()
    }

    pub fn get(&self, asset: &AssetRef) -> Option<&egui::TextureHandle> {
        self.textures.get(asset)
    }
}
