// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Card rasterization and PNG export.
//!
//! Layers are composited with tiny-skia: background, then the main layer
//! in paint order, then the overlay text drawn from ab_glyph outlines.
//! Output size follows the viewport's display size times the pixel ratio,
//! so callers put the viewport at logical size before rasterizing.

use crate::error::ExportError;
use crate::io::media::LoadedImage;
use crate::models::element::{Element, TextElement};
use crate::models::scene::Scene;
use crate::util::viewport::Viewport;
use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont};
use kurbo::Affine;
use std::path::{Path, PathBuf};
use tiny_skia::{FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

/// File extension of exported cards.
pub const EXPORT_EXTENSION: &str = "png";

/// File name for a card titled `title`.
///
/// Whitespace runs, path separators and characters that file systems
/// reject become `_`; leading dots are dropped so the name never walks out
/// of the target directory. A blank result falls back to `default_name`.
pub fn export_file_name(title: &str, default_name: &str) -> String {
    let slug: String = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| if is_reserved(c) { '_' } else { c })
        .collect();
    let slug = slug.trim_start_matches('.');
    let stem = if slug.is_empty() { default_name } else { slug };
    format!("{stem}.{EXPORT_EXTENSION}")
}

fn is_reserved(c: char) -> bool {
    c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// An encoded card ready to be saved.
#[derive(Clone)]
pub struct ExportedImage {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl std::fmt::Debug for ExportedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportedImage")
            .field("file_name", &self.file_name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.png.len())
            .finish()
    }
}

impl ExportedImage {
    /// Write the PNG to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        std::fs::write(path, &self.png).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the PNG into `dir` under its own file name.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        self.save(&path)?;
        Ok(path)
    }
}

/// Convert straight-alpha RGBA into a premultiplied pixmap.
fn to_pixmap(image: &LoadedImage) -> Option<Pixmap> {
    let mut data = image.pixels.clone();
    for px in data.chunks_exact_mut(4) {
        let alpha = u16::from(px[3]);
        for channel in &mut px[..3] {
            *channel = ((u16::from(*channel) * alpha + 127) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, IntSize::from_wh(image.width, image.height)?)
}

fn to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Font used for the title and number.
///
/// A configured font file takes precedence; otherwise the proportional
/// font bundled with egui is used, so exports and the canvas preview always
/// have text.
#[derive(Clone)]
pub struct CardFont {
    font: FontArc,
    file_data: Option<Vec<u8>>,
}

impl std::fmt::Debug for CardFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardFont")
            .field("from_file", &self.file_data.is_some())
            .finish_non_exhaustive()
    }
}

impl CardFont {
    /// Load `path`, falling back to the bundled font when it is missing or
    /// unreadable.
    pub fn load(path: Option<&Path>) -> Option<Self> {
        if let Some(path) = path {
            match Self::from_file(path) {
                Ok(font) => {
                    log::info!("Loaded card font {}", path.display());
                    return Some(font);
                }
                Err(e) => log::warn!("{}; using the bundled font", e),
            }
        }
        let bundled = Self::bundled();
        if bundled.is_none() {
            log::warn!("No bundled font available; exported text disabled");
        }
        bundled
    }

    fn from_file(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path)
            .map_err(|e| format!("Cannot read font {}: {}", path.display(), e))?;
        let font = FontArc::try_from_vec(bytes.clone())
            .map_err(|e| format!("Invalid font {}: {}", path.display(), e))?;
        Ok(Self {
            font,
            file_data: Some(bytes),
        })
    }

    /// First font of egui's default proportional family.
    pub fn bundled() -> Option<Self> {
        let definitions = egui::FontDefinitions::default();
        let name = definitions
            .families
            .get(&egui::FontFamily::Proportional)?
            .first()?;
        let data = definitions.font_data.get(name)?;
        let font = FontArc::try_from_vec(data.font.to_vec()).ok()?;
        Some(Self {
            font,
            file_data: None,
        })
    }

    /// Bytes of the configured font file; `None` for the bundled font.
    pub fn file_data(&self) -> Option<&[u8]> {
        self.file_data.as_deref()
    }

    pub fn into_font(self) -> FontArc {
        self.font
    }
}

/// Composites a [`Scene`] into a pixmap.
pub struct SceneRasterizer {
    font: Option<FontArc>,
}

impl SceneRasterizer {
    pub fn new(font: Option<FontArc>) -> Self {
        Self { font }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Rasterize the scene at the viewport's current display size
    /// multiplied by `pixel_ratio`.
    pub fn rasterize(
        &self,
        scene: &Scene,
        viewport: &Viewport,
        pixel_ratio: f64,
    ) -> Result<Pixmap, ExportError> {
        let (display_width, display_height) = viewport.display_size();
        let width = (display_width * pixel_ratio).round() as u32;
        let height = (display_height * pixel_ratio).round() as u32;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;

        let scale = viewport.scale() * pixel_ratio;
        let base = Affine::scale(scale);

        if let Some(background) = scene.background() {
            draw_element(&mut pixmap, background, base);
        }
        for element in scene.elements() {
            draw_element(&mut pixmap, element, base);
        }
        for text in scene.overlay() {
            self.draw_text(&mut pixmap, text, scale);
        }

        Ok(pixmap)
    }

    fn draw_text(&self, pixmap: &mut Pixmap, text: &TextElement, scale: f64) {
        if text.content.is_empty() {
            return;
        }
        let Some(font) = &self.font else {
            log::debug!("Skipping {:?} text without a font", text.role);
            return;
        };

        let px_scale = PxScale::from((text.font_size * scale) as f32);
        let scaled = font.as_scaled(px_scale);

        let mut glyphs: Vec<(GlyphId, f32)> = Vec::with_capacity(text.content.len());
        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        for ch in text.content.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push((id, caret));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        let left = ((text.width * scale) as f32 - caret) / 2.0;
        let baseline = (text.y * scale) as f32 + scaled.ascent();
        let (pixmap_width, pixmap_height) = (pixmap.width() as i64, pixmap.height() as i64);
        let [r, g, b, a] = text.color.map(|c| f32::from(c) / 255.0);
        let data = pixmap.data_mut();

        for (id, x) in glyphs {
            let glyph = id.with_scale_and_position(px_scale, ab_glyph::point(left + x, baseline));
            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + i64::from(gx);
                let py = bounds.min.y as i64 + i64::from(gy);
                if px < 0 || py < 0 || px >= pixmap_width || py >= pixmap_height {
                    return;
                }
                let offset = ((py * pixmap_width + px) * 4) as usize;
                let src_alpha = coverage.clamp(0.0, 1.0) * a;
                let dst = &mut data[offset..offset + 4];
                for (channel, src) in dst.iter_mut().zip([r, g, b, 1.0]) {
                    let blended = src * src_alpha + f32::from(*channel) / 255.0 * (1.0 - src_alpha);
                    *channel = (blended * 255.0).round().clamp(0.0, 255.0) as u8;
                }
            });
        }
    }
}

fn draw_element(pixmap: &mut Pixmap, element: &Element, base: Affine) {
    let Some(source) = to_pixmap(&element.image) else {
        log::warn!("Skipping {} with unusable image data", element.asset);
        return;
    };
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    let transform = to_transform(base * element.placement.affine());
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
}

/// Encode a rasterized card.
pub fn encode_png(pixmap: &Pixmap, file_name: String) -> Result<ExportedImage, ExportError> {
    let png = pixmap
        .encode_png()
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(ExportedImage {
        file_name,
        width: pixmap.width(),
        height: pixmap.height(),
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanvasSize;
    use crate::models::catalog::AssetRef;
    use crate::models::element::{ElementFactory, TextRole};
    use std::sync::Arc;

    fn card() -> Scene {
        let canvas = CanvasSize::default();
        let mut factory = ElementFactory::new(canvas, 300.0);
        let mut scene = Scene::new(canvas);
        scene.set_background(factory.background(
            AssetRef::new("background", "background.png"),
            Arc::new(LoadedImage::solid(6, 10, [200, 0, 0, 255])),
        ));
        scene.add_element(factory.create(
            AssetRef::new("bodies", "body_1.png"),
            Arc::new(LoadedImage::solid(100, 100, [0, 0, 200, 255])),
        ));
        scene
    }

    fn logical_viewport() -> Viewport {
        Viewport::new(CanvasSize::default(), 0.12, 32.0)
    }

    fn rgba_at(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let px = pixmap.pixel(x, y).unwrap();
        [px.red(), px.green(), px.blue(), px.alpha()]
    }

    fn assert_near(actual: [u8; 4], expected: [u8; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.abs_diff(e) <= 2, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(export_file_name("The Fool", "tarot"), "The_Fool.png");
        assert_eq!(export_file_name("", "tarot"), "tarot.png");
        assert_eq!(export_file_name("   ", "tarot"), "tarot.png");
        assert_eq!(export_file_name("  The \t Hanged   Man ", "tarot"), "The_Hanged_Man.png");
    }

    #[test]
    fn test_rasterize_doubles_logical_size() {
        let pixmap = SceneRasterizer::new(None)
            .rasterize(&card(), &logical_viewport(), 2.0)
            .unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (1200, 2000));
    }

    #[test]
    fn test_layers_paint_in_order() {
        let pixmap = SceneRasterizer::new(None)
            .rasterize(&card(), &logical_viewport(), 2.0)
            .unwrap();
        // Background everywhere, element over its box at (150, 350)..(250, 450).
        assert_near(rgba_at(&pixmap, 40, 40), [200, 0, 0, 255]);
        assert_near(rgba_at(&pixmap, 400, 800), [0, 0, 200, 255]);
        assert_near(rgba_at(&pixmap, 600, 800), [200, 0, 0, 255]);
    }

    #[test]
    fn test_mirrored_element_lands_left_of_origin() {
        let mut scene = card();
        let id = scene.elements()[0].id;
        scene.element_mut(id).unwrap().flip_horizontal();

        let pixmap = SceneRasterizer::new(None)
            .rasterize(&scene, &logical_viewport(), 2.0)
            .unwrap();
        // Mirrored about x = 150, so it now spans 50..150 logical.
        assert_near(rgba_at(&pixmap, 200, 800), [0, 0, 200, 255]);
        assert_near(rgba_at(&pixmap, 400, 800), [200, 0, 0, 255]);
    }

    #[test]
    fn test_file_names_stay_inside_export_dir() {
        assert_eq!(export_file_name("Ace/Wands", "tarot"), "Ace_Wands.png");
        assert_eq!(export_file_name("../escaped", "tarot"), "_escaped.png");
        assert_eq!(export_file_name("..", "tarot"), "tarot.png");
        assert_eq!(export_file_name(r"a\b:c*?", "tarot"), "a_b_c__.png");

        let dir = tempfile::tempdir().unwrap();
        let exports = dir.path().join("exports");
        std::fs::create_dir(&exports).unwrap();
        for title in ["Ace/Wands", "../escaped", "..\\..\\up"] {
            let exported = ExportedImage {
                file_name: export_file_name(title, "tarot"),
                width: 1,
                height: 1,
                png: vec![1, 2, 3],
            };
            let path = exported.save_in(&exports).unwrap();
            assert_eq!(path.parent(), Some(exports.as_path()));
            assert!(path.is_file());
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_font_file_falls_back_to_bundled() {
        let font = CardFont::load(Some(Path::new("/nonexistent/title.ttf"))).unwrap();
        assert!(font.file_data().is_none());
        assert!(SceneRasterizer::new(Some(font.into_font())).has_font());
    }

    #[test]
    fn test_title_is_drawn_centred_in_its_band() {
        let canvas = CanvasSize::default();
        let mut scene = Scene::new(canvas);
        scene.set_text(TextRole::Title, "The Fool");
        let font = CardFont::bundled().unwrap().into_font();

        let pixmap = SceneRasterizer::new(Some(font))
            .rasterize(&scene, &logical_viewport(), 2.0)
            .unwrap();

        let (mut min_x, mut max_x, mut min_y, mut max_y, mut inked) = (u32::MAX, 0, u32::MAX, 0, 0);
        for y in 0..pixmap.height() {
            for x in 0..pixmap.width() {
                if pixmap.pixel(x, y).unwrap().alpha() > 0 {
                    inked += 1;
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }

        assert!(inked > 500, "only {inked} pixels inked");
        // Title top is y = 920 logical, 36 units tall, drawn at 2x.
        assert!(min_y >= 1840, "ink starts at {min_y}");
        assert!(max_y <= 1840 + 2 * 36 + 20, "ink ends at {max_y}");
        let centre = (min_x + max_x) / 2;
        assert!(centre.abs_diff(600) <= 12, "centred at {centre}");

        // Glyph ink carries the title colour.
        let (x, y) = (min_x..=max_x)
            .flat_map(|x| (min_y..=max_y).map(move |y| (x, y)))
            .find(|&(x, y)| pixmap.pixel(x, y).unwrap().alpha() >= 250)
            .unwrap();
        assert_near(rgba_at(&pixmap, x, y), [0x17, 0x17, 0x11, 255]);
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let mut scene = card();
        scene.set_text(TextRole::Title, "The Fool");
        let rasterizer = SceneRasterizer::new(None);
        assert!(!rasterizer.has_font());
        let pixmap = rasterizer.rasterize(&scene, &logical_viewport(), 2.0).unwrap();
        assert_near(rgba_at(&pixmap, 600, 1900), [200, 0, 0, 255]);
    }

    #[test]
    fn test_encoded_png_decodes_to_same_size() {
        let pixmap = SceneRasterizer::new(None)
            .rasterize(&card(), &logical_viewport(), 2.0)
            .unwrap();
        let exported = encode_png(&pixmap, export_file_name("Star", "tarot")).unwrap();
        assert_eq!(exported.file_name, "Star.png");

        let decoded = image::load_from_memory(&exported.png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1200, 2000));

        let dir = tempfile::tempdir().unwrap();
        let path = exported.save_in(dir.path()).unwrap();
        assert!(path.ends_with("Star.png"));
        assert_eq!(std::fs::read(path).unwrap(), exported.png);
    }
}
