// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Card canvas.
//!
//! This module paints the card at the current display scale and turns
//! pointer input into logical-coordinate actions for the editor.

use super::textures::TextureCache;
use crate::editor::Editor;
use crate::models::element::{Element, TextElement};
use crate::util::geometry::{handle_position, Anchor, BoundBox, HANDLE_RADIUS};
use kurbo::Point;

/// Result of canvas interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    Pressed(Point),
    Dragged(Point),
    Released,
}

const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 161, 255);

/// egui font family the title and number are previewed with.
const CARD_FONT_FAMILY: &str = "card";

/// Register the card font with egui so the preview matches the export.
/// Without a font file the family aliases the default proportional fonts,
/// which is also what exports fall back to.
pub fn install_card_font(ctx: &egui::Context, file_data: Option<&[u8]>) {
    ctx.set_fonts(card_font_definitions(file_data));
}

fn card_font_definitions(file_data: Option<&[u8]>) -> egui::FontDefinitions {
    let mut fonts = egui::FontDefinitions::default();
    let family = match file_data {
        Some(data) => {
            fonts.font_data.insert(
                CARD_FONT_FAMILY.to_owned(),
                egui::FontData::from_owned(data.to_vec()),
            );
            vec![CARD_FONT_FAMILY.to_owned()]
        }
        None => fonts
            .families
            .get(&egui::FontFamily::Proportional)
            .cloned()
            .unwrap_or_default(),
    };
    fonts
        .families
        .insert(egui::FontFamily::Name(CARD_FONT_FAMILY.into()), family);
    fonts
}

/// Maps logical card coordinates to screen positions and back.
struct CardMapping {
    rect: egui::Rect,
    scale: f32,
}

impl CardMapping {
    fn to_screen(&self, point: Point) -> egui::Pos2 {
        self.rect.min + egui::vec2(point.x as f32, point.y as f32) * self.scale
    }

    fn to_logical(&self, pos: egui::Pos2) -> Point {
        let local = (pos - self.rect.min) / self.scale;
        Point::new(f64::from(local.x), f64::from(local.y))
    }
}

/// Paint the card and collect pointer actions.
pub fn show(ui: &mut egui::Ui, editor: &Editor, textures: &mut TextureCache) -> Vec<CanvasAction> {
    let mut actions = Vec::new();

    let (full_rect, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    let (width, height) = editor.viewport().display_size();
    let mapping = CardMapping {
        rect: egui::Rect::from_center_size(
            full_rect.center(),
            egui::vec2(width as f32, height as f32),
        ),
        scale: editor.viewport().scale() as f32,
    };

    let painter = ui.painter_at(full_rect);
    painter.rect_filled(full_rect, 0.0, egui::Color32::from_gray(40));
    painter.rect_filled(mapping.rect, 0.0, egui::Color32::WHITE);

    let scene = editor.scene();
    if let Some(background) = scene.background() {
        paint_element(ui.ctx(), &painter, textures, &mapping, background);
    }
    for element in scene.elements() {
        paint_element(ui.ctx(), &painter, textures, &mapping, element);
    }
    for text in scene.overlay() {
        paint_text(&painter, &mapping, text);
    }
    if let Some(bound) = editor.handle_box() {
        paint_handles(&painter, &mapping, &bound);
    }

    // Pointer handling, in logical coordinates.
    if response.drag_started() {
        if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
            if mapping.rect.contains(origin) {
                actions.push(CanvasAction::Pressed(mapping.to_logical(origin)));
            }
        }
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            actions.push(CanvasAction::Dragged(mapping.to_logical(pos)));
        }
    }
    if response.drag_stopped() {
        actions.push(CanvasAction::Released);
    }
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if mapping.rect.contains(pos) {
                actions.push(CanvasAction::Pressed(mapping.to_logical(pos)));
                actions.push(CanvasAction::Released);
            }
        }
    }

    if let Some(pos) = response.hover_pos() {
        let point = mapping.to_logical(pos);
        if let Some(anchor) = editor.handle_at(point) {
            ui.ctx().set_cursor_icon(anchor_cursor(anchor));
        } else if editor.hover_target(point).is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Move);
        }
    }

    actions
}

fn paint_element(
    ctx: &egui::Context,
    painter: &egui::Painter,
    textures: &mut TextureCache,
    mapping: &CardMapping,
    element: &Element,
) {
    let texture = textures.get_or_upload(ctx, &element.asset, &element.image);
    let size = element.size();
    let affine = element.placement.affine();
    let corners = [
        (Point::new(0.0, 0.0), egui::pos2(0.0, 0.0)),
        (Point::new(size.width, 0.0), egui::pos2(1.0, 0.0)),
        (Point::new(size.width, size.height), egui::pos2(1.0, 1.0)),
        (Point::new(0.0, size.height), egui::pos2(0.0, 1.0)),
    ];

    let mut mesh = egui::Mesh::with_texture(texture);
    for (local, uv) in corners {
        mesh.vertices.push(egui::epaint::Vertex {
            pos: mapping.to_screen(affine * local),
            uv,
            color: egui::Color32::WHITE,
        });
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(egui::Shape::mesh(mesh));
}

fn paint_text(painter: &egui::Painter, mapping: &CardMapping, text: &TextElement) {
    if text.content.is_empty() {
        return;
    }
    let [r, g, b, a] = text.color;
    painter.text(
        mapping.to_screen(Point::new(text.width / 2.0, text.y)),
        egui::Align2::CENTER_TOP,
        &text.content,
        egui::FontId::new(
            text.font_size as f32 * mapping.scale,
            egui::FontFamily::Name(CARD_FONT_FAMILY.into()),
        ),
        egui::Color32::from_rgba_unmultiplied(r, g, b, a),
    );
}

fn paint_handles(painter: &egui::Painter, mapping: &CardMapping, bound: &BoundBox) {
    let stroke = egui::Stroke::new(1.0, SELECTION_COLOR);
    let outline: Vec<egui::Pos2> = bound.corners().iter().map(|&c| mapping.to_screen(c)).collect();
    painter.add(egui::Shape::closed_line(outline, stroke));

    let scale = f64::from(mapping.scale);
    let top_center = mapping.to_screen(handle_position(bound, Anchor::TopCenter, scale));
    let rotate = mapping.to_screen(handle_position(bound, Anchor::Rotate, scale));
    painter.line_segment([top_center, rotate], stroke);

    for anchor in Anchor::ALL {
        let pos = mapping.to_screen(handle_position(bound, anchor, scale));
        painter.circle_filled(pos, HANDLE_RADIUS as f32, egui::Color32::WHITE);
        painter.circle_stroke(pos, HANDLE_RADIUS as f32, stroke);
    }
}

fn anchor_cursor(anchor: Anchor) -> egui::CursorIcon {
    match anchor {
        Anchor::TopLeft | Anchor::BottomRight => egui::CursorIcon::ResizeNwSe,
        Anchor::TopRight | Anchor::BottomLeft => egui::CursorIcon::ResizeNeSw,
        Anchor::MiddleLeft | Anchor::MiddleRight => egui::CursorIcon::ResizeHorizontal,
        Anchor::TopCenter | Anchor::BottomCenter => egui::CursorIcon::ResizeVertical,
        Anchor::Rotate => egui::CursorIcon::Grab,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_family(fonts: &egui::FontDefinitions) -> &[String] {
        &fonts.families[&egui::FontFamily::Name(CARD_FONT_FAMILY.into())]
    }

    #[test]
    fn test_card_family_uses_font_file() {
        let fonts = card_font_definitions(Some(&[0u8, 1, 0, 0][..]));
        assert_eq!(card_family(&fonts), [CARD_FONT_FAMILY.to_string()]);
        assert!(fonts.font_data.contains_key(CARD_FONT_FAMILY));
    }

    #[test]
    fn test_card_family_matches_bundled_export_font() {
        let fonts = card_font_definitions(None);
        let proportional = &fonts.families[&egui::FontFamily::Proportional];
        assert_eq!(card_family(&fonts), proportional.as_slice());
        // Exports fall back to the head of the same family.
        assert!(crate::io::export::CardFont::bundled().is_some());
    }

    #[test]
    fn test_logical_and_screen_mapping_invert() {
        let mapping = CardMapping {
            rect: egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(300.0, 500.0)),
            scale: 0.5,
        };
        let screen = mapping.to_screen(Point::new(200.0, 400.0));
        assert_eq!(screen, egui::pos2(110.0, 220.0));
        assert_eq!(mapping.to_logical(screen), Point::new(200.0, 400.0));
    }
}
