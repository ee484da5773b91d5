// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Card properties panel.
//!
//! This module provides the title and number inputs and a read-out of
//! the selected element's placement.

use crate::models::element::Element;

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    TitleChanged,
    NumberChanged,
}

/// Display the properties panel.
pub fn show(
    ui: &mut egui::Ui,
    title: &mut String,
    number: &mut String,
    selected: Option<&Element>,
    layer: Option<usize>,
    element_count: usize,
    exports_text: bool,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Card");
    ui.add_space(4.0);

    ui.label("Title");
    if ui.text_edit_singleline(title).changed() {
        action = PropertiesAction::TitleChanged;
    }

    ui.label("Number");
    if ui
        .add(egui::TextEdit::singleline(number).desired_width(80.0))
        .changed()
    {
        action = PropertiesAction::NumberChanged;
    }

    if !exports_text {
        ui.label(
            egui::RichText::new("No export font found; text will not appear in exported PNGs")
                .small()
                .color(egui::Color32::from_rgb(200, 120, 0)),
        );
    }

    ui.separator();
    ui.heading("Selection");

    match selected {
        Some(element) => {
            let placement = element.placement;
            let bound = element.bound_box();
            egui::Grid::new("selection_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    ui.label("Asset");
                    ui.label(element.asset.to_string());
                    ui.end_row();

                    ui.label("Position");
                    ui.label(format!("{:.1}, {:.1}", placement.x, placement.y));
                    ui.end_row();

                    ui.label("Size");
                    ui.label(format!("{:.1} × {:.1}", bound.width, bound.height));
                    ui.end_row();

                    ui.label("Scale");
                    ui.label(format!("{:.3}, {:.3}", placement.scale_x, placement.scale_y));
                    ui.end_row();

                    ui.label("Rotation");
                    ui.label(format!("{:.1}°", placement.rotation));
                    ui.end_row();

                    if let Some(layer) = layer {
                        ui.label("Layer");
                        ui.label(format!("{} of {}", layer + 1, element_count));
                        ui.end_row();
                    }
                });
        }
        None => {
            ui.label(egui::RichText::new("Nothing selected").italics().weak());
        }
    }

    ui.separator();
    ui.label(format!("{} element(s) on the card", element_count));
    ui.label(
        egui::RichText::new("Delete / Backspace removes the selection")
            .small()
            .weak(),
    );

    action
}
