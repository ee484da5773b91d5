// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the card commands.
//!
//! This module provides the row of buttons for export, deletion,
//! mirroring and stacking, plus the background picker.

use crate::editor::EditCommand;
use crate::models::catalog::AssetRef;

/// Result of toolbar interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Edit(EditCommand),
    Export,
    SetBackground(AssetRef),
}

/// Display the toolbar. Selection-bound buttons are disabled while
/// nothing is selected.
pub fn show(
    ui: &mut egui::Ui,
    has_selection: bool,
    has_elements: bool,
    backgrounds: &[AssetRef],
    current_background: Option<&AssetRef>,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("💾 Export PNG").clicked() {
            action = ToolbarAction::Export;
        }

        ui.separator();

        let selection_buttons = [
            ("↔ Flip H", EditCommand::FlipHorizontal),
            ("↕ Flip V", EditCommand::FlipVertical),
            ("⏫ Front", EditCommand::BringToFront),
            ("⏶ Up", EditCommand::MoveUp),
            ("⏷ Down", EditCommand::MoveDown),
            ("⏬ Back", EditCommand::SendToBack),
            ("🗑 Delete", EditCommand::DeleteSelected),
        ];
        for (label, command) in selection_buttons {
            if ui.add_enabled(has_selection, egui::Button::new(label)).clicked() {
                action = ToolbarAction::Edit(command);
            }
        }

        ui.separator();

        if ui.add_enabled(has_elements, egui::Button::new("Clear all")).clicked() {
            action = ToolbarAction::Edit(EditCommand::ClearAll);
        }

        ui.separator();

        let selected_text = current_background
            .map(|bg| bg.file.clone())
            .unwrap_or_else(|| "none".to_string());
        egui::ComboBox::from_label("Background")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for background in backgrounds {
                    let is_current = current_background == Some(background);
                    if ui.selectable_label(is_current, background.file.as_str()).clicked() && !is_current {
                        action = ToolbarAction::SetBackground(background.clone());
                    }
                }
            });
    });

    action
}
