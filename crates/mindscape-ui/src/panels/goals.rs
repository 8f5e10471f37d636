use egui::{self, RichText};
use crate::state::UiState;
use crate::theme::*;
use super::{card, page_header};

/// Placeholder page. Returns true when "Back" was clicked.
pub fn goals_panel(ui: &mut egui::Ui, state: &UiState) -> bool {
    let palette = palette(state.theme);
    let back = page_header(ui, &palette, "Goals & Challenges", "Track your wellness objectives");

    card(ui, &palette, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.label(RichText::new("🎯").size(48.0));
            ui.heading(RichText::new("Coming Soon").color(palette.text_primary).strong());
            ui.label(
                RichText::new("Goal tracking and habit challenges will be available in the next update!")
                    .color(palette.text_secondary),
            );
            ui.add_space(24.0);
        });
    });

    back
}
