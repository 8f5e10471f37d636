//! Toast stack in the bottom-right corner.

use egui::{self, Align2, RichText};
use crate::state::UiState;
use crate::theme::*;

pub fn toasts_overlay(ctx: &egui::Context, state: &mut UiState) {
    if state.toasts.is_empty() {
        return;
    }
    let palette = palette(state.theme);
    let mut dismissed = None;

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .show(ctx, |ui| {
            for toast in &state.toasts {
                let n = &toast.notification;
                let (fill, title_color) = if n.is_error() {
                    (palette.error_bg, ERROR)
                } else {
                    (palette.bg_secondary, palette.text_primary)
                };
                egui::Frame::default()
                    .fill(fill)
                    .corner_radius(PANEL_ROUNDING)
                    .inner_margin(PANEL_PADDING)
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(&n.title).color(title_color).strong());
                            if ui.small_button("✕").clicked() {
                                dismissed = Some(toast.id);
                            }
                        });
                        ui.label(RichText::new(&n.description).color(palette.text_secondary).small());
                    });
                ui.add_space(6.0);
            }
        });

    if let Some(id) = dismissed {
        state.dismiss_toast(id);
    }
}
