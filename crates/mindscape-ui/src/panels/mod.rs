pub mod nav;
pub mod auth;
pub mod dashboard;
pub mod assistant;
pub mod mood;
pub mod journal;
pub mod profile;
pub mod goals;
pub mod toasts;

use chrono::{DateTime, Local, Utc};
use egui::{self, Button, RichText, Vec2};
use crate::theme::*;

/// Framed card on the secondary background
pub(crate) fn card<R>(
    ui: &mut egui::Ui,
    palette: &Palette,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::default()
        .fill(palette.bg_secondary)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(PANEL_PADDING)
        .show(ui, add_contents)
        .inner
}

/// Title block of an inner page. Returns true when "Back" was clicked.
pub(crate) fn page_header(ui: &mut egui::Ui, palette: &Palette, title: &str, subtitle: &str) -> bool {
    let mut back = false;
    ui.horizontal(|ui| {
        back = ui.button("← Back").clicked();
        ui.vertical(|ui| {
            ui.heading(RichText::new(title).color(palette.text_primary).strong());
            ui.label(RichText::new(subtitle).color(palette.text_secondary).small());
        });
    });
    ui.separator();
    back
}

pub(crate) fn primary_button(ui: &mut egui::Ui, enabled: bool, label: &str) -> bool {
    ui.add_enabled(
        enabled,
        Button::new(RichText::new(label).color(ON_ACCENT))
            .fill(ACCENT)
            .corner_radius(PANEL_ROUNDING)
            .min_size(Vec2::new(ui.available_width(), 32.0)),
    )
    .clicked()
}

/// Local-time rendering of a stored timestamp
pub fn format_timestamp(at: &DateTime<Utc>, pattern: &str) -> String {
    at.with_timezone(&Local).format(pattern).to_string()
}
