//! Top bar shown on every signed-in page.

use egui::{self, Align, Layout, RichText};
use crate::state::{Page, UiState};
use crate::theme::*;

pub enum NavAction {
    Go(Page),
    SignOut,
}

pub fn nav_bar(ui: &mut egui::Ui, state: &UiState) -> Option<NavAction> {
    let palette = palette(state.theme);
    let mut action = None;

    ui.horizontal(|ui| {
        if ui
            .add(egui::Label::new(
                RichText::new("MindScape").strong().color(ACCENT).size(18.0),
            ).sense(egui::Sense::click()))
            .clicked()
        {
            action = Some(NavAction::Go(Page::Dashboard));
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.button("Sign Out").clicked() {
                action = Some(NavAction::SignOut);
            }
            if ui
                .selectable_label(state.page == Page::Profile, "Profile")
                .clicked()
            {
                action = Some(NavAction::Go(Page::Profile));
            }
            if let Some(email) = state.user.as_ref().and_then(|u| u.email.as_deref()) {
                ui.label(RichText::new(email).color(palette.text_secondary).small());
            }
        });
    });

    action
}
