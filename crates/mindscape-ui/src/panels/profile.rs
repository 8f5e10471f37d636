//! Profile page: name, bio and theme, with an explicit Save button.

use egui::{self, RichText};
use mindscape_core::profile::ProfileForm;
use mindscape_types::entry::ThemePreference;
use crate::state::UiState;
use crate::theme::*;
use super::{card, page_header, primary_button};

pub enum ProfileAction {
    Back,
    Save(ProfileForm),
}

pub fn profile_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<ProfileAction> {
    let palette = palette(state.theme);
    let mut action = None;

    if page_header(ui, &palette, "Profile & Settings", "Manage your account and preferences") {
        action = Some(ProfileAction::Back);
    }

    card(ui, &palette, |ui| {
        // ── Profile ──────────────────────────────────────
        ui.label(RichText::new("Profile").color(ACCENT).strong());
        ui.add_space(2.0);

        ui.label(RichText::new("Email").color(palette.text_secondary).small());
        let email = state
            .user
            .as_ref()
            .and_then(|u| u.email.clone())
            .unwrap_or_default();
        ui.add_enabled(false, egui::TextEdit::singleline(&mut email.as_str()));

        ui.label(RichText::new("Full Name").color(palette.text_secondary).small());
        ui.add(
            egui::TextEdit::singleline(&mut state.profile_form.full_name)
                .hint_text("Enter your full name"),
        );

        ui.label(RichText::new("Bio").color(palette.text_secondary).small());
        ui.add(
            egui::TextEdit::multiline(&mut state.profile_form.bio)
                .hint_text("Tell us a bit about yourself...")
                .desired_rows(4),
        );

        ui.add_space(8.0);
        ui.separator();

        // ── Appearance ───────────────────────────────────
        ui.label(RichText::new("Appearance").color(ACCENT).strong());
        ui.horizontal(|ui| {
            ui.selectable_value(&mut state.profile_form.theme, ThemePreference::Light, "☀ Light");
            ui.selectable_value(&mut state.profile_form.theme, ThemePreference::Dark, "🌙 Dark");
        });

        ui.add_space(12.0);
        let label = if state.profile_busy { "Saving..." } else { "Save Changes" };
        if primary_button(ui, !state.profile_busy, label) {
            action = Some(ProfileAction::Save(state.profile_form.clone()));
        }
    });

    action
}
