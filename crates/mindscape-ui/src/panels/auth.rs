//! Sign-in / sign-up page.

use egui::{self, RichText};
use crate::state::{AuthMode, UiState};
use crate::theme::*;
use super::{card, primary_button};

pub enum AuthAction {
    SignIn { email: String, password: String },
    SignUp { email: String, password: String, full_name: String },
}

pub fn auth_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<AuthAction> {
    let palette = palette(state.theme);
    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.set_max_width(380.0);
        ui.add_space(48.0);
        ui.label(RichText::new("MindScape").size(40.0).strong().color(ACCENT));
        ui.label(
            RichText::new("Your journey to mental wellness starts here")
                .color(palette.text_secondary),
        );
        ui.add_space(24.0);

        card(ui, &palette, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut state.auth_form.mode, AuthMode::SignIn, "Sign In");
                ui.selectable_value(&mut state.auth_form.mode, AuthMode::SignUp, "Sign Up");
            });
            ui.add_space(8.0);

            let form = &mut state.auth_form;
            if form.mode == AuthMode::SignUp {
                ui.label(RichText::new("Full Name").color(palette.text_secondary).small());
                ui.text_edit_singleline(&mut form.full_name);
            }
            ui.label(RichText::new("Email").color(palette.text_secondary).small());
            ui.add(egui::TextEdit::singleline(&mut form.email).hint_text("you@example.com"));
            ui.label(RichText::new("Password").color(palette.text_secondary).small());
            let password = ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
            ui.add_space(8.0);

            let ready = !form.email.trim().is_empty() && !form.password.is_empty() && !state.auth_busy;
            let label = match (form.mode, state.auth_busy) {
                (_, true) => "Please wait...",
                (AuthMode::SignIn, false) => "Sign In",
                (AuthMode::SignUp, false) => "Create Account",
            };
            let submit = primary_button(ui, ready, label)
                || (ready && password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)));

            if submit {
                action = Some(match form.mode {
                    AuthMode::SignIn => AuthAction::SignIn {
                        email: form.email.trim().to_string(),
                        password: form.password.clone(),
                    },
                    AuthMode::SignUp => AuthAction::SignUp {
                        email: form.email.trim().to_string(),
                        password: form.password.clone(),
                        full_name: form.full_name.trim().to_string(),
                    },
                });
            }
        });
    });

    action
}
