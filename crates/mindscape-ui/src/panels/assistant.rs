//! Assistant page: transcript and input field.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use mindscape_types::message::{Delivery, Role, TranscriptEntry};
use crate::state::UiState;
use crate::theme::*;
use super::page_header;

pub enum AssistantAction {
    Back,
    Submit(String),
}

/// Render the assistant page. The input is cleared when a message is submitted.
pub fn assistant_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<AssistantAction> {
    let palette = palette(state.theme);
    let mut action = None;

    if page_header(ui, &palette, "AI Assistant", "Your wellness companion") {
        action = Some(AssistantAction::Back);
    }

    let available_height = ui.available_height() - 56.0;
    ScrollArea::vertical()
        .max_height(available_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if state.transcript.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(48.0);
                    ui.label(RichText::new("✨").size(40.0));
                    ui.heading(
                        RichText::new("How are you feeling today?")
                            .color(palette.text_primary)
                            .strong(),
                    );
                    ui.label(
                        RichText::new("I'm here to support you on your wellness journey. Share what's on your mind.")
                            .color(palette.text_secondary),
                    );
                });
            }

            for entry in &state.transcript {
                render_entry(ui, &palette, entry);
                ui.add_space(4.0);
            }

            if state.chat_busy {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Thinking...").color(palette.text_secondary).small());
                });
            }
        });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let input = egui::TextEdit::singleline(&mut state.input_text)
            .hint_text("Type your message...")
            .desired_width(ui.available_width() - 70.0)
            .font(egui::FontId::proportional(14.0));
        let response = ui.add_enabled(!state.chat_busy, input);

        let send_enabled = !state.input_text.trim().is_empty() && !state.chat_busy;
        let send_btn = ui.add_enabled(
            send_enabled,
            egui::Button::new(RichText::new("Send").color(ON_ACCENT))
                .fill(if send_enabled { ACCENT } else { palette.bg_surface })
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(60.0, 0.0)),
        );

        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if send_enabled && (entered || send_btn.clicked()) {
            action = Some(AssistantAction::Submit(state.input_text.trim().to_string()));
            state.input_text.clear();
            response.request_focus();
        }
    });

    action
}

fn render_entry(ui: &mut egui::Ui, palette: &Palette, entry: &TranscriptEntry) {
    let is_user = entry.role() == Role::User;
    let (fill, text_color) = if is_user {
        (ACCENT, ON_ACCENT)
    } else {
        (palette.bg_secondary, palette.text_primary)
    };
    let layout = if is_user {
        Layout::right_to_left(Align::Min)
    } else {
        Layout::left_to_right(Align::Min)
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::default()
            .fill(fill)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.8);
                ui.vertical(|ui| {
                    ui.label(RichText::new(entry.content()).color(text_color));
                    match entry.delivery {
                        Delivery::Pending => {
                            ui.label(RichText::new("Sending...").color(text_color).small().italics());
                        }
                        Delivery::Failed => {
                            ui.label(RichText::new("Not saved").color(ERROR).small());
                        }
                        Delivery::Confirmed => {}
                    }
                });
            });
    });
}
