//! Mood tracker page.

use egui::{self, RichText, Vec2};
use mindscape_types::entry::Mood;
use crate::state::UiState;
use crate::theme::*;
use super::{card, format_timestamp, page_header, primary_button};

pub enum MoodAction {
    Back,
    Log { mood: Mood, note: String },
}

pub fn mood_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<MoodAction> {
    let palette = palette(state.theme);
    let mut action = None;

    if page_header(ui, &palette, "Mood Tracker", "Track your emotional wellbeing") {
        action = Some(MoodAction::Back);
    }

    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        card(ui, &palette, |ui| {
            ui.label(RichText::new("How are you feeling?").size(20.0).strong().color(palette.text_primary));
            ui.label(RichText::new("Select your current mood and add a note").color(palette.text_secondary));
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                for mood in Mood::all() {
                    let selected = state.selected_mood == Some(*mood);
                    let label = RichText::new(format!("{}\n{}", mood.emoji(), mood.label()))
                        .size(16.0)
                        .color(if selected { ON_ACCENT } else { palette.text_secondary });
                    let button = egui::Button::new(label)
                        .fill(if selected { ACCENT } else { palette.bg_surface })
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(80.0, 72.0));
                    if ui.add(button).clicked() {
                        state.selected_mood = Some(*mood);
                    }
                }
            });

            ui.add(
                egui::TextEdit::multiline(&mut state.mood_note)
                    .hint_text("Add a note about how you're feeling... (optional)")
                    .desired_width(f32::INFINITY)
                    .desired_rows(4),
            );

            let ready = state.selected_mood.is_some() && !state.mood_busy;
            let label = if state.mood_busy { "Saving..." } else { "Log Mood" };
            if primary_button(ui, ready, label) {
                if let Some(mood) = state.selected_mood {
                    action = Some(MoodAction::Log {
                        mood,
                        note: state.mood_note.clone(),
                    });
                }
            }
        });

        ui.add_space(16.0);

        card(ui, &palette, |ui| {
            ui.label(RichText::new("Recent Entries").size(18.0).strong().color(palette.text_primary));
            ui.label(RichText::new("Your mood history").color(palette.text_secondary));
            ui.add_space(8.0);

            if state.moods.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new("No mood entries yet. Start tracking your emotions!")
                            .color(palette.text_secondary),
                    );
                });
            }

            for entry in &state.moods {
                egui::Frame::default()
                    .fill(palette.bg_surface)
                    .corner_radius(PANEL_ROUNDING)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            let emoji = entry.mood().map(|m| m.emoji()).unwrap_or("•");
                            ui.label(RichText::new(emoji).size(24.0));
                            ui.vertical(|ui| {
                                ui.horizontal(|ui| {
                                    ui.label(RichText::new(&entry.mood).strong().color(palette.text_primary));
                                    ui.label(
                                        RichText::new(format_timestamp(&entry.created_at, "%b %-d, %Y %-I:%M %p"))
                                            .color(palette.text_secondary)
                                            .small(),
                                    );
                                });
                                if let Some(note) = &entry.note {
                                    ui.label(RichText::new(note).color(palette.text_secondary));
                                }
                            });
                        });
                    });
                ui.add_space(4.0);
            }
        });
    });

    action
}
