//! Journal page: entry list and editor.

use egui::{self, RichText};
use mindscape_core::journal::JournalDraft;
use mindscape_types::entry::JournalEntry;
use crate::state::UiState;
use crate::theme::*;
use super::{card, format_timestamp, page_header, primary_button};

pub enum JournalAction {
    Back,
    Save(JournalDraft),
    Delete(String),
}

pub fn journal_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<JournalAction> {
    let palette = palette(state.theme);
    let mut action = None;

    if page_header(ui, &palette, "Journal", "Reflect and document your thoughts") {
        action = Some(JournalAction::Back);
    }

    if state.journal_editing {
        editor(ui, state, &palette, &mut action);
    } else {
        if ui.button("＋ New Entry").clicked() {
            state.open_new_entry();
        }
        ui.add_space(8.0);
        entry_list(ui, state, &palette);
    }

    delete_confirmation(ui.ctx(), state, &palette, &mut action);
    action
}

fn editor(ui: &mut egui::Ui, state: &mut UiState, palette: &Palette, action: &mut Option<JournalAction>) {
    card(ui, palette, |ui| {
        let heading = if state.journal_draft.id.is_some() { "Edit Entry" } else { "New Entry" };
        ui.label(RichText::new(heading).size(18.0).strong().color(palette.text_primary));

        ui.add(
            egui::TextEdit::singleline(&mut state.journal_draft.title)
                .hint_text("Entry title...")
                .desired_width(f32::INFINITY),
        );
        ui.add(
            egui::TextEdit::multiline(&mut state.journal_draft.content)
                .hint_text("Write your thoughts here...")
                .desired_width(f32::INFINITY)
                .desired_rows(12),
        );

        ui.horizontal(|ui| {
            if ui.button("Cancel").clicked() {
                state.close_journal_editor();
            }
        });
        let ready = state.journal_draft.is_complete() && !state.journal_busy;
        let label = if state.journal_busy { "Saving..." } else { "Save Entry" };
        if primary_button(ui, ready, label) {
            *action = Some(JournalAction::Save(state.journal_draft.clone()));
        }
    });
}

enum ListClick {
    Edit(JournalEntry),
    Delete(String),
}

fn entry_list(ui: &mut egui::Ui, state: &mut UiState, palette: &Palette) {
    if state.journal.is_empty() {
        card(ui, palette, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("No journal entries yet. Start writing!")
                        .color(palette.text_secondary),
                );
            });
        });
        return;
    }

    let mut click = None;
    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        for entry in &state.journal {
            card(ui, palette, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&entry.title).size(17.0).strong().color(palette.text_primary));
                        ui.label(
                            RichText::new(format_timestamp(&entry.created_at, "%A, %B %-d, %Y • %-I:%M %p"))
                                .color(palette.text_secondary)
                                .small(),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                        if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                            click = Some(ListClick::Delete(entry.id.clone()));
                        }
                        if ui.small_button("✏").on_hover_text("Edit").clicked() {
                            click = Some(ListClick::Edit(entry.clone()));
                        }
                    });
                });
                ui.label(RichText::new(&entry.content).color(palette.text_secondary));
            });
            ui.add_space(8.0);
        }
    });

    match click {
        Some(ListClick::Edit(entry)) => state.open_entry(&entry),
        Some(ListClick::Delete(id)) => state.confirm_delete = Some(id),
        None => {}
    }
}

fn delete_confirmation(
    ctx: &egui::Context,
    state: &mut UiState,
    palette: &Palette,
    action: &mut Option<JournalAction>,
) {
    let Some(id) = state.confirm_delete.clone() else {
        return;
    };

    egui::Window::new("Delete entry?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(
                RichText::new("Are you sure you want to delete this entry?")
                    .color(palette.text_primary),
            );
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    state.confirm_delete = None;
                }
                if ui
                    .add(egui::Button::new(RichText::new("Delete").color(ON_ACCENT)).fill(ERROR))
                    .clicked()
                {
                    state.confirm_delete = None;
                    *action = Some(JournalAction::Delete(id.clone()));
                }
            });
        });
}
