//! Dashboard: greeting and the feature cards.

use egui::{self, RichText, Sense};
use mindscape_core::dashboard::{greeting, Feature};
use crate::state::{Page, UiState};
use crate::theme::*;
use super::card;

pub fn feature_page(feature: Feature) -> Page {
    match feature {
        Feature::Assistant => Page::Assistant,
        Feature::MoodTracker => Page::Mood,
        Feature::Journal => Page::Journal,
        Feature::Goals => Page::Goals,
    }
}

fn feature_icon(feature: Feature) -> &'static str {
    match feature {
        Feature::Assistant => "✨",
        Feature::MoodTracker => "💗",
        Feature::Journal => "📖",
        Feature::Goals => "🎯",
    }
}

/// Returns the page of the clicked card
pub fn dashboard_panel(ui: &mut egui::Ui, state: &UiState) -> Option<Page> {
    let palette = palette(state.theme);
    let mut target = None;

    if let Some(user) = &state.user {
        ui.heading(RichText::new(greeting(user)).color(palette.text_primary).strong());
    }
    ui.label(RichText::new("How can we support you today?").color(palette.text_secondary));
    ui.add_space(16.0);

    egui::Grid::new("feature_cards")
        .num_columns(2)
        .spacing([16.0, 16.0])
        .show(ui, |ui| {
            for (i, feature) in Feature::all().iter().enumerate() {
                let response = card(ui, &palette, |ui| {
                    ui.set_width(260.0);
                    ui.label(RichText::new(feature_icon(*feature)).size(28.0));
                    ui.label(RichText::new(feature.title()).color(palette.text_primary).strong());
                    ui.label(RichText::new(feature.description()).color(palette.text_secondary).small());
                    ui.interact(ui.min_rect(), ui.id().with(feature.title()), Sense::click())
                });
                if response.clicked() {
                    target = Some(feature_page(*feature));
                }
                if i % 2 == 1 {
                    ui.end_row();
                }
            }
        });

    target
}
