//! UI theme constants and the light/dark palettes

use egui::{Color32, CornerRadius, Stroke, Vec2};
use mindscape_types::entry::ThemePreference;

pub const ACCENT: Color32 = Color32::from_rgb(124, 58, 237);
pub const ACCENT_SOFT: Color32 = Color32::from_rgb(167, 139, 250);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);
pub const ON_ACCENT: Color32 = Color32::WHITE;

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(10);
pub const PANEL_PADDING: Vec2 = Vec2::new(16.0, 12.0);
pub const CONTENT_WIDTH: f32 = 720.0;

/// Colors that change with the theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_surface: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub error_bg: Color32,
}

pub const LIGHT: Palette = Palette {
    bg_primary: Color32::from_rgb(248, 247, 252),
    bg_secondary: Color32::from_rgb(255, 255, 255),
    bg_surface: Color32::from_rgb(237, 233, 246),
    text_primary: Color32::from_rgb(30, 27, 46),
    text_secondary: Color32::from_rgb(107, 104, 128),
    error_bg: Color32::from_rgb(254, 226, 226),
};

pub const DARK: Palette = Palette {
    bg_primary: Color32::from_rgb(24, 24, 27),
    bg_secondary: Color32::from_rgb(39, 39, 42),
    bg_surface: Color32::from_rgb(52, 52, 56),
    text_primary: Color32::from_rgb(228, 228, 231),
    text_secondary: Color32::from_rgb(161, 161, 170),
    error_bg: Color32::from_rgb(60, 24, 24),
};

pub fn palette(theme: ThemePreference) -> Palette {
    match theme {
        ThemePreference::Light => LIGHT,
        ThemePreference::Dark => DARK,
    }
}

/// Apply the chosen theme to an egui context
pub fn apply_theme(ctx: &egui::Context, theme: ThemePreference) {
    let colors = palette(theme);
    let mut style = (*ctx.style()).clone();

    style.visuals = match theme {
        ThemePreference::Light => egui::Visuals::light(),
        ThemePreference::Dark => egui::Visuals::dark(),
    };
    style.visuals.panel_fill = colors.bg_primary;
    style.visuals.window_fill = colors.bg_secondary;
    style.visuals.extreme_bg_color = colors.bg_secondary;

    style.visuals.widgets.inactive.bg_fill = colors.bg_surface;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors.text_secondary);
    style.visuals.widgets.hovered.bg_fill = colors.bg_surface;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, colors.text_primary);
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, ON_ACCENT);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = Vec2::new(8.0, 8.0);

    ctx.set_style(style);
}
