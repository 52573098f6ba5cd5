//! Palette → egui colours, and the global visuals every viewport paints with.

use eframe::egui::{self, Color32, Stroke};

use crate::engine::palette::{Palette, Rgb};

/// Toolkit colours for one [`Palette`], all opaque. Use
/// [`ThemeColors::with_alpha`] to get the translucent fills a window paints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub accent: Color32,
    pub accent_light: Color32,
    pub accent_dark: Color32,
    pub background: Color32,
    pub surface: Color32,
    pub surface_light: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
}

impl ThemeColors {
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            accent: opaque(palette.accent),
            accent_light: opaque(palette.accent_light),
            accent_dark: opaque(palette.accent_dark),
            background: opaque(palette.background),
            surface: opaque(palette.surface),
            surface_light: opaque(palette.surface_light),
            text_primary: opaque(palette.text_primary),
            text_secondary: opaque(palette.text_secondary),
        }
    }

    /// The same colours with every fill at window opacity `alpha`. Text stays
    /// opaque.
    pub fn with_alpha(&self, alpha: u8) -> Self {
        Self {
            accent: fill(self.accent, alpha),
            accent_light: fill(self.accent_light, alpha),
            accent_dark: fill(self.accent_dark, alpha),
            background: fill(self.background, alpha),
            surface: fill(self.surface, alpha),
            surface_light: fill(self.surface_light, alpha),
            ..*self
        }
    }
}

pub fn opaque(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

fn fill(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Install `colors` as the dark visuals shared by the panel and every drawer
/// window.
pub fn apply_visuals(ctx: &egui::Context, colors: &ThemeColors) {
    let mut visuals = egui::Visuals::dark();
    visuals.override_text_color = Some(colors.text_primary);
    visuals.window_fill = colors.background;
    visuals.panel_fill = colors.background;
    visuals.extreme_bg_color = colors.surface;
    visuals.faint_bg_color = colors.surface_light;

    visuals.widgets.noninteractive.bg_fill = colors.surface;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors.text_secondary);
    visuals.widgets.inactive.bg_fill = colors.surface_light;
    visuals.widgets.inactive.weak_bg_fill = colors.surface_light;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors.text_primary);
    visuals.widgets.hovered.bg_fill = colors.accent_light;
    visuals.widgets.hovered.weak_bg_fill = colors.accent_light;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, colors.text_primary);
    visuals.widgets.active.bg_fill = colors.accent;
    visuals.widgets.active.weak_bg_fill = colors.accent;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, colors.text_primary);

    visuals.selection.bg_fill = colors.accent;
    visuals.selection.stroke = Stroke::new(1.0, colors.text_primary);
    ctx.set_visuals(visuals);
}
