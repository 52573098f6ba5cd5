//! Settings dialog: theme sliders with a live preview, startup flags, and the
//! OK / Shutdown / Cancel actions.

use eframe::egui::{self, Align2, FontId, RichText, Sense, ViewportClass};

use crate::engine::palette::{self, Palette};
use crate::platform::chrome::{WindowChrome, WindowHandle};
use crate::types::{Size, Startup, Theme};
use crate::ui::colors::{ThemeColors, opaque};
use crate::ui::window::{
    AppState, AppWindow, WindowEvent, WindowKind, paint_colors, viewport_builder, viewport_id,
};
use crate::utils;

pub const TITLE: &str = "Settings - drawers";
const DIALOG_SIZE: Size = Size::new(360, 400);
const PREVIEW_HEIGHT: f32 = 56.0;

pub struct SettingsWindow {
    handle: WindowHandle,
    /// Working copy edited by the sliders; only leaves the dialog on OK.
    theme: Theme,
    startup: Startup,
    colors: ThemeColors,
}

impl SettingsWindow {
    pub fn open(theme: Theme, startup: Startup, palette: &Palette, chrome: &mut dyn WindowChrome) -> Self {
        let handle = chrome.create_window(TITLE, DIALOG_SIZE, DIALOG_SIZE);
        chrome.hide_from_taskbar(handle);
        let mut window = Self {
            handle,
            theme,
            startup,
            colors: ThemeColors::from_palette(palette),
        };
        window.on_theme_changed(palette, chrome);
        window
    }

    fn contents(&mut self, ui: &mut egui::Ui) -> Option<WindowEvent> {
        ui.heading("Theme");
        ui.add(egui::Slider::new(&mut self.theme.hue, 0..=360).text("Hue"));
        ui.add(egui::Slider::new(&mut self.theme.saturation, 0..=100).text("Saturation"));
        ui.add(egui::Slider::new(&mut self.theme.lightness, 0..=100).text("Lightness"));
        ui.add(egui::Slider::new(&mut self.theme.alpha, 0..=100).text("Alpha"));

        let preview = palette::derive(&self.theme);
        ui.add_space(6.0);
        preview_swatch(ui, &self.theme, &preview);
        ui.label(
            RichText::new(utils::opacity_label(preview.window_alpha))
                .color(self.colors.text_secondary),
        );

        ui.separator();
        ui.heading("Startup");
        ui.checkbox(&mut self.startup.start_with_system, "Launch with system");
        ui.checkbox(&mut self.startup.window_locked, "Lock main window position");

        ui.separator();
        let mut event = None;
        ui.horizontal(|ui| {
            if ui.button("OK").clicked() {
                event = Some(WindowEvent::SettingsApplied {
                    theme: self.theme.clamped(),
                    startup: self.startup,
                });
            }
            if ui.button("Shutdown").clicked() {
                event = Some(WindowEvent::Shutdown);
            }
            if ui.button("Cancel").clicked() {
                event = Some(WindowEvent::SettingsCancelled);
            }
        });
        event
    }
}

/// Text drawn over the preview swatch.
pub fn preview_label(theme: &Theme) -> String {
    format!(
        "hsla({}, {}%, {}%, {:.2})",
        theme.hue,
        theme.saturation,
        theme.lightness,
        f64::from(theme.alpha) / 100.0
    )
}

fn preview_swatch(ui: &mut egui::Ui, theme: &Theme, preview: &Palette) {
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, PREVIEW_HEIGHT), Sense::hover());
    let accent = preview.accent;
    let fill = egui::Color32::from_rgba_unmultiplied(accent.r, accent.g, accent.b, preview.window_alpha);
    let painter = ui.painter();
    painter.rect_filled(rect, 6.0, fill);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        preview_label(theme),
        FontId::proportional(15.0),
        opaque(preview.text_primary),
    );
}

impl AppWindow for SettingsWindow {
    fn handle(&self) -> WindowHandle {
        self.handle
    }

    fn kind(&self) -> WindowKind {
        WindowKind::Settings
    }

    fn title(&self) -> &str {
        TITLE
    }

    fn on_theme_changed(&mut self, palette: &Palette, chrome: &mut dyn WindowChrome) {
        self.colors = ThemeColors::from_palette(palette);
        chrome.set_layered_alpha(self.handle, palette.window_alpha);
    }

    fn show(&mut self, ctx: &egui::Context, state: &mut AppState<'_>) -> Option<WindowEvent> {
        let spec = state.chrome.spec(self.handle)?;
        let builder = viewport_builder(spec);
        let fill = paint_colors(&self.colors, spec).background;

        ctx.show_viewport_immediate(viewport_id(self.handle), builder, |ctx, class| {
            let event = if class == ViewportClass::Embedded {
                egui::Window::new(TITLE)
                    .collapsible(false)
                    .show(ctx, |ui| self.contents(ui))
                    .and_then(|r| r.inner)
                    .flatten()
            } else {
                egui::CentralPanel::default()
                    .frame(egui::Frame::new().fill(fill).inner_margin(10.0))
                    .show(ctx, |ui| self.contents(ui))
                    .inner
            };
            if ctx.input(|i| i.viewport().close_requested()) {
                return Some(WindowEvent::SettingsCancelled);
            }
            event
        })
    }
}
