//! The `AppWindow` trait and the shared `AppState` view passed to each window.
//!
//! Every window the launcher opens besides the panel (drawer browsers and the
//! settings dialog) implements `AppWindow` and is held in `App::windows`. The
//! registry doubles as the theme subscription list: `App::apply_theme` calls
//! `on_theme_changed` on each entry.

use std::collections::BTreeMap;

use eframe::egui::{self, ViewportBuilder, ViewportId};

use crate::engine::palette::Palette;
use crate::platform::chrome::{ViewportChrome, ViewportSpec, WindowChrome, WindowHandle};
use crate::platform::shell::Shell;
use crate::types::{Drawer, Size, Startup, Theme};
use crate::ui::colors::ThemeColors;

/// Borrowed view of application state shared with every window's `show` call.
pub struct AppState<'a> {
    pub colors: &'a ThemeColors,
    pub chrome: &'a mut ViewportChrome,
    pub shell: &'a mut dyn Shell,
    pub extension_icons: &'a BTreeMap<String, String>,
    pub thumbnail_size: Size,
}

/// Something a window reports back to the application controller.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// A drawer window closed. Carries its drawer with the final window size.
    DrawerClosed(Drawer),
    SettingsApplied { theme: Theme, startup: Startup },
    SettingsCancelled,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Drawer,
    Settings,
}

pub trait AppWindow {
    fn handle(&self) -> WindowHandle;

    fn kind(&self) -> WindowKind;

    fn title(&self) -> &str;

    /// Recompute visual treatment from a freshly derived palette.
    fn on_theme_changed(&mut self, palette: &Palette, chrome: &mut dyn WindowChrome);

    /// Draw the window for this frame. Called every frame by `App::update`.
    fn show(&mut self, ctx: &egui::Context, state: &mut AppState<'_>) -> Option<WindowEvent>;
}

/// Stable egui viewport id for a chrome handle.
pub fn viewport_id(handle: WindowHandle) -> ViewportId {
    ViewportId::from_hash_of(("drawers-window", handle.0))
}

/// Translate recorded chrome state into an egui viewport.
pub fn viewport_builder(spec: &ViewportSpec) -> ViewportBuilder {
    let min = [spec.min_size.width as f32, spec.min_size.height as f32];
    let initial = [spec.initial_size.width as f32, spec.initial_size.height as f32];
    let mut builder = ViewportBuilder::default()
        .with_title(spec.title.clone())
        .with_min_inner_size(min)
        .with_inner_size(initial)
        .with_decorations(!spec.borderless)
        .with_transparent(true)
        .with_taskbar(!spec.skip_taskbar && spec.owner.is_none());
    if let Some(position) = spec.position {
        builder = builder.with_position([position.x as f32, position.y as f32]);
    }
    builder
}

/// `colors` with fills at the window's recorded opacity.
pub fn paint_colors(colors: &ThemeColors, spec: &ViewportSpec) -> ThemeColors {
    colors.with_alpha(spec.alpha)
}

/// Size of the viewport `ctx` currently draws into, if the backend reports it.
pub fn current_size(ctx: &egui::Context) -> Option<Size> {
    ctx.input(|i| i.viewport().inner_rect).map(|rect| {
        Size::new(
            rect.width().round().max(0.0) as u32,
            rect.height().round().max(0.0) as u32,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn viewport_ids_are_stable_per_handle() {
        assert_eq!(viewport_id(WindowHandle(3)), viewport_id(WindowHandle(3)));
        assert_ne!(viewport_id(WindowHandle(3)), viewport_id(WindowHandle(4)));
    }

    #[test]
    fn builder_reflects_chrome_state() {
        let mut chrome = ViewportChrome::default();
        let handle = chrome.create_window("Docs - drawers", Size::new(420, 360), Size::new(420, 360));
        chrome.set_borderless(handle);
        chrome.hide_from_taskbar(handle);
        chrome.set_position(handle, Point { x: 10, y: 20 });

        let builder = viewport_builder(chrome.spec(handle).unwrap());
        assert_eq!(builder.title.as_deref(), Some("Docs - drawers"));
        assert_eq!(builder.decorations, Some(false));
        assert_eq!(builder.taskbar, Some(false));
        assert_eq!(builder.transparent, Some(true));
        assert_eq!(builder.inner_size, Some(egui::vec2(420.0, 360.0)));
        assert_eq!(builder.position, Some(egui::pos2(10.0, 20.0)));
    }

    #[test]
    fn owned_windows_stay_off_the_taskbar() {
        let mut chrome = ViewportChrome::default();
        let handle = chrome.create_window("x", Size::default(), Size::default());
        assert_eq!(viewport_builder(chrome.spec(handle).unwrap()).taskbar, Some(true));

        let mut spec = chrome.spec(handle).unwrap().clone();
        spec.owner = Some(WindowHandle(0));
        assert_eq!(viewport_builder(&spec).taskbar, Some(false));
    }

    #[test]
    fn paint_colors_follow_recorded_alpha() {
        let palette = crate::engine::palette::derive(&Theme::DEFAULT);
        let colors = ThemeColors::from_palette(&palette);
        let mut chrome = ViewportChrome::default();
        let handle = chrome.create_window("x", Size::default(), Size::default());

        let painted = paint_colors(&colors, chrome.spec(handle).unwrap());
        assert_eq!(painted.background.a(), 255);

        chrome.set_layered_alpha(handle, 128);
        let painted = paint_colors(&colors, chrome.spec(handle).unwrap());
        assert_eq!(painted.background.a(), 128);
        assert_eq!(painted.surface.a(), 128);
        assert_eq!(painted.text_primary.a(), 255);
    }
}
