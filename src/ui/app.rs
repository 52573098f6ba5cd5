//! Application orchestrator: owns the settings document and palette, draws the
//! panel, and drives every registered window.

use std::path::{Path, PathBuf};

use eframe::egui::{self, RichText, Sense, ViewportBuilder, ViewportCommand};

use crate::engine::palette::{self, Palette};
use crate::engine::settings_store::{self, DEFAULT_DRAWER_SIZE};
use crate::error::Result;
use crate::platform::chrome::{ViewportChrome, WindowChrome, WindowHandle};
use crate::platform::shell::Shell;
use crate::platform::tray::{PanelTray, Tray, TrayAction};
use crate::types::{Drawer, Point, Settings, Size, Startup, Theme};
use crate::ui::colors::{self, ThemeColors};
use crate::ui::window::{
    AppState, AppWindow, WindowEvent, WindowKind, paint_colors, viewport_builder,
};
use crate::ui::windows::{drawer_view::DrawerWindow, settings_view::SettingsWindow};

pub const APP_NAME: &str = "drawers";
const PANEL_MIN_SIZE: Size = Size::new(200, 240);
const PANEL_SIZE: Size = Size::new(240, 380);

/// Panel input gathered while drawing, applied once drawing is done.
enum PanelAction {
    Open(Drawer),
    Add,
    Settings,
}

// ── App struct ─────────────────────────────────────────────────────────────────

/// The top-level application, implementing [`eframe::App`].
///
/// `App` is the single writer of the settings document and the palette. It:
/// 1. Draws the panel (root viewport) and collects its button presses.
/// 2. Drains tray actions.
/// 3. Shows every registered window and applies the events they report.
pub struct App {
    settings_path: PathBuf,
    settings: Settings,
    palette: Palette,
    colors: ThemeColors,
    visuals_dirty: bool,

    // ── Collaborators ──────────────────────────────────────────────────────
    chrome: ViewportChrome,
    shell: Box<dyn Shell>,
    tray: PanelTray,
    panel: WindowHandle,

    // ── Panel state ────────────────────────────────────────────────────────
    drawers_visible: bool,
    focus_requested: bool,
    exit_requested: bool,
    /// Last outer position of the panel the backend reported.
    panel_position: Option<Point>,

    // ── Window registry ────────────────────────────────────────────────────
    windows: Vec<Box<dyn AppWindow>>,
}

impl App {
    pub fn new(settings_path: PathBuf, settings: Settings, shell: Box<dyn Shell>) -> Self {
        let palette = palette::derive(&settings.theme);

        let mut chrome = ViewportChrome::default();
        let panel = chrome.create_window(APP_NAME, PANEL_MIN_SIZE, PANEL_SIZE);
        chrome.set_borderless(panel);
        chrome.hide_from_taskbar(panel);
        chrome.set_layered_alpha(panel, palette.window_alpha);
        chrome.set_position(panel, settings.window_position);

        let mut tray = PanelTray::default();
        tray.show_tray_icon(APP_NAME);

        Self {
            settings_path,
            settings,
            colors: ThemeColors::from_palette(&palette),
            palette,
            visuals_dirty: true,
            chrome,
            shell,
            tray,
            panel,
            drawers_visible: true,
            focus_requested: false,
            exit_requested: false,
            panel_position: None,
            windows: Vec::new(),
        }
    }

    /// Root viewport for `eframe::NativeOptions`.
    pub fn panel_viewport(&self) -> ViewportBuilder {
        match self.chrome.spec(self.panel) {
            Some(spec) => viewport_builder(spec),
            None => ViewportBuilder::default().with_title(APP_NAME),
        }
    }

    #[allow(dead_code)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[allow(dead_code)]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[allow(dead_code)]
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn persist(&self) -> Result<()> {
        settings_store::save(&self.settings_path, &self.settings)
    }

    // ── Drawer operations ──────────────────────────────────────────────────────

    /// Append a drawer for `folder` and persist the document.
    pub fn add_drawer(&mut self, folder: &Path) -> Result<()> {
        let path = folder.to_string_lossy().into_owned();
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| path.clone());

        log::info!("adding drawer {name} -> {path}");
        self.settings.drawers.push(Drawer {
            name,
            path,
            size: DEFAULT_DRAWER_SIZE,
        });
        self.persist()
    }

    fn browse_and_add_drawer(&mut self) {
        let Some(folder) = self.shell.browse_for_folder() else {
            return;
        };
        if let Err(err) = self.add_drawer(&folder) {
            log::error!("failed to save new drawer: {err}");
        }
    }

    /// Open a browser window for `drawer`. Several windows may show the same
    /// drawer at once.
    pub fn open_drawer(&mut self, drawer: &Drawer) -> Result<()> {
        let window = DrawerWindow::open(drawer.clone(), &self.palette, &mut self.chrome)?;
        self.windows.push(Box::new(window));
        self.drawers_visible = true;
        Ok(())
    }

    /// Replace the drawer whose path matches `updated` and persist. Updates for
    /// drawers no longer in the document are dropped.
    pub fn persist_drawer_update(&mut self, updated: Drawer) -> Result<()> {
        let Some(slot) = self
            .settings
            .drawers
            .iter_mut()
            .find(|d| d.path == updated.path)
        else {
            log::debug!("no drawer at {}, dropping update", updated.path);
            return Ok(());
        };
        *slot = updated;
        self.persist()
    }

    // ── Theme ──────────────────────────────────────────────────────────────────

    /// Replace the theme, re-derive the palette, push it to every window, and
    /// persist. Everything completes before returning.
    pub fn apply_theme(&mut self, theme: Theme) -> Result<()> {
        self.settings.theme = theme.clamped();
        self.palette = palette::derive(&self.settings.theme);
        self.colors = ThemeColors::from_palette(&self.palette);
        self.visuals_dirty = true;

        self.chrome.set_layered_alpha(self.panel, self.palette.window_alpha);
        for window in &mut self.windows {
            window.on_theme_changed(&self.palette, &mut self.chrome);
        }
        log::info!(
            "theme applied, {} window(s) updated, opacity {}",
            self.windows.len(),
            self.palette.window_alpha
        );
        self.persist()
    }

    fn apply_settings(&mut self, theme: Theme, startup: Startup) -> Result<()> {
        self.settings.startup = startup;
        self.apply_theme(theme)
    }

    fn open_settings(&mut self) {
        if self.windows.iter().any(|w| w.kind() == WindowKind::Settings) {
            self.focus_requested = true;
            return;
        }
        let window = SettingsWindow::open(
            self.settings.theme,
            self.settings.startup,
            &self.palette,
            &mut self.chrome,
        );
        self.windows.push(Box::new(window));
    }

    fn close_window(&mut self, handle: WindowHandle) {
        if let Some(index) = self.windows.iter().position(|w| w.handle() == handle) {
            let window = self.windows.remove(index);
            log::debug!("closed {}", window.title());
        }
        self.chrome.destroy_window(handle);
    }

    /// Apply something window `handle` reported this frame.
    pub fn on_window_event(&mut self, handle: WindowHandle, event: WindowEvent) {
        match event {
            WindowEvent::DrawerClosed(drawer) => {
                self.close_window(handle);
                if let Err(err) = self.persist_drawer_update(drawer) {
                    log::error!("failed to save drawer size: {err}");
                }
            }
            WindowEvent::SettingsApplied { theme, startup } => {
                self.close_window(handle);
                if let Err(err) = self.apply_settings(theme, startup) {
                    log::error!("failed to save settings: {err}");
                }
            }
            WindowEvent::SettingsCancelled => self.close_window(handle),
            WindowEvent::Shutdown => {
                self.close_window(handle);
                self.exit_requested = true;
            }
        }
    }

    /// Write the panel's last reported position back when it moved.
    fn save_panel_position(&mut self) {
        let Some(position) = self.panel_position else {
            return;
        };
        if position == self.settings.window_position {
            return;
        }
        self.settings.window_position = position;
        match self.persist() {
            Ok(()) => log::info!("panel position saved ({}, {})", position.x, position.y),
            Err(err) => log::error!("failed to save panel position: {err}"),
        }
    }

    // ── Tray ───────────────────────────────────────────────────────────────────

    pub fn on_tray_action(&mut self, action: TrayAction) {
        match action {
            TrayAction::Click => {
                self.drawers_visible = true;
                self.focus_requested = true;
            }
            TrayAction::ToggleVisibility => self.drawers_visible = !self.drawers_visible,
            TrayAction::Exit => self.exit_requested = true,
        }
    }

    // ── Panel ──────────────────────────────────────────────────────────────────

    /// Panel colours at the opacity recorded on the panel window.
    fn panel_colors(&self) -> ThemeColors {
        match self.chrome.spec(self.panel) {
            Some(spec) => paint_colors(&self.colors, spec),
            None => self.colors.with_alpha(self.palette.window_alpha),
        }
    }

    fn draw_panel(&mut self, ctx: &egui::Context) -> Option<PanelAction> {
        let colors = self.panel_colors();
        let mut action = None;

        egui::TopBottomPanel::top("panel-header")
            .frame(egui::Frame::new().fill(colors.accent_dark).inner_margin(6.0))
            .show(ctx, |ui| {
                let drag = ui.interact(ui.max_rect(), ui.id().with("drag"), Sense::click_and_drag());
                if drag.drag_started() && !self.settings.startup.window_locked {
                    self.chrome.begin_drag(self.panel);
                }

                ui.horizontal(|ui| {
                    let brand = ui.add(
                        egui::Label::new(RichText::new(APP_NAME).strong().size(16.0))
                            .sense(Sense::click()),
                    );
                    let brand = match self.tray.tooltip() {
                        Some(tooltip) => brand.on_hover_text(tooltip),
                        None => brand,
                    };
                    if brand.clicked() {
                        self.tray.push(TrayAction::Click);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.menu_button("☰", |ui| {
                            let toggle = if self.drawers_visible {
                                "Hide drawers"
                            } else {
                                "Show drawers"
                            };
                            if ui.button(toggle).clicked() {
                                self.tray.push(TrayAction::ToggleVisibility);
                                ui.close();
                            }
                            if ui.button("Exit").clicked() {
                                self.tray.push(TrayAction::Exit);
                                ui.close();
                            }
                        });
                        if styled_button(ui, "⚙", colors.accent_dark, colors.accent).clicked() {
                            action = Some(PanelAction::Settings);
                        }
                    });
                });
            });

        egui::TopBottomPanel::bottom("panel-footer")
            .frame(egui::Frame::new().fill(colors.background).inner_margin(6.0))
            .show(ctx, |ui| {
                ui.vertical_centered_justified(|ui| {
                    if styled_button(ui, "Add Drawer", colors.accent, colors.accent_light).clicked() {
                        action = Some(PanelAction::Add);
                    }
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors.surface).inner_margin(6.0))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.vertical_centered_justified(|ui| {
                        for drawer in &self.settings.drawers {
                            let button =
                                styled_button(ui, &drawer.name, colors.surface_light, colors.accent_light)
                                    .on_hover_text(&drawer.path);
                            if button.clicked() {
                                action = Some(PanelAction::Open(drawer.clone()));
                            }
                        }
                    });
                });
            });

        if self.chrome.take_drag(self.panel) {
            ctx.send_viewport_cmd(ViewportCommand::StartDrag);
        }
        action
    }

    fn on_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::Open(drawer) => {
                if let Err(err) = self.open_drawer(&drawer) {
                    log::warn!("failed to open drawer {}: {err}", drawer.name);
                }
            }
            PanelAction::Add => self.browse_and_add_drawer(),
            PanelAction::Settings => self.open_settings(),
        }
    }

    fn show_windows(&mut self, ctx: &egui::Context) {
        let mut events = Vec::new();
        let mut state = AppState {
            colors: &self.colors,
            chrome: &mut self.chrome,
            shell: self.shell.as_mut(),
            extension_icons: &self.settings.extension_icon_map,
            thumbnail_size: self.settings.thumbnail_size,
        };
        for window in &mut self.windows {
            // Hidden drawers stay registered; only their viewports go away.
            if !self.drawers_visible && window.kind() == WindowKind::Drawer {
                continue;
            }
            if let Some(event) = window.show(ctx, &mut state) {
                events.push((window.handle(), event));
            }
        }
        for (handle, event) in events {
            self.on_window_event(handle, event);
        }
    }
}

/// A button with an idle fill and a hover fill.
fn styled_button(ui: &mut egui::Ui, text: &str, idle: egui::Color32, hover: egui::Color32) -> egui::Response {
    ui.scope(|ui| {
        let widgets = &mut ui.visuals_mut().widgets;
        widgets.inactive.weak_bg_fill = idle;
        widgets.inactive.bg_fill = idle;
        widgets.hovered.weak_bg_fill = hover;
        widgets.hovered.bg_fill = hover;
        ui.button(text)
    })
    .inner
}

// ── eframe::App ────────────────────────────────────────────────────────────────

impl eframe::App for App {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── 1. Theme ──────────────────────────────────────────────────────────
        if self.visuals_dirty {
            colors::apply_visuals(ctx, &self.colors.with_alpha(self.palette.window_alpha));
            self.visuals_dirty = false;
        }

        if let Some(rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.panel_position = Some(Point {
                x: rect.min.x.round() as i32,
                y: rect.min.y.round() as i32,
            });
        }

        // ── 2. Panel ──────────────────────────────────────────────────────────
        if let Some(action) = self.draw_panel(ctx) {
            self.on_panel_action(action);
        }

        // ── 3. Tray ───────────────────────────────────────────────────────────
        while let Some(action) = self.tray.poll() {
            self.on_tray_action(action);
        }

        // ── 4. Windows ────────────────────────────────────────────────────────
        self.show_windows(ctx);

        if std::mem::take(&mut self.focus_requested) {
            ctx.send_viewport_cmd(ViewportCommand::Focus);
        }
        if self.exit_requested {
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.save_panel_position();
    }
}
