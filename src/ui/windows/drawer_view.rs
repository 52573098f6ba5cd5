//! Drawer window: a borderless, translucent file browser rooted at one
//! drawer's folder.

use eframe::egui::{self, Align, Layout, RichText, Sense, ViewportClass, ViewportCommand};
use egui_extras::{Column, TableBuilder};

use crate::engine::directory::{DirectoryModel, Navigation, SortColumn};
use crate::engine::palette::Palette;
use crate::error::Result;
use crate::platform::chrome::{WindowChrome, WindowHandle};
use crate::platform::shell::Shell;
use crate::types::{Drawer, FileEntry, Size};
use crate::ui::colors::ThemeColors;
use crate::ui::window::{
    AppState, AppWindow, WindowEvent, WindowKind, current_size, paint_colors, viewport_builder,
    viewport_id,
};
use crate::utils;

const ROW_HEIGHT: f32 = 22.0;
const ICON_EDGE: f32 = 16.0;

/// User input gathered while drawing one frame, applied once drawing is done.
enum DrawerAction {
    Activate(usize),
    Up,
    Sort(SortColumn),
    Close,
}

pub struct DrawerWindow {
    drawer: Drawer,
    handle: WindowHandle,
    title: String,
    model: DirectoryModel,
    colors: ThemeColors,
    /// Last inner size the backend reported; written back on close.
    last_size: Size,
}

impl DrawerWindow {
    /// List the drawer's folder and create its window. Nothing is created when
    /// the folder cannot be listed.
    pub fn open(drawer: Drawer, palette: &Palette, chrome: &mut dyn WindowChrome) -> Result<Self> {
        let model = DirectoryModel::open(&drawer.path)?;
        let title = format!("{} - drawers", drawer.name);

        let handle = chrome.create_window(&title, drawer.size, drawer.size);
        chrome.set_borderless(handle);
        chrome.hide_from_taskbar(handle);

        log::info!("opened drawer {} at {}", drawer.name, drawer.path);
        let mut window = Self {
            last_size: drawer.size,
            drawer,
            handle,
            title,
            model,
            colors: ThemeColors::from_palette(palette),
        };
        window.on_theme_changed(palette, chrome);
        Ok(window)
    }

    #[allow(dead_code)]
    pub fn drawer(&self) -> &Drawer {
        &self.drawer
    }

    #[allow(dead_code)]
    pub fn model(&self) -> &DirectoryModel {
        &self.model
    }

    /// The drawer record as it should be persisted when the window closes.
    pub fn closing_record(&self) -> Drawer {
        Drawer {
            size: self.last_size,
            ..self.drawer.clone()
        }
    }

    /// Double-click on row `index`: enter a folder or hand a file to the shell.
    pub fn activate(&mut self, index: usize, shell: &mut dyn Shell) {
        let Some(entry) = self.model.entries().get(index).cloned() else {
            return;
        };
        match self.model.navigate_into(&entry, shell) {
            Ok(Navigation::Entered) => log::debug!("{}: entered {}", self.drawer.name, entry.path.display()),
            Ok(Navigation::Opened) => log::info!("opened {}", entry.path.display()),
            Err(err) => log::warn!("{}: {err}", self.drawer.name),
        }
    }

    pub fn go_up(&mut self) {
        if let Err(err) = self.model.navigate_up() {
            log::warn!("{}: failed to navigate to parent: {err}", self.drawer.name);
        }
    }

    /// Record the size the backend reports for this window's own viewport. An
    /// embedded fallback reports the host's size, which is not ours to keep.
    fn observe_size(&mut self, class: ViewportClass, size: Option<Size>) {
        if class == ViewportClass::Embedded {
            return;
        }
        if let Some(size) = size {
            self.last_size = size;
        }
    }

    fn apply(&mut self, action: DrawerAction, shell: &mut dyn Shell) -> Option<WindowEvent> {
        match action {
            DrawerAction::Activate(index) => self.activate(index, shell),
            DrawerAction::Up => self.go_up(),
            DrawerAction::Sort(column) => self.model.toggle_sort(column),
            DrawerAction::Close => return Some(WindowEvent::DrawerClosed(self.closing_record())),
        }
        None
    }

    // ── Drawing ────────────────────────────────────────────────────────────────

    fn header(&self, ui: &mut egui::Ui, state: &mut AppState<'_>) -> Option<DrawerAction> {
        let drag = ui.interact(ui.max_rect(), ui.id().with("drag"), Sense::click_and_drag());
        if drag.drag_started() {
            state.chrome.begin_drag(self.handle);
        }

        let mut action = None;
        ui.horizontal(|ui| {
            if ui.button("⬆ Up").clicked() {
                action = Some(DrawerAction::Up);
            }
            ui.label(RichText::new(&self.drawer.name).strong());
            ui.label(
                RichText::new(self.model.current_path().display().to_string())
                    .color(self.colors.text_secondary),
            );
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("✕").clicked() {
                    action = Some(DrawerAction::Close);
                }
            });
        });
        action
    }

    fn table(&self, ui: &mut egui::Ui, state: &AppState<'_>) -> Option<DrawerAction> {
        let mut action = None;
        let entries = self.model.entries();
        let active = self.model.sort_column();
        let ascending = self.model.ascending();

        TableBuilder::new(ui)
            .id_salt(self.handle.0)
            .striped(true)
            .sense(Sense::click())
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::remainder().at_least(160.0).clip(true))
            .column(Column::auto().at_least(70.0))
            .column(Column::auto().at_least(120.0))
            .header(ROW_HEIGHT, |mut header| {
                for column in SortColumn::ALL {
                    header.col(|ui| {
                        let marker = match (column == active, ascending) {
                            (false, _) => "",
                            (true, true) => " ⏶",
                            (true, false) => " ⏷",
                        };
                        if ui.button(format!("{}{marker}", column.label())).clicked() {
                            action = Some(DrawerAction::Sort(column));
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, entries.len(), |mut row| {
                    let index = row.index();
                    let entry = &entries[index];
                    row.col(|ui| name_cell(ui, entry, state));
                    row.col(|ui| {
                        ui.label(RichText::new(entry.info_label()).color(self.colors.text_secondary));
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(entry.modified_label()).color(self.colors.text_secondary));
                    });
                    if row.response().double_clicked() {
                        action = Some(DrawerAction::Activate(index));
                    }
                });
            });
        action
    }

    fn contents(
        &self,
        ctx: &egui::Context,
        state: &mut AppState<'_>,
        colors: &ThemeColors,
    ) -> Option<DrawerAction> {
        let header = egui::TopBottomPanel::top(egui::Id::new(("drawer-header", self.handle.0)))
            .frame(egui::Frame::new().fill(colors.accent_dark).inner_margin(6.0))
            .show(ctx, |ui| self.header(ui, state))
            .inner;
        let body = egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors.surface).inner_margin(4.0))
            .show(ctx, |ui| self.table(ui, state))
            .inner;
        header.or(body)
    }
}

fn name_cell(ui: &mut egui::Ui, entry: &FileEntry, state: &AppState<'_>) {
    let icon = utils::extension_key(&entry.path)
        .filter(|_| !entry.is_dir)
        .and_then(|ext| state.extension_icons.get(&ext));
    match icon {
        Some(icon) => {
            ui.add(
                egui::Image::new(file_uri(icon))
                    .fit_to_exact_size(egui::vec2(ICON_EDGE, ICON_EDGE)),
            );
        }
        None if entry.is_dir => {
            ui.label("📁");
        }
        None => {
            ui.label("📄");
        }
    }

    let label = ui.label(&entry.name);
    if !entry.is_dir && utils::is_image(&entry.path) {
        let max = egui::vec2(
            state.thumbnail_size.width as f32,
            state.thumbnail_size.height as f32,
        );
        let uri = file_uri(&entry.path.to_string_lossy());
        label.on_hover_ui(|ui| {
            ui.add(egui::Image::new(uri).max_size(max));
        });
    }
}

fn file_uri(path: &str) -> String {
    format!("file://{path}")
}

impl AppWindow for DrawerWindow {
    fn handle(&self) -> WindowHandle {
        self.handle
    }

    fn kind(&self) -> WindowKind {
        WindowKind::Drawer
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn on_theme_changed(&mut self, palette: &Palette, chrome: &mut dyn WindowChrome) {
        self.colors = ThemeColors::from_palette(palette);
        chrome.set_layered_alpha(self.handle, palette.window_alpha);
    }

    fn show(&mut self, ctx: &egui::Context, state: &mut AppState<'_>) -> Option<WindowEvent> {
        let spec = state.chrome.spec(self.handle)?;
        let builder = viewport_builder(spec);
        let colors = paint_colors(&self.colors, spec);

        let action = ctx.show_viewport_immediate(viewport_id(self.handle), builder, |ctx, class| {
            self.observe_size(class, current_size(ctx));

            let action = if class == ViewportClass::Embedded {
                let mut open = true;
                let inner = egui::Window::new(&self.title)
                    .id(egui::Id::new(("drawer-embedded", self.handle.0)))
                    .open(&mut open)
                    .default_size([self.drawer.size.width as f32, self.drawer.size.height as f32])
                    .show(ctx, |ui| {
                        let up = ui.button("⬆ Up").clicked().then_some(DrawerAction::Up);
                        up.or(self.table(ui, state))
                    })
                    .and_then(|r| r.inner)
                    .flatten();
                if open { inner } else { Some(DrawerAction::Close) }
            } else {
                self.contents(ctx, state, &colors)
            };

            if state.chrome.take_drag(self.handle) {
                ctx.send_viewport_cmd(ViewportCommand::StartDrag);
            }
            if ctx.input(|i| i.viewport().close_requested()) {
                return Some(DrawerAction::Close);
            }
            action
        });

        action.and_then(|action| self.apply(action, state.shell))
    }
}
