//! drawers: a small always-available panel of folder shortcuts, each opening a
//! borderless translucent file browser.

mod engine;
mod error;
mod platform;
mod types;
mod ui;
mod utils;

#[cfg(test)]
mod testing;

use crate::engine::settings_store;
use crate::platform::shell::DesktopShell;
use crate::ui::app::{APP_NAME, App};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = utils::settings_path();
    let settings = match settings_store::load(&path) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("cannot start without settings: {err}");
            std::process::exit(1);
        }
    };
    log::info!("settings loaded from {}", path.display());
    settings_store::log_summary(&settings);

    let app = App::new(path, settings, Box::new(DesktopShell));
    let options = eframe::NativeOptions {
        viewport: app.panel_viewport(),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
}
