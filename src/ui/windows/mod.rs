//! Registered UI windows, each implementing `AppWindow`.

pub mod drawer_view;
pub mod settings_view;
