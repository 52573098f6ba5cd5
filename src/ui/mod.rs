//! UI layer: App orchestrator, AppWindow trait, colour conversion, and windows.

pub mod app;
pub mod colors;
pub mod window;
pub mod windows;
