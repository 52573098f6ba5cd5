//! Platform layer: the windowing, shell and tray collaborators the controllers
//! call into, each behind a trait with one desktop implementation.

pub mod chrome;
pub mod shell;
pub mod tray;
