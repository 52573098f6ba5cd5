//! Toolkit-free core: settings persistence, palette derivation and the
//! directory model behind every drawer window.

pub mod directory;
pub mod palette;
pub mod settings_store;
