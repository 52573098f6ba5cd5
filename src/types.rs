//! Shared data-model types: the persisted settings document and the
//! ephemeral directory entries shown in drawer windows.
//!
//! # Persistence strategy
//!
//! Every persisted struct is `#[serde(default)]` so that partially populated or
//! historical documents deserialize instead of failing. The zero values that
//! result from absent sections are then rewritten by the defaulting pass in
//! [`crate::engine::settings_store`]; nothing here knows about defaults beyond
//! the derive.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::utils;

// ── Geometry ───────────────────────────────────────────────────────────────────

/// Width/height pair in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Screen position in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

// ── Theme ──────────────────────────────────────────────────────────────────────

/// The four slider values the palette is derived from.
///
/// `Default` is the all-zero "unset" value that serde produces for a missing
/// `[theme]` section; use [`Theme::DEFAULT`] for the shipped theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Degrees, 0..=360.
    pub hue: i32,
    /// Percent, 0..=100.
    pub saturation: i32,
    /// Percent, 0..=100.
    pub lightness: i32,
    /// Percent opacity, 0..=100.
    pub alpha: i32,
}

impl Theme {
    pub const DEFAULT: Theme = Theme {
        hue: 192,
        saturation: 40,
        lightness: 36,
        alpha: 80,
    };

    /// Build a theme, clamping every component to its slider range.
    pub fn new(hue: i32, saturation: i32, lightness: i32, alpha: i32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha,
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            hue: self.hue.clamp(0, 360),
            saturation: self.saturation.clamp(0, 100),
            lightness: self.lightness.clamp(0, 100),
            alpha: self.alpha.clamp(0, 100),
        }
    }

    /// True when every component is zero, i.e. the section was absent.
    pub fn is_unset(&self) -> bool {
        *self == Theme::default()
    }
}

// ── Settings document ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Startup {
    pub start_with_system: bool,
    pub window_locked: bool,
}

/// A folder shortcut. `path` is the identity key used to find the entry again
/// when its window reports a new size.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Drawer {
    pub name: String,
    pub path: String,
    pub size: Size,
}

/// The complete persisted configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub startup: Startup,
    pub drawers: Vec<Drawer>,
    pub window_position: Point,
    pub thumbnail_size: Size,
    pub theme: Theme,
    pub extension_icon_map: BTreeMap<String, String>,
    /// Retired keys carried forward verbatim; never read by application logic.
    pub deprecated: BTreeMap<String, String>,
}

// ── Directory entries ──────────────────────────────────────────────────────────

/// One row of a drawer window's directory table. Rebuilt on every listing.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
    pub modified: DateTime<Local>,
}

impl FileEntry {
    /// Text for the "Info" column.
    pub fn info_label(&self) -> String {
        if self.is_dir {
            "Folder".to_string()
        } else {
            utils::format_size(self.size)
        }
    }

    /// Text for the "Modified" column.
    pub fn modified_label(&self) -> String {
        utils::format_modified(&self.modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn theme_new_clamps_out_of_range_values() {
        let theme = Theme::new(400, -5, 101, 50);
        assert_eq!(theme, Theme { hue: 360, saturation: 0, lightness: 100, alpha: 50 });
    }

    #[test]
    fn zero_theme_is_unset() {
        assert!(Theme::default().is_unset());
        assert!(!Theme::DEFAULT.is_unset());
        assert!(!Theme::new(0, 0, 0, 100).is_unset());
    }

    #[test]
    fn entry_labels() {
        let modified = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let file = FileEntry {
            name: "notes.txt".into(),
            path: PathBuf::from("/tmp/notes.txt"),
            is_dir: false,
            size: 4096,
            modified,
        };
        assert_eq!(file.info_label(), "4 KB");
        assert_eq!(file.modified_label(), "2024-03-09 14:05");

        let dir = FileEntry { is_dir: true, ..file };
        assert_eq!(dir.info_label(), "Folder");
    }
}
