//! Path helpers and display formatting shared by the engine and the UI.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// File name of the persisted settings document.
pub const SETTINGS_FILE_NAME: &str = "drawers-settings.toml";

const APP_DIR_NAME: &str = "drawers";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

// ── Paths ──────────────────────────────────────────────────────────────────────

/// The one fixed location the settings document is read from at startup.
///
/// - Linux: `~/.config/drawers/drawers-settings.toml`
/// - macOS: `~/Library/Application Support/drawers/drawers-settings.toml`
/// - Windows: `%APPDATA%\drawers\drawers-settings.toml`
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_FILE_NAME)
}

/// Folder the sample drawer of a freshly created document points at.
pub fn default_root() -> String {
    if cfg!(windows) {
        "C:\\".to_string()
    } else {
        "/".to_string()
    }
}

/// Lower-cased extension without the dot, if any.
pub fn extension_key(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn is_image(path: &Path) -> bool {
    extension_key(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

// ── Formatting ─────────────────────────────────────────────────────────────────

pub fn format_size(bytes: u64) -> String {
    format!("{} KB", bytes / 1024)
}

pub fn format_modified(modified: &DateTime<Local>) -> String {
    modified.format("%Y-%m-%d %H:%M").to_string()
}

/// `Opacity: 204 (80%)` for a raw 0-255 alpha.
pub fn opacity_label(alpha: u8) -> String {
    let percent = (f64::from(alpha) * 100.0 / 255.0).round() as u32;
    format!("Opacity: {alpha} ({percent}%)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_path_ends_with_fixed_name() {
        let path = settings_path();
        assert_eq!(path.file_name().unwrap(), SETTINGS_FILE_NAME);
        assert_eq!(path.parent().unwrap().file_name().unwrap(), APP_DIR_NAME);
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert_eq!(extension_key(Path::new("a/B.PNG")).as_deref(), Some("png"));
        assert_eq!(extension_key(Path::new("README")), None);
        assert!(is_image(Path::new("holiday.JPeG")));
        assert!(!is_image(Path::new("notes.txt")));
    }

    #[test]
    fn size_is_whole_kilobytes() {
        assert_eq!(format_size(0), "0 KB");
        assert_eq!(format_size(1023), "0 KB");
        assert_eq!(format_size(1536), "1 KB");
    }

    #[test]
    fn opacity_label_rounds_percent() {
        assert_eq!(opacity_label(255), "Opacity: 255 (100%)");
        assert_eq!(opacity_label(200), "Opacity: 200 (78%)");
        assert_eq!(opacity_label(0), "Opacity: 0 (0%)");
    }
}
