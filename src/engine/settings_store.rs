//! Settings persistence: load with defaulting/migration, atomic save.
//!
//! Loading runs in three steps:
//! 1. Create the document with [`default_document`] if the file is missing.
//! 2. Parse the TOML and split off keys this version does not know, at the
//!    top level or inside a known section (they come from older layouts), so
//!    they can be carried in `deprecated` under their dotted path.
//! 3. Run [`apply_defaults`] once over the typed document.
//!
//! Saving writes a sibling temp file and renames it over the target while
//! holding a process-wide writer lock, so a concurrent reader never sees a
//! half-written document.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;

use crate::error::{AppError, Result};
use crate::types::{Drawer, Point, Settings, Size, Theme};
use crate::utils;

pub const DEFAULT_THUMBNAIL_EDGE: u32 = 96;
pub const DEFAULT_DRAWER_SIZE: Size = Size::new(420, 360);
const SAMPLE_DRAWER_SIZE: Size = Size::new(800, 600);
const DEFAULT_WINDOW_POSITION: Point = Point { x: 100, y: 100 };

/// Top-level keys the current schema understands.
const KNOWN_KEYS: &[&str] = &[
    "startup",
    "drawers",
    "window_position",
    "thumbnail_size",
    "theme",
    "extension_icon_map",
    "deprecated",
];

/// Fields of the fixed-shape sections. Anything else found inside them is
/// carried under `deprecated` with a dotted key such as `startup.foo`.
const SECTION_FIELDS: &[(&str, &[&str])] = &[
    ("startup", &["start_with_system", "window_locked"]),
    ("window_position", &["x", "y"]),
    ("thumbnail_size", &["width", "height"]),
    ("theme", &["hue", "saturation", "lightness", "alpha"]),
];
const DRAWER_FIELDS: &[&str] = &["name", "path", "size"];
const SIZE_FIELDS: &[&str] = &["width", "height"];

/// Historical autostart flag, found either at the top level or inside
/// `[startup]`, that `start_with_system` replaced.
const LEGACY_AUTOSTART_KEYS: &[&str] = &["startup.start_with_windows", "start_with_windows"];

static SAVE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// The document written when no settings file exists yet.
pub fn default_document() -> Settings {
    Settings {
        drawers: vec![Drawer {
            name: "Drawer 1".to_string(),
            path: utils::default_root(),
            size: SAMPLE_DRAWER_SIZE,
        }],
        window_position: DEFAULT_WINDOW_POSITION,
        thumbnail_size: Size::new(DEFAULT_THUMBNAIL_EDGE, DEFAULT_THUMBNAIL_EDGE),
        theme: Theme::DEFAULT,
        ..Settings::default()
    }
}

/// Read the document at `path`, creating a default one first if it is missing.
pub fn load(path: &Path) -> Result<Settings> {
    let exists = path.try_exists().map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !exists {
        log::info!("no settings at {}, writing defaults", path.display());
        save(path, &default_document())?;
    }

    let text = fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &text)
}

/// Parse a serialized document and normalise it.
pub fn parse(path: &Path, text: &str) -> Result<Settings> {
    let parse_err = |source: toml::de::Error| AppError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut table: toml::Table = toml::from_str(text).map_err(parse_err)?;
    let has_autostart = table
        .get("startup")
        .and_then(toml::Value::as_table)
        .is_some_and(|startup| startup.contains_key("start_with_system"));
    let legacy = split_legacy_keys(&mut table);

    let mut settings = toml::Value::Table(table)
        .try_into::<Settings>()
        .map_err(parse_err)?;
    migrate_legacy(&mut settings, legacy, has_autostart);
    Ok(apply_defaults(settings))
}

/// Serialize `settings` and replace the file at `path`.
pub fn save(path: &Path, settings: &Settings) -> Result<()> {
    let _guard = SAVE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    let text = toml::to_string_pretty(settings)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| AppError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, text).map_err(|source| AppError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        AppError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    log::debug!("settings saved to {}", path.display());
    Ok(())
}

/// Fill in everything an older or partial document may lack.
pub fn apply_defaults(mut settings: Settings) -> Settings {
    if settings.thumbnail_size.width == 0 {
        settings.thumbnail_size.width = DEFAULT_THUMBNAIL_EDGE;
    }
    if settings.thumbnail_size.height == 0 {
        settings.thumbnail_size.height = DEFAULT_THUMBNAIL_EDGE;
    }

    settings.theme = if settings.theme.is_unset() {
        Theme::DEFAULT
    } else {
        settings.theme.clamped()
    };

    for drawer in &mut settings.drawers {
        if drawer.size.width == 0 || drawer.size.height == 0 {
            drawer.size = DEFAULT_DRAWER_SIZE;
        }
    }

    settings
}

/// Log a short description of the loaded document.
pub fn log_summary(settings: &Settings) {
    log::info!("{} drawer(s) configured", settings.drawers.len());
    for (i, drawer) in settings.drawers.iter().enumerate() {
        log::info!(
            "  {}. {} -> {} ({}x{})",
            i + 1,
            drawer.name,
            drawer.path,
            drawer.size.width,
            drawer.size.height
        );
    }
    let theme = settings.theme;
    log::info!(
        "theme hsla({}, {}%, {}%, {}%), panel at ({}, {})",
        theme.hue,
        theme.saturation,
        theme.lightness,
        theme.alpha,
        settings.window_position.x,
        settings.window_position.y
    );
}

// ── Legacy handling ────────────────────────────────────────────────────────────

fn split_legacy_keys(table: &mut toml::Table) -> BTreeMap<String, toml::Value> {
    let mut legacy = take_unknown(table, KNOWN_KEYS, "");

    for (section, fields) in SECTION_FIELDS {
        if let Some(toml::Value::Table(inner)) = table.get_mut(*section) {
            legacy.extend(take_unknown(inner, fields, section));
        }
    }

    if let Some(toml::Value::Array(drawers)) = table.get_mut("drawers") {
        for (i, drawer) in drawers.iter_mut().enumerate() {
            let toml::Value::Table(drawer) = drawer else { continue };
            let prefix = format!("drawers.{i}");
            legacy.extend(take_unknown(drawer, DRAWER_FIELDS, &prefix));
            if let Some(toml::Value::Table(size)) = drawer.get_mut("size") {
                legacy.extend(take_unknown(size, SIZE_FIELDS, &format!("{prefix}.size")));
            }
        }
    }
    legacy
}

/// Remove the keys of `table` not listed in `known`, keyed by their dotted
/// path under `prefix`.
fn take_unknown(
    table: &mut toml::Table,
    known: &[&str],
    prefix: &str,
) -> BTreeMap<String, toml::Value> {
    let unknown: Vec<String> = table
        .keys()
        .filter(|k| !known.contains(&k.as_str()))
        .cloned()
        .collect();

    unknown
        .into_iter()
        .filter_map(|k| {
            let value = table.remove(&k)?;
            let key = if prefix.is_empty() { k } else { format!("{prefix}.{k}") };
            Some((key, value))
        })
        .collect()
}

fn migrate_legacy(
    settings: &mut Settings,
    legacy: BTreeMap<String, toml::Value>,
    has_autostart: bool,
) {
    if !has_autostart {
        let autostart = LEGACY_AUTOSTART_KEYS
            .iter()
            .find_map(|key| legacy.get(*key).and_then(toml::Value::as_bool));
        if let Some(autostart) = autostart {
            settings.startup.start_with_system = autostart;
        }
    }

    for (key, value) in legacy {
        log::info!("carrying retired settings key `{key}` under [deprecated]");
        let rendered = match value {
            toml::Value::String(s) => s,
            other => other.to_string(),
        };
        settings.deprecated.entry(key).or_insert(rendered);
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
