//! Directory model for one drawer window: listing, stable sort and in-place
//! navigation.
//!
//! Directories always sort ahead of files. The selected column only orders
//! entries within those two groups, and a descending sort reverses the column
//! comparison alone, never the grouping.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::error::{AppError, Result};
use crate::platform::shell::Shell;
use crate::types::FileEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Name,
    Size,
    Modified,
}

impl SortColumn {
    pub const ALL: [SortColumn; 3] = [SortColumn::Name, SortColumn::Size, SortColumn::Modified];

    /// Table header text.
    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::Size => "Info",
            SortColumn::Modified => "Modified",
        }
    }
}

/// What [`DirectoryModel::navigate_into`] did with the activated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The model now lists the entry's directory.
    Entered,
    /// The entry was a file and was handed to the shell; the model is unchanged.
    Opened,
}

/// Read the entries of `path`.
///
/// Entries whose metadata cannot be read (e.g. removed between the listing and
/// the stat) are skipped.
pub fn list(path: &Path) -> Result<Vec<FileEntry>> {
    let meta = fs::metadata(path).map_err(|e| AppError::io(path, e))?;
    if !meta.is_dir() {
        return Err(AppError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let reader = fs::read_dir(path).map_err(|e| AppError::io(path, e))?;
    let mut entries = Vec::new();
    for dir_entry in reader {
        let Ok(dir_entry) = dir_entry else { continue };
        // Follows symlinks, so a dangling link is skipped like any unreadable entry.
        let Ok(meta) = fs::metadata(dir_entry.path()) else {
            log::debug!("skipping unreadable entry {}", dir_entry.path().display());
            continue;
        };
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        entries.push(FileEntry {
            name: dir_entry.file_name().to_string_lossy().into_owned(),
            path: dir_entry.path(),
            is_dir: meta.is_dir(),
            size: meta.len(),
            modified: DateTime::<Local>::from(modified),
        });
    }
    Ok(entries)
}

/// Stable sort of `entries`: directories first, then `column`.
pub fn sort_entries(entries: &mut [FileEntry], column: SortColumn, ascending: bool) {
    entries.sort_by(|a, b| {
        b.is_dir.cmp(&a.is_dir).then_with(|| {
            let ord = compare_column(a, b, column);
            if ascending { ord } else { ord.reverse() }
        })
    });
}

fn compare_column(a: &FileEntry, b: &FileEntry, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => a.name.cmp(&b.name),
        // Directory sizes carry no meaning here.
        SortColumn::Size if a.is_dir && b.is_dir => Ordering::Equal,
        SortColumn::Size => a.size.cmp(&b.size),
        SortColumn::Modified => a.modified.cmp(&b.modified),
    }
}

// ── Model ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DirectoryModel {
    current_path: PathBuf,
    entries: Vec<FileEntry>,
    sort_column: SortColumn,
    ascending: bool,
}

impl DirectoryModel {
    /// List `path` and build a model rooted there.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut model = Self {
            current_path: PathBuf::new(),
            entries: Vec::new(),
            sort_column: SortColumn::Name,
            ascending: true,
        };
        model.load(path.into())?;
        Ok(model)
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn sort_column(&self) -> SortColumn {
        self.sort_column
    }

    pub fn ascending(&self) -> bool {
        self.ascending
    }

    /// Re-list at `path`, resetting the sort to Name ascending. On failure the
    /// model keeps its previous listing.
    pub fn load(&mut self, path: PathBuf) -> Result<()> {
        let mut entries = list(&path)?;
        sort_entries(&mut entries, SortColumn::Name, true);
        self.entries = entries;
        self.current_path = path;
        self.sort_column = SortColumn::Name;
        self.ascending = true;
        Ok(())
    }

    pub fn sort(&mut self, column: SortColumn, ascending: bool) {
        self.sort_column = column;
        self.ascending = ascending;
        sort_entries(&mut self.entries, column, ascending);
    }

    /// Header click: flip the order on the active column, otherwise start the
    /// new column ascending.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        let ascending = if column == self.sort_column {
            !self.ascending
        } else {
            true
        };
        self.sort(column, ascending);
    }

    pub fn navigate_into(&mut self, entry: &FileEntry, shell: &mut dyn Shell) -> Result<Navigation> {
        if entry.is_dir {
            self.load(entry.path.clone())?;
            Ok(Navigation::Entered)
        } else {
            shell.open_with_default_handler(&entry.path)?;
            Ok(Navigation::Opened)
        }
    }

    /// Move to the parent directory. Returns `false` when already at a root.
    pub fn navigate_up(&mut self) -> Result<bool> {
        let Some(parent) = self
            .current_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty() && *p != self.current_path)
        else {
            return Ok(false);
        };
        self.load(parent.to_path_buf())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingShell, scratch_dir};
    use chrono::TimeZone;

    fn entry(name: &str, is_dir: bool, size: u64, minute: u32) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: PathBuf::from("/x").join(name),
            is_dir,
            size,
            modified: Local.with_ymd_and_hms(2024, 1, 1, 12, minute, 0).unwrap(),
        }
    }

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn sample() -> Vec<FileEntry> {
        vec![
            entry("b.txt", false, 300, 5),
            entry("zeta", true, 4096, 1),
            entry("a.txt", false, 100, 9),
            entry("alpha", true, 0, 7),
            entry("c.txt", false, 100, 2),
        ]
    }

    #[test]
    fn directories_precede_files_for_every_column_and_order() {
        for column in SortColumn::ALL {
            for ascending in [true, false] {
                let mut entries = sample();
                sort_entries(&mut entries, column, ascending);
                let first_file = entries.iter().position(|e| !e.is_dir).unwrap();
                assert!(entries[first_file..].iter().all(|e| !e.is_dir), "{column:?} {ascending}");
            }
        }
    }

    #[test]
    fn name_sort() {
        let mut entries = sample();
        sort_entries(&mut entries, SortColumn::Name, true);
        assert_eq!(names(&entries), ["alpha", "zeta", "a.txt", "b.txt", "c.txt"]);
        sort_entries(&mut entries, SortColumn::Name, false);
        assert_eq!(names(&entries), ["zeta", "alpha", "c.txt", "b.txt", "a.txt"]);
    }

    #[test]
    fn size_sort_is_stable_and_ignores_directory_sizes() {
        let mut entries = sample();
        sort_entries(&mut entries, SortColumn::Size, true);
        // Equal sizes keep their input order; directories keep theirs too.
        assert_eq!(names(&entries), ["zeta", "alpha", "a.txt", "c.txt", "b.txt"]);
    }

    #[test]
    fn modified_sort() {
        let mut entries = sample();
        sort_entries(&mut entries, SortColumn::Modified, false);
        assert_eq!(names(&entries), ["alpha", "zeta", "a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn resorting_is_idempotent() {
        for column in SortColumn::ALL {
            let mut once = sample();
            sort_entries(&mut once, column, true);
            let mut twice = once.clone();
            sort_entries(&mut twice, column, true);
            assert_eq!(once, twice);
        }
    }

    fn populated_dir(tag: &str) -> PathBuf {
        let dir = scratch_dir(tag);
        fs::create_dir(dir.join("sub")).unwrap();
        fs::write(dir.join("small.txt"), b"hi").unwrap();
        fs::write(dir.join("big.bin"), vec![0u8; 4096]).unwrap();
        fs::write(dir.join("sub").join("inner.txt"), b"x").unwrap();
        dir
    }

    #[test]
    fn open_lists_and_sorts_by_name() {
        let dir = populated_dir("list");
        let model = DirectoryModel::open(&dir).unwrap();
        assert_eq!(model.current_path(), dir.as_path());
        assert_eq!(names(model.entries()), ["sub", "big.bin", "small.txt"]);
        let big = &model.entries()[1];
        assert_eq!(big.size, 4096);
        assert_eq!(big.info_label(), "4 KB");
        assert_eq!(model.entries()[0].info_label(), "Folder");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn listing_failures() {
        let dir = scratch_dir("fail");
        let missing = dir.join("missing");
        assert!(matches!(list(&missing), Err(AppError::Io { .. })));

        let file = dir.join("file.txt");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(list(&file), Err(AppError::NotADirectory { .. })));
        assert!(DirectoryModel::open(&file).is_err());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn toggle_sort_flips_active_column_only() {
        let dir = populated_dir("toggle");
        let mut model = DirectoryModel::open(&dir).unwrap();
        model.toggle_sort(SortColumn::Name);
        assert!(!model.ascending());
        assert_eq!(names(model.entries()), ["sub", "small.txt", "big.bin"]);

        model.toggle_sort(SortColumn::Size);
        assert_eq!(model.sort_column(), SortColumn::Size);
        assert!(model.ascending());
        assert_eq!(names(model.entries()), ["sub", "small.txt", "big.bin"]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn navigate_into_directory_then_up() {
        let dir = populated_dir("nav");
        let mut shell = RecordingShell::default();
        let mut model = DirectoryModel::open(&dir).unwrap();
        model.toggle_sort(SortColumn::Modified);

        let sub = model.entries()[0].clone();
        assert_eq!(model.navigate_into(&sub, &mut shell).unwrap(), Navigation::Entered);
        assert_eq!(model.current_path(), dir.join("sub").as_path());
        assert_eq!(names(model.entries()), ["inner.txt"]);
        assert_eq!(model.sort_column(), SortColumn::Name);
        assert!(model.ascending());
        assert!(shell.opened.is_empty());

        assert!(model.navigate_up().unwrap());
        assert_eq!(model.current_path(), dir.as_path());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn navigate_into_file_opens_it_without_changing_the_model() {
        let dir = populated_dir("open");
        let mut shell = RecordingShell::default();
        let mut model = DirectoryModel::open(&dir).unwrap();
        let before = model.entries().to_vec();

        let file = model.entries()[2].clone();
        assert_eq!(model.navigate_into(&file, &mut shell).unwrap(), Navigation::Opened);
        assert_eq!(shell.opened, vec![dir.join("small.txt")]);
        assert_eq!(model.current_path(), dir.as_path());
        assert_eq!(model.entries(), before.as_slice());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn failed_navigation_keeps_previous_listing() {
        let dir = populated_dir("gone");
        let mut shell = RecordingShell::default();
        let mut model = DirectoryModel::open(&dir).unwrap();
        let sub = model.entries()[0].clone();
        fs::remove_dir_all(dir.join("sub")).unwrap();

        assert!(model.navigate_into(&sub, &mut shell).is_err());
        assert_eq!(model.current_path(), dir.as_path());
        assert_eq!(model.entries().len(), 3);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn navigate_up_at_root_is_a_no_op() {
        let root = if cfg!(windows) { PathBuf::from("C:\\") } else { PathBuf::from("/") };
        let mut model = DirectoryModel::open(&root).unwrap();
        assert!(!model.navigate_up().unwrap());
        assert_eq!(model.current_path(), root.as_path());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_links_are_skipped_and_live_links_followed() {
        use std::os::unix::fs::symlink;

        let dir = scratch_dir("links");
        fs::create_dir(dir.join("real")).unwrap();
        fs::write(dir.join("note.txt"), b"x").unwrap();
        symlink(dir.join("missing"), dir.join("broken")).unwrap();
        symlink(dir.join("real"), dir.join("alias")).unwrap();

        let mut names: Vec<_> = list(&dir)
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.is_dir))
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                ("alias".to_string(), true),
                ("note.txt".to_string(), false),
                ("real".to_string(), true),
            ]
        );
        fs::remove_dir_all(dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_reports_permission() {
        use std::os::unix::fs::PermissionsExt;

        let dir = scratch_dir("locked");
        let locked = dir.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through the mode bits.
        let readable = fs::read_dir(&locked).is_ok();
        let result = list(&locked);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !readable {
            assert!(matches!(result, Err(AppError::Permission { path }) if path == locked));
        }
        fs::remove_dir_all(dir).unwrap();
    }
}
