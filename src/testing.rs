//! Test-only helpers shared across module test suites.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::Result;
use crate::platform::shell::Shell;

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir(tag: &str) -> PathBuf {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!("drawers-{tag}-{}-{n}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Shell double that records every open request and answers folder pickers
/// from a queue.
#[derive(Default)]
pub struct RecordingShell {
    pub opened: Vec<PathBuf>,
    pub folders: Vec<PathBuf>,
}

impl Shell for RecordingShell {
    fn open_with_default_handler(&mut self, path: &Path) -> Result<()> {
        self.opened.push(path.to_path_buf());
        Ok(())
    }

    fn browse_for_folder(&mut self) -> Option<PathBuf> {
        self.folders.pop()
    }
}
