//! Shell integration: launching files with their default handler and the
//! native folder picker.

use std::path::{Path, PathBuf};

use rfd::FileDialog;

use crate::error::{AppError, Result};

pub trait Shell {
    fn open_with_default_handler(&mut self, path: &Path) -> Result<()>;

    /// Ask the user for a folder. `None` when the dialog is cancelled.
    fn browse_for_folder(&mut self) -> Option<PathBuf>;
}

/// The real desktop shell.
#[derive(Debug, Default)]
pub struct DesktopShell;

impl Shell for DesktopShell {
    fn open_with_default_handler(&mut self, path: &Path) -> Result<()> {
        open::that(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn browse_for_folder(&mut self) -> Option<PathBuf> {
        FileDialog::new()
            .set_title("Select drawer folder")
            .pick_folder()
    }
}
