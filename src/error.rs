//! Application-level error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("settings serialisation error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("permission denied listing {}", path.display())]
    Permission { path: PathBuf },

    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },
}

impl AppError {
    /// Wrap an I/O failure on `path`, promoting permission failures to
    /// [`AppError::Permission`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            AppError::Permission { path }
        } else {
            AppError::Io { path, source }
        }
    }
}

/// Convenience alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;
