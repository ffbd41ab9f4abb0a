use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("invalid save folder: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("no {0} selected")]
    NoSelection(&'static str),
    #[error("backup name cannot be empty")]
    EmptyName,
    #[error("invalid backup name: {0:?}")]
    InvalidName(String),
    #[error("account folder not found under {}", .0.display())]
    AccountFolderNotFound(PathBuf),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("could not determine a default save location (no home directory)")]
    NoDefaultLocation,
    #[error("failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SaveError>;

impl SaveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SaveError::Io {
            path: path.into(),
            source,
        }
    }
}

// Attach the offending path to a bare io::Error
pub(crate) trait IoContext<T> {
    fn at(self, path: &std::path::Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| SaveError::io(path, e))
    }
}
