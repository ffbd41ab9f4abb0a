//! Locating the live save folder.
//!
//! The chosen folder is persisted as the whole contents of a small text file
//! (`save_path.txt`). When that file is absent or blank the platform default
//! is used: `<local app data>/Sandfall/Saved/SaveGames`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};

use crate::error::{IoContext, Result, SaveError};

pub const CONFIG_FILE_NAME: &str = "save_path.txt";
/// Overrides the directory holding the config file (mostly for tests).
pub const CONFIG_DIR_ENV: &str = "SFM_CONFIG_DIR";

const DEFAULT_SUBPATH: [&str; 3] = ["Sandfall", "Saved", "SaveGames"];

#[derive(Debug, Clone)]
pub struct PathResolver {
    config_file: PathBuf,
    default_root: Option<PathBuf>,
}

impl PathResolver {
    pub fn new(config_file: impl Into<PathBuf>, default_root: Option<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
            default_root,
        }
    }

    /// Resolver using `SFM_CONFIG_DIR` or the OS config directory, and the
    /// platform default save root.
    pub fn from_env() -> Result<Self> {
        let config_dir = std::env::var_os(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                ProjectDirs::from("com", "sandfall-tools", "sfm")
                    .map(|d| d.config_dir().to_path_buf())
            })
            .ok_or(SaveError::NoDefaultLocation)?;
        Ok(Self::new(config_dir.join(CONFIG_FILE_NAME), default_save_root()))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Persisted path if one is recorded, otherwise the default.
    pub fn resolve(&self) -> Result<PathBuf> {
        if let Some(p) = self.persisted()? {
            log::debug!("save root from {}: {}", self.config_file.display(), p.display());
            return Ok(p);
        }
        let p = self.default_root.clone().ok_or(SaveError::NoDefaultLocation)?;
        log::debug!("save root defaulted to {}", p.display());
        Ok(p)
    }

    /// Trimmed contents of the config file; `None` when missing or blank.
    pub fn persisted(&self) -> Result<Option<PathBuf>> {
        match fs::read_to_string(&self.config_file) {
            Ok(s) => {
                let t = s.trim();
                Ok((!t.is_empty()).then(|| PathBuf::from(t)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SaveError::io(&self.config_file, e)),
        }
    }

    /// Validate and persist a new save root, stored as an absolute path.
    /// Nothing is written on failure.
    pub fn set_path(&self, new_path: &Path) -> Result<PathBuf> {
        if !new_path.is_dir() {
            return Err(SaveError::InvalidPath(new_path.to_path_buf()));
        }
        let abs = std::path::absolute(new_path).at(new_path)?;
        if let Some(parent) = self.config_file.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        let text = abs.to_string_lossy();
        fs::write(&self.config_file, text.as_bytes()).at(&self.config_file)?;
        log::info!("save root set to {}", abs.display());
        Ok(abs)
    }
}

pub fn default_save_root() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    let mut p = base.data_local_dir().to_path_buf();
    for part in DEFAULT_SUBPATH {
        p.push(part);
    }
    Some(p)
}
