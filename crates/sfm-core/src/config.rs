use std::fmt;
use std::path::PathBuf;

/// Name of the backup store directory created under the save root.
pub const STORE_DIR_NAME: &str = "CustomSaveFiles";
/// Account folders are recognised by this leading id prefix.
pub const DEFAULT_ACCOUNT_PREFIX: &str = "765";
pub const DEFAULT_EXTENSION: &str = "sav";
/// Marker token that every live save file name starts with in files mode.
pub const EXPEDITION_MARKER: &str = "EXPEDITION_";

/// How backups are taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackupMode {
    /// Each backup is a full copy of one account folder.
    #[default]
    Directory,
    /// Each backup is a single `<prefix>_<original>` file.
    Files,
}

impl fmt::Display for BackupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupMode::Directory => f.write_str("directory"),
            BackupMode::Files => f.write_str("files"),
        }
    }
}

/// Everything an operation needs to know about where saves live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveConfig {
    pub save_root: PathBuf,
    pub mode: BackupMode,
    pub extension: String,
    pub account_prefix: String,
}

impl SaveConfig {
    pub fn new(save_root: impl Into<PathBuf>, mode: BackupMode) -> Self {
        Self {
            save_root: save_root.into(),
            mode,
            extension: DEFAULT_EXTENSION.to_string(),
            account_prefix: DEFAULT_ACCOUNT_PREFIX.to_string(),
        }
    }

    pub fn with_extension(mut self, ext: &str) -> Self {
        self.extension = ext.trim_start_matches('.').to_string();
        self
    }

    pub fn with_account_prefix(mut self, prefix: &str) -> Self {
        self.account_prefix = prefix.to_string();
        self
    }

    pub fn store_dir(&self) -> PathBuf {
        self.save_root.join(STORE_DIR_NAME)
    }

    pub fn root_exists(&self) -> bool {
        self.save_root.is_dir()
    }
}
