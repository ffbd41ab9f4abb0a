use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{BackupMode, SaveConfig};
use crate::copy::{copy_file, copy_tree};
use crate::error::{IoContext, Result, SaveError};
use crate::naming::{
    backup_file_name, check_entry_name, clean_prefix, remove_prefix, suggest_backup_name,
};
use crate::prompt::Prompter;
use crate::saves::{self, ExpeditionFilter};

/// Result of an operation that asks the user something first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }
}

/// Both lists plus the tag choices, as shown after a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub live: Vec<String>,
    pub backups: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SaveManager {
    cfg: SaveConfig,
}

fn selection<'a>(selected: Option<&'a str>, what: &'static str) -> Result<&'a str> {
    match selected.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(SaveError::NoSelection(what)),
    }
}

fn remove_any(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

// Missing is as good as removed
fn remove_if_present(path: &Path) -> Result<()> {
    match remove_any(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(SaveError::io(path, e)),
        _ => Ok(()),
    }
}

impl SaveManager {
    pub fn new(cfg: SaveConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &SaveConfig {
        &self.cfg
    }

    /// The save root, provided it currently exists.
    pub fn existing_root(&self) -> Result<&Path> {
        if self.cfg.root_exists() {
            Ok(&self.cfg.save_root)
        } else {
            Err(SaveError::InvalidPath(self.cfg.save_root.clone()))
        }
    }

    pub fn account_folder(&self) -> Result<Option<PathBuf>> {
        saves::find_account_folder(&self.cfg)
    }

    pub fn refresh(&self, filter: &ExpeditionFilter) -> Result<Snapshot> {
        self.existing_root()?;
        Ok(Snapshot {
            live: saves::list_live(&self.cfg, filter)?,
            backups: saves::list_backups(&self.cfg, filter)?,
            tags: saves::list_expedition_tags(&self.cfg)?,
        })
    }

    /// Create the backup store if needed. Safe to call repeatedly.
    pub fn ensure_store(&self) -> Result<PathBuf> {
        let store = self.cfg.store_dir();
        fs::create_dir_all(&store).at(&store)?;
        Ok(store)
    }

    /// Back up a live entry under a name asked from the user.
    ///
    /// Directory mode copies the selected account folder (or the first one
    /// found when nothing is selected) to `CustomSaveFiles/<name>`. Files
    /// mode copies the selected save file to `CustomSaveFiles/<prefix>_<file>`.
    /// An existing backup of the same name is replaced.
    pub fn save_backup(
        &self,
        selected: Option<&str>,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome<String>> {
        let root = self.existing_root()?;
        match self.cfg.mode {
            BackupMode::Directory => {
                let source = match selected.map(str::trim).filter(|s| !s.is_empty()) {
                    Some(name) => {
                        check_entry_name(name)?;
                        let p = root.join(name);
                        if !saves::is_account_dir_name(&self.cfg, name) || !p.is_dir() {
                            return Err(SaveError::NotFound(name.to_string()));
                        }
                        p
                    }
                    None => self
                        .account_folder()?
                        .ok_or_else(|| SaveError::AccountFolderNotFound(root.to_path_buf()))?,
                };
                let entry = source.file_name().and_then(|s| s.to_str()).map(str::to_string);
                let Some(raw) =
                    prompter.prompt_text("Backup name", &suggest_backup_name(entry.as_deref()))
                else {
                    return Ok(Outcome::Cancelled);
                };
                let name = raw.trim();
                if name.is_empty() {
                    return Err(SaveError::EmptyName);
                }
                check_entry_name(name)?;

                let target = self.ensure_store()?.join(name);
                remove_if_present(&target)?;
                copy_tree(&source, &target)?;
                log::info!("backed up {} as '{}'", source.display(), name);
                Ok(Outcome::Completed(name.to_string()))
            }
            BackupMode::Files => {
                let file = selection(selected, "save file")?;
                check_entry_name(file)?;
                let source = root.join(file);
                if !source.is_file() {
                    return Err(SaveError::NotFound(file.to_string()));
                }
                let Some(raw) = prompter.prompt_text("Backup prefix", &suggest_backup_name(None))
                else {
                    return Ok(Outcome::Cancelled);
                };
                let prefix = clean_prefix(&raw);
                if prefix.is_empty() {
                    return Err(SaveError::EmptyName);
                }
                let name = backup_file_name(&prefix, file);
                check_entry_name(&name)?;
                // The marker must not appear in the prefix or restore picks the wrong file
                if remove_prefix(&name) != file {
                    return Err(SaveError::InvalidName(name));
                }

                let target = self.ensure_store()?.join(&name);
                copy_file(&source, &target)?;
                log::info!("backed up {} as '{}'", file, name);
                Ok(Outcome::Completed(name))
            }
        }
    }

    /// Restore a backup over the live data after an explicit confirmation.
    /// Returns the live path that was overwritten.
    pub fn load_backup(
        &self,
        selected: Option<&str>,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome<PathBuf>> {
        let name = selection(selected, "backup")?;
        check_entry_name(name)?;
        let root = self.existing_root()?;
        let source = self.cfg.store_dir().join(name);
        match self.cfg.mode {
            BackupMode::Directory => {
                if !source.is_dir() {
                    return Err(SaveError::NotFound(name.to_string()));
                }
                let live = self
                    .account_folder()?
                    .ok_or_else(|| SaveError::AccountFolderNotFound(root.to_path_buf()))?;
                let msg = "This will replace your current save folder. Do you want to continue?";
                if !prompter.confirm(msg) {
                    return Ok(Outcome::Cancelled);
                }
                replace_dir(&source, &live)?;
                log::info!("restored '{}' into {}", name, live.display());
                Ok(Outcome::Completed(live))
            }
            BackupMode::Files => {
                if !source.is_file() {
                    return Err(SaveError::NotFound(name.to_string()));
                }
                let live_name = remove_prefix(name);
                check_entry_name(&live_name)?;
                let live = root.join(&live_name);
                let msg = format!(
                    "This will overwrite {live_name} with '{name}'. Do you want to continue?"
                );
                if !prompter.confirm(&msg) {
                    return Ok(Outcome::Cancelled);
                }
                copy_file(&source, &live)?;
                log::info!("restored '{}' as {}", name, live_name);
                Ok(Outcome::Completed(live))
            }
        }
    }

    /// Delete a backup entry (directory or file) after confirmation.
    pub fn delete_backup(
        &self,
        selected: Option<&str>,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome<()>> {
        let name = selection(selected, "backup")?;
        check_entry_name(name)?;
        if !prompter.confirm(&format!("Delete '{name}'?")) {
            return Ok(Outcome::Cancelled);
        }
        let path = self.cfg.store_dir().join(name);
        match remove_any(&path) {
            Ok(()) => {
                log::info!("deleted backup '{}'", name);
                Ok(Outcome::Completed(()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(SaveError::NotFound(name.to_string()))
            }
            Err(e) => Err(SaveError::io(path, e)),
        }
    }
}

// Copy into a staging folder first so a failed copy leaves `live` intact.
fn replace_dir(source: &Path, live: &Path) -> Result<()> {
    let parent = live.parent().unwrap_or(Path::new("."));
    let live_name = live
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = parent.join(format!(".{live_name}.restore"));
    remove_if_present(&staging)?;
    if let Err(e) = copy_tree(source, &staging) {
        let _ = fs::remove_dir_all(&staging);
        return Err(e);
    }
    if let Err(e) = remove_if_present(live) {
        let _ = fs::remove_dir_all(&staging);
        return Err(e);
    }
    fs::rename(&staging, live).at(live)
}
