//! sfm-core: locate, list, back up and restore game save folders
//!
//! This crate keeps the whole filesystem side of the save manager:
//! - Path resolution with a one-line persisted config file
//! - Recursive copy with overwrite semantics
//! - Listing of live saves and backups, with the expedition-tag filter
//! - Save / load / delete orchestration gated by an injected `Prompter`
//!
pub mod config;
pub mod copy;
pub mod error;
pub mod manager;
pub mod naming;
pub mod paths;
pub mod prompt;
pub mod saves;

pub use config::{BackupMode, STORE_DIR_NAME, SaveConfig};
pub use copy::{copy_file, copy_tree};
pub use error::{Result, SaveError};
pub use manager::{Outcome, SaveManager, Snapshot};
pub use naming::{clean_prefix, remove_prefix, suggest_backup_name};
pub use paths::PathResolver;
pub use prompt::{Prompter, ScriptedPrompter};
pub use saves::{
    ALL_EXPEDITIONS, ExpeditionFilter, find_account_folder, list_backups, list_expedition_tags,
    list_live,
};
