//! Listing live saves and backups, and the expedition-tag filter.
//!
//! Every call re-reads the directory; nothing is cached.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};

use crate::config::{BackupMode, EXPEDITION_MARKER, STORE_DIR_NAME, SaveConfig};
use crate::error::{Result, SaveError};

/// Sentinel shown first in the tag list; selecting it disables filtering.
pub const ALL_EXPEDITIONS: &str = "All Expeditions";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExpeditionFilter {
    #[default]
    All,
    Tag(String),
}

impl ExpeditionFilter {
    /// `"All"`, `"All Expeditions"` and blank input all mean no filter.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        let all = t.is_empty()
            || t.eq_ignore_ascii_case("all")
            || t.eq_ignore_ascii_case(ALL_EXPEDITIONS);
        if all {
            ExpeditionFilter::All
        } else {
            ExpeditionFilter::Tag(t.to_string())
        }
    }

    fn needle(&self, ext: &str, backup: bool) -> Option<String> {
        match self {
            ExpeditionFilter::All => None,
            ExpeditionFilter::Tag(t) => {
                let lead = if backup { "_" } else { "" };
                Some(format!("{lead}{EXPEDITION_MARKER}{t}.{ext}").to_ascii_lowercase())
            }
        }
    }

    fn keeps(needle: Option<&str>, name: &str) -> bool {
        needle.is_none_or(|n| name.to_ascii_lowercase().contains(n))
    }
}

fn live_file_pattern(ext: &str) -> Regex {
    build(&format!(r"^{}.*\.{}$", EXPEDITION_MARKER, regex::escape(ext)))
}

fn backup_file_pattern(ext: &str) -> Regex {
    build(&format!(r"^.+_{}.*\.{}$", EXPEDITION_MARKER, regex::escape(ext)))
}

fn tag_pattern(ext: &str) -> Regex {
    build(&format!(r"^{}(\d+)\.{}$", EXPEDITION_MARKER, regex::escape(ext)))
}

fn build(pat: &str) -> Regex {
    RegexBuilder::new(pat)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| unreachable!("escaped pattern failed to compile: {e}"))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Files,
    Dirs,
}

// Sorted names of direct children of `dir` of the given kind.
fn child_names(dir: &Path, kind: Kind) -> io::Result<Vec<String>> {
    let mut out = Vec::new();
    for e in fs::read_dir(dir)? {
        let e = match e {
            Ok(e) => e,
            Err(err) => {
                log::debug!("skipping unreadable entry in {}: {}", dir.display(), err);
                continue;
            }
        };
        let ft = match e.file_type() {
            Ok(ft) => ft,
            Err(err) => {
                log::debug!("skipping {}: {}", e.path().display(), err);
                continue;
            }
        };
        // Follow symlinks the way a file manager would
        let (is_dir, is_file) = if ft.is_symlink() {
            let p = e.path();
            (p.is_dir(), p.is_file())
        } else {
            (ft.is_dir(), ft.is_file())
        };
        let wanted = match kind {
            Kind::Dirs => is_dir,
            Kind::Files => is_file,
        };
        if !wanted {
            continue;
        }
        match e.file_name().to_str() {
            Some(n) => out.push(n.to_string()),
            None => log::debug!("skipping non UTF-8 name: {}", e.path().display()),
        }
    }
    out.sort();
    Ok(out)
}

/// Account folders carry the configured prefix. The backup store and hidden
/// folders (restore staging) never count, whatever the prefix.
pub fn is_account_dir_name(cfg: &SaveConfig, name: &str) -> bool {
    name.starts_with(&cfg.account_prefix) && name != STORE_DIR_NAME && !name.starts_with('.')
}

fn require_root(cfg: &SaveConfig) -> Result<()> {
    if cfg.root_exists() {
        Ok(())
    } else {
        Err(SaveError::InvalidPath(cfg.save_root.clone()))
    }
}

/// Live entries: account folders in directory mode, `EXPEDITION_*.<ext>`
/// files in files mode.
pub fn list_live(cfg: &SaveConfig, filter: &ExpeditionFilter) -> Result<Vec<String>> {
    require_root(cfg)?;
    let root = &cfg.save_root;
    let names = match cfg.mode {
        BackupMode::Directory => child_names(root, Kind::Dirs)
            .map_err(|e| SaveError::io(root, e))?
            .into_iter()
            .filter(|n| is_account_dir_name(cfg, n))
            .collect::<Vec<_>>(),
        BackupMode::Files => {
            let re = live_file_pattern(&cfg.extension);
            child_names(root, Kind::Files)
                .map_err(|e| SaveError::io(root, e))?
                .into_iter()
                .filter(|n| re.is_match(n))
                .collect()
        }
    };
    let needle = filter.needle(&cfg.extension, false);
    Ok(names
        .into_iter()
        .filter(|n| ExpeditionFilter::keeps(needle.as_deref(), n))
        .collect())
}

/// Backup entries in the store. A missing store is an empty list.
pub fn list_backups(cfg: &SaveConfig, filter: &ExpeditionFilter) -> Result<Vec<String>> {
    let store = cfg.store_dir();
    let names = match child_names(&store, kind_for(cfg.mode)) {
        Ok(v) => v,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("{} folder not found: {}", STORE_DIR_NAME, store.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(SaveError::io(&store, e)),
    };
    let names: Vec<String> = match cfg.mode {
        BackupMode::Directory => names,
        BackupMode::Files => {
            let re = backup_file_pattern(&cfg.extension);
            names.into_iter().filter(|n| re.is_match(n)).collect()
        }
    };
    let needle = filter.needle(&cfg.extension, true);
    Ok(names
        .into_iter()
        .filter(|n| ExpeditionFilter::keeps(needle.as_deref(), n))
        .collect())
}

fn kind_for(mode: BackupMode) -> Kind {
    match mode {
        BackupMode::Directory => Kind::Dirs,
        BackupMode::Files => Kind::Files,
    }
}

/// Distinct expedition tags found in live file names, ascending, with the
/// "All Expeditions" sentinel first.
pub fn list_expedition_tags(cfg: &SaveConfig) -> Result<Vec<String>> {
    require_root(cfg)?;
    let re = tag_pattern(&cfg.extension);
    let files = child_names(&cfg.save_root, Kind::Files)
        .map_err(|e| SaveError::io(&cfg.save_root, e))?;
    let mut tags: Vec<String> = files
        .iter()
        .filter_map(|n| re.captures(n).map(|c| c[1].to_string()))
        .collect();
    // Numeric order, so 2 sorts before 10; "007" and "7" are distinct tags
    tags.sort_by(|a, b| {
        let (na, nb) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
        na.len().cmp(&nb.len()).then_with(|| na.cmp(nb)).then_with(|| a.cmp(b))
    });
    tags.dedup();
    let mut out = Vec::with_capacity(tags.len() + 1);
    out.push(ALL_EXPEDITIONS.to_string());
    out.extend(tags);
    Ok(out)
}

/// First subdirectory of the save root whose name starts with the account
/// prefix.
pub fn find_account_folder(cfg: &SaveConfig) -> Result<Option<PathBuf>> {
    require_root(cfg)?;
    let dirs = child_names(&cfg.save_root, Kind::Dirs)
        .map_err(|e| SaveError::io(&cfg.save_root, e))?;
    Ok(dirs
        .into_iter()
        .find(|n| is_account_dir_name(cfg, n))
        .map(|n| cfg.save_root.join(n)))
}
