use std::path::{Component, Path};

use crate::config::EXPEDITION_MARKER;
use crate::error::{Result, SaveError};

/// Trim whitespace and trailing underscores from a user-supplied prefix.
pub fn clean_prefix(raw: &str) -> String {
    raw.trim().trim_end_matches('_').trim_end().to_string()
}

/// Recover the live file name from a `<prefix>_<original>` backup name.
///
/// Everything before the first (case-insensitive) `EXPEDITION_` is dropped.
/// Without the marker, only the text up to and including the first `_` is
/// dropped, unless that `_` is the first character.
pub fn remove_prefix(name: &str) -> String {
    // ASCII lowering keeps byte offsets intact
    let lower = name.to_ascii_lowercase();
    let marker = EXPEDITION_MARKER.to_ascii_lowercase();
    if let Some(i) = lower.find(&marker) {
        return name[i..].to_string();
    }
    match name.find('_') {
        Some(i) if i > 0 => name[i + 1..].to_string(),
        _ => name.to_string(),
    }
}

pub fn backup_file_name(prefix: &str, original: &str) -> String {
    format!("{prefix}_{original}")
}

/// Default text offered in the backup-name prompt.
pub fn suggest_backup_name(entry: Option<&str>) -> String {
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    match entry {
        Some(e) if !e.is_empty() => format!("{e}_{ts}"),
        _ => ts.to_string(),
    }
}

/// Reject names that would escape the directory they are joined onto.
pub(crate) fn check_entry_name(name: &str) -> Result<()> {
    let mut comps = Path::new(name).components();
    match (comps.next(), comps.next()) {
        (Some(Component::Normal(c)), None) if c == name => Ok(()),
        _ => Err(SaveError::InvalidName(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_names_must_be_single_components() {
        assert!(check_entry_name("slot-a").is_ok());
        assert!(check_entry_name("abc_EXPEDITION_1.sav").is_ok());
        assert!(check_entry_name("").is_err());
        assert!(check_entry_name("..").is_err());
        assert!(check_entry_name("a/b").is_err());
        assert!(check_entry_name("/abs").is_err());
    }

    #[test]
    fn suggestion_carries_entry_name() {
        let s = suggest_backup_name(Some("76561198000000000"));
        assert!(s.starts_with("76561198000000000_"));
        assert!(!suggest_backup_name(None).contains('_'));
    }
}
