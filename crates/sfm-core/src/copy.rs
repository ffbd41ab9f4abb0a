use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{IoContext, Result, SaveError};

/// Copy the contents of `src` into `dst`, creating `dst` and any missing
/// parents. Existing files are overwritten; files only present in `dst` are
/// left alone. Stops at the first failure without rolling back.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<u64> {
    if !src.is_dir() {
        return Err(SaveError::io(
            src,
            io::Error::new(io::ErrorKind::NotFound, "source is not a directory"),
        ));
    }
    fs::create_dir_all(dst).at(dst)?;
    let mut copied = 0u64;
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            SaveError::io(path, e.into())
        })?;
        let path = entry.path();
        let rel = match path.strip_prefix(src) {
            Ok(r) if !r.as_os_str().is_empty() => r,
            _ => continue,
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).at(&target)?;
        } else {
            copy_file(path, &target)?;
            copied += 1;
        }
    }
    log::debug!("copied {} file(s) {} -> {}", copied, src.display(), dst.display());
    Ok(copied)
}

/// Copy a single file, replacing `dst` if it exists.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    let bytes = fs::copy(src, dst).map_err(|e| {
        // Blame whichever side is actually missing
        if e.kind() == io::ErrorKind::NotFound && src.exists() {
            SaveError::io(dst, e)
        } else {
            SaveError::io(src, e)
        }
    })?;
    log::debug!("{} -> {}", src.display(), dst.display());
    Ok(bytes)
}
