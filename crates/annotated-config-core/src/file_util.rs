//! Filesystem helpers for configuration files.

use std::fs;
use std::io;
use std::path::Path;

/// Make sure `dir` exists, creating it and its parents if needed.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)
}

/// Make sure `file` exists, creating its parent directories and an empty
/// file if needed. Returns `true` when the file was created by this call.
pub fn ensure_file(file: &Path) -> io::Result<bool> {
    if file.exists() {
        return Ok(false);
    }
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(file)?;
    Ok(true)
}
