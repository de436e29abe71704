//! Timestamped backups of reference files before they are rewritten.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Backup file name stamp, e.g. `20251103_093000`.
const BACKUP_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Path of the backup of `path` taken at `at`: `<path>.backup_<stamp>`.
pub fn backup_path(path: &Path, at: DateTime<Local>) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".backup_{}", at.format(BACKUP_STAMP_FORMAT)));
    PathBuf::from(name)
}

/// Copy `path` next to itself under a timestamped name.
///
/// Returns `Ok(None)` when there is nothing to back up.
pub fn create_backup(path: &Path) -> std::io::Result<Option<PathBuf>> {
    create_backup_at(path, Local::now())
}

pub fn create_backup_at(path: &Path, at: DateTime<Local>) -> std::io::Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let target = backup_path(path, at);
    std::fs::copy(path, &target)?;
    tracing::info!(backup = %target.display(), "Created backup");
    Ok(Some(target))
}
