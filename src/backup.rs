//! Backup persistence for versions
//!
//! The service does not touch the file system itself. It hands every new
//! version to a [`BackupSink`] and asks the sink to drop the backup of every
//! removed version. Two sinks ship with the crate:
//!
//! - [`NoopBackups`]: keeps nothing, for purely in-memory use
//! - [`FileBackups`]: one file per version next to the tracked file
//!
//! ## Backup layout
//!
//! For a tracked file `notes.txt`, version 3 is stored as `notes_3.txt`. The
//! stem is everything before the first `.` of the file name and the extension
//! everything from it, so `archive.tar.gz` becomes `archive_3.tar.gz`.
//!
//! ```text
//! backup_dir/
//!   notes_1.txt
//!   notes_2.txt
//!   notes_5.txt
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use versa::backup::FileBackups;
//! use std::path::PathBuf;
//!
//! let backups = FileBackups::new(PathBuf::from("notes.txt"), PathBuf::from("."));
//! assert_eq!(backups.backup_name(3), "notes_3.txt");
//! assert_eq!(backups.parse_backup_name("notes_12.txt"), Some(12));
//! assert_eq!(backups.parse_backup_name("notes.txt"), None);
//! ```

use crate::error::{Result, VersaError};
use crate::utils::{atomic_write, read_text};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Capability to persist and drop per-version backups
pub trait BackupSink {
    /// Persist the content of a new version
    fn write_backup(&self, version: u64, content: &str) -> Result<()>;

    /// Drop the backup of a removed version
    fn delete_backup(&self, version: u64) -> Result<()>;
}

/// Sink that keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBackups;

impl BackupSink for NoopBackups {
    fn write_backup(&self, _version: u64, _content: &str) -> Result<()> {
        Ok(())
    }

    fn delete_backup(&self, _version: u64) -> Result<()> {
        Ok(())
    }
}

/// One backup file per version in a directory
#[derive(Debug, Clone)]
pub struct FileBackups {
    tracked: PathBuf,
    backup_dir: PathBuf,
    stem: String,
    extension: String,
}

impl FileBackups {
    /// Create backups for `tracked` stored under `backup_dir`
    pub fn new(tracked: PathBuf, backup_dir: PathBuf) -> Self {
        let file_name = tracked
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (stem, extension) = match file_name.find('.') {
            Some(idx) => (file_name[..idx].to_string(), file_name[idx..].to_string()),
            None => (file_name, String::new()),
        };

        Self {
            tracked,
            backup_dir,
            stem,
            extension,
        }
    }

    /// Create backups stored next to the tracked file
    pub fn beside(tracked: PathBuf) -> Self {
        let backup_dir = match tracked.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::new(tracked, backup_dir)
    }

    /// Path of the tracked file
    pub fn tracked(&self) -> &Path {
        &self.tracked
    }

    /// Directory holding the backups
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// File name of the backup for `version`
    pub fn backup_name(&self, version: u64) -> String {
        format!("{}_{}{}", self.stem, version, self.extension)
    }

    /// Full path of the backup for `version`
    pub fn backup_path(&self, version: u64) -> PathBuf {
        self.backup_dir.join(self.backup_name(version))
    }

    /// Version number encoded in a backup file name, if it is one of ours
    pub fn parse_backup_name(&self, file_name: &str) -> Option<u64> {
        let digits = file_name
            .strip_prefix(self.stem.as_str())?
            .strip_prefix('_')?
            .strip_suffix(self.extension.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().filter(|version| *version > 0)
    }

    /// Read the current content of the tracked file
    pub fn read_tracked(&self) -> Result<String> {
        read_text(&self.tracked)
    }

    /// Replace the content of the tracked file
    pub fn write_tracked(&self, content: &str) -> Result<()> {
        atomic_write(&self.tracked, content.as_bytes()).map_err(|e| {
            VersaError::persistence(format!("cannot write {}: {}", self.tracked.display(), e))
        })
    }

    /// Collect `(version, content)` pairs from backup files
    ///
    /// Pairs come back in directory order. Unreadable or empty backups are
    /// skipped with a warning. A missing backup directory means no history.
    pub fn scan_history(&self) -> Result<Vec<(u64, String)>> {
        if !self.backup_dir.exists() {
            debug!("Backup directory {:?} does not exist", self.backup_dir);
            return Ok(Vec::new());
        }

        let mut history = Vec::new();
        for entry in WalkDir::new(&self.backup_dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {:?}: {}", self.backup_dir, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let Some(version) = self.parse_backup_name(&file_name) else {
                continue;
            };

            match read_text(entry.path()) {
                Ok(content) if content.is_empty() => {
                    warn!("Skipping empty backup {:?}", entry.path());
                }
                Ok(content) => history.push((version, content)),
                Err(e) => warn!("Skipping backup {:?}: {}", entry.path(), e),
            }
        }

        info!("Found {} backups in {:?}", history.len(), self.backup_dir);
        Ok(history)
    }
}

impl BackupSink for FileBackups {
    fn write_backup(&self, version: u64, content: &str) -> Result<()> {
        fs::create_dir_all(&self.backup_dir)?;
        let path = self.backup_path(version);
        atomic_write(&path, content.as_bytes()).map_err(|e| {
            VersaError::persistence(format!(
                "failed to save version {}'s content in {}: {}",
                version,
                path.display(),
                e
            ))
        })?;
        debug!("Wrote backup {:?}", path);
        Ok(())
    }

    fn delete_backup(&self, version: u64) -> Result<()> {
        let path = self.backup_path(version);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted backup {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Backup {:?} was already gone", path);
                Ok(())
            }
            Err(e) => Err(VersaError::persistence(format!(
                "failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
