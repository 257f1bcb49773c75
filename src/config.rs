//! Configuration
//!
//! [`VersaConfig`] names the tracked file, where its backups live and how
//! duplicate content is detected. It can be read from a `versa.json` file;
//! every field is optional there.
//!
//! ```json
//! {
//!   "tracked_file": "notes.txt",
//!   "backup_dir": ".versions",
//!   "match_mode": "exact"
//! }
//! ```

use crate::backup::FileBackups;
use crate::error::{Result, VersaError};
use crate::types::MatchMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the optional configuration file
pub const CONFIG_FILE_NAME: &str = "versa.json";

/// Default tracked file name
pub const DEFAULT_TRACKED_FILE: &str = "file.txt";

/// Settings for one tracked file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersaConfig {
    /// File whose versions are recorded
    pub tracked_file: PathBuf,
    /// Where backups are written; the tracked file's directory when unset
    pub backup_dir: Option<PathBuf>,
    /// How duplicate content and identical lines are detected
    pub match_mode: MatchMode,
}

impl Default for VersaConfig {
    fn default() -> Self {
        Self {
            tracked_file: PathBuf::from(DEFAULT_TRACKED_FILE),
            backup_dir: None,
            match_mode: MatchMode::default(),
        }
    }
}

impl VersaConfig {
    /// Read a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: VersaConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Read `versa.json` from `dir` if present, defaults otherwise
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.tracked_file.file_name().is_none() {
            return Err(VersaError::invalid_config(format!(
                "tracked file {:?} has no file name",
                self.tracked_file
            )));
        }
        Ok(())
    }

    /// Backups for the configured tracked file
    pub fn backups(&self) -> FileBackups {
        match &self.backup_dir {
            Some(dir) => FileBackups::new(self.tracked_file.clone(), dir.clone()),
            None => FileBackups::beside(self.tracked_file.clone()),
        }
    }
}
