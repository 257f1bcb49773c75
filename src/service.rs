//! Versioning operations
//!
//! [`VersioningService`] is the entry point for recording and inspecting the
//! history of one tracked file. It owns the [`VersionStore`], hands out version
//! numbers, rejects duplicate content and keeps a [`BackupSink`] in step with
//! the store.
//!
//! ## Version numbers
//!
//! The service keeps a running counter separate from the store. A new version
//! gets `counter + 1`; removing a version never lowers the counter, so a
//! number is never handed out twice.
//!
//! ## Examples
//!
//! ```rust
//! use versa::{VersaError, VersioningService};
//!
//! let mut service = VersioningService::new();
//! assert_eq!(service.add("hello\nworld")?, 1);
//! assert!(matches!(service.add("hello\nworld"), Err(VersaError::DuplicateContent)));
//! assert_eq!(service.add("hello\nmars")?, 2);
//!
//! let diff = service.compare(1, 2)?;
//! assert_eq!(diff.divergent_count(), 1);
//!
//! service.remove(1)?;
//! assert!(service.load(1).is_err());
//! assert_eq!(service.add("hello\nvenus")?, 3);
//! # Ok::<(), VersaError>(())
//! ```

use crate::backup::{BackupSink, FileBackups, NoopBackups};
use crate::config::VersaConfig;
use crate::diff::{compare_lines, LineDiff};
use crate::error::{Result, VersaError};
use crate::snapshot::Snapshot;
use crate::store::{KeywordMatches, VersionStore};
use crate::types::{MatchMode, SearchHit};
use tracing::{debug, info, instrument, warn};

/// Operations layer over the version store of one tracked file
///
/// The backup sink is chosen at construction: [`NoopBackups`] gives a purely
/// in-memory history, [`FileBackups`] mirrors every version to disk.
///
/// Every operation either succeeds or leaves the store exactly as it was.
#[derive(Debug)]
pub struct VersioningService<S: BackupSink = NoopBackups> {
    store: VersionStore,
    /// Highest version number ever handed out or restored
    latest_version: u64,
    match_mode: MatchMode,
    backups: S,
}

impl VersioningService<NoopBackups> {
    /// Create an in-memory service with default settings
    pub fn new() -> Self {
        VersaBuilder::new().build()
    }
}

impl Default for VersioningService<NoopBackups> {
    fn default() -> Self {
        Self::new()
    }
}

impl VersioningService<FileBackups> {
    /// Open the history of a tracked file from its backups
    ///
    /// Scans the configured backup directory and bulk-loads every backup it
    /// finds. Used once at startup.
    ///
    /// # Errors
    ///
    /// - [`VersaError::InvalidConfiguration`] if the config is unusable
    /// - [`VersaError::WalkDir`] or [`VersaError::Io`] if the scan fails
    #[instrument(skip(config), fields(tracked = ?config.tracked_file))]
    pub fn open(config: &VersaConfig) -> Result<Self> {
        config.validate()?;
        let backups = config.backups();
        let history = backups.scan_history()?;

        let mut service = VersaBuilder::from_config(config).build_with_backups(backups);
        let restored = service.restore_history(history);
        info!(
            "Opened history with {} versions (latest {})",
            restored, service.latest_version
        );
        Ok(service)
    }
}

impl<S: BackupSink> VersioningService<S> {
    /// Record `content` as a new version
    ///
    /// Returns the assigned version number. The backup is written before the
    /// snapshot is stored, so a failing sink leaves no trace.
    ///
    /// # Errors
    ///
    /// - [`VersaError::DuplicateContent`] if an identical version exists;
    ///   no version number is consumed
    /// - [`VersaError::VersionSpaceExhausted`] if the counter is at `u64::MAX`
    /// - any error from the backup sink
    #[instrument(skip(self, content))]
    pub fn add(&mut self, content: impl Into<String>) -> Result<u64> {
        let content = content.into();
        if self.store.contains_content(&content, self.match_mode) {
            info!("No change detected, not creating a version");
            return Err(VersaError::DuplicateContent);
        }

        let version = self
            .latest_version
            .checked_add(1)
            .ok_or(VersaError::VersionSpaceExhausted {
                latest: self.latest_version,
            })?;
        self.backups.write_backup(version, &content)?;
        self.store.append(version, content)?;
        self.latest_version = version;

        info!("Added version {}", version);
        Ok(version)
    }

    /// Look up a version for loading into the tracked file
    ///
    /// # Errors
    ///
    /// Returns [`VersaError::VersionNotFound`] if the version is absent.
    #[instrument(skip(self))]
    pub fn load(&self, version: u64) -> Result<&Snapshot> {
        let located = self
            .store
            .find_by_version(version)
            .ok_or(VersaError::VersionNotFound(version))?;
        info!("Loaded version {}", version);
        Ok(located.snapshot)
    }

    /// Remove a version and its backup
    ///
    /// Returns the removed snapshot. The version counter is not lowered.
    ///
    /// # Errors
    ///
    /// - [`VersaError::VersionNotFound`] if the version is absent
    /// - any error from the backup sink; the version is then kept
    #[instrument(skip(self))]
    pub fn remove(&mut self, version: u64) -> Result<Snapshot> {
        let predecessor = self
            .store
            .find_by_version(version)
            .ok_or(VersaError::VersionNotFound(version))?
            .predecessor;

        self.backups.delete_backup(version)?;
        let removed = self.store.remove(predecessor).ok_or_else(|| {
            VersaError::internal(format!("version {} vanished during removal", version))
        })?;

        info!("Removed version {}", version);
        Ok(removed)
    }

    /// Compare two versions line by line
    ///
    /// # Errors
    ///
    /// Returns [`VersaError::PartialNotFound`] if either version is absent.
    #[instrument(skip(self))]
    pub fn compare(&self, first: u64, second: u64) -> Result<LineDiff> {
        let (left, right) = self
            .store
            .find_pair(first, second)
            .pair()
            .ok_or(VersaError::PartialNotFound { first, second })?;

        let diff = compare_lines(left.content(), right.content(), self.match_mode);
        debug!(
            "Compared {} lines, {} differ",
            diff.len(),
            diff.divergent_count()
        );
        Ok(diff)
    }

    /// Every version whose content contains `keyword`
    ///
    /// Case-sensitive substring match. No match is an empty result, not an
    /// error.
    #[instrument(skip(self))]
    pub fn search(&self, keyword: &str) -> Vec<SearchHit> {
        let hits: Vec<SearchHit> = self
            .search_iter(keyword)
            .map(|snapshot| SearchHit {
                version: snapshot.version(),
                content: snapshot.content().to_string(),
            })
            .collect();
        debug!("Keyword {:?} found in {} versions", keyword, hits.len());
        hits
    }

    /// Lazy form of [`search`](Self::search)
    pub fn search_iter<'a, 'k>(&'a self, keyword: &'k str) -> KeywordMatches<'a, 'k> {
        self.store.scan_keyword(keyword)
    }

    /// Whether any version contains `keyword`
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.store.has_keyword(keyword)
    }

    /// All versions in order
    pub fn list_all(&self) -> std::slice::Iter<'_, Snapshot> {
        self.store.iter()
    }

    /// Bulk-load `(version, content)` pairs reconstructed from backups
    ///
    /// Pairs may come in any order. They are sorted by version; when a number
    /// repeats, the first pair wins. Versions at or below the current tail are
    /// skipped. No dedup is done and nothing is written to the sink. The
    /// counter moves up to the highest restored version.
    ///
    /// Returns the number of versions restored.
    #[instrument(skip(self, pairs))]
    pub fn restore_history<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (u64, String)>,
    {
        let mut pairs: Vec<(u64, String)> = pairs.into_iter().collect();
        pairs.sort_by_key(|(version, _)| *version);

        let mut restored = 0;
        let mut previous = None;
        for (version, content) in pairs {
            if previous == Some(version) {
                warn!("Ignoring repeated backup for version {}", version);
                continue;
            }
            previous = Some(version);

            match self.store.append(version, content) {
                Ok(()) => {
                    self.latest_version = self.latest_version.max(version);
                    restored += 1;
                }
                Err(e) => warn!("Skipping version {}: {}", version, e),
            }
        }

        debug!("Restored {} versions", restored);
        restored
    }

    /// Number of stored versions
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no version is stored
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Highest version number handed out so far
    pub fn latest_version(&self) -> u64 {
        self.latest_version
    }

    /// Matching mode in use
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Read access to the underlying store
    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    /// The backup sink
    pub fn backups(&self) -> &S {
        &self.backups
    }
}

/// Builder for [`VersioningService`]
///
/// # Examples
///
/// ```rust
/// use versa::{VersaBuilder, types::MatchMode};
///
/// let service = VersaBuilder::new()
///     .match_mode(MatchMode::HashOnly)
///     .build();
/// assert_eq!(service.match_mode(), MatchMode::HashOnly);
/// ```
///
/// # Default Values
///
/// - `match_mode`: `MatchMode::Exact`
#[derive(Debug, Clone, Default)]
pub struct VersaBuilder {
    match_mode: MatchMode,
}

impl VersaBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            match_mode: MatchMode::default(),
        }
    }

    /// Builder seeded from a configuration
    pub fn from_config(config: &VersaConfig) -> Self {
        Self::new().match_mode(config.match_mode)
    }

    /// Set how duplicate content and identical lines are detected
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Build an in-memory service
    pub fn build(self) -> VersioningService<NoopBackups> {
        self.build_with_backups(NoopBackups)
    }

    /// Build a service that mirrors versions to `backups`
    pub fn build_with_backups<S: BackupSink>(self, backups: S) -> VersioningService<S> {
        VersioningService {
            store: VersionStore::new(),
            latest_version: 0,
            match_mode: self.match_mode,
            backups,
        }
    }
}
