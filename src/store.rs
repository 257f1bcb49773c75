//! In-memory version history
//!
//! [`VersionStore`] keeps the snapshots of one tracked file in version order.
//! It is a plain ordered sequence: appends go to the tail, removal shifts the
//! remaining snapshots down. Every lookup is a linear scan, which is fine for
//! the history sizes a single hand-edited file produces.
//!
//! ## Structure
//!
//! ```text
//! head                                   tail
//! [v1] -> [v2] -> [v4] -> [v5] -> ... -> [vN]
//! ```
//!
//! Version numbers strictly increase from head to tail. Gaps appear where
//! versions were removed; numbers are never reused.
//!
//! ## Examples
//!
//! ```rust
//! use versa::store::{Predecessor, VersionStore};
//!
//! let mut store = VersionStore::new();
//! store.append(1, "first".to_string())?;
//! store.append(2, "second".to_string())?;
//!
//! let located = store.find_by_version(2).unwrap();
//! assert_eq!(located.snapshot.content(), "second");
//! assert_eq!(located.predecessor, Predecessor::After(0));
//!
//! let predecessor = located.predecessor;
//! let removed = store.remove(predecessor).unwrap();
//! assert_eq!(removed.version(), 2);
//! assert_eq!(store.len(), 1);
//! # Ok::<(), versa::VersaError>(())
//! ```

use crate::error::{Result, VersaError};
use crate::hash::ContentHash;
use crate::snapshot::Snapshot;
use crate::types::MatchMode;
use tracing::trace;

/// Position just before a snapshot in sequence order
///
/// Returned by [`VersionStore::find_by_version`] and consumed by
/// [`VersionStore::remove`]. A cursor is only meaningful for the store state
/// it was taken from; any append or remove in between invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predecessor {
    /// Sentinel before the head snapshot
    Head,
    /// The snapshot at this position precedes the target
    After(usize),
}

impl Predecessor {
    /// Position of the snapshot that follows this cursor
    pub fn successor_position(self) -> usize {
        match self {
            Predecessor::Head => 0,
            Predecessor::After(position) => position + 1,
        }
    }
}

/// A snapshot found by version together with the cursor before it
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    /// The matching snapshot
    pub snapshot: &'a Snapshot,
    /// Cursor to pass to [`VersionStore::remove`]
    pub predecessor: Predecessor,
}

/// Result of looking up two versions in one scan
///
/// `both_found` is false when the scan ran out before locating both. It does
/// not say which one was missing.
#[derive(Debug, Clone, Copy)]
pub struct PairLookup<'a> {
    /// Snapshot for the first requested version
    pub first: Option<&'a Snapshot>,
    /// Snapshot for the second requested version
    pub second: Option<&'a Snapshot>,
    /// Whether both were located
    pub both_found: bool,
}

impl<'a> PairLookup<'a> {
    /// Both snapshots, if both were found
    pub fn pair(&self) -> Option<(&'a Snapshot, &'a Snapshot)> {
        match (self.first, self.second) {
            (Some(first), Some(second)) if self.both_found => Some((first, second)),
            _ => None,
        }
    }
}

/// Lazy iterator over snapshots containing a keyword
///
/// Nothing is scanned until the iterator is advanced. Clone it before
/// consuming to scan the same range again.
#[derive(Debug, Clone)]
pub struct KeywordMatches<'a, 'k> {
    snapshots: std::slice::Iter<'a, Snapshot>,
    keyword: &'k str,
}

impl<'a, 'k> Iterator for KeywordMatches<'a, 'k> {
    type Item = &'a Snapshot;

    fn next(&mut self) -> Option<Self::Item> {
        let keyword = self.keyword;
        self.snapshots.by_ref().find(|snapshot| snapshot.contains(keyword))
    }
}

/// Ordered collection of snapshots for one tracked file
#[derive(Debug, Clone, Default)]
pub struct VersionStore {
    snapshots: Vec<Snapshot>,
}

impl VersionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    /// Append a snapshot at the tail
    ///
    /// # Errors
    ///
    /// Returns [`VersaError::VersionOutOfOrder`] if `version` is not greater
    /// than the current tail version. Version 0 is always rejected.
    pub fn append(&mut self, version: u64, content: String) -> Result<()> {
        let latest = self.latest_version();
        if version <= latest {
            return Err(VersaError::VersionOutOfOrder { version, latest });
        }
        self.snapshots.push(Snapshot::new(version, content));
        trace!("Appended version {} (size {})", version, self.snapshots.len());
        Ok(())
    }

    /// Find a snapshot by version along with the cursor before it
    pub fn find_by_version(&self, version: u64) -> Option<Located<'_>> {
        let position = self
            .snapshots
            .iter()
            .position(|snapshot| snapshot.version() == version)?;
        let predecessor = match position {
            0 => Predecessor::Head,
            n => Predecessor::After(n - 1),
        };
        trace!("Located version {} at position {}", version, position);
        Some(Located {
            snapshot: &self.snapshots[position],
            predecessor,
        })
    }

    /// Snapshot the cursor points after, `None` for the head sentinel
    pub fn predecessor_snapshot(&self, predecessor: Predecessor) -> Option<&Snapshot> {
        match predecessor {
            Predecessor::Head => None,
            Predecessor::After(position) => self.snapshots.get(position),
        }
    }

    /// Locate two versions in a single forward scan
    ///
    /// The scan stops as soon as both are found. Asking for the same version
    /// twice resolves both sides to the same snapshot.
    pub fn find_pair(&self, first: u64, second: u64) -> PairLookup<'_> {
        let mut lookup = PairLookup {
            first: None,
            second: None,
            both_found: false,
        };

        for snapshot in &self.snapshots {
            if snapshot.version() == first {
                lookup.first = Some(snapshot);
            }
            if snapshot.version() == second {
                lookup.second = Some(snapshot);
            }
            if lookup.first.is_some() && lookup.second.is_some() {
                lookup.both_found = true;
                break;
            }
        }

        trace!(
            "Pair lookup {} / {}: both found = {}",
            first, second, lookup.both_found
        );
        lookup
    }

    /// Remove the snapshot following `predecessor`
    ///
    /// Returns the removed snapshot, or `None` (leaving the store untouched)
    /// when the cursor has no successor.
    pub fn remove(&mut self, predecessor: Predecessor) -> Option<Snapshot> {
        let position = predecessor.successor_position();
        if position >= self.snapshots.len() {
            return None;
        }
        let removed = self.snapshots.remove(position);
        trace!("Removed version {} (size {})", removed.version(), self.snapshots.len());
        Some(removed)
    }

    /// Whether any stored snapshot has the same content
    pub fn contains_content(&self, content: &str, mode: MatchMode) -> bool {
        let hash = ContentHash::of(content);
        self.snapshots
            .iter()
            .any(|snapshot| mode.same_hashed(snapshot.content(), snapshot.hash(), content, hash))
    }

    /// Lazily scan for snapshots containing `keyword`
    pub fn scan_keyword<'a, 'k>(&'a self, keyword: &'k str) -> KeywordMatches<'a, 'k> {
        KeywordMatches {
            snapshots: self.snapshots.iter(),
            keyword,
        }
    }

    /// Whether any snapshot contains `keyword`, stopping at the first hit
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.scan_keyword(keyword).next().is_some()
    }

    /// Number of live snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// First snapshot in version order
    pub fn head(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    /// Last snapshot in version order
    pub fn tail(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Version of the tail snapshot, 0 when empty
    pub fn latest_version(&self) -> u64 {
        self.tail().map(Snapshot::version).unwrap_or(0)
    }

    /// Iterate snapshots in version order
    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }
}

impl<'a> IntoIterator for &'a VersionStore {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
