//! Snapshot definition
//!
//! A snapshot is one recorded version of the tracked file. It carries the full
//! text, the version number it was assigned, and a hash of the text computed
//! once at construction.
//!
//! ## Examples
//!
//! ```rust
//! use versa::Snapshot;
//!
//! let snapshot = Snapshot::new(1, "hello\nworld".to_string());
//! assert_eq!(snapshot.version(), 1);
//! assert_eq!(snapshot.line_count(), 2);
//! assert!(snapshot.contains("wor"));
//! ```

use crate::hash::ContentHash;
use serde::Serialize;
use std::fmt;

/// One recorded version of the tracked file
///
/// Fields are private: the hash must always describe the content, so a
/// snapshot is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    version: u64,
    content: String,
    hash: ContentHash,
}

impl Snapshot {
    /// Create a snapshot, hashing its content
    pub fn new(version: u64, content: String) -> Self {
        let hash = ContentHash::of(&content);
        Self {
            version,
            content,
            hash,
        }
    }

    /// Version number assigned to this snapshot
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Full text of this snapshot
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Hash of the content
    pub fn hash(&self) -> ContentHash {
        self.hash
    }

    /// Case-sensitive substring test
    pub fn contains(&self, keyword: &str) -> bool {
        self.content.contains(keyword)
    }

    /// Number of lines as the line diff counts them
    pub fn line_count(&self) -> usize {
        crate::diff::split_lines(&self.content).len()
    }

    /// Consume the snapshot and return its content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Version number: {}", self.version)?;
        writeln!(f, "Hash Value: {}", self.hash)?;
        write!(f, "Content: {}", self.content)
    }
}
