//! Core data types shared across the versa library
//!
//! ## Overview
//!
//! - **Matching**: [`MatchMode`] decides when two texts count as equal, both for
//!   dedup on add and for line identity in a diff
//! - **Results**: [`SearchHit`] is one keyword search result
//!
//! ## Examples
//!
//! ```rust
//! use versa::types::MatchMode;
//!
//! assert_eq!(MatchMode::default(), MatchMode::Exact);
//! assert!(MatchMode::Exact.same("a", "a"));
//! assert!(!MatchMode::Exact.same("a", "b"));
//! ```

use crate::hash::ContentHash;
use serde::{Deserialize, Serialize};

/// How two texts are judged equal
///
/// Both modes compare hashes first. `Exact` then confirms the match by
/// comparing the text itself, so a hash collision never merges two distinct
/// texts. `HashOnly` trusts the hash alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Hash pre-filter confirmed by full comparison
    #[default]
    Exact,
    /// Equal hashes mean equal text
    HashOnly,
}

impl MatchMode {
    /// Compare two texts
    pub fn same(self, a: &str, b: &str) -> bool {
        self.same_hashed(a, ContentHash::of(a), b, ContentHash::of(b))
    }

    /// Compare two texts whose hashes are already known
    pub fn same_hashed(self, a: &str, hash_a: ContentHash, b: &str, hash_b: ContentHash) -> bool {
        if hash_a != hash_b {
            return false;
        }
        match self {
            MatchMode::Exact => a == b,
            MatchMode::HashOnly => true,
        }
    }
}

/// One keyword search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Version containing the keyword
    pub version: u64,
    /// Full content of that version
    pub content: String,
}
