//! # versa - a version store for a single text file
//!
//! versa keeps an ordered history of snapshots of one tracked file. Every
//! snapshot gets a version number one higher than the last one handed out,
//! and the history can be loaded, compared line by line, searched by keyword
//! and pruned.
//!
//! ## Overview
//!
//! - **Linear history**: versions form a single ordered sequence, no branches
//! - **Deduplication**: adding content that is already stored is rejected
//! - **Line diffs**: two versions are compared line by line, position by position
//! - **Keyword search**: case-sensitive substring search across all versions
//! - **Backups**: each version can be mirrored to a `stem_N.ext` file and the
//!   history rebuilt from those files on the next start
//!
//! ## Quick Start
//!
//! ```rust
//! use versa::{VersaError, VersioningService};
//!
//! # fn main() -> Result<(), VersaError> {
//! let mut service = VersioningService::new();
//!
//! let v1 = service.add("hello\nworld")?;
//! let v2 = service.add("hello\nmars")?;
//!
//! // Identical content is not recorded twice
//! assert!(matches!(service.add("hello\nmars"), Err(VersaError::DuplicateContent)));
//!
//! print!("{}", service.compare(v1, v2)?);
//! // Line 1: <Identical>
//! // Line 2: world <<>> mars
//!
//! let hits = service.search("mars");
//! assert_eq!(hits[0].version, v2);
//! # Ok(())
//! # }
//! ```
//!
//! ## File-backed history
//!
//! ```rust,no_run
//! use versa::{VersaConfig, VersioningService};
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VersaConfig {
//!     tracked_file: PathBuf::from("notes.txt"),
//!     ..Default::default()
//! };
//!
//! // Rebuild history from notes_1.txt, notes_2.txt, ...
//! let mut service = VersioningService::open(&config)?;
//!
//! let text = service.backups().read_tracked()?;
//! let version = service.add(text)?;
//! println!("Saved version {}", version);
//!
//! // Put an older version back into notes.txt
//! let content = service.load(1)?.content().to_string();
//! service.backups().write_tracked(&content)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Hash collisions
//!
//! Content is hashed with a fast non-cryptographic hash. By default a hash
//! match is confirmed by comparing the text, so two different texts are never
//! treated as the same version. [`MatchMode::HashOnly`] trusts the hash alone.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, VersaError>`. Not-found and duplicate
//! outcomes are ordinary errors the caller reports; nothing is half-applied.
//!
//! ## Module Organization
//!
//! - [`store`]: the ordered snapshot collection
//! - [`service`]: add, load, remove, compare, search
//! - [`diff`]: line-by-line comparison
//! - [`backup`]: backup sinks and history reconstruction
//! - [`config`]: configuration file handling
//! - [`types`]: shared types
//! - [`error`]: error types

// Public API modules
pub mod backup;
pub mod config;
pub mod diff;
pub mod error;
pub mod hash;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod types;

// Internal modules (not part of public API)
mod utils;

// Re-export main types for convenience
pub use backup::{BackupSink, FileBackups, NoopBackups};
pub use config::VersaConfig;
pub use diff::{LineDiff, LineRecord, LineSide, LineStatus};
pub use error::{Result, VersaError};
pub use hash::ContentHash;
pub use service::{VersaBuilder, VersioningService};
pub use snapshot::Snapshot;
pub use store::VersionStore;
pub use types::{MatchMode, SearchHit};
